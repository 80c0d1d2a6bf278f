use std::fmt;
use std::sync::Arc;

use crate::descriptor::TypeDescriptor;

/// Custom filter applied after the built-in criteria.
pub type Predicate = Arc<dyn Fn(&TypeDescriptor) -> bool + Send + Sync>;

/// Everything a search constrains. Unset fields and empty lists match all
/// descriptors.
#[derive(Clone, Default)]
pub struct SearchCriteria {
    pub(crate) namespace: Option<String>,
    pub(crate) class: Option<String>,
    pub(crate) extends: Option<String>,
    pub(crate) implements: Vec<String>,
    pub(crate) uses: Vec<String>,
    pub(crate) constants: Vec<String>,
    pub(crate) properties: Vec<String>,
    pub(crate) methods: Vec<String>,
    pub(crate) predicates: Vec<Predicate>,
}

impl fmt::Debug for SearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCriteria")
            .field("namespace", &self.namespace)
            .field("class", &self.class)
            .field("extends", &self.extends)
            .field("implements", &self.implements)
            .field("uses", &self.uses)
            .field("constants", &self.constants)
            .field("properties", &self.properties)
            .field("methods", &self.methods)
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

impl SearchCriteria {
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn extends(&self) -> Option<&str> {
        self.extends.as_deref()
    }

    pub fn implements(&self) -> &[String] {
        &self.implements
    }

    pub fn uses(&self) -> &[String] {
        &self.uses
    }

    pub fn constants(&self) -> &[String] {
        &self.constants
    }

    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Built-in structural checks, ANDed. Custom predicates are not applied here.
    pub fn matches(&self, descriptor: &TypeDescriptor) -> bool {
        self.matches_namespace(descriptor)
            && self.matches_class(descriptor)
            && self.matches_extends(descriptor)
            && self.implements.iter().all(|i| descriptor.implements_interface(i))
            && self.uses.iter().all(|t| descriptor.uses_trait(t))
            && self.constants.iter().all(|c| descriptor.has_constant(c))
            && self.properties.iter().all(|p| descriptor.has_property(p))
            && self.methods.iter().all(|m| descriptor.has_method(m))
    }

    fn matches_namespace(&self, descriptor: &TypeDescriptor) -> bool {
        self.namespace
            .as_deref()
            .is_none_or(|ns| descriptor.namespace() == ns)
    }

    fn matches_class(&self, descriptor: &TypeDescriptor) -> bool {
        self.class
            .as_deref()
            .is_none_or(|c| descriptor.short_name() == c || descriptor.name() == c)
    }

    fn matches_extends(&self, descriptor: &TypeDescriptor) -> bool {
        self.extends
            .as_deref()
            .is_none_or(|e| descriptor.parent_name() == Some(e))
    }
}

pub(crate) fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ResolvedFacts;
    use crate::descriptor::tests::{descriptor, set};

    #[test]
    fn empty_criteria_match_everything() {
        let d = descriptor("A\\B\\C", ResolvedFacts::default());
        assert!(SearchCriteria::default().matches(&d));
    }

    #[test]
    fn namespace_is_exact_and_case_sensitive() {
        let d = descriptor("A\\B\\C", ResolvedFacts::default());
        let mut criteria = SearchCriteria {
            namespace: Some("A\\B".to_string()),
            ..Default::default()
        };
        assert!(criteria.matches(&d));

        criteria.namespace = Some("A".to_string());
        assert!(!criteria.matches(&d));

        criteria.namespace = Some("a\\b".to_string());
        assert!(!criteria.matches(&d));
    }

    #[test]
    fn class_matches_short_or_full_name() {
        let criteria = SearchCriteria {
            class: Some("Foo".to_string()),
            ..Default::default()
        };
        assert!(criteria.matches(&descriptor("Foo", ResolvedFacts::default())));
        assert!(criteria.matches(&descriptor("X\\Y\\Foo", ResolvedFacts::default())));
        assert!(!criteria.matches(&descriptor("FooBar", ResolvedFacts::default())));

        let full = SearchCriteria {
            class: Some("X\\Y\\Foo".to_string()),
            ..Default::default()
        };
        assert!(full.matches(&descriptor("X\\Y\\Foo", ResolvedFacts::default())));
    }

    #[test]
    fn extends_requires_a_parent() {
        let criteria = SearchCriteria {
            extends: Some("Base".to_string()),
            ..Default::default()
        };
        let orphan = descriptor("Orphan", ResolvedFacts::default());
        let child = descriptor(
            "Child",
            ResolvedFacts {
                parent_name: Some("Base".to_string()),
                ..Default::default()
            },
        );
        assert!(!criteria.matches(&orphan));
        assert!(criteria.matches(&child));
    }

    #[test]
    fn set_criteria_require_every_name() {
        let d1 = descriptor(
            "D1",
            ResolvedFacts {
                interface_names: set(&["I"]),
                trait_names: set(&["U"]),
                method_names: set(&["m"]),
                ..Default::default()
            },
        );
        let d2 = descriptor(
            "D2",
            ResolvedFacts {
                interface_names: set(&["I"]),
                ..Default::default()
            },
        );
        let criteria = SearchCriteria {
            implements: vec!["I".to_string()],
            uses: vec!["U".to_string()],
            methods: vec!["M".to_string()],
            ..Default::default()
        };
        assert!(criteria.matches(&d1));
        assert!(!criteria.matches(&d2));
    }

    #[test]
    fn predicates_are_kept_but_not_applied_by_matches() {
        let reject_all: Predicate = Arc::new(|_: &TypeDescriptor| false);
        let criteria = SearchCriteria {
            predicates: vec![reject_all],
            ..Default::default()
        };
        let d = descriptor("Any", ResolvedFacts::default());

        assert_eq!(criteria.predicates().len(), 1);
        assert!(criteria.matches(&d));
        assert!(criteria.predicates().iter().all(|p| !p(&d)));
    }

    #[test]
    fn push_unique_ignores_repeats() {
        let mut list = Vec::new();
        push_unique(&mut list, "A".to_string());
        push_unique(&mut list, "A".to_string());
        assert_eq!(list, vec!["A"]);
    }
}
