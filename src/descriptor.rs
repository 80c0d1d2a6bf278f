use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::structure::{Declaration, DeclarationKind};

/// Read-only summary of one discovered class and the file it was declared in.
///
/// Descriptors are produced by [`TypeIndex::resolve`](crate::resolve::TypeIndex::resolve)
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    name: String,
    namespace: String,
    short_name: String,
    kind: DeclarationKind,
    parent_name: Option<String>,
    interface_names: BTreeSet<String>,
    trait_names: BTreeSet<String>,
    constant_names: BTreeSet<String>,
    property_names: BTreeSet<String>,
    method_names: BTreeSet<String>,
    is_abstract: bool,
    is_final: bool,
    source_file: PathBuf,
}

/// Structural facts gathered while resolving a declaration.
#[derive(Debug, Default)]
pub(crate) struct ResolvedFacts {
    pub parent_name: Option<String>,
    pub interface_names: BTreeSet<String>,
    pub trait_names: BTreeSet<String>,
    pub constant_names: BTreeSet<String>,
    pub property_names: BTreeSet<String>,
    pub method_names: BTreeSet<String>,
}

impl TypeDescriptor {
    pub(crate) fn new(decl: &Declaration, facts: ResolvedFacts, source_file: PathBuf) -> Self {
        Self {
            name: decl.name.clone(),
            namespace: decl.namespace.clone(),
            short_name: decl.short_name.clone(),
            kind: decl.kind,
            parent_name: facts.parent_name,
            interface_names: facts.interface_names,
            trait_names: facts.trait_names,
            constant_names: facts.constant_names,
            property_names: facts.property_names,
            method_names: facts.method_names,
            is_abstract: decl.is_abstract,
            is_final: decl.is_final,
            source_file,
        }
    }

    /// Fully-qualified name, e.g. `App\Models\User`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn kind(&self) -> DeclarationKind {
        self.kind
    }

    /// Immediate parent class only.
    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    /// Every interface implemented directly or through the parent chain,
    /// used traits and interface inheritance.
    pub fn interface_names(&self) -> &BTreeSet<String> {
        &self.interface_names
    }

    /// Traits used directly by this class; ancestors' traits are not included.
    pub fn trait_names(&self) -> &BTreeSet<String> {
        &self.trait_names
    }

    pub fn constant_names(&self) -> &BTreeSet<String> {
        &self.constant_names
    }

    pub fn property_names(&self) -> &BTreeSet<String> {
        &self.property_names
    }

    pub fn method_names(&self) -> &BTreeSet<String> {
        &self.method_names
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    pub fn implements_interface(&self, name: &str) -> bool {
        self.interface_names.contains(name)
    }

    pub fn uses_trait(&self, name: &str) -> bool {
        self.trait_names.contains(name)
    }

    pub fn has_constant(&self, name: &str) -> bool {
        self.constant_names.contains(name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property_names.contains(name)
    }

    /// PHP method names are case-insensitive.
    pub fn has_method(&self, name: &str) -> bool {
        self.method_names
            .iter()
            .any(|m| m.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn descriptor(name: &str, facts: ResolvedFacts) -> TypeDescriptor {
        let (namespace, short_name) = match name.rsplit_once('\\') {
            Some((ns, short)) => (ns.to_string(), short.to_string()),
            None => (String::new(), name.to_string()),
        };
        let source_file = PathBuf::from(format!("/src/{short_name}.php"));
        let decl = Declaration {
            kind: DeclarationKind::Class,
            namespace,
            short_name,
            name: name.to_string(),
            parent: None,
            interfaces: Vec::new(),
            traits: Vec::new(),
            constants: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            is_abstract: false,
            is_final: false,
            is_backed: false,
        };
        TypeDescriptor::new(&decl, facts, source_file)
    }

    pub(crate) fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn has_method_ignores_case() {
        let d = descriptor(
            "App\\Job",
            ResolvedFacts {
                method_names: set(&["handle"]),
                ..Default::default()
            },
        );
        assert!(d.has_method("Handle"));
        assert!(!d.has_method("dispatch"));
    }

    #[test]
    fn constant_and_property_checks_are_case_sensitive() {
        let d = descriptor(
            "App\\Job",
            ResolvedFacts {
                constant_names: set(&["QUEUE"]),
                property_names: set(&["tries"]),
                ..Default::default()
            },
        );
        assert!(d.has_constant("QUEUE"));
        assert!(!d.has_constant("queue"));
        assert!(d.has_property("tries"));
        assert!(!d.has_property("Tries"));
    }

    #[test]
    fn name_parts_are_exposed() {
        let d = descriptor("App\\Jobs\\SendMail", ResolvedFacts::default());
        assert_eq!(d.name(), "App\\Jobs\\SendMail");
        assert_eq!(d.namespace(), "App\\Jobs");
        assert_eq!(d.short_name(), "SendMail");
        assert!(d.parent_name().is_none());
        assert_eq!(d.source_file(), Path::new("/src/SendMail.php"));
    }
}
