use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::collection::DescriptorCollection;
use crate::criteria::{SearchCriteria, push_unique};
use crate::descriptor::TypeDescriptor;
use crate::strategy::{LoadingStrategy, Psr4LoadingStrategy};

/// Immutable search builder.
///
/// Every criterion method returns a new `Finder` and leaves the receiver
/// untouched, so one base configuration can be branched into independent
/// searches:
///
/// ```no_run
/// use php_class_finder::Finder;
///
/// let base = Finder::new().implements("App\\Contracts\\Handler");
/// let jobs = base.namespace("App\\Jobs").in_dir("src");
/// let all = base.in_dir("src");
/// assert!(all.len() >= jobs.len());
/// ```
#[derive(Debug, Clone)]
pub struct Finder {
    criteria: SearchCriteria,
    strategies: Vec<Arc<dyn LoadingStrategy>>,
}

impl Default for Finder {
    fn default() -> Self {
        Self::new()
    }
}

impl Finder {
    /// A finder with the PSR-4 strategy registered.
    pub fn new() -> Self {
        Self::with_strategies(vec![Arc::new(Psr4LoadingStrategy::default())])
    }

    /// A finder that runs exactly `strategies`, in order.
    pub fn with_strategies(strategies: Vec<Arc<dyn LoadingStrategy>>) -> Self {
        Self {
            criteria: SearchCriteria::default(),
            strategies,
        }
    }

    /// Appends a strategy to this finder in place. Meant for setup before the
    /// finder is shared or branched.
    pub fn register_loading_strategy(&mut self, strategy: impl LoadingStrategy + 'static) {
        self.strategies.push(Arc::new(strategy));
    }

    pub fn loading_strategies(&self) -> &[Arc<dyn LoadingStrategy>] {
        &self.strategies
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    fn with(&self, change: impl FnOnce(&mut SearchCriteria)) -> Self {
        let mut next = self.clone();
        change(&mut next.criteria);
        next
    }

    /// Only classes declared exactly in `namespace`.
    pub fn namespace(&self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.with(|c| c.namespace = Some(namespace))
    }

    /// Only classes whose short or fully-qualified name equals `class`.
    pub fn class(&self, class: impl Into<String>) -> Self {
        let class = class.into();
        self.with(|c| c.class = Some(class))
    }

    /// Only classes whose immediate parent is `parent`.
    pub fn extends(&self, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        self.with(|c| c.extends = Some(parent))
    }

    pub fn implements(&self, interface: impl Into<String>) -> Self {
        let interface = interface.into();
        self.with(|c| push_unique(&mut c.implements, interface))
    }

    pub fn uses(&self, used_trait: impl Into<String>) -> Self {
        let used_trait = used_trait.into();
        self.with(|c| push_unique(&mut c.uses, used_trait))
    }

    pub fn has_constant(&self, constant: impl Into<String>) -> Self {
        let constant = constant.into();
        self.with(|c| push_unique(&mut c.constants, constant))
    }

    pub fn has_property(&self, property: impl Into<String>) -> Self {
        let property = property.into();
        self.with(|c| push_unique(&mut c.properties, property))
    }

    pub fn has_method(&self, method: impl Into<String>) -> Self {
        let method = method.into();
        self.with(|c| push_unique(&mut c.methods, method))
    }

    /// Adds a custom predicate. Predicates run after the built-in criteria,
    /// in the order they were added.
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    {
        self.with(|c| c.predicates.push(Arc::new(predicate)))
    }

    /// Runs every strategy against `directory` and filters the merged result.
    ///
    /// Nothing is cached; each call scans and parses again.
    pub fn in_dir(&self, directory: impl AsRef<Path>) -> DescriptorCollection {
        let directory = directory.as_ref();
        let start = Instant::now();

        let discovered = self
            .strategies
            .iter()
            .fold(DescriptorCollection::new(), |acc, strategy| {
                acc.merge(strategy.resolve(directory))
            });
        let discovered_count = discovered.len();

        let mut matched = discovered.filter(|d| self.criteria.matches(d));
        for predicate in &self.criteria.predicates {
            matched = matched.filter(|d| predicate(d));
        }

        tracing::debug!(
            directory = %directory.display(),
            strategies = self.strategies.len(),
            discovered = discovered_count,
            matched = matched.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "search finished"
        );
        matched
    }
}
