use fnv::FnvHashMap;
use itertools::Itertools;
use log::warn;

use super::OccurrenceOrdering;
use super::VariableOrdering;

/// The orderings which can be selected by name.
#[derive(Debug, Default)]
pub struct OrderingRegistry {
    orderings: FnvHashMap<&'static str, Box<dyn VariableOrdering + Send + Sync>>,
}

impl OrderingRegistry {
    /// A registry holding every ordering shipped with this crate.
    pub fn with_defaults() -> OrderingRegistry {
        let mut registry = OrderingRegistry::default();
        registry.register(OccurrenceOrdering);
        registry
    }

    /// Registers `ordering` under its name, replacing an ordering of the same name.
    pub fn register(&mut self, ordering: impl VariableOrdering + Send + Sync + 'static) {
        let _ = self.orderings.insert(ordering.name(), Box::new(ordering));
    }

    /// Looks up an ordering. If it is not registered, a warning is logged and the engine is
    /// expected to fall back to its own order.
    pub fn get(&self, name: &str) -> Option<&dyn VariableOrdering> {
        let ordering = self.orderings.get(name);
        if ordering.is_none() {
            warn!(
                "Variable ordering '{name}' is not available (known: {}); using the activity order",
                self.names().join(", ")
            );
        }

        ordering.map(|ordering| -> &dyn VariableOrdering { ordering.as_ref() })
    }

    /// The registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.orderings.keys().copied().sorted_unstable().collect()
    }
}
