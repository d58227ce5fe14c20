//! Capabilities which compute an initial branching order for the engine.
//!
//! An ordering is selected by name through the [`OrderingRegistry`]. When no ordering is selected,
//! or the requested one is not registered, the engine keeps its own activity order.

mod occurrence_ordering;
mod registry;

use std::fmt::Debug;

pub use occurrence_ordering::OccurrenceOrdering;
pub use registry::OrderingRegistry;

use crate::basic_types::Literal;
use crate::basic_types::Variable;

/// Computes a score per variable; variables with a higher score are branched on first.
pub trait VariableOrdering: Debug {
    /// The name under which the ordering is registered.
    fn name(&self) -> &'static str;

    /// Scores the variables of `clauses`. Variables which are left out keep a score of zero.
    fn compute_hint(&self, clauses: &[Vec<Literal>], num_variables: usize) -> Vec<(Variable, f64)>;
}
