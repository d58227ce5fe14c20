use std::collections::TryReserveError;
use std::fmt::Debug;

use thiserror::Error;

use super::EngineStatistics;
use super::MetricSamples;
use crate::basic_types::Literal;
use crate::basic_types::SolveResult;
use crate::basic_types::Variable;
use crate::proof::ProofLog;
use crate::termination::TerminationCondition;

#[derive(Debug, Error)]
pub enum ClauseDatabaseError {
    #[error("the clause database could not grow: {0}")]
    OutOfMemory(#[from] TryReserveError),
}

/// The operations a session needs from a satisfiability engine.
///
/// Clauses are only added between solves, when the engine is at the root; every `solve` call
/// returns the engine to the root before it returns.
pub trait SatEngine: Debug {
    /// Allocates a fresh variable; the index of the returned variable equals the number of
    /// variables before the call.
    fn new_variable(&mut self) -> Variable;

    fn num_variables(&self) -> usize;

    /// Adds a permanent clause. Returns `Ok(false)` if the clause database is contradictory after
    /// the addition, either because of this clause or because it already was.
    fn add_clause(&mut self, literals: &[Literal]) -> Result<bool, ClauseDatabaseError>;

    /// Adds a clause derived outside the engine. It is stored among the learnt clauses, which
    /// affects bookkeeping only.
    fn add_learnt_clause(&mut self, literals: &[Literal]) -> Result<bool, ClauseDatabaseError>;

    /// `false` once a contradiction has been derived at the root.
    fn is_consistent(&self) -> bool;

    /// Searches for a model in which all `assumptions` hold. The termination condition is polled
    /// before every decision; when it triggers, [`SolveResult::Indeterminate`] is returned.
    fn solve(
        &mut self,
        assumptions: &[Literal],
        termination: &mut dyn TerminationCondition,
    ) -> Result<SolveResult, ClauseDatabaseError>;

    /// The value of `variable` in the model found by the most recent satisfiable `solve`.
    fn model_value(&self, variable: Variable) -> Option<bool>;

    /// Propagates the root and removes satisfied clauses. Returns [`SatEngine::is_consistent`].
    fn simplify(&mut self) -> bool;

    fn statistics(&self) -> &EngineStatistics;

    fn metric_samples(&self) -> &MetricSamples;

    fn set_random_seed(&mut self, seed: f64);

    /// The number of permanent clauses.
    fn num_clauses(&self) -> usize;

    fn num_learnt_clauses(&self) -> usize;

    /// The length of the longest permanent clause.
    fn longest_clause_length(&self) -> usize;

    /// The permanent clauses under the root assignment: satisfied clauses are left out, false
    /// literals are removed, and every root assignment is included as a unit clause.
    fn simplified_clauses(&self) -> Vec<Vec<Literal>>;

    /// Seeds the branching order; variables with a higher score are branched on first.
    fn apply_ordering_hint(&mut self, hint: &[(Variable, f64)]);

    /// Attaches a certificate stream. Engines which cannot produce certificates ignore it.
    fn attach_proof_log(&mut self, _proof_log: ProofLog) {}
}
