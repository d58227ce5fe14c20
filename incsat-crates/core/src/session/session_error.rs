use thiserror::Error;

use crate::basic_types::LiteralError;
use crate::basic_types::Variable;
use crate::engine::ClauseDatabaseError;

/// The ways in which a [`Session`](super::Session) operation can be rejected.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Literal(#[from] LiteralError),
    #[error("no model is available; values can only be read after a satisfiable solve and before the next commit or solve")]
    StaleQuery,
    #[error("variable {0} is not part of the model")]
    UnknownVariable(Variable),
    #[error("an empty clause was committed while empty clauses are rejected")]
    EmptyClause,
    /// A literal of the clause was rejected while it was staged; the clause was discarded.
    #[error("the clause contained a rejected literal and was discarded")]
    IncompleteClause,
    #[error("the random seed can only be set before the first solve")]
    SeedAfterSolve,
    #[error(transparent)]
    ResourceExhaustion(#[from] ClauseDatabaseError),
}
