//! The incremental session protocol.
//!
//! A [`Session`] owns one engine and three staging areas: the clause buffer, the learnt clause
//! buffer and the assumption set. Literals are staged one by one with the signed-integer encoding
//! (`v` is variable `v` positive, `-v` is it negated, `0` is invalid) and become visible to the
//! engine only when the buffer is committed. Variables are created on first reference.
//!
//! ```
//! use incsat_core::Session;
//! use incsat_core::SolveResult;
//!
//! let mut session = Session::default();
//! for clause in [[1, 2], [-1, -2]] {
//!     for literal in clause {
//!         session.stage_literal(literal)?;
//!     }
//!     assert!(session.commit_clause()?);
//! }
//!
//! session.stage_assumption(1)?;
//! assert_eq!(session.solve(), SolveResult::Satisfiable);
//! assert!(session.value_of(1)?);
//! assert!(!session.value_of(2)?);
//! # Ok::<(), incsat_core::session::SessionError>(())
//! ```

mod assumption_set;
mod clause_buffer;
mod incremental_session;
mod learnt_clause_filter;
mod session_error;

pub use assumption_set::AssumptionSet;
pub use clause_buffer::ClauseBuffer;
pub use incremental_session::EmptyClausePolicy;
pub use incremental_session::InjectionReport;
pub use incremental_session::Session;
pub use incremental_session::SessionCounters;
pub use incremental_session::SessionOptions;
pub use learnt_clause_filter::LearntClauseFilter;
pub use session_error::SessionError;
