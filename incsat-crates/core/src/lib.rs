//! # incsat
//! An incremental SAT session protocol: clauses are staged literal by literal and committed into
//! an engine, assumptions hold for one solve only, and externally derived learnt clauses can be
//! fed back between solves.
//!
//! Around the [`Session`] live
//! * the process-wide [`CancellationController`](termination::CancellationController), which asks
//!   an active solve to stop at its next decision point, and reports when a second request arrives
//!   before the solve responded;
//! * the [`InstrumentationRecorder`](instrumentation::InstrumentationRecorder), which turns every
//!   solved instance into a [`RunRecord`](instrumentation::RunRecord) with metric series;
//! * the [`analysis`] boundary, through which the run log of a batch is handed to an external
//!   collaborator.
//!
//! The session drives a [`SatEngine`](engine::SatEngine); the crate ships the conflict-driven
//! [`CdclEngine`](engine::CdclEngine), which can produce DRUP certificates.
//!
//! ```rust
//! # use incsat_core::Session;
//! # use incsat_core::SolveResult;
//! let mut session = Session::default();
//!
//! // x1 or x2
//! session.stage_literal(1)?;
//! session.stage_literal(2)?;
//! session.commit_clause()?;
//!
//! // not x1 or not x2
//! session.stage_literal(-1)?;
//! session.stage_literal(-2)?;
//! session.commit_clause()?;
//!
//! assert_eq!(session.solve(), SolveResult::Satisfiable);
//! assert_ne!(session.value_of(1)?, session.value_of(2)?);
//! # Ok::<(), incsat_core::session::SessionError>(())
//! ```
pub(crate) mod basic_types;

pub mod analysis;
pub mod engine;
pub mod instrumentation;
pub mod ordering;
pub mod proof;
pub mod session;
pub mod statistics;
pub mod termination;

pub use convert_case;
pub use rand;

pub use crate::basic_types::Literal;
pub use crate::basic_types::LiteralError;
pub use crate::basic_types::SequenceGeneratorType;
pub use crate::basic_types::SolveResult;
pub use crate::basic_types::Variable;
pub use crate::session::EmptyClausePolicy;
pub use crate::session::Session;
pub use crate::session::SessionOptions;
