//! The boundary between a session and the satisfiability engine it drives.
//!
//! A [`Session`](crate::Session) only talks to its engine through [`SatEngine`]. The crate ships
//! one implementation, [`CdclEngine`], a conflict-driven clause-learning engine; any other engine
//! can be plugged in by implementing the trait.

mod cdcl;
mod engine_statistics;
mod metrics;
mod options;
mod sat_engine;

pub use cdcl::CdclEngine;
pub use engine_statistics::EngineStatistics;
pub use metrics::Metric;
pub use metrics::MetricSamples;
pub use options::EngineOptions;
pub use options::LearningOptions;
pub use options::RestartOptions;
pub use sat_engine::ClauseDatabaseError;
pub use sat_engine::SatEngine;
