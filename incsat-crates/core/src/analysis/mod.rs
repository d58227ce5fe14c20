//! Hands the run log of a batch to an external analysis collaborator.
//!
//! The collaborator is anything implementing [`AnalysisSink`]. The crate ships
//! [`JsonLinesSink`], which writes a versioned record stream that can be consumed by a separate
//! process (e.g. for plotting). Sink failures never affect the [`RunLog`](crate::instrumentation::RunLog)
//! itself; see [`flush_run_log`].

mod flush;
mod json_lines_sink;
mod sink;

pub use flush::flush_run_log;
pub use flush::FlushReport;
pub use json_lines_sink::JsonLinesSink;
pub use json_lines_sink::RUN_LOG_FILE_NAME;
pub use json_lines_sink::SCHEMA_VERSION;
pub use sink::AnalysisSink;
pub use sink::SinkError;
