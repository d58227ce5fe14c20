//! Per-instance records of solver runs.
//!
//! The [`InstrumentationRecorder`] brackets the solve of one named instance: [`begin`] snapshots
//! the counters before the solve, [`finish`] reads them again afterwards and appends a
//! [`RunRecord`] to the [`RunLog`]. Neither touches the session mutably.
//!
//! [`begin`]: InstrumentationRecorder::begin
//! [`finish`]: InstrumentationRecorder::finish

mod metric_series;
mod recorder;
mod run_log;
mod run_record;

pub use metric_series::MetricSeries;
pub use recorder::InstanceRun;
pub use recorder::InstrumentationRecorder;
pub use run_log::RunLog;
pub use run_log::SolvedInstance;
pub use run_record::RunRecord;
