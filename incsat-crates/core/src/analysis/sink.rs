use thiserror::Error;

use crate::instrumentation::RunRecord;
use crate::instrumentation::SolvedInstance;

#[derive(Debug, Error)]
pub enum SinkError {
    /// The collaborator cannot be reached. Later calls on the same sink are expected to fail too.
    #[error("the analysis collaborator at '{target}' is unavailable")]
    CollaboratorUnavailable {
        target: String,
        #[source]
        source: std::io::Error,
    },
    /// One export could not be encoded; other exports may still succeed.
    #[error("failed to encode an export: {0}")]
    Serialisation(#[from] serde_json::Error),
}

/// The receiving side of a run log.
pub trait AnalysisSink {
    /// Receives one record, including all of its metric series.
    fn export_run(&mut self, record: &RunRecord) -> Result<(), SinkError>;

    /// A hint that the raw data of the named instance should be persisted. Carries no data.
    fn export_raw(&mut self, instance_name: &str, alternate_mode: bool) -> Result<(), SinkError>;

    /// Receives the batch summary, after every record.
    fn export_summary(&mut self, solved_instances: &[SolvedInstance]) -> Result<(), SinkError>;

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}
