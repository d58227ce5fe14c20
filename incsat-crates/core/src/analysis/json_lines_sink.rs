use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use super::AnalysisSink;
use super::SinkError;
use crate::instrumentation::RunRecord;
use crate::instrumentation::SolvedInstance;

/// The version of the envelope and payload layout written by [`JsonLinesSink`].
pub const SCHEMA_VERSION: u32 = 1;

/// The file [`JsonLinesSink`] creates inside its output directory.
pub const RUN_LOG_FILE_NAME: &str = "run-log.jsonl";

/// Every line of the stream is one envelope.
#[derive(Serialize)]
struct Envelope<'a, Payload: Serialize> {
    schema_version: u32,
    kind: &'static str,
    payload: &'a Payload,
}

#[derive(Serialize)]
struct RawExport<'a> {
    instance_name: &'a str,
    alternate_mode: bool,
}

/// Writes the run log as JSON lines, one object per export, to `<directory>/run-log.jsonl`.
///
/// Each line is `{"schema_version":1,"kind":K,"payload":P}` where `K` is `run` (a
/// [`RunRecord`]), `raw` (an instance name and its alternate mode flag) or `summary` (the list of
/// [`SolvedInstance`]s).
#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonLinesSink {
    pub fn create(directory: impl AsRef<Path>) -> Result<JsonLinesSink, SinkError> {
        let directory = directory.as_ref();
        let path = directory.join(RUN_LOG_FILE_NAME);

        std::fs::create_dir_all(directory)
            .and_then(|_| File::create(&path))
            .map(|file| JsonLinesSink {
                writer: BufWriter::new(file),
                path: path.clone(),
            })
            .map_err(|source| SinkError::CollaboratorUnavailable {
                target: path.display().to_string(),
                source,
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_envelope(
        &mut self,
        kind: &'static str,
        payload: &impl Serialize,
    ) -> Result<(), SinkError> {
        let line = serde_json::to_string(&Envelope {
            schema_version: SCHEMA_VERSION,
            kind,
            payload,
        })?;

        writeln!(self.writer, "{line}").map_err(|source| self.unavailable(source))
    }

    fn unavailable(&self, source: std::io::Error) -> SinkError {
        SinkError::CollaboratorUnavailable {
            target: self.path.display().to_string(),
            source,
        }
    }
}

impl AnalysisSink for JsonLinesSink {
    fn export_run(&mut self, record: &RunRecord) -> Result<(), SinkError> {
        self.write_envelope("run", record)
    }

    fn export_raw(&mut self, instance_name: &str, alternate_mode: bool) -> Result<(), SinkError> {
        self.write_envelope(
            "raw",
            &RawExport {
                instance_name,
                alternate_mode,
            },
        )
    }

    fn export_summary(&mut self, solved_instances: &[SolvedInstance]) -> Result<(), SinkError> {
        self.write_envelope("summary", &solved_instances)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush().map_err(|source| self.unavailable(source))
    }
}
