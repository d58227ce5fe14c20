use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use crate::basic_types::Literal;

/// The first line of every certificate.
pub const DRUP_HEADER: &str = "o proof DRUP";

/// A DRUP certificate stream.
///
/// Every clause the engine learns is written as a DIMACS clause line, every learnt clause it
/// deletes as a `d` line, and a derived contradiction as the single line `0`. A default
/// [`ProofLog`] discards everything.
#[derive(Default)]
pub struct ProofLog {
    writer: Option<Box<dyn Write + Send>>,
    contradiction_logged: bool,
}

impl std::fmt::Debug for ProofLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofLog")
            .field("enabled", &self.writer.is_some())
            .field("contradiction_logged", &self.contradiction_logged)
            .finish()
    }
}

impl ProofLog {
    /// Start a certificate on the given writer, beginning with the header line.
    pub fn drup(writer: impl Write + Send + 'static) -> std::io::Result<ProofLog> {
        let mut writer: Box<dyn Write + Send> = Box::new(BufWriter::new(writer));
        writeln!(writer, "{DRUP_HEADER}")?;

        Ok(ProofLog {
            writer: Some(writer),
            contradiction_logged: false,
        })
    }

    pub fn drup_file(path: impl AsRef<Path>) -> std::io::Result<ProofLog> {
        ProofLog::drup(File::create(path)?)
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub(crate) fn log_learnt_clause(&mut self, literals: &[Literal]) -> std::io::Result<()> {
        self.write_clause("", literals)
    }

    pub(crate) fn log_deletion(&mut self, literals: &[Literal]) -> std::io::Result<()> {
        self.write_clause("d ", literals)
    }

    /// Writes the `0` line. Only the first call writes anything.
    pub(crate) fn log_contradiction(&mut self) -> std::io::Result<()> {
        if self.contradiction_logged {
            return Ok(());
        }
        self.contradiction_logged = true;

        if let Some(writer) = self.writer.as_mut() {
            writeln!(writer, "0")?;
            writer.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }

    fn write_clause(&mut self, prefix: &str, literals: &[Literal]) -> std::io::Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };

        write!(writer, "{prefix}")?;
        for literal in literals {
            write!(writer, "{literal} ")?;
        }
        writeln!(writer, "0")
    }
}
