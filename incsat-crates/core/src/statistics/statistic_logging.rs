use std::fmt::Display;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

/// The destination of statistic lines, set once per process.
struct StatisticLogger {
    prefix: &'static str,
    casing: Option<Case>,
    writer: Box<dyn Write + Send>,
}

static STATISTIC_LOGGER: OnceLock<Mutex<StatisticLogger>> = OnceLock::new();

/// Routes statistics to `writer` (stdout when `None`), as `{prefix} {name}={value}` lines. Names
/// are written in `snake_case` unless `casing` asks for another case.
///
/// Only the first call has an effect; it returns whether this call configured the logger. Until
/// then, logging statistics does nothing.
pub fn configure_statistic_logging(
    prefix: &'static str,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send>>,
) -> bool {
    let mut configured = false;
    let _ = STATISTIC_LOGGER.get_or_init(|| {
        configured = true;
        Mutex::new(StatisticLogger {
            prefix,
            casing,
            writer: writer.unwrap_or_else(|| Box::new(std::io::stdout())),
        })
    });
    configured
}

pub fn should_log_statistics() -> bool {
    STATISTIC_LOGGER.get().is_some()
}

/// Statistics which are written together, so that the blocks of different sessions do not
/// interleave.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatisticBlock {
    entries: Vec<(&'static str, String)>,
}

impl StatisticBlock {
    /// Appends the statistic `name`, given in `snake_case`.
    pub fn add(&mut self, name: &'static str, value: impl Display) -> &mut Self {
        self.entries.push((name, value.to_string()));
        self
    }

    pub fn entries(&self) -> &[(&'static str, String)] {
        &self.entries
    }

    /// Writes the block through the configured logger, if there is one.
    pub fn log(&self) {
        let Some(logger) = STATISTIC_LOGGER.get() else {
            return;
        };
        let Ok(mut logger) = logger.lock() else {
            return;
        };

        let StatisticLogger {
            prefix,
            casing,
            writer,
        } = &mut *logger;
        let _ = self.write_to(writer, prefix, *casing);
    }

    fn write_to(
        &self,
        writer: &mut dyn Write,
        prefix: &str,
        casing: Option<Case>,
    ) -> std::io::Result<()> {
        for (name, value) in &self.entries {
            match casing {
                Some(casing) => writeln!(writer, "{prefix} {}={value}", name.to_case(casing))?,
                None => writeln!(writer, "{prefix} {name}={value}")?,
            }
        }
        writer.flush()
    }
}
