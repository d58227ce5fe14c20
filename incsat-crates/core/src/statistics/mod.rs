//! Logging of `name=value` statistic lines with a configurable prefix.

mod statistic_logging;

pub use statistic_logging::configure_statistic_logging;
pub use statistic_logging::should_log_statistics;
pub use statistic_logging::StatisticBlock;
