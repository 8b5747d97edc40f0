//! Process-wide default logger
//!
//! The default logger is created on first use with an `Info` threshold
//! writing to stdout, and lives until the process exits. [`install`] can
//! replace that configuration as long as nothing has used the default yet.

use super::error::{LoggerError, Result};
use super::log_context::LogContext;
use super::log_level::LogLevel;
use super::logger::Logger;
use std::io::Write;
use std::sync::OnceLock;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger.
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(Logger::default)
}

/// Make `logger` the process-wide logger.
///
/// Fails with [`LoggerError::AlreadyInitialized`] once the default logger has
/// been created, either by an earlier `install` or by first use.
pub fn install(logger: Logger) -> Result<()> {
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_| LoggerError::AlreadyInitialized)
}

pub fn threshold() -> LogLevel {
    default_logger().threshold()
}

pub fn set_threshold(level: LogLevel) {
    default_logger().set_threshold(level);
}

#[track_caller]
pub fn set_threshold_by_name(name: &str) {
    default_logger().set_threshold_by_name(name);
}

pub fn set_output<W: Write + Send + 'static>(writer: W) {
    default_logger().set_output(writer);
}

pub fn is_enabled(ctx: &LogContext, level: LogLevel) -> bool {
    default_logger().is_enabled(ctx, level)
}

pub fn count(level: LogLevel) -> u64 {
    default_logger().count(level)
}

pub fn count_all() -> [u64; LogLevel::COUNT] {
    default_logger().count_all()
}
