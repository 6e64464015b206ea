//! Logging infrastructure.
//!
//! This module provides:
//! - Global `tracing` setup (stderr, optionally a log file)
//! - Per-burn-job loggers with file + callback output
//! - Compact mode with progress filtering
//! - Tail buffer for failure reports
//!
//! # Example
//!
//! ```no_run
//! use subburn_core::logging::{JobLogger, LogConfig};
//!
//! let logger = JobLogger::new("episode_01", "/path/to/logs", LogConfig::default(), None).unwrap();
//!
//! logger.phase("Burn");
//! logger.progress(50);
//! logger.success("Burned 1440 frames");
//! ```

mod job_logger;
mod types;

use std::path::Path;

pub use job_logger::{JobLogger, JobLoggerBuilder};
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name used by `init_tracing_with_file`.
pub const LOG_FILE_NAME: &str = "subburn.log";

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()))
}

/// Initialize the global tracing subscriber.
///
/// Honours `RUST_LOG`, falling back to `default_level`. Output goes to
/// stderr. Should be called once at startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(env_filter(default_level))
        .init();
}

/// Initialize tracing to stderr plus `<log_dir>/subburn.log`.
///
/// The file is written from a background thread; keep the returned guard
/// alive for as long as logging should reach the file.
pub fn init_tracing_with_file(
    default_level: LogLevel,
    log_dir: &Path,
) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false));

    // Already initialized (tests, embedding) is not an error
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(guard)
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
