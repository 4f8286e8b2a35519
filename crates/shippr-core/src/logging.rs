//! File logging
//!
//! The terminal belongs to the UI, so log lines go to `~/.shippr/logs/cli.log`
//! only, one JSON object per line by default.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Log file name inside the log directory
pub const LOG_FILE_NAME: &str = "cli.log";

/// Installs the global subscriber writing to `log_dir/cli.log`.
///
/// `RUST_LOG` takes precedence over `config.level`; `verbose` forces `debug`.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init(config: &LoggingConfig, log_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let installed = match config.format.as_str() {
        "pretty" => builder.pretty().try_init(),
        _ => builder.json().flatten_event(true).try_init(),
    };
    installed.map_err(|e| Error::config(format!("could not install logger: {e}")))?;

    Ok(guard)
}
