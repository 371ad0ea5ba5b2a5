//! Logging infrastructure for the pipeline.
//!
//! Progress lines go to stdout; a daily-rolling file under `logs/` keeps a
//! record of past runs. The default level is `info`, overridable with
//! `RUST_LOG`.
//!
//! ```no_run
//! brewlake::logging::init().expect("Failed to initialize logging");
//! tracing::info!("run started");
//! ```

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Directory holding the rolling log files, relative to the working directory.
pub const LOG_DIR: &str = "logs";

/// Initializes console and file logging.
///
/// Log files rotate daily (`brewlake.<date>.log`), keeping 7 old files.
/// Must only be called once per process.
///
/// # Errors
///
/// Returns error if the log directory cannot be created or the file
/// appender fails to build.
pub fn init() -> Result<()> {
    let log_dir = PathBuf::from(LOG_DIR);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(7)
        .filename_prefix("brewlake")
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create log file appender")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let stdout_layer = fmt::layer()
        .with_target(false)
        .without_time()
        .with_level(true);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}
