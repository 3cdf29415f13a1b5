//! Tracing subscriber setup
//!
//! Progress lines go to stdout in a compact human-readable form. When file
//! logging is enabled, the same events are also written as JSON lines to
//! [`LogConfig::file_path`]. A log file that cannot be opened only costs the
//! file output; the run goes on with console logging.

use std::path::Path;

use thiserror::Error;
use tracing::warn;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::config::LogConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {}: {source}", path.display())]
    LogDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// until the process exits.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console_layer = fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stdout);

    let (output, file_error) = file_output(config.file, &config.file_path());
    let (file_layer, guard) = match output {
        Some((writer, guard)) => (
            Some(fmt::layer().json().with_ansi(false).with_writer(writer)),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    if let Some(e) = file_error {
        warn!("File logging disabled: {}", e);
    }

    Ok(guard)
}

/// Opens the JSON log when enabled, handing back the error instead of failing
/// so it can be reported once the subscriber is up
fn file_output(
    enabled: bool,
    path: &Path,
) -> (Option<(NonBlocking, WorkerGuard)>, Option<LoggingError>) {
    if !enabled {
        return (None, None);
    }
    match file_writer(path) {
        Ok(output) => (Some(output), None),
        Err(e) => (None, Some(e)),
    }
}

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::LogDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "freya-updater.log".into());

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}
