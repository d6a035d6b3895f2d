//! tracing subscriber setup for the CLI
//!
//! Diagnostics always go to stderr; stdout is reserved for command results.
//! When `logging.file` is set, the same events are also appended (without ANSI
//! colors) to that file, optionally rotated hourly or daily.

use crate::config::{LogRotation, LoggingOptions};
use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Flushes the file writer's worker thread on drop; lives for the whole process.
static LOG_FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber described by `options`.
///
/// Returns `Ok(())` without changes when a subscriber is already installed.
pub fn init(options: &LoggingOptions) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = level_filter(&options.level)?;

    let file_layer = match options.file.as_deref() {
        Some(path) => Some(
            fmt::layer()
                .with_timer(UtcTime::rfc_3339())
                .with_ansi(false)
                .with_writer(log_file_writer(path, options.rotation)?),
        ),
        None => None,
    };

    let stderr_layer = fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_ansi(options.color)
        .with_writer(io::stderr);

    Registry::default()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {e}")))
}

fn level_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level).map_err(|e| Error::Config(format!("Invalid log level '{level}': {e}")))
}

/// Open `path` for appending, or a rolling appender in its directory.
fn log_file_writer(path: &Path, rotation: Option<LogRotation>) -> Result<NonBlocking> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| {
        Error::Config(format!("Failed to create log directory {}: {e}", dir.display()))
    })?;

    let builder = NonBlockingBuilder::default().lossy(false);
    let (writer, guard) = match rotation {
        None => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    Error::Config(format!("Failed to open log file {}: {e}", path.display()))
                })?;
            builder.finish(file)
        }
        Some(rotation) => {
            let Some(prefix) = path.file_name() else {
                return Err(Error::Config(format!(
                    "Rotated log path '{}' has no file name",
                    path.display()
                )));
            };
            let appender = match rotation {
                LogRotation::Hourly => rolling::hourly(dir, prefix),
                LogRotation::Daily => rolling::daily(dir, prefix),
            };
            builder.finish(appender)
        }
    };

    // Only the first guard is kept.
    let _ = LOG_FILE_GUARD.set(guard);
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_invalid_level_is_config_error() {
        assert!(level_filter("info,pagesqr=debug").is_ok());
        assert!(matches!(level_filter("pagesqr=loud"), Err(Error::Config(_))));
    }

    #[test]
    fn test_rotation_requires_file_name() {
        let result = log_file_writer(Path::new("/"), Some(LogRotation::Daily));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_log_file_directory_is_created() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("logs").join("pagesqr.log");
        log_file_writer(&log_path, None).unwrap();
        assert!(log_path.exists());
    }

    #[test]
    fn test_rolling_writer_uses_parent_directory() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("rolled");
        log_file_writer(&log_dir.join("pagesqr.log"), Some(LogRotation::Hourly)).unwrap();
        assert!(log_dir.is_dir());
    }
}
