//! Logging setup.
//!
//! Installs a `tracing` subscriber that writes to a daily rolling log file
//! (through a non-blocking writer) and, optionally, to stderr. `RUST_LOG`
//! overrides the configured level.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Prefix of the rolling log files (`arplayground.log.YYYY-MM-DD`).
pub const LOG_FILE_PREFIX: &str = "arplayground.log";

/// Errors that can occur while installing the logger.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory could not be created.
    #[error("Failed to create log directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A global subscriber is already installed.
    #[error("Failed to install logger: {0}")]
    Install(String),
}

/// Logging settings (`[logging]` section of the config file).
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Directory for rolling log files.
    pub directory: PathBuf,
    /// Default filter level when `RUST_LOG` is unset.
    pub level: String,
    /// Also log to stderr.
    pub console: bool,
}

impl LoggingConfig {
    /// File-only logging at `info` into `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            level: "info".to_string(),
            console: false,
        }
    }

    /// Enable or disable stderr output.
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Set the default filter level.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

/// Keeps the background log writer alive; drop it at exit to flush.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _worker: WorkerGuard,
    directory: PathBuf,
}

impl LoggingGuard {
    /// Directory the log files are written to.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Install the global `tracing` subscriber.
///
/// # Errors
///
/// Fails if the log directory can't be created or a subscriber is already
/// installed.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    fs::create_dir_all(&config.directory).map_err(|source| LoggingError::CreateDir {
        path: config.directory.clone(),
        source,
    })?;

    let appender = tracing_appender::rolling::daily(&config.directory, LOG_FILE_PREFIX);
    let (writer, worker) = tracing_appender::non_blocking(appender);

    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_timer(timer.clone())
        .with_writer(writer);

    let console_layer = config.console.then(|| {
        fmt::layer()
            .with_target(false)
            .with_timer(timer)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(LoggingGuard {
        _worker: worker,
        directory: config.directory.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_logging_config_builders() {
        let config = LoggingConfig::new("/tmp/logs")
            .with_console(true)
            .with_level("debug");
        assert_eq!(config.directory, PathBuf::from("/tmp/logs"));
        assert!(config.console);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_init_logging_creates_directory() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");

        let guard = init_logging(&LoggingConfig::new(&log_dir)).unwrap();
        assert!(log_dir.is_dir());
        assert_eq!(guard.directory(), log_dir.as_path());

        tracing::info!("logging initialized");

        // A second subscriber can't be installed in the same process
        assert!(matches!(
            init_logging(&LoggingConfig::new(&log_dir)),
            Err(LoggingError::Install(_))
        ));
    }
}
