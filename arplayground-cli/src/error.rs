//! CLI error types.

use std::fmt;
use std::io;
use std::path::PathBuf;

use arplayground::config::ConfigError;
use arplayground::logging::LoggingError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Bad command-line input relating to configuration.
    Config(String),

    /// Failed to read or write the config file.
    ConfigFile(ConfigError),

    /// Failed to install the logger.
    Logging(LoggingError),

    /// Failed to read a session script.
    ScriptRead { path: PathBuf, source: io::Error },

    /// A session script is not valid JSON or has unknown steps.
    ScriptParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Config file error: {}", e),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::ScriptRead { path, source } => {
                write!(f, "Failed to read script {}: {}", path.display(), source)
            }
            CliError::ScriptParse { path, source } => {
                write!(f, "Invalid script {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::ScriptRead { source, .. } => Some(source),
            CliError::ScriptParse { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_display() {
        let err = CliError::Config("bad key".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad key");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_from_config_error() {
        let err: CliError = ConfigError::UnknownKey("nope.nope".to_string()).into();
        assert!(matches!(err, CliError::ConfigFile(_)));
        assert!(err.to_string().contains("nope.nope"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_script_read_display() {
        let err = CliError::ScriptRead {
            path: PathBuf::from("/tmp/missing.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/tmp/missing.json"));
    }
}
