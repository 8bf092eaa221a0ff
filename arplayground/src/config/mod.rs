//! Configuration file management.
//!
//! Settings live in `~/.arplayground/config.ini`:
//!
//! ```ini
//! [tracking]
//! unknown_update = synthesize
//! change_channel_capacity = 256
//!
//! [placement]
//! insertion_offset = 0.5
//! camera_distance = 0.5
//! sphere_radius = 0.05
//! sphere_mass = 2
//!
//! [logging]
//! directory = ~/.arplayground/logs
//! level = info
//! ```

mod file;
mod keys;

use std::path::PathBuf;

use thiserror::Error;

pub use file::{ConfigFile, TrackingSettings};
pub use keys::ConfigKey;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while reading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading or writing the config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid INI.
    #[error("Failed to parse {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    /// A setting has an unusable value.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// No setting with this name exists.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// Directory holding the config file and, by default, logs.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".arplayground")
}

/// Path of the config file.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.ini")
}
