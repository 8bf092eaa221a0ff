//! The `config.ini` file.

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::debug;

use super::keys::ConfigKey;
use super::{config_dir, config_file_path, ConfigError, ConfigResult};
use crate::game::PlacementConfig;
use crate::logging::LoggingConfig;
use crate::session::{SurfaceTrackerConfig, DEFAULT_CHANGE_CHANNEL_CAPACITY};
use crate::surface::UnknownUpdatePolicy;

/// `[tracking]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSettings {
    pub unknown_update: UnknownUpdatePolicy,
    pub change_channel_capacity: usize,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            unknown_update: UnknownUpdatePolicy::default(),
            change_channel_capacity: DEFAULT_CHANGE_CHANNEL_CAPACITY,
        }
    }
}

/// Contents of `config.ini`.
///
/// Missing sections and keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub tracking: TrackingSettings,
    pub placement: PlacementConfig,
    pub logging: LoggingConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            tracking: TrackingSettings::default(),
            placement: PlacementConfig::default(),
            logging: LoggingConfig::new(config_dir().join("logs")),
        }
    }
}

impl ConfigFile {
    /// Load the config file from its default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> ConfigResult<Self> {
        let path = config_file_path();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load a config file from `path`.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(io) => ConfigError::Io(io),
            ini::Error::Parse(parse) => ConfigError::Parse {
                path: path.to_path_buf(),
                reason: parse.to_string(),
            },
        })?;

        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Save to the default location, creating the directory if needed.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories if needed.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini.write_to_file(path)?;

        debug!(path = %path.display(), "Saved config file");
        Ok(())
    }

    /// Surface tracker settings derived from this file.
    pub fn tracker_config(&self) -> SurfaceTrackerConfig {
        SurfaceTrackerConfig {
            unknown_update: self.tracking.unknown_update,
            change_channel_capacity: self.tracking.change_channel_capacity,
        }
    }
}

/// Expand a leading `~` to the home directory.
pub(crate) fn expand_home(value: &str) -> PathBuf {
    match value.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches('/')),
            None => PathBuf::from(value),
        },
        _ => PathBuf::from(value),
    }
}
