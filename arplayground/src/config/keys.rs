//! Typed access to individual configuration settings.
//!
//! Every setting in `config.ini` has a [`ConfigKey`]. Keys are addressed as
//! `section.key` (e.g. `placement.sphere_mass`) and validate values on `set`,
//! which lets the file loader and the CLI `config set` command share one
//! parsing path.

use std::str::FromStr;

use super::file::{expand_home, ConfigFile};
use super::{ConfigError, ConfigResult};
use crate::surface::UnknownUpdatePolicy;

/// A single configuration setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    TrackingUnknownUpdate,
    TrackingChangeChannelCapacity,
    PlacementInsertionOffset,
    PlacementCameraDistance,
    PlacementSphereRadius,
    PlacementSphereMass,
    LoggingDirectory,
    LoggingLevel,
}

const ALL_KEYS: &[ConfigKey] = &[
    ConfigKey::TrackingUnknownUpdate,
    ConfigKey::TrackingChangeChannelCapacity,
    ConfigKey::PlacementInsertionOffset,
    ConfigKey::PlacementCameraDistance,
    ConfigKey::PlacementSphereRadius,
    ConfigKey::PlacementSphereMass,
    ConfigKey::LoggingDirectory,
    ConfigKey::LoggingLevel,
];

impl ConfigKey {
    /// Every key, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        ALL_KEYS
    }

    /// INI section the key lives in.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::TrackingUnknownUpdate | ConfigKey::TrackingChangeChannelCapacity => {
                "tracking"
            }
            ConfigKey::PlacementInsertionOffset
            | ConfigKey::PlacementCameraDistance
            | ConfigKey::PlacementSphereRadius
            | ConfigKey::PlacementSphereMass => "placement",
            ConfigKey::LoggingDirectory | ConfigKey::LoggingLevel => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::TrackingUnknownUpdate => "unknown_update",
            ConfigKey::TrackingChangeChannelCapacity => "change_channel_capacity",
            ConfigKey::PlacementInsertionOffset => "insertion_offset",
            ConfigKey::PlacementCameraDistance => "camera_distance",
            ConfigKey::PlacementSphereRadius => "sphere_radius",
            ConfigKey::PlacementSphereMass => "sphere_mass",
            ConfigKey::LoggingDirectory => "directory",
            ConfigKey::LoggingLevel => "level",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value of this setting, formatted as it appears in the file.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::TrackingUnknownUpdate => config.tracking.unknown_update.to_string(),
            ConfigKey::TrackingChangeChannelCapacity => {
                config.tracking.change_channel_capacity.to_string()
            }
            ConfigKey::PlacementInsertionOffset => config.placement.insertion_offset.to_string(),
            ConfigKey::PlacementCameraDistance => config.placement.camera_distance.to_string(),
            ConfigKey::PlacementSphereRadius => config.placement.sphere_radius.to_string(),
            ConfigKey::PlacementSphereMass => config.placement.sphere_mass.to_string(),
            ConfigKey::LoggingDirectory => config.logging.directory.display().to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
        }
    }

    /// Validate `value` and store it in `config`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> ConfigResult<()> {
        let value = value.trim();
        match self {
            ConfigKey::TrackingUnknownUpdate => {
                config.tracking.unknown_update = value
                    .parse::<UnknownUpdatePolicy>()
                    .map_err(|reason| self.invalid(value, reason))?;
            }
            ConfigKey::TrackingChangeChannelCapacity => {
                let capacity: usize = value
                    .parse()
                    .map_err(|_| self.invalid(value, "expected a positive integer"))?;
                if capacity == 0 {
                    return Err(self.invalid(value, "must be at least 1"));
                }
                config.tracking.change_channel_capacity = capacity;
            }
            ConfigKey::PlacementInsertionOffset => {
                config.placement.insertion_offset = self.parse_quantity(value, true)?;
            }
            ConfigKey::PlacementCameraDistance => {
                config.placement.camera_distance = self.parse_quantity(value, false)?;
            }
            ConfigKey::PlacementSphereRadius => {
                config.placement.sphere_radius = self.parse_quantity(value, false)?;
            }
            ConfigKey::PlacementSphereMass => {
                config.placement.sphere_mass = self.parse_quantity(value, false)?;
            }
            ConfigKey::LoggingDirectory => {
                if value.is_empty() {
                    return Err(self.invalid(value, "directory must not be empty"));
                }
                config.logging.directory = expand_home(value);
            }
            ConfigKey::LoggingLevel => {
                value
                    .parse::<tracing::Level>()
                    .map_err(|_| self.invalid(value, "expected trace, debug, info, warn or error"))?;
                config.logging.level = value.to_lowercase();
            }
        }
        Ok(())
    }

    /// Parse a finite, non-negative quantity; zero allowed only if `allow_zero`.
    fn parse_quantity(&self, value: &str, allow_zero: bool) -> ConfigResult<f32> {
        let parsed: f32 = value
            .parse()
            .map_err(|_| self.invalid(value, "expected a number"))?;
        if !parsed.is_finite() || parsed < 0.0 || (!allow_zero && parsed == 0.0) {
            let reason = if allow_zero {
                "must be zero or positive"
            } else {
                "must be positive"
            };
            return Err(self.invalid(value, reason));
        }
        Ok(parsed)
    }

    fn invalid(&self, value: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        assert_eq!(
            "placement.sphere_mass".parse::<ConfigKey>().unwrap(),
            ConfigKey::PlacementSphereMass
        );
        assert_eq!(
            "Tracking.Unknown_Update".parse::<ConfigKey>().unwrap(),
            ConfigKey::TrackingUnknownUpdate
        );
        assert!(matches!(
            "placement.colour".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_every_key_roundtrips_through_name() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut config = ConfigFile::default();
        ConfigKey::PlacementSphereRadius
            .set(&mut config, "0.1")
            .unwrap();
        ConfigKey::TrackingUnknownUpdate
            .set(&mut config, "reject")
            .unwrap();
        ConfigKey::LoggingLevel.set(&mut config, "DEBUG").unwrap();

        assert_eq!(ConfigKey::PlacementSphereRadius.get(&config), "0.1");
        assert_eq!(ConfigKey::TrackingUnknownUpdate.get(&config), "reject");
        assert_eq!(ConfigKey::LoggingLevel.get(&config), "debug");
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = ConfigFile::default();
        let before = config.clone();

        assert!(ConfigKey::PlacementSphereMass.set(&mut config, "0").is_err());
        assert!(ConfigKey::PlacementCameraDistance.set(&mut config, "-1").is_err());
        assert!(ConfigKey::PlacementSphereRadius.set(&mut config, "big").is_err());
        assert!(ConfigKey::TrackingChangeChannelCapacity
            .set(&mut config, "0")
            .is_err());
        assert!(ConfigKey::TrackingUnknownUpdate.set(&mut config, "drop").is_err());
        assert!(ConfigKey::LoggingLevel.set(&mut config, "loud").is_err());

        assert_eq!(config, before);
    }

    #[test]
    fn test_insertion_offset_allows_zero() {
        let mut config = ConfigFile::default();
        ConfigKey::PlacementInsertionOffset
            .set(&mut config, "0")
            .unwrap();
        assert_eq!(config.placement.insertion_offset, 0.0);
    }

    #[test]
    fn test_invalid_value_message_names_key() {
        let mut config = ConfigFile::default();
        let err = ConfigKey::PlacementSphereMass
            .set(&mut config, "-2")
            .unwrap_err();
        assert!(err.to_string().contains("placement.sphere_mass"));
    }
}
