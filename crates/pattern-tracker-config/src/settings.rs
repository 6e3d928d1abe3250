//! The user settings file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use pattern_tracker_core::{
    BankSizes, DEFAULT_DEVICES_GROUP, DEFAULT_PATTERNS_GROUP, DEFAULT_STOP_KEYWORD, GroupNames,
    TrackerConfig,
};

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_settings};

/// User-editable tracker settings.
///
/// Every field is optional in the file; missing fields take their defaults.
///
/// # TOML Format
///
/// ```toml
/// root_groups = 25
/// tracks_per_group = 25
/// slots_per_track = 25
/// stop_keyword = "[stop]"
/// keep_devices_playing = false
/// devices_group = "Devices"
/// patterns_group = "Patterns"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Top-level tracks scanned for the two groups.
    pub root_groups: usize,

    /// Child tracks observed per group.
    pub tracks_per_group: usize,

    /// Clip slots observed per child track.
    pub slots_per_track: usize,

    /// Prefix that turns a pattern clip into a stop command.
    pub stop_keyword: String,

    /// Leave device clips playing when their pattern clip stops.
    pub keep_devices_playing: bool,

    /// Name of the group holding the triggered clips.
    pub devices_group: String,

    /// Name of the group holding the triggering clips.
    pub patterns_group: String,
}

impl Default for Settings {
    fn default() -> Self {
        let banks = BankSizes::default();
        Self {
            root_groups: banks.root_groups,
            tracks_per_group: banks.tracks_per_group,
            slots_per_track: banks.slots_per_track,
            stop_keyword: DEFAULT_STOP_KEYWORD.to_string(),
            keep_devices_playing: false,
            devices_group: DEFAULT_DEVICES_GROUP.to_string(),
            patterns_group: DEFAULT_PATTERNS_GROUP.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let settings = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load settings from a file, falling back to defaults if it does not exist.
    ///
    /// Any other read or parse failure is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(err) if err.is_not_found() => {
                tracing::debug!(path = %path.as_ref().display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Load settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the settings to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::info!(path = %path.display(), "saved settings");
        Ok(())
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every bound.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_settings(self)
    }

    /// Bank sizes for scanning.
    pub fn bank_sizes(&self) -> BankSizes {
        BankSizes::new(self.root_groups, self.tracks_per_group, self.slots_per_track)
    }

    /// Validate and convert into the tracker's runtime configuration.
    pub fn to_tracker_config(&self) -> Result<TrackerConfig, ConfigError> {
        self.validate()?;
        Ok(TrackerConfig {
            banks: self.bank_sizes(),
            groups: GroupNames {
                devices: self.devices_group.clone(),
                patterns: self.patterns_group.clone(),
            },
            stop_keyword: self.stop_keyword.clone(),
            keep_devices_playing: self.keep_devices_playing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tracker_defaults() {
        let config = Settings::default().to_tracker_config().unwrap();
        assert_eq!(config, TrackerConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let settings = Settings::from_toml("keep_devices_playing = true\nslots_per_track = 8\n").unwrap();
        assert!(settings.keep_devices_playing);
        assert_eq!(settings.slots_per_track, 8);
        assert_eq!(settings.root_groups, 25);
        assert_eq!(settings.stop_keyword, "[stop]");
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let err = Settings::from_toml("root_groups = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn to_toml_contains_every_field() {
        let toml = Settings::default().to_toml().unwrap();
        for key in [
            "root_groups",
            "tracks_per_group",
            "slots_per_track",
            "stop_keyword",
            "keep_devices_playing",
            "devices_group",
            "patterns_group",
        ] {
            assert!(toml.contains(key), "missing {key} in:\n{toml}");
        }
    }

    #[test]
    fn invalid_settings_do_not_convert() {
        let settings = Settings {
            tracks_per_group: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.to_tracker_config(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn custom_values_carry_over() {
        let settings = Settings {
            root_groups: 4,
            tracks_per_group: 8,
            slots_per_track: 16,
            stop_keyword: "off:".to_string(),
            keep_devices_playing: true,
            devices_group: "Synths".to_string(),
            patterns_group: "Seq".to_string(),
        };
        let config = settings.to_tracker_config().unwrap();
        assert_eq!(config.banks, BankSizes::new(4, 8, 16));
        assert_eq!(config.groups.devices, "Synths");
        assert_eq!(config.groups.patterns, "Seq");
        assert_eq!(config.stop_keyword, "off:");
        assert!(config.keep_devices_playing);
    }
}
