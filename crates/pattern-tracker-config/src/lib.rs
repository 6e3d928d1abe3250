//! Settings management for the pattern tracker.
//!
//! This crate owns the user-editable settings file: loading and saving it as
//! TOML, checking its bounds, locating it on each platform, and turning it
//! into the core crate's [`TrackerConfig`](pattern_tracker_core::TrackerConfig).
//!
//! # Features
//!
//! - **Settings File**: Load and save settings from TOML, with defaults for missing fields
//! - **Validation**: Bank sizes and names checked against the preference panel's bounds
//! - **Paths**: Platform-specific config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use pattern_tracker_config::{Settings, settings_path};
//!
//! let mut settings = Settings::load_or_default(settings_path()).unwrap();
//! settings.keep_devices_playing = true;
//! settings.save(settings_path()).unwrap();
//!
//! let config = settings.to_tracker_config().unwrap();
//! assert!(config.keep_devices_playing);
//! ```

mod error;
mod settings;

/// Platform-specific paths for the settings file.
pub mod paths;

/// Settings validation.
pub mod validation;

pub use error::ConfigError;
pub use paths::{SETTINGS_FILE, settings_path, user_config_dir};
pub use settings::Settings;
pub use validation::{
    MAX_STOP_KEYWORD_LEN, ROOT_GROUPS_RANGE, SLOTS_PER_TRACK_RANGE, TRACKS_PER_GROUP_RANGE,
    ValidationError, ValidationResult, validate_settings,
};
