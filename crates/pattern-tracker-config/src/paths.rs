//! Platform-specific paths for the settings file.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/pattern-tracker/` (Linux), `~/Library/Application Support/pattern-tracker/` (macOS), `%APPDATA%\pattern-tracker\` (Windows)
//! - **Settings file**: `settings.toml` inside the user config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use pattern_tracker_config::{Settings, paths};
//!
//! let settings = Settings::load_or_default(paths::settings_path()).unwrap();
//! println!("stop keyword: {}", settings.stop_keyword);
//! ```

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "pattern-tracker";

/// File name of the settings file.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the default settings file path.
pub fn settings_path() -> PathBuf {
    user_config_dir().join(SETTINGS_FILE)
}
