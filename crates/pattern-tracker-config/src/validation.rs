//! Bounds checking for [`Settings`](crate::Settings).
//!
//! The bounds match what the host's preference panel accepts.
//!
//! # Example
//!
//! ```rust
//! use pattern_tracker_config::{Settings, ValidationError, validate_settings};
//!
//! let mut settings = Settings::default();
//! assert!(validate_settings(&settings).is_ok());
//!
//! settings.slots_per_track = 0;
//! assert!(matches!(
//!     validate_settings(&settings),
//!     Err(ValidationError::OutOfRange { field: "slots_per_track", .. })
//! ));
//! ```

use std::ops::RangeInclusive;

use thiserror::Error;

use crate::Settings;

/// Accepted number of top-level tracks scanned.
pub const ROOT_GROUPS_RANGE: RangeInclusive<usize> = 1..=200;

/// Accepted number of child tracks per group.
pub const TRACKS_PER_GROUP_RANGE: RangeInclusive<usize> = 1..=200;

/// Accepted number of clip slots per track.
pub const SLOTS_PER_TRACK_RANGE: RangeInclusive<usize> = 1..=500;

/// Longest accepted stop keyword, in characters.
pub const MAX_STOP_KEYWORD_LEN: usize = 1024;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Numeric setting out of range.
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the setting.
        field: &'static str,
        /// The rejected value.
        value: usize,
        /// Minimum allowed value.
        min: usize,
        /// Maximum allowed value.
        max: usize,
    },

    /// A name setting is empty.
    #[error("'{field}' must not be empty")]
    EmptyName {
        /// Name of the setting.
        field: &'static str,
    },

    /// Stop keyword longer than [`MAX_STOP_KEYWORD_LEN`].
    #[error("'stop_keyword' is {len} characters long, at most {max} allowed")]
    KeywordTooLong {
        /// Length of the rejected keyword.
        len: usize,
        /// Maximum length.
        max: usize,
    },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks every bound, reporting the first violation.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    check_range("root_groups", settings.root_groups, &ROOT_GROUPS_RANGE)?;
    check_range("tracks_per_group", settings.tracks_per_group, &TRACKS_PER_GROUP_RANGE)?;
    check_range("slots_per_track", settings.slots_per_track, &SLOTS_PER_TRACK_RANGE)?;

    check_name("stop_keyword", &settings.stop_keyword)?;
    let len = settings.stop_keyword.chars().count();
    if len > MAX_STOP_KEYWORD_LEN {
        return Err(ValidationError::KeywordTooLong {
            len,
            max: MAX_STOP_KEYWORD_LEN,
        });
    }

    check_name("devices_group", &settings.devices_group)?;
    check_name("patterns_group", &settings.patterns_group)?;
    Ok(())
}

fn check_range(
    field: &'static str,
    value: usize,
    range: &RangeInclusive<usize>,
) -> ValidationResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

fn check_name(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        Err(ValidationError::EmptyName { field })
    } else {
        Ok(())
    }
}
