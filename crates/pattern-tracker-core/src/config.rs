//! Runtime configuration consumed by the tracker.
//!
//! These are plain values. Loading them from disk and validating their
//! bounds is the job of `pattern-tracker-config`.

/// Default prefix that turns a pattern slot into a stop command.
pub const DEFAULT_STOP_KEYWORD: &str = "[stop]";

/// Default name of the group holding the clips that get triggered.
pub const DEFAULT_DEVICES_GROUP: &str = "Devices";

/// Default name of the group whose clips drive the triggering.
pub const DEFAULT_PATTERNS_GROUP: &str = "Patterns";

/// Sizes of the host track banks the tracker observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankSizes {
    /// Number of top-level tracks scanned for the two named groups.
    pub root_groups: usize,
    /// Number of child tracks observed per group.
    pub tracks_per_group: usize,
    /// Number of clip slots observed per child track.
    pub slots_per_track: usize,
}

impl BankSizes {
    /// Creates bank sizes.
    pub const fn new(root_groups: usize, tracks_per_group: usize, slots_per_track: usize) -> Self {
        Self {
            root_groups,
            tracks_per_group,
            slots_per_track,
        }
    }
}

impl Default for BankSizes {
    fn default() -> Self {
        Self::new(25, 25, 25)
    }
}

/// Names of the two top-level group tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNames {
    /// Group whose child slots are launched ("Devices").
    pub devices: String,
    /// Group whose child slots trigger launches ("Patterns").
    pub patterns: String,
}

impl Default for GroupNames {
    fn default() -> Self {
        Self {
            devices: DEFAULT_DEVICES_GROUP.to_string(),
            patterns: DEFAULT_PATTERNS_GROUP.to_string(),
        }
    }
}

/// Everything a [`PatternTracker`](crate::PatternTracker) needs to start.
///
/// # Example
///
/// ```rust
/// use pattern_tracker_core::{BankSizes, TrackerConfig};
///
/// let config = TrackerConfig::default()
///     .with_banks(BankSizes::new(4, 8, 16))
///     .with_stop_keyword("!stop ")
///     .with_keep_devices_playing(true);
///
/// assert_eq!(config.banks.slots_per_track, 16);
/// assert_eq!(config.groups.devices, "Devices");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Bank sizes used when scanning.
    pub banks: BankSizes,
    /// Names of the devices and patterns groups.
    pub groups: GroupNames,
    /// Prefix that marks a pattern slot as a stop command.
    pub stop_keyword: String,
    /// When true, a pattern slot stopping leaves its device clip playing.
    pub keep_devices_playing: bool,
}

impl TrackerConfig {
    /// Builder: set bank sizes.
    pub fn with_banks(mut self, banks: BankSizes) -> Self {
        self.banks = banks;
        self
    }

    /// Builder: set group names.
    pub fn with_groups(mut self, devices: impl Into<String>, patterns: impl Into<String>) -> Self {
        self.groups = GroupNames {
            devices: devices.into(),
            patterns: patterns.into(),
        };
        self
    }

    /// Builder: set the stop keyword.
    pub fn with_stop_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.stop_keyword = keyword.into();
        self
    }

    /// Builder: set the keep-devices-playing flag.
    pub fn with_keep_devices_playing(mut self, keep: bool) -> Self {
        self.keep_devices_playing = keep;
        self
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            banks: BankSizes::default(),
            groups: GroupNames::default(),
            stop_keyword: DEFAULT_STOP_KEYWORD.to_string(),
            keep_devices_playing: false,
        }
    }
}
