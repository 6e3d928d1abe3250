//! Policy core for a clip-launching pattern tracker.
//!
//! A live set holds two top-level group tracks: a devices group whose clips
//! make sound, and a patterns group whose clips only carry names. Whenever a
//! pattern clip starts playing, the device clip with the same name is
//! launched; when it stops, the device track is stopped. This crate holds the
//! bookkeeping and decision logic for that, with the host reached only
//! through the [`TrackerHost`] trait.
//!
//! # Features
//!
//! - **Topology**: Scan the devices and patterns groups within fixed bank sizes
//! - **Name Mapping**: Keep a clip-name to device-slot table current
//! - **Propagation**: Turn pattern slot play-state changes into launches and stops
//! - **Stop Commands**: Pattern clips named `"[stop]Track"` stop a device track
//! - **Simulation**: An in-memory host for tests and scenario replay
//!
//! # Example
//!
//! ```rust
//! use pattern_tracker_core::sim::{SimHost, SimSlot, SimTrack};
//! use pattern_tracker_core::{PatternTracker, TrackerConfig, TrackAddress, TrackSlotAddress};
//!
//! let mut host = SimHost::new(vec![
//!     SimTrack::group("Devices", vec![SimTrack::track("Drums", vec![SimSlot::clip("beat")])]),
//!     SimTrack::group("Patterns", vec![SimTrack::track("A", vec![
//!         SimSlot::clip("beat"),
//!         SimSlot::clip("[stop]Drums"),
//!     ])]),
//! ]);
//! let mut tracker = PatternTracker::new(TrackerConfig::default(), true);
//! tracker.remap(&mut host);
//!
//! let event = host.set_slot_playing(TrackSlotAddress::new(1, 0, 0), true).unwrap();
//! tracker.handle(&mut host, event);
//! assert_eq!(host.launches(), vec![TrackSlotAddress::new(0, 0, 0)]);
//!
//! let event = host.set_slot_playing(TrackSlotAddress::new(1, 0, 1), true).unwrap();
//! tracker.handle(&mut host, event);
//! assert_eq!(host.stops(), vec![TrackAddress::new(0, 0)]);
//! ```

mod address;
mod config;
mod error;
mod host;
mod mapping;
mod state;
mod stop_command;
mod tracker;

/// In-memory host used by tests and the scenario runner.
pub mod sim;

/// Scanning of the devices and patterns groups.
pub mod topology;

pub use address::{TrackAddress, TrackSlotAddress};
pub use config::{
    BankSizes, DEFAULT_DEVICES_GROUP, DEFAULT_PATTERNS_GROUP, DEFAULT_STOP_KEYWORD, GroupNames,
    TrackerConfig,
};
pub use error::{HostError, StopCommandError};
pub use host::{HostEvent, SlotInfo, TrackInfo, TrackerHost};
pub use mapping::{DeviceSlotBinding, MappingChange, NameMappingTable};
pub use state::{PatternSlotState, PatternStateTable, PlayState, StateSummary};
pub use stop_command::{is_stop_command, parse_stop_command};
pub use topology::{GroupRole, Topology};
pub use tracker::{PatternTracker, RemapReport};
