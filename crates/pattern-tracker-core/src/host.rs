//! The boundary between the tracker and the host application.
//!
//! The host is consulted through [`TrackerHost`] for the live state of
//! tracks and clip slots, and receives exactly two commands: launch a slot
//! and stop a track. Everything the host observes flows back in as a
//! [`HostEvent`].
//!
//! # Thread Safety
//!
//! The host delivers one event at a time and expects each handler to return
//! promptly. Nothing here is `Sync`-bound; an integration that receives
//! callbacks on several threads must serialize them before dispatch.

use crate::{BankSizes, HostError, TrackAddress, TrackSlotAddress};

/// Live state of a track at a bank position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackInfo {
    /// Display name.
    pub name: String,
    /// True if the track contains child tracks.
    pub is_group: bool,
    /// False once the underlying track is gone; the bank position may outlive it.
    pub exists: bool,
}

impl TrackInfo {
    /// Creates info for an existing, non-group track.
    pub fn track(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_group: false,
            exists: true,
        }
    }

    /// Creates info for an existing group track.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_group: true,
            exists: true,
        }
    }
}

/// Live state of a clip slot at a bank position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotInfo {
    /// Display name of the clip in the slot (empty when unnamed or empty).
    pub name: String,
    /// True if the slot holds a clip.
    pub has_content: bool,
    /// True while the slot's clip is playing.
    pub is_playing: bool,
    /// False once the underlying slot is gone.
    pub exists: bool,
}

/// Queries and commands the tracker issues against the host.
///
/// Every query returns `None` when the host has nothing at that bank
/// position. An existing position may still report `exists == false`.
///
/// # Example
///
/// ```rust,ignore
/// use pattern_tracker_core::{TrackerHost, TrackInfo, SlotInfo, TrackAddress, TrackSlotAddress, HostError};
///
/// struct Bridge { /* handles into the host's object graph */ }
///
/// impl TrackerHost for Bridge {
///     fn group_track(&self, group: usize) -> Option<TrackInfo> { /* read root bank */ }
///     fn child_track(&self, track: TrackAddress) -> Option<TrackInfo> { /* read child bank */ }
///     fn slot(&self, slot: TrackSlotAddress) -> Option<SlotInfo> { /* read slot bank */ }
///     fn launch_slot(&mut self, slot: TrackSlotAddress) -> Result<(), HostError> { /* launch, no quantization */ }
///     fn stop_track(&mut self, track: TrackAddress) -> Result<(), HostError> { /* stop */ }
/// }
/// ```
pub trait TrackerHost {
    /// Returns the top-level track at `group` in the root bank.
    fn group_track(&self, group: usize) -> Option<TrackInfo>;

    /// Returns the child track at `track`.
    fn child_track(&self, track: TrackAddress) -> Option<TrackInfo>;

    /// Returns the clip slot at `slot`.
    fn slot(&self, slot: TrackSlotAddress) -> Option<SlotInfo>;

    /// Launches the clip in `slot` immediately, without launch quantization.
    fn launch_slot(&mut self, slot: TrackSlotAddress) -> Result<(), HostError>;

    /// Stops every clip playing on `track`.
    fn stop_track(&mut self, track: TrackAddress) -> Result<(), HostError>;

    /// Shows a transient notification to the user.
    fn notify(&mut self, _message: &str) {}

    /// Returns true if the child track at `track` currently exists.
    fn track_exists(&self, track: TrackAddress) -> bool {
        self.child_track(track).is_some_and(|t| t.exists)
    }

    /// Returns the current name of the child track at `track`.
    fn track_name(&self, track: TrackAddress) -> Option<String> {
        self.child_track(track).filter(|t| t.exists).map(|t| t.name)
    }
}

/// A change observed by the host and delivered to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Global transport started (`true`) or stopped (`false`).
    TransportChanged(bool),

    /// A clip slot's display name changed.
    SlotNameChanged {
        /// The slot that changed.
        slot: TrackSlotAddress,
        /// Its new name.
        name: String,
    },

    /// A clip slot gained or lost its clip.
    SlotContentChanged {
        /// The slot that changed.
        slot: TrackSlotAddress,
        /// Whether it now holds a clip.
        has_content: bool,
    },

    /// A clip slot started or stopped playing.
    SlotPlayingChanged {
        /// The slot that changed.
        slot: TrackSlotAddress,
        /// Whether it is now playing.
        playing: bool,
    },

    /// The user pressed "Remap Clips".
    RemapRequested,

    /// The stop keyword preference changed.
    StopKeywordChanged(String),

    /// The "keep devices playing on pattern stop" setting changed.
    KeepDevicesPlayingChanged(bool),

    /// A bank size preference changed.
    BankSizesChanged(BankSizes),
}

impl HostEvent {
    /// Returns the slot this event concerns, if any.
    pub fn slot(&self) -> Option<TrackSlotAddress> {
        match self {
            HostEvent::SlotNameChanged { slot, .. }
            | HostEvent::SlotContentChanged { slot, .. }
            | HostEvent::SlotPlayingChanged { slot, .. } => Some(*slot),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OneTrack {
        info: TrackInfo,
    }

    impl TrackerHost for OneTrack {
        fn group_track(&self, _group: usize) -> Option<TrackInfo> {
            None
        }

        fn child_track(&self, track: TrackAddress) -> Option<TrackInfo> {
            (track == TrackAddress::new(0, 0)).then(|| self.info.clone())
        }

        fn slot(&self, _slot: TrackSlotAddress) -> Option<SlotInfo> {
            None
        }

        fn launch_slot(&mut self, _slot: TrackSlotAddress) -> Result<(), HostError> {
            Ok(())
        }

        fn stop_track(&mut self, _track: TrackAddress) -> Result<(), HostError> {
            Ok(())
        }
    }

    #[test]
    fn track_name_hides_deleted_tracks() {
        let mut host = OneTrack {
            info: TrackInfo::track("Bass"),
        };
        assert!(host.track_exists(TrackAddress::new(0, 0)));
        assert_eq!(host.track_name(TrackAddress::new(0, 0)).as_deref(), Some("Bass"));

        host.info.exists = false;
        assert!(!host.track_exists(TrackAddress::new(0, 0)));
        assert_eq!(host.track_name(TrackAddress::new(0, 0)), None);
        assert_eq!(host.track_name(TrackAddress::new(0, 1)), None);
    }

    #[test]
    fn event_slot_accessor() {
        let slot = TrackSlotAddress::new(0, 1, 2);
        let event = HostEvent::SlotPlayingChanged {
            slot,
            playing: true,
        };
        assert_eq!(event.slot(), Some(slot));
        assert_eq!(HostEvent::RemapRequested.slot(), None);
    }
}
