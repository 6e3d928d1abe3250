//! Bank positions of tracks and clip slots in the observed topology.
//!
//! Addresses are plain index tuples into the host's track banks. They stay
//! valid only while the host keeps its bank ordering; a remap re-reads every
//! position from scratch.

use core::fmt;

/// Position of a child track: `(group_index, child_index)`.
///
/// # Example
///
/// ```rust
/// use pattern_tracker_core::{TrackAddress, TrackSlotAddress};
///
/// let track = TrackAddress::new(1, 3);
/// let slot = track.slot(0);
/// assert_eq!(slot, TrackSlotAddress::new(1, 3, 0));
/// assert_eq!(slot.track(), track);
/// assert_eq!(track.to_string(), "[1, 3]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackAddress {
    /// Index of the top-level group track in the root bank.
    pub group: usize,
    /// Index of the child track inside the group's bank.
    pub child: usize,
}

impl TrackAddress {
    /// Creates a track address.
    #[inline]
    pub const fn new(group: usize, child: usize) -> Self {
        Self { group, child }
    }

    /// Returns the address of a clip slot on this track.
    #[inline]
    pub const fn slot(self, slot: usize) -> TrackSlotAddress {
        TrackSlotAddress::new(self.group, self.child, slot)
    }
}

impl fmt::Display for TrackAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.group, self.child)
    }
}

/// Position of a clip slot: `(group_index, child_index, slot_index)`.
///
/// This is the stable key for both the device mapping and the pattern
/// state table. Live host handles are never compared for identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackSlotAddress {
    /// Index of the top-level group track in the root bank.
    pub group: usize,
    /// Index of the child track inside the group's bank.
    pub child: usize,
    /// Index of the clip slot in the child track's slot bank.
    pub slot: usize,
}

impl TrackSlotAddress {
    /// Creates a slot address.
    #[inline]
    pub const fn new(group: usize, child: usize, slot: usize) -> Self {
        Self { group, child, slot }
    }

    /// Returns the address of the track owning this slot.
    #[inline]
    pub const fn track(self) -> TrackAddress {
        TrackAddress::new(self.group, self.child)
    }
}

impl fmt::Display for TrackSlotAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.group, self.child, self.slot)
    }
}
