//! Per-slot playback state for the patterns group.

use core::fmt;
use std::collections::{BTreeMap, BTreeSet};

use crate::TrackSlotAddress;

/// Observed play state of a pattern slot.
///
/// `Unknown` means the host has not reported the slot yet. The first report
/// only sets a baseline: a slot first seen stopped does nothing, a slot
/// first seen playing is treated like a fresh start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayState {
    /// Never observed.
    #[default]
    Unknown,
    /// Observed not playing.
    Stopped,
    /// Observed playing.
    Playing,
}

impl PlayState {
    /// Maps a host `is_playing` value to a known state.
    #[inline]
    pub const fn from_playing(playing: bool) -> Self {
        if playing {
            PlayState::Playing
        } else {
            PlayState::Stopped
        }
    }

    /// Returns true for [`PlayState::Playing`].
    #[inline]
    pub const fn is_playing(self) -> bool {
        matches!(self, PlayState::Playing)
    }
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlayState::Unknown => "unknown",
            PlayState::Stopped => "stopped",
            PlayState::Playing => "playing",
        })
    }
}

/// What the tracker remembers about one pattern slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSlotState {
    /// Last observed clip name (empty until known).
    pub name: String,
    /// Last observed play state.
    pub play: PlayState,
    /// Device slot launched on behalf of this pattern slot, if any.
    pub triggered: Option<TrackSlotAddress>,
}

impl PatternSlotState {
    /// Returns true once a non-empty name has been observed.
    #[inline]
    pub fn name_known(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Pattern slot states keyed by address, created on first observation.
#[derive(Debug, Clone, Default)]
pub struct PatternStateTable {
    slots: BTreeMap<TrackSlotAddress, PatternSlotState>,
}

impl PatternStateTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no slot has been observed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the state of `slot`, if it has been observed.
    #[inline]
    pub fn get(&self, slot: TrackSlotAddress) -> Option<&PatternSlotState> {
        self.slots.get(&slot)
    }

    /// Returns the state of `slot`, creating an unknown one if needed.
    pub fn get_or_insert(&mut self, slot: TrackSlotAddress) -> &mut PatternSlotState {
        self.slots.entry(slot).or_default()
    }

    /// Forgets every slot's name and triggered device slot, keeping play states.
    pub fn reset_names(&mut self) {
        for state in self.slots.values_mut() {
            state.name.clear();
            state.triggered = None;
        }
    }

    /// Iterates states in address order.
    pub fn iter(&self) -> impl Iterator<Item = (TrackSlotAddress, &PatternSlotState)> {
        self.slots.iter().map(|(addr, state)| (*addr, state))
    }

    /// Counts tracked groups, tracks, and slots.
    pub fn summary(&self) -> StateSummary {
        let groups: BTreeSet<usize> = self.slots.keys().map(|a| a.group).collect();
        let tracks: BTreeSet<(usize, usize)> =
            self.slots.keys().map(|a| (a.group, a.child)).collect();
        StateSummary {
            groups: groups.len(),
            tracks: tracks.len(),
            slots: self.slots.len(),
        }
    }
}

/// Size of a [`PatternStateTable`], for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSummary {
    /// Distinct group tracks.
    pub groups: usize,
    /// Distinct child tracks.
    pub tracks: usize,
    /// Slots.
    pub slots: usize,
}

impl fmt::Display for StateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.groups == 0 {
            return f.write_str("0 slots tracked");
        }
        let tracks_per_group = self.tracks as f64 / self.groups as f64;
        let slots_per_track = if self.tracks > 0 {
            self.slots as f64 / self.tracks as f64
        } else {
            0.0
        };
        write!(
            f,
            "{} groups x {:.2} avg tracks/group x {:.2} avg slots/track = {} slots",
            self.groups, tracks_per_group, slots_per_track, self.slots
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_unknown() {
        let mut table = PatternStateTable::new();
        let state = table.get_or_insert(TrackSlotAddress::new(0, 0, 0));
        assert_eq!(state.play, PlayState::Unknown);
        assert!(!state.name_known());
        assert!(state.triggered.is_none());
    }

    #[test]
    fn reset_names_keeps_play_state() {
        let mut table = PatternStateTable::new();
        let addr = TrackSlotAddress::new(1, 0, 2);
        {
            let state = table.get_or_insert(addr);
            state.name = "verse".to_string();
            state.play = PlayState::Playing;
            state.triggered = Some(TrackSlotAddress::new(0, 0, 0));
        }
        table.reset_names();
        let state = table.get(addr).unwrap();
        assert_eq!(state.name, "");
        assert_eq!(state.play, PlayState::Playing);
        assert!(state.triggered.is_none());
    }

    #[test]
    fn summary_counts_and_formats() {
        let mut table = PatternStateTable::new();
        assert_eq!(table.summary().to_string(), "0 slots tracked");

        table.get_or_insert(TrackSlotAddress::new(1, 0, 0));
        table.get_or_insert(TrackSlotAddress::new(1, 0, 1));
        table.get_or_insert(TrackSlotAddress::new(1, 1, 0));
        table.get_or_insert(TrackSlotAddress::new(1, 1, 1));

        let summary = table.summary();
        assert_eq!(
            summary,
            StateSummary {
                groups: 1,
                tracks: 2,
                slots: 4
            }
        );
        assert_eq!(
            summary.to_string(),
            "1 groups x 2.00 avg tracks/group x 2.00 avg slots/track = 4 slots"
        );
    }

    #[test]
    fn from_playing() {
        assert_eq!(PlayState::from_playing(true), PlayState::Playing);
        assert_eq!(PlayState::from_playing(false), PlayState::Stopped);
        assert!(!PlayState::Unknown.is_playing());
    }
}
