//! Clip-name to device-slot mapping.
//!
//! [`NameMappingTable`] answers "which device slot should play when a
//! pattern clip called `name` starts?". It is rebuilt on remap and kept
//! current by device-slot name/content observations in between.
//!
//! # Invariants
//!
//! - A slot is mapped under at most one name, and a name maps to at most
//!   one slot.
//! - An entry exists only if, at its last observation, the slot had a
//!   non-empty name and held a clip.
//! - Entries whose owning track has disappeared are not swept eagerly; the
//!   tracker evicts them when a launch or stop finds the track gone.

use std::collections::BTreeMap;

use crate::{TrackAddress, TrackSlotAddress, TrackerHost};

/// A device-group clip slot available for triggering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSlotBinding {
    /// Where the clip lives.
    pub slot: TrackSlotAddress,
    /// Name of the owning device track when the entry was last updated.
    pub track_name: String,
}

impl DeviceSlotBinding {
    /// Returns the address of the owning device track.
    #[inline]
    pub fn track(&self) -> TrackAddress {
        self.slot.track()
    }
}

/// What an [`NameMappingTable::upsert`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingChange {
    /// Name the slot was mapped under before, if that entry was dropped.
    pub unmapped: Option<String>,
    /// A different slot that lost the name to this one.
    pub displaced: Option<TrackSlotAddress>,
    /// True if a new entry was created for the slot.
    pub mapped: bool,
}

impl MappingChange {
    /// Returns true if the table was left as it was.
    pub fn is_unchanged(&self) -> bool {
        self.unmapped.is_none() && self.displaced.is_none() && !self.mapped
    }
}

/// Maps device clip names to the slots that hold them.
///
/// # Example
///
/// ```rust
/// use pattern_tracker_core::{NameMappingTable, TrackSlotAddress};
///
/// let mut table = NameMappingTable::new();
/// let slot = TrackSlotAddress::new(0, 1, 0);
///
/// table.upsert("bassline", true, slot, "Bass");
/// assert_eq!(table.lookup("bassline").map(|b| b.slot), Some(slot));
///
/// // Renaming the clip moves the entry.
/// table.upsert("bassline v2", true, slot, "Bass");
/// assert!(table.lookup("bassline").is_none());
/// assert_eq!(table.name_for_slot(slot), Some("bassline v2"));
///
/// // Emptying the slot drops it.
/// table.upsert("bassline v2", false, slot, "Bass");
/// assert!(table.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NameMappingTable {
    by_name: BTreeMap<String, DeviceSlotBinding>,
    by_slot: BTreeMap<TrackSlotAddress, String>,
}

impl NameMappingTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mapped names.
    #[inline]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true if nothing is mapped.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Records the current name and content of a device slot.
    ///
    /// The slot's existing entry is dropped if it was mapped under a
    /// different name, has lost its clip, or is now unnamed. If the slot is
    /// named and holds a clip it is then mapped under `name`; another slot
    /// already holding that name loses it (last writer wins, with a warning).
    pub fn upsert(
        &mut self,
        name: &str,
        has_content: bool,
        slot: TrackSlotAddress,
        track_name: &str,
    ) -> MappingChange {
        let mut change = MappingChange::default();

        if let Some(current) = self.by_slot.get(&slot).cloned()
            && (current != name || !has_content || name.is_empty())
        {
            tracing::debug!(slot = %slot, "unmapping device clip \"{current}\"");
            self.remove(&current);
            change.unmapped = Some(current);
        }

        if !has_content || name.is_empty() {
            return change;
        }

        match self.by_name.get(name).map(|b| b.slot) {
            Some(existing) if existing == slot => {
                if let Some(binding) = self.by_name.get_mut(name) {
                    binding.track_name = track_name.to_string();
                }
            }
            existing => {
                if let Some(existing) = existing {
                    tracing::warn!(
                        slot = %slot,
                        previous = %existing,
                        track = %track_name,
                        "duplicate device clip name \"{name}\", overwriting"
                    );
                    self.remove(name);
                    change.displaced = Some(existing);
                }
                tracing::debug!(slot = %slot, track = %track_name, "mapping device clip \"{name}\"");
                self.by_name.insert(
                    name.to_string(),
                    DeviceSlotBinding {
                        slot,
                        track_name: track_name.to_string(),
                    },
                );
                self.by_slot.insert(slot, name.to_string());
                change.mapped = true;
            }
        }

        change
    }

    /// Removes the entry for `name`, freeing its slot.
    pub fn remove(&mut self, name: &str) -> Option<DeviceSlotBinding> {
        let binding = self.by_name.remove(name)?;
        self.by_slot.remove(&binding.slot);
        Some(binding)
    }

    /// Returns the binding for `name`.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<&DeviceSlotBinding> {
        self.by_name.get(name)
    }

    /// Returns true if `name` is mapped.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Returns the name `slot` is mapped under.
    pub fn name_for_slot(&self, slot: TrackSlotAddress) -> Option<&str> {
        self.by_slot.get(&slot).map(String::as_str)
    }

    /// Finds a mapped device slot whose owning track is currently named
    /// exactly `track_name`.
    ///
    /// Only tracks with at least one mapped clip can be found. The track
    /// name is read live from the host, not from the binding.
    pub fn find_by_track_name<H: TrackerHost + ?Sized>(
        &self,
        host: &H,
        track_name: &str,
    ) -> Option<&DeviceSlotBinding> {
        self.by_name
            .values()
            .find(|b| host.track_name(b.track()).as_deref() == Some(track_name))
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.by_name.clear();
        self.by_slot.clear();
    }

    /// Iterates entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeviceSlotBinding)> {
        self.by_name.iter().map(|(name, b)| (name.as_str(), b))
    }
}
