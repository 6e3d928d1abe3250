//! Scanning the host's two-level track tree.
//!
//! Only top-level group tracks named after the devices or patterns group
//! are indexed. Their direct, non-group children are read slot by slot;
//! deeper nesting is ignored.

use std::collections::BTreeMap;

use crate::{BankSizes, GroupNames, SlotInfo, TrackInfo, TrackSlotAddress, TrackerHost};

/// Which side of the mapping a group track plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupRole {
    /// Holds the clips that get launched.
    Devices,
    /// Holds the clips that trigger launches.
    Patterns,
}

impl GroupRole {
    /// Returns the role of a top-level track, if it is one of the named groups.
    pub fn of(track: &TrackInfo, groups: &GroupNames) -> Option<Self> {
        if !track.exists || !track.is_group {
            return None;
        }
        if track.name == groups.devices {
            Some(GroupRole::Devices)
        } else if track.name == groups.patterns {
            Some(GroupRole::Patterns)
        } else {
            None
        }
    }
}

/// Decides which group a slot's observer event belongs to.
///
/// Both the group and child track must exist, the group must be a named
/// group, and the child must not itself be a group.
pub fn classify<H: TrackerHost + ?Sized>(
    host: &H,
    slot: TrackSlotAddress,
    groups: &GroupNames,
) -> Option<GroupRole> {
    let role = GroupRole::of(&host.group_track(slot.group)?, groups)?;
    let child = host.child_track(slot.track())?;
    (child.exists && !child.is_group).then_some(role)
}

/// A scanned child track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackSnapshot {
    /// Track name at scan time.
    pub name: String,
    /// Existing slots by slot index.
    pub slots: BTreeMap<usize, SlotInfo>,
}

/// A scanned named group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSnapshot {
    /// Index of the group in the root bank.
    pub group: usize,
    /// Which named group this is.
    pub role: GroupRole,
    /// Existing, non-group children by child index.
    pub tracks: BTreeMap<usize, TrackSnapshot>,
}

/// Read-only index of the devices and patterns groups at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    /// Every top-level group named like the devices group.
    pub devices: Vec<GroupSnapshot>,
    /// Every top-level group named like the patterns group.
    pub patterns: Vec<GroupSnapshot>,
}

impl Topology {
    /// Scans the host within the given bank sizes.
    ///
    /// A missing group is reported with a warning and leaves its side empty.
    pub fn scan<H: TrackerHost + ?Sized>(host: &H, banks: BankSizes, groups: &GroupNames) -> Self {
        let mut topology = Topology::default();

        for group in 0..banks.root_groups {
            let Some(info) = host.group_track(group) else {
                continue;
            };
            if !info.exists {
                tracing::debug!(group, "skipping non-existent top-level track");
                continue;
            }
            let Some(role) = GroupRole::of(&info, groups) else {
                continue;
            };
            tracing::debug!(group, name = %info.name, ?role, "found group");

            let snapshot = GroupSnapshot {
                group,
                role,
                tracks: scan_children(host, group, banks),
            };
            match role {
                GroupRole::Devices => topology.devices.push(snapshot),
                GroupRole::Patterns => topology.patterns.push(snapshot),
            }
        }

        if topology.devices.is_empty() {
            tracing::warn!("'{}' group track not found", groups.devices);
        }
        if topology.patterns.is_empty() {
            tracing::warn!("'{}' group track not found", groups.patterns);
        }
        topology
    }

    /// Returns true if at least one devices group was found.
    pub fn devices_found(&self) -> bool {
        !self.devices.is_empty()
    }

    /// Returns true if at least one patterns group was found.
    pub fn patterns_found(&self) -> bool {
        !self.patterns.is_empty()
    }

    /// Iterates device slots as `(address, track name, slot)`.
    pub fn device_slots(&self) -> impl Iterator<Item = (TrackSlotAddress, &str, &SlotInfo)> {
        flatten(&self.devices)
    }

    /// Iterates pattern slots as `(address, track name, slot)`.
    pub fn pattern_slots(&self) -> impl Iterator<Item = (TrackSlotAddress, &str, &SlotInfo)> {
        flatten(&self.patterns)
    }
}

fn scan_children<H: TrackerHost + ?Sized>(
    host: &H,
    group: usize,
    banks: BankSizes,
) -> BTreeMap<usize, TrackSnapshot> {
    let mut tracks = BTreeMap::new();
    for child in 0..banks.tracks_per_group {
        let address = crate::TrackAddress::new(group, child);
        let Some(info) = host.child_track(address) else {
            continue;
        };
        if !info.exists || info.is_group {
            tracing::debug!(track = %address, "skipping non-existent or nested group track");
            continue;
        }

        let mut snapshot = TrackSnapshot {
            name: info.name,
            slots: BTreeMap::new(),
        };
        for slot in 0..banks.slots_per_track {
            match host.slot(address.slot(slot)) {
                Some(s) if s.exists => {
                    snapshot.slots.insert(slot, s);
                }
                _ => {}
            }
        }
        tracks.insert(child, snapshot);
    }
    tracks
}

fn flatten(
    groups: &[GroupSnapshot],
) -> impl Iterator<Item = (TrackSlotAddress, &str, &SlotInfo)> {
    groups.iter().flat_map(|g| {
        g.tracks.iter().flat_map(move |(&child, track)| {
            track
                .slots
                .iter()
                .map(move |(&slot, info)| {
                    (TrackSlotAddress::new(g.group, child, slot), track.name.as_str(), info)
                })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrackAddress;
    use crate::sim::{SimHost, SimSlot, SimTrack};

    fn tree() -> SimHost {
        SimHost::new(vec![
            SimTrack::track("Master Bus", vec![]),
            SimTrack::group(
                "Devices",
                vec![
                    SimTrack::track("Bass", vec![SimSlot::clip("bassline"), SimSlot::empty()]),
                    SimTrack::group("Nested", vec![SimTrack::track("Deep", vec![SimSlot::clip("x")])]),
                    SimTrack::track("Lead", vec![SimSlot::clip("hook")]),
                ],
            ),
            SimTrack::group("Patterns", vec![SimTrack::track("A", vec![SimSlot::clip("bassline")])]),
        ])
    }

    #[test]
    fn scan_indexes_both_groups() {
        let host = tree();
        let topology = Topology::scan(&host, BankSizes::new(8, 8, 8), &GroupNames::default());

        assert!(topology.devices_found());
        assert!(topology.patterns_found());
        assert_eq!(topology.devices[0].group, 1);
        assert_eq!(topology.patterns[0].group, 2);

        let devices: Vec<_> = topology
            .device_slots()
            .map(|(addr, track, slot)| (addr, track.to_string(), slot.name.clone()))
            .collect();
        assert_eq!(
            devices,
            vec![
                (TrackSlotAddress::new(1, 0, 0), "Bass".to_string(), "bassline".to_string()),
                (TrackSlotAddress::new(1, 0, 1), "Bass".to_string(), String::new()),
                (TrackSlotAddress::new(1, 2, 0), "Lead".to_string(), "hook".to_string()),
            ]
        );
    }

    #[test]
    fn nested_groups_are_skipped() {
        let host = tree();
        let topology = Topology::scan(&host, BankSizes::new(8, 8, 8), &GroupNames::default());
        assert!(!topology.devices[0].tracks.contains_key(&1));
    }

    #[test]
    fn bank_sizes_bound_the_scan() {
        let host = tree();
        let topology = Topology::scan(&host, BankSizes::new(2, 1, 1), &GroupNames::default());
        assert!(topology.devices_found());
        assert!(!topology.patterns_found());
        assert_eq!(topology.device_slots().count(), 1);
    }

    #[test]
    fn missing_groups_leave_sides_empty() {
        let host = SimHost::new(vec![SimTrack::group("Drums", vec![])]);
        let topology = Topology::scan(&host, BankSizes::default(), &GroupNames::default());
        assert_eq!(topology, Topology::default());
    }

    #[test]
    fn deleted_tracks_and_slots_are_skipped() {
        let mut host = tree();
        host.remove_track(TrackAddress::new(1, 0));
        let topology = Topology::scan(&host, BankSizes::default(), &GroupNames::default());
        let names: Vec<&str> = topology.device_slots().map(|(_, t, _)| t).collect();
        assert_eq!(names, vec!["Lead"]);
    }

    #[test]
    fn classify_requires_named_group_and_plain_child() {
        let host = tree();
        let groups = GroupNames::default();
        assert_eq!(
            classify(&host, TrackSlotAddress::new(1, 0, 0), &groups),
            Some(GroupRole::Devices)
        );
        assert_eq!(
            classify(&host, TrackSlotAddress::new(2, 0, 0), &groups),
            Some(GroupRole::Patterns)
        );
        assert_eq!(classify(&host, TrackSlotAddress::new(1, 1, 0), &groups), None);
        assert_eq!(classify(&host, TrackSlotAddress::new(0, 0, 0), &groups), None);
    }

    #[test]
    fn custom_group_names() {
        let host = SimHost::new(vec![
            SimTrack::group("Synths", vec![SimTrack::track("Pad", vec![SimSlot::clip("p")])]),
        ]);
        let groups = GroupNames {
            devices: "Synths".to_string(),
            patterns: "Seq".to_string(),
        };
        let topology = Topology::scan(&host, BankSizes::default(), &groups);
        assert_eq!(topology.device_slots().count(), 1);
    }
}
