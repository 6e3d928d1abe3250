//! In-memory host for tests, demos, and scenario replay.
//!
//! [`SimHost`] holds a two-level track tree, answers [`TrackerHost`]
//! queries from it, and records every command the tracker issues. Its
//! mutators change the tree and return the [`HostEvent`] a real host would
//! deliver for that change, so a test reads like a host session:
//!
//! ```rust
//! use pattern_tracker_core::sim::{HostCommand, SimHost, SimSlot, SimTrack};
//! use pattern_tracker_core::{PatternTracker, TrackerConfig, TrackSlotAddress};
//!
//! let mut host = SimHost::new(vec![
//!     SimTrack::group("Devices", vec![SimTrack::track("Bass", vec![SimSlot::clip("bassline")])]),
//!     SimTrack::group("Patterns", vec![SimTrack::track("A", vec![SimSlot::clip("bassline")])]),
//! ]);
//! let mut tracker = PatternTracker::new(TrackerConfig::default(), true);
//! tracker.remap(&mut host);
//!
//! let event = host.set_slot_playing(TrackSlotAddress::new(1, 0, 0), true).unwrap();
//! tracker.handle(&mut host, event);
//!
//! assert_eq!(host.commands(), &[HostCommand::Launch(TrackSlotAddress::new(0, 0, 0))]);
//! ```

use crate::{
    HostError, HostEvent, SlotInfo, TrackAddress, TrackInfo, TrackSlotAddress, TrackerHost,
};

/// A clip slot in the simulated tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimSlot {
    /// Clip name.
    pub name: String,
    /// True if the slot holds a clip.
    pub has_content: bool,
    /// True while the clip plays.
    pub is_playing: bool,
    /// False once the slot is gone.
    pub exists: bool,
}

impl SimSlot {
    /// An existing slot without a clip.
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            has_content: false,
            is_playing: false,
            exists: true,
        }
    }

    /// An existing slot holding a stopped clip called `name`.
    pub fn clip(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_content: true,
            ..Self::empty()
        }
    }

    fn info(&self) -> SlotInfo {
        SlotInfo {
            name: self.name.clone(),
            has_content: self.has_content,
            is_playing: self.is_playing,
            exists: self.exists,
        }
    }
}

/// A track in the simulated tree.
///
/// Top-level tracks carry `children`; child tracks carry `slots`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimTrack {
    /// Display name.
    pub name: String,
    /// True for group tracks.
    pub is_group: bool,
    /// False once the track is gone.
    pub exists: bool,
    /// Child tracks (groups only).
    pub children: Vec<SimTrack>,
    /// Clip slots.
    pub slots: Vec<SimSlot>,
}

impl SimTrack {
    /// A group track with children.
    pub fn group(name: impl Into<String>, children: Vec<SimTrack>) -> Self {
        Self {
            name: name.into(),
            is_group: true,
            exists: true,
            children,
            slots: Vec::new(),
        }
    }

    /// A plain track with clip slots.
    pub fn track(name: impl Into<String>, slots: Vec<SimSlot>) -> Self {
        Self {
            name: name.into(),
            is_group: false,
            exists: true,
            children: Vec::new(),
            slots,
        }
    }

    fn info(&self) -> TrackInfo {
        TrackInfo {
            name: self.name.clone(),
            is_group: self.is_group,
            exists: self.exists,
        }
    }
}

/// A command the tracker sent to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// `launch_slot` succeeded for this slot.
    Launch(TrackSlotAddress),
    /// `stop_track` succeeded for this track.
    StopTrack(TrackAddress),
}

/// Simulated host over an in-memory track tree.
#[derive(Debug, Clone, Default)]
pub struct SimHost {
    tracks: Vec<SimTrack>,
    transport_playing: bool,
    commands: Vec<HostCommand>,
    notifications: Vec<String>,
    fail_next: Option<String>,
}

impl SimHost {
    /// Creates a host with the given top-level tracks and a stopped transport.
    pub fn new(tracks: Vec<SimTrack>) -> Self {
        Self {
            tracks,
            ..Self::default()
        }
    }

    /// Top-level tracks.
    pub fn tracks(&self) -> &[SimTrack] {
        &self.tracks
    }

    /// Current transport state.
    pub fn transport_playing(&self) -> bool {
        self.transport_playing
    }

    /// Commands issued so far, oldest first.
    pub fn commands(&self) -> &[HostCommand] {
        &self.commands
    }

    /// Returns and clears the recorded commands.
    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Slots launched so far.
    pub fn launches(&self) -> Vec<TrackSlotAddress> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                HostCommand::Launch(slot) => Some(*slot),
                HostCommand::StopTrack(_) => None,
            })
            .collect()
    }

    /// Tracks stopped so far.
    pub fn stops(&self) -> Vec<TrackAddress> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                HostCommand::StopTrack(track) => Some(*track),
                HostCommand::Launch(_) => None,
            })
            .collect()
    }

    /// Notifications shown so far.
    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Returns true if the clip at `slot` is playing.
    pub fn slot_is_playing(&self, slot: TrackSlotAddress) -> bool {
        self.slot(slot).is_some_and(|s| s.is_playing)
    }

    /// Makes the next launch or stop fail with `reason`.
    pub fn fail_next_command(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }

    /// Starts or stops the transport.
    pub fn set_transport(&mut self, playing: bool) -> HostEvent {
        self.transport_playing = playing;
        HostEvent::TransportChanged(playing)
    }

    /// Renames a clip.
    pub fn set_slot_name(
        &mut self,
        slot: TrackSlotAddress,
        name: impl Into<String>,
    ) -> Option<HostEvent> {
        let name = name.into();
        self.slot_mut(slot)?.name.clone_from(&name);
        Some(HostEvent::SlotNameChanged { slot, name })
    }

    /// Adds or removes a slot's clip. Removing a clip also clears its name.
    pub fn set_slot_content(&mut self, slot: TrackSlotAddress, has_content: bool) -> Option<HostEvent> {
        let s = self.slot_mut(slot)?;
        s.has_content = has_content;
        if !has_content {
            s.name.clear();
            s.is_playing = false;
        }
        Some(HostEvent::SlotContentChanged { slot, has_content })
    }

    /// Starts or stops a slot's clip as the user would.
    pub fn set_slot_playing(&mut self, slot: TrackSlotAddress, playing: bool) -> Option<HostEvent> {
        self.slot_mut(slot)?.is_playing = playing;
        Some(HostEvent::SlotPlayingChanged { slot, playing })
    }

    /// Renames a child track.
    pub fn rename_track(&mut self, track: TrackAddress, name: impl Into<String>) -> bool {
        match self.track_mut(track) {
            Some(t) => {
                t.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Deletes a child track, leaving its bank position behind.
    pub fn remove_track(&mut self, track: TrackAddress) -> bool {
        match self.track_mut(track) {
            Some(t) => {
                t.exists = false;
                for slot in &mut t.slots {
                    slot.exists = false;
                }
                true
            }
            None => false,
        }
    }

    fn track_ref(&self, track: TrackAddress) -> Option<&SimTrack> {
        self.tracks.get(track.group)?.children.get(track.child)
    }

    fn track_mut(&mut self, track: TrackAddress) -> Option<&mut SimTrack> {
        self.tracks.get_mut(track.group)?.children.get_mut(track.child)
    }

    fn slot_mut(&mut self, slot: TrackSlotAddress) -> Option<&mut SimSlot> {
        self.track_mut(slot.track())?.slots.get_mut(slot.slot)
    }

    fn take_failure(&mut self) -> Result<(), HostError> {
        match self.fail_next.take() {
            Some(reason) => Err(HostError::Rejected(reason)),
            None => Ok(()),
        }
    }
}

impl TrackerHost for SimHost {
    fn group_track(&self, group: usize) -> Option<TrackInfo> {
        self.tracks.get(group).map(SimTrack::info)
    }

    fn child_track(&self, track: TrackAddress) -> Option<TrackInfo> {
        self.track_ref(track).map(SimTrack::info)
    }

    fn slot(&self, slot: TrackSlotAddress) -> Option<SlotInfo> {
        self.track_ref(slot.track())?.slots.get(slot.slot).map(SimSlot::info)
    }

    fn launch_slot(&mut self, slot: TrackSlotAddress) -> Result<(), HostError> {
        self.take_failure()?;
        let track = self
            .track_mut(slot.track())
            .filter(|t| t.exists)
            .ok_or(HostError::MissingTrack(slot.track()))?;
        if !track.slots.get(slot.slot).is_some_and(|s| s.exists) {
            return Err(HostError::MissingSlot(slot));
        }
        for (index, s) in track.slots.iter_mut().enumerate() {
            s.is_playing = index == slot.slot && s.has_content;
        }
        self.commands.push(HostCommand::Launch(slot));
        Ok(())
    }

    fn stop_track(&mut self, track: TrackAddress) -> Result<(), HostError> {
        self.take_failure()?;
        let t = self
            .track_mut(track)
            .filter(|t| t.exists)
            .ok_or(HostError::MissingTrack(track))?;
        for s in &mut t.slots {
            s.is_playing = false;
        }
        self.commands.push(HostCommand::StopTrack(track));
        Ok(())
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}
