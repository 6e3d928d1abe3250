//! Play-state propagation from pattern slots to device slots.
//!
//! [`PatternTracker`] owns the name mapping and the pattern state table and
//! reacts to [`HostEvent`]s one at a time. When a pattern slot starts
//! playing, the device slot holding a clip of the same name is launched;
//! when it stops, that device track is stopped unless the user asked to
//! keep devices playing. A pattern slot named `"<stop keyword><Track>"`
//! stops the device track called `Track` instead.
//!
//! # Transition table
//!
//! | From | Event | Guard | Action |
//! |---|---|---|---|
//! | Unknown/Stopped | starts playing | stop command | stop named device track |
//! | Unknown/Stopped | starts playing | name mapped, transport playing | launch mapped slot |
//! | Unknown/Stopped | starts playing | otherwise | nothing (not retried) |
//! | Unknown | reported stopped | | nothing |
//! | Playing | stops | stop command | forget triggered slot |
//! | Playing | stops | keep devices playing | forget triggered slot |
//! | Playing | stops | otherwise | stop device track, forget triggered slot |
//! | Playing | renamed | stop command | stop named device track |
//! | Playing | renamed | name mapped, transport playing | launch mapped slot |
//! | any | transport starts | slot playing, regular name | relaunch mapped slot |
//! | any | transport stops | slot playing, regular name | stop device track, keep state |
//!
//! Launches that fail their guard are dropped, not queued. A later rename,
//! transport start, or remap re-evaluates the guard.

use crate::stop_command::{is_stop_command, parse_stop_command};
use crate::topology::{GroupRole, Topology, classify};
use crate::{
    BankSizes, HostEvent, MappingChange, NameMappingTable, PatternSlotState, PatternStateTable,
    PlayState, StopCommandError, TrackAddress, TrackSlotAddress, TrackerConfig, TrackerHost,
};

/// Outcome of a full remap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapReport {
    /// A devices group was found.
    pub devices_found: bool,
    /// A patterns group was found.
    pub patterns_found: bool,
    /// Device clip names mapped.
    pub mapped: usize,
    /// Pattern slots whose names were refreshed.
    pub pattern_slots: usize,
    /// Device slots launched for already-playing pattern slots.
    pub launched: usize,
}

/// The tracker context: mapping, pattern states, transport, and settings.
///
/// # Example
///
/// ```rust
/// use pattern_tracker_core::sim::{SimHost, SimSlot, SimTrack};
/// use pattern_tracker_core::{PatternTracker, PlayState, TrackerConfig, TrackSlotAddress};
///
/// let mut host = SimHost::new(vec![
///     SimTrack::group("Devices", vec![SimTrack::track("Bass", vec![SimSlot::clip("bassline")])]),
///     SimTrack::group("Patterns", vec![SimTrack::track("A", vec![SimSlot::clip("bassline")])]),
/// ]);
/// let mut tracker = PatternTracker::new(TrackerConfig::default(), false);
/// tracker.remap(&mut host);
///
/// let pattern = TrackSlotAddress::new(1, 0, 0);
/// let event = host.set_slot_playing(pattern, true).unwrap();
/// tracker.handle(&mut host, event);
/// assert!(host.launches().is_empty()); // transport stopped
///
/// let event = host.set_transport(true);
/// tracker.handle(&mut host, event);
/// assert_eq!(host.launches(), vec![TrackSlotAddress::new(0, 0, 0)]);
/// assert_eq!(tracker.pattern_state(pattern).unwrap().play, PlayState::Playing);
/// ```
#[derive(Debug, Clone)]
pub struct PatternTracker {
    config: TrackerConfig,
    transport_playing: bool,
    mapping: NameMappingTable,
    patterns: PatternStateTable,
}

impl PatternTracker {
    /// Creates a tracker with empty tables.
    ///
    /// The mapping stays empty until the first remap or device slot
    /// observation.
    pub fn new(config: TrackerConfig, transport_playing: bool) -> Self {
        tracing::info!(
            root_groups = config.banks.root_groups,
            tracks = config.banks.tracks_per_group,
            slots = config.banks.slots_per_track,
            stop_keyword = %config.stop_keyword,
            keep_devices_playing = config.keep_devices_playing,
            transport_playing,
            "pattern tracker starting"
        );
        Self {
            config,
            transport_playing,
            mapping: NameMappingTable::new(),
            patterns: PatternStateTable::new(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Last observed transport state.
    pub fn transport_playing(&self) -> bool {
        self.transport_playing
    }

    /// Device clip mapping.
    pub fn mapping(&self) -> &NameMappingTable {
        &self.mapping
    }

    /// Pattern slot states.
    pub fn patterns(&self) -> &PatternStateTable {
        &self.patterns
    }

    /// State of one pattern slot, if observed.
    pub fn pattern_state(&self, slot: TrackSlotAddress) -> Option<&PatternSlotState> {
        self.patterns.get(slot)
    }

    /// Dispatches one host event.
    pub fn handle<H: TrackerHost + ?Sized>(&mut self, host: &mut H, event: HostEvent) {
        match event {
            HostEvent::TransportChanged(playing) => self.on_transport_changed(host, playing),
            HostEvent::SlotNameChanged { slot, name } => self.on_slot_name_changed(host, slot, &name),
            HostEvent::SlotContentChanged { slot, has_content } => {
                self.on_slot_content_changed(host, slot, has_content);
            }
            HostEvent::SlotPlayingChanged { slot, playing } => {
                self.on_slot_playing_changed(host, slot, playing);
            }
            HostEvent::RemapRequested => {
                self.remap(host);
            }
            HostEvent::StopKeywordChanged(keyword) => self.set_stop_keyword(keyword),
            HostEvent::KeepDevicesPlayingChanged(keep) => self.set_keep_devices_playing(host, keep),
            HostEvent::BankSizesChanged(banks) => self.set_bank_sizes(banks),
        }
    }

    // -------------------------------
    // MARK: Settings
    // -------------------------------

    /// Changes the stop keyword. Affects names evaluated from now on.
    pub fn set_stop_keyword(&mut self, keyword: impl Into<String>) {
        self.config.stop_keyword = keyword.into();
        tracing::info!("stop keyword changed to \"{}\"", self.config.stop_keyword);
    }

    /// Changes the keep-devices-playing flag and tells the user.
    pub fn set_keep_devices_playing<H: TrackerHost + ?Sized>(&mut self, host: &mut H, keep: bool) {
        self.config.keep_devices_playing = keep;
        let state = if keep { "enabled" } else { "disabled" };
        host.notify(&format!("Keep Devices Playing: {state}"));
        tracing::info!("keep devices playing on pattern stop: {state}");
    }

    /// Changes the bank sizes used by the next remap.
    pub fn set_bank_sizes(&mut self, banks: BankSizes) {
        self.config.banks = banks;
        tracing::info!(
            root_groups = banks.root_groups,
            tracks = banks.tracks_per_group,
            slots = banks.slots_per_track,
            "bank sizes changed, takes effect on next remap"
        );
    }

    // -------------------------------
    // MARK: Observer routing
    // -------------------------------

    /// Handles a slot rename anywhere in the observed tree.
    pub fn on_slot_name_changed<H: TrackerHost + ?Sized>(
        &mut self,
        host: &mut H,
        slot: TrackSlotAddress,
        name: &str,
    ) {
        match classify(&*host, slot, &self.config.groups) {
            Some(GroupRole::Devices) => {
                let has_content = host.slot(slot).is_some_and(|s| s.has_content);
                self.on_device_slot_changed(&*host, slot, name, has_content);
            }
            Some(GroupRole::Patterns) => self.on_pattern_name_changed(host, slot, name),
            None => {}
        }
    }

    /// Handles a slot gaining or losing its clip.
    ///
    /// Only device slots care; a pattern slot's content never matters.
    pub fn on_slot_content_changed<H: TrackerHost + ?Sized>(
        &mut self,
        host: &mut H,
        slot: TrackSlotAddress,
        has_content: bool,
    ) {
        if classify(&*host, slot, &self.config.groups) == Some(GroupRole::Devices) {
            let name = host.slot(slot).map(|s| s.name).unwrap_or_default();
            self.on_device_slot_changed(&*host, slot, &name, has_content);
        }
    }

    /// Handles a slot starting or stopping.
    ///
    /// Only pattern slots care; device slot playback is the tracker's output.
    pub fn on_slot_playing_changed<H: TrackerHost + ?Sized>(
        &mut self,
        host: &mut H,
        slot: TrackSlotAddress,
        playing: bool,
    ) {
        if classify(&*host, slot, &self.config.groups) == Some(GroupRole::Patterns) {
            self.on_pattern_playing_changed(host, slot, playing);
        }
    }

    // -------------------------------
    // MARK: Device side
    // -------------------------------

    /// Updates the mapping from a device slot's current name and content.
    pub fn on_device_slot_changed<H: TrackerHost + ?Sized>(
        &mut self,
        host: &H,
        slot: TrackSlotAddress,
        name: &str,
        has_content: bool,
    ) -> MappingChange {
        let track_name = host.track_name(slot.track()).unwrap_or_default();
        tracing::debug!(slot = %slot, has_content, "device slot \"{name}\" changed");
        self.mapping.upsert(name, has_content, slot, &track_name)
    }

    /// Launches the device clip mapped to `name`, without quantization.
    ///
    /// Returns the launched slot. A mapping whose track has disappeared is
    /// evicted and `None` returned.
    pub fn launch_device_clip<H: TrackerHost + ?Sized>(
        &mut self,
        host: &mut H,
        name: &str,
    ) -> Option<TrackSlotAddress> {
        let Some(binding) = self.mapping.lookup(name).cloned() else {
            tracing::warn!("device clip \"{name}\" not found");
            return None;
        };
        if !host.track_exists(binding.track()) {
            tracing::warn!(
                track = %binding.track(),
                "device track for clip \"{name}\" no longer exists, removing mapping"
            );
            self.mapping.remove(name);
            return None;
        }
        match host.launch_slot(binding.slot) {
            Ok(()) => {
                tracing::info!(
                    slot = %binding.slot,
                    track = %binding.track_name,
                    "launching device clip \"{name}\""
                );
                Some(binding.slot)
            }
            Err(err) => {
                tracing::warn!(slot = %binding.slot, "launch of \"{name}\" failed: {err}");
                None
            }
        }
    }

    /// Stops the device track holding the clip mapped to `name`.
    ///
    /// Returns true if a stop was issued. A mapping whose track has
    /// disappeared is evicted.
    pub fn stop_device_clip<H: TrackerHost + ?Sized>(&mut self, host: &mut H, name: &str) -> bool {
        let Some(binding) = self.mapping.lookup(name).cloned() else {
            tracing::warn!("no device track to stop for clip \"{name}\"");
            return false;
        };
        if !host.track_exists(binding.track()) {
            tracing::warn!(
                track = %binding.track(),
                "device track for clip \"{name}\" no longer exists, removing mapping"
            );
            self.mapping.remove(name);
            return false;
        }
        Self::stop_track(host, binding.track(), name)
    }

    /// Runs a stop command: stops the device track named after the keyword.
    ///
    /// Returns the stopped track, or `None` if no mapped device track has
    /// that name. Call only for names that start with the stop keyword.
    pub fn execute_stop_command<H: TrackerHost + ?Sized>(
        &mut self,
        host: &mut H,
        name: &str,
    ) -> Result<Option<TrackAddress>, StopCommandError> {
        let Some(parsed) = parse_stop_command(name, &self.config.stop_keyword) else {
            return Ok(None);
        };
        let target = parsed?;
        tracing::info!("stop command for track \"{target}\"");

        let Some(track) = self
            .mapping
            .find_by_track_name(&*host, target)
            .map(|b| b.track())
        else {
            tracing::info!("could not find device track named \"{target}\"");
            return Ok(None);
        };
        Ok(Self::stop_track(host, track, name).then_some(track))
    }

    fn stop_track<H: TrackerHost + ?Sized>(host: &mut H, track: TrackAddress, name: &str) -> bool {
        match host.stop_track(track) {
            Ok(()) => {
                tracing::info!(track = %track, "stopping device track for \"{name}\"");
                true
            }
            Err(err) => {
                tracing::warn!(track = %track, "stop for \"{name}\" failed: {err}");
                false
            }
        }
    }

    /// Stops the device playing on behalf of a pattern slot: the slot it
    /// launched if known, otherwise whatever `name` maps to. A slot whose
    /// name was cleared still stops the device it launched.
    fn stop_for_pattern<H: TrackerHost + ?Sized>(
        &mut self,
        host: &mut H,
        name: &str,
        triggered: Option<TrackSlotAddress>,
    ) {
        match triggered {
            Some(slot) if host.track_exists(slot.track()) => {
                Self::stop_track(host, slot.track(), name);
            }
            _ if !name.is_empty() => {
                self.stop_device_clip(host, name);
            }
            _ => {}
        }
    }

    fn run_stop_command<H: TrackerHost + ?Sized>(&mut self, host: &mut H, slot: TrackSlotAddress, name: &str) {
        if let Err(err) = self.execute_stop_command(host, name) {
            tracing::warn!(slot = %slot, "{err}");
        }
        self.patterns.get_or_insert(slot).triggered = None;
    }

    // -------------------------------
    // MARK: Pattern side
    // -------------------------------

    /// Records a pattern slot's new name and acts on it if the slot is playing.
    pub fn on_pattern_name_changed<H: TrackerHost + ?Sized>(
        &mut self,
        host: &mut H,
        slot: TrackSlotAddress,
        name: &str,
    ) {
        let state = self.patterns.get_or_insert(slot);
        let old = std::mem::replace(&mut state.name, name.to_string());
        let play = state.play;
        tracing::debug!(
            slot = %slot,
            "pattern slot renamed from \"{}\" to \"{}\"",
            if old.is_empty() { "<init>" } else { old.as_str() },
            if name.is_empty() { "<empty>" } else { name }
        );

        if name.is_empty() || !play.is_playing() {
            return;
        }
        if is_stop_command(name, &self.config.stop_keyword) {
            self.run_stop_command(host, slot, name);
            return;
        }
        if !self.transport_playing {
            tracing::debug!(slot = %slot, "transport not playing, launch of \"{name}\" postponed");
            return;
        }
        if self.mapping.contains(name) {
            let launched = self.launch_device_clip(host, name);
            self.patterns.get_or_insert(slot).triggered = launched;
        } else {
            tracing::debug!(slot = %slot, "device clip \"{name}\" not mapped yet, launch postponed");
        }
    }

    /// Applies a pattern slot's new play state.
    pub fn on_pattern_playing_changed<H: TrackerHost + ?Sized>(
        &mut self,
        host: &mut H,
        slot: TrackSlotAddress,
        playing: bool,
    ) {
        let state = self.patterns.get_or_insert(slot);
        let previous = state.play;
        let next = PlayState::from_playing(playing);
        if previous == next {
            return;
        }
        state.play = next;
        let name = state.name.clone();
        let triggered = state.triggered;
        tracing::debug!(slot = %slot, "pattern slot \"{name}\" {previous} -> {next}");

        match (previous, next) {
            (_, PlayState::Playing) => self.on_pattern_started(host, slot, &name),
            (PlayState::Playing, PlayState::Stopped) => {
                self.on_pattern_stopped(host, slot, &name, triggered);
            }
            _ => {}
        }
    }

    fn on_pattern_started<H: TrackerHost + ?Sized>(
        &mut self,
        host: &mut H,
        slot: TrackSlotAddress,
        name: &str,
    ) {
        if is_stop_command(name, &self.config.stop_keyword) {
            self.run_stop_command(host, slot, name);
            return;
        }
        let mapped = !name.is_empty() && self.mapping.contains(name);
        if mapped && self.transport_playing {
            let launched = self.launch_device_clip(host, name);
            self.patterns.get_or_insert(slot).triggered = launched;
        } else {
            tracing::debug!(
                slot = %slot,
                name_known = !name.is_empty(),
                mapped,
                transport_playing = self.transport_playing,
                "launch postponed"
            );
        }
    }

    fn on_pattern_stopped<H: TrackerHost + ?Sized>(
        &mut self,
        host: &mut H,
        slot: TrackSlotAddress,
        name: &str,
        triggered: Option<TrackSlotAddress>,
    ) {
        if is_stop_command(name, &self.config.stop_keyword) {
            tracing::debug!(slot = %slot, "stop command clip finished");
        } else if self.config.keep_devices_playing {
            tracing::debug!(slot = %slot, "keeping device for \"{name}\" playing");
        } else {
            self.stop_for_pattern(host, name, triggered);
        }
        self.patterns.get_or_insert(slot).triggered = None;
    }

    // -------------------------------
    // MARK: Transport
    // -------------------------------

    /// Relaunches or stops the devices of every playing pattern slot.
    ///
    /// Pattern states are kept when the transport stops, so the same
    /// devices resume when it starts again.
    pub fn on_transport_changed<H: TrackerHost + ?Sized>(&mut self, host: &mut H, playing: bool) {
        self.transport_playing = playing;
        tracing::info!(playing, "transport changed");

        let active: Vec<(TrackSlotAddress, String, Option<TrackSlotAddress>)> = self
            .patterns
            .iter()
            .filter(|(_, s)| {
                s.play.is_playing()
                    && s.name_known()
                    && !is_stop_command(&s.name, &self.config.stop_keyword)
            })
            .map(|(addr, s)| (addr, s.name.clone(), s.triggered))
            .collect();

        for (slot, name, triggered) in active {
            if playing {
                let launched = self.launch_device_clip(host, &name);
                self.patterns.get_or_insert(slot).triggered = launched;
            } else {
                self.stop_for_pattern(host, &name, triggered);
            }
        }
    }

    // -------------------------------
    // MARK: Remap
    // -------------------------------

    /// Rebuilds the mapping and pattern names from the host.
    ///
    /// Pattern slots already playing with a mapped name are launched if the
    /// transport is playing.
    pub fn remap<H: TrackerHost + ?Sized>(&mut self, host: &mut H) -> RemapReport {
        tracing::info!("remapping clips");
        self.mapping.clear();
        self.patterns.reset_names();

        let topology = Topology::scan(&*host, self.config.banks, &self.config.groups);
        let mut report = RemapReport {
            devices_found: topology.devices_found(),
            patterns_found: topology.patterns_found(),
            ..RemapReport::default()
        };

        for (slot, track_name, info) in topology.device_slots() {
            tracing::debug!(slot = %slot, has_content = info.has_content, "device slot \"{}\"", info.name);
            self.mapping.upsert(&info.name, info.has_content, slot, track_name);
        }
        report.mapped = self.mapping.len();

        for (slot, _, info) in topology.pattern_slots() {
            let state = self.patterns.get_or_insert(slot);
            state.name.clone_from(&info.name);
            report.pattern_slots += 1;

            let relaunch = state.play.is_playing()
                && state.name_known()
                && !is_stop_command(&state.name, &self.config.stop_keyword)
                && self.mapping.contains(&state.name);
            if !relaunch {
                continue;
            }
            if !self.transport_playing {
                tracing::debug!(slot = %slot, "transport not playing, launch of \"{}\" postponed", info.name);
                continue;
            }
            let launched = self.launch_device_clip(host, &info.name);
            if launched.is_some() {
                report.launched += 1;
            }
            self.patterns.get_or_insert(slot).triggered = launched;
        }

        tracing::info!(
            mapped = report.mapped,
            pattern_slots = report.pattern_slots,
            launched = report.launched,
            "remap finished"
        );
        for (name, binding) in self.mapping.iter() {
            tracing::debug!(slot = %binding.slot, "mapped \"{name}\" on track \"{}\"", binding.track_name);
        }
        tracing::info!("pattern slots: {}", self.patterns.summary());
        report
    }
}
