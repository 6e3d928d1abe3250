//! End-to-end tracker scenarios against the simulated host.
//!
//! Each test builds a small live set, remaps, and then replays host events
//! the way a user session would produce them.

use pattern_tracker_core::sim::{HostCommand, SimHost, SimSlot, SimTrack};
use pattern_tracker_core::{
    HostEvent, PatternTracker, PlayState, TrackAddress, TrackSlotAddress, TrackerConfig,
};

const BASS: TrackAddress = TrackAddress::new(0, 0);
const DRUMS: TrackAddress = TrackAddress::new(0, 1);
const BASSLINE: TrackSlotAddress = TrackSlotAddress::new(0, 0, 0);
const PATTERN: TrackSlotAddress = TrackSlotAddress::new(1, 0, 0);

fn live_set() -> SimHost {
    SimHost::new(vec![
        SimTrack::group(
            "Devices",
            vec![
                SimTrack::track("Bass", vec![SimSlot::clip("bassline"), SimSlot::clip("bassline b")]),
                SimTrack::track("DrumsTrack", vec![SimSlot::clip("beat")]),
            ],
        ),
        SimTrack::group(
            "Patterns",
            vec![SimTrack::track(
                "A",
                vec![
                    SimSlot::clip("bassline"),
                    SimSlot::clip("[stop]DrumsTrack"),
                    SimSlot::clip("[stop]Nobody"),
                ],
            )],
        ),
    ])
}

fn start(transport: bool, config: TrackerConfig) -> (SimHost, PatternTracker) {
    let mut host = live_set();
    host.set_transport(transport);
    let mut tracker = PatternTracker::new(config, transport);
    tracker.remap(&mut host);
    (host, tracker)
}

fn send(host: &mut SimHost, tracker: &mut PatternTracker, event: Option<HostEvent>) {
    let event = event.expect("slot exists in the live set");
    tracker.handle(host, event);
}

#[test]
fn pattern_start_launches_mapped_device_slot() {
    let (mut host, mut tracker) = start(true, TrackerConfig::default());

    let event = host.set_slot_playing(PATTERN, true);
    send(&mut host, &mut tracker, event);

    assert_eq!(host.commands(), &[HostCommand::Launch(BASSLINE)]);
    let state = tracker.pattern_state(PATTERN).unwrap();
    assert_eq!(state.play, PlayState::Playing);
    assert_eq!(state.triggered, Some(BASSLINE));
}

#[test]
fn pattern_start_with_transport_stopped_waits_for_transport() {
    let (mut host, mut tracker) = start(false, TrackerConfig::default());

    let event = host.set_slot_playing(PATTERN, true);
    send(&mut host, &mut tracker, event);
    assert!(host.launches().is_empty());
    assert_eq!(tracker.pattern_state(PATTERN).unwrap().play, PlayState::Playing);

    let event = host.set_transport(true);
    tracker.handle(&mut host, event);
    assert_eq!(host.launches(), vec![BASSLINE]);
}

#[test]
fn stop_command_stops_named_track_without_mapping_lookup() {
    let (mut host, mut tracker) = start(true, TrackerConfig::default());

    // No device clip is called "[stop]DrumsTrack", only the track name matters.
    assert!(!tracker.mapping().contains("[stop]DrumsTrack"));

    let event = host.set_slot_playing(TrackSlotAddress::new(1, 0, 1), true);
    send(&mut host, &mut tracker, event);
    assert_eq!(host.commands(), &[HostCommand::StopTrack(DRUMS)]);
}

#[test]
fn stop_command_for_unknown_track_does_nothing() {
    let (mut host, mut tracker) = start(true, TrackerConfig::default());

    let event = host.set_slot_playing(TrackSlotAddress::new(1, 0, 2), true);
    send(&mut host, &mut tracker, event);
    assert!(host.commands().is_empty());
}

#[test]
fn stop_command_follows_live_track_rename() {
    let (mut host, mut tracker) = start(true, TrackerConfig::default());
    host.rename_track(DRUMS, "Percussion");

    let stopper = TrackSlotAddress::new(1, 0, 1);
    let event = host.set_slot_playing(stopper, true);
    send(&mut host, &mut tracker, event);
    assert!(host.commands().is_empty());

    let event = host.set_slot_name(stopper, "[stop]Percussion");
    send(&mut host, &mut tracker, event);
    assert_eq!(host.stops(), vec![DRUMS]);
}

#[test]
fn pattern_stop_stops_device_track() {
    let (mut host, mut tracker) = start(true, TrackerConfig::default());

    let event = host.set_slot_playing(PATTERN, true);
    send(&mut host, &mut tracker, event);
    let event = host.set_slot_playing(PATTERN, false);
    send(&mut host, &mut tracker, event);

    assert_eq!(host.stops(), vec![BASS]);
    let state = tracker.pattern_state(PATTERN).unwrap();
    assert_eq!(state.play, PlayState::Stopped);
    assert!(state.triggered.is_none());
    assert!(!host.slot_is_playing(BASSLINE));
}

#[test]
fn keep_devices_playing_skips_device_stop() {
    let config = TrackerConfig::default().with_keep_devices_playing(true);
    let (mut host, mut tracker) = start(true, config);

    let event = host.set_slot_playing(PATTERN, true);
    send(&mut host, &mut tracker, event);
    let event = host.set_slot_playing(PATTERN, false);
    send(&mut host, &mut tracker, event);

    assert!(host.stops().is_empty());
    assert!(host.slot_is_playing(BASSLINE));
    assert!(tracker.pattern_state(PATTERN).unwrap().triggered.is_none());
}

#[test]
fn keep_devices_playing_can_be_toggled_live() {
    let (mut host, mut tracker) = start(true, TrackerConfig::default());
    tracker.handle(&mut host, HostEvent::KeepDevicesPlayingChanged(true));

    let event = host.set_slot_playing(PATTERN, true);
    send(&mut host, &mut tracker, event);
    let event = host.set_slot_playing(PATTERN, false);
    send(&mut host, &mut tracker, event);
    assert!(host.stops().is_empty());

    tracker.handle(&mut host, HostEvent::KeepDevicesPlayingChanged(false));
    let event = host.set_slot_playing(PATTERN, true);
    send(&mut host, &mut tracker, event);
    let event = host.set_slot_playing(PATTERN, false);
    send(&mut host, &mut tracker, event);
    assert_eq!(host.stops(), vec![BASS]);
    assert_eq!(
        host.notifications(),
        &[
            "Keep Devices Playing: enabled".to_string(),
            "Keep Devices Playing: disabled".to_string()
        ]
    );
}

#[test]
fn device_clip_emptied_is_evicted() {
    let (mut host, mut tracker) = start(true, TrackerConfig::default());

    let event = host.set_slot_content(BASSLINE, false);
    send(&mut host, &mut tracker, event);
    assert!(!tracker.mapping().contains("bassline"));

    let event = host.set_slot_playing(PATTERN, true);
    send(&mut host, &mut tracker, event);
    assert!(host.launches().is_empty());
}

#[test]
fn device_clip_added_later_is_launched_on_next_trigger() {
    let (mut host, mut tracker) = start(true, TrackerConfig::default());
    let pattern = TrackSlotAddress::new(1, 0, 0);

    let event = host.set_slot_name(pattern, "fill");
    send(&mut host, &mut tracker, event);
    let event = host.set_slot_playing(pattern, true);
    send(&mut host, &mut tracker, event);
    assert!(host.launches().is_empty());

    // The launch is not retried when the device clip appears.
    let fill = TrackSlotAddress::new(0, 1, 0);
    let event = host.set_slot_name(fill, "fill");
    send(&mut host, &mut tracker, event);
    assert!(host.launches().is_empty());

    // A rename of the playing pattern slot re-evaluates it.
    let event = host.set_slot_name(pattern, "fill");
    send(&mut host, &mut tracker, event);
    assert_eq!(host.launches(), vec![fill]);
}

#[test]
fn transport_cycle_relaunches_playing_patterns() {
    let (mut host, mut tracker) = start(true, TrackerConfig::default());

    let event = host.set_slot_playing(PATTERN, true);
    send(&mut host, &mut tracker, event);

    let event = host.set_transport(false);
    tracker.handle(&mut host, event);
    assert_eq!(host.stops(), vec![BASS]);

    let event = host.set_transport(true);
    tracker.handle(&mut host, event);
    assert_eq!(host.launches(), vec![BASSLINE, BASSLINE]);
}

#[test]
fn remap_picks_up_new_group_names() {
    let mut host = SimHost::new(vec![
        SimTrack::group("Synths", vec![SimTrack::track("Pad", vec![SimSlot::clip("chords")])]),
        SimTrack::group("Seq", vec![SimTrack::track("1", vec![SimSlot::clip("chords")])]),
    ]);
    host.set_transport(true);
    let config = TrackerConfig::default().with_groups("Synths", "Seq");
    let mut tracker = PatternTracker::new(config, true);
    let report = tracker.remap(&mut host);
    assert!(report.devices_found);
    assert!(report.patterns_found);

    let event = host.set_slot_playing(TrackSlotAddress::new(1, 0, 0), true);
    send(&mut host, &mut tracker, event);
    assert_eq!(host.launches(), vec![TrackSlotAddress::new(0, 0, 0)]);
}

#[test]
fn remap_without_groups_maps_nothing() {
    let mut host = SimHost::new(vec![SimTrack::track("Audio 1", vec![SimSlot::clip("x")])]);
    let mut tracker = PatternTracker::new(TrackerConfig::default(), true);
    let report = tracker.remap(&mut host);
    assert!(!report.devices_found);
    assert!(!report.patterns_found);
    assert_eq!(report.mapped, 0);
    assert!(tracker.patterns().is_empty());
}

#[test]
fn duplicate_device_names_last_one_wins() {
    let mut host = SimHost::new(vec![
        SimTrack::group(
            "Devices",
            vec![
                SimTrack::track("Bass", vec![SimSlot::clip("hook")]),
                SimTrack::track("Lead", vec![SimSlot::clip("hook")]),
            ],
        ),
        SimTrack::group("Patterns", vec![SimTrack::track("A", vec![SimSlot::clip("hook")])]),
    ]);
    host.set_transport(true);
    let mut tracker = PatternTracker::new(TrackerConfig::default(), true);
    let report = tracker.remap(&mut host);
    assert_eq!(report.mapped, 1);

    let event = host.set_slot_playing(PATTERN, true);
    send(&mut host, &mut tracker, event);
    assert_eq!(host.launches(), vec![TrackSlotAddress::new(0, 1, 0)]);
}

#[test]
fn custom_stop_keyword_applies_to_later_events() {
    let (mut host, mut tracker) = start(true, TrackerConfig::default());
    tracker.handle(&mut host, HostEvent::StopKeywordChanged("off:".to_string()));

    let slot = TrackSlotAddress::new(1, 0, 1);
    let event = host.set_slot_name(slot, "off:Bass");
    send(&mut host, &mut tracker, event);
    let event = host.set_slot_playing(slot, true);
    send(&mut host, &mut tracker, event);
    assert_eq!(host.stops(), vec![BASS]);
}
