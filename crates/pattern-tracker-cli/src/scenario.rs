//! Scenario files: a track tree plus a script of host events.
//!
//! ```toml
//! transport_playing = true
//!
//! [[tracks]]
//! name = "Devices"
//! is_group = true
//! [[tracks.children]]
//! name = "Bass"
//! slots = [{ name = "bassline" }, {}]
//!
//! [[tracks]]
//! name = "Patterns"
//! is_group = true
//! [[tracks.children]]
//! name = "A"
//! slots = [{ name = "bassline" }]
//!
//! [[steps]]
//! action = "slot_playing"
//! slot = [1, 0, 0]
//! playing = true
//! ```

use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use pattern_tracker_core::sim::{SimHost, SimSlot, SimTrack};
use pattern_tracker_core::{HostEvent, PatternTracker, TrackAddress, TrackSlotAddress};

/// A complete scenario.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Scenario {
    /// Transport state before the first step.
    #[serde(default)]
    pub transport_playing: bool,

    /// Top-level tracks.
    #[serde(default)]
    pub tracks: Vec<ScenarioTrack>,

    /// Events replayed after the initial remap.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A track in the scenario tree.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioTrack {
    pub name: String,

    #[serde(default)]
    pub is_group: bool,

    #[serde(default)]
    pub children: Vec<ScenarioTrack>,

    #[serde(default)]
    pub slots: Vec<ScenarioSlot>,
}

/// A clip slot. A named slot holds a clip unless `has_content` says otherwise.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ScenarioSlot {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub has_content: Option<bool>,
}

/// One scripted event.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Remap,
    Transport { playing: bool },
    SlotName { slot: [usize; 3], name: String },
    SlotContent { slot: [usize; 3], has_content: bool },
    SlotPlaying { slot: [usize; 3], playing: bool },
    KeepDevicesPlaying { enabled: bool },
    StopKeyword { keyword: String },
    RenameTrack { track: [usize; 2], name: String },
    RemoveTrack { track: [usize; 2] },
}

fn slot_address([group, child, slot]: [usize; 3]) -> TrackSlotAddress {
    TrackSlotAddress::new(group, child, slot)
}

fn track_address([group, child]: [usize; 2]) -> TrackAddress {
    TrackAddress::new(group, child)
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Remap => write!(f, "remap"),
            Step::Transport { playing } => {
                write!(f, "transport {}", if *playing { "start" } else { "stop" })
            }
            Step::SlotName { slot, name } => write!(f, "rename {} to \"{name}\"", slot_address(*slot)),
            Step::SlotContent { slot, has_content } => write!(
                f,
                "{} clip in {}",
                if *has_content { "add" } else { "remove" },
                slot_address(*slot)
            ),
            Step::SlotPlaying { slot, playing } => write!(
                f,
                "{} {}",
                if *playing { "play" } else { "stop" },
                slot_address(*slot)
            ),
            Step::KeepDevicesPlaying { enabled } => write!(f, "keep devices playing: {enabled}"),
            Step::StopKeyword { keyword } => write!(f, "stop keyword \"{keyword}\""),
            Step::RenameTrack { track, name } => {
                write!(f, "rename track {} to \"{name}\"", track_address(*track))
            }
            Step::RemoveTrack { track } => write!(f, "remove track {}", track_address(*track)),
        }
    }
}

impl Step {
    /// Applies the step to the host and delivers the resulting event.
    pub fn apply(&self, host: &mut SimHost, tracker: &mut PatternTracker) -> anyhow::Result<()> {
        let event = match self {
            Step::Remap => Some(HostEvent::RemapRequested),
            Step::Transport { playing } => Some(host.set_transport(*playing)),
            Step::SlotName { slot, name } => Some(
                host.set_slot_name(slot_address(*slot), name.clone())
                    .with_context(|| format!("no slot at {}", slot_address(*slot)))?,
            ),
            Step::SlotContent { slot, has_content } => Some(
                host.set_slot_content(slot_address(*slot), *has_content)
                    .with_context(|| format!("no slot at {}", slot_address(*slot)))?,
            ),
            Step::SlotPlaying { slot, playing } => Some(
                host.set_slot_playing(slot_address(*slot), *playing)
                    .with_context(|| format!("no slot at {}", slot_address(*slot)))?,
            ),
            Step::KeepDevicesPlaying { enabled } => Some(HostEvent::KeepDevicesPlayingChanged(*enabled)),
            Step::StopKeyword { keyword } => Some(HostEvent::StopKeywordChanged(keyword.clone())),
            Step::RenameTrack { track, name } => {
                if !host.rename_track(track_address(*track), name.clone()) {
                    anyhow::bail!("no track at {}", track_address(*track));
                }
                None
            }
            Step::RemoveTrack { track } => {
                if !host.remove_track(track_address(*track)) {
                    anyhow::bail!("no track at {}", track_address(*track));
                }
                None
            }
        };
        if let Some(event) = event {
            match event.slot() {
                Some(slot) => tracing::debug!(slot = %slot, "delivering {event:?}"),
                None => tracing::debug!("delivering {event:?}"),
            }
            tracker.handle(host, event);
        }
        Ok(())
    }
}

impl Scenario {
    /// Load a scenario from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario '{}'", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid scenario '{}'", path.display()))
    }

    /// Parse a scenario from a TOML string.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Builds the simulated host for the scenario's initial state.
    pub fn build_host(&self) -> SimHost {
        let mut host = SimHost::new(self.tracks.iter().map(ScenarioTrack::to_sim).collect());
        host.set_transport(self.transport_playing);
        host
    }
}

impl ScenarioTrack {
    fn to_sim(&self) -> SimTrack {
        let mut track = if self.is_group {
            SimTrack::group(&self.name, self.children.iter().map(ScenarioTrack::to_sim).collect())
        } else {
            SimTrack::track(&self.name, Vec::new())
        };
        track.slots = self.slots.iter().map(ScenarioSlot::to_sim).collect();
        track
    }
}

impl ScenarioSlot {
    fn to_sim(&self) -> SimSlot {
        if self.has_content.unwrap_or(!self.name.is_empty()) {
            SimSlot::clip(&self.name)
        } else {
            SimSlot {
                name: self.name.clone(),
                ..SimSlot::empty()
            }
        }
    }
}
