//! Scenario replay command.
//!
//! Builds a simulated live set from a scenario file, remaps it, replays each
//! step through the tracker, and prints every launch and stop it issued.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

use pattern_tracker_config::Settings;
use pattern_tracker_core::{
    PatternTracker,
    sim::{HostCommand, SimHost},
};

use crate::scenario::Scenario;

#[derive(Args)]
pub struct SimulateArgs {
    /// Scenario file (TOML)
    scenario: PathBuf,

    /// Settings file to use instead of the defaults
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Write a JSON report of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

pub fn run(args: SimulateArgs) -> anyhow::Result<()> {
    let settings = match &args.settings {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading settings");
            Settings::load(path)?
        }
        None => {
            tracing::debug!("using default settings");
            Settings::default()
        }
    };
    let config = settings.to_tracker_config()?;
    let scenario = Scenario::load(&args.scenario)?;
    tracing::info!(
        scenario = %args.scenario.display(),
        tracks = scenario.tracks.len(),
        steps = scenario.steps.len(),
        "replaying scenario"
    );

    let mut host = scenario.build_host();
    let mut tracker = PatternTracker::new(config, scenario.transport_playing);

    let remap = tracker.remap(&mut host);
    println!(
        "remap: {} device clips mapped, {} pattern slots",
        remap.mapped, remap.pattern_slots
    );
    if !remap.devices_found {
        println!("  no '{}' group found", settings.devices_group);
    }
    if !remap.patterns_found {
        println!("  no '{}' group found", settings.patterns_group);
    }
    print_commands(&mut host);

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        println!("step {}: {step}", index + 1);
        step.apply(&mut host, &mut tracker)
            .with_context(|| format!("step {} ({step}) failed", index + 1))?;
        let commands = print_commands(&mut host);
        steps.push(serde_json::json!({
            "step": step.to_string(),
            "commands": commands,
        }));
    }

    println!();
    println!("Mapping:");
    if tracker.mapping().is_empty() {
        println!("  (empty)");
    }
    for (name, binding) in tracker.mapping().iter() {
        println!("  {:24} -> {} on \"{}\"", format!("\"{name}\""), binding.slot, binding.track_name);
    }

    println!();
    println!("Pattern slots:");
    let active: Vec<_> = tracker
        .patterns()
        .iter()
        .filter(|(_, s)| s.play.is_playing() || s.triggered.is_some())
        .collect();
    if active.is_empty() {
        println!("  (none playing)");
    }
    for (slot, state) in &active {
        let triggered = state
            .triggered
            .map_or_else(|| "-".to_string(), |t| t.to_string());
        println!("  {slot} \"{}\" {} triggered {triggered}", state.name, state.play);
    }

    if let Some(path) = &args.report {
        let mapping: Vec<_> = tracker
            .mapping()
            .iter()
            .map(|(name, b)| {
                serde_json::json!({
                    "name": name,
                    "slot": b.slot.to_string(),
                    "track": b.track_name,
                })
            })
            .collect();
        let patterns: Vec<_> = tracker
            .patterns()
            .iter()
            .map(|(slot, s)| {
                serde_json::json!({
                    "slot": slot.to_string(),
                    "name": s.name,
                    "play": s.play.to_string(),
                    "triggered": s.triggered.map(|t| t.to_string()),
                })
            })
            .collect();
        let report = serde_json::json!({
            "scenario": args.scenario.display().to_string(),
            "remap": {
                "devices_found": remap.devices_found,
                "patterns_found": remap.patterns_found,
                "mapped": remap.mapped,
                "pattern_slots": remap.pattern_slots,
            },
            "steps": steps,
            "mapping": mapping,
            "patterns": patterns,
        });
        std::fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("failed to write report '{}'", path.display()))?;
        println!();
        println!("Report written to {}", path.display());
    }

    Ok(())
}

/// Prints and drains the host's recorded commands.
fn print_commands(host: &mut SimHost) -> Vec<String> {
    host.take_commands()
        .into_iter()
        .map(|command| {
            let line = match command {
                HostCommand::Launch(slot) => format!("launch {slot}"),
                HostCommand::StopTrack(track) => format!("stop {track}"),
            };
            println!("  -> {line}");
            line
        })
        .collect()
}
