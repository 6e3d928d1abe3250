//! Settings file commands.
//!
//! Provides commands to show, validate, and create the settings file.

use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use pattern_tracker_config::{Settings, settings_path};

#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsCommand,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Show the effective settings
    Show {
        /// Settings file (defaults to the user settings file)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Check a settings file against the allowed bounds
    Validate {
        /// Settings file to check
        file: PathBuf,
    },

    /// Write a settings file with default values
    Init {
        /// Where to write (defaults to the user settings file)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: SettingsArgs) -> anyhow::Result<()> {
    match args.command {
        SettingsCommand::Show { path } => show(&path.unwrap_or_else(settings_path)),
        SettingsCommand::Validate { file } => validate(&file),
        SettingsCommand::Init { path, force } => init(&path.unwrap_or_else(settings_path), force),
    }
}

fn show(path: &Path) -> anyhow::Result<()> {
    let settings = Settings::load_or_default(path)?;
    if path.is_file() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
    }
    print!("{}", settings.to_toml()?);
    Ok(())
}

fn validate(path: &Path) -> anyhow::Result<()> {
    let settings = Settings::load(path)?;
    settings.validate()?;
    println!("{}: OK", path.display());
    Ok(())
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "settings file '{}' already exists. Use --force to overwrite.",
            path.display()
        );
    }
    Settings::default().save(path)?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}
