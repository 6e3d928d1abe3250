//! Pattern Tracker CLI - scenario replay and settings management.

mod commands;
mod scenario;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pattern-tracker")]
#[command(author, version, about = "Pattern Tracker CLI", long_about = None)]
struct Cli {
    /// Log per-slot detail (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario against a simulated live set
    Simulate(commands::simulate::SimulateArgs),

    /// Show, validate, or create the settings file
    Settings(commands::settings::SettingsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;

    match cli.command {
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Settings(args) => commands::settings::run(args),
    }
}
