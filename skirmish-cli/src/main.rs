use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use skirmish_cli::{load_scenario, parse_override, run_scenario, RunOptions};
use skirmish_shared::ScenarioSettings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless skirmish simulation", long_about = None)]
struct Args {
    /// JSON scenario file with "tunables" and "battle" sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of frames to simulate
    #[arg(short, long, default_value_t = 36_000)]
    ticks: u64,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Send idle units at the enemy base every N frames (0 disables)
    #[arg(short, long, default_value_t = 180)]
    assault_every: u64,

    /// Override a tunable, e.g. --set separationForce=0.5 (repeatable)
    #[arg(long = "set", value_parser = parse_set)]
    overrides: Vec<(String, f32)>,

    /// Include final unit snapshots in the output
    #[arg(long)]
    snapshot: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn parse_set(raw: &str) -> Result<(String, f32), String> {
    parse_override(raw).map_err(|e| format!("{:#}", e))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let scenario = match &args.config {
        Some(path) => {
            log::info!("Scenario: {}", path.display());
            load_scenario(path)?
        }
        None => ScenarioSettings::default(),
    };

    let options = RunOptions {
        ticks: args.ticks,
        fps: args.fps,
        seed: args.seed,
        assault_every: args.assault_every,
        overrides: args.overrides,
    };
    log::info!(
        "Running up to {} ticks at {} fps{}",
        options.ticks,
        options.fps,
        options
            .seed
            .map(|seed| format!(" (seed {})", seed))
            .unwrap_or_default()
    );

    let summary = run_scenario(&scenario, &options, args.snapshot).context("Simulation failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to encode summary")?
    );

    Ok(())
}
