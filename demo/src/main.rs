//! Conditional Permissions: Demo CLI
//!
//! Runs one or all of the demo scenarios against the in-memory host. Each
//! scenario wires the real engine, hooks and built-in conditions together
//! with a scripted sequence of host events.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- regions --json
//!   cargo run -p demo -- chaining
//!   cargo run -p demo -- quests
//!   cargo run -p demo -- admin
//!   cargo run -p demo -- --config my.toml --regions my-regions.toml run-all

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use condperm_contracts::error::{CondpermError, CondpermResult};
use condperm_core::EngineConfig;

mod scenarios;

use scenarios::{admin, chaining, quests, regions, DemoOptions};

const DEFAULT_CONFIG: &str = include_str!("../data/condperm.toml");
const DEFAULT_REGIONS: &str = include_str!("../data/regions.toml");

// ── CLI definition ────────────────────────────────────────────────────────────

/// Conditional permissions demo.
///
/// Each subcommand runs one or all of the scenarios, showing how conditional
/// grants turn into concrete grants as entities move and change state.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Conditional permissions resolution demo",
    long_about = "Runs conditional permission scenarios showing region tracking,\n\
                  chained conditions, quest conditions, and the admin commands."
)]
struct Cli {
    /// Engine configuration TOML. Defaults to the bundled configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Region layout TOML. Defaults to the bundled layout.
    #[arg(long, global = true)]
    regions: Option<PathBuf>,

    /// Print resolution reports as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every scenario in sequence.
    RunAll,
    /// Scenario 1: grants that follow region membership.
    Regions,
    /// Scenario 2: a conditional grant whose target is another conditional grant.
    Chaining,
    /// Scenario 3: quest-engine conditions.
    Quests,
    /// Scenario 4: admin reload and debug commands.
    Admin,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for resolution traces.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let options = match load_options(&cli) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    };

    print_banner(&options.config);

    let result = match cli.command {
        Command::RunAll => run_all(&options),
        Command::Regions => regions::run_scenario(&options),
        Command::Chaining => chaining::run_scenario(&options),
        Command::Quests => quests::run_scenario(&options),
        Command::Admin => admin::run_scenario(&options),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_options(cli: &Cli) -> CondpermResult<DemoOptions> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::from_toml_str(DEFAULT_CONFIG)?,
    };
    let regions = match &cli.regions {
        Some(path) => std::fs::read_to_string(path).map_err(|e| CondpermError::ConfigError {
            reason: format!("failed to read region file '{}': {}", path.display(), e),
        })?,
        None => DEFAULT_REGIONS.to_string(),
    };
    Ok(DemoOptions { config, regions, json: cli.json })
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all(options: &DemoOptions) -> CondpermResult<()> {
    regions::run_scenario(options)?;
    chaining::run_scenario(options)?;
    quests::run_scenario(options)?;
    admin::run_scenario(options)?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner(config: &EngineConfig) {
    println!();
    println!("Conditional Permissions");
    println!("In-memory Host Demo");
    println!("=======================");
    println!();
    println!("Grant syntax: {}.[!]<condition>[=<parameter>].<target>", config.prefix);
    println!();
    println!("Resolution per entity:");
    println!("  [1] Previously applied grants are withdrawn");
    println!("  [2] Every conditional grant is evaluated against its condition");
    println!("  [3] Targets of satisfied grants are set, until nothing new applies");
    println!("  [4] Chained intermediates are withdrawn, concrete targets remain");
    println!();
}
