//! Dark Carnival terminal front-end
//!
//! Interactive by default. With `--ticks N` the world runs headless, prints a
//! summary and optionally exports a seed.
//!
//! Usage:
//!   carnival --seed 42
//!   carnival --ticks 500 --export world.seed
//!   RUST_LOG=carnival_core=debug carnival --ticks 50

mod app;
mod render;

use anyhow::{Context, Result};
use carnival_core::prelude::*;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;

#[derive(Parser, Debug)]
#[command(name = "carnival")]
#[command(about = "Dark Carnival RNG ecology - a tick-based artificial-life sandbox", long_about = None)]
struct Args {
    /// RNG seed (fresh entropy when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Starting population
    #[arg(short, long)]
    population: Option<u32>,

    /// JSON world configuration; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from a seed file instead of a generated world
    #[arg(short, long)]
    import: Option<PathBuf>,

    /// Run this many ticks headless and print a summary
    #[arg(short, long)]
    ticks: Option<u32>,

    /// Export a seed after a headless run
    #[arg(short, long, requires = "ticks")]
    export: Option<PathBuf>,

    /// Log lines shown in the headless summary
    #[arg(long, default_value = "10")]
    last: usize,

    /// Debug-level diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn world_config(&self) -> Result<WorldConfig> {
        let mut config = match &self.config {
            Some(path) => WorldConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => WorldConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(population) = self.population {
            config.population = population;
        }
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Diagnostics go to stderr so they never interleave with the frame
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = args.world_config()?;
    let mut engine = SimulationEngine::new(config).context("invalid world configuration")?;

    if let Some(path) = &args.import {
        engine
            .import_seed(path)
            .with_context(|| format!("failed to import {}", path.display()))?;
    }

    match args.ticks {
        Some(ticks) => run_headless(engine, ticks, &args),
        None => {
            let mut app = App::new(engine);
            app.run(&mut io::stdin().lock(), &mut io::stdout().lock())
        }
    }
}

fn run_headless(mut engine: SimulationEngine, ticks: u32, args: &Args) -> Result<()> {
    info!(ticks, strain = %engine.seed_strain(), "headless run");
    engine.auto_run(ticks)?;

    print!("{}", render::summary(&engine, args.last));

    if let Some(path) = &args.export {
        let written = engine
            .export_seed(Some(path.as_path()))
            .with_context(|| format!("failed to export {}", path.display()))?;
        println!("exported: {}", written.display());
    }
    Ok(())
}
