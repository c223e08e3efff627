//! Headless simulation runner.
//!
//! Drives a run for a fixed number of ticks (or until extinction) and logs
//! periodic statistics. The long-running service lives in
//! `vivarium_server`; this binary is for local experiments and profiling.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vivarium_core::{Metrics, SimConfig, Simulation};

#[derive(Parser, Debug)]
#[command(name = "vivarium", about = "Run a creature-evolution simulation headlessly")]
struct Args {
    /// TOML config file; CLI flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<i32>,

    #[arg(long)]
    height: Option<i32>,

    #[arg(long)]
    population: Option<usize>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// Log a stats line every N ticks.
    #[arg(long, default_value_t = 100)]
    stats_every: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn,vivarium=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::from_toml(&std::fs::read_to_string(path)?)?,
        None => SimConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(population) = args.population {
        config.initial_population = population;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let mut sim = Simulation::new();
    let resolved = sim.start(config)?;
    tracing::info!(
        width = resolved.width,
        height = resolved.height,
        population = resolved.initial_population,
        seed = ?resolved.seed,
        "Run starting"
    );

    let metrics = Metrics::new();
    for _ in 0..args.ticks {
        let tick_start = Instant::now();
        sim.step()?;
        let data = sim.snapshot()?;
        metrics.record_tick(
            tick_start.elapsed(),
            data.stats.population,
            data.stats.food_locations,
        );

        if data.stats.step_count % args.stats_every == 0 {
            tracing::info!(
                tick = data.stats.step_count,
                population = data.stats.population,
                generation = data.stats.generation,
                avg_age = data.stats.avg_creature_age,
                food_cells = data.stats.food_locations,
                "Stats"
            );
        }
        if data.is_simulation_over {
            tracing::info!(tick = data.stats.step_count, "Population extinct");
            break;
        }
    }

    let final_stats = sim.snapshot()?.stats;
    println!("{}", serde_json::to_string_pretty(&final_stats)?);
    tracing::info!(
        ticks = metrics.tick_count(),
        elapsed_ms = metrics.elapsed().as_millis() as u64,
        "Run finished"
    );
    Ok(())
}
