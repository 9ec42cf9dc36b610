use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use evo_drive::simulation::params::Params;
use evo_drive::simulation::race::{FrameObserver, GenerationSummary, Simulation};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "evo-drive",
    version,
    about = "Evolve car controllers on a ring track"
)]
struct Cli {
    /// JSON params file; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed of the random source.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of generations to run.
    #[arg(long)]
    generations: Option<usize>,
    /// Agents per generation (must be even).
    #[arg(long)]
    population: Option<usize>,
    /// Frame budget per generation.
    #[arg(long)]
    max_frames: Option<usize>,
    /// Update agents in parallel.
    #[arg(long)]
    parallel: bool,
    /// Print each generation summary as a JSON line on stdout.
    #[arg(long)]
    json: bool,
}

/// Prints generation summaries as JSON lines.
struct JsonLines;

impl FrameObserver for JsonLines {
    fn on_generation(&mut self, summary: &GenerationSummary) {
        match serde_json::to_string(summary) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "failed to encode summary"),
        }
    }

    fn wants_frames(&self) -> bool {
        false
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let params = build_params(&cli)?;

    info!(
        population = params.population_size,
        generations = params.generations,
        seed = params.seed,
        "Starting evo-drive"
    );

    let mut simulation = Simulation::new(params).context("invalid simulation params")?;
    let report = if cli.json {
        simulation.run(&mut JsonLines)?
    } else {
        simulation.run(&mut ())?
    };

    if let Some(best) = report.best {
        info!(
            generation = best.generation,
            max_fitness = best.max_fitness,
            weights = ?best.best_weights,
            "Best generation"
        );
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_params(cli: &Cli) -> Result<Params> {
    let mut params = match &cli.config {
        Some(path) => Params::load_from_file(path)
            .with_context(|| format!("failed to load params from {}", path.display()))?,
        None => Params::default(),
    };

    if let Some(seed) = cli.seed {
        params.seed = seed;
    }
    if let Some(generations) = cli.generations {
        params.generations = generations;
    }
    if let Some(population) = cli.population {
        params.population_size = population;
    }
    if let Some(max_frames) = cli.max_frames {
        params.max_frames_per_generation = max_frames;
    }
    params.parallel |= cli.parallel;

    params.validate().context("invalid simulation params")?;
    Ok(params)
}
