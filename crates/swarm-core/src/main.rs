//! Headless swarm runner
//!
//! Spawns a seeded population, runs a fixed number of ticks, and writes frame
//! snapshots plus end-of-run statistics as JSON.

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use swarm_core::output::{write_frame, write_stats};
use swarm_core::{spawn_population, Config, Simulation, SwarmError};

/// Command line arguments. Flags override values from the config file.
#[derive(Parser, Debug)]
#[command(name = "swarm_sim")]
#[command(about = "Headless boids and predator swarm simulation")]
struct Args {
    /// TOML config file (defaults to swarm.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Wall-clock seconds per tick, before time scaling
    #[arg(long)]
    dt: Option<f32>,

    /// Number of prey to spawn
    #[arg(long)]
    prey: Option<usize>,

    /// Number of predators to spawn
    #[arg(long)]
    predators: Option<usize>,

    /// Ticks between frame snapshots (0 disables them)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for frames and stats
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.run.seed = seed;
        }
        if let Some(ticks) = self.ticks {
            config.run.ticks = ticks;
        }
        if let Some(dt) = self.dt {
            config.run.delta_time = dt;
        }
        if let Some(prey) = self.prey {
            config.spawn.prey_count = prey;
        }
        if let Some(predators) = self.predators {
            config.spawn.predator_count = predators;
        }
        if let Some(interval) = self.snapshot_interval {
            config.run.snapshot_interval = interval;
        }
        if let Some(dir) = &self.output_dir {
            config.run.output_dir = dir.clone();
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SwarmError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default()?,
    };
    args.apply(&mut config);
    config.validate()?;

    let run = config.run.clone();
    info!(
        seed = run.seed,
        ticks = run.ticks,
        dt = run.delta_time,
        snapshot_interval = run.snapshot_interval,
        "starting swarm simulation"
    );

    let mut sim = Simulation::new(config.simulation.clone())?;
    let mut rng = SmallRng::seed_from_u64(run.seed);
    let summary = spawn_population(&mut sim, &config.spawn, &mut rng)?;
    info!(total = summary.total(), "agents ready");

    for _ in 0..run.ticks {
        sim.tick(run.delta_time);

        let tick = sim.clock().tick();
        if run.snapshot_interval > 0 && tick % run.snapshot_interval == 0 {
            let frame = sim.frame_snapshot();
            match write_frame(&frame, &run.output_dir) {
                Ok(path) => info!(tick, agents = frame.agents.len(), path = %path.display(), "frame written"),
                Err(e) => warn!(tick, "could not write frame: {}", e),
            }
        }
    }

    let stats = sim.population_stats();
    info!(
        tick = stats.timestamp.tick,
        prey_active = stats.prey.active,
        predators_active = stats.predators.active,
        attacks = stats.attacks_total,
        "simulation complete"
    );
    if let Err(e) = write_stats(&stats, &run.output_dir) {
        warn!("could not write stats: {}", e);
    }
    Ok(())
}
