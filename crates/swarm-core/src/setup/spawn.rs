//! Population Spawning
//!
//! Scatters the initial prey flock and predator pack around the boundary center.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::Rng;
use tracing::info;

use super::agent::AgentSpec;
use crate::config::SpawnConfig;
use crate::error::SwarmError;
use crate::math::safe_normalize;
use crate::pipeline::Simulation;

/// Prey headings are mostly horizontal
const PREY_VERTICAL_HEADING_SCALE: f32 = 0.3;
/// Predators spawn closer to the center than prey
const PREDATOR_SPAWN_RADIUS_RATIO: f32 = 0.4;
const PREDATOR_SPAWN_HEIGHT_RATIO: f32 = 0.3;
/// Upper bound of the random starting hunger
const PREDATOR_INITIAL_HUNGER: f32 = 30.0;

/// Counts of spawned agents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnSummary {
    pub prey: usize,
    pub predators: usize,
}

impl SpawnSummary {
    pub fn total(&self) -> usize {
        self.prey + self.predators
    }
}

/// Spawns the configured population. Same seed, same population.
pub fn spawn_population(
    sim: &mut Simulation,
    config: &SpawnConfig,
    rng: &mut SmallRng,
) -> Result<SpawnSummary, SwarmError> {
    config.validate()?;
    let center = sim.config().boundary_center;
    let mut summary = SpawnSummary::default();

    for _ in 0..config.prey_count {
        sim.spawn(random_prey(config, center, rng))?;
        summary.prey += 1;
    }
    for _ in 0..config.predator_count {
        sim.spawn(random_predator(config, center, rng))?;
        summary.predators += 1;
    }

    info!(prey = summary.prey, predators = summary.predators, "population spawned");
    Ok(summary)
}

fn random_prey(config: &SpawnConfig, center: Vec3, rng: &mut SmallRng) -> AgentSpec {
    let (x, z) = point_in_disk(rng, config.spawn_radius);
    let height = config.spawn_height;
    let y = rng.gen_range(-0.3 * height..=0.7 * height);

    let heading = random_direction(rng);
    let heading = safe_normalize(Vec3::new(heading.x, heading.y * PREY_VERTICAL_HEADING_SCALE, heading.z));

    let mut spec = AgentSpec::from_prey_profile(&config.prey, center + Vec3::new(x, y, z), heading);
    if config.randomize_speed {
        spec.movement.max_speed *= 1.0 + jitter(rng, config.speed_randomness);
    }
    spec.movement.speed = spec.movement.max_speed * rng.gen_range(0.3..=0.8);
    spec
}

fn random_predator(config: &SpawnConfig, center: Vec3, rng: &mut SmallRng) -> AgentSpec {
    let (x, z) = point_in_disk(rng, config.spawn_radius * PREDATOR_SPAWN_RADIUS_RATIO);
    let y = rng.gen_range(0.0..=config.spawn_height * PREDATOR_SPAWN_HEIGHT_RATIO);

    let mut spec = AgentSpec::from_predator_profile(&config.predator, center + Vec3::new(x, y, z), random_direction(rng));
    if config.randomize_speed {
        spec.movement.max_speed *= 1.0 + jitter(rng, config.speed_randomness * 0.5);
    }
    spec.movement.speed = spec.movement.max_speed * rng.gen_range(0.5..=0.9);
    if let Some(hunter) = spec.predator.as_mut() {
        hunter.hunger = rng
            .gen_range(0.0..=PREDATOR_INITIAL_HUNGER)
            .min(hunter.max_hunger.max(0.0));
    }
    spec
}

/// Uniform point in a disk on the XZ plane
fn point_in_disk(rng: &mut SmallRng, radius: f32) -> (f32, f32) {
    let r = radius * rng.gen::<f32>().sqrt();
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    (r * angle.cos(), r * angle.sin())
}

/// Uniform unit vector
fn random_direction(rng: &mut SmallRng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let length_squared = v.length_squared();
        if length_squared > 1e-4 && length_squared <= 1.0 {
            return v / length_squared.sqrt();
        }
    }
}

fn jitter(rng: &mut SmallRng, amount: f32) -> f32 {
    if amount > 0.0 {
        rng.gen_range(-amount..=amount)
    } else {
        0.0
    }
}
