//! Configuration System
//!
//! Loads simulation and spawn parameters from `swarm.toml` so runs can be tuned
//! without recompiling. Every section falls back to defaults for missing keys.

use bevy_ecs::prelude::*;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::spatial::search_reach_is_bounded;

/// Default config file path
pub const DEFAULT_CONFIG_PATH: &str = "swarm.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub spawn: SpawnConfig,
    pub run: RunConfig,
}

/// How prey alignment is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// Steer toward the mean heading of the neighbors
    #[default]
    NeighborAverage,
    /// Reinforce the agent's own heading whenever it has neighbors
    OwnHeading,
}

/// Which clock drives the predator wander pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WanderClock {
    /// Accumulated simulated time
    #[default]
    Elapsed,
    /// The current tick's scaled delta time
    FrameDelta,
}

/// Global simulation parameters, read-only during a tick
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Multiplier applied to every tick's wall-clock delta
    pub time_scale: f32,
    /// Edge length of a spatial grid cell
    pub cell_size: f32,
    pub boundary_center: Vec3,
    pub boundary_radius: f32,
    /// Neighbor list capacity per agent; extra matches are dropped
    pub max_neighbors: usize,
    /// Lock shards per spatial grid
    pub grid_shards: usize,
    pub alignment: AlignmentMode,
    pub wander_clock: WanderClock,
    /// Fear gained per second while predators are in sight
    pub threat_fear_gain: f32,
    /// Hunger removed by a landed attack
    pub attack_hunger_relief: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            cell_size: 20.0,
            boundary_center: Vec3::ZERO,
            boundary_radius: 120.0,
            max_neighbors: 128,
            grid_shards: 64,
            alignment: AlignmentMode::default(),
            wander_clock: WanderClock::default(),
            threat_fear_gain: 1.0,
            attack_hunger_relief: 25.0,
        }
    }
}

impl SimulationConfig {
    /// Rejects values that would make the pipeline divide by zero or loop forever.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size > 0.0) || !self.cell_size.is_finite() {
            return Err(ConfigError::invalid("simulation.cell_size", "must be positive and finite"));
        }
        if !(self.boundary_radius > 0.0) || !self.boundary_radius.is_finite() {
            return Err(ConfigError::invalid("simulation.boundary_radius", "must be positive and finite"));
        }
        if !(self.time_scale >= 0.0) || !self.time_scale.is_finite() {
            return Err(ConfigError::invalid("simulation.time_scale", "must be zero or positive"));
        }
        if !self.boundary_center.is_finite() {
            return Err(ConfigError::invalid("simulation.boundary_center", "must be finite"));
        }
        if self.max_neighbors == 0 {
            return Err(ConfigError::invalid("simulation.max_neighbors", "must be at least 1"));
        }
        if self.grid_shards == 0 {
            return Err(ConfigError::invalid("simulation.grid_shards", "must be at least 1"));
        }
        if self.threat_fear_gain < 0.0 || self.attack_hunger_relief < 0.0 {
            return Err(ConfigError::invalid("simulation", "fear gain and hunger relief cannot be negative"));
        }
        Ok(())
    }
}

/// Tunables for one prey agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreyProfile {
    pub max_speed: f32,
    pub acceleration: f32,
    pub rotation_speed: f32,
    pub detection_radius: f32,
    pub avoidance_radius: f32,
    pub size: f32,
    pub color: [f32; 4],
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub boundary_weight: f32,
    pub predator_avoidance_weight: f32,
}

impl Default for PreyProfile {
    fn default() -> Self {
        Self {
            max_speed: 25.0,
            acceleration: 15.0,
            rotation_speed: 8.0,
            detection_radius: 15.0,
            avoidance_radius: 2.5,
            size: 0.8,
            color: [0.0, 1.0, 1.0, 1.0],
            separation_weight: 1.8,
            alignment_weight: 1.2,
            cohesion_weight: 1.0,
            boundary_weight: 0.7,
            predator_avoidance_weight: 2.5,
        }
    }
}

/// Tunables for one predator agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorProfile {
    pub max_speed: f32,
    pub acceleration: f32,
    pub rotation_speed: f32,
    pub detection_radius: f32,
    pub size: f32,
    pub color: [f32; 4],
    pub attack_cooldown: f32,
    pub max_hunger: f32,
}

impl Default for PredatorProfile {
    fn default() -> Self {
        Self {
            max_speed: 40.0,
            acceleration: 25.0,
            rotation_speed: 6.0,
            detection_radius: 40.0,
            size: 1.5,
            color: [1.0, 0.0, 0.0, 1.0],
            attack_cooldown: 0.8,
            max_hunger: 100.0,
        }
    }
}

/// Initial population parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub prey_count: usize,
    pub predator_count: usize,
    pub spawn_radius: f32,
    pub spawn_height: f32,
    pub randomize_speed: bool,
    /// Relative max-speed variation, e.g. 0.3 for +/-30%
    pub speed_randomness: f32,
    pub prey: PreyProfile,
    pub predator: PredatorProfile,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            prey_count: 100,
            predator_count: 5,
            spawn_radius: 80.0,
            spawn_height: 30.0,
            randomize_speed: true,
            speed_randomness: 0.3,
            prey: PreyProfile::default(),
            predator: PredatorProfile::default(),
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spawn_radius < 0.0 || self.spawn_height < 0.0 {
            return Err(ConfigError::invalid("spawn.spawn_radius", "spawn extents cannot be negative"));
        }
        if !(0.0..1.0).contains(&self.speed_randomness) {
            return Err(ConfigError::invalid("spawn.speed_randomness", "must be in [0, 1)"));
        }
        if !(self.prey.detection_radius > 0.0) || !(self.prey.avoidance_radius > 0.0) {
            return Err(ConfigError::invalid("spawn.prey", "radii must be positive"));
        }
        if !(self.predator.detection_radius > 0.0) || !(self.predator.size > 0.0) {
            return Err(ConfigError::invalid("spawn.predator", "detection radius and size must be positive"));
        }
        Ok(())
    }
}

/// Headless run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub seed: u64,
    pub ticks: u64,
    /// Wall-clock seconds fed to each tick
    pub delta_time: f32,
    /// Ticks between frame snapshots, 0 disables them
    pub snapshot_interval: u64,
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks: 1000,
            delta_time: 1.0 / 60.0,
            snapshot_interval: 100,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default path, or use defaults if it does not exist
    pub fn load_or_default() -> Result<Self, ConfigError> {
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::load(DEFAULT_CONFIG_PATH)
        } else {
            tracing::info!("{} not found, using built-in defaults", DEFAULT_CONFIG_PATH);
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.spawn.validate()?;
        let cell_size = self.simulation.cell_size;
        if !search_reach_is_bounded(self.spawn.prey.detection_radius, cell_size)
            || !search_reach_is_bounded(self.spawn.predator.detection_radius, cell_size)
        {
            return Err(ConfigError::invalid(
                "simulation.cell_size",
                "too small for the configured detection radii",
            ));
        }
        if !(self.run.delta_time >= 0.0) {
            return Err(ConfigError::invalid("run.delta_time", "must be zero or positive"));
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: &'static str) -> Self {
        ConfigError::Invalid { field, reason }
    }
}
