//! Boids and Predator Swarm Simulation
//!
//! A per-tick pipeline over thousands of agents: rebuild a hashed spatial grid,
//! query each agent's neighborhood, steer prey and predators, then integrate motion.

pub mod behavior;
pub mod clock;
pub mod components;
pub mod config;
pub mod error;
pub mod math;
pub mod motion;
pub mod output;
pub mod pipeline;
pub mod setup;
pub mod spatial;
pub mod systems;

pub use components::*;

pub use clock::{SimClock, TickCounters};
pub use config::{AlignmentMode, Config, ConfigError, SimulationConfig, SpawnConfig, WanderClock};
pub use error::SwarmError;
pub use pipeline::{build_schedule, Simulation};
pub use setup::{spawn_population, AgentSpec, SpawnSummary};
