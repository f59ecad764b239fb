//! Error types for the simulation core.
//!
//! Only setup can fail. Once agents are in the world, every degenerate state
//! inside a tick falls back to a defined behavior instead of an error.

use bevy_ecs::entity::Entity;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SwarmError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// An agent description violates a precondition (non-positive radius, etc.)
    #[error("invalid agent: {0}")]
    InvalidAgent(&'static str),
    #[error("entity {0:?} is not a swarm agent")]
    UnknownEntity(Entity),
    #[error("speed multiplier must be positive and finite, got {0}")]
    InvalidSpeedScale(f32),
}
