//! Agent Components
//!
//! Motion, perception, steering weights and internal state shared by prey and predators.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use swarm_snapshot::KindTag;

use crate::spatial::NeighborRecord;

/// Which population an agent belongs to; selects grid and steering variant
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Prey,
    Predator,
}

impl From<AgentKind> for KindTag {
    fn from(kind: AgentKind) -> Self {
        match kind {
            AgentKind::Prey => KindTag::Prey,
            AgentKind::Predator => KindTag::Predator,
        }
    }
}

/// World-space placement
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

/// Heading and speed. `direction` is always unit length or zero.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    /// Current speed, kept in [0, max_speed]
    pub speed: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub direction: Vec3,
    /// Turn-rate factor per second, used by both heading blend and orientation slerp
    pub rotation_speed: f32,
}

impl Movement {
    pub fn velocity(&self) -> Vec3 {
        self.direction * self.speed
    }
}

/// Neighborhood radii
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    pub detection_radius: f32,
    /// Neighbors closer than this push the agent away
    pub personal_space_radius: f32,
}

/// Per-behavior steering weights
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BehaviorWeights {
    pub separation: f32,
    pub alignment: f32,
    pub cohesion: f32,
    pub boundary: f32,
    pub target_attraction: f32,
    pub predator_avoidance: f32,
}

/// Internal drives. Energy and fear are kept within their bounds.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AgentState {
    pub energy: f32,
    pub max_energy: f32,
    /// Energy spent per second
    pub consumption_rate: f32,
    pub fear: f32,
    pub max_fear: f32,
    pub aggression: f32,
    pub curiosity: f32,
}

impl Default for AgentState {
    fn default() -> Self {
        Self {
            energy: 100.0,
            max_energy: 100.0,
            consumption_rate: 0.05,
            fear: 0.0,
            max_fear: 1.0,
            aggression: 0.0,
            curiosity: 1.0,
        }
    }
}

/// Render hints passed through to frame snapshots
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub size_multiplier: f32,
    pub color: [f32; 4],
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            size_multiplier: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Agent participates in the pipeline. Removing it parks the agent without destroying it.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Active;

/// Agent is included in frame snapshots
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Visible;

/// Neighbor query must run for this agent
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct NeedsSpatialUpdate;

/// Steering must run for this agent
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct NeedsBehaviorUpdate;

/// Same-population neighbors (prey) or hunting candidates (predators) found this tick
#[derive(Component, Debug, Clone, Default)]
pub struct Neighbors {
    pub records: Vec<NeighborRecord>,
}

impl Neighbors {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.records.iter().any(|r| r.entity == entity)
    }
}

/// Predators within a prey agent's detection radius this tick
#[derive(Component, Debug, Clone, Default)]
pub struct Threats {
    pub records: Vec<NeighborRecord>,
}

impl Threats {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
