//! Agent descriptions handed to [`Simulation::spawn`](crate::pipeline::Simulation::spawn).

use glam::{Quat, Vec3};

use crate::components::{AgentKind, AgentState, BehaviorWeights, Movement, Perception, Pose, Predator, Visual};
use crate::config::{PredatorProfile, PreyProfile};
use crate::error::SwarmError;
use crate::math::{look_rotation, safe_normalize};
use crate::motion::WORLD_UP;
use crate::spatial::search_reach_is_bounded;

/// Deceleration as a fraction of acceleration
const PREY_DECELERATION_RATIO: f32 = 0.6;
const PREDATOR_DECELERATION_RATIO: f32 = 0.4;
const PREY_PERSONAL_SPACE_RATIO: f32 = 0.7;
const PREDATOR_ATTACK_RANGE_RATIO: f32 = 1.2;
const PREDATOR_LOCK_RATIO: f32 = 0.5;

/// Fully initialized agent record
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSpec {
    pub kind: AgentKind,
    pub pose: Pose,
    pub movement: Movement,
    pub perception: Perception,
    pub weights: BehaviorWeights,
    pub state: AgentState,
    pub visual: Visual,
    /// Required for predators, rejected for prey
    pub predator: Option<Predator>,
    pub active: bool,
    pub visible: bool,
}

impl AgentSpec {
    /// Prey with default tunables, at rest
    pub fn prey(position: Vec3, direction: Vec3) -> Self {
        Self::from_prey_profile(&PreyProfile::default(), position, direction)
    }

    /// Predator with default tunables, at rest
    pub fn predator(position: Vec3, direction: Vec3) -> Self {
        Self::from_predator_profile(&PredatorProfile::default(), position, direction)
    }

    pub fn from_prey_profile(profile: &PreyProfile, position: Vec3, direction: Vec3) -> Self {
        let direction = safe_normalize(direction);
        Self {
            kind: AgentKind::Prey,
            pose: Pose::new(position, facing(direction)),
            movement: Movement {
                speed: 0.0,
                max_speed: profile.max_speed,
                acceleration: profile.acceleration,
                deceleration: profile.acceleration * PREY_DECELERATION_RATIO,
                direction,
                rotation_speed: profile.rotation_speed,
            },
            perception: Perception {
                detection_radius: profile.detection_radius,
                personal_space_radius: profile.avoidance_radius * PREY_PERSONAL_SPACE_RATIO,
            },
            weights: BehaviorWeights {
                separation: profile.separation_weight,
                alignment: profile.alignment_weight,
                cohesion: profile.cohesion_weight,
                boundary: profile.boundary_weight,
                target_attraction: 0.3,
                predator_avoidance: profile.predator_avoidance_weight,
            },
            state: AgentState::default(),
            visual: Visual {
                size_multiplier: profile.size,
                color: profile.color,
            },
            predator: None,
            active: true,
            visible: true,
        }
    }

    pub fn from_predator_profile(profile: &PredatorProfile, position: Vec3, direction: Vec3) -> Self {
        let direction = safe_normalize(direction);
        Self {
            kind: AgentKind::Predator,
            pose: Pose::new(position, facing(direction)),
            movement: Movement {
                speed: 0.0,
                max_speed: profile.max_speed,
                acceleration: profile.acceleration,
                deceleration: profile.acceleration * PREDATOR_DECELERATION_RATIO,
                direction,
                rotation_speed: profile.rotation_speed,
            },
            perception: Perception {
                detection_radius: profile.detection_radius,
                personal_space_radius: profile.size,
            },
            weights: BehaviorWeights {
                boundary: 1.0,
                target_attraction: 1.0,
                ..Default::default()
            },
            state: AgentState {
                energy: 150.0,
                max_energy: 150.0,
                consumption_rate: 0.15,
                aggression: 0.8,
                curiosity: 0.5,
                ..Default::default()
            },
            visual: Visual {
                size_multiplier: profile.size,
                color: profile.color,
            },
            predator: Some(Predator {
                attack_range: profile.size * PREDATOR_ATTACK_RANGE_RATIO,
                attack_cooldown: profile.attack_cooldown,
                target_lock_distance: profile.detection_radius * PREDATOR_LOCK_RATIO,
                max_hunger: profile.max_hunger,
                ..Default::default()
            }),
            active: true,
            visible: true,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.movement.speed = speed;
        self
    }

    pub fn with_weights(mut self, weights: BehaviorWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_perception(mut self, detection_radius: f32, personal_space_radius: f32) -> Self {
        self.perception = Perception {
            detection_radius,
            personal_space_radius,
        };
        self
    }

    pub fn with_rotation_speed(mut self, rotation_speed: f32) -> Self {
        self.movement.rotation_speed = rotation_speed;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Rejects records the pipeline cannot run safely.
    pub fn validate(&self) -> Result<(), SwarmError> {
        let p = &self.perception;
        if !(p.detection_radius > 0.0) || !p.detection_radius.is_finite() {
            return Err(SwarmError::InvalidAgent("detection radius must be positive and finite"));
        }
        if !(p.personal_space_radius > 0.0) || !p.personal_space_radius.is_finite() {
            return Err(SwarmError::InvalidAgent("personal space radius must be positive and finite"));
        }

        let m = &self.movement;
        if !(m.max_speed >= 0.0) || !m.max_speed.is_finite() {
            return Err(SwarmError::InvalidAgent("max speed must be zero or positive"));
        }
        if !(m.acceleration >= 0.0) || !(m.deceleration >= 0.0) || !(m.rotation_speed >= 0.0) {
            return Err(SwarmError::InvalidAgent("rates cannot be negative"));
        }
        if !self.pose.position.is_finite() || !m.direction.is_finite() || !m.speed.is_finite() {
            return Err(SwarmError::InvalidAgent("position, heading and speed must be finite"));
        }

        match (self.kind, &self.predator) {
            (AgentKind::Predator, None) => Err(SwarmError::InvalidAgent("predator is missing its hunting state")),
            (AgentKind::Prey, Some(_)) => Err(SwarmError::InvalidAgent("prey cannot carry hunting state")),
            _ => Ok(()),
        }
    }

    /// Rejects detection radii that would scan more than `MAX_SEARCH_CELLS` cells per side.
    pub fn validate_reach(&self, cell_size: f32) -> Result<(), SwarmError> {
        if search_reach_is_bounded(self.perception.detection_radius, cell_size) {
            Ok(())
        } else {
            Err(SwarmError::InvalidAgent("detection radius spans too many grid cells"))
        }
    }
}

fn facing(direction: Vec3) -> Quat {
    look_rotation(direction, WORLD_UP).unwrap_or(Quat::IDENTITY)
}
