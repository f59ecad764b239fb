//! Prey steering: separation, alignment, cohesion, boundary and predator avoidance.

use glam::Vec3;

use super::steering::{apply_steering, boundary_force, Steering, PREY_BOUNDARY_THRESHOLD};
use crate::components::{AgentState, BehaviorWeights, Movement};
use crate::config::AlignmentMode;
use crate::math::safe_normalize;
use crate::spatial::NeighborRecord;

/// Prey never drop below this fraction of max speed
pub const PREY_MIN_SPEED_FRACTION: f32 = 0.5;
/// Fear lost per simulated second
pub const FEAR_DECAY_RATE: f32 = 0.5;

/// Everything one prey agent reads during steering
#[derive(Debug, Clone, Copy)]
pub struct PreyInput<'a> {
    pub position: Vec3,
    pub neighbors: &'a [NeighborRecord],
    pub threats: &'a [NeighborRecord],
    pub personal_space_radius: f32,
    pub weights: &'a BehaviorWeights,
    pub boundary_center: Vec3,
    pub boundary_radius: f32,
    pub alignment: AlignmentMode,
}

/// Individual forces before weighting
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PreyForces {
    pub separation: Vec3,
    pub alignment: Vec3,
    pub cohesion: Vec3,
    pub boundary: Vec3,
    pub avoidance: Vec3,
}

/// Push away from the mean position of neighbors inside personal space.
pub fn separation(neighbors: &[NeighborRecord], personal_space_radius: f32) -> Vec3 {
    let limit = personal_space_radius * personal_space_radius;
    let (sum, count) = neighbors
        .iter()
        .filter(|n| n.distance_squared < limit)
        .fold((Vec3::ZERO, 0u32), |(sum, count), n| {
            (sum + n.relative_position, count + 1)
        });

    if count == 0 {
        return Vec3::ZERO;
    }
    -safe_normalize(sum / count as f32)
}

/// Heading match. Zero when there are no neighbors.
pub fn alignment(heading: Vec3, neighbors: &[NeighborRecord], mode: AlignmentMode) -> Vec3 {
    if neighbors.is_empty() {
        return Vec3::ZERO;
    }
    match mode {
        AlignmentMode::NeighborAverage => {
            let sum: Vec3 = neighbors.iter().map(|n| n.heading).sum();
            safe_normalize(sum / neighbors.len() as f32)
        }
        AlignmentMode::OwnHeading => safe_normalize(heading),
    }
}

/// Steer toward the neighbors' mean absolute position.
pub fn cohesion(position: Vec3, neighbors: &[NeighborRecord]) -> Vec3 {
    if neighbors.is_empty() {
        return Vec3::ZERO;
    }
    let center: Vec3 = neighbors.iter().map(|n| position + n.relative_position).sum();
    safe_normalize(center / neighbors.len() as f32 - position)
}

/// Flee from the mean position of visible predators.
pub fn predator_avoidance(threats: &[NeighborRecord]) -> Vec3 {
    if threats.is_empty() {
        return Vec3::ZERO;
    }
    let sum: Vec3 = threats.iter().map(|t| t.relative_position).sum();
    -safe_normalize(sum / threats.len() as f32)
}

pub fn compute_forces(input: &PreyInput<'_>, heading: Vec3) -> PreyForces {
    PreyForces {
        separation: separation(input.neighbors, input.personal_space_radius),
        alignment: alignment(heading, input.neighbors, input.alignment),
        cohesion: cohesion(input.position, input.neighbors),
        boundary: boundary_force(
            input.position,
            input.boundary_center,
            input.boundary_radius,
            PREY_BOUNDARY_THRESHOLD,
        ),
        avoidance: predator_avoidance(input.threats),
    }
}

/// Weighted sum, damped by fear but never below half strength.
pub fn combine(forces: &PreyForces, weights: &BehaviorWeights, fear: f32) -> Steering {
    let weighted = forces.separation * weights.separation
        + forces.alignment * weights.alignment
        + forces.cohesion * weights.cohesion
        + forces.boundary * weights.boundary
        + forces.avoidance * weights.predator_avoidance;

    Steering::from_force(weighted * (1.0 - fear * 0.5).max(0.5))
}

/// Energy drain, fear response to predators, then fear decay. All clamped.
pub fn update_state(state: &mut AgentState, threatened: bool, threat_fear_gain: f32, dt: f32) {
    state.energy = (state.energy - state.consumption_rate * dt).clamp(0.0, state.max_energy.max(0.0));

    let max_fear = state.max_fear.max(0.0);
    if threatened {
        state.fear = (state.fear + threat_fear_gain * dt).min(max_fear);
    }
    state.fear = (state.fear - FEAR_DECAY_RATE * dt).clamp(0.0, max_fear);
}

/// Full prey update for one tick: forces, heading, speed and internal state.
pub fn steer(
    input: &PreyInput<'_>,
    movement: &mut Movement,
    state: &mut AgentState,
    threat_fear_gain: f32,
    dt: f32,
) -> Steering {
    let forces = compute_forces(input, movement.direction);
    let steering = combine(&forces, input.weights, state.fear);
    apply_steering(movement, steering, PREY_MIN_SPEED_FRACTION, dt);
    update_state(state, !input.threats.is_empty(), threat_fear_gain, dt);
    steering
}
