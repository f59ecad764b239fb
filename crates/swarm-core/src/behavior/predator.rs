//! Predator steering: chase the nearest locked prey, otherwise wander.

use bevy_ecs::entity::Entity;
use glam::Vec3;

use super::steering::{apply_steering, boundary_force, Steering, PREDATOR_BOUNDARY_THRESHOLD};
use crate::components::{Movement, Predator};
use crate::math::safe_normalize;
use crate::spatial::NeighborRecord;

/// Predators keep at least 70% of max speed
pub const PREDATOR_MIN_SPEED_FRACTION: f32 = 0.7;
/// Boundary pull is weaker than the chase
pub const PREDATOR_BOUNDARY_WEIGHT: f32 = 0.3;
/// Hunger gained per simulated second
pub const HUNGER_RATE: f32 = 0.1;

/// Closest neighbor strictly inside the lock distance.
pub fn select_target(neighbors: &[NeighborRecord], lock_distance: f32) -> Option<&NeighborRecord> {
    let limit = lock_distance * lock_distance;
    neighbors
        .iter()
        .filter(|n| n.distance_squared < limit)
        .min_by(|a, b| a.distance_squared.total_cmp(&b.distance_squared))
}

/// Smoothly varying exploratory heading on the XZ plane.
///
/// `phase` is either accumulated simulated time or the tick delta, depending on
/// [`WanderClock`](crate::config::WanderClock).
pub fn wander_direction(phase: f32, position: Vec3) -> Vec3 {
    let sweep = Vec3::new(
        (phase * 100.0 + position.x).sin() * 5.0,
        0.0,
        (phase * 100.0 + position.z).cos() * 5.0,
    );
    let jitter = Vec3::new((phase * 50.0).sin(), 0.0, (phase * 50.0).cos());
    safe_normalize(sweep + jitter)
}

/// What a predator decided this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredatorDecision {
    pub steering: Steering,
    pub target: Option<Entity>,
    /// Squared distance to the target, if any
    pub target_distance_squared: Option<f32>,
}

pub fn decide(
    position: Vec3,
    neighbors: &[NeighborRecord],
    lock_distance: f32,
    wander_phase: f32,
    boundary_center: Vec3,
    boundary_radius: f32,
) -> PredatorDecision {
    let target = select_target(neighbors, lock_distance);
    let chase = match target {
        Some(record) => safe_normalize(record.relative_position),
        None => wander_direction(wander_phase, position),
    };
    let boundary = boundary_force(position, boundary_center, boundary_radius, PREDATOR_BOUNDARY_THRESHOLD);

    PredatorDecision {
        steering: Steering::from_force(chase + boundary * PREDATOR_BOUNDARY_WEIGHT),
        target: target.map(|r| r.entity),
        target_distance_squared: target.map(|r| r.distance_squared),
    }
}

/// Lands an attack when the target is in range and the cooldown has elapsed.
///
/// Returns whether an attack happened.
pub fn try_attack(predator: &mut Predator, target_distance_squared: Option<f32>, elapsed: f32, hunger_relief: f32) -> bool {
    let Some(distance_squared) = target_distance_squared else {
        return false;
    };
    if distance_squared > predator.attack_range * predator.attack_range || !predator.can_attack(elapsed) {
        return false;
    }
    predator.last_attack_time = elapsed;
    predator.hunger = (predator.hunger - hunger_relief).max(0.0);
    true
}

pub fn update_hunger(predator: &mut Predator, dt: f32) {
    let max = predator.max_hunger.max(0.0);
    predator.hunger = (predator.hunger + HUNGER_RATE * dt).clamp(0.0, max);
}

/// Inputs shared by every predator in a tick
#[derive(Debug, Clone, Copy)]
pub struct PredatorContext {
    pub boundary_center: Vec3,
    pub boundary_radius: f32,
    pub wander_phase: f32,
    pub elapsed: f32,
    pub attack_hunger_relief: f32,
    pub dt: f32,
}

/// Full predator update for one tick. Returns whether an attack landed.
pub fn steer(
    position: Vec3,
    neighbors: &[NeighborRecord],
    movement: &mut Movement,
    predator: &mut Predator,
    ctx: &PredatorContext,
) -> bool {
    let decision = decide(
        position,
        neighbors,
        predator.target_lock_distance,
        ctx.wander_phase,
        ctx.boundary_center,
        ctx.boundary_radius,
    );
    predator.current_target = decision.target;

    apply_steering(movement, decision.steering, PREDATOR_MIN_SPEED_FRACTION, ctx.dt);
    update_hunger(predator, ctx.dt);
    try_attack(predator, decision.target_distance_squared, ctx.elapsed, ctx.attack_hunger_relief)
}
