//! Movement System

use bevy_ecs::prelude::*;

use crate::clock::SimClock;
use crate::components::{Active, Movement, Pose};
use crate::motion::integrate;

/// Moves and turns every active agent, whatever its update markers say.
pub fn integrate_motion(clock: Res<SimClock>, mut agents: Query<(&mut Pose, &Movement), With<Active>>) {
    let dt = clock.delta_time;
    agents.par_iter_mut().for_each(|(mut pose, movement)| {
        *pose = integrate(
            *pose,
            movement.direction,
            movement.speed,
            movement.rotation_speed,
            dt,
        );
    });
}
