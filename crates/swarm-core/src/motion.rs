//! Motion Integrator
//!
//! Maps (pose, heading, speed) to the pose one step later. No state of its own.

use glam::Vec3;

use crate::components::Pose;
use crate::math::look_rotation;

/// Fixed up axis used when orienting agents along their heading
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Advances `pose` along `direction` and turns it toward facing that direction.
///
/// Orientation is unchanged when `direction` is zero or points straight up/down.
pub fn integrate(pose: Pose, direction: Vec3, speed: f32, rotation_speed: f32, dt: f32) -> Pose {
    let position = pose.position + direction * speed * dt;
    let rotation = match look_rotation(direction, WORLD_UP) {
        Some(target) => {
            let t = (rotation_speed * dt).clamp(0.0, 1.0);
            pose.rotation.slerp(target, t).normalize()
        }
        None => pose.rotation,
    };
    Pose { position, rotation }
}
