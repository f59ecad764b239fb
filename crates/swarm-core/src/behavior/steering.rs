//! Steering primitives shared by the prey and predator variants.

use glam::Vec3;

use crate::components::Movement;
use crate::math::safe_normalize;

/// Prey start feeling the boundary at 90% of its radius
pub const PREY_BOUNDARY_THRESHOLD: f32 = 0.9;
/// Predators turn back earlier, at 80%
pub const PREDATOR_BOUNDARY_THRESHOLD: f32 = 0.8;

/// Combined steering signal: a unit direction plus the magnitude it had before normalizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub direction: Vec3,
    pub magnitude: f32,
}

impl Steering {
    pub fn from_force(force: Vec3) -> Self {
        Self {
            direction: safe_normalize(force),
            magnitude: force.length(),
        }
    }
}

/// Pull toward `center` once the agent is past `threshold * radius`.
///
/// The pull is a unit vector scaled by `distance / radius`, so it keeps growing
/// the farther the agent strays outside.
pub fn boundary_force(position: Vec3, center: Vec3, radius: f32, threshold: f32) -> Vec3 {
    let to_center = center - position;
    let distance = to_center.length();
    if distance > radius * threshold {
        safe_normalize(to_center) * (distance / radius)
    } else {
        Vec3::ZERO
    }
}

/// Turn-rate limited heading: lerp toward `desired` by `rotation_speed * dt`, then renormalize.
///
/// A zero `desired` carries no steering signal and leaves the heading untouched.
pub fn blend_heading(current: Vec3, desired: Vec3, rotation_speed: f32, dt: f32) -> Vec3 {
    if desired == Vec3::ZERO {
        return current;
    }
    let t = (rotation_speed * dt).clamp(0.0, 1.0);
    safe_normalize(current.lerp(desired, t))
}

/// `max_speed` scaled by the steering magnitude, clamped to `[min_fraction, 1]`.
pub fn target_speed(max_speed: f32, magnitude: f32, min_fraction: f32) -> f32 {
    max_speed * magnitude.clamp(min_fraction, 1.0)
}

/// One tick of acceleration or deceleration toward `target`, never overshooting it.
pub fn approach_speed(current: f32, target: f32, acceleration: f32, deceleration: f32, dt: f32) -> f32 {
    if target > current {
        (current + acceleration * dt).min(target)
    } else {
        (current - deceleration * dt).max(target)
    }
}

/// Applies a steering signal to heading and speed. Speed ends up in `[0, max_speed]`.
pub fn apply_steering(movement: &mut Movement, steering: Steering, min_speed_fraction: f32, dt: f32) {
    movement.direction = blend_heading(
        movement.direction,
        steering.direction,
        movement.rotation_speed,
        dt,
    );

    let max_speed = movement.max_speed.max(0.0);
    let target = target_speed(max_speed, steering.magnitude, min_speed_fraction);
    movement.speed = approach_speed(
        movement.speed,
        target,
        movement.acceleration,
        movement.deceleration,
        dt,
    )
    .clamp(0.0, max_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(speed: f32) -> Movement {
        Movement {
            speed,
            max_speed: 10.0,
            acceleration: 4.0,
            deceleration: 2.0,
            direction: Vec3::Z,
            rotation_speed: 5.0,
        }
    }

    #[test]
    fn test_boundary_force_thresholds() {
        let center = Vec3::ZERO;
        let radius = 100.0;

        let outside = boundary_force(Vec3::new(95.0, 0.0, 0.0), center, radius, PREY_BOUNDARY_THRESHOLD);
        assert!(outside.x < 0.0);
        assert!((outside.length() - 0.95).abs() < 1e-5);

        let inside = boundary_force(Vec3::new(50.0, 0.0, 0.0), center, radius, PREY_BOUNDARY_THRESHOLD);
        assert_eq!(inside, Vec3::ZERO);

        let between = Vec3::new(0.0, 0.0, 85.0);
        assert_eq!(boundary_force(between, center, radius, PREY_BOUNDARY_THRESHOLD), Vec3::ZERO);
        assert!(boundary_force(between, center, radius, PREDATOR_BOUNDARY_THRESHOLD).z < 0.0);
    }

    #[test]
    fn test_boundary_force_grows_outside() {
        let near = boundary_force(Vec3::new(120.0, 0.0, 0.0), Vec3::ZERO, 100.0, 0.9);
        let far = boundary_force(Vec3::new(300.0, 0.0, 0.0), Vec3::ZERO, 100.0, 0.9);
        assert!(far.length() > near.length());
        assert!((far.length() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_blend_heading_is_rate_limited() {
        let blended = blend_heading(Vec3::Z, Vec3::X, 2.0, 0.1);
        assert!((blended.length() - 1.0).abs() < 1e-6);
        assert!(blended.z > blended.x);

        let snapped = blend_heading(Vec3::Z, Vec3::X, 50.0, 0.1);
        assert!((snapped - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_blend_heading_without_signal_keeps_course() {
        assert_eq!(blend_heading(Vec3::Y, Vec3::ZERO, 100.0, 1.0), Vec3::Y);
    }

    #[test]
    fn test_target_speed_clamp() {
        assert_eq!(target_speed(10.0, 0.1, 0.5), 5.0);
        assert_eq!(target_speed(10.0, 0.8, 0.5), 8.0);
        assert_eq!(target_speed(10.0, 3.0, 0.5), 10.0);
        assert_eq!(target_speed(10.0, 0.0, 0.7), 7.0);
    }

    #[test]
    fn test_speed_converges_without_overshoot() {
        let dt = 0.1;
        let mut m = movement(0.0);
        let full = Steering {
            direction: Vec3::Z,
            magnitude: 1.0,
        };

        for k in 1..=40 {
            apply_steering(&mut m, full, 0.5, dt);
            let expected = (k as f32 * m.acceleration * dt).min(m.max_speed);
            assert!((m.speed - expected).abs() < 1e-4, "tick {}: {} vs {}", k, m.speed, expected);
            assert!(m.speed <= m.max_speed);
        }
    }

    #[test]
    fn test_decelerates_toward_lower_target() {
        let mut m = movement(10.0);
        let weak = Steering {
            direction: Vec3::Z,
            magnitude: 0.0,
        };
        apply_steering(&mut m, weak, 0.5, 1.0);
        assert_eq!(m.speed, 8.0);
        apply_steering(&mut m, weak, 0.5, 10.0);
        assert_eq!(m.speed, 5.0);
    }

    #[test]
    fn test_speed_clamped_to_max() {
        let mut m = movement(50.0);
        apply_steering(&mut m, Steering::from_force(Vec3::Z), 0.5, 0.01);
        assert!(m.speed <= m.max_speed);
    }
}
