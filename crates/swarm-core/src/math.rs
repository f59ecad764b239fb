//! Vector helpers shared by the steering and motion stages.

use glam::{Mat3, Quat, Vec3};

/// Below this length a vector is treated as having no direction.
pub const NORMALIZE_EPSILON: f32 = 1e-6;

/// Unit vector in the direction of `v`, or zero when `v` is too short to have one.
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    let length = v.length();
    if length > NORMALIZE_EPSILON {
        v / length
    } else {
        Vec3::ZERO
    }
}

/// Rotation that maps local +Z onto `forward` while keeping local +Y as close to `up` as possible.
///
/// Returns `None` when `forward` has no direction or is parallel to `up`.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let z = safe_normalize(forward);
    if z == Vec3::ZERO {
        return None;
    }
    let x = safe_normalize(up.cross(z));
    if x == Vec3::ZERO {
        return None;
    }
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize())
}
