//! Grid cell coordinates and their 32-bit hash.
//!
//! The hash is plain wrapping i32 arithmetic with no modulo into a table, so
//! distant cells can share a key. Queries always apply an exact distance test,
//! which makes such collisions cost a few extra candidates and nothing more.

use glam::{IVec3, Vec3};

pub const HASH_PRIME_X: i32 = 73_856_093;
pub const HASH_PRIME_Y: i32 = 19_349_663;
pub const HASH_PRIME_Z: i32 = 83_492_791;

/// Upper bound on `ceil(detection_radius / cell_size)`. A query scans
/// `(2 * reach + 1)^3` cells, so larger ratios are rejected when agents are
/// validated.
pub const MAX_SEARCH_CELLS: i32 = 16;

/// Integer cell containing `position`: `floor(position / cell_size)` per axis.
#[inline]
pub fn cell_coord(position: Vec3, cell_size: f32) -> IVec3 {
    (position / cell_size).floor().as_ivec3()
}

/// Hash of a cell coordinate. Overflow wraps.
#[inline]
pub fn cell_hash(cell: IVec3) -> i32 {
    cell.x.wrapping_mul(HASH_PRIME_X)
        ^ cell.y.wrapping_mul(HASH_PRIME_Y)
        ^ cell.z.wrapping_mul(HASH_PRIME_Z)
}

#[inline]
pub fn position_hash(position: Vec3, cell_size: f32) -> i32 {
    cell_hash(cell_coord(position, cell_size))
}

/// Number of cells to scan on each side of the agent's own cell.
#[inline]
pub fn search_radius_cells(detection_radius: f32, cell_size: f32) -> i32 {
    (detection_radius / cell_size).ceil().max(0.0) as i32
}

/// Whether a query with this radius stays within [`MAX_SEARCH_CELLS`].
#[inline]
pub fn search_reach_is_bounded(detection_radius: f32, cell_size: f32) -> bool {
    let ratio = detection_radius / cell_size;
    ratio.is_finite() && ratio.ceil() <= MAX_SEARCH_CELLS as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_known_values() {
        assert_eq!(cell_hash(IVec3::new(0, 0, 0)), 0);
        assert_eq!(cell_hash(IVec3::new(1, 0, 0)), 73_856_093);
        assert_eq!(cell_hash(IVec3::new(0, 1, 0)), 19_349_663);
        assert_eq!(cell_hash(IVec3::new(1, 1, 0)), 88_192_194);
        assert_eq!(cell_hash(IVec3::new(-1, -1, -1)), -28_855_157);
        assert_eq!(cell_hash(IVec3::new(3, -7, 12)), -1_049_748_956);
    }

    #[test]
    fn test_hash_wraps_on_overflow() {
        assert_eq!(cell_hash(IVec3::new(100, 0, 0)), -1_204_325_292);
        assert_eq!(cell_hash(IVec3::new(50, 50, 50)), 493_016_218);
    }

    #[test]
    fn test_cell_coord_floors_negative_positions() {
        assert_eq!(cell_coord(Vec3::new(-0.5, 19.9, 20.0), 20.0), IVec3::new(-1, 0, 1));
        assert_eq!(cell_coord(Vec3::new(-20.0, -20.1, 0.0), 20.0), IVec3::new(-1, -2, 0));
    }

    #[test]
    fn test_position_hash_is_deterministic() {
        let positions = [
            Vec3::new(12.5, -3.0, 99.0),
            Vec3::new(-250.0, 40.0, 0.001),
            Vec3::new(0.0, 0.0, 0.0),
        ];
        let first: Vec<i32> = positions.iter().map(|p| position_hash(*p, 7.5)).collect();
        let reversed: Vec<i32> = positions.iter().rev().map(|p| position_hash(*p, 7.5)).collect();
        let second: Vec<i32> = reversed.into_iter().rev().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_radius_rounds_up() {
        assert_eq!(search_radius_cells(15.0, 20.0), 1);
        assert_eq!(search_radius_cells(40.0, 20.0), 2);
    }

    #[test]
    fn test_search_reach_bound() {
        assert!(search_reach_is_bounded(40.0, 20.0));
        assert!(search_reach_is_bounded(16.0, 1.0));
        assert!(!search_reach_is_bounded(16.5, 1.0));
        assert!(!search_reach_is_bounded(15.0, 0.001));
        assert!(!search_reach_is_bounded(15.0, 0.0));
        assert_eq!(search_radius_cells(40.1, 20.0), 3);
    }
}
