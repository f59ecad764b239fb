//! Neighbor Query
//!
//! Scans the cube of cells around an agent and collects every other agent
//! within its detection radius.
//!
//! Lists are bounded. Once `capacity` records are collected the scan stops and
//! further matches are dropped without error. Truncation follows bucket-scan
//! order, not distance, so a full list may miss a closer agent that sits in a
//! later bucket.
//!
//! The scan reach is capped at `MAX_SEARCH_CELLS`. Spawning rejects agents
//! whose radius would exceed it, so the cap only matters for grids driven
//! directly.

use bevy_ecs::entity::Entity;
use glam::{IVec3, Vec3};
use std::collections::HashSet;

use super::grid::SpatialGrid;
use super::hash::{cell_coord, cell_hash, search_radius_cells, MAX_SEARCH_CELLS};

/// One neighbor as seen from the querying agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborRecord {
    pub entity: Entity,
    pub distance_squared: f32,
    /// Neighbor position minus querying agent position
    pub relative_position: Vec3,
    /// Neighbor heading at grid rebuild time
    pub heading: Vec3,
}

/// Clears `out` and refills it with the agents of `grid` near `position`.
///
/// `entity` itself is skipped. Returns the number of records written.
pub fn populate(
    grid: &SpatialGrid,
    entity: Entity,
    position: Vec3,
    detection_radius: f32,
    capacity: usize,
    out: &mut Vec<NeighborRecord>,
) -> usize {
    out.clear();
    if capacity == 0 || grid.is_empty() {
        return 0;
    }

    let cell_size = grid.cell_size();
    let center = cell_coord(position, cell_size);
    let reach = search_radius_cells(detection_radius, cell_size).min(MAX_SEARCH_CELLS);
    let radius_squared = detection_radius * detection_radius;

    // Wrapped hashes can collide; only occupied buckets need remembering
    let mut scanned: HashSet<i32> = HashSet::new();

    for dx in -reach..=reach {
        for dy in -reach..=reach {
            for dz in -reach..=reach {
                let hash = cell_hash(center.wrapping_add(IVec3::new(dx, dy, dz)));
                let bucket = grid.bucket(hash);
                if bucket.is_empty() || !scanned.insert(hash) {
                    continue;
                }
                for candidate in bucket {
                    if candidate.entity == entity {
                        continue;
                    }
                    let relative_position = candidate.position - position;
                    let distance_squared = relative_position.length_squared();
                    if distance_squared <= radius_squared {
                        out.push(NeighborRecord {
                            entity: candidate.entity,
                            distance_squared,
                            relative_position,
                            heading: candidate.heading,
                        });
                        if out.len() >= capacity {
                            return out.len();
                        }
                    }
                }
            }
        }
    }
    out.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::grid::GridEntry;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn entry(id: u32, position: Vec3) -> GridEntry {
        GridEntry {
            entity: Entity::from_raw(id),
            position,
            detection_radius: 10.0,
            heading: Vec3::X,
        }
    }

    #[test]
    fn test_finds_neighbor_in_adjacent_cell() {
        let mut grid = SpatialGrid::new(10.0, 4);
        grid.rebuild(
            10.0,
            vec![entry(0, Vec3::new(9.5, 0.0, 0.0)), entry(1, Vec3::new(10.5, 0.0, 0.0))],
        );

        let mut out = Vec::new();
        let found = populate(&grid, Entity::from_raw(0), Vec3::new(9.5, 0.0, 0.0), 2.0, 16, &mut out);

        assert_eq!(found, 1);
        assert_eq!(out[0].entity, Entity::from_raw(1));
        assert!((out[0].distance_squared - 1.0).abs() < 1e-5);
        assert!((out[0].relative_position - Vec3::X).length() < 1e-5);
        assert_eq!(out[0].heading, Vec3::X);
    }

    #[test]
    fn test_excludes_self_and_out_of_range() {
        let mut grid = SpatialGrid::new(5.0, 4);
        grid.rebuild(
            5.0,
            vec![
                entry(0, Vec3::ZERO),
                entry(1, Vec3::new(0.0, 3.0, 0.0)),
                entry(2, Vec3::new(0.0, 0.0, 4.1)),
            ],
        );

        let mut out = Vec::new();
        populate(&grid, Entity::from_raw(0), Vec3::ZERO, 4.0, 16, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].entity, Entity::from_raw(1));
    }

    #[test]
    fn test_boundary_distance_is_inclusive() {
        let mut grid = SpatialGrid::new(5.0, 4);
        grid.rebuild(5.0, vec![entry(0, Vec3::ZERO), entry(1, Vec3::new(4.0, 0.0, 0.0))]);

        let mut out = Vec::new();
        assert_eq!(populate(&grid, Entity::from_raw(0), Vec3::ZERO, 4.0, 16, &mut out), 1);
    }

    #[test]
    fn test_capacity_truncates_silently() {
        let mut grid = SpatialGrid::new(10.0, 4);
        let entries: Vec<_> = (0..20).map(|i| entry(i, Vec3::new(i as f32 * 0.1, 0.0, 0.0))).collect();
        grid.rebuild(10.0, entries);

        let mut out = Vec::new();
        let found = populate(&grid, Entity::from_raw(0), Vec3::ZERO, 5.0, 4, &mut out);

        assert_eq!(found, 4);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|r| r.entity != Entity::from_raw(0)));
    }

    #[test]
    fn test_repopulate_clears_previous_records() {
        let mut grid = SpatialGrid::new(10.0, 4);
        grid.rebuild(10.0, vec![entry(0, Vec3::ZERO), entry(1, Vec3::ONE)]);

        let mut out = Vec::new();
        populate(&grid, Entity::from_raw(0), Vec3::ZERO, 5.0, 8, &mut out);
        assert_eq!(out.len(), 1);

        grid.rebuild(10.0, vec![entry(0, Vec3::ZERO), entry(1, Vec3::splat(100.0))]);
        populate(&grid, Entity::from_raw(0), Vec3::ZERO, 5.0, 8, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_large_radius_spans_several_cells() {
        let mut grid = SpatialGrid::new(2.0, 8);
        grid.rebuild(
            2.0,
            vec![entry(0, Vec3::ZERO), entry(1, Vec3::new(-7.0, 0.0, 0.0)), entry(2, Vec3::new(0.0, 7.5, 0.0))],
        );

        let mut out = Vec::new();
        populate(&grid, Entity::from_raw(0), Vec3::ZERO, 8.0, 8, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_reach_is_capped_for_tiny_cells() {
        let mut grid = SpatialGrid::new(0.001, 4);
        grid.rebuild(
            0.001,
            vec![entry(0, Vec3::ZERO), entry(1, Vec3::new(0.01, 0.0, 0.0)), entry(2, Vec3::new(5.0, 0.0, 0.0))],
        );

        let mut out = Vec::new();
        let found = populate(&grid, Entity::from_raw(0), Vec3::ZERO, 15.0, 8, &mut out);

        // Only cells within MAX_SEARCH_CELLS of the agent are visited
        assert_eq!(found, 1);
        assert_eq!(out[0].entity, Entity::from_raw(1));
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = SmallRng::seed_from_u64(7);
        let positions: Vec<Vec3> = (0..400)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-60.0..60.0),
                    rng.gen_range(-60.0..60.0),
                    rng.gen_range(-60.0..60.0),
                )
            })
            .collect();

        let mut grid = SpatialGrid::new(12.0, 16);
        grid.rebuild(
            12.0,
            positions.iter().enumerate().map(|(i, p)| entry(i as u32, *p)),
        );

        let radius = 15.0;
        let mut out = Vec::new();
        for (i, p) in positions.iter().enumerate() {
            populate(&grid, Entity::from_raw(i as u32), *p, radius, usize::MAX, &mut out);
            let mut found: Vec<u32> = out.iter().map(|r| r.entity.index()).collect();
            found.sort_unstable();

            let expected: Vec<u32> = positions
                .iter()
                .enumerate()
                .filter(|(j, q)| *j != i && (**q - *p).length_squared() <= radius * radius)
                .map(|(j, _)| j as u32)
                .collect();

            assert_eq!(found, expected, "neighbor set mismatch for agent {}", i);
        }
    }
}
