//! Determinism verification tests
//!
//! Same inputs must give the same grid keys and the same spawned population.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use swarm_core::spatial::{cell_hash, position_hash};
use swarm_core::{spawn_population, Simulation, SimulationConfig, SpawnConfig};
use swarm_snapshot::FrameSnapshot;

fn spawned(seed: u64) -> Simulation {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    let spawn = SpawnConfig {
        prey_count: 300,
        predator_count: 6,
        ..Default::default()
    };
    let mut rng = SmallRng::seed_from_u64(seed);
    spawn_population(&mut sim, &spawn, &mut rng).unwrap();
    sim
}

fn max_position_gap(a: &FrameSnapshot, b: &FrameSnapshot) -> f32 {
    assert_eq!(a.agents.len(), b.agents.len());
    a.agents
        .iter()
        .zip(&b.agents)
        .map(|(x, y)| {
            assert_eq!(x.id, y.id);
            (Vec3::from_array(x.position) - Vec3::from_array(y.position)).length()
        })
        .fold(0.0, f32::max)
}

/// Hash keys do not depend on call order or repetition
#[test]
fn test_hash_is_order_independent() {
    let mut rng = SmallRng::seed_from_u64(42);
    let positions: Vec<Vec3> = (0..500)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-1.0e4..1.0e4),
                rng.gen_range(-1.0e4..1.0e4),
                rng.gen_range(-1.0e4..1.0e4),
            )
        })
        .collect();

    let first: Vec<i32> = positions.iter().map(|p| position_hash(*p, 7.5)).collect();

    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.shuffle(&mut rng);
    for i in order {
        assert_eq!(position_hash(positions[i], 7.5), first[i]);
    }
}

/// Wrapping arithmetic gives fixed keys for large coordinates
#[test]
fn test_hash_wraps_instead_of_overflowing() {
    let big = glam::IVec3::new(i32::MAX / 2, i32::MIN / 3, 1_000_000);
    assert_eq!(cell_hash(big), cell_hash(big));

    // Coordinates past i32 range saturate to i32::MAX, which wraps like -1
    assert_eq!(position_hash(Vec3::splat(1.0e10), 0.5), -28_855_157);
    assert_eq!(position_hash(Vec3::splat(1.0e10), 0.5), cell_hash(glam::IVec3::splat(i32::MAX)));
}

#[test]
fn test_same_seed_same_population() {
    let mut a = spawned(7);
    let mut b = spawned(7);
    assert_eq!(a.frame_snapshot(), b.frame_snapshot());
    assert_eq!(a.population_stats(), b.population_stats());
}

#[test]
fn test_different_seeds_differ() {
    let mut a = spawned(7);
    let mut b = spawned(8);
    assert!(max_position_gap(&a.frame_snapshot(), &b.frame_snapshot()) > 0.0);
}

/// Bucket order may vary between runs, which only reorders float sums
#[test]
fn test_same_seed_runs_stay_together() {
    let mut a = spawned(11);
    let mut b = spawned(11);
    for _ in 0..5 {
        a.tick(1.0 / 60.0);
        b.tick(1.0 / 60.0);
    }
    assert!(max_position_gap(&a.frame_snapshot(), &b.frame_snapshot()) < 1e-3);
}
