//! ECS Systems
//!
//! The four tick stages: grid rebuild, neighbor population, steering and motion.

pub mod behavior;
pub mod movement;
pub mod spatial;

pub use behavior::{steer_predators, steer_prey};
pub use movement::integrate_motion;
pub use spatial::{populate_neighbors, rebuild_spatial_grids};
