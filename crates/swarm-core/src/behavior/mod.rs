//! Behavior Engine
//!
//! Turns neighbor lists into a steering direction and target speed. Prey flock;
//! predators chase or wander. Every function here is pure over the agent's own data.

pub mod predator;
pub mod prey;
pub mod steering;

pub use predator::{PredatorContext, PredatorDecision};
pub use prey::{PreyForces, PreyInput};
pub use steering::{apply_steering, boundary_force, Steering};
