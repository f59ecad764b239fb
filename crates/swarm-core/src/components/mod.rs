//! ECS Components
//!
//! Per-agent data for prey and predators, plus the pipeline marker components.

pub mod agent;
pub mod predator;

pub use agent::*;
pub use predator::*;
