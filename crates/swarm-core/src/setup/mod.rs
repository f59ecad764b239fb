//! World Setup
//!
//! Agent records and initial population spawning.

pub mod agent;
pub mod spawn;

pub use agent::AgentSpec;
pub use spawn::{spawn_population, SpawnSummary};
