//! Shared frame and statistics types for the swarm simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Renderers and controllers depend on it instead of the simulation core.

pub mod snapshot;
pub mod stats;
pub mod timestamp;

pub use snapshot::{generate_frame_id, AgentFrame, FrameSnapshot, KindTag};
pub use stats::{KindStats, PopulationStats};
pub use timestamp::SimTimestamp;
