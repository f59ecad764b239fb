//! Frame Snapshot Types
//!
//! Per-tick view of every active, visible agent, handed to renderers.
//!
//! A frame is read-only: producing one never mutates the simulation, and
//! consumers must not assume any ordering of `agents`.

use serde::{Deserialize, Serialize};

use crate::SimTimestamp;

/// Generates a frame ID with the given sequence number.
pub fn generate_frame_id(sequence: u64) -> String {
    format!("frame_{:06}", sequence)
}

/// Population an agent belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindTag {
    Prey,
    Predator,
}

/// Render data for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentFrame {
    /// Stable entity identifier (bit pattern of the ECS entity)
    pub id: u64,
    pub kind: KindTag,
    pub position: [f32; 3],
    /// Orientation quaternion as `[x, y, z, w]`
    pub rotation: [f32; 4],
    /// Visual size multiplier
    pub scale: f32,
    /// RGBA, 0.0-1.0
    pub color: [f32; 4],
}

/// Everything a renderer needs for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame_id: String,
    pub timestamp: SimTimestamp,
    #[serde(default)]
    pub agents: Vec<AgentFrame>,
}

impl FrameSnapshot {
    pub fn new(sequence: u64, timestamp: SimTimestamp) -> Self {
        Self {
            frame_id: generate_frame_id(sequence),
            timestamp,
            agents: Vec::new(),
        }
    }

    /// Number of agents of the given kind in this frame
    pub fn count(&self, kind: KindTag) -> usize {
        self.agents.iter().filter(|a| a.kind == kind).count()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
