//! Simulation Timestamp
//!
//! Tick counter paired with the accumulated simulated time.
//!
//! # Example
//!
//! ```
//! use swarm_snapshot::SimTimestamp;
//!
//! let ts = SimTimestamp::new(120, 2.0);
//! assert_eq!(ts.to_string(), "tick_000120@2.000s");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Point in simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimTimestamp {
    /// Number of completed ticks
    pub tick: u64,
    /// Simulated seconds elapsed, already multiplied by the global time scale
    pub elapsed: f32,
}

impl SimTimestamp {
    pub fn new(tick: u64, elapsed: f32) -> Self {
        Self { tick, elapsed }
    }

    /// Returns the timestamp one tick later.
    pub fn advance(self, delta_time: f32) -> Self {
        Self {
            tick: self.tick + 1,
            elapsed: self.elapsed + delta_time,
        }
    }
}

impl fmt::Display for SimTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick_{:06}@{:.3}s", self.tick, self.elapsed)
    }
}
