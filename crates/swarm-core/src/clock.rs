//! Simulation clock and per-tick counters.

use bevy_ecs::prelude::*;
use swarm_snapshot::SimTimestamp;
use tracing::warn;

/// Scaled simulated time. Advanced once per tick before the schedule runs.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SimClock {
    pub timestamp: SimTimestamp,
    /// Scaled delta of the current tick
    pub delta_time: f32,
}

impl SimClock {
    /// Advances by `raw_delta * time_scale`. Negative or non-finite deltas become zero.
    pub fn advance(&mut self, raw_delta: f32, time_scale: f32) -> f32 {
        let scaled = raw_delta * time_scale;
        let dt = if scaled.is_finite() && scaled >= 0.0 {
            scaled
        } else {
            warn!(raw_delta, time_scale, "invalid tick delta, clamped to zero");
            0.0
        };
        self.delta_time = dt;
        self.timestamp = self.timestamp.advance(dt);
        dt
    }

    pub fn elapsed(&self) -> f32 {
        self.timestamp.elapsed
    }

    pub fn tick(&self) -> u64 {
        self.timestamp.tick
    }
}

/// Events counted across a tick
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCounters {
    pub attacks_last_tick: u32,
    pub attacks_total: u64,
}

impl TickCounters {
    pub fn begin_tick(&mut self) {
        self.attacks_last_tick = 0;
    }

    pub fn record_attack(&mut self) {
        self.attacks_last_tick += 1;
        self.attacks_total += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_scales_delta() {
        let mut clock = SimClock::default();
        let dt = clock.advance(0.1, 2.0);
        assert!((dt - 0.2).abs() < 1e-6);
        assert_eq!(clock.tick(), 1);
        assert!((clock.elapsed() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_delta_becomes_zero() {
        let mut clock = SimClock::default();
        assert_eq!(clock.advance(-1.0, 1.0), 0.0);
        assert_eq!(clock.advance(f32::NAN, 1.0), 0.0);
        assert_eq!(clock.tick(), 2);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_counters_reset_per_tick() {
        let mut counters = TickCounters::default();
        counters.record_attack();
        counters.record_attack();
        counters.begin_tick();
        counters.record_attack();
        assert_eq!(counters.attacks_last_tick, 1);
        assert_eq!(counters.attacks_total, 3);
    }
}
