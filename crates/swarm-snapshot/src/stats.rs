//! Population Statistics
//!
//! Aggregate counts and averages per agent kind, for controllers and UI.

use serde::{Deserialize, Serialize};

use crate::{KindTag, SimTimestamp};

/// Aggregates for one kind of agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KindStats {
    pub total: usize,
    pub active: usize,
    pub visible: usize,
    /// Averages below are taken over active agents only
    pub average_speed: f32,
    pub average_energy: f32,
    pub average_fear: f32,
    /// Always zero for prey
    pub average_hunger: f32,
}

/// Population summary at a point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub timestamp: SimTimestamp,
    pub prey: KindStats,
    pub predators: KindStats,
    /// Attacks landed during the most recent tick
    #[serde(default)]
    pub attacks_last_tick: u32,
    /// Attacks landed since the simulation started
    #[serde(default)]
    pub attacks_total: u64,
}

impl PopulationStats {
    pub fn kind(&self, kind: KindTag) -> &KindStats {
        match kind {
            KindTag::Prey => &self.prey,
            KindTag::Predator => &self.predators,
        }
    }

    pub fn total_agents(&self) -> usize {
        self.prey.total + self.predators.total
    }

    pub fn active_agents(&self) -> usize {
        self.prey.active + self.predators.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_sum_both_kinds() {
        let stats = PopulationStats {
            prey: KindStats {
                total: 100,
                active: 90,
                ..Default::default()
            },
            predators: KindStats {
                total: 5,
                active: 5,
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(stats.total_agents(), 105);
        assert_eq!(stats.active_agents(), 95);
        assert_eq!(stats.kind(KindTag::Predator).total, 5);
    }

    #[test]
    fn test_attack_counters_default_when_absent() {
        let json = r#"{
            "timestamp": {"tick": 3, "elapsed": 0.3},
            "prey": {"total":1,"active":1,"visible":1,"average_speed":0.0,"average_energy":0.0,"average_fear":0.0,"average_hunger":0.0},
            "predators": {"total":0,"active":0,"visible":0,"average_speed":0.0,"average_energy":0.0,"average_fear":0.0,"average_hunger":0.0}
        }"#;
        let stats: PopulationStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.attacks_last_tick, 0);
        assert_eq!(stats.attacks_total, 0);
    }
}
