//! Predator Components

use bevy_ecs::prelude::*;

/// Hunting state carried by predator agents only
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Predator {
    pub attack_range: f32,
    /// Minimum simulated seconds between two attacks
    pub attack_cooldown: f32,
    /// Simulated time of the last landed attack
    pub last_attack_time: f32,
    /// Prey chased this tick, if any. Never dereferenced across ticks.
    pub current_target: Option<Entity>,
    /// Prey farther than this are ignored by the chase
    pub target_lock_distance: f32,
    pub hunger: f32,
    pub max_hunger: f32,
}

impl Predator {
    /// Whether enough simulated time has passed since the last attack
    pub fn can_attack(&self, elapsed: f32) -> bool {
        elapsed - self.last_attack_time >= self.attack_cooldown
    }
}

impl Default for Predator {
    fn default() -> Self {
        Self {
            attack_range: 1.8,
            attack_cooldown: 0.8,
            last_attack_time: -10.0,
            current_target: None,
            target_lock_distance: 20.0,
            hunger: 0.0,
            max_hunger: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_gate() {
        let predator = Predator {
            last_attack_time: 5.0,
            attack_cooldown: 0.8,
            ..Default::default()
        };
        assert!(!predator.can_attack(5.5));
        assert!(predator.can_attack(5.8));
        assert!(Predator::default().can_attack(0.0));
    }
}
