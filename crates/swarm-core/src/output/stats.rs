//! Population statistics.

use bevy_ecs::prelude::*;
use bevy_ecs::query::Has;
use swarm_snapshot::{KindStats, PopulationStats};

use crate::clock::{SimClock, TickCounters};
use crate::components::{Active, AgentKind, AgentState, Movement, Predator, Visible};

#[derive(Default)]
struct Accumulator {
    stats: KindStats,
    speed: f32,
    energy: f32,
    fear: f32,
    hunger: f32,
}

impl Accumulator {
    fn finish(mut self) -> KindStats {
        if self.stats.active > 0 {
            let n = self.stats.active as f32;
            self.stats.average_speed = self.speed / n;
            self.stats.average_energy = self.energy / n;
            self.stats.average_fear = self.fear / n;
            self.stats.average_hunger = self.hunger / n;
        }
        self.stats
    }
}

/// Counts and averages per kind. Averages cover active agents only.
pub fn collect_stats(world: &mut World) -> PopulationStats {
    let timestamp = world.resource::<SimClock>().timestamp;
    let counters = *world.resource::<TickCounters>();

    let mut prey = Accumulator::default();
    let mut predators = Accumulator::default();

    let mut query = world.query::<(
        &AgentKind,
        &Movement,
        &AgentState,
        Option<&Predator>,
        Has<Active>,
        Has<Visible>,
    )>();
    for (kind, movement, state, hunter, active, visible) in query.iter(world) {
        let acc = match kind {
            AgentKind::Prey => &mut prey,
            AgentKind::Predator => &mut predators,
        };
        acc.stats.total += 1;
        if visible {
            acc.stats.visible += 1;
        }
        if active {
            acc.stats.active += 1;
            acc.speed += movement.speed;
            acc.energy += state.energy;
            acc.fear += state.fear;
            acc.hunger += hunter.map_or(0.0, |h| h.hunger);
        }
    }

    PopulationStats {
        timestamp,
        prey: prey.finish(),
        predators: predators.finish(),
        attacks_last_tick: counters.attacks_last_tick,
        attacks_total: counters.attacks_total,
    }
}
