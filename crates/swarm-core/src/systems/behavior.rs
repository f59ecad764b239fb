//! Behavior Systems
//!
//! Prey and predator steering. The two queries are disjoint on `Predator`, so
//! the systems can run side by side. Marker changes and attack counts are
//! queued per worker and applied at the following sync point.

use bevy_ecs::prelude::*;
use bevy_ecs::system::ParallelCommands;

use crate::behavior::{predator, prey, PredatorContext, PreyInput};
use crate::clock::{SimClock, TickCounters};
use crate::components::{
    Active, AgentState, BehaviorWeights, Movement, NeedsBehaviorUpdate, NeedsSpatialUpdate, Neighbors, Perception,
    Pose, Predator, Threats,
};
use crate::config::{SimulationConfig, WanderClock};

type PreyQuery<'a> = (
    Entity,
    &'a Pose,
    &'a Perception,
    &'a BehaviorWeights,
    &'a Neighbors,
    Option<&'a Threats>,
    &'a mut Movement,
    &'a mut AgentState,
);

/// Flocking update for prey whose neighbor query succeeded.
pub fn steer_prey(
    config: Res<SimulationConfig>,
    clock: Res<SimClock>,
    par_commands: ParallelCommands,
    mut agents: Query<PreyQuery, (With<Active>, With<NeedsBehaviorUpdate>, Without<Predator>)>,
) {
    let config = &*config;
    let dt = clock.delta_time;

    agents.par_iter_mut().for_each(
        |(entity, pose, perception, weights, neighbors, threats, mut movement, mut state)| {
            let input = PreyInput {
                position: pose.position,
                neighbors: &neighbors.records,
                threats: threats.map(|t| t.records.as_slice()).unwrap_or(&[]),
                personal_space_radius: perception.personal_space_radius,
                weights,
                boundary_center: config.boundary_center,
                boundary_radius: config.boundary_radius,
                alignment: config.alignment,
            };
            prey::steer(&input, &mut movement, &mut state, config.threat_fear_gain, dt);

            par_commands.command_scope(|mut commands| {
                commands
                    .entity(entity)
                    .remove::<NeedsBehaviorUpdate>()
                    .insert(NeedsSpatialUpdate);
            });
        },
    );
}

/// Chase or wander for every active predator. Predators steer each tick, neighbors or not.
pub fn steer_predators(
    config: Res<SimulationConfig>,
    clock: Res<SimClock>,
    par_commands: ParallelCommands,
    mut agents: Query<(Entity, &Pose, &Neighbors, &mut Movement, &mut Predator), With<Active>>,
) {
    let ctx = PredatorContext {
        boundary_center: config.boundary_center,
        boundary_radius: config.boundary_radius,
        wander_phase: match config.wander_clock {
            WanderClock::Elapsed => clock.elapsed(),
            WanderClock::FrameDelta => clock.delta_time,
        },
        elapsed: clock.elapsed(),
        attack_hunger_relief: config.attack_hunger_relief,
        dt: clock.delta_time,
    };

    agents
        .par_iter_mut()
        .for_each(|(entity, pose, neighbors, mut movement, mut hunter)| {
            let attacked = predator::steer(pose.position, &neighbors.records, &mut movement, &mut hunter, &ctx);

            par_commands.command_scope(|mut commands| {
                commands
                    .entity(entity)
                    .remove::<NeedsBehaviorUpdate>()
                    .insert(NeedsSpatialUpdate);
                if attacked {
                    commands.add(|world: &mut World| {
                        world.resource_mut::<TickCounters>().record_attack();
                    });
                }
            });
        });
}
