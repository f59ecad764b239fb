//! Spatial Systems
//!
//! Grid rebuild and neighbor population. Both run over active agents only.

use bevy_ecs::prelude::*;
use bevy_ecs::system::ParallelCommands;
use tracing::trace;

use crate::components::{
    Active, AgentKind, Movement, NeedsBehaviorUpdate, NeedsSpatialUpdate, Neighbors, Perception, Pose, Threats,
};
use crate::config::SimulationConfig;
use crate::spatial::{populate, GridEntry, SpatialGrids};

/// Rebuilds both grids from the current positions of active agents.
pub fn rebuild_spatial_grids(
    config: Res<SimulationConfig>,
    mut grids: ResMut<SpatialGrids>,
    agents: Query<(Entity, &AgentKind, &Pose, &Perception, &Movement), With<Active>>,
) {
    let grids = &mut *grids;
    let prey = grids.prey.begin_rebuild(config.cell_size);
    let predators = grids.predators.begin_rebuild(config.cell_size);

    agents
        .par_iter()
        .for_each(|(entity, kind, pose, perception, movement)| {
            let entry = GridEntry {
                entity,
                position: pose.position,
                detection_radius: perception.detection_radius,
                heading: movement.direction,
            };
            match kind {
                AgentKind::Prey => prey.insert(entry),
                AgentKind::Predator => predators.insert(entry),
            }
        });

    let prey_count = prey.finish();
    let predator_count = predators.finish();
    trace!(prey = prey_count, predators = predator_count, "spatial grids rebuilt");
}

/// Fills `Neighbors` from the prey grid, and `Threats` from the predator grid for agents that have one.
///
/// A non-empty neighbor or threat list moves the agent on to steering.
pub fn populate_neighbors(
    config: Res<SimulationConfig>,
    grids: Res<SpatialGrids>,
    par_commands: ParallelCommands,
    mut agents: Query<
        (Entity, &Pose, &Perception, &mut Neighbors, Option<&mut Threats>),
        (With<Active>, With<NeedsSpatialUpdate>),
    >,
) {
    let grids = &*grids;
    let capacity = config.max_neighbors;

    agents
        .par_iter_mut()
        .for_each(|(entity, pose, perception, mut neighbors, threats)| {
            let found = populate(
                &grids.prey,
                entity,
                pose.position,
                perception.detection_radius,
                capacity,
                &mut neighbors.records,
            );

            let threatened = match threats {
                Some(mut threats) => populate(
                    &grids.predators,
                    entity,
                    pose.position,
                    perception.detection_radius,
                    capacity,
                    &mut threats.records,
                ) > 0,
                None => false,
            };

            if found > 0 || threatened {
                par_commands.command_scope(|mut commands| {
                    commands
                        .entity(entity)
                        .remove::<NeedsSpatialUpdate>()
                        .insert(NeedsBehaviorUpdate);
                });
            }
        });
}
