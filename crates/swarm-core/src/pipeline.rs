//! Tick Pipeline
//!
//! Owns the ECS world and the four-stage schedule:
//!
//! 1. rebuild both spatial grids
//! 2. populate neighbor and threat lists
//! 3. steer prey and predators
//! 4. integrate motion
//!
//! Stages are chained, so each one starts only after the previous stage has
//! finished for every agent. Marker changes queued during stages 2 and 3 are
//! applied at the sync points in between.

use bevy_ecs::prelude::*;
use bevy_tasks::{ComputeTaskPool, TaskPool};
use swarm_snapshot::{FrameSnapshot, PopulationStats};
use tracing::{debug, info};

use crate::clock::{SimClock, TickCounters};
use crate::components::{
    Active, AgentKind, Movement, NeedsBehaviorUpdate, NeedsSpatialUpdate, Neighbors, Threats, Visible,
};
use crate::config::SimulationConfig;
use crate::error::SwarmError;
use crate::output::{capture_frame, collect_stats};
use crate::setup::AgentSpec;
use crate::spatial::SpatialGrids;
use crate::systems::{integrate_motion, populate_neighbors, rebuild_spatial_grids, steer_predators, steer_prey};

/// The per-tick schedule
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            rebuild_spatial_grids,
            populate_neighbors,
            apply_deferred,
            (steer_prey, steer_predators),
            apply_deferred,
            integrate_motion,
        )
            .chain(),
    );
    schedule
}

/// A running swarm: world, schedule and the operations a controller needs.
pub struct Simulation {
    world: World,
    schedule: Schedule,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, SwarmError> {
        config.validate()?;
        ComputeTaskPool::get_or_init(TaskPool::default);

        let mut world = World::new();
        world.insert_resource(SpatialGrids::new(&config));
        info!(
            cell_size = config.cell_size,
            boundary_radius = config.boundary_radius,
            max_neighbors = config.max_neighbors,
            "simulation created"
        );
        world.insert_resource(config);
        world.insert_resource(SimClock::default());
        world.insert_resource(TickCounters::default());

        Ok(Self {
            world,
            schedule: build_schedule(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        self.world.resource::<SimulationConfig>()
    }

    pub fn clock(&self) -> &SimClock {
        self.world.resource::<SimClock>()
    }

    pub fn counters(&self) -> TickCounters {
        *self.world.resource::<TickCounters>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Adds an agent. It takes part from the next tick on, starting with a neighbor query.
    pub fn spawn(&mut self, spec: AgentSpec) -> Result<Entity, SwarmError> {
        let capacity = self.config().max_neighbors;
        spec.validate()?;
        spec.validate_reach(self.config().cell_size)?;
        let AgentSpec {
            kind,
            pose,
            movement,
            perception,
            weights,
            state,
            visual,
            predator,
            active,
            visible,
        } = spec;

        let mut entity = self.world.spawn((
            kind,
            pose,
            movement,
            perception,
            weights,
            state,
            visual,
            Neighbors::with_capacity(capacity),
            NeedsSpatialUpdate,
            NeedsBehaviorUpdate,
        ));
        match predator {
            Some(hunter) => entity.insert(hunter),
            None => entity.insert(Threats::with_capacity(capacity)),
        };
        if active {
            entity.insert(Active);
        }
        if visible {
            entity.insert(Visible);
        }
        Ok(entity.id())
    }

    /// Runs one tick with `delta_time` wall-clock seconds. Returns the scaled delta used.
    pub fn tick(&mut self, delta_time: f32) -> f32 {
        let time_scale = self.config().time_scale;
        let dt = self.world.resource_mut::<SimClock>().advance(delta_time, time_scale);
        self.world.resource_mut::<TickCounters>().begin_tick();

        self.schedule.run(&mut self.world);

        let tick = self.clock().tick();
        let attacks = self.counters().attacks_last_tick;
        debug!(tick, dt, attacks, "tick complete");
        dt
    }

    /// Parks or resumes an agent. A resumed agent re-enters the pipeline at the neighbor query.
    pub fn set_active(&mut self, entity: Entity, active: bool) -> Result<(), SwarmError> {
        let mut agent = self.agent_mut(entity)?;
        if active {
            agent.insert((Active, NeedsSpatialUpdate, NeedsBehaviorUpdate));
        } else {
            agent.remove::<Active>();
        }
        Ok(())
    }

    pub fn set_visible(&mut self, entity: Entity, visible: bool) -> Result<(), SwarmError> {
        let mut agent = self.agent_mut(entity)?;
        if visible {
            agent.insert(Visible);
        } else {
            agent.remove::<Visible>();
        }
        Ok(())
    }

    /// Multiplies max speed and the acceleration rates of every agent of `kind`,
    /// or of all agents when `kind` is `None`. Current speeds are re-clamped.
    pub fn scale_speeds(&mut self, kind: Option<AgentKind>, multiplier: f32) -> Result<usize, SwarmError> {
        if !(multiplier > 0.0) || !multiplier.is_finite() {
            return Err(SwarmError::InvalidSpeedScale(multiplier));
        }

        let mut query = self.world.query::<(&AgentKind, &mut Movement)>();
        let mut scaled = 0;
        for (agent_kind, mut movement) in query.iter_mut(&mut self.world) {
            if kind.is_some_and(|k| k != *agent_kind) {
                continue;
            }
            movement.max_speed *= multiplier;
            movement.acceleration *= multiplier;
            movement.deceleration *= multiplier;
            movement.speed = movement.speed.clamp(0.0, movement.max_speed);
            scaled += 1;
        }
        info!(?kind, multiplier, scaled, "speeds scaled");
        Ok(scaled)
    }

    /// Current render view of all active, visible agents
    pub fn frame_snapshot(&mut self) -> FrameSnapshot {
        capture_frame(&mut self.world)
    }

    pub fn population_stats(&mut self) -> PopulationStats {
        collect_stats(&mut self.world)
    }

    /// Number of spawned agents, active or not
    pub fn agent_count(&mut self) -> usize {
        self.world.query::<&AgentKind>().iter(&self.world).count()
    }

    fn agent_mut(&mut self, entity: Entity) -> Result<EntityWorldMut<'_>, SwarmError> {
        match self.world.get_entity_mut(entity) {
            Some(agent) if agent.contains::<AgentKind>() => Ok(agent),
            _ => Err(SwarmError::UnknownEntity(entity)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = SimulationConfig {
            cell_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(Simulation::new(config), Err(SwarmError::Config(_))));
    }

    #[test]
    fn test_spawn_sets_both_markers() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let prey = sim.spawn(AgentSpec::prey(Vec3::ZERO, Vec3::Z)).unwrap();
        let hunter = sim.spawn(AgentSpec::predator(Vec3::X, Vec3::Z)).unwrap();

        let world = sim.world();
        assert!(world.get::<NeedsSpatialUpdate>(prey).is_some());
        assert!(world.get::<NeedsBehaviorUpdate>(prey).is_some());
        assert!(world.get::<Threats>(prey).is_some());
        assert!(world.get::<Threats>(hunter).is_none());
        assert!(world.get::<Neighbors>(hunter).unwrap().records.capacity() >= 128);
        assert!(world.get::<Threats>(prey).unwrap().records.capacity() >= 128);
        assert!(world.get::<crate::components::Predator>(hunter).is_some());
        assert_eq!(sim.agent_count(), 2);
    }

    #[test]
    fn test_spawn_rejects_invalid_agent() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let spec = AgentSpec::prey(Vec3::ZERO, Vec3::Z).with_perception(-1.0, 1.0);
        assert!(matches!(sim.spawn(spec), Err(SwarmError::InvalidAgent(_))));
        assert_eq!(sim.agent_count(), 0);
    }

    #[test]
    fn test_spawn_rejects_radius_too_wide_for_cells() {
        let config = SimulationConfig {
            cell_size: 0.001,
            ..Default::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        let spec = AgentSpec::prey(Vec3::ZERO, Vec3::Z);
        assert!(matches!(sim.spawn(spec), Err(SwarmError::InvalidAgent(_))));
        assert_eq!(sim.agent_count(), 0);
        sim.tick(0.1);
    }

    #[test]
    fn test_controls_reject_unknown_entities() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let stranger = sim.world_mut().spawn_empty().id();
        assert!(matches!(sim.set_active(stranger, false), Err(SwarmError::UnknownEntity(_))));
        assert!(sim.set_visible(stranger, true).is_err());
    }

    #[test]
    fn test_scale_speeds_by_kind() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let prey = sim.spawn(AgentSpec::prey(Vec3::ZERO, Vec3::Z).with_speed(20.0)).unwrap();
        let hunter = sim.spawn(AgentSpec::predator(Vec3::X, Vec3::Z)).unwrap();

        assert_eq!(sim.scale_speeds(Some(AgentKind::Prey), 0.5).unwrap(), 1);
        let movement = sim.world().get::<Movement>(prey).unwrap();
        assert_eq!(movement.max_speed, 12.5);
        assert_eq!(movement.speed, 12.5);
        assert_eq!(sim.world().get::<Movement>(hunter).unwrap().max_speed, 40.0);

        assert!(sim.scale_speeds(None, 0.0).is_err());
        assert!(sim.scale_speeds(None, f32::NAN).is_err());
    }

    #[test]
    fn test_tick_advances_clock_with_time_scale() {
        let config = SimulationConfig {
            time_scale: 0.5,
            ..Default::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        let dt = sim.tick(0.2);
        assert!((dt - 0.1).abs() < 1e-6);
        assert_eq!(sim.clock().tick(), 1);
    }
}
