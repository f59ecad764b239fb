//! Frame capture for renderers.

use bevy_ecs::prelude::*;
use swarm_snapshot::{AgentFrame, FrameSnapshot};

use crate::clock::SimClock;
use crate::components::{Active, AgentKind, Pose, Visible, Visual};

/// Snapshot of every active, visible agent, ordered by entity id.
pub fn capture_frame(world: &mut World) -> FrameSnapshot {
    let timestamp = world.resource::<SimClock>().timestamp;
    let mut snapshot = FrameSnapshot::new(timestamp.tick, timestamp);

    let mut query = world.query_filtered::<(Entity, &AgentKind, &Pose, &Visual), (With<Active>, With<Visible>)>();
    snapshot.agents.extend(query.iter(world).map(|(entity, kind, pose, visual)| AgentFrame {
        id: entity.to_bits(),
        kind: (*kind).into(),
        position: pose.position.to_array(),
        rotation: pose.rotation.to_array(),
        scale: visual.size_multiplier,
        color: visual.color,
    }));
    snapshot.agents.sort_by_key(|agent| agent.id);
    snapshot
}
