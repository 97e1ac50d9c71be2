//! Read-only views of a run for renderers and tooling

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{ACTOR_ID, Actor, Elevation, Pickup, RunState, RunStats, TerrainSegment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Skater,
    Brick,
    Gem,
}

/// Placement of one visible body this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub id: u32,
    pub kind: NodeKind,
    pub pos: Vec2,
    pub rotation: f32,
}

/// Skater first, then bricks left to right, then gems
pub fn render_nodes(state: &RunState) -> Vec<RenderNode> {
    let mut nodes = Vec::with_capacity(1 + state.segments.len() + state.pickups.len());
    nodes.push(RenderNode {
        id: ACTOR_ID,
        kind: NodeKind::Skater,
        pos: state.actor.pos,
        rotation: state.actor.rotation,
    });
    nodes.extend(state.segments.iter().map(|s| RenderNode {
        id: s.id,
        kind: NodeKind::Brick,
        pos: s.pos,
        rotation: 0.0,
    }));
    nodes.extend(state.pickups.iter().map(|p| RenderNode {
        id: p.id,
        kind: NodeKind::Gem,
        pos: p.pos,
        rotation: 0.0,
    }));
    nodes
}

/// Serializable copy of everything that defines the run (events excluded)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub scroll_speed: f32,
    pub elevation: Elevation,
    pub last_timestamp: Option<f64>,
    pub actor: Actor,
    pub segments: Vec<TerrainSegment>,
    pub pickups: Vec<Pickup>,
    pub stats: RunStats,
}

impl Snapshot {
    pub fn capture(state: &RunState) -> Self {
        Self {
            scroll_speed: state.scroll_speed,
            elevation: state.elevation,
            last_timestamp: state.last_timestamp,
            actor: state.actor.clone(),
            segments: state.segments.clone(),
            pickups: state.pickups.clone(),
            stats: state.stats,
        }
    }
}
