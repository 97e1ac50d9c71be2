//! Scrolling sidewalk generation
//!
//! Bricks scroll left every tick. Once the rightmost brick is inside the
//! visible frame, new ones are appended behind it until the frame is tiled
//! again. Each new brick rolls the terrain dice:
//! - below `GAP_ROLL_THRESHOLD`: leave a gap sized to the current speed and
//!   put a gem over it
//! - below `ELEVATION_ROLL_THRESHOLD`: switch between the low and high level
//! - otherwise: plain brick

use glam::Vec2;

use super::dice::Dice;
use super::pickup;
use super::state::{Elevation, RunState, SimEvent, TerrainSegment};
use crate::consts::*;

/// Scroll bricks by `scroll`, prune the ones that left, refill the frame
pub fn advance(state: &mut RunState, scroll: f32, dice: &mut impl Dice) {
    let mut removed = Vec::new();
    state.segments.retain_mut(|s| {
        s.pos.x -= scroll;
        if s.pos.x < -s.size.x {
            removed.push(s.id);
            false
        } else {
            true
        }
    });
    for id in removed {
        state.push_event(SimEvent::SegmentRemoved { id });
    }

    let mut frontier_x = state.frontier_x();
    while frontier_x < state.config.frame_width {
        frontier_x = spawn_next(state, frontier_x, dice);
    }
}

/// Lay flat low bricks across the whole frame (start of a run)
pub fn lay_runway(state: &mut RunState) {
    let y = SEGMENT_HEIGHT / 2.0 + Elevation::Low.offset();
    let mut x = SEGMENT_WIDTH / 2.0;
    loop {
        push_segment(state, Vec2::new(x, y), Elevation::Low);
        if x >= state.config.frame_width {
            break;
        }
        x += SEGMENT_WIDTH + SEGMENT_SPACING;
    }
}

/// Width of a generated gap at `scroll_speed`.
///
/// Scales with speed so the time spent over the gap stays the same.
pub fn gap_width(scroll_speed: f32) -> f32 {
    GAP_FRAMES * scroll_speed
}

/// Append the brick that follows `frontier_x`, returns its x
fn spawn_next(state: &mut RunState, frontier_x: f32, dice: &mut impl Dice) -> f32 {
    let mut x = frontier_x + SEGMENT_WIDTH + SEGMENT_SPACING;
    let roll = dice.roll(TERRAIN_ROLL_SIDES);

    let mut gap_center = None;
    if roll < GAP_ROLL_THRESHOLD {
        let gap = gap_width(state.scroll_speed);
        x += gap;
        gap_center = Some((frontier_x + x) / 2.0);
        log::debug!("Gap of {gap:.1} before x={x:.1}");
    } else if roll < ELEVATION_ROLL_THRESHOLD {
        state.elevation = state.elevation.toggled();
        log::debug!("Terrain level now {:?}", state.elevation);
    }

    let elevation = state.elevation;
    let y = SEGMENT_HEIGHT / 2.0 + elevation.offset();
    if let Some(gap_x) = gap_center {
        pickup::spawn(state, gap_x, y, dice);
    }
    push_segment(state, Vec2::new(x, y), elevation);
    x
}

fn push_segment(state: &mut RunState, pos: Vec2, elevation: Elevation) {
    let id = state.next_entity_id();
    state.segments.push(TerrainSegment::new(id, pos, elevation));
    state.push_event(SimEvent::SegmentSpawned { id, pos, elevation });
}
