//! Skater control: jumping, leaving the ground, failure detection
//!
//! The ground flag is only ever set by contact resolution. This module only
//! clears it: on a jump, when the skater walks off its brick, or when the
//! body is moving vertically faster than `AIRBORNE_SPEED_THRESHOLD`.

use glam::Vec2;

use super::physics::{PhysicsBackend, SURFACE_EPSILON, overlaps_x};
use super::state::{Actor, FailureReason, RunState, SimEvent, TerrainSegment};
use crate::consts::*;
use crate::degrees_to_radians;

/// Start a jump if standing. Returns false (and changes nothing) when airborne.
pub fn trigger_jump(state: &mut RunState, physics: &mut impl PhysicsBackend) -> bool {
    let actor = &mut state.actor;
    if !actor.is_on_ground {
        return false;
    }
    actor.vel.y = JUMP_SPEED;
    actor.is_on_ground = false;
    physics.apply_impulse(actor, Vec2::new(0.0, JUMP_IMPULSE));

    state.stats.jumps += 1;
    state.push_event(SimEvent::Jumped);
    true
}

/// Per-tick skater update: support check, integration, airborne inference
pub fn update(state: &mut RunState, physics: &mut impl PhysicsBackend) {
    if state.actor.is_on_ground && !has_support(&state.actor, &state.segments) {
        log::debug!("Skater rolled off the edge at x={:.1}", state.actor.pos.x);
        state.actor.is_on_ground = false;
    }

    physics.integrate(&mut state.actor, &state.segments, &state.pickups);

    // Engine-backed bodies can start falling without us asking
    let vertical_speed = state.actor.vel.y.abs() / TARGET_FRAME_INTERVAL as f32;
    if state.actor.is_on_ground && vertical_speed > AIRBORNE_SPEED_THRESHOLD {
        state.actor.is_on_ground = false;
    }
}

/// Whether some brick is still under the skater at its ground level
pub fn has_support(actor: &Actor, segments: &[TerrainSegment]) -> bool {
    segments.iter().any(|s| {
        overlaps_x(actor, s.pos.x, s.size.x)
            && (s.top() + actor.size.y / 2.0 - actor.minimum_y).abs() < SURFACE_EPSILON
    })
}

/// Run-ending condition, if any
pub fn check_failure(actor: &Actor) -> Option<FailureReason> {
    if actor.pos.x < 0.0 || actor.pos.y < 0.0 {
        Some(FailureReason::OffWorld)
    } else if actor.rotation.abs() > degrees_to_radians(MAX_ROTATION_DEGREES) {
        Some(FailureReason::OverRotated)
    } else {
        None
    }
}
