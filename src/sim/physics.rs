//! Physics capability interface and the headless kinematic backend
//!
//! A real engine only has to move the skater's body, take an impulse and
//! report which bodies touched. `KinematicPhysics` does that with plain
//! per-tick gravity and axis-aligned boxes, enough for deterministic runs
//! and tests.

use glam::Vec2;

use super::contact::{ContactBody, ContactPair};
use super::state::{Actor, Pickup, TerrainSegment};
use crate::consts::GRAVITY;

/// Tolerance for "standing exactly on" comparisons
pub const SURFACE_EPSILON: f32 = 1e-3;

/// What the simulation needs from a physics engine
pub trait PhysicsBackend {
    /// One-shot impulse on the skater's body
    fn apply_impulse(&mut self, actor: &mut Actor, impulse: Vec2);

    /// Move the skater for one tick, queueing any contacts it makes
    fn integrate(&mut self, actor: &mut Actor, segments: &[TerrainSegment], pickups: &[Pickup]);

    /// Contacts raised since the last drain
    fn drain_contacts(&mut self) -> Vec<ContactPair>;

    /// Forget everything about the previous run
    fn reset(&mut self);
}

/// Per-tick gravity, box overlap contacts, no rotation
#[derive(Debug, Clone)]
pub struct KinematicPhysics {
    pub gravity: f32,
    pending: Vec<ContactPair>,
}

impl Default for KinematicPhysics {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            pending: Vec::new(),
        }
    }
}

impl KinematicPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest brick top the skater's feet passed through this step
    fn landing_surface<'a>(
        actor: &Actor,
        prev_bottom: f32,
        segments: &'a [TerrainSegment],
    ) -> Option<&'a TerrainSegment> {
        if actor.bottom() > prev_bottom {
            return None;
        }
        segments
            .iter()
            .filter(|s| actor.filter.collides_with(&s.filter))
            .filter(|s| overlaps_x(actor, s.pos.x, s.size.x))
            .filter(|s| s.top() <= prev_bottom + SURFACE_EPSILON && s.top() >= actor.bottom())
            .max_by(|a, b| a.top().total_cmp(&b.top()))
    }

    /// Bricks whose side the skater ran into push it back to their left face
    fn block_sides(actor: &mut Actor, prev_bottom: f32, segments: &[TerrainSegment]) {
        for s in segments {
            if !actor.filter.collides_with(&s.filter) || s.pos.x < actor.pos.x {
                continue;
            }
            let below_top = prev_bottom < s.top() - SURFACE_EPSILON;
            let above_base = actor.pos.y + actor.size.y / 2.0 > s.pos.y - s.size.y / 2.0;
            if below_top && above_base && overlaps_x(actor, s.pos.x, s.size.x) {
                actor.pos.x = s.left() - actor.size.x / 2.0;
            }
        }
    }
}

impl PhysicsBackend for KinematicPhysics {
    fn apply_impulse(&mut self, _actor: &mut Actor, impulse: Vec2) {
        // Velocity and impulse are the same thing here; the jump speed is already set
        log::trace!("Kinematic impulse ({:.1}, {:.1}) folded into velocity", impulse.x, impulse.y);
    }

    fn integrate(&mut self, actor: &mut Actor, segments: &[TerrainSegment], pickups: &[Pickup]) {
        let prev_bottom = actor.bottom();

        if !actor.is_on_ground {
            actor.pos.y += actor.vel.y;
            actor.vel.y -= self.gravity;

            if let Some(surface) = Self::landing_surface(actor, prev_bottom, segments) {
                if actor.filter.reports_contact_with(&surface.filter) {
                    self.pending
                        .push(ContactPair::new(ContactBody::actor(), ContactBody::terrain(surface.id)));
                }
            }
        }

        Self::block_sides(actor, prev_bottom, segments);

        for p in pickups {
            if actor.filter.reports_contact_with(&p.filter) && overlaps_box(actor, p.pos, p.size) {
                self.pending
                    .push(ContactPair::new(ContactBody::actor(), ContactBody::pickup(p.id)));
            }
        }
    }

    fn drain_contacts(&mut self) -> Vec<ContactPair> {
        std::mem::take(&mut self.pending)
    }

    fn reset(&mut self) {
        self.pending.clear();
    }
}

/// Skater spans horizontally into a body centered at `x` with `width`
#[inline]
pub fn overlaps_x(actor: &Actor, x: f32, width: f32) -> bool {
    (actor.pos.x - x).abs() < (actor.size.x + width) / 2.0
}

#[inline]
fn overlaps_box(actor: &Actor, center: Vec2, size: Vec2) -> bool {
    let d = (actor.pos - center).abs();
    let reach = (actor.size + size) / 2.0;
    d.x < reach.x && d.y < reach.y
}
