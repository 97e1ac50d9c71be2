//! Collision categories and contact dispatch
//!
//! Geometry is the physics backend's job. Here we only decide who collides
//! with whom and what a reported contact means for the run.

use serde::{Deserialize, Serialize};

use super::physics::SURFACE_EPSILON;
use super::pickup;
use super::state::{ACTOR_ID, Actor, RunState, SimEvent, TerrainSegment};

/// Category bits
pub mod category {
    pub const ACTOR: u32 = 1 << 0;
    pub const TERRAIN: u32 = 1 << 1;
    pub const PICKUP: u32 = 1 << 2;
}

/// Per-body filtering policy, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    /// Which category this body belongs to
    pub category: u32,
    /// Categories this body is physically blocked by
    pub collision_mask: u32,
    /// Categories this body wants contact notifications for
    pub contact_mask: u32,
}

impl CollisionFilter {
    /// Body that never pushes anything and asks for no notifications
    pub fn passive(category: u32) -> Self {
        Self {
            category,
            collision_mask: 0,
            contact_mask: 0,
        }
    }

    /// Whether `self` is physically stopped by `other`
    pub fn collides_with(&self, other: &CollisionFilter) -> bool {
        self.collision_mask & other.category != 0
    }

    /// Whether a touch between the two bodies is reported (either side asking is enough)
    pub fn reports_contact_with(&self, other: &CollisionFilter) -> bool {
        self.contact_mask & other.category != 0 || other.contact_mask & self.category != 0
    }
}

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactBody {
    pub category: u32,
    pub id: u32,
}

impl ContactBody {
    pub fn actor() -> Self {
        Self {
            category: category::ACTOR,
            id: ACTOR_ID,
        }
    }

    pub fn terrain(id: u32) -> Self {
        Self {
            category: category::TERRAIN,
            id,
        }
    }

    pub fn pickup(id: u32) -> Self {
        Self {
            category: category::PICKUP,
            id,
        }
    }
}

/// Unordered pair of touching bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPair {
    pub a: ContactBody,
    pub b: ContactBody,
}

impl ContactPair {
    pub fn new(a: ContactBody, b: ContactBody) -> Self {
        Self { a, b }
    }

    /// The body of `category` and the other one, in either order
    fn split(&self, category: u32) -> Option<(ContactBody, ContactBody)> {
        if self.a.category == category {
            Some((self.a, self.b))
        } else if self.b.category == category {
            Some((self.b, self.a))
        } else {
            None
        }
    }
}

/// Apply one contact to the run
pub fn resolve(state: &mut RunState, pair: &ContactPair) {
    let Some((_, other)) = pair.split(category::ACTOR) else {
        return;
    };

    match other.category {
        category::TERRAIN => {
            // Brick may already have scrolled out this frame
            let Some(segment) = state.segments.iter().find(|s| s.id == other.id) else {
                log::trace!("Ignoring contact with removed segment {}", other.id);
                return;
            };
            if !lands_on(&state.actor, segment) {
                log::trace!("Side contact with segment {} ignored", other.id);
                return;
            }
            let ground_y = segment.top() + state.actor.size.y / 2.0;
            let was_airborne = !state.actor.is_on_ground;
            state.actor.land(ground_y);
            if was_airborne {
                state.push_event(SimEvent::Landed {
                    segment_id: other.id,
                });
            }
        }
        category::PICKUP => {
            if pickup::collect(state, other.id) {
                state.stats.gems_collected += 1;
            }
        }
        _ => {}
    }
}

/// A terrain touch counts as a landing only when the skater is not rising
/// and its feet sank no deeper than one tick of fall below the brick top.
/// Anything else is the skater running into the brick's side.
fn lands_on(actor: &Actor, segment: &TerrainSegment) -> bool {
    let sink = segment.top() - actor.bottom();
    actor.vel.y <= 0.0 && sink <= -actor.vel.y + SURFACE_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::consts::*;
    use crate::sim::state::{Elevation, GroundState, Pickup};
    use glam::Vec2;

    fn airborne_state() -> RunState {
        let mut state = RunState::new(RunConfig::default());
        state.actor.is_on_ground = false;
        state.actor.pos.y = 150.0;
        state.actor.vel = Vec2::new(0.0, -6.0);
        state
    }

    #[test]
    fn test_actor_terrain_grounds_actor() {
        let mut state = airborne_state();
        let seg = TerrainSegment::new(7, Vec2::new(160.0, 32.0), Elevation::Low);
        state.segments.push(seg.clone());

        resolve(
            &mut state,
            &ContactPair::new(ContactBody::terrain(7), ContactBody::actor()),
        );

        assert_eq!(state.actor.state(), GroundState::Grounded);
        assert_eq!(state.actor.vel, Vec2::ZERO);
        assert_eq!(state.actor.pos.y, state.actor.minimum_y);
        assert_eq!(state.actor.minimum_y, seg.top() + state.actor.size.y / 2.0);
        assert!(
            state
                .drain_events()
                .contains(&SimEvent::Landed { segment_id: 7 })
        );
    }

    #[test]
    fn test_side_contact_with_wall_does_not_climb() {
        let mut state = RunState::new(RunConfig::default());
        let ground = state.actor.minimum_y;
        let wall_x = state.actor.pos.x + 50.0;
        let wall = TerrainSegment::new(
            8,
            Vec2::new(wall_x, SEGMENT_HEIGHT / 2.0 + Elevation::High.offset()),
            Elevation::High,
        );
        state.segments.push(wall);
        let before = state.actor.clone();

        resolve(
            &mut state,
            &ContactPair::new(ContactBody::actor(), ContactBody::terrain(8)),
        );

        assert_eq!(state.actor, before);
        assert_eq!(state.actor.pos.y, ground);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_rising_skater_does_not_land() {
        let mut state = airborne_state();
        state.actor.vel.y = JUMP_SPEED;
        state.actor.pos.y = SEGMENT_HEIGHT + state.actor.size.y / 2.0 - 5.0;
        state
            .segments
            .push(TerrainSegment::new(7, Vec2::new(160.0, 32.0), Elevation::Low));

        resolve(
            &mut state,
            &ContactPair::new(ContactBody::actor(), ContactBody::terrain(7)),
        );

        assert_eq!(state.actor.state(), GroundState::Airborne);
    }

    #[test]
    fn test_actor_pickup_collects() {
        let mut state = airborne_state();
        state.pickups.push(Pickup::new(3, Vec2::new(160.0, 200.0)));
        state.pickups.push(Pickup::new(4, Vec2::new(300.0, 200.0)));

        resolve(
            &mut state,
            &ContactPair::new(ContactBody::actor(), ContactBody::pickup(3)),
        );

        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.pickups[0].id, 4);
        assert_eq!(state.stats.gems_collected, 1);
    }

    #[test]
    fn test_removed_entities_are_noops() {
        let mut state = airborne_state();
        let before = state.actor.clone();

        resolve(
            &mut state,
            &ContactPair::new(ContactBody::actor(), ContactBody::terrain(99)),
        );
        resolve(
            &mut state,
            &ContactPair::new(ContactBody::pickup(42), ContactBody::actor()),
        );

        assert_eq!(state.actor, before);
        assert_eq!(state.stats.gems_collected, 0);
    }

    #[test]
    fn test_unrelated_pairs_ignored() {
        let mut state = airborne_state();
        state.pickups.push(Pickup::new(3, Vec2::new(160.0, 200.0)));
        state
            .segments
            .push(TerrainSegment::new(7, Vec2::new(160.0, 32.0), Elevation::Low));

        resolve(
            &mut state,
            &ContactPair::new(ContactBody::terrain(7), ContactBody::pickup(3)),
        );

        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.actor.state(), GroundState::Airborne);
    }

    #[test]
    fn test_filter_policy() {
        let mut state = RunState::new(RunConfig::default());
        let actor = state.actor.filter;
        let id = state.next_entity_id();
        let brick = TerrainSegment::new(id, Vec2::ZERO, Elevation::Low).filter;
        let gem = Pickup::new(id + 1, Vec2::ZERO).filter;

        assert!(actor.collides_with(&brick));
        assert!(!actor.collides_with(&gem));
        assert!(!brick.collides_with(&gem));
        assert!(!gem.collides_with(&brick));

        assert!(actor.reports_contact_with(&brick));
        assert!(gem.reports_contact_with(&actor));
        assert!(!brick.reports_contact_with(&gem));
    }
}
