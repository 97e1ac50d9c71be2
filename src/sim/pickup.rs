//! Gem spawning, scrolling and collection

use glam::Vec2;

use super::dice::Dice;
use super::state::{Pickup, RunState, SimEvent};
use crate::consts::PICKUP_HEIGHT_RANGE;

/// Place a gem over a gap centered at `gap_x`, next to a brick at height `brick_y`.
///
/// Does nothing when gems are disabled for this simulation.
pub fn spawn(state: &mut RunState, gap_x: f32, brick_y: f32, dice: &mut impl Dice) {
    if !state.config.pickups_enabled {
        return;
    }
    let y = brick_y + state.actor.size.y + dice.scatter(PICKUP_HEIGHT_RANGE);
    let pos = Vec2::new(gap_x, y);
    let id = state.next_entity_id();
    state.pickups.push(Pickup::new(id, pos));
    state.push_event(SimEvent::PickupSpawned { id, pos });
    log::debug!("Gem {id} at ({:.1}, {:.1})", pos.x, pos.y);
}

/// Scroll gems left, dropping the ones that left the frame
pub fn advance(state: &mut RunState, scroll: f32) {
    let mut removed = Vec::new();
    state.pickups.retain_mut(|p| {
        p.pos.x -= scroll;
        if p.pos.x < 0.0 {
            removed.push(p.id);
            false
        } else {
            true
        }
    });
    for id in removed {
        state.push_event(SimEvent::PickupRemoved {
            id,
            collected: false,
        });
    }
}

/// Remove a collected gem. Returns false if it was already gone.
pub fn collect(state: &mut RunState, id: u32) -> bool {
    let Some(index) = state.pickups.iter().position(|p| p.id == id) else {
        return false;
    };
    state.pickups.remove(index);
    state.push_event(SimEvent::PickupRemoved {
        id,
        collected: true,
    });
    log::debug!("Gem {id} collected");
    true
}
