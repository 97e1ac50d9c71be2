//! Run state and core simulation types
//!
//! Everything a tick reads or mutates lives in `RunState`.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::contact::{CollisionFilter, category};
use crate::config::RunConfig;
use crate::consts::*;

/// Entity id reserved for the skater
pub const ACTOR_ID: u32 = 0;

/// Terrain height level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Elevation {
    #[default]
    Low,
    High,
}

impl Elevation {
    /// Vertical offset added to bricks on this level
    pub fn offset(self) -> f32 {
        match self {
            Elevation::Low => 0.0,
            Elevation::High => HIGH_ELEVATION_OFFSET,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Elevation::Low => Elevation::High,
            Elevation::High => Elevation::Low,
        }
    }
}

/// Kinematic state of the skater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundState {
    Grounded,
    Airborne,
}

/// The skater
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radians, 0 = upright
    pub rotation: f32,
    pub is_on_ground: bool,
    /// Center height when standing on the current ground
    pub minimum_y: f32,
    pub size: Vec2,
    pub filter: CollisionFilter,
}

impl Actor {
    /// Skater standing on the low level at `x`
    pub fn new(x: f32) -> Self {
        let minimum_y = SEGMENT_HEIGHT + ACTOR_HEIGHT / 2.0;
        Self {
            pos: Vec2::new(x, minimum_y),
            vel: Vec2::ZERO,
            rotation: 0.0,
            is_on_ground: true,
            minimum_y,
            size: Vec2::new(ACTOR_WIDTH, ACTOR_HEIGHT),
            filter: CollisionFilter {
                category: category::ACTOR,
                collision_mask: category::TERRAIN,
                contact_mask: category::TERRAIN | category::PICKUP,
            },
        }
    }

    pub fn state(&self) -> GroundState {
        if self.is_on_ground {
            GroundState::Grounded
        } else {
            GroundState::Airborne
        }
    }

    /// Settle on ground whose surface puts our center at `ground_y`
    pub fn land(&mut self, ground_y: f32) {
        self.minimum_y = ground_y;
        self.pos.y = ground_y;
        self.vel = Vec2::ZERO;
        self.is_on_ground = true;
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y - self.size.y / 2.0
    }
}

/// A sidewalk brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainSegment {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    pub elevation: Elevation,
    pub filter: CollisionFilter,
}

impl TerrainSegment {
    pub fn new(id: u32, pos: Vec2, elevation: Elevation) -> Self {
        Self {
            id,
            pos,
            size: Vec2::new(SEGMENT_WIDTH, SEGMENT_HEIGHT),
            elevation,
            filter: CollisionFilter::passive(category::TERRAIN),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x - self.size.x / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }
}

/// A gem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub filter: CollisionFilter,
}

impl Pickup {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            size: Vec2::splat(PICKUP_SIZE),
            filter: CollisionFilter {
                category: category::PICKUP,
                collision_mask: 0,
                contact_mask: category::ACTOR,
            },
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// Skater left the world on the left or bottom
    OffWorld,
    /// Skater tilted past the rotation limit
    OverRotated,
}

/// Counters for the current run (reported on failure, never persisted)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub ticks: u64,
    pub distance: f32,
    pub jumps: u32,
    pub gems_collected: u32,
}

/// Notifications for render/physics collaborators, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    RunStarted,
    SegmentSpawned { id: u32, pos: Vec2, elevation: Elevation },
    SegmentRemoved { id: u32 },
    PickupSpawned { id: u32, pos: Vec2 },
    PickupRemoved { id: u32, collected: bool },
    Jumped,
    Landed { segment_id: u32 },
    RunFailed { reason: FailureReason, stats: RunStats },
}

/// Complete state of a run
#[derive(Debug, Clone)]
pub struct RunState {
    pub config: RunConfig,
    /// Current scroll speed (units per 60 Hz frame), grows every tick
    pub scroll_speed: f32,
    /// Level new bricks are placed on
    pub elevation: Elevation,
    /// Timestamp of the previous tick, `None` on the first tick of a run
    pub last_timestamp: Option<f64>,
    pub actor: Actor,
    /// Live bricks, ordered by x
    pub segments: Vec<TerrainSegment>,
    /// Live gems
    pub pickups: Vec<Pickup>,
    pub stats: RunStats,
    events: VecDeque<SimEvent>,
    dropped_events: u64,
    next_id: u32,
}

impl RunState {
    /// Empty state; call `tick::start_run` before the first tick
    pub fn new(config: RunConfig) -> Self {
        let actor = Actor::new(config.frame_width / 4.0);
        Self {
            config,
            scroll_speed: STARTING_SCROLL_SPEED,
            elevation: Elevation::Low,
            last_timestamp: None,
            actor,
            segments: Vec::new(),
            pickups: Vec::new(),
            stats: RunStats::default(),
            events: VecDeque::new(),
            dropped_events: 0,
            next_id: ACTOR_ID + 1,
        }
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn reset_entity_ids(&mut self) {
        self.next_id = ACTOR_ID + 1;
    }

    /// Queue an event. Once `MAX_PENDING_EVENTS` are waiting, the oldest is dropped.
    pub fn push_event(&mut self, event: SimEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            if self.dropped_events == 0 {
                log::warn!("Event queue full ({MAX_PENDING_EVENTS}), dropping oldest until drained");
            }
            self.dropped_events += 1;
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Take all events raised since the last drain.
    ///
    /// Hosts are expected to call this once per frame; the queue is bounded
    /// and older events are lost otherwise.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        if self.dropped_events > 0 {
            log::debug!("{} events were dropped before this drain", self.dropped_events);
            self.dropped_events = 0;
        }
        self.events.drain(..).collect()
    }

    /// Rightmost brick center, 0 when there is no terrain
    pub fn frontier_x(&self) -> f32 {
        self.segments
            .iter()
            .map(|s| s.pos.x)
            .fold(0.0, f32::max)
    }
}
