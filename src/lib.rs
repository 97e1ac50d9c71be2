//! Skate Runner - an endless-runner simulation core
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (terrain, gems, skater physics, run lifecycle)
//! - `config`: Per-simulation options loadable from JSON
//!
//! Rendering, input gestures and real physics engines live outside this crate.
//! They talk to the simulation through `sim::Simulation`, `sim::SimEvent` and
//! the `sim::PhysicsBackend` trait.

pub mod config;
pub mod sim;

pub use config::{ConfigError, RunConfig};
pub use sim::Simulation;

/// Fixed tuning constants
pub mod consts {
    /// Frame interval the scroll speed is expressed against (60 Hz)
    pub const TARGET_FRAME_INTERVAL: f64 = 1.0 / 60.0;

    /// Scroll speed at the start of every run (units per 60 Hz frame)
    pub const STARTING_SCROLL_SPEED: f32 = 5.0;
    /// Added to the scroll speed once per tick
    pub const SCROLL_SPEED_INCREMENT: f32 = 0.01;

    /// Gravity subtracted from the skater's vertical velocity each tick
    pub const GRAVITY: f32 = 1.5;
    /// Vertical velocity set when a jump starts
    pub const JUMP_SPEED: f32 = 20.0;
    /// One-shot upward impulse handed to the physics backend on jump
    pub const JUMP_IMPULSE: f32 = 260.0;
    /// Vertical speed (units/s) above which the skater counts as airborne
    pub const AIRBORNE_SPEED_THRESHOLD: f32 = 100.0;
    /// Tilt (degrees from upright) that ends the run
    pub const MAX_ROTATION_DEGREES: f32 = 85.0;

    /// Skater body size
    pub const ACTOR_WIDTH: f32 = 44.0;
    pub const ACTOR_HEIGHT: f32 = 76.0;

    /// Sidewalk brick size
    pub const SEGMENT_WIDTH: f32 = 64.0;
    pub const SEGMENT_HEIGHT: f32 = 64.0;
    /// Seam between consecutive bricks
    pub const SEGMENT_SPACING: f32 = 1.0;
    /// Extra height of bricks on the high level
    pub const HIGH_ELEVATION_OFFSET: f32 = 100.0;

    /// Terrain dice: roll in [0, TERRAIN_ROLL_SIDES)
    pub const TERRAIN_ROLL_SIDES: u32 = 99;
    /// Rolls below this open a gap (~5%)
    pub const GAP_ROLL_THRESHOLD: u32 = 5;
    /// Rolls in [GAP_ROLL_THRESHOLD, this) toggle the elevation (~5%)
    pub const ELEVATION_ROLL_THRESHOLD: u32 = 10;
    /// Gap width in frames of travel (gap = GAP_FRAMES * scroll speed)
    pub const GAP_FRAMES: f32 = 20.0;

    /// Gem size
    pub const PICKUP_SIZE: f32 = 24.0;
    /// Random extra height of a gem above the skater's head
    pub const PICKUP_HEIGHT_RANGE: f32 = 150.0;

    /// Default visible frame width (landscape phone)
    pub const DEFAULT_FRAME_WIDTH: f32 = 667.0;

    /// Undrained events kept before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 4096;
}

/// Degrees to radians
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}
