//! Endless-runner simulation
//!
//! All gameplay logic lives here:
//! - Single-threaded, one tick per frame, nothing blocks
//! - Seeded RNG only, so a seed plus a timestamp/jump sequence replays exactly
//! - Live bricks kept in spatial (insertion) order
//! - No rendering or input-device dependencies

pub mod actor;
pub mod contact;
pub mod dice;
pub mod physics;
pub mod pickup;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod timestep;
pub mod view;

pub use contact::{CollisionFilter, ContactBody, ContactPair, category};
pub use dice::Dice;
pub use physics::{KinematicPhysics, PhysicsBackend};
pub use state::{
    ACTOR_ID, Actor, Elevation, FailureReason, GroundState, Pickup, RunState, RunStats, SimEvent,
    TerrainSegment,
};
pub use tick::{Simulation, TickInput, TickOutcome, start_run, tick};
pub use view::{NodeKind, RenderNode, Snapshot};
