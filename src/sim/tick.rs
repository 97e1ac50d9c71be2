//! Run lifecycle and the per-frame tick
//!
//! One `tick` per rendered frame. Order within a tick is fixed:
//! speed-up, scroll distance, terrain, skater (jump, integration, contacts,
//! failure check), gems. A failed run restarts immediately.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::dice::Dice;
use super::physics::{KinematicPhysics, PhysicsBackend};
use super::state::{Actor, Elevation, FailureReason, RunState, RunStats, SimEvent};
use super::view::{RenderNode, Snapshot, render_nodes};
use super::{actor, contact, pickup, terrain, timestep};
use crate::config::{ConfigError, RunConfig};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump requested since the previous tick
    pub jump: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Distance the world scrolled
    pub scroll: f32,
    /// Set when the run ended (and was restarted) this tick
    pub failure: Option<FailureReason>,
}

/// Reset everything to the start of a fresh run
pub fn start_run(state: &mut RunState, physics: &mut impl PhysicsBackend) {
    for id in state.segments.drain(..).map(|s| s.id).collect::<Vec<_>>() {
        state.push_event(SimEvent::SegmentRemoved { id });
    }
    for id in state.pickups.drain(..).map(|p| p.id).collect::<Vec<_>>() {
        state.push_event(SimEvent::PickupRemoved {
            id,
            collected: false,
        });
    }
    physics.reset();

    state.reset_entity_ids();
    state.actor = Actor::new(state.config.frame_width / 4.0);
    state.scroll_speed = STARTING_SCROLL_SPEED;
    state.elevation = Elevation::Low;
    state.last_timestamp = None;
    state.stats = RunStats::default();

    state.push_event(SimEvent::RunStarted);
    terrain::lay_runway(state);
    log::info!("Run started ({} bricks on the runway)", state.segments.len());
}

/// Advance the run by one frame at absolute time `timestamp` (seconds)
pub fn tick(
    state: &mut RunState,
    physics: &mut impl PhysicsBackend,
    dice: &mut impl Dice,
    input: &TickInput,
    timestamp: f64,
) -> TickOutcome {
    if input.jump {
        actor::trigger_jump(state, physics);
    }

    state.scroll_speed += SCROLL_SPEED_INCREMENT;
    let scroll = timestep::scroll_distance(timestamp, state.last_timestamp, state.scroll_speed);
    state.last_timestamp = Some(timestamp);

    terrain::advance(state, scroll, dice);

    actor::update(state, physics);
    for pair in physics.drain_contacts() {
        contact::resolve(state, &pair);
    }
    // Only final once every contact from this frame is in
    let failure = actor::check_failure(&state.actor);

    pickup::advance(state, scroll);

    state.stats.ticks += 1;
    state.stats.distance += scroll;
    log::trace!(
        "tick {}: scroll={scroll:.2} speed={:.2} actor=({:.1}, {:.1})",
        state.stats.ticks,
        state.scroll_speed,
        state.actor.pos.x,
        state.actor.pos.y
    );

    if let Some(reason) = failure {
        let stats = state.stats;
        log::info!(
            "Run over ({reason:?}) after {} ticks, distance {:.0}, {} gems, {} jumps",
            stats.ticks,
            stats.distance,
            stats.gems_collected,
            stats.jumps
        );
        state.push_event(SimEvent::RunFailed { reason, stats });
        start_run(state, physics);
    }

    TickOutcome { scroll, failure }
}

/// A ready-to-drive simulation: run state, physics, seeded dice and latched input
pub struct Simulation<P: PhysicsBackend = KinematicPhysics> {
    state: RunState,
    physics: P,
    rng: Pcg32,
    input: TickInput,
}

impl Simulation<KinematicPhysics> {
    /// Headless simulation with the kinematic backend
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        Self::with_physics(config, KinematicPhysics::new())
    }
}

impl<P: PhysicsBackend> Simulation<P> {
    /// Simulation on a caller-provided backend. Fails on an unusable frame width.
    pub fn with_physics(config: RunConfig, mut physics: P) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = Pcg32::seed_from_u64(config.seed);
        let mut state = RunState::new(config);
        start_run(&mut state, &mut physics);
        Ok(Self {
            state,
            physics,
            rng,
            input: TickInput::default(),
        })
    }

    /// Latch a jump for the next tick (repeats before then coalesce)
    pub fn request_jump(&mut self) {
        self.input.jump = true;
    }

    pub fn tick(&mut self, timestamp: f64) -> TickOutcome {
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &mut self.physics, &mut self.rng, &input, timestamp)
    }

    /// Abandon the current run
    pub fn restart(&mut self) {
        self.input = TickInput::default();
        start_run(&mut self.state, &mut self.physics);
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.state.drain_events()
    }

    pub fn render_nodes(&self) -> Vec<RenderNode> {
        render_nodes(&self.state)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::degrees_to_radians;
    use crate::sim::state::{GroundState, Pickup};
    use proptest::prelude::*;

    const FRAME: f64 = TARGET_FRAME_INTERVAL;

    #[test]
    fn test_first_tick_does_not_scroll() {
        let mut sim = Simulation::new(RunConfig::default()).unwrap();
        let before: Vec<_> = sim.state().segments.iter().map(|s| (s.id, s.pos)).collect();

        let outcome = sim.tick(42.0);

        assert_eq!(outcome.scroll, 0.0);
        let after: Vec<_> = sim.state().segments.iter().map(|s| (s.id, s.pos)).collect();
        assert_eq!(before, after);
        assert_eq!(sim.state().last_timestamp, Some(42.0));
    }

    #[test]
    fn test_one_frame_scrolls_about_speed() {
        let mut sim = Simulation::new(RunConfig::default()).unwrap();
        sim.tick(0.0);
        let outcome = sim.tick(FRAME);
        assert!((outcome.scroll - 5.0).abs() < 0.05, "got {}", outcome.scroll);
    }

    #[test]
    fn test_speed_only_grows_within_a_run() {
        let mut sim = Simulation::new(RunConfig::default()).unwrap();
        let mut last = sim.state().scroll_speed;
        for i in 0..50 {
            sim.tick(i as f64 * FRAME);
            assert!(sim.state().scroll_speed > last);
            last = sim.state().scroll_speed;
        }
    }

    #[test]
    fn test_start_run_is_idempotent() {
        let mut sim = Simulation::new(RunConfig::default()).unwrap();
        for i in 0..30 {
            sim.tick(i as f64 * FRAME);
        }

        sim.restart();
        let once = sim.snapshot();
        sim.restart();
        let twice = sim.snapshot();

        assert_eq!(once, twice);
        assert_eq!(once.scroll_speed, STARTING_SCROLL_SPEED);
        assert_eq!(once.elevation, Elevation::Low);
        assert_eq!(once.last_timestamp, None);
        assert!(once.pickups.is_empty());
    }

    #[test]
    fn test_restart_announces_removals() {
        let mut sim = Simulation::new(RunConfig::default()).unwrap();
        let ids: Vec<u32> = sim.state().segments.iter().map(|s| s.id).collect();
        sim.drain_events();

        sim.restart();

        let events = sim.drain_events();
        for id in ids {
            assert!(events.contains(&SimEvent::SegmentRemoved { id }));
        }
        assert!(events.contains(&SimEvent::RunStarted));
    }

    #[test]
    fn test_falling_off_world_restarts_run() {
        let mut sim = Simulation::new(RunConfig::default()).unwrap();
        sim.tick(0.0);
        sim.state.actor.is_on_ground = false;
        sim.state.actor.pos.y = 0.5;
        sim.state.actor.vel.y = -10.0;
        sim.drain_events();

        let outcome = sim.tick(FRAME);

        assert_eq!(outcome.failure, Some(FailureReason::OffWorld));
        let state = sim.state();
        assert_eq!(state.actor.state(), GroundState::Grounded);
        assert_eq!(state.scroll_speed, STARTING_SCROLL_SPEED);
        assert_eq!(state.last_timestamp, None);
        assert_eq!(state.stats, RunStats::default());
        let events = sim.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            SimEvent::RunFailed {
                reason: FailureReason::OffWorld,
                ..
            }
        )));
    }

    #[test]
    fn test_over_rotation_restarts_run() {
        let mut sim = Simulation::new(RunConfig::default()).unwrap();
        sim.state.actor.rotation = degrees_to_radians(90.0);

        let outcome = sim.tick(0.0);

        assert_eq!(outcome.failure, Some(FailureReason::OverRotated));
        assert_eq!(sim.state().actor.rotation, 0.0);
    }

    #[test]
    fn test_jump_lands_back_on_runway() {
        let mut sim = Simulation::new(RunConfig::default()).unwrap();
        sim.tick(0.0);
        sim.request_jump();
        sim.tick(FRAME);
        assert_eq!(sim.state().actor.state(), GroundState::Airborne);
        assert_eq!(sim.state().stats.jumps, 1);

        // A second request mid-air does nothing
        sim.request_jump();
        sim.tick(2.0 * FRAME);
        assert_eq!(sim.state().stats.jumps, 1);

        // Zero-scroll ticks keep the runway under the skater
        let mut landed = false;
        for _ in 0..60 {
            sim.tick(2.0 * FRAME);
            if sim.state().actor.is_on_ground {
                landed = true;
                break;
            }
        }
        assert!(landed);
        let actor = &sim.state().actor;
        assert_eq!(actor.pos.y, SEGMENT_HEIGHT + ACTOR_HEIGHT / 2.0);
        assert!(sim.drain_events().iter().any(|e| matches!(e, SimEvent::Landed { .. })));
    }

    #[test]
    fn test_pickups_disabled_never_spawn() {
        let config = RunConfig {
            pickups_enabled: false,
            ..Default::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        for i in 0..2000 {
            sim.tick(i as f64 * FRAME);
            assert!(sim.state().pickups.is_empty());
        }
    }

    #[test]
    fn test_unusable_frame_width_is_rejected() {
        for frame_width in [f32::INFINITY, f32::NAN, -10.0, 0.0] {
            let config = RunConfig {
                frame_width,
                ..Default::default()
            };
            let result = Simulation::new(config);
            assert!(
                matches!(result, Err(ConfigError::InvalidFrameWidth { .. })),
                "width {frame_width} accepted"
            );
        }
    }

    #[test]
    fn test_jumping_into_gem_collects_it() {
        let mut sim = Simulation::new(RunConfig::default()).unwrap();
        // Just out of reach while standing
        let gem_pos = sim.state.actor.pos + glam::Vec2::new(0.0, 60.0);
        let id = sim.state.next_entity_id();
        sim.state.pickups.push(Pickup::new(id, gem_pos));
        sim.tick(0.0);
        assert_eq!(sim.state().pickups.len(), 1);
        sim.drain_events();

        sim.request_jump();
        sim.tick(0.0);

        assert!(sim.state().pickups.is_empty());
        assert_eq!(sim.state().stats.gems_collected, 1);
        assert!(
            sim.drain_events()
                .contains(&SimEvent::PickupRemoved { id, collected: true })
        );
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = Simulation::new(RunConfig::default()).unwrap();
        let mut b = Simulation::new(RunConfig::default()).unwrap();
        for i in 0..500 {
            if i % 37 == 0 {
                a.request_jump();
                b.request_jump();
            }
            a.tick(i as f64 * FRAME);
            b.tick(i as f64 * FRAME);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    proptest! {
        #[test]
        fn prop_grounded_actor_is_at_rest(
            seed in any::<u64>(),
            jumps in prop::collection::vec(any::<bool>(), 1..800),
        ) {
            let mut sim = Simulation::new(RunConfig { seed, ..Default::default() }).unwrap();
            for (i, jump) in jumps.into_iter().enumerate() {
                if jump {
                    sim.request_jump();
                }
                sim.tick(i as f64 * FRAME);

                let actor = &sim.state().actor;
                if actor.is_on_ground {
                    prop_assert_eq!(actor.vel, glam::Vec2::ZERO);
                    prop_assert_eq!(actor.pos.y, actor.minimum_y);
                }
                prop_assert!(sim.state().actor.pos.x >= 0.0);
                prop_assert!(sim.state().actor.pos.y >= 0.0);
            }
        }
    }
}
