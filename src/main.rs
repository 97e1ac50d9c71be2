//! Skate Runner headless driver
//!
//! Runs the simulation at a fixed 60 Hz clock with a simple autopilot and
//! logs every run. Usage: `skate-runner [CONFIG.json] [FRAMES]`.

use skate_runner::consts::*;
use skate_runner::sim::{RunState, SimEvent, Simulation};
use skate_runner::{ConfigError, RunConfig};

/// Frames simulated when none are given
const DEFAULT_FRAMES: u64 = 60 * 60 * 5;

/// How many frames ahead the autopilot looks for trouble
const LOOKAHEAD_FRAMES: f32 = 6.0;

/// Headless session state
struct Driver {
    sim: Simulation,
    runs: u32,
    best_distance: f32,
    total_gems: u32,
}

impl Driver {
    fn new(config: RunConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            sim: Simulation::new(config)?,
            runs: 1,
            best_distance: 0.0,
            total_gems: 0,
        })
    }

    fn run(&mut self, frames: u64) {
        for frame in 0..frames {
            if should_jump(self.sim.state()) {
                self.sim.request_jump();
            }
            self.sim.tick(frame as f64 * TARGET_FRAME_INTERVAL);

            for event in self.sim.drain_events() {
                if let SimEvent::RunFailed { reason, stats } = event {
                    log::debug!("Run {} ended: {reason:?}", self.runs);
                    self.best_distance = self.best_distance.max(stats.distance);
                    self.total_gems += stats.gems_collected;
                    self.runs += 1;
                }
            }
        }
    }
}

/// Jump when a gap or a higher brick is coming up under the skater
fn should_jump(state: &RunState) -> bool {
    let actor = &state.actor;
    if !actor.is_on_ground {
        return false;
    }
    let front = actor.pos.x + actor.size.x / 2.0;
    let horizon = front + state.scroll_speed * LOOKAHEAD_FRAMES;
    let ground_top = actor.minimum_y - actor.size.y / 2.0;

    let wall_ahead = state
        .segments
        .iter()
        .any(|s| s.left() > front - 1.0 && s.left() < horizon && s.top() > ground_top + 1.0);
    let gap_ahead = state.segments.windows(2).any(|pair| {
        pair[0].right() >= front
            && pair[0].right() < horizon
            && pair[1].left() - pair[0].right() > SEGMENT_SPACING + 1.0
    });
    wall_ahead || gap_ahead
}

fn parse_args() -> Result<(RunConfig, u64), ConfigError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let frames = args
        .next()
        .and_then(|f| f.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);
    Ok((config, frames))
}

fn main() {
    env_logger::init();
    log::info!("Skate Runner (headless) starting...");

    let (config, frames) = match parse_args() {
        Ok(parsed) => parsed,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };
    log::info!(
        "Seed {:#x}, frame width {}, gems {}",
        config.seed,
        config.frame_width,
        if config.pickups_enabled { "on" } else { "off" }
    );

    let mut driver = match Driver::new(config) {
        Ok(driver) => driver,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };
    driver.run(frames);

    let current = driver.sim.state().stats;
    println!(
        "{frames} frames, {} runs, best distance {:.0}, {} gems collected",
        driver.runs,
        driver.best_distance.max(current.distance),
        driver.total_gems + current.gems_collected
    );
    match serde_json::to_string_pretty(&driver.sim.snapshot()) {
        Ok(json) => log::debug!("Final state:\n{json}"),
        Err(err) => log::warn!("Could not serialize final state: {err}"),
    }
}
