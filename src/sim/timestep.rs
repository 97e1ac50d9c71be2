//! Frame-rate independent scroll distance
//!
//! Only scrolling follows the wall clock. Skater physics runs in per-tick units.

use crate::consts::TARGET_FRAME_INTERVAL;

/// How many 60 Hz frames fit in the time since the previous tick.
///
/// No previous tick, or a clock that went backwards, counts as zero.
fn frame_scale(now: f64, previous: Option<f64>) -> f32 {
    let elapsed = previous.map_or(0.0, |prev| (now - prev).max(0.0));
    (elapsed / TARGET_FRAME_INTERVAL) as f32
}

/// Distance terrain and gems scroll this tick at `speed` units per frame
pub fn scroll_distance(now: f64, previous: Option<f64>, speed: f32) -> f32 {
    speed * frame_scale(now, previous)
}
