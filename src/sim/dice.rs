//! Random draws used by the generators
//!
//! Generators draw through `Dice` so tests can script exact rolls; every
//! `rand::Rng` (the seeded `Pcg32` in particular) is a `Dice`.

use rand::Rng;

pub trait Dice {
    /// Uniform integer in [0, sides)
    fn roll(&mut self, sides: u32) -> u32;
    /// Uniform float in [0, max)
    fn scatter(&mut self, max: f32) -> f32;
}

impl<R: Rng> Dice for R {
    fn roll(&mut self, sides: u32) -> u32 {
        self.random_range(0..sides)
    }

    fn scatter(&mut self, max: f32) -> f32 {
        self.random_range(0.0..max)
    }
}
