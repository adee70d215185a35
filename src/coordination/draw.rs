//! Bounded random draws
//!
//! Coordinators never call the RNG directly. They take a `Draw`, so production
//! runs use `StdRng` while tests script the exact sequence of values.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of values in `0..upper`
pub trait Draw: Send + 'static {
    /// Draw a value in `0..upper`; returns 0 when `upper` is 0
    fn draw(&mut self, upper: u32) -> u32;
}

impl Draw for StdRng {
    fn draw(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        self.random_range(0..upper)
    }
}

/// Build the default RNG, seeded when a seed is configured
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Replays a fixed sequence of draws, then repeats `fallback`
///
/// Values are clamped into `0..upper` so a script cannot break the bound.
#[derive(Debug, Clone)]
pub struct Scripted {
    values: VecDeque<u32>,
    fallback: u32,
}

impl Scripted {
    /// Script the given values, falling back to 0 once exhausted
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0,
        }
    }

    /// Set the value returned after the script runs out
    pub fn then(mut self, fallback: u32) -> Self {
        self.fallback = fallback;
        self
    }
}

impl Draw for Scripted {
    fn draw(&mut self, upper: u32) -> u32 {
        let value = self.values.pop_front().unwrap_or(self.fallback);
        value.min(upper.saturating_sub(1))
    }
}
