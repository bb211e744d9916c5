use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_SEED: u64 = 42;

/// Seeded random source shared by every randomised decision in a scene.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in `[min, max]`; the bounds may come in either order.
    pub fn int_between(&mut self, min: i32, max: i32) -> i32 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        self.rng.gen_range(low..=high)
    }

    /// Uniform float in `[min, max]`.
    pub fn float_between(&mut self, min: f32, max: f32) -> f32 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        if low == high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    pub fn angle(&mut self) -> f32 {
        self.rng.gen_range(0.0..TAU)
    }
}
