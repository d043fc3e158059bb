//! Injectable randomness for status rolls, pattern spawns, and enemy selection.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }

    /// Uniform integer in `lo..=hi`.
    fn between(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        let span = f64::from(hi - lo + 1);
        let offset = (self.next_unit() * span).floor() as i32;
        lo + offset.min(hi - lo)
    }
}

pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl RandomSource for SeededRng {
    fn next_unit(&mut self) -> f64 {
        // 53 high bits map exactly onto the f64 mantissa.
        (self.inner.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Replays a fixed sequence of unit samples, then `fallback` forever.
pub struct ScriptedRolls {
    rolls: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRolls {
    pub fn new(rolls: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self { rolls: rolls.into_iter().collect(), fallback }
    }

    /// Every roll fails any chance check below 1.
    pub fn never() -> Self {
        Self::new([], 0.999_999)
    }

    /// Every roll passes any chance check above 0.
    pub fn always() -> Self {
        Self::new([], 0.0)
    }
}

impl RandomSource for ScriptedRolls {
    fn next_unit(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(self.fallback)
    }
}

/// Splits one encounter seed into independent stream seeds.
pub fn derive_seed(seed: u64, stream: u64) -> u64 {
    let mut value = seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
