//! Deterministic pseudo-random sequence for enchantment offers.
//!
//! Offer generation must reproduce the same three options for the same
//! `(player, item, table)` inputs, so it runs on an explicit
//! linear-congruential generator whose state is threaded through calls
//! rather than hidden in a shared closure.

use serde::{Deserialize, Serialize};

/// Modulus of the offer LCG.
pub const LCG_MODULUS: u64 = 233_280;

/// Small linear-congruential generator (`state = state*9301 + 49297 mod 233280`).
///
/// The period is short, which is fine for its single job: picking
/// enchantment offers. Anything that needs real entropy uses `rand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Create a generator from an arbitrary seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % LCG_MODULUS,
        }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * 9301 + 49297) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }

    /// Next value in `[lo, hi)`.
    pub fn next_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Uniform index into a slice of length `len` (`len` must be non-zero).
    pub fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len - 1)
    }

    /// Raw generator state, exposed for cache keying.
    pub fn state(&self) -> u64 {
        self.state
    }
}
