//! Deterministic splittable pseudo-random number generator.
//!
//! SplitMix64 with the golden-ratio increment. Every engine entry point
//! threads an explicit `Prng` handle, so a fixed seed reproduces the exact
//! sequence of versions and chain starts of a previous run. `split` derives
//! an independent child stream for a subordinate component.

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Finalizer of the SplitMix64 step, usable on its own as a 64-bit mixing
/// hash. `mix64(0) != 0`, and all 64 output bits depend on all input bits.
#[inline]
pub fn mix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
    /// The seed this generator was created with, kept for reporting.
    pub seed: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        Prng { state: seed, seed }
    }

    /// Seed from the operating system entropy pool.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Derive an independent child generator.
    pub fn split(&mut self) -> Prng {
        Prng::new(self.next_u64())
    }
}
