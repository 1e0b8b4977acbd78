//! Seedable random stream for simulation runs
//!
//! Wraps `StdRng` behind the handful of draw operations the engine needs.
//! Each run owns its own stream; independent sub-runs (comparison repeats)
//! are seeded through `fork_seed` so their draw sequences never interleave.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Reproducible pseudo-random source for one simulation run
pub struct RandomStream {
    rng: StdRng,
    seed_used: [u8; 32],
}

impl RandomStream {
    /// Create a stream from an optional seed
    ///
    /// Without a seed a process-random one is drawn; it is recorded so the
    /// run can still be reproduced afterwards.
    pub fn new(seed: Option<[u8; 32]>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            let mut seed = [0u8; 32];
            rand::thread_rng().fill(&mut seed);
            seed
        });

        Self {
            rng: StdRng::from_seed(seed),
            seed_used: seed,
        }
    }

    /// The seed this stream was initialized with
    pub fn seed_used(&self) -> [u8; 32] {
        self.seed_used
    }

    /// Uniform draw in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform integer draw in [lo, hi)
    pub fn gen_range(&mut self, lo: u32, hi: u32) -> u32 {
        self.rng.gen_range(lo..hi)
    }

    /// Bernoulli draw with success probability `p`
    ///
    /// Implemented as a uniform draw compared against `p`, so p = 0 never
    /// fires and p = 1 always does.
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Derive an independent child seed for a statistically separate run
    pub fn fork_seed(&mut self) -> [u8; 32] {
        self.rng.gen()
    }
}
