//! Deterministic random number generation with per-concern streams.
//!
//! Every source of randomness in a game (deck shuffles, chip amounts,
//! each player's discard choice) draws from its own stream derived from
//! the game seed. Because the turn gate totally orders the act phase of a
//! round, a fixed seed reproduces a game exactly even though players run
//! on separate threads.
//!
//! ```
//! use greasy_card::core::GameRng;
//!
//! let root = GameRng::new(42);
//! let mut deck = root.for_context("deck");
//! let mut chips = root.for_context("chips");
//!
//! // Independent streams
//! let a: Vec<u32> = (0..8).map(|_| deck.gen_range(0..1000)).collect();
//! let b: Vec<u32> = (0..8).map(|_| chips.gen_range(0..1000)).collect();
//! assert_ne!(a, b);
//! ```

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Deterministic RNG built on ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork an independent child stream.
    ///
    /// Successive forks differ from each other, but the n-th fork of a
    /// given seed is always the same stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Derive a named stream from this RNG's seed.
    ///
    /// The same context name always yields the same stream.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Sample uniformly from a range (half-open or inclusive).
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place (Fisher-Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}
