// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Injectable random source.
//!
//! Every engine owns one source, used for subscription ids and for uniform
//! shard selection. Seeding it makes both replayable under test.

use parking_lot::Mutex;

/// Source of randomness owned by an engine instance.
pub trait RandomSource: Send + Sync {
    /// Next raw 64-bit value.
    fn next_u64(&self) -> u64;

    /// Uniform index in `0..n`. `n` is never zero when called by the engine.
    fn below(&self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Non-negative 63-bit value, used for subscription ids.
    fn next_id(&self) -> u64 {
        self.next_u64() >> 1
    }
}

/// Default source backed by `fastrand`.
///
/// The generator sits behind a mutex because publishes draw from it while
/// holding only the shared side of the trie lock.
#[derive(Debug)]
pub struct FastRandom {
    rng: Mutex<fastrand::Rng>,
}

impl FastRandom {
    /// Source seeded from the process-wide generator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Deterministic source.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }
}

impl Default for FastRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for FastRandom {
    fn next_u64(&self) -> u64 {
        self.rng.lock().u64(..)
    }

    fn below(&self, n: usize) -> usize {
        self.rng.lock().usize(..n)
    }
}
