//! Random sources for the simulation.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform integer draws.
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[0, upper)`. Returns 0 when `upper` is 0.
    fn below(&self, upper: u64) -> u64;
}

/// A `StdRng` seeded once at construction.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Seed from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic generator for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn below(&self, upper: u64) -> u64 {
        if upper == 0 {
            return 0;
        }
        lock(&self.rng).gen_range(0..upper)
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
///
/// A scripted value at or above the requested bound wraps modulo the bound,
/// so a single value such as `[500]` yields the same roll on every request.
pub struct ScriptedRandom {
    script: Mutex<VecDeque<u64>>,
}

impl ScriptedRandom {
    pub fn new(draws: impl IntoIterator<Item = u64>) -> Self {
        Self {
            script: Mutex::new(draws.into_iter().collect()),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn below(&self, upper: u64) -> u64 {
        if upper == 0 {
            return 0;
        }
        let mut script = lock(&self.script);
        match script.pop_front() {
            Some(draw) => {
                script.push_back(draw);
                draw % upper
            }
            None => 0,
        }
    }
}

// Draws never panic while holding the lock, so a poisoned guard is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
