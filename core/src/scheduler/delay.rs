//! Delay sampling
//!
//! Ranged delays are drawn once, at schedule time, from a pluggable
//! [`RandomSource`]. Seeding the source makes whole encounters replayable.

use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use skirmish_types::DelayRange;

/// Uniform random source consulted by the scheduler and by scripts.
pub trait RandomSource: fmt::Debug {
    /// Draw a delay uniformly from the closed interval `[range.min(), range.max()]`.
    fn sample_delay(&mut self, range: DelayRange) -> Duration;

    /// Returns true with probability `1 / n`. `n <= 1` always succeeds.
    fn one_in(&mut self, n: u32) -> bool;
}

/// `StdRng`-backed source. Deterministic when built from a seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when a seed is configured, OS entropy otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os, Self::new)
    }
}

impl RandomSource for SeededRandom {
    fn sample_delay(&mut self, range: DelayRange) -> Duration {
        let min = range.min().as_millis() as u64;
        let max = range.max().as_millis() as u64;
        if min >= max {
            return Duration::from_millis(min.min(max));
        }
        Duration::from_millis(self.rng.random_range(min..=max))
    }

    fn one_in(&mut self, n: u32) -> bool {
        n <= 1 || self.rng.random_range(0..n) == 0
    }
}

/// Always picks the lower bound; every roll succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Earliest;

impl RandomSource for Earliest {
    fn sample_delay(&mut self, range: DelayRange) -> Duration {
        range.min().min(range.max())
    }

    fn one_in(&mut self, _n: u32) -> bool {
        true
    }
}

/// Always picks the upper bound; every roll with `n > 1` fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Latest;

impl RandomSource for Latest {
    fn sample_delay(&mut self, range: DelayRange) -> Duration {
        range.max().max(range.min())
    }

    fn one_in(&mut self, n: u32) -> bool {
        n <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_samples_stay_in_range() {
        let mut random = SeededRandom::new(42);
        let range = DelayRange::secs_between(8, 14);
        for _ in 0..500 {
            let d = random.sample_delay(range);
            assert!(d >= Duration::from_secs(8) && d <= Duration::from_secs(14));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let range = DelayRange::secs_between(6, 12);
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        let xs: Vec<_> = (0..20).map(|_| a.sample_delay(range)).collect();
        let ys: Vec<_> = (0..20).map(|_| b.sample_delay(range)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_fixed_delay_ignores_rng() {
        let mut random = SeededRandom::new(1);
        assert_eq!(random.sample_delay(DelayRange::secs(30)), Duration::from_secs(30));
        assert_eq!(Earliest.sample_delay(DelayRange::secs(30)), Duration::from_secs(30));
    }

    #[test]
    fn test_bound_pickers() {
        let range = DelayRange::secs_between(8, 14);
        assert_eq!(Earliest.sample_delay(range), Duration::from_secs(8));
        assert_eq!(Latest.sample_delay(range), Duration::from_secs(14));
        assert!(Earliest.one_in(5));
        assert!(!Latest.one_in(5));
        assert!(Latest.one_in(1));
    }
}
