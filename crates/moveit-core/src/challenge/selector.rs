//! Challenge selection.
//!
//! Picks are uniform over the catalog and independent across calls, so the
//! same challenge may come up twice in a row.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// Chooses the catalog index for the next challenge.
pub trait ChallengeSelector {
    /// Return an index in `0..len`. Callers never pass `len == 0`.
    fn select(&mut self, len: usize) -> usize;
}

/// Uniform random selection backed by a PCG generator.
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: Mcg128Xsl64,
}

impl RandomSelector {
    /// Seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mcg128Xsl64::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ChallengeSelector for RandomSelector {
    fn select(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed list of indices, cycling when exhausted.
///
/// Out-of-range indices are clamped to the last catalog entry.
#[derive(Debug, Clone, Default)]
pub struct FixedSelector {
    indices: Vec<usize>,
    cursor: usize,
}

impl FixedSelector {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, cursor: 0 }
    }

    /// Number of picks made so far.
    pub fn picks(&self) -> usize {
        self.cursor
    }
}

impl ChallengeSelector for FixedSelector {
    fn select(&mut self, len: usize) -> usize {
        if len == 0 || self.indices.is_empty() {
            self.cursor += 1;
            return 0;
        }
        let index = self.indices[self.cursor % self.indices.len()].min(len - 1);
        self.cursor += 1;
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_selector_stays_in_range() {
        let mut selector = RandomSelector::with_seed(7);
        for _ in 0..500 {
            assert!(selector.select(12) < 12);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RandomSelector::with_seed(42);
        let mut b = RandomSelector::with_seed(42);
        let xs: Vec<usize> = (0..20).map(|_| a.select(12)).collect();
        let ys: Vec<usize> = (0..20).map(|_| b.select(12)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn random_selector_reaches_every_index() {
        let mut selector = RandomSelector::with_seed(3);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[selector.select(4)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn fixed_selector_cycles_and_clamps() {
        let mut selector = FixedSelector::new(vec![1, 15]);
        assert_eq!(selector.select(12), 1);
        assert_eq!(selector.select(12), 11);
        assert_eq!(selector.select(12), 1);
        assert_eq!(selector.picks(), 3);
    }

    #[test]
    fn empty_fixed_selector_picks_first() {
        let mut selector = FixedSelector::default();
        assert_eq!(selector.select(5), 0);
    }
}
