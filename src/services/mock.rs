// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Seeded generator for mock data.
//!
//! Every session owns one generator seeded with [`MOCK_SEED`], so the mock
//! values a user sees are the same from run to run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

use crate::models::MetricSeries;

/// Seed for all mock sequences.
pub const MOCK_SEED: u64 = 42;

/// Length of generated mock series.
pub const MOCK_SERIES_LEN: usize = 5;

pub struct MockGenerator {
    rng: StdRng,
}

impl std::fmt::Debug for MockGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockGenerator").finish_non_exhaustive()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::seed_from_u64(MOCK_SEED),
        }
    }

    /// Restart the sequence from the seed.
    pub fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(MOCK_SEED);
    }

    /// `len` integers drawn uniformly from `range` (end exclusive).
    pub fn series(&mut self, range: Range<i64>, len: usize) -> MetricSeries {
        (0..len)
            .map(|_| self.rng.gen_range(range.clone()) as f64)
            .collect::<Vec<_>>()
            .into()
    }

    /// A single integer in `0..upper`.
    pub fn value(&mut self, upper: i64) -> f64 {
        self.rng.gen_range(0..upper.max(1)) as f64
    }

    /// Evenly spaced time axis `0, 1, .., len - 1`. Consumes no randomness.
    pub fn time_axis(len: usize) -> MetricSeries {
        (0..len).map(|t| t as f64).collect::<Vec<_>>().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = MockGenerator::new();
        let mut b = MockGenerator::new();

        assert_eq!(a.series(70..120, 5), b.series(70..120, 5));
        assert_eq!(a.value(10), b.value(10));
    }

    #[test]
    fn test_reset_restarts_sequence() {
        let mut generator = MockGenerator::new();
        let first = generator.series(5..10, MOCK_SERIES_LEN);
        let _ = generator.series(5..10, MOCK_SERIES_LEN);

        generator.reset();
        assert_eq!(generator.series(5..10, MOCK_SERIES_LEN), first);
    }

    #[test]
    fn test_values_stay_in_range() {
        let mut generator = MockGenerator::new();
        let series = generator.series(70..120, 100);
        assert_eq!(series.values().len(), 100);
        assert!(series.values().iter().all(|v| (70.0..120.0).contains(v)));

        for _ in 0..100 {
            let v = generator.value(10);
            assert!((0.0..10.0).contains(&v));
            assert_eq!(v.fract(), 0.0);
        }
    }

    #[test]
    fn test_time_axis() {
        assert_eq!(
            MockGenerator::time_axis(5).values(),
            &[0.0, 1.0, 2.0, 3.0, 4.0]
        );
    }
}
