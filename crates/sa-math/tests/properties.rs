//! Property-based tests for sa-math descriptive statistics.
//!
//! Uses proptest to verify statistical invariants hold across many random samples.

use proptest::prelude::*;
use sa_math::{median, mode, sample_std_dev, stable_mean, stable_sum, Descriptive};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-9;

/// Helper to check approximate equality with a relative component.
fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

fn sample() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1_000.0..1_000.0f64, 1..64)
}

// ============================================================================
// Summation and mean
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Sum does not depend on element order.
    #[test]
    fn sum_is_order_insensitive(values in sample()) {
        let mut reversed = values.clone();
        reversed.reverse();
        prop_assert!(approx_eq(stable_sum(&values), stable_sum(&reversed), TOL));
    }

    /// mean * n == sum.
    #[test]
    fn mean_times_count_is_sum(values in sample()) {
        let mean = stable_mean(&values).unwrap();
        let sum = stable_sum(&values);
        prop_assert!(approx_eq(mean * values.len() as f64, sum, TOL));
    }

    /// The mean lies within [min, max].
    #[test]
    fn mean_is_bounded(values in sample()) {
        let mean = stable_mean(&values).unwrap();
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(mean >= min - TOL && mean <= max + TOL);
    }
}

// ============================================================================
// Median, mode, dispersion
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// At most half of the values lie strictly on either side of the median.
    #[test]
    fn median_splits_sample(values in sample()) {
        let m = median(&values).unwrap();
        let below = values.iter().filter(|v| **v < m).count();
        let above = values.iter().filter(|v| **v > m).count();
        prop_assert!(below * 2 <= values.len());
        prop_assert!(above * 2 <= values.len());
    }

    /// The mode is a member of the sample and no value is strictly more frequent.
    #[test]
    fn mode_is_a_most_frequent_member(raw in prop::collection::vec(0u8..8, 1..40)) {
        let values: Vec<f64> = raw.iter().map(|v| *v as f64 * 0.5).collect();
        let m = mode(&values).unwrap();
        let freq = |x: f64| values.iter().filter(|v| **v == x).count();
        let m_count = freq(m);
        prop_assert!(m_count >= 1);
        for v in &values {
            let c = freq(*v);
            prop_assert!(c <= m_count);
            if c == m_count {
                prop_assert!(*v >= m, "tie should resolve to smallest: {} < {}", v, m);
            }
        }
    }

    /// Standard deviation is non-negative and shift-invariant.
    #[test]
    fn std_dev_shift_invariant(values in prop::collection::vec(-100.0..100.0f64, 2..32), shift in -50.0..50.0f64) {
        let sd = sample_std_dev(&values).unwrap();
        let shifted: Vec<f64> = values.iter().map(|v| v + shift).collect();
        let sd_shifted = sample_std_dev(&shifted).unwrap();
        prop_assert!(sd >= 0.0);
        prop_assert!(approx_eq(sd, sd_shifted, 1e-7), "{} vs {}", sd, sd_shifted);
    }

    /// Descriptive::of agrees with the individual primitives.
    #[test]
    fn describe_matches_primitives(values in sample()) {
        let d = Descriptive::of(&values);
        prop_assert_eq!(d.count, values.len());
        prop_assert_eq!(d.sum, stable_sum(&values));
        prop_assert_eq!(d.mean, stable_mean(&values));
        prop_assert_eq!(d.median, median(&values));
        prop_assert_eq!(d.mode, mode(&values));
        prop_assert_eq!(d.std_dev.is_some(), values.len() >= 2);
    }
}
