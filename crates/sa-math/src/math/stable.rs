//! Numerically stable summation and moment primitives.
//!
//! NaN marks a missing observation. Every function here skips NaN inputs,
//! so a slice of only NaN behaves like an empty slice.

/// Iterator over the non-missing values of a slice.
pub fn present(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| !v.is_nan())
}

/// Number of non-missing values.
pub fn count_present(values: &[f64]) -> usize {
    present(values).count()
}

/// Compensated (Neumaier) sum of the non-missing values.
///
/// Returns 0.0 for empty input, matching the additive identity.
pub fn stable_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for v in present(values) {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}

/// Arithmetic mean of the non-missing values, or `None` when there are none.
pub fn stable_mean(values: &[f64]) -> Option<f64> {
    let n = count_present(values);
    if n == 0 {
        return None;
    }
    Some(stable_sum(values) / n as f64)
}

/// Unbiased sample variance (N-1 denominator).
///
/// Two-pass: the mean is computed first, then the compensated sum of squared
/// deviations. Undefined (`None`) for fewer than two observations.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    let n = count_present(values);
    if n < 2 {
        return None;
    }
    let mean = stable_mean(values)?;
    let squared: Vec<f64> = present(values).map(|v| (v - mean) * (v - mean)).collect();
    let var = stable_sum(&squared) / (n - 1) as f64;
    // Rounding can leave a tiny negative residue for constant inputs.
    Some(var.max(0.0))
}

/// Unbiased sample standard deviation. `None` for fewer than two observations.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}
