//! Deterministic statistical mode.

use std::collections::HashMap;

/// Bit pattern used as a frequency key. Folds -0.0 onto 0.0 so both count
/// as the same observation.
fn frequency_key(v: f64) -> u64 {
    if v == 0.0 {
        0.0_f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// Frequency table of the non-missing values, keyed by exact value.
///
/// Returned pairs are ordered by value ascending.
pub fn frequencies(values: &[f64]) -> Vec<(f64, usize)> {
    let mut counts: HashMap<u64, (f64, usize)> = HashMap::new();
    for v in values.iter().copied().filter(|v| !v.is_nan()) {
        let entry = counts.entry(frequency_key(v)).or_insert((v, 0));
        entry.1 += 1;
    }
    let mut table: Vec<(f64, usize)> = counts.into_values().collect();
    table.sort_by(|a, b| a.0.total_cmp(&b.0));
    table
}

/// Most frequent value. When several values share the highest frequency the
/// smallest of them wins. `None` when there is no non-missing value.
pub fn mode(values: &[f64]) -> Option<f64> {
    let table = frequencies(values);
    let max_count = table.iter().map(|(_, c)| *c).max()?;
    // `table` is sorted ascending, so the first maximum is the smallest value.
    table
        .into_iter()
        .find(|(_, c)| *c == max_count)
        .map(|(v, _)| v)
}
