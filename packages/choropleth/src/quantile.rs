//! Equal-count (quantile) classification.

use crate::jenks::{distinct_count, sorted_finite};

/// Computes `k + 1` quantile breakpoints for `values`.
///
/// Internal thresholds sit at positions `i·(n−1)/k` of the sorted data,
/// linearly interpolated between neighbours. Empty input, clamping and
/// the single-class case behave exactly like
/// [`jenks_breaks`](crate::jenks::jenks_breaks).
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn quantile_breaks(values: &[f64], classes: usize) -> Vec<f64> {
    let data = sorted_finite(values);
    let (Some(&min), Some(&max)) = (data.first(), data.last()) else {
        return Vec::new();
    };

    let k = classes.min(distinct_count(&data));
    if k <= 1 {
        return vec![min, max];
    }

    let last_index = (data.len() - 1) as f64;
    let mut breaks = Vec::with_capacity(k + 1);
    breaks.push(min);

    for i in 1..k {
        let position = (i as f64) * last_index / (k as f64);
        let base = position.floor() as usize;
        let rest = position - position.floor();
        let value = if rest > 0.0 {
            (data[base + 1] - data[base]).mul_add(rest, data[base])
        } else {
            data[base]
        };
        breaks.push(value);
    }

    breaks.push(max);
    breaks
}
