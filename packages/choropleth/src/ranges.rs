//! Breakpoints to class ranges.

use access_map_choropleth_models::{ClassRange, ClassificationMethod};

use crate::format::format_num;
use crate::jenks::jenks_breaks;
use crate::quantile::quantile_breaks;

/// Breakpoints for `values` using `method`.
#[must_use]
pub fn compute_breaks(method: ClassificationMethod, values: &[f64], classes: usize) -> Vec<f64> {
    match method {
        ClassificationMethod::NaturalBreaks => jenks_breaks(values, classes),
        ClassificationMethod::Quantile => quantile_breaks(values, classes),
    }
}

/// Natural-breaks ranges for `values`: `k` ranges, or none for empty
/// input.
#[must_use]
pub fn build_ranges(values: &[f64], classes: usize) -> Vec<ClassRange> {
    ranges_from_breaks(&jenks_breaks(values, classes))
}

/// Pairs adjacent breakpoints into ranges.
#[must_use]
pub fn ranges_from_breaks(breaks: &[f64]) -> Vec<ClassRange> {
    breaks
        .windows(2)
        .map(|pair| ClassRange {
            lower: pair[0],
            upper: pair[1],
        })
        .collect()
}

/// Bracketed interval text for range `index`: `[lower, upper]` for the
/// first range, `(lower, upper]` for the rest.
#[must_use]
pub fn interval_label(range: &ClassRange, index: usize) -> String {
    let lower = format_num(range.lower);
    let upper = format_num(range.upper);
    if index == 0 {
        format!("[{lower}, {upper}]")
    } else {
        format!("({lower}, {upper}]")
    }
}
