//! Jenks natural-breaks classification.
//!
//! Partitions sorted observations into `k` contiguous classes so that the
//! total within-class sum of squared deviations is minimal. Runs the
//! classic O(n²·k) dynamic program, which is fine for the few hundred
//! polygons a demographic layer carries.

/// Computes `k + 1` breakpoints for `values`.
///
/// * Non-finite values are ignored; the rest are sorted internally.
/// * Empty input yields an empty vector.
/// * `classes` is clamped to the number of distinct values; if that
///   leaves one class or fewer the result is `[min, max]`.
///
/// `breaks[0]` is the minimum and `breaks[k]` the maximum. Each internal
/// breakpoint is the largest value of the class below it, so the
/// `[b0, b1], (b1, b2], …` membership rule reproduces the optimal
/// partition exactly.
///
/// When several partitions reach the same minimal variance the one whose
/// last class starts earliest wins, applied recursively from the top
/// class down.
#[must_use]
pub fn jenks_breaks(values: &[f64], classes: usize) -> Vec<f64> {
    let data = sorted_finite(values);
    let (Some(&min), Some(&max)) = (data.first(), data.last()) else {
        return Vec::new();
    };

    let k = classes.min(distinct_count(&data));
    if k <= 1 {
        return vec![min, max];
    }

    let limits = lower_class_limits(&data, k);

    let mut breaks = vec![0.0; k + 1];
    breaks[0] = min;
    breaks[k] = max;

    let mut end = data.len();
    for j in (2..=k).rev() {
        // 1-based start of class `j` within the first `end` values.
        // Always >= 2 on the optimal path.
        let start = limits[end][j].max(2);
        breaks[j - 1] = data[start - 2];
        end = start - 1;
    }

    breaks
}

/// Fills the DP tables and returns, for every prefix length `i` and
/// class count `j`, the 1-based index where the last class begins.
fn lower_class_limits(data: &[f64], k: usize) -> Vec<Vec<usize>> {
    let n = data.len();
    let mut limits = vec![vec![0_usize; k + 1]; n + 1];
    let mut cost = vec![vec![f64::INFINITY; k + 1]; n + 1];

    for i in 1..=n {
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let mut count = 0.0;

        // Grow the tail class leftwards from `i`, one value at a time.
        for start in (1..=i).rev() {
            let value = data[start - 1];
            sum += value;
            sum_sq += value * value;
            count += 1.0;
            let tail = sum_sq - sum * sum / count;

            if start > 1 {
                for j in 2..=k {
                    let candidate = tail + cost[start - 1][j - 1];
                    if cost[i][j] >= candidate {
                        limits[i][j] = start;
                        cost[i][j] = candidate;
                    }
                }
            }
        }

        limits[i][1] = 1;
        cost[i][1] = sum_sq - sum * sum / count;
    }

    limits
}

/// Finite values of `values`, ascending.
pub(crate) fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut data: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    data.sort_by(f64::total_cmp);
    data
}

/// Number of distinct values in a sorted slice.
pub(crate) fn distinct_count(sorted: &[f64]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted.windows(2).filter(|pair| pair[0] != pair[1]).count()
}
