//! The MSER statistic and the optimal truncation search (White, 1997).

use super::primitives::{mean, sum_squared_deviations};

/// MSER statistic for truncating the first `k` samples.
///
/// g_n(k) = (1 / (n - k)^2) * sum_{j=k}^{n-1} (Y_j - mean(Y_k..Y_{n-1}))^2
///
/// Returns +inf when fewer than two samples remain after truncation.
pub fn mser_statistic(data: &[f64], k: usize) -> f64 {
    let n = data.len();
    if k >= n || n - k < 2 {
        return f64::INFINITY;
    }

    let retained = (n - k) as f64;
    // Two-pass: suffix mean, then squared deviations from it.
    let suffix_mean = mean(data, k, n);
    sum_squared_deviations(&data[k..], suffix_mean) / (retained * retained)
}

/// Largest exclusive bound of the truncation search, ⌊n/2⌋.
pub(crate) fn search_bound(n: usize) -> usize {
    n / 2
}

/// g_n(k) for every candidate k in `[0, ⌊n/2⌋)`.
///
/// Empty when the series is too short for a search.
pub fn mser_curve(data: &[f64]) -> Vec<f64> {
    let max_k = search_bound(data.len());
    if max_k < 2 {
        return Vec::new();
    }
    (0..max_k).map(|k| mser_statistic(data, k)).collect()
}

/// Find the truncation point minimizing g_n(k) over `k in [0, ⌊n/2⌋)`.
///
/// Returns `(k, g_n(k))`. Ties resolve to the smallest `k`. When
/// `⌊n/2⌋ < 2` the series is too short and `(0, +inf)` is returned.
///
/// # Example
/// ```
/// use mser_steady_state::mser::find_optimal_truncation_point;
///
/// let mut series: Vec<f64> = (0..10).map(|i| 10.0 - i as f64).collect();
/// series.extend(vec![0.0; 30]);
///
/// let (k, value) = find_optimal_truncation_point(&series);
/// assert_eq!(k, 10);
/// assert_eq!(value, 0.0);
/// ```
pub fn find_optimal_truncation_point(data: &[f64]) -> (usize, f64) {
    let max_k = search_bound(data.len());
    if max_k < 2 {
        return (0, f64::INFINITY);
    }

    let mut best_k = 0;
    let mut best_value = f64::INFINITY;

    for k in 0..max_k {
        let value = mser_statistic(data, k);
        if value < best_value {
            best_value = value;
            best_k = k;
        }
    }

    (best_k, best_value)
}
