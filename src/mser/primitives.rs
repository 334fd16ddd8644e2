//! Range statistics and batch-means reduction.

use crate::core::{BatchStatistics, Statistics, TimeSeriesData};
use crate::error::{MserError, Result};

/// Arithmetic mean over the half-open range `[start, end)`.
///
/// Returns 0.0 when the range is empty or out of bounds.
pub fn mean(data: &[f64], start: usize, end: usize) -> f64 {
    if start >= end || end > data.len() {
        return 0.0;
    }
    data[start..end].iter().sum::<f64>() / (end - start) as f64
}

/// Sum of squared deviations from `center` over `values`.
pub(crate) fn sum_squared_deviations(values: &[f64], center: f64) -> f64 {
    values
        .iter()
        .map(|&x| {
            let d = x - center;
            d * d
        })
        .sum()
}

/// Mean, sample variance and standard error over `[start, end)`.
///
/// An invalid range yields zeroed statistics. A single sample has zero
/// variance and zero standard error.
///
/// # Example
/// ```
/// use mser_steady_state::mser::statistics;
///
/// let stats = statistics(&[1.0, 2.0, 3.0, 4.0, 5.0], 0, 5);
/// assert_eq!(stats.mean, 3.0);
/// assert_eq!(stats.variance, 2.5);
/// assert_eq!(stats.sample_count, 5);
/// ```
pub fn statistics(data: &[f64], start: usize, end: usize) -> Statistics {
    if start >= end || end > data.len() {
        return Statistics::default();
    }

    let n = end - start;
    let mean = mean(data, start, end);
    let mut stats = Statistics {
        mean,
        sample_count: n,
        ..Default::default()
    };

    if n > 1 {
        stats.variance = sum_squared_deviations(&data[start..end], mean) / (n - 1) as f64;
        stats.standard_error = (stats.variance / n as f64).sqrt();
    }

    stats
}

/// Means of the consecutive full batches of `batch_size` samples.
///
/// A trailing partial batch is dropped; `batch_size == 0` yields an empty
/// series.
pub fn batch_means(data: &[f64], batch_size: usize) -> TimeSeriesData {
    if batch_size == 0 {
        return TimeSeriesData::new();
    }

    data.chunks_exact(batch_size)
        .map(|batch| batch.iter().sum::<f64>() / batch_size as f64)
        .collect()
}

/// Batch means together with the reduction parameters.
pub fn batch_statistics(data: &[f64], batch_size: usize) -> BatchStatistics {
    BatchStatistics {
        batch_means: batch_means(data, batch_size),
        original_sample_count: data.len(),
        batch_size,
    }
}

/// Check that `data` has at least `min_len` samples and that all are finite.
///
/// This is the estimator's input guard exposed as a fallible check.
pub fn validate_series(data: &[f64], min_len: usize) -> Result<()> {
    if data.len() < min_len {
        return Err(MserError::InsufficientData {
            needed: min_len,
            got: data.len(),
        });
    }
    match data.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(MserError::NonFiniteValue { index }),
        None => Ok(()),
    }
}

pub(crate) fn all_finite(data: &[f64]) -> bool {
    data.iter().all(|x| x.is_finite())
}
