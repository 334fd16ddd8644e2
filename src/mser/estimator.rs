//! MSER variant entry points and the [`Estimator`] seam used by the detector.

use tracing::trace;

use super::primitives::{all_finite, batch_means};
use super::truncation::find_optimal_truncation_point;
use crate::core::{MserResult, MserVariant, Reason, SteadyStateConfig};

/// Minimum raw samples for MSER-1.
pub const MIN_SAMPLES_MSER1: usize = 10;

/// Minimum number of batch means for MSER-m.
pub const MIN_BATCHES: usize = 10;

/// Batch size of the MSER-5 variant.
pub const MSER5_BATCH_SIZE: usize = 5;

/// MSER-1: apply the truncation rule to the raw samples.
///
/// Requires at least 10 finite samples; otherwise the result carries
/// [`Reason::InsufficientData`].
///
/// # Example
/// ```
/// use mser_steady_state::mser::calculate_mser1;
/// use mser_steady_state::core::Reason;
///
/// let result = calculate_mser1(&[7.0; 100]);
/// assert!(result.converged);
/// assert_eq!(result.truncation_point, 0);
/// assert_eq!(result.mser_value, 0.0);
///
/// let result = calculate_mser1(&[1.0, 2.0, 3.0]);
/// assert_eq!(result.reason, Reason::InsufficientData);
/// ```
pub fn calculate_mser1(data: &[f64]) -> MserResult {
    let n = data.len();
    if n < MIN_SAMPLES_MSER1 || !all_finite(data) {
        return MserResult::failure(MserVariant::Mser1, 1, n, Reason::InsufficientData);
    }

    MserResult::from_search(
        MserVariant::Mser1,
        1,
        n,
        0,
        find_optimal_truncation_point(data),
    )
}

/// MSER-5: MSER-m with a batch size of 5.
pub fn calculate_mser5(data: &[f64]) -> MserResult {
    calculate_mser_m(data, MSER5_BATCH_SIZE)
}

/// MSER-m: apply the truncation rule to the means of batches of `batch_size`.
///
/// The truncation point is reported in batch-index units. A batch size of 5
/// is tagged [`MserVariant::Mser5`].
pub fn calculate_mser_m(data: &[f64], batch_size: usize) -> MserResult {
    let n = data.len();
    let variant = if batch_size == MSER5_BATCH_SIZE {
        MserVariant::Mser5
    } else {
        MserVariant::MserM
    };

    if n / 2 < batch_size {
        return MserResult::failure(variant, batch_size, n, Reason::InsufficientBatchData);
    }
    if !all_finite(data) {
        return MserResult::failure(variant, batch_size, n, Reason::InsufficientData);
    }

    let means = batch_means(data, batch_size);
    let batch_count = means.len();
    if batch_count < MIN_BATCHES {
        trace!(batch_size, batch_count, "too few batches for MSER-m");
        return MserResult {
            batch_count,
            ..MserResult::failure(variant, batch_size, n, Reason::InsufficientBatches)
        };
    }

    MserResult::from_search(
        variant,
        batch_size,
        n,
        batch_count,
        find_optimal_truncation_point(&means),
    )
}

/// Run the variant selected by `config`.
pub fn calculate(data: &[f64], config: &SteadyStateConfig) -> MserResult {
    match config.variant {
        MserVariant::Mser1 => calculate_mser1(data),
        MserVariant::Mser5 => calculate_mser5(data),
        MserVariant::MserM => calculate_mser_m(data, config.batch_size),
    }
}

/// Something that turns a series into an [`MserResult`].
///
/// The detector calls this on every due check. Implementations must be
/// total: every input yields a well-formed result.
pub trait Estimator {
    /// Estimate the truncation point of `data` under `config`.
    fn estimate(&self, data: &[f64], config: &SteadyStateConfig) -> MserResult;

    /// Get the estimator name.
    fn name(&self) -> &'static str;
}

/// The MSER estimator. Stateless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mser;

impl Mser {
    /// Create a new estimator.
    pub fn new() -> Self {
        Self
    }
}

impl Estimator for Mser {
    fn estimate(&self, data: &[f64], config: &SteadyStateConfig) -> MserResult {
        calculate(data, config)
    }

    fn name(&self) -> &'static str {
        "MSER"
    }
}
