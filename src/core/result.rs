//! MSER result structure and the tags it carries.

use std::fmt;

use crate::error::{MserError, Result};

/// Which MSER variant produced (or should produce) a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MserVariant {
    /// MSER applied to the raw samples.
    Mser1,
    /// MSER-m with batch size 5.
    #[default]
    Mser5,
    /// MSER-m with an arbitrary batch size.
    MserM,
}

impl fmt::Display for MserVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MserVariant::Mser1 => write!(f, "MSER-1"),
            MserVariant::Mser5 => write!(f, "MSER-5"),
            MserVariant::MserM => write!(f, "MSER-m"),
        }
    }
}

/// Why a result looks the way it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Reason {
    /// A finite minimum was found.
    Ok,
    /// The search completed but every candidate statistic was infinite.
    NoFiniteMinimum,
    /// Raw series too short, or contains non-finite values.
    InsufficientData,
    /// Raw series shorter than twice the batch size.
    InsufficientBatchData,
    /// Fewer than 10 batches after reduction.
    InsufficientBatches,
    /// The detector hit `max_samples` without converging.
    MaxSamplesExhausted,
    /// No estimator pass has run yet.
    #[default]
    NotChecked,
}

impl Reason {
    /// Kebab-case tag for this reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Ok => "ok",
            Reason::NoFiniteMinimum => "no-finite-minimum",
            Reason::InsufficientData => "insufficient-data",
            Reason::InsufficientBatchData => "insufficient-batch-data",
            Reason::InsufficientBatches => "insufficient-batches",
            Reason::MaxSamplesExhausted => "max-samples-exhausted",
            Reason::NotChecked => "not-checked",
        }
    }

    /// Check if this reason denotes a successful estimator pass.
    pub fn is_ok(&self) -> bool {
        matches!(self, Reason::Ok)
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one MSER estimator pass.
///
/// `converged` is the estimator's own view (a finite minimum exists). It says
/// nothing about the detector's threshold; see
/// [`SteadyStateDetector`](crate::detection::SteadyStateDetector) for that.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MserResult {
    /// Optimal truncation point d̂(n). In batch-index units for MSER-m.
    pub truncation_point: usize,
    /// Minimized statistic g_n(d̂).
    pub mser_value: f64,
    /// Whether a finite minimum was found
    pub converged: bool,
    /// Reason tag for the outcome
    pub reason: Reason,
    /// Number of raw samples supplied
    pub total_samples: usize,
    /// Number of batch means (0 for MSER-1)
    pub batch_count: usize,
    /// Raw samples per batch (1 for MSER-1)
    pub batch_size: usize,
    /// Variant that produced the result
    pub variant: MserVariant,
}

impl Default for MserResult {
    fn default() -> Self {
        Self {
            truncation_point: 0,
            mser_value: 0.0,
            converged: false,
            reason: Reason::NotChecked,
            total_samples: 0,
            batch_count: 0,
            batch_size: 5,
            variant: MserVariant::Mser5,
        }
    }
}

impl MserResult {
    /// Create a failed result carrying `reason`.
    pub fn failure(
        variant: MserVariant,
        batch_size: usize,
        total_samples: usize,
        reason: Reason,
    ) -> Self {
        Self {
            truncation_point: 0,
            mser_value: 0.0,
            converged: false,
            reason,
            total_samples,
            batch_count: 0,
            batch_size,
            variant,
        }
    }

    /// Create a result from a completed truncation search.
    pub(crate) fn from_search(
        variant: MserVariant,
        batch_size: usize,
        total_samples: usize,
        batch_count: usize,
        (truncation_point, mser_value): (usize, f64),
    ) -> Self {
        let converged = mser_value.is_finite();
        Self {
            truncation_point,
            mser_value,
            converged,
            reason: if converged {
                Reason::Ok
            } else {
                Reason::NoFiniteMinimum
            },
            total_samples,
            batch_count,
            batch_size,
            variant,
        }
    }

    /// Truncation point expressed in raw samples.
    pub fn truncation_point_in_samples(&self) -> usize {
        self.truncation_point * self.batch_size
    }

    /// Convert a non-converged result into an error.
    pub fn into_result(self) -> Result<Self> {
        if self.converged {
            Ok(self)
        } else {
            Err(MserError::NotConverged(self.reason))
        }
    }
}
