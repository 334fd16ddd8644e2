//! Steady-state detection settings.

use super::MserVariant;
use crate::error::{MserError, Result};

/// Configuration for MSER estimation and streaming steady-state detection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SteadyStateConfig {
    /// MSER variant to run
    pub variant: MserVariant,
    /// Batch size for MSER-m
    pub batch_size: usize,
    /// No check runs below this many samples
    pub min_samples: usize,
    /// Hard stop: the detector gives up past this many samples
    pub max_samples: usize,
    /// Largest MSER value accepted as converged
    pub convergence_threshold: f64,
    /// New samples between periodic checks
    pub check_interval: usize,
    /// Whether the warm-up gate is active
    pub enable_warming: bool,
    /// Warm-up length in samples
    pub warming_steps: usize,
}

impl Default for SteadyStateConfig {
    fn default() -> Self {
        Self {
            variant: MserVariant::Mser5,
            batch_size: 5,
            min_samples: 100,
            max_samples: 10_000,
            convergence_threshold: 0.01,
            check_interval: 50,
            enable_warming: true,
            warming_steps: 50,
        }
    }
}

impl SteadyStateConfig {
    /// Default settings using MSER-1.
    pub fn mser1() -> Self {
        Self {
            variant: MserVariant::Mser1,
            ..Default::default()
        }
    }

    /// Default settings using MSER-5.
    pub fn mser5() -> Self {
        Self::default()
    }

    /// Default settings using MSER-m with the given batch size.
    pub fn mser_m(batch_size: usize) -> Self {
        Self {
            variant: MserVariant::MserM,
            batch_size,
            ..Default::default()
        }
    }

    /// Set the MSER variant.
    pub fn with_variant(mut self, variant: MserVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the MSER-m batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the minimum sample count before any check.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Set the hard sample limit.
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Set the convergence threshold on the MSER value.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    /// Set the number of new samples between checks.
    pub fn with_check_interval(mut self, interval: usize) -> Self {
        self.check_interval = interval;
        self
    }

    /// Enable or disable the warm-up gate.
    pub fn with_warming(mut self, enabled: bool) -> Self {
        self.enable_warming = enabled;
        self
    }

    /// Set the warm-up length.
    pub fn with_warming_steps(mut self, steps: usize) -> Self {
        self.warming_steps = steps;
        self
    }

    /// Raw samples per estimator observation for the configured variant.
    pub fn effective_batch_size(&self) -> usize {
        match self.variant {
            MserVariant::Mser1 => 1,
            MserVariant::Mser5 => 5,
            MserVariant::MserM => self.batch_size,
        }
    }

    /// Check every field against its documented constraint.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(MserError::InvalidParameter(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.min_samples == 0 {
            return Err(MserError::InvalidParameter(
                "min_samples must be at least 1".to_string(),
            ));
        }
        if self.max_samples < self.min_samples {
            return Err(MserError::InvalidParameter(format!(
                "max_samples ({}) must be at least min_samples ({})",
                self.max_samples, self.min_samples
            )));
        }
        if self.convergence_threshold.is_nan() || self.convergence_threshold < 0.0 {
            return Err(MserError::InvalidParameter(format!(
                "convergence_threshold must be non-negative, got {}",
                self.convergence_threshold
            )));
        }
        if self.check_interval == 0 {
            return Err(MserError::InvalidParameter(
                "check_interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
