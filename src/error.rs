//! Error types for the mser-steady-state library.
//!
//! The estimator itself never fails: insufficient or invalid input is encoded
//! in [`MserResult::reason`](crate::core::MserResult). These errors cover the
//! fallible helpers around it, chiefly configuration validation.

use thiserror::Error;

use crate::core::Reason;

/// Result type alias for fallible operations.
pub type Result<T> = std::result::Result<T, MserError>;

/// Errors produced by configuration validation and input checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MserError {
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// A sample is NaN or infinite.
    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    /// An estimator pass finished without a usable truncation point.
    #[error("estimator did not converge: {0}")]
    NotConverged(Reason),
}
