//! # mser-steady-state
//!
//! Warm-up detection for stochastic simulation output using the Marginal
//! Standard Error Rule (MSER) of White (1997).
//!
//! Provides the stateless MSER-1 / MSER-5 / MSER-m estimator and a streaming
//! detector that decides online when a simulation has reached steady state,
//! so that runs can be stopped early.

#![allow(clippy::upper_case_acronyms)]

pub mod core;
pub mod detection;
pub mod error;
pub mod mser;

pub use error::{MserError, Result};

pub mod prelude {
    pub use crate::core::{
        BatchStatistics, MserResult, MserVariant, Reason, Statistics, SteadyStateConfig,
        TimeSeriesData, TimeSeriesValue,
    };
    pub use crate::detection::{ConvergenceCallback, DetectorState, SteadyStateDetector};
    pub use crate::error::{MserError, Result};
    pub use crate::mser::{
        batch_statistics, calculate, calculate_mser1, calculate_mser5, calculate_mser_m,
        find_optimal_truncation_point, statistics, Estimator, Mser,
    };
}
