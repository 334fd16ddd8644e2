//! Marginal Standard Error Rule (White, 1997).
//!
//! Stateless estimation of the end of the warm-up transient in a scalar
//! series.
//!
//! # Variants
//!
//! - **MSER-1**: truncation rule on the raw samples, O(n²)
//! - **MSER-5**: MSER-m with batch size 5 (the usual choice)
//! - **MSER-m**: truncation rule on batch means, O((n/m)²)
//!
//! For a series Y of length n the statistic is
//! g_n(k) = Σ_{j≥k} (Y_j − Ȳ_{n,k})² / (n − k)², and the truncation point
//! is its argmin over k in [0, ⌊n/2⌋).
//!
//! # Example
//!
//! ```
//! use mser_steady_state::mser::{calculate, calculate_mser5};
//! use mser_steady_state::core::SteadyStateConfig;
//!
//! // Warm-up bias decaying into a constant level
//! let mut series: Vec<f64> = (0..50).map(|i| 5.0 - 0.1 * i as f64).collect();
//! series.extend(vec![0.0; 150]);
//!
//! let result = calculate_mser5(&series);
//! assert!(result.converged);
//! assert_eq!(result.batch_count, 40);
//! assert_eq!(result.truncation_point_in_samples(), 50);
//!
//! let config = SteadyStateConfig::mser1();
//! let result = calculate(&series, &config);
//! assert_eq!(result.truncation_point, 50);
//! ```

mod estimator;
mod primitives;
mod truncation;

pub use estimator::{
    calculate, calculate_mser1, calculate_mser5, calculate_mser_m, Estimator, Mser,
    MIN_BATCHES, MIN_SAMPLES_MSER1, MSER5_BATCH_SIZE,
};
pub use primitives::{batch_means, batch_statistics, mean, statistics, validate_series};
pub use truncation::{find_optimal_truncation_point, mser_curve, mser_statistic};
