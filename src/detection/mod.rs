//! Online steady-state detection.
//!
//! [`SteadyStateDetector`] consumes samples one at a time and runs the MSER
//! estimator at a fixed cadence once warm-up is over. Its latch settles in
//! one of two ways:
//!
//! - **Converged**: the estimator found a finite minimum no larger than
//!   `convergence_threshold`. `has_converged()` and
//!   `last_result().converged` are both true.
//! - **Exhausted**: more than `max_samples` samples arrived first.
//!   `has_converged()` is true, `last_result().converged` is false and the
//!   reason is [`Reason::MaxSamplesExhausted`](crate::core::Reason).
//!
//! # Example
//!
//! ```
//! use mser_steady_state::core::{Reason, SteadyStateConfig};
//! use mser_steady_state::detection::{DetectorState, SteadyStateDetector};
//!
//! let config = SteadyStateConfig::mser1()
//!     .with_min_samples(10)
//!     .with_warming_steps(20)
//!     .with_check_interval(5)
//!     .with_convergence_threshold(1.0);
//! let mut detector = SteadyStateDetector::new(config);
//!
//! detector.set_convergence_callback(|result| {
//!     assert_eq!(result.reason, Reason::Ok);
//!     println!("truncated at {}", result.truncation_point);
//! });
//!
//! assert!(!detector.add_data_points(vec![0.0; 20]));
//! assert!(detector.add_data_point(0.0));
//! assert_eq!(detector.state(), DetectorState::Converged);
//! ```

mod detector;
pub mod presets;

pub use detector::{ConvergenceCallback, DetectorState, SteadyStateDetector};
pub use presets::{for_generic_simulation, for_physics_simulation};
