//! Ready-made detectors for common simulation drivers.
//!
//! Each preset adjusts the configuration and installs a callback that reports
//! the settling result through `tracing`. Nothing here touches global state;
//! install a subscriber in the application to see the output.

use tracing::{info, warn};

use super::SteadyStateDetector;
use crate::core::{MserResult, MserVariant, Reason, SteadyStateConfig};

/// Minimum sample count enforced for physics simulations.
pub const PHYSICS_MIN_SAMPLES: usize = 200;

/// Detector tuned for rigid-body / particle physics simulations.
///
/// MSER-1 is replaced by MSER-5 and `min_samples` is raised to at least
/// [`PHYSICS_MIN_SAMPLES`].
pub fn for_physics_simulation(config: SteadyStateConfig) -> SteadyStateDetector {
    let config = physics_config(config);
    let mut detector = SteadyStateDetector::new(config);

    detector.set_convergence_callback(|result: &MserResult| {
        if result.reason == Reason::MaxSamplesExhausted {
            warn!(
                total_samples = result.total_samples,
                reason = %result.reason,
                "physics simulation stopped without reaching steady state"
            );
        } else {
            info!(
                truncation_point = result.truncation_point,
                mser_value = result.mser_value,
                total_samples = result.total_samples,
                reason = %result.reason,
                "physics simulation reached steady state"
            );
        }
    });

    detector
}

/// Detector for an arbitrary named metric.
///
/// The configuration is used as given; the callback tags its log events with
/// `metric_name`.
pub fn for_generic_simulation(
    metric_name: impl Into<String>,
    config: SteadyStateConfig,
) -> SteadyStateDetector {
    let metric = metric_name.into();
    let mut detector = SteadyStateDetector::new(config);

    detector.set_convergence_callback(move |result: &MserResult| {
        let batch_count = match result.variant {
            MserVariant::Mser1 => None,
            _ => Some(result.batch_count),
        };

        if result.reason == Reason::MaxSamplesExhausted {
            warn!(
                metric = %metric,
                variant = %result.variant,
                total_samples = result.total_samples,
                reason = %result.reason,
                "metric did not reach steady state"
            );
        } else {
            info!(
                metric = %metric,
                variant = %result.variant,
                truncation_point = result.truncation_point,
                mser_value = result.mser_value,
                total_samples = result.total_samples,
                batch_count = ?batch_count,
                reason = %result.reason,
                "metric reached steady state"
            );
        }
    });

    detector
}

fn physics_config(mut config: SteadyStateConfig) -> SteadyStateConfig {
    if config.variant == MserVariant::Mser1 {
        config.variant = MserVariant::Mser5;
    }
    if config.min_samples < PHYSICS_MIN_SAMPLES {
        config.min_samples = PHYSICS_MIN_SAMPLES;
    }
    config.max_samples = config.max_samples.max(config.min_samples);
    config
}
