//! Streaming steady-state detector.
//!
//! Buffers samples as a simulation produces them, runs the estimator every
//! `check_interval` samples once the warm-up and minimum-sample gates are
//! closed, and latches when the steady state is reached or the sample budget
//! runs out.

use std::fmt;

use tracing::{debug, info, trace, warn};

use crate::core::{MserResult, Reason, Statistics, SteadyStateConfig, TimeSeriesData};
use crate::error::Result;
use crate::mser::{statistics, Estimator, Mser};

/// Consumer of the result that settled the detector.
///
/// Runs synchronously on the caller's thread, inside the call that set the
/// latch. Must not re-enter the detector.
pub type ConvergenceCallback = Box<dyn FnMut(&MserResult)>;

/// Observable state of a [`SteadyStateDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Accepting samples, not yet settled.
    Collecting,
    /// Latched after the convergence predicate held.
    Converged,
    /// Latched after exceeding `max_samples` without converging.
    Exhausted,
}

impl DetectorState {
    /// Check if the state ignores further samples.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DetectorState::Collecting)
    }
}

/// Online MSER steady-state detector.
///
/// Not internally synchronized; callers feeding samples from several threads
/// must serialize access themselves.
///
/// # Example
///
/// ```
/// use mser_steady_state::core::SteadyStateConfig;
/// use mser_steady_state::detection::SteadyStateDetector;
///
/// let config = SteadyStateConfig::mser5()
///     .with_min_samples(100)
///     .with_check_interval(25)
///     .with_convergence_threshold(0.01);
/// let mut detector = SteadyStateDetector::try_new(config).unwrap();
///
/// // Initial bias decaying geometrically towards 1.0
/// let mut settled = false;
/// for step in 0..1000 {
///     let value = 1.0 + 4.0 * 0.9_f64.powi(step);
///     if detector.add_data_point(value) {
///         settled = true;
///         break;
///     }
/// }
///
/// assert!(settled);
/// assert!(detector.last_result().converged);
/// ```
pub struct SteadyStateDetector<E: Estimator = Mser> {
    config: SteadyStateConfig,
    data: TimeSeriesData,
    last_result: MserResult,
    converged: bool,
    exhausted: bool,
    last_check_index: usize,
    estimator: E,
    callback: Option<ConvergenceCallback>,
}

impl SteadyStateDetector<Mser> {
    /// Create a detector without validating `config`.
    pub fn new(config: SteadyStateConfig) -> Self {
        Self::with_estimator(config, Mser)
    }

    /// Create a detector after validating `config`.
    pub fn try_new(config: SteadyStateConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }
}

impl Default for SteadyStateDetector<Mser> {
    fn default() -> Self {
        Self::new(SteadyStateConfig::default())
    }
}

impl<E: Estimator> SteadyStateDetector<E> {
    /// Create a detector that runs `estimator` on each check.
    pub fn with_estimator(config: SteadyStateConfig, estimator: E) -> Self {
        let mut data = TimeSeriesData::new();
        reserve_up_to(&mut data, config.max_samples);
        Self {
            config,
            data,
            last_result: MserResult::default(),
            converged: false,
            exhausted: false,
            last_check_index: 0,
            estimator,
            callback: None,
        }
    }

    /// Append one sample.
    ///
    /// Returns true if the detector has converged, either on this sample or
    /// earlier. Returns false on the sample that exhausts `max_samples`,
    /// even though the detector is settled from then on.
    pub fn add_data_point(&mut self, value: f64) -> bool {
        if self.converged {
            return true;
        }

        self.data.push(value);

        if self.data.len() > self.config.max_samples {
            self.converged = true;
            self.exhausted = true;
            self.last_result.converged = false;
            self.last_result.reason = Reason::MaxSamplesExhausted;
            self.last_result.total_samples = self.data.len();
            warn!(
                samples = self.data.len(),
                max_samples = self.config.max_samples,
                "sample budget exhausted before steady state"
            );
            self.trigger_callback();
            return false;
        }

        if self.should_perform_check() {
            return self.check_convergence();
        }

        false
    }

    /// Append samples in order, stopping at the first one that settles the
    /// detector.
    pub fn add_data_points<I>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = f64>,
    {
        for value in values {
            if self.add_data_point(value) {
                return true;
            }
        }
        false
    }

    /// Run the estimator now, unless a gate is open.
    ///
    /// Returns the latch.
    pub fn check_convergence(&mut self) -> bool {
        if self.converged {
            return true;
        }

        if self.is_in_warming_period() {
            trace!(samples = self.data.len(), gate = "warm-up", "check skipped");
            return false;
        }

        if self.data.len() < self.config.min_samples {
            trace!(samples = self.data.len(), gate = "min-samples", "check skipped");
            return false;
        }

        self.last_result = self.estimator.estimate(&self.data, &self.config);
        self.last_check_index = self.data.len();

        debug!(
            estimator = self.estimator.name(),
            variant = %self.last_result.variant,
            samples = self.data.len(),
            truncation_point = self.last_result.truncation_point,
            mser_value = self.last_result.mser_value,
            reason = %self.last_result.reason,
            "estimator pass"
        );

        if self.evaluate_convergence(&self.last_result) {
            self.converged = true;
            info!(
                samples = self.data.len(),
                truncation_point = self.last_result.truncation_point,
                mser_value = self.last_result.mser_value,
                threshold = self.config.convergence_threshold,
                "steady state reached"
            );
            self.trigger_callback();
        }

        self.converged
    }

    /// Drop all samples and results. Keeps the configuration and callback.
    pub fn reset(&mut self) {
        self.data.clear();
        self.last_result = MserResult::default();
        self.converged = false;
        self.exhausted = false;
        self.last_check_index = 0;
    }

    /// Replace the configuration. Buffered samples are kept.
    pub fn update_config(&mut self, config: SteadyStateConfig) {
        self.config = config;
        reserve_up_to(&mut self.data, self.config.max_samples);
    }

    /// Replace the configuration after validating it.
    pub fn try_update_config(&mut self, config: SteadyStateConfig) -> Result<()> {
        config.validate()?;
        self.update_config(config);
        Ok(())
    }

    /// Install a callback, replacing any previous one.
    pub fn set_convergence_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&MserResult) + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    /// Remove the installed callback.
    pub fn clear_convergence_callback(&mut self) {
        self.callback = None;
    }

    /// Check if a callback is installed.
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Number of buffered samples.
    pub fn sample_count(&self) -> usize {
        self.data.len()
    }

    /// Result of the latest estimator pass, or of exhaustion.
    pub fn last_result(&self) -> &MserResult {
        &self.last_result
    }

    /// Check if the latch is set, by convergence or by exhaustion.
    pub fn has_converged(&self) -> bool {
        self.converged
    }

    /// Check if the latch was set by exhausting `max_samples`.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Current state of the latch.
    pub fn state(&self) -> DetectorState {
        match (self.converged, self.exhausted) {
            (false, _) => DetectorState::Collecting,
            (true, false) => DetectorState::Converged,
            (true, true) => DetectorState::Exhausted,
        }
    }

    /// Statistics over the whole buffer (zeroed when empty).
    pub fn current_statistics(&self) -> Statistics {
        if self.data.is_empty() {
            return Statistics::default();
        }
        statistics(&self.data, 0, self.data.len())
    }

    /// Copy of the buffered samples.
    pub fn accumulated_data(&self) -> TimeSeriesData {
        self.data.clone()
    }

    /// Mean of the buffer (0.0 when empty).
    pub fn current_mean(&self) -> f64 {
        self.current_statistics().mean
    }

    /// Active configuration.
    pub fn config(&self) -> &SteadyStateConfig {
        &self.config
    }

    /// Estimator run on each check.
    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Buffer size at the latest estimator pass.
    pub fn last_check_index(&self) -> usize {
        self.last_check_index
    }

    /// Samples left before `max_samples` is exceeded.
    pub fn remaining_capacity(&self) -> usize {
        self.config.max_samples.saturating_sub(self.data.len())
    }

    /// Check if the warm-up gate is open for an explicit
    /// [`check_convergence`](Self::check_convergence).
    ///
    /// This turns false once `warming_steps` samples are buffered, one append
    /// before ingestion starts scheduling checks; use
    /// [`should_perform_check`](Self::should_perform_check) to predict the
    /// cadence.
    pub fn is_in_warming_period(&self) -> bool {
        self.config.enable_warming && self.data.len() < self.config.warming_steps
    }

    /// Check if the sample just appended should trigger an estimator pass.
    ///
    /// The append that completes warm-up still counts as a warm-up step, so
    /// the first periodic check comes on a later append.
    pub fn should_perform_check(&self) -> bool {
        let n = self.data.len();

        if self.config.enable_warming && n <= self.config.warming_steps {
            return false;
        }

        if n < self.config.min_samples {
            return false;
        }

        n - self.last_check_index >= self.config.check_interval
    }

    fn evaluate_convergence(&self, result: &MserResult) -> bool {
        result.converged && result.mser_value <= self.config.convergence_threshold
    }

    fn trigger_callback(&mut self) {
        if let Some(callback) = self.callback.as_mut() {
            callback(&self.last_result);
        }
    }
}

impl<E: Estimator> fmt::Debug for SteadyStateDetector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SteadyStateDetector")
            .field("config", &self.config)
            .field("samples", &self.data.len())
            .field("last_result", &self.last_result)
            .field("state", &self.state())
            .field("last_check_index", &self.last_check_index)
            .field("estimator", &self.estimator.name())
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// Best-effort reservation so the buffer can hold `max_samples` without
/// reallocating. Unsatisfiable bounds are ignored.
fn reserve_up_to(data: &mut TimeSeriesData, max_samples: usize) {
    if data.capacity() < max_samples {
        let _ = data.try_reserve_exact(max_samples - data.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MserVariant;
    use approx::assert_relative_eq;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Records every estimator call and delegates to MSER.
    #[derive(Default)]
    struct SpyEstimator {
        calls: Cell<usize>,
        sizes: RefCell<Vec<usize>>,
    }

    impl Estimator for SpyEstimator {
        fn estimate(&self, data: &[f64], config: &SteadyStateConfig) -> MserResult {
            self.calls.set(self.calls.get() + 1);
            self.sizes.borrow_mut().push(data.len());
            Mser.estimate(data, config)
        }

        fn name(&self) -> &'static str {
            "spy"
        }
    }

    fn small_config() -> SteadyStateConfig {
        SteadyStateConfig::mser1()
            .with_min_samples(10)
            .with_warming_steps(20)
            .with_check_interval(5)
            .with_convergence_threshold(1.0)
            .with_max_samples(1000)
    }

    /// Alternating ±1 series; every suffix statistic is strictly positive.
    fn noisy(n: usize) -> Vec<f64> {
        (0..n).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect()
    }

    #[test]
    fn new_detector_is_collecting() {
        let detector = SteadyStateDetector::default();
        assert_eq!(detector.state(), DetectorState::Collecting);
        assert_eq!(detector.sample_count(), 0);
        assert!(!detector.has_converged());
        assert_eq!(detector.last_result().reason, Reason::NotChecked);
        assert_eq!(detector.current_statistics(), Statistics::default());
        assert_eq!(detector.current_mean(), 0.0);
        assert_eq!(detector.remaining_capacity(), 10_000);
    }

    #[test]
    fn terminal_states() {
        assert!(!DetectorState::Collecting.is_terminal());
        assert!(DetectorState::Converged.is_terminal());
        assert!(DetectorState::Exhausted.is_terminal());

        let mut detector = SteadyStateDetector::new(small_config());
        assert!(!detector.state().is_terminal());
        detector.add_data_points(vec![0.0; 21]);
        assert!(detector.state().is_terminal());
    }

    #[test]
    fn warm_up_boundary_accessors() {
        let mut detector = SteadyStateDetector::new(small_config());
        detector.add_data_points(vec![0.0; 19]);
        assert!(detector.is_in_warming_period());
        assert!(!detector.should_perform_check());

        detector.add_data_point(0.0);
        assert!(!detector.is_in_warming_period());
        assert!(!detector.should_perform_check());
        assert_eq!(detector.last_check_index(), 0);
    }

    #[test]
    fn buffer_is_reserved_to_max_samples() {
        let detector =
            SteadyStateDetector::new(SteadyStateConfig::default().with_max_samples(777));
        assert!(detector.data.capacity() >= 777);

        let mut detector =
            SteadyStateDetector::new(SteadyStateConfig::default().with_max_samples(10));
        detector.update_config(SteadyStateConfig::default().with_max_samples(5000));
        assert!(detector.data.capacity() >= 5000);
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        let config = SteadyStateConfig::default().with_check_interval(0);
        assert!(SteadyStateDetector::try_new(config).is_err());
        assert!(SteadyStateDetector::try_new(SteadyStateConfig::default()).is_ok());
    }

    #[test]
    fn warm_up_suppresses_estimator() {
        let mut detector =
            SteadyStateDetector::with_estimator(small_config(), SpyEstimator::default());
        for _ in 0..19 {
            assert!(!detector.add_data_point(0.0));
        }
        assert_eq!(detector.estimator().calls.get(), 0);

        assert!(!detector.add_data_point(0.0));
        assert_eq!(detector.estimator().calls.get(), 0);

        assert!(detector.add_data_point(0.0));
        assert_eq!(detector.estimator().calls.get(), 1);
        assert_eq!(*detector.estimator().sizes.borrow(), vec![21]);
    }

    #[test]
    fn min_samples_gate_suppresses_estimator() {
        let config = small_config().with_warming(false).with_min_samples(30);
        let mut detector = SteadyStateDetector::with_estimator(config, SpyEstimator::default());
        detector.add_data_points(noisy(29));
        assert_eq!(detector.estimator().calls.get(), 0);
        assert!(!detector.check_convergence());
        assert_eq!(detector.estimator().calls.get(), 0);
        assert_eq!(detector.last_check_index(), 0);

        detector.add_data_point(1.0);
        assert_eq!(detector.estimator().calls.get(), 1);
        assert_eq!(detector.last_check_index(), 30);
    }

    #[test]
    fn checks_follow_interval() {
        let config = small_config().with_warming(false).with_convergence_threshold(0.0);
        let mut detector = SteadyStateDetector::with_estimator(config, SpyEstimator::default());
        detector.add_data_points(noisy(40));
        assert!(!detector.has_converged());
        assert_eq!(*detector.estimator().sizes.borrow(), vec![10, 15, 20, 25, 30, 35, 40]);
    }

    #[test]
    fn explicit_check_resets_cadence() {
        let config = small_config().with_warming(false).with_convergence_threshold(0.0);
        let mut detector = SteadyStateDetector::with_estimator(config, SpyEstimator::default());
        detector.add_data_points(noisy(12));
        assert_eq!(detector.estimator().calls.get(), 1);

        assert!(!detector.check_convergence());
        assert_eq!(detector.last_check_index(), 12);

        detector.add_data_points(noisy(4));
        assert_eq!(detector.estimator().calls.get(), 2);
        detector.add_data_point(1.0);
        assert_eq!(*detector.estimator().sizes.borrow(), vec![10, 12, 17]);
    }

    #[test]
    fn explicit_check_respects_warm_up_boundary() {
        let mut detector =
            SteadyStateDetector::with_estimator(small_config(), SpyEstimator::default());
        detector.add_data_points(vec![0.0; 19]);
        assert!(!detector.check_convergence());
        assert_eq!(detector.estimator().calls.get(), 0);

        detector.add_data_point(0.0);
        assert!(detector.check_convergence());
        assert_eq!(detector.estimator().calls.get(), 1);
    }

    #[test]
    fn convergence_latches_and_fires_callback_once() {
        let mut detector = SteadyStateDetector::new(small_config());
        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&fired);
        detector.set_convergence_callback(move |result| sink.borrow_mut().push(result.clone()));

        assert!(!detector.add_data_points(vec![0.0; 20]));
        assert!(detector.add_data_point(0.0));
        assert_eq!(detector.state(), DetectorState::Converged);
        assert!(detector.last_result().converged);

        let before = detector.last_result().clone();
        assert!(detector.add_data_point(123.0));
        assert!(detector.check_convergence());
        assert_eq!(detector.sample_count(), 21);
        assert_eq!(detector.last_result(), &before);

        let fired = fired.borrow();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].reason, Reason::Ok);
        assert_eq!(fired[0].variant, MserVariant::Mser1);
    }

    #[test]
    fn finite_minimum_above_threshold_does_not_latch() {
        let config = small_config().with_warming(false).with_convergence_threshold(1e-6);
        let mut detector = SteadyStateDetector::new(config);
        assert!(!detector.add_data_points(noisy(100)));
        assert!(detector.last_result().converged);
        assert!(detector.last_result().mser_value > 1e-6);
        assert!(!detector.has_converged());
    }

    #[test]
    fn exhaustion_latches_without_convergence() {
        let config = small_config().with_min_samples(2).with_warming(false).with_max_samples(5);
        let mut detector = SteadyStateDetector::new(config);
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        detector.set_convergence_callback(move |result| {
            assert_eq!(result.reason, Reason::MaxSamplesExhausted);
            counter.set(counter.get() + 1);
        });

        for value in noisy(5) {
            assert!(!detector.add_data_point(value));
        }
        assert!(!detector.add_data_point(1.0));
        assert!(detector.has_converged());
        assert!(detector.is_exhausted());
        assert_eq!(detector.state(), DetectorState::Exhausted);
        assert!(!detector.last_result().converged);
        assert_eq!(detector.last_result().reason, Reason::MaxSamplesExhausted);
        assert_eq!(detector.last_result().total_samples, 6);
        assert_eq!(fired.get(), 1);

        assert!(detector.add_data_point(1.0));
        assert_eq!(detector.sample_count(), 6);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn add_data_points_short_circuits() {
        let mut detector = SteadyStateDetector::new(small_config());
        assert!(detector.add_data_points(vec![0.0; 50]));
        assert_eq!(detector.sample_count(), 21);
    }

    #[test]
    fn reset_keeps_config_and_callback() {
        let config = small_config();
        let mut detector = SteadyStateDetector::new(config.clone());
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        detector.set_convergence_callback(move |_| counter.set(counter.get() + 1));

        detector.add_data_points(vec![0.0; 21]);
        assert!(detector.has_converged());
        let first = detector.last_result().clone();

        detector.reset();
        assert_eq!(detector.state(), DetectorState::Collecting);
        assert_eq!(detector.sample_count(), 0);
        assert_eq!(detector.last_check_index(), 0);
        assert_eq!(detector.last_result(), &MserResult::default());
        assert_eq!(detector.config(), &config);
        assert!(detector.has_callback());

        detector.add_data_points(vec![0.0; 21]);
        assert_eq!(detector.last_result(), &first);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn update_config_keeps_buffer() {
        let mut detector = SteadyStateDetector::new(small_config().with_convergence_threshold(0.0));
        detector.add_data_points(noisy(30));
        assert!(!detector.has_converged());

        detector.update_config(small_config().with_convergence_threshold(10.0));
        assert_eq!(detector.sample_count(), 30);
        assert!(detector.check_convergence());
        assert_eq!(detector.last_result().total_samples, 30);
    }

    #[test]
    fn try_update_config_leaves_config_on_error() {
        let mut detector = SteadyStateDetector::new(small_config());
        assert!(detector.try_update_config(small_config().with_batch_size(0)).is_err());
        assert_eq!(detector.config(), &small_config());
    }

    #[test]
    fn callback_replacement() {
        let mut detector = SteadyStateDetector::new(small_config());
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let counter = Rc::clone(&first);
        detector.set_convergence_callback(move |_| counter.set(counter.get() + 1));
        let counter = Rc::clone(&second);
        detector.set_convergence_callback(move |_| counter.set(counter.get() + 1));

        detector.add_data_points(vec![0.0; 21]);
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);

        detector.clear_convergence_callback();
        assert!(!detector.has_callback());
    }

    #[test]
    fn statistics_accessors() {
        let mut detector = SteadyStateDetector::new(small_config());
        detector.add_data_points(vec![1.0, 2.0, 3.0, 4.0]);
        let stats = detector.current_statistics();
        assert_relative_eq!(stats.mean, 2.5, epsilon = 1e-12);
        assert_relative_eq!(stats.variance, 5.0 / 3.0, epsilon = 1e-12);
        assert_eq!(stats.sample_count, 4);
        assert_relative_eq!(detector.current_mean(), 2.5, epsilon = 1e-12);
        assert_eq!(detector.accumulated_data(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(detector.remaining_capacity(), 996);
    }

    #[test]
    fn warming_disabled_checks_at_min_samples() {
        let config = small_config().with_warming(false);
        let mut detector = SteadyStateDetector::with_estimator(config, SpyEstimator::default());
        assert!(!detector.add_data_points(vec![0.0; 9]));
        assert!(detector.add_data_point(0.0));
        assert_eq!(*detector.estimator().sizes.borrow(), vec![10]);
    }
}
