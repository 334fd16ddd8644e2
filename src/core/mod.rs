//! Core data structures shared by the estimator and the detector.

mod config;
mod result;
mod statistics;

pub use config::SteadyStateConfig;
pub use result::{MserResult, MserVariant, Reason};
pub use statistics::{BatchStatistics, Statistics};

/// A single observation of the monitored metric.
pub type TimeSeriesValue = f64;

/// An ordered series of observations, indexed by arrival.
pub type TimeSeriesData = Vec<TimeSeriesValue>;
