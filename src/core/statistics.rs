//! Summary statistics over a series or a series of batch means.

use super::TimeSeriesData;

/// Mean, sample variance and standard error over a range of samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    /// Arithmetic mean
    pub mean: f64,
    /// Sample variance (n - 1 denominator, 0 when n <= 1)
    pub variance: f64,
    /// Standard error of the mean, sqrt(variance / n)
    pub standard_error: f64,
    /// Number of samples summarized
    pub sample_count: usize,
}

impl Statistics {
    /// Standard deviation of the samples.
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Batch means of a series, as used by MSER-m.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchStatistics {
    /// Mean of each full batch, in order
    pub batch_means: TimeSeriesData,
    /// Number of raw samples the batches were formed from
    pub original_sample_count: usize,
    /// Samples per batch
    pub batch_size: usize,
}

impl BatchStatistics {
    /// Number of full batches.
    pub fn batch_count(&self) -> usize {
        self.batch_means.len()
    }

    /// Raw samples dropped from the trailing partial batch.
    pub fn discarded_samples(&self) -> usize {
        self.original_sample_count
            .saturating_sub(self.batch_means.len().saturating_mul(self.batch_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discarded_samples_counts_partial_batch() {
        let stats = BatchStatistics {
            batch_means: vec![1.0; 4],
            original_sample_count: 23,
            batch_size: 5,
        };
        assert_eq!(stats.batch_count(), 4);
        assert_eq!(stats.discarded_samples(), 3);
    }

    #[test]
    fn discarded_samples_saturates_on_inconsistent_fields() {
        let stats = BatchStatistics {
            batch_means: vec![1.0; 10],
            original_sample_count: 12,
            batch_size: 5,
        };
        assert_eq!(stats.discarded_samples(), 0);

        let stats = BatchStatistics {
            batch_means: vec![1.0; 2],
            original_sample_count: 7,
            batch_size: usize::MAX,
        };
        assert_eq!(stats.discarded_samples(), 0);
    }
}
