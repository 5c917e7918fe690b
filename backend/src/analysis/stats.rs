//! Sample statistics over replicas

use serde::{Deserialize, Serialize};

/// Mean, sample standard deviation and range of a set of observations
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    pub mean: f64,

    /// Sample (n − 1) standard deviation; 0 for fewer than two values
    pub std_dev: f64,

    pub min: f64,
    pub max: f64,
}

impl SampleStats {
    /// Summarise `values`; all fields are 0 for an empty slice
    ///
    /// # Example
    /// ```
    /// use assembly_line_core::analysis::SampleStats;
    ///
    /// let stats = SampleStats::from_values(&[2.0, 4.0, 6.0]);
    /// assert_eq!(stats.mean, 4.0);
    /// assert_eq!(stats.std_dev, 2.0);
    /// assert_eq!((stats.min, stats.max), (2.0, 6.0));
    /// ```
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mean = mean(values);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            mean,
            std_dev: sample_std_dev(values, mean),
            min,
            max,
        }
    }
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}
