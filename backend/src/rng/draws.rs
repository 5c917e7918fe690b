//! Named draws used by the production line
//!
//! One stream per replica serves three purposes. Keeping each purpose
//! behind its own method documents the order in which a station start
//! consumes randomness: `service_time` first, then `failure_trial`.
//! `defect_trial` is drawn once per item leaving the last station.

use super::RngManager;

/// Shortest service duration a station can be assigned, in seconds
pub const MIN_SERVICE_SECS: f64 = 1.0;

impl RngManager {
    /// Sample a service duration from Normal(mean, std_dev), floored at
    /// [`MIN_SERVICE_SECS`]
    ///
    /// # Example
    /// ```
    /// use assembly_line_core::RngManager;
    ///
    /// let mut rng = RngManager::new(42);
    /// assert_eq!(rng.service_time(10.0, 0.0), 10.0);
    /// assert_eq!(rng.service_time(-5.0, 0.0), 1.0);
    /// ```
    pub fn service_time(&mut self, mean: f64, std_dev: f64) -> f64 {
        let z = self.standard_normal();
        (mean + std_dev * z).max(MIN_SERVICE_SECS)
    }

    /// Bernoulli trial: does the station break down on this start?
    pub fn failure_trial(&mut self, failure_rate: f64) -> bool {
        self.bernoulli(failure_rate)
    }

    /// Bernoulli trial: is the item leaving final inspection defective?
    pub fn defect_trial(&mut self, defect_rate: f64) -> bool {
        self.bernoulli(defect_rate)
    }

    fn bernoulli(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}
