//! Virtual time for a single replica
//!
//! The line advances in fixed one-second ticks. The clock also knows the
//! simulation horizon, the hard safety cutoff (twice the horizon) and the
//! cadence at which work-in-process is sampled.

use serde::{Deserialize, Serialize};

/// Discrete virtual clock, one tick per simulated second
///
/// # Example
/// ```
/// use assembly_line_core::SimClock;
///
/// let mut clock = SimClock::new(3600, 60); // 1 hour horizon, sample every minute
/// assert_eq!(clock.now(), 0);
/// assert!(clock.is_sample_point());
///
/// clock.advance();
/// assert_eq!(clock.now(), 1);
/// assert!(!clock.is_sample_point());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    /// Ticks elapsed since the replica started
    now: u64,
    /// Nominal end of the arrival/measurement window
    horizon: u64,
    /// Ticks between two WIP samples
    sample_interval: u64,
}

impl SimClock {
    /// Create a clock at time zero
    ///
    /// # Panics
    /// Panics if `horizon` or `sample_interval` is zero. Configuration
    /// validation rejects both before a clock is ever built.
    pub fn new(horizon: u64, sample_interval: u64) -> Self {
        assert!(horizon > 0, "horizon must be positive");
        assert!(sample_interval > 0, "sample_interval must be positive");
        Self {
            now: 0,
            horizon,
            sample_interval,
        }
    }

    /// Advance time by one tick
    pub fn advance(&mut self) {
        self.now += 1;
    }

    /// Current tick
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Simulation horizon in ticks
    pub fn horizon(&self) -> u64 {
        self.horizon
    }

    /// Horizon expressed in hours
    ///
    /// # Example
    /// ```
    /// use assembly_line_core::SimClock;
    ///
    /// let clock = SimClock::new(8 * 3600, 60);
    /// assert_eq!(clock.horizon_hours(), 8.0);
    /// ```
    pub fn horizon_hours(&self) -> f64 {
        self.horizon as f64 / 3600.0
    }

    /// Last tick the drain phase may run before the replica is cut off
    pub fn cutoff(&self) -> u64 {
        self.horizon.saturating_mul(2)
    }

    /// True while the clock is still inside the horizon
    pub fn within_horizon(&self) -> bool {
        self.now < self.horizon
    }

    /// True once the clock has moved beyond the safety cutoff
    ///
    /// # Example
    /// ```
    /// use assembly_line_core::SimClock;
    ///
    /// let mut clock = SimClock::new(2, 1);
    /// for _ in 0..4 {
    ///     clock.advance();
    /// }
    /// assert!(!clock.past_cutoff());
    /// clock.advance();
    /// assert!(clock.past_cutoff());
    /// ```
    pub fn past_cutoff(&self) -> bool {
        self.now > self.cutoff()
    }

    /// True on ticks where WIP should be sampled
    pub fn is_sample_point(&self) -> bool {
        self.now % self.sample_interval == 0
    }

    /// Ticks between WIP samples
    pub fn sample_interval(&self) -> u64 {
        self.sample_interval
    }
}
