//! Arrival admission for the production line.
//!
//! Work items arrive at a fixed, deterministic interval. The schedule itself
//! draws nothing from the RNG, so the random stream is reserved for service
//! times, failures and defects.
//!
//! # Example
//!
//! ```
//! use assembly_line_core::arrivals::ArrivalSchedule;
//!
//! let mut schedule = ArrivalSchedule::new(20.0, 3);
//! assert!(!schedule.is_due(0));
//! assert!(schedule.is_due(20));
//!
//! schedule.record_arrival();
//! assert_eq!(schedule.remaining(), 2);
//! assert_eq!(schedule.next_arrival_time(), 40.0);
//! ```

use serde::{Deserialize, Serialize};

/// Fixed-interval arrival schedule for one replica.
///
/// The first item arrives one full interval after time zero. At most one
/// item is admitted per tick; if the interval is shorter than a tick the
/// schedule falls behind and catches up one item per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalSchedule {
    /// Seconds between consecutive arrivals
    interval: f64,

    /// Virtual time at which the next item becomes due
    next_arrival: f64,

    /// Arrivals not yet admitted
    remaining: u32,

    /// Arrivals admitted so far
    admitted: u32,
}

impl ArrivalSchedule {
    /// Create a schedule that will admit `total` items, `interval` seconds apart.
    pub fn new(interval: f64, total: u32) -> Self {
        Self {
            interval,
            next_arrival: interval,
            remaining: total,
            admitted: 0,
        }
    }

    /// True if an item should be admitted at tick `now`.
    pub fn is_due(&self, now: u64) -> bool {
        self.remaining > 0 && now as f64 >= self.next_arrival
    }

    /// Record that the due item was admitted and move to the next slot.
    pub fn record_arrival(&mut self) {
        debug_assert!(self.remaining > 0, "no arrivals left to record");
        self.next_arrival += self.interval;
        self.remaining = self.remaining.saturating_sub(1);
        self.admitted += 1;
    }

    /// Time at which the next item becomes due
    pub fn next_arrival_time(&self) -> f64 {
        self.next_arrival
    }

    /// Arrivals still to come
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Arrivals admitted so far
    pub fn admitted(&self) -> u32 {
        self.admitted
    }

    /// True once every configured arrival has been admitted
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_arrival_after_one_interval() {
        let schedule = ArrivalSchedule::new(45.0, 10);
        assert!(!schedule.is_due(44));
        assert!(schedule.is_due(45));
    }

    #[test]
    fn test_no_arrivals_when_total_is_zero() {
        let schedule = ArrivalSchedule::new(1.0, 0);
        assert!(!schedule.is_due(1_000));
        assert!(schedule.is_exhausted());
    }

    #[test]
    fn test_schedule_admits_exact_total() {
        let mut schedule = ArrivalSchedule::new(5.0, 4);
        let mut admitted_at = Vec::new();

        for now in 0..100 {
            if schedule.is_due(now) {
                schedule.record_arrival();
                admitted_at.push(now);
            }
        }

        assert_eq!(admitted_at, vec![5, 10, 15, 20]);
        assert_eq!(schedule.admitted(), 4);
        assert!(schedule.is_exhausted());
    }

    #[test]
    fn test_sub_tick_interval_admits_one_per_tick() {
        let mut schedule = ArrivalSchedule::new(0.25, 8);
        let mut per_tick = Vec::new();

        for now in 0..4 {
            let mut count = 0;
            if schedule.is_due(now) {
                schedule.record_arrival();
                count += 1;
            }
            per_tick.push(count);
        }

        assert_eq!(per_tick, vec![0, 1, 1, 1]);
    }
}
