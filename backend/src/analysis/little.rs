//! Little's Law consistency check
//!
//! In steady state `WIP = throughput × cycle time`. The check turns the
//! measured mean WIP and throughput into the cycle time they imply and
//! compares it with the cycle time measured directly on completed items.

use serde::{Deserialize, Serialize};

/// Outcome of the Little's Law check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LittleLawCheck {
    /// `throughput (items/s) × cycle time (s)`
    pub expected_wip: f64,

    /// Mean WIP divided by throughput, in minutes
    pub implied_cycle_time_minutes: f64,

    /// `|implied − measured|` cycle time, in minutes
    pub discrepancy_minutes: f64,

    pub tolerance_minutes: f64,

    /// Discrepancy strictly below the tolerance
    pub passes: bool,
}

impl LittleLawCheck {
    /// Compare mean WIP against throughput (items/hour) and cycle time (minutes)
    ///
    /// With zero throughput no cycle time is implied and the implied value
    /// is reported as 0.
    ///
    /// # Example
    /// ```
    /// use assembly_line_core::analysis::LittleLawCheck;
    ///
    /// // 60 items/h with a 10 minute cycle keeps 10 items in the line
    /// let check = LittleLawCheck::evaluate(10.0, 60.0, 10.0, 1.0);
    /// assert!((check.expected_wip - 10.0).abs() < 1e-9);
    /// assert!(check.discrepancy_minutes < 1e-9);
    /// assert!(check.passes);
    /// ```
    pub fn evaluate(
        mean_wip: f64,
        throughput_per_hour: f64,
        cycle_time_minutes: f64,
        tolerance_minutes: f64,
    ) -> Self {
        let throughput_per_sec = throughput_per_hour / 3600.0;

        let implied_cycle_time_minutes = if throughput_per_sec > 0.0 {
            mean_wip / throughput_per_sec / 60.0
        } else {
            0.0
        };
        let discrepancy_minutes = (implied_cycle_time_minutes - cycle_time_minutes).abs();

        Self {
            expected_wip: throughput_per_sec * cycle_time_minutes * 60.0,
            implied_cycle_time_minutes,
            discrepancy_minutes,
            tolerance_minutes,
            passes: discrepancy_minutes < tolerance_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_throughput() {
        let check = LittleLawCheck::evaluate(3.0, 0.0, 0.0, 1.0);
        assert_eq!(check.implied_cycle_time_minutes, 0.0);
        assert_eq!(check.expected_wip, 0.0);
        assert!(check.passes);
    }

    #[test]
    fn test_discrepancy_outside_tolerance_fails() {
        // 2 items at 60/h imply a 2 minute cycle; 5 were measured
        let check = LittleLawCheck::evaluate(2.0, 60.0, 5.0, 1.0);
        assert!((check.implied_cycle_time_minutes - 2.0).abs() < 1e-9);
        assert!((check.discrepancy_minutes - 3.0).abs() < 1e-9);
        assert!(!check.passes);
    }
}
