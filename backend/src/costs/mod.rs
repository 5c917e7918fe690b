//! Operating-cost model
//!
//! Every server at a station is billed for the full horizon of every
//! replica, whether it was busy or not:
//!
//! ```text
//! machine_hours = horizon_hours × replicas
//! station_cost  = cost_per_hour × capacity × machine_hours
//! cost_per_unit = Σ station_cost / completed   (0 when nothing completed)
//! ```

use crate::orchestrator::config::StationConfig;
use serde::{Deserialize, Serialize};

/// Cost attributed to one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationCost {
    pub name: String,

    /// Hourly rate of one server
    pub cost_per_hour: f64,

    pub capacity: u32,

    /// `cost_per_hour × capacity × machine_hours`
    pub total: f64,
}

/// Operating cost of a batch of replicas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    /// Hours each server was on the clock across the batch
    pub machine_hours: f64,

    /// Sum of every station's cost
    pub total_cost: f64,

    /// Total cost over completed items, 0 if none completed
    pub cost_per_unit: f64,

    /// One line per station, in pipeline order
    pub stations: Vec<StationCost>,
}

impl CostSummary {
    /// Price `replicas` runs of `horizon_hours` each, producing `completed` items
    ///
    /// # Example
    /// ```
    /// use assembly_line_core::costs::CostSummary;
    /// use assembly_line_core::StationConfig;
    ///
    /// let stations = vec![
    ///     StationConfig::new("Cut", 1, 10.0, 0.0, 15.0).unwrap(),
    ///     StationConfig::new("Pack", 2, 10.0, 0.0, 12.0).unwrap(),
    /// ];
    /// let costs = CostSummary::compute(&stations, 8.0, 10, 4_000);
    ///
    /// assert_eq!(costs.machine_hours, 80.0);
    /// assert_eq!(costs.total_cost, 15.0 * 80.0 + 12.0 * 2.0 * 80.0);
    /// assert_eq!(costs.cost_per_unit, costs.total_cost / 4_000.0);
    /// ```
    pub fn compute(
        stations: &[StationConfig],
        horizon_hours: f64,
        replicas: usize,
        completed: u64,
    ) -> Self {
        let machine_hours = horizon_hours * replicas as f64;

        let stations: Vec<StationCost> = stations
            .iter()
            .map(|station| StationCost {
                name: station.name().to_string(),
                cost_per_hour: station.cost_per_hour(),
                capacity: station.capacity(),
                total: station.cost_per_hour() * station.capacity() as f64 * machine_hours,
            })
            .collect();

        let total_cost = stations.iter().map(|s| s.total).sum::<f64>();
        let cost_per_unit = if completed > 0 {
            total_cost / completed as f64
        } else {
            0.0
        };

        Self {
            machine_hours,
            total_cost,
            cost_per_unit,
            stations,
        }
    }

    pub fn station(&self, name: &str) -> Option<&StationCost> {
        self.stations.iter().find(|s| s.name == name)
    }
}
