//! Statistical analysis of a batch of replicas
//!
//! Turns the per-replica [`ReplicaResult`] records into one [`Summary`]:
//! - throughput and cycle-time statistics across replicas
//! - production totals and the observed defect rate
//! - WIP levels
//! - per-station averages and the bottleneck
//! - a Little's Law consistency check
//! - the operating cost of the batch
//!
//! The analyzer is pure: it produces structured data and never prints.

pub mod bottleneck;
pub mod little;
pub mod stats;

pub use bottleneck::{Bottleneck, ImprovementAdvice, StationSummary, ADVICE_THRESHOLD_PCT};
pub use little::LittleLawCheck;
pub use stats::SampleStats;

use crate::costs::CostSummary;
use crate::orchestrator::config::{SimulationConfig, StationConfig};
use crate::orchestrator::engine::SimulationError;
use crate::orchestrator::result::ReplicaResult;
use serde::{Deserialize, Serialize};

/// Aggregate diagnostics for a batch
///
/// The first six fields are the headline figures; the rest is detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Station with the highest mean utilization
    pub bottleneck_station: String,

    /// Mean completed items per hour
    pub mean_throughput: f64,

    /// Mean cycle time in minutes
    pub mean_cycle_time: f64,

    /// Little's Law discrepancy in minutes
    pub little_law_discrepancy: f64,

    pub total_cost: f64,
    pub cost_per_unit: f64,

    /// Replicas analysed
    pub replicas: usize,

    /// Replicas stopped by the safety cutoff
    pub truncated_replicas: usize,

    pub throughput: SampleStats,
    pub cycle_time: SampleStats,

    pub total_completed: u64,
    pub total_defective: u64,
    pub total_scrapped: u64,

    /// Defective share of inspected items, in percent
    pub defect_rate_pct: f64,

    /// Mean over replicas of each replica's average WIP
    pub mean_avg_wip: f64,

    /// Highest WIP sample seen in any replica
    pub max_wip: u64,

    /// Stations in pipeline order
    pub stations: Vec<StationSummary>,

    pub bottleneck: Bottleneck,
    pub little_law: LittleLawCheck,
    pub costs: CostSummary,
}

/// Aggregates replica results for one configuration
#[derive(Debug, Clone)]
pub struct Analyzer {
    stations: Vec<StationConfig>,
    horizon_hours: f64,
    tolerance_minutes: f64,
}

impl Analyzer {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            stations: config.stations.clone(),
            horizon_hours: config.horizon_hours(),
            tolerance_minutes: config.little_law_tolerance_minutes,
        }
    }

    /// Summarise `results`
    ///
    /// # Errors
    /// `SimulationError::NoResults` when `results` is empty or the line
    /// has no stations.
    pub fn analyze(&self, results: &[ReplicaResult]) -> Result<Summary, SimulationError> {
        if results.is_empty() {
            return Err(SimulationError::NoResults);
        }

        let throughputs: Vec<f64> = results.iter().map(|r| r.throughput_per_hour).collect();
        let cycle_times: Vec<f64> = results.iter().map(|r| r.avg_cycle_time_minutes).collect();
        let avg_wips: Vec<f64> = results.iter().map(|r| r.avg_wip).collect();

        let throughput = SampleStats::from_values(&throughputs);
        let cycle_time = SampleStats::from_values(&cycle_times);
        let mean_avg_wip = stats::mean(&avg_wips);

        let total_completed: u64 = results.iter().map(|r| r.completed).sum();
        let total_defective: u64 = results.iter().map(|r| r.defective).sum();
        let total_scrapped: u64 = results.iter().map(|r| r.scrapped).sum();
        let inspected = total_completed + total_defective;
        let defect_rate_pct = if inspected > 0 {
            total_defective as f64 / inspected as f64 * 100.0
        } else {
            0.0
        };

        let stations = self.station_summaries(results);
        let service_means: Vec<f64> =
            self.stations.iter().map(|s| s.service_time_mean()).collect();
        let bottleneck =
            Bottleneck::identify(&stations, &service_means).ok_or(SimulationError::NoResults)?;

        let little_law = LittleLawCheck::evaluate(
            mean_avg_wip,
            throughput.mean,
            cycle_time.mean,
            self.tolerance_minutes,
        );
        let costs = CostSummary::compute(
            &self.stations,
            self.horizon_hours,
            results.len(),
            total_completed,
        );

        Ok(Summary {
            bottleneck_station: bottleneck.name.clone(),
            mean_throughput: throughput.mean,
            mean_cycle_time: cycle_time.mean,
            little_law_discrepancy: little_law.discrepancy_minutes,
            total_cost: costs.total_cost,
            cost_per_unit: costs.cost_per_unit,
            replicas: results.len(),
            truncated_replicas: results.iter().filter(|r| r.truncated).count(),
            throughput,
            cycle_time,
            total_completed,
            total_defective,
            total_scrapped,
            defect_rate_pct,
            mean_avg_wip,
            max_wip: results.iter().map(|r| r.max_wip).max().unwrap_or(0),
            stations,
            bottleneck,
            little_law,
            costs,
        })
    }

    /// Average each station's figures over the replicas, matching by name
    fn station_summaries(&self, results: &[ReplicaResult]) -> Vec<StationSummary> {
        self.stations
            .iter()
            .map(|config| {
                let per_replica: Vec<_> = results
                    .iter()
                    .filter_map(|r| r.station(config.name()))
                    .collect();

                let utils: Vec<f64> = per_replica.iter().map(|s| s.utilization_pct).collect();
                let waits: Vec<f64> = per_replica.iter().map(|s| s.avg_wait_minutes).collect();
                let processed: Vec<f64> = per_replica.iter().map(|s| s.processed as f64).collect();

                StationSummary {
                    name: config.name().to_string(),
                    capacity: config.capacity(),
                    mean_utilization_pct: stats::mean(&utils),
                    mean_wait_minutes: stats::mean(&waits),
                    mean_processed: stats::mean(&processed),
                    total_failures: per_replica.iter().map(|s| s.failures as u64).sum(),
                }
            })
            .collect()
    }
}
