//! Boundary records produced by the engine and the runner
//!
//! These are the only artifacts the core hands to the outside world. They
//! are plain serializable data; rendering them is left to the caller.

use crate::analysis::Summary;
use crate::models::{ProductionLine, Station};
use serde::{Deserialize, Serialize};

/// Per-station figures for one replica
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationResult {
    pub name: String,

    /// Busy time over `capacity × horizon`, in percent
    pub utilization_pct: f64,

    /// Mean queue wait per processed item, in minutes
    pub avg_wait_minutes: f64,

    /// Items that completed service here
    pub processed: u64,

    /// Breakdowns during the replica
    pub failures: u32,

    /// Repair time caused by those breakdowns, in seconds
    pub downtime_secs: f64,
}

impl StationResult {
    pub(crate) fn from_station(station: &Station, horizon_secs: f64) -> Self {
        Self {
            name: station.name().to_string(),
            utilization_pct: station.utilization(horizon_secs),
            avg_wait_minutes: station.average_wait() / 60.0,
            processed: station.total_processed(),
            failures: station.failures(),
            downtime_secs: station.downtime(),
        }
    }
}

/// Outcome of one replica
///
/// Immutable once produced. Two runs with the same configuration and
/// replica index produce equal records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicaResult {
    pub replica: u32,
    pub seed: u64,

    /// Items admitted into the line
    pub admitted: u64,
    pub completed: u64,
    pub defective: u64,

    /// Items evicted from a full buffer (drop-oldest policy only)
    pub scrapped: u64,

    /// Items still in the line when the replica stopped
    pub final_wip: u64,

    /// Completed items per hour of horizon
    pub throughput_per_hour: f64,

    /// Mean arrival-to-completion time of completed items, in minutes
    pub avg_cycle_time_minutes: f64,

    pub max_wip: u64,
    pub avg_wip: f64,

    /// Tick at which the replica stopped
    pub end_time: u64,

    /// The safety cutoff stopped the replica before the line drained
    pub truncated: bool,

    /// Stations in pipeline order
    pub stations: Vec<StationResult>,
}

impl ReplicaResult {
    /// Shape the final state of a line into a result record
    pub(crate) fn from_line(
        replica: u32,
        seed: u64,
        line: &ProductionLine,
        horizon_secs: u64,
        end_time: u64,
        truncated: bool,
    ) -> Self {
        let horizon = horizon_secs as f64;
        let horizon_hours = horizon / 3600.0;
        let completed = line.completed().len() as u64;

        let cycle_times: Vec<u64> = line
            .completed()
            .iter()
            .filter_map(|item| item.cycle_time())
            .collect();
        let avg_cycle_time_secs = if cycle_times.is_empty() {
            0.0
        } else {
            cycle_times.iter().sum::<u64>() as f64 / cycle_times.len() as f64
        };

        let samples = line.wip_samples();
        let max_wip = samples.iter().copied().max().unwrap_or(0) as u64;
        let avg_wip = if samples.is_empty() {
            0.0
        } else {
            samples.iter().sum::<usize>() as f64 / samples.len() as f64
        };

        Self {
            replica,
            seed,
            admitted: line.items_created(),
            completed,
            defective: line.defective().len() as u64,
            scrapped: line.scrapped().len() as u64,
            final_wip: line.wip() as u64,
            throughput_per_hour: if horizon_hours > 0.0 {
                completed as f64 / horizon_hours
            } else {
                0.0
            },
            avg_cycle_time_minutes: avg_cycle_time_secs / 60.0,
            max_wip,
            avg_wip,
            end_time,
            truncated,
            stations: line
                .stations()
                .iter()
                .map(|station| StationResult::from_station(station, horizon))
                .collect(),
        }
    }

    /// Items that reached a terminal list
    pub fn exited(&self) -> u64 {
        self.completed + self.defective + self.scrapped
    }

    /// True if every admitted item is either terminal or still in the line
    pub fn is_conserved(&self) -> bool {
        self.exited() + self.final_wip == self.admitted
    }

    pub fn station(&self, name: &str) -> Option<&StationResult> {
        self.stations.iter().find(|s| s.name == name)
    }
}

/// Everything one batch produced, tagged with the configuration it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// SHA-256 of the canonical configuration
    pub config_fingerprint: String,

    /// Replica results in replica order
    pub results: Vec<ReplicaResult>,

    pub summary: Summary,
}
