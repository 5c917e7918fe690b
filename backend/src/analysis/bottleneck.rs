//! Bottleneck identification

use serde::{Deserialize, Serialize};

/// Mean utilization above which improvement advice is attached
pub const ADVICE_THRESHOLD_PCT: f64 = 85.0;

/// Per-station figures averaged over replicas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSummary {
    pub name: String,
    pub capacity: u32,
    pub mean_utilization_pct: f64,
    pub mean_wait_minutes: f64,
    pub mean_processed: f64,
    pub total_failures: u64,
}

/// Two ways to relieve a saturated station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementAdvice {
    /// Servers to add (doubles the station)
    pub add_servers: u32,

    /// `(100 − utilization) / 2`
    pub add_servers_gain_pct: f64,

    /// 10 % of the current mean service time
    pub service_time_reduction_secs: f64,

    /// `utilization × 0.1`
    pub service_time_gain_pct: f64,
}

/// The station limiting throughput
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub name: String,
    pub utilization_pct: f64,
    pub avg_wait_minutes: f64,

    /// Present when utilization exceeds [`ADVICE_THRESHOLD_PCT`]
    pub advice: Option<ImprovementAdvice>,
}

impl Bottleneck {
    /// Pick the station with the highest mean utilization
    ///
    /// Ties go to the earliest station. `service_means` holds each
    /// station's mean service time, in the same order as `stations`.
    /// Returns `None` for an empty line.
    pub fn identify(stations: &[StationSummary], service_means: &[f64]) -> Option<Self> {
        let (index, station) = stations.iter().enumerate().fold(
            None::<(usize, &StationSummary)>,
            |best, (i, s)| match best {
                Some((_, b)) if b.mean_utilization_pct >= s.mean_utilization_pct => best,
                _ => Some((i, s)),
            },
        )?;

        let utilization = station.mean_utilization_pct;
        let advice = (utilization > ADVICE_THRESHOLD_PCT).then(|| ImprovementAdvice {
            add_servers: station.capacity,
            add_servers_gain_pct: (100.0 - utilization) / 2.0,
            service_time_reduction_secs: service_means.get(index).copied().unwrap_or(0.0) * 0.1,
            service_time_gain_pct: utilization * 0.1,
        });

        Some(Self {
            name: station.name.clone(),
            utilization_pct: utilization,
            avg_wait_minutes: station.mean_wait_minutes,
            advice,
        })
    }
}
