//! Simulation configuration
//!
//! Every parameter of a batch lives in one immutable [`SimulationConfig`]
//! value that is handed to the runner and, through it, to every replica.
//! Station descriptions are validated when they are constructed, including
//! when they are deserialized, so an invalid [`StationConfig`] cannot exist.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while validating configuration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("station '{station}': capacity must be positive")]
    NonPositiveCapacity { station: String },

    #[error("station '{station}': service time mean must be >= 0, got {value}")]
    NegativeServiceTime { station: String, value: f64 },

    #[error("station '{station}': service time std-dev must be >= 0, got {value}")]
    NegativeStdDev { station: String, value: f64 },

    #[error("station '{station}': cost per hour must be >= 0, got {value}")]
    NegativeCost { station: String, value: f64 },

    #[error("station '{station}': repair duration must be >= 0, got {value}")]
    NegativeRepairDuration { station: String, value: f64 },

    #[error("{field} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { field: String, value: f64 },

    #[error("{field} must be a finite number")]
    NonFiniteValue { field: String },

    #[error("station name must not be empty")]
    EmptyStationName,

    #[error("arrival interval must be > 0 seconds, got {0}")]
    NonPositiveArrivalInterval(f64),

    #[error("simulation horizon must be > 0 seconds")]
    ZeroHorizon,

    #[error("replication count must be >= 1")]
    ZeroReplications,

    #[error("WIP sample interval must be > 0 seconds")]
    ZeroSampleInterval,

    #[error("Little's Law tolerance must be >= 0 minutes, got {0}")]
    NegativeTolerance(f64),

    #[error("production line needs at least one station")]
    NoStations,

    #[error("duplicate station name: {0}")]
    DuplicateStation(String),
}

fn ensure_finite(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteValue {
            field: field.to_string(),
        })
    }
}

fn ensure_probability(field: &str, value: f64) -> Result<(), ConfigError> {
    ensure_finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange {
            field: field.to_string(),
            value,
        })
    }
}

// ============================================================================
// Station configuration
// ============================================================================

/// Immutable description of one station
///
/// # Example
/// ```
/// use assembly_line_core::StationConfig;
///
/// let disk = StationConfig::new("Disco", 1, 25.0, 5.0, 15.0)
///     .unwrap()
///     .with_failures(0.002, 1800.0)
///     .unwrap();
///
/// assert_eq!(disk.capacity(), 1);
/// assert_eq!(disk.repair_duration(), 1800.0);
/// assert!(StationConfig::new("Broken", 0, 10.0, 1.0, 5.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStationConfig")]
pub struct StationConfig {
    name: String,
    capacity: u32,
    service_time_mean: f64,
    service_time_std_dev: f64,
    cost_per_hour: f64,
    failure_rate: f64,
    repair_duration: f64,
}

/// Unvalidated station description as it appears in configuration files
#[derive(Debug, Clone, Deserialize)]
pub struct RawStationConfig {
    pub name: String,
    pub capacity: u32,
    pub service_time_mean: f64,
    pub service_time_std_dev: f64,
    pub cost_per_hour: f64,
    #[serde(default)]
    pub failure_rate: f64,
    #[serde(default)]
    pub repair_duration: f64,
}

impl TryFrom<RawStationConfig> for StationConfig {
    type Error = ConfigError;

    fn try_from(raw: RawStationConfig) -> Result<Self, Self::Error> {
        StationConfig::new(
            raw.name,
            raw.capacity,
            raw.service_time_mean,
            raw.service_time_std_dev,
            raw.cost_per_hour,
        )?
        .with_failures(raw.failure_rate, raw.repair_duration)
    }
}

impl StationConfig {
    /// Create a station that never fails
    ///
    /// # Errors
    /// Rejects an empty name, zero capacity, and negative or non-finite
    /// service or cost parameters.
    pub fn new(
        name: impl Into<String>,
        capacity: u32,
        service_time_mean: f64,
        service_time_std_dev: f64,
        cost_per_hour: f64,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::EmptyStationName);
        }
        if capacity == 0 {
            return Err(ConfigError::NonPositiveCapacity { station: name });
        }

        ensure_finite("service_time_mean", service_time_mean)?;
        ensure_finite("service_time_std_dev", service_time_std_dev)?;
        ensure_finite("cost_per_hour", cost_per_hour)?;

        if service_time_mean < 0.0 {
            return Err(ConfigError::NegativeServiceTime {
                station: name,
                value: service_time_mean,
            });
        }
        if service_time_std_dev < 0.0 {
            return Err(ConfigError::NegativeStdDev {
                station: name,
                value: service_time_std_dev,
            });
        }
        if cost_per_hour < 0.0 {
            return Err(ConfigError::NegativeCost {
                station: name,
                value: cost_per_hour,
            });
        }

        Ok(Self {
            name,
            capacity,
            service_time_mean,
            service_time_std_dev,
            cost_per_hour,
            failure_rate: 0.0,
            repair_duration: 0.0,
        })
    }

    /// Attach failure behaviour: per-start breakdown probability and a
    /// fixed repair time in seconds
    pub fn with_failures(
        mut self,
        failure_rate: f64,
        repair_duration: f64,
    ) -> Result<Self, ConfigError> {
        ensure_probability(&format!("{}.failure_rate", self.name), failure_rate)?;
        ensure_finite("repair_duration", repair_duration)?;
        if repair_duration < 0.0 {
            return Err(ConfigError::NegativeRepairDuration {
                station: self.name,
                value: repair_duration,
            });
        }

        self.failure_rate = failure_rate;
        self.repair_duration = repair_duration;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum number of items in service at once
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Mean service time in seconds
    pub fn service_time_mean(&self) -> f64 {
        self.service_time_mean
    }

    /// Service time standard deviation in seconds
    pub fn service_time_std_dev(&self) -> f64 {
        self.service_time_std_dev
    }

    /// Operating cost per server per hour
    pub fn cost_per_hour(&self) -> f64 {
        self.cost_per_hour
    }

    /// Probability that a start attempt breaks the station
    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    /// Seconds the station stays down after a breakdown
    pub fn repair_duration(&self) -> f64 {
        self.repair_duration
    }
}

// ============================================================================
// Run configuration
// ============================================================================

/// What happens when the first station finishes work faster than the
/// inter-stage buffer drains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferPolicy {
    /// The first station only starts an item when a buffer slot is reserved
    /// for it. Nothing is ever lost; upstream work stalls instead.
    #[default]
    Backpressure,

    /// The buffer accepts every item and evicts its oldest entry when full.
    /// Evicted items are scrapped and counted.
    DropOldest,
}

/// How the runner schedules replicas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One replica after another on the calling thread
    #[default]
    Sequential,

    /// One scoped thread per replica, joined before results are returned
    Parallel,
}

fn default_sample_interval() -> u64 {
    60
}

fn default_tolerance() -> f64 {
    1.0
}

/// Complete configuration for a batch of replicas
///
/// # Example
/// ```
/// use assembly_line_core::{SimulationConfig, StationConfig};
///
/// let config = SimulationConfig::new(
///     vec![StationConfig::new("Press", 1, 10.0, 0.0, 12.0).unwrap()],
///     20.0, // arrival interval (s)
///     5,    // arrivals
///     200,  // horizon (s)
/// );
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.replications, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Stations in processing order
    pub stations: Vec<StationConfig>,

    /// Seconds between consecutive arrivals
    pub arrival_interval_secs: f64,

    /// Number of work items released into the line
    pub total_arrivals: u32,

    /// Length of the arrival/measurement window in seconds
    pub horizon_secs: u64,

    /// Number of independent replicas
    pub replications: u32,

    /// Slots in the buffer between the first and second stations
    pub buffer_capacity: usize,

    /// Probability that an item fails final inspection
    pub defect_rate: f64,

    /// Replica `i` is seeded with `base_seed + i`
    pub base_seed: u64,

    #[serde(default)]
    pub buffer_policy: BufferPolicy,

    #[serde(default = "default_sample_interval")]
    pub wip_sample_interval_secs: u64,

    /// Largest acceptable Little's Law discrepancy, in minutes of cycle time
    #[serde(default = "default_tolerance")]
    pub little_law_tolerance_minutes: f64,

    #[serde(default)]
    pub execution: ExecutionMode,
}

impl SimulationConfig {
    /// Single-replica configuration with an unbounded-in-practice buffer,
    /// no defects and seed 0
    pub fn new(
        stations: Vec<StationConfig>,
        arrival_interval_secs: f64,
        total_arrivals: u32,
        horizon_secs: u64,
    ) -> Self {
        Self {
            stations,
            arrival_interval_secs,
            total_arrivals,
            horizon_secs,
            replications: 1,
            buffer_capacity: total_arrivals as usize,
            defect_rate: 0.0,
            base_seed: 0,
            buffer_policy: BufferPolicy::default(),
            wip_sample_interval_secs: default_sample_interval(),
            little_law_tolerance_minutes: default_tolerance(),
            execution: ExecutionMode::default(),
        }
    }

    /// The five-station laptop assembly line
    ///
    /// Motherboard → (buffer of 50) → RAM → Disco → Carcasa → Pruebas, one
    /// laptop every 45 s, 500 laptops, an 8 hour shift, 10 replicas, 5 %
    /// defects found at Pruebas, seed 42.
    pub fn laptop_line() -> Self {
        // Hard-coded values below are all within validated ranges.
        let station = |name: &str, capacity, mean, std_dev, cost| StationConfig {
            name: name.to_string(),
            capacity,
            service_time_mean: mean,
            service_time_std_dev: std_dev,
            cost_per_hour: cost,
            failure_rate: 0.0,
            repair_duration: 0.0,
        };

        let mut disk = station("Disco", 1, 25.0, 5.0, 15.0);
        disk.failure_rate = 0.002;
        disk.repair_duration = 1800.0;

        Self {
            stations: vec![
                station("Motherboard", 1, 20.0, 3.0, 15.0),
                station("RAM", 1, 15.0, 2.0, 15.0),
                disk,
                station("Carcasa", 2, 30.0, 4.0, 12.0),
                station("Pruebas", 1, 60.0, 10.0, 20.0),
            ],
            arrival_interval_secs: 45.0,
            total_arrivals: 500,
            horizon_secs: 8 * 3600,
            replications: 10,
            buffer_capacity: 50,
            defect_rate: 0.05,
            base_seed: 42,
            buffer_policy: BufferPolicy::Backpressure,
            wip_sample_interval_secs: default_sample_interval(),
            little_law_tolerance_minutes: default_tolerance(),
            execution: ExecutionMode::Sequential,
        }
    }

    /// Check the run-level parameters and station list
    ///
    /// Individual stations were validated when they were built; this adds
    /// the checks that need the whole line.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stations.is_empty() {
            return Err(ConfigError::NoStations);
        }

        let mut names = HashSet::new();
        for station in &self.stations {
            if !names.insert(station.name()) {
                return Err(ConfigError::DuplicateStation(station.name().to_string()));
            }
        }

        ensure_finite("arrival_interval_secs", self.arrival_interval_secs)?;
        if self.arrival_interval_secs <= 0.0 {
            return Err(ConfigError::NonPositiveArrivalInterval(
                self.arrival_interval_secs,
            ));
        }
        if self.horizon_secs == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        if self.replications == 0 {
            return Err(ConfigError::ZeroReplications);
        }
        if self.wip_sample_interval_secs == 0 {
            return Err(ConfigError::ZeroSampleInterval);
        }

        ensure_probability("defect_rate", self.defect_rate)?;

        ensure_finite("little_law_tolerance_minutes", self.little_law_tolerance_minutes)?;
        if self.little_law_tolerance_minutes < 0.0 {
            return Err(ConfigError::NegativeTolerance(
                self.little_law_tolerance_minutes,
            ));
        }

        Ok(())
    }

    /// Seed used by replica `index`
    pub fn replica_seed(&self, index: u32) -> u64 {
        self.base_seed.wrapping_add(index as u64)
    }

    /// Horizon expressed in hours
    pub fn horizon_hours(&self) -> f64 {
        self.horizon_secs as f64 / 3600.0
    }
}
