//! Replica engine
//!
//! Drives one replica of the production line through virtual time.
//!
//! # Architecture
//!
//! ```text
//! For each tick t:
//! 1. Admit an arrival if one is due (queue at the first station)
//! 2. Sweep stations in pipeline order:
//!    a. release finished items and route them
//!    b. (second station only) pull one item from the buffer
//!    c. clear a finished repair
//!    d. try to start the next queued item
//! 3. Sample WIP on sampling ticks
//! 4. Advance time
//! ```
//!
//! The loop runs while `t < horizon` or the line still holds work, and
//! stops unconditionally once `t` passes twice the horizon. A replica
//! stopped that way with work still inside is reported as truncated.
//!
//! # Example
//!
//! ```rust
//! use assembly_line_core::{ReplicaEngine, SimulationConfig, StationConfig};
//!
//! let config = SimulationConfig::new(
//!     vec![StationConfig::new("Press", 1, 10.0, 0.0, 12.0).unwrap()],
//!     20.0,
//!     5,
//!     200,
//! );
//!
//! let mut engine = ReplicaEngine::new(&config, 0).unwrap();
//! let result = engine.run();
//!
//! assert_eq!(result.completed, 5);
//! assert!(!result.truncated);
//! ```

use crate::arrivals::ArrivalSchedule;
use crate::core::time::SimClock;
use crate::models::event::{Event, EventLog};
use crate::models::line::{ProductionLine, Routed};
use crate::models::station::StartOutcome;
use crate::orchestrator::config::{ConfigError, SimulationConfig};
use crate::orchestrator::result::ReplicaResult;
use crate::rng::RngManager;
use thiserror::Error;
use tracing::{trace, warn};

/// Simulation error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("No replica results to analyze")]
    NoResults,

    #[error("Replica {replica} panicked")]
    ReplicaPanicked { replica: u32 },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// What happened during a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickResult {
    pub tick: u64,

    /// Items admitted this tick (0 or 1)
    pub arrivals: usize,

    /// Items that entered service at any station
    pub starts: usize,

    /// Start attempts that broke a station
    pub breakdowns: usize,

    /// Items that reached a terminal list
    pub exits: usize,

    /// WIP at the end of the tick
    pub wip: usize,
}

/// Engine for one replica
///
/// Owns a fresh production line and a private random stream seeded with
/// `base_seed + replica`. Nothing is shared with other replicas except the
/// read-only configuration it was built from.
pub struct ReplicaEngine {
    replica: u32,
    seed: u64,

    line: ProductionLine,
    clock: SimClock,
    arrivals: ArrivalSchedule,

    /// Deterministic RNG, the only source of randomness in the replica
    rng_manager: RngManager,

    defect_rate: f64,
    horizon_secs: u64,

    /// Station names in pipeline order, for event records
    station_names: Vec<String>,

    event_log: EventLog,
    truncation_logged: bool,
}

impl ReplicaEngine {
    /// Build the engine for replica `replica` of `config`
    ///
    /// # Errors
    /// Returns `SimulationError::InvalidConfig` if the configuration fails
    /// validation.
    pub fn new(config: &SimulationConfig, replica: u32) -> Result<Self, SimulationError> {
        config.validate()?;

        let seed = config.replica_seed(replica);

        Ok(Self {
            replica,
            seed,
            line: ProductionLine::from_config(config),
            clock: SimClock::new(config.horizon_secs, config.wip_sample_interval_secs),
            arrivals: ArrivalSchedule::new(config.arrival_interval_secs, config.total_arrivals),
            rng_manager: RngManager::new(seed),
            defect_rate: config.defect_rate,
            horizon_secs: config.horizon_secs,
            station_names: config.stations.iter().map(|s| s.name().to_string()).collect(),
            event_log: EventLog::new(),
            truncation_logged: false,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn replica(&self) -> u32 {
        self.replica
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn current_time(&self) -> u64 {
        self.clock.now()
    }

    pub fn line(&self) -> &ProductionLine {
        &self.line
    }

    pub fn arrivals(&self) -> &ArrivalSchedule {
        &self.arrivals
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// True once the horizon has passed and the line is empty
    pub fn is_drained(&self) -> bool {
        !self.clock.within_horizon() && self.line.wip() == 0
    }

    /// True if the safety cutoff stopped the replica with work still inside
    pub fn is_truncated(&self) -> bool {
        self.clock.past_cutoff() && self.line.wip() > 0
    }

    fn is_stopped(&self) -> bool {
        self.is_drained() || self.clock.past_cutoff()
    }

    // ========================================================================
    // Tick Loop Implementation
    // ========================================================================

    /// Execute one tick
    pub fn tick(&mut self) -> TickResult {
        let now = self.clock.now();
        let mut result = TickResult {
            tick: now,
            ..TickResult::default()
        };

        // STEP 1: ARRIVAL
        if self.arrivals.is_due(now) {
            let item_id = self.line.admit(now);
            self.arrivals.record_arrival();
            result.arrivals = 1;
            self.event_log.log(Event::Arrival { tick: now, item_id });
        }

        // STEP 2: STATION SWEEP
        for index in 0..self.line.num_stations() {
            for item in self.line.finish(index, now) {
                let item_id = item.id();
                self.event_log.log(Event::StageComplete {
                    tick: now,
                    station: self.station_names[index].clone(),
                    item_id,
                });

                let routed =
                    self.line
                        .route(index, item, now, &mut self.rng_manager, self.defect_rate);
                self.log_routing(now, item_id, routed);
                if matches!(routed, Routed::Completed { .. } | Routed::Defective) {
                    result.exits += 1;
                }
            }

            if index == 1 {
                if let Some(item_id) = self.line.release_from_buffer(now) {
                    self.event_log.log(Event::BufferRelease { tick: now, item_id });
                }
            }

            if self.line.complete_repair(index, now) {
                self.event_log.log(Event::StationRepaired {
                    tick: now,
                    station: self.station_names[index].clone(),
                });
            }

            match self.line.start(index, now, &mut self.rng_manager) {
                StartOutcome::Started {
                    item_id,
                    wait,
                    duration,
                } => {
                    result.starts += 1;
                    self.event_log.log(Event::ServiceStart {
                        tick: now,
                        station: self.station_names[index].clone(),
                        item_id,
                        wait,
                        duration,
                    });
                }
                StartOutcome::BrokeDown {
                    item_id,
                    repair_until,
                } => {
                    result.breakdowns += 1;
                    trace!(
                        replica = self.replica,
                        station = %self.station_names[index],
                        tick = now,
                        repair_until,
                        "station broke down"
                    );
                    self.event_log.log(Event::StationFailure {
                        tick: now,
                        station: self.station_names[index].clone(),
                        item_id,
                        repair_until,
                    });
                }
                StartOutcome::Idle | StartOutcome::Unavailable | StartOutcome::Blocked => {}
            }
        }

        // STEP 3: WIP SAMPLING
        if self.clock.is_sample_point() {
            let wip = self.line.sample_wip();
            self.event_log.log(Event::WipSample { tick: now, wip });
        }

        // STEP 4: ADVANCE TIME
        self.clock.advance();

        result.wip = self.line.wip();
        result
    }

    fn log_routing(&mut self, now: u64, item_id: u64, routed: Routed) {
        match routed {
            Routed::Buffered => {
                self.event_log.log(Event::BufferEnqueue {
                    tick: now,
                    item_id,
                    buffer_len: self.line.buffer_len(),
                });
            }
            Routed::BufferedWithEviction { evicted_id } => {
                self.event_log.log(Event::BufferEnqueue {
                    tick: now,
                    item_id,
                    buffer_len: self.line.buffer_len(),
                });
                self.event_log.log(Event::BufferEviction {
                    tick: now,
                    item_id: evicted_id,
                });
                warn!(
                    replica = self.replica,
                    tick = now,
                    item = evicted_id,
                    "buffer full, oldest item scrapped"
                );
            }
            Routed::Forwarded { .. } => {}
            Routed::Completed { cycle_time } => {
                self.event_log.log(Event::Completed {
                    tick: now,
                    item_id,
                    cycle_time,
                });
            }
            Routed::Defective => {
                self.event_log.log(Event::Defective { tick: now, item_id });
            }
        }
    }

    /// Run until the line drains after the horizon or the safety cutoff hits
    ///
    /// Calling `run` again on a stopped engine returns the same result.
    pub fn run(&mut self) -> ReplicaResult {
        while !self.is_stopped() {
            self.tick();
        }

        if self.is_truncated() && !self.truncation_logged {
            let wip = self.line.wip();
            warn!(
                replica = self.replica,
                seed = self.seed,
                wip,
                tick = self.clock.now(),
                "safety cutoff reached before the line drained; result is partial"
            );
            self.event_log.log(Event::Truncated {
                tick: self.clock.now(),
                wip,
            });
            self.truncation_logged = true;
        }

        self.result()
    }

    /// Result record for the line's current state
    pub fn result(&self) -> ReplicaResult {
        ReplicaResult::from_line(
            self.replica,
            self.seed,
            &self.line,
            self.horizon_secs,
            self.clock.now(),
            self.is_truncated(),
        )
    }
}

// Manual Debug implementation (the event log can be very large)
impl std::fmt::Debug for ReplicaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicaEngine")
            .field("replica", &self.replica)
            .field("seed", &self.seed)
            .field("current_time", &self.clock.now())
            .field("wip", &self.line.wip())
            .field("event_count", &self.event_log.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
