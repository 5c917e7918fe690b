//! Assembly Line Simulator Core - Rust Engine
//!
//! Discrete-time simulation of a multi-stage production line, run as many
//! independent seeded replicas and aggregated into throughput, cycle-time,
//! WIP, utilization, bottleneck and cost diagnostics.
//!
//! # Architecture
//!
//! - **core**: Virtual clock (1 tick = 1 second)
//! - **rng**: Deterministic random number generation
//! - **arrivals**: Fixed-interval admission schedule
//! - **models**: Domain types (WorkItem, Station, ProductionLine, Event)
//! - **orchestrator**: Configuration, per-replica engine, replication runner
//! - **analysis**: Aggregation of replica results into a Summary
//! - **costs**: Operating-cost model
//!
//! # Critical Invariants
//!
//! 1. Every admitted item is in exactly one container at any instant
//! 2. No station ever serves more items than its capacity
//! 3. All randomness is deterministic (one seeded RNG per replica)
//! 4. Replicas share nothing but the read-only configuration
//!
//! # Example
//!
//! ```rust
//! use assembly_line_core::{ReplicationRunner, SimulationConfig};
//!
//! let mut config = SimulationConfig::laptop_line();
//! config.replications = 2;
//! config.total_arrivals = 40;
//! config.horizon_secs = 3600;
//!
//! let report = ReplicationRunner::new(config).unwrap().run_and_analyze().unwrap();
//! assert_eq!(report.results.len(), 2);
//! assert!(!report.summary.bottleneck_station.is_empty());
//! ```

// Module declarations
pub mod analysis;
pub mod arrivals;
pub mod core;
pub mod costs;
pub mod models;
pub mod orchestrator;
pub mod rng;

// Re-exports for convenience
pub use analysis::{Analyzer, Summary};
pub use arrivals::ArrivalSchedule;
pub use core::time::SimClock;
pub use costs::CostSummary;
pub use models::{
    event::{Event, EventLog},
    line::{ProductionLine, Routed},
    station::{StartOutcome, Station, StationStatus},
    work_item::{ItemStatus, WorkItem},
};
pub use orchestrator::{
    BatchReport, BufferPolicy, ConfigError, ExecutionMode, ReplicaEngine, ReplicaResult,
    ReplicationRunner, SimulationConfig, SimulationError, StationConfig, StationResult,
    TickResult,
};
pub use rng::RngManager;
