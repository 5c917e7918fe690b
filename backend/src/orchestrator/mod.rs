//! Orchestrator - replica engine and replication runner
//!
//! - `config`: batch configuration and its validation
//! - `engine`: the per-replica tick loop
//! - `runner`: runs replicas sequentially or in parallel
//! - `result`: records handed back to callers
//! - `fingerprint`: SHA-256 of a configuration

pub mod config;
pub mod engine;
pub mod fingerprint;
pub mod result;
pub mod runner;

// Re-export main types for convenience
pub use config::{BufferPolicy, ConfigError, ExecutionMode, SimulationConfig, StationConfig};
pub use engine::{ReplicaEngine, SimulationError, TickResult};
pub use fingerprint::compute_config_hash;
pub use result::{BatchReport, ReplicaResult, StationResult};
pub use runner::ReplicationRunner;
