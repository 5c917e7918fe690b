//! Replication runner
//!
//! Runs `replications` independent replicas of one configuration and
//! collects their results in replica order. Replicas share nothing but the
//! read-only configuration, so the parallel mode only changes wall-clock
//! time: results are identical to a sequential run.

use crate::analysis::Analyzer;
use crate::orchestrator::config::{ExecutionMode, SimulationConfig};
use crate::orchestrator::engine::{ReplicaEngine, SimulationError};
use crate::orchestrator::fingerprint::compute_config_hash;
use crate::orchestrator::result::{BatchReport, ReplicaResult};
use std::thread;
use tracing::{debug, info};

/// Runs a batch of replicas for one validated configuration
///
/// # Example
/// ```
/// use assembly_line_core::{ReplicationRunner, SimulationConfig, StationConfig};
///
/// let mut config = SimulationConfig::new(
///     vec![StationConfig::new("Press", 1, 10.0, 0.0, 12.0).unwrap()],
///     20.0,
///     5,
///     200,
/// );
/// config.replications = 3;
///
/// let runner = ReplicationRunner::new(config).unwrap();
/// let results = runner.run().unwrap();
/// assert_eq!(results.len(), 3);
/// assert_eq!(results[2].seed, 2);
/// ```
#[derive(Debug, Clone)]
pub struct ReplicationRunner {
    config: SimulationConfig,
}

impl ReplicationRunner {
    /// Validate `config` and wrap it in a runner
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run one replica to completion
    pub fn run_replica(&self, replica: u32) -> Result<ReplicaResult, SimulationError> {
        let mut engine = ReplicaEngine::new(&self.config, replica)?;
        let result = engine.run();
        debug!(
            replica,
            seed = result.seed,
            completed = result.completed,
            end_time = result.end_time,
            truncated = result.truncated,
            "replica finished"
        );
        Ok(result)
    }

    /// Run every replica using the configured execution mode
    ///
    /// Results come back in replica order regardless of mode.
    pub fn run(&self) -> Result<Vec<ReplicaResult>, SimulationError> {
        let results = match self.config.execution {
            ExecutionMode::Sequential => self.run_sequential()?,
            ExecutionMode::Parallel => self.run_parallel()?,
        };

        let truncated = results.iter().filter(|r| r.truncated).count();
        info!(
            replicas = results.len(),
            truncated,
            mode = ?self.config.execution,
            "batch finished"
        );
        Ok(results)
    }

    fn run_sequential(&self) -> Result<Vec<ReplicaResult>, SimulationError> {
        (0..self.config.replications)
            .map(|replica| self.run_replica(replica))
            .collect()
    }

    fn run_parallel(&self) -> Result<Vec<ReplicaResult>, SimulationError> {
        thread::scope(|scope| {
            let handles: Vec<_> = (0..self.config.replications)
                .map(|replica| (replica, scope.spawn(move || self.run_replica(replica))))
                .collect();

            handles
                .into_iter()
                .map(|(replica, handle)| {
                    handle
                        .join()
                        .map_err(|_| SimulationError::ReplicaPanicked { replica })?
                })
                .collect()
        })
    }

    /// Run the batch and analyse it in one step
    ///
    /// The report carries the SHA-256 fingerprint of the configuration so
    /// saved results can be matched to the inputs that produced them.
    pub fn run_and_analyze(&self) -> Result<BatchReport, SimulationError> {
        let config_fingerprint = compute_config_hash(&self.config)?;
        let results = self.run()?;
        let summary = Analyzer::new(&self.config).analyze(&results)?;

        Ok(BatchReport {
            config_fingerprint,
            results,
            summary,
        })
    }
}
