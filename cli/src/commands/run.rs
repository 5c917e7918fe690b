use std::path::Path;

use anyhow::{Context, Result};
use assembly_line_core::{ExecutionMode, ReplicationRunner, SimulationConfig};

/// Command-line overrides applied on top of the loaded configuration
pub struct Overrides {
    pub replications: Option<u32>,
    pub seed: Option<u64>,
    pub parallel: bool,
}

/// Execute the `run` command: load, validate, simulate, print JSON.
pub fn execute(config_path: Option<&Path>, overrides: Overrides, full: bool) -> Result<()> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => SimulationConfig::laptop_line(),
    };

    if let Some(replications) = overrides.replications {
        config.replications = replications;
    }
    if let Some(seed) = overrides.seed {
        config.base_seed = seed;
    }
    if overrides.parallel {
        config.execution = ExecutionMode::Parallel;
    }

    tracing::info!(
        stations = config.stations.len(),
        replications = config.replications,
        seed = config.base_seed,
        "Starting batch"
    );

    let runner = ReplicationRunner::new(config).context("Invalid configuration")?;
    let report = runner.run_and_analyze().context("Simulation failed")?;

    let json = if full {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string_pretty(&report.summary)?
    };
    println!("{}", json);

    if report.summary.truncated_replicas > 0 {
        tracing::warn!(
            truncated = report.summary.truncated_replicas,
            "Some replicas hit the safety cutoff; their figures are partial"
        );
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<SimulationConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
