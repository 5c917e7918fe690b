//! Configuration fingerprints
//!
//! A batch report carries the SHA-256 of the configuration that produced
//! it, so result sets can be matched to their inputs and two batches can be
//! checked for comparability.

use crate::orchestrator::engine::SimulationError;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Compute deterministic SHA256 hash of a configuration
///
/// Uses canonical JSON serialization with sorted keys, so the hash does not
/// depend on field or map iteration order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
