//! Checkpoint - Save/Load Engine State
//!
//! A host that cannot keep the engine alive between ticks (e.g. a web UI
//! that stores state in the browser) serializes it after every step and
//! restores it before the next one.
//!
//! # Critical Invariants
//!
//! - **Determinism**: A restored engine continues with exactly the same
//!   propensity shocks as the original (RNG state is captured).
//! - **Bounded History**: A snapshot never holds more than `memory` states.
//! - **Flag Cardinality**: Each outlier window matches the history length.
//! - **Config Matching**: State can only be loaded with the config it was
//!   saved under.

use crate::models::{EconomicState, SimulationHistory};
use crate::orchestrator::engine::{validate_config, EngineConfig, SimulationEngine, SimulationError};
use crate::rng::RngManager;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// Snapshot Structure
// ============================================================================

/// Complete engine state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Ticks elapsed when the snapshot was taken
    pub current_tick: usize,

    /// xorshift state at time of snapshot (CRITICAL for determinism)
    pub rng_state: u64,

    /// SHA256 of the canonical config JSON
    pub config_hash: String,

    /// History, oldest first
    pub history: Vec<EconomicState>,
}

// ============================================================================
// Config Hashing
// ============================================================================

/// SHA256 of the config's JSON encoding, as lowercase hex
///
/// Struct fields serialize in declaration order, so equal configs always
/// produce the same bytes.
pub fn compute_config_hash(config: &EngineConfig) -> Result<String, SimulationError> {
    let json = serde_json::to_vec(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;
    Ok(format!("{:x}", Sha256::digest(&json)))
}

// ============================================================================
// Validation
// ============================================================================

/// Validate snapshot integrity against the engine memory
pub fn validate_snapshot(snapshot: &EngineSnapshot, memory: usize) -> Result<(), SimulationError> {
    let len = snapshot.history.len();

    if len == 0 {
        return Err(SimulationError::StateValidationError(
            "History must contain at least one state".to_string(),
        ));
    }

    if len > memory {
        return Err(SimulationError::StateValidationError(format!(
            "History length {} exceeds memory {}",
            len, memory
        )));
    }

    if len - 1 > snapshot.current_tick {
        return Err(SimulationError::StateValidationError(format!(
            "History length {} impossible after {} ticks",
            len, snapshot.current_tick
        )));
    }

    for (i, state) in snapshot.history.iter().enumerate() {
        if !state.alpha().is_finite() || !state.rho().is_finite() {
            return Err(SimulationError::StateValidationError(format!(
                "Non-finite propensity in state {}",
                i
            )));
        }
    }

    // Only the newest state's windows are guaranteed to span the whole history
    if let Some(latest) = snapshot.history.last() {
        let flags = latest.outliers();
        if flags.alpha().len() != len || flags.rho().len() != len {
            return Err(SimulationError::StateValidationError(format!(
                "Outlier windows ({}, {}) do not match history length {}",
                flags.alpha().len(),
                flags.rho().len(),
                len
            )));
        }
    }

    Ok(())
}

// ============================================================================
// Save / Load
// ============================================================================

impl SimulationEngine<RngManager> {
    /// Capture the engine state
    pub fn snapshot(&self) -> Result<EngineSnapshot, SimulationError> {
        Ok(EngineSnapshot {
            current_tick: self.current_tick(),
            rng_state: self.rng_state(),
            config_hash: compute_config_hash(self.config())?,
            history: self.history().to_vec(),
        })
    }

    /// Serialize the engine state to JSON
    pub fn save_state(&self) -> Result<String, SimulationError> {
        let snapshot = self.snapshot()?;
        debug!(
            "Saving checkpoint at tick {} ({} states)",
            snapshot.current_tick,
            snapshot.history.len()
        );
        serde_json::to_string(&snapshot).map_err(|e| {
            SimulationError::SerializationError(format!("Failed to serialize state: {}", e))
        })
    }

    /// Rebuild an engine from a snapshot taken under `config`
    pub fn from_snapshot(
        config: EngineConfig,
        snapshot: EngineSnapshot,
    ) -> Result<Self, SimulationError> {
        validate_config(&config)?;

        let config_hash = compute_config_hash(&config)?;
        if snapshot.config_hash != config_hash {
            return Err(SimulationError::ConfigMismatch {
                expected: snapshot.config_hash,
                actual: config_hash,
            });
        }

        validate_snapshot(&snapshot, config.memory)?;

        let history = SimulationHistory::from_states(config.memory, snapshot.history).ok_or_else(
            || SimulationError::StateValidationError("History does not fit memory".to_string()),
        )?;

        Ok(Self::from_parts(
            config,
            history,
            RngManager::new(snapshot.rng_state),
            snapshot.current_tick,
        ))
    }

    /// Parse a JSON checkpoint and rebuild the engine
    pub fn load_state(config: EngineConfig, state_json: &str) -> Result<Self, SimulationError> {
        let snapshot: EngineSnapshot = serde_json::from_str(state_json).map_err(|e| {
            SimulationError::DeserializationError(format!("Failed to parse state JSON: {}", e))
        })?;
        debug!("Loading checkpoint at tick {}", snapshot.current_tick);
        Self::from_snapshot(config, snapshot)
    }
}
