//! Simulation Engine
//!
//! Bounded-memory stepper for the two-sector economy. Each call to
//! [`SimulationEngine::step`] produces exactly one new [`EconomicState`]:
//!
//! ```text
//! For each tick t:
//! 1. Resolve alpha and rho (override, or clamped random walk)
//! 2. Solve the equilibrium for consumption and wages
//! 3. Move savings by the net flow
//! 4. Run the anomaly detector once the history is full
//! 5. Append the state (oldest evicted at capacity)
//! 6. Advance the tick counter
//! ```
//!
//! # Example
//!
//! ```rust
//! use economy_simulator_core_rs::{EngineConfig, SimulationEngine};
//!
//! let config = EngineConfig::new(0.05, 5, [0.5, 0.5], [100.0, 100.0]);
//! let mut engine = SimulationEngine::new(config).unwrap();
//!
//! for _ in 0..10 {
//!     engine.step(None, None);
//! }
//!
//! assert_eq!(engine.current_tick(), 10);
//! assert_eq!(engine.history_len(), 5);
//!
//! let matrix = engine.get_matrix();
//! assert!(matrix.is_zero() || (matrix.sum() - 1.0).abs() < 1e-9);
//! ```

use crate::anomaly::{detect_anomaly, AnomalyError, DetectorConfig};
use crate::economy::{solve, EquilibriumInputs, OverridePolicy, PropensityWalk};
use crate::models::{EconomicState, FlowMatrix, OutlierFlags, SimulationHistory, Variable};
use crate::rng::{RandomSource, RngManager};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete engine configuration
///
/// Deserializes from JSON with `initial_consumption`, `initial_wages`,
/// `rng_seed`, `override_policy` and `detector` optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Half-width of the uniform propensity shock, > 0
    pub volatility: f64,

    /// History capacity, >= 2
    pub memory: usize,

    /// Initial `[alpha, rho]`, each in `[0, 1]`
    pub propensities: [f64; 2],

    /// Initial `[savings_households, savings_firms]`
    pub savings: [f64; 2],

    #[serde(default)]
    pub initial_consumption: f64,

    #[serde(default)]
    pub initial_wages: f64,

    /// Seed for the default xorshift source
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,

    #[serde(default)]
    pub override_policy: OverridePolicy,

    #[serde(default)]
    pub detector: DetectorConfig,
}

fn default_rng_seed() -> u64 {
    12345
}

impl EngineConfig {
    /// Config with defaults for everything but the four required parameters
    pub fn new(volatility: f64, memory: usize, propensities: [f64; 2], savings: [f64; 2]) -> Self {
        Self {
            volatility,
            memory,
            propensities,
            savings,
            initial_consumption: 0.0,
            initial_wages: 0.0,
            rng_seed: default_rng_seed(),
            override_policy: OverridePolicy::default(),
            detector: DetectorConfig::default(),
        }
    }

    pub fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    pub fn with_initial_flows(mut self, consumption: f64, wages: f64) -> Self {
        self.initial_consumption = consumption;
        self.initial_wages = wages;
        self
    }

    pub fn with_override_policy(mut self, policy: OverridePolicy) -> Self {
        self.override_policy = policy;
        self
    }

    pub fn with_detector(mut self, detector: DetectorConfig) -> Self {
        self.detector = detector;
        self
    }

    /// Parse a config from JSON
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| {
            SimulationError::DeserializationError(format!("Failed to parse config JSON: {}", e))
        })
    }
}

// ============================================================================
// Errors and Results
// ============================================================================

/// Simulation error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Construction-time parameter validation failed
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Checkpoint could not be serialized
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Checkpoint or config could not be parsed
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Checkpoint was taken under a different config
    #[error("Config mismatch: checkpoint has {expected}, engine config has {actual}")]
    ConfigMismatch { expected: String, actual: String },

    /// Checkpoint violates an engine invariant
    #[error("State validation error: {0}")]
    StateValidationError(String),
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickResult {
    /// Tick number of the new state (1 for the first step)
    pub tick: usize,

    pub alpha: f64,
    pub rho: f64,

    pub alpha_outlier: bool,
    pub rho_outlier: bool,

    /// Equilibrium was degenerate and the previous flows were reused
    pub degenerate: bool,
}

// ============================================================================
// Engine
// ============================================================================

/// Stateful stepper owning the bounded history
///
/// Not meant for concurrent use: `step` takes `&mut self`, so callers that
/// share an engine must serialize access themselves (e.g. behind a mutex).
///
/// # Determinism
///
/// All randomness comes from `rng`. Same config + same random source state +
/// same override sequence = identical history.
#[derive(Debug, Clone)]
pub struct SimulationEngine<R = RngManager> {
    config: EngineConfig,
    walk: PropensityWalk,
    history: SimulationHistory,
    rng: R,
    current_tick: usize,
}

impl SimulationEngine<RngManager> {
    /// Create an engine with the seeded xorshift source from `config.rng_seed`
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when volatility <= 0, memory < 2, a propensity is
    /// outside `[0, 1]`, or the detector config is invalid.
    pub fn new(config: EngineConfig) -> Result<Self, SimulationError> {
        let rng = RngManager::new(config.rng_seed);
        Self::with_rng(config, rng)
    }

    /// Current state of the default random source
    pub fn rng_state(&self) -> u64 {
        self.rng.get_state()
    }
}

impl<R: RandomSource> SimulationEngine<R> {
    /// Create an engine drawing shocks from a caller-supplied source
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self, SimulationError> {
        validate_config(&config)?;

        let seed = EconomicState::new(
            config.propensities[0],
            config.propensities[1],
            config.savings[0],
            config.savings[1],
            config.initial_consumption,
            config.initial_wages,
            OutlierFlags::seed(),
        );
        let history = SimulationHistory::new(config.memory, seed);

        info!(
            "Economy engine created: volatility={}, memory={}, alpha={}, rho={}",
            config.volatility, config.memory, config.propensities[0], config.propensities[1]
        );

        Ok(Self::from_parts(config, history, rng, 0))
    }

    pub(crate) fn from_parts(
        config: EngineConfig,
        history: SimulationHistory,
        rng: R,
        current_tick: usize,
    ) -> Self {
        let walk = PropensityWalk::new(config.volatility, config.override_policy);
        Self {
            config,
            walk,
            history,
            rng,
            current_tick,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Ticks elapsed since construction
    pub fn current_tick(&self) -> usize {
        self.current_tick
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn memory(&self) -> usize {
        self.config.memory
    }

    pub fn volatility(&self) -> f64 {
        self.config.volatility
    }

    pub fn latest(&self) -> &EconomicState {
        self.history.latest()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Read-only view of the history, oldest first
    pub fn history_snapshot(&self) -> impl ExactSizeIterator<Item = &EconomicState> + '_ {
        self.history.iter()
    }

    pub fn history(&self) -> &SimulationHistory {
        &self.history
    }

    /// Recent values of one variable, oldest first
    pub fn values(&self, variable: Variable) -> Vec<f64> {
        self.history.values(variable)
    }

    // ========================================================================
    // Tick Loop
    // ========================================================================

    /// Advance the economy by one tick
    ///
    /// Finite `Some(v)` overrides replace the random walk for that propensity
    /// (and are passed through the configured [`OverridePolicy`]); NaN and
    /// infinite overrides are ignored with a warning. Never fails:
    /// equilibrium degeneracy and detector errors are absorbed.
    pub fn step(&mut self, alpha_override: Option<f64>, rho_override: Option<f64>) -> TickResult {
        let prev = self.history.latest();

        // STEP 1: PROPENSITIES
        let alpha = self.walk.next(prev.alpha(), alpha_override, &mut self.rng);
        let rho = self.walk.next(prev.rho(), rho_override, &mut self.rng);

        // STEP 2-3: EQUILIBRIUM AND SAVINGS
        let eq = solve(EquilibriumInputs {
            alpha,
            rho,
            savings_households: prev.savings_households(),
            savings_firms: prev.savings_firms(),
            previous_consumption: prev.consumption(),
            previous_wages: prev.wages(),
        });
        if eq.degenerate {
            warn!(
                "Degenerate equilibrium at tick {} (alpha={}, rho={}); reusing previous flows",
                self.current_tick.saturating_add(1),
                alpha,
                rho
            );
        }

        // STEP 4: ANOMALY DETECTION
        let (alpha_outlier, rho_outlier) = if self.history.is_full() {
            let alpha_series = self.history.values_with(Variable::Alpha, alpha);
            let rho_series = self.history.values_with(Variable::Rho, rho);
            (
                self.check_series(Variable::Alpha, &alpha_series),
                self.check_series(Variable::Rho, &rho_series),
            )
        } else {
            (false, false)
        };
        let outliers = prev
            .outliers()
            .extended(alpha_outlier, rho_outlier, self.config.memory);

        // STEP 5: APPEND
        let state = EconomicState::new(
            alpha,
            rho,
            eq.savings_households,
            eq.savings_firms,
            eq.consumption,
            eq.wages,
            outliers,
        );
        self.history.push(state);

        // STEP 6: ADVANCE TIME
        self.current_tick = self.current_tick.saturating_add(1);

        if alpha_outlier || rho_outlier {
            info!(
                "Anomaly at tick {}: alpha_outlier={}, rho_outlier={}",
                self.current_tick, alpha_outlier, rho_outlier
            );
        }

        TickResult {
            tick: self.current_tick,
            alpha,
            rho,
            alpha_outlier,
            rho_outlier,
            degenerate: eq.degenerate,
        }
    }

    /// Run the detector; any detector error counts as "no anomaly"
    fn check_series(&self, variable: Variable, series: &[f64]) -> bool {
        match detect_anomaly(series, &self.config.detector) {
            Ok(flag) => flag,
            Err(e) => {
                log_detector_error(self.current_tick.saturating_add(1), variable, &e);
                false
            }
        }
    }

    /// Normalized flow matrix of the latest state
    pub fn get_matrix(&self) -> FlowMatrix {
        FlowMatrix::from_state(self.history.latest())
    }
}

fn log_detector_error(tick: usize, variable: Variable, error: &AnomalyError) {
    debug!(
        "Anomaly check skipped at tick {} for {:?}: {}",
        tick, variable, error
    );
}

/// Validate construction parameters
pub(crate) fn validate_config(config: &EngineConfig) -> Result<(), SimulationError> {
    if !(config.volatility.is_finite() && config.volatility > 0.0) {
        return Err(SimulationError::InvalidParameter(format!(
            "volatility must be > 0, got {}",
            config.volatility
        )));
    }

    if config.memory < 2 {
        return Err(SimulationError::InvalidParameter(format!(
            "memory must be >= 2, got {}",
            config.memory
        )));
    }

    for (name, value) in ["alpha", "rho"].iter().zip(config.propensities) {
        if !(0.0..=1.0).contains(&value) {
            return Err(SimulationError::InvalidParameter(format!(
                "{} must be in [0, 1], got {}",
                name, value
            )));
        }
    }

    config
        .detector
        .validate()
        .map_err(|e| SimulationError::InvalidParameter(e.to_string()))?;

    Ok(())
}
