//! Economy Simulator Core - Rust Engine
//!
//! Two-sector (household/firm) economy stepped one tick at a time, with
//! anomaly detection on the evolving propensities.
//!
//! # Architecture
//!
//! - **models**: Domain types (EconomicState, SimulationHistory, FlowMatrix)
//! - **economy**: Propensity random walk and equilibrium solver
//! - **anomaly**: Seasonal decomposition + IQR outlier test
//! - **orchestrator**: Simulation engine and checkpointing
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. History never holds more than `memory` states
//! 2. All randomness is deterministic (seeded, injectable RNG)
//! 3. `step` never fails; degeneracies are absorbed
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod anomaly;
pub mod economy;
pub mod models;
pub mod orchestrator;
pub mod rng;

// Re-exports for convenience
pub use anomaly::{detect_anomaly, AnomalyError, DecompositionModel, DetectorConfig};
pub use economy::{OverridePolicy, PropensityWalk};
pub use models::{
    EconomicState, FlowMatrix, OutlierFlags, SimulationHistory, Variable, PROPENSITY_MAX,
    PROPENSITY_MIN,
};
pub use orchestrator::{EngineConfig, EngineSnapshot, SimulationEngine, SimulationError, TickResult};
pub use rng::{RandomSource, RngManager};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn economy_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::economy::PyEconomy>()?;
    Ok(())
}
