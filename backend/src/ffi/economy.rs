//! PyO3 wrapper for SimulationEngine

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{parse_engine_config, state_to_py, tick_result_to_py};
use crate::orchestrator::SimulationEngine;

/// Python wrapper for the economy engine
///
/// # Example (from Python)
///
/// ```python
/// from economy_simulator_core_rs import Economy
///
/// econ = Economy({
///     "volatility": 0.05,
///     "memory": 20,
///     "propensities": [0.5, 0.5],
///     "savings": [100.0, 100.0],
/// })
/// result = econ.step()
/// econ.step(alpha=0.9)
/// matrix = econ.get_matrix()
/// ```
#[pyclass(name = "Economy")]
pub struct PyEconomy {
    inner: SimulationEngine,
}

#[pymethods]
impl PyEconomy {
    /// Create an engine from a config dict
    ///
    /// Raises ValueError for missing/ill-typed fields or invalid parameters.
    #[new]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let config = parse_engine_config(config)?;
        let inner = SimulationEngine::new(config)
            .map_err(|e| PyValueError::new_err(format!("Failed to create engine: {}", e)))?;
        Ok(Self { inner })
    }

    /// Advance one tick, optionally overriding alpha and/or rho
    #[pyo3(signature = (alpha=None, rho=None))]
    fn step(&mut self, py: Python<'_>, alpha: Option<f64>, rho: Option<f64>) -> PyResult<Py<PyDict>> {
        let result = self.inner.step(alpha, rho);
        tick_result_to_py(py, &result)
    }

    /// Normalized 2×2 flow matrix as nested lists
    fn get_matrix(&self) -> Vec<Vec<f64>> {
        self.inner
            .get_matrix()
            .as_array()
            .iter()
            .map(|row| row.to_vec())
            .collect()
    }

    /// History as a list of dicts, oldest first
    fn history(&self, py: Python<'_>) -> PyResult<Vec<Py<PyDict>>> {
        self.inner
            .history_snapshot()
            .map(|state| state_to_py(py, state))
            .collect()
    }

    fn current_tick(&self) -> usize {
        self.inner.current_tick()
    }

    fn history_len(&self) -> usize {
        self.inner.history_len()
    }

    /// Serialize the engine to a JSON checkpoint string
    fn save_state(&self) -> PyResult<String> {
        self.inner
            .save_state()
            .map_err(|e| PyRuntimeError::new_err(format!("Failed to save state: {}", e)))
    }

    /// Restore an engine from a checkpoint taken under the same config
    #[staticmethod]
    fn load_state(config: &Bound<'_, PyDict>, state_json: &str) -> PyResult<Self> {
        let config = parse_engine_config(config)?;
        let inner = SimulationEngine::load_state(config, state_json)
            .map_err(|e| PyRuntimeError::new_err(format!("Failed to load state: {}", e)))?;
        Ok(Self { inner })
    }
}
