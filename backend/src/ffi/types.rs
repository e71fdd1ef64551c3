//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and Python dicts.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::anomaly::{DecompositionModel, DetectorConfig};
use crate::economy::OverridePolicy;
use crate::models::EconomicState;
use crate::orchestrator::{EngineConfig, TickResult};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field, raising ValueError when missing
fn extract_required<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| PyValueError::new_err(format!("Missing required field '{}'", key)))?
        .extract()
}

/// Extract an optional field; `None` when missing or Python `None`
fn extract_optional<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<T>>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) if !value.is_none() => Ok(Some(value.extract()?)),
        _ => Ok(None),
    }
}

fn extract_pair<'py>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<[f64; 2]> {
    let values: Vec<f64> = extract_required(dict, key)?;
    match values.as_slice() {
        [a, b] => Ok([*a, *b]),
        _ => Err(PyValueError::new_err(format!(
            "Field '{}' must have exactly 2 values, got {}",
            key,
            values.len()
        ))),
    }
}

// ========================================================================
// Config Parsing
// ========================================================================

/// Build an `EngineConfig` from a Python dict
///
/// Required: `volatility`, `memory`, `propensities`, `savings`.
/// Optional: `initial_consumption`, `initial_wages`, `rng_seed`,
/// `override_policy` ("verbatim" | "clamp"), `detector` (dict with `model`,
/// `seasonality`, `iqr_factor`).
pub fn parse_engine_config(dict: &Bound<'_, PyDict>) -> PyResult<EngineConfig> {
    let mut config = EngineConfig::new(
        extract_required(dict, "volatility")?,
        extract_required(dict, "memory")?,
        extract_pair(dict, "propensities")?,
        extract_pair(dict, "savings")?,
    );

    if let Some(consumption) = extract_optional(dict, "initial_consumption")? {
        config.initial_consumption = consumption;
    }
    if let Some(wages) = extract_optional(dict, "initial_wages")? {
        config.initial_wages = wages;
    }
    if let Some(seed) = extract_optional(dict, "rng_seed")? {
        config.rng_seed = seed;
    }
    if let Some(policy) = extract_optional::<String>(dict, "override_policy")? {
        config.override_policy = parse_override_policy(&policy)?;
    }
    if let Some(detector) = extract_optional::<Bound<'_, PyDict>>(dict, "detector")? {
        config.detector = parse_detector_config(&detector)?;
    }

    Ok(config)
}

fn parse_override_policy(value: &str) -> PyResult<OverridePolicy> {
    match value {
        "verbatim" => Ok(OverridePolicy::Verbatim),
        "clamp" => Ok(OverridePolicy::Clamp),
        other => Err(PyValueError::new_err(format!(
            "Unknown override_policy '{}' (expected 'verbatim' or 'clamp')",
            other
        ))),
    }
}

fn parse_detector_config(dict: &Bound<'_, PyDict>) -> PyResult<DetectorConfig> {
    let mut detector = DetectorConfig::default();

    if let Some(model) = extract_optional::<String>(dict, "model")? {
        detector.model = match model.as_str() {
            "additive" => DecompositionModel::Additive,
            "multiplicative" => DecompositionModel::Multiplicative,
            other => {
                return Err(PyValueError::new_err(format!(
                    "Unknown decomposition model '{}'",
                    other
                )))
            }
        };
    }
    if let Some(seasonality) = extract_optional(dict, "seasonality")? {
        detector.seasonality = seasonality;
    }
    if let Some(factor) = extract_optional(dict, "iqr_factor")? {
        detector.iqr_factor = factor;
    }

    Ok(detector)
}

// ========================================================================
// Rust → Python
// ========================================================================

pub fn tick_result_to_py(py: Python<'_>, result: &TickResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("tick", result.tick)?;
    dict.set_item("alpha", result.alpha)?;
    dict.set_item("rho", result.rho)?;
    dict.set_item("alpha_outlier", result.alpha_outlier)?;
    dict.set_item("rho_outlier", result.rho_outlier)?;
    dict.set_item("degenerate", result.degenerate)?;
    Ok(dict.unbind())
}

pub fn state_to_py(py: Python<'_>, state: &EconomicState) -> PyResult<Py<PyDict>> {
    let outliers = PyDict::new_bound(py);
    outliers.set_item("alpha", state.outliers().alpha().to_vec())?;
    outliers.set_item("rho", state.outliers().rho().to_vec())?;

    let dict = PyDict::new_bound(py);
    dict.set_item("alpha", state.alpha())?;
    dict.set_item("rho", state.rho())?;
    dict.set_item("savings_households", state.savings_households())?;
    dict.set_item("savings_firms", state.savings_firms())?;
    dict.set_item("consumption", state.consumption())?;
    dict.set_item("wages", state.wages())?;
    dict.set_item("outliers", outliers)?;
    Ok(dict.unbind())
}
