//! Anomaly detection on short propensity series
//!
//! A series is split into trend, seasonal and residual components by a
//! classical moving-average decomposition, then the newest residual is
//! checked against interquartile-range fences computed over all residuals.
//!
//! The detector is pure: the same series and config always give the same
//! answer.
//!
//! # Example
//!
//! ```rust
//! use economy_simulator_core_rs::anomaly::{detect_anomaly, DetectorConfig};
//!
//! let mut series = vec![1.0; 19];
//! series.push(5.0);
//!
//! let config = DetectorConfig::default();
//! assert!(detect_anomaly(&series, &config).unwrap());
//! assert!(!detect_anomaly(&series[..19], &config).unwrap());
//! ```

pub mod decompose;
pub mod iqr;

pub use decompose::{decompose, Decomposition};
pub use iqr::{is_latest_outlier, iqr_bounds, percentile, IqrBounds};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the detector
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnomalyError {
    #[error("Time series must not be empty")]
    EmptyInput,

    #[error("Insufficient data: need at least {required} usable observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    #[error("Multiplicative decomposition requires positive values; index {index} is not")]
    NonPositiveValue { index: usize },

    #[error("Invalid detector config: {0}")]
    InvalidConfig(String),
}

/// How the components combine into the observed series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecompositionModel {
    /// `y = trend + seasonal + residual`
    #[default]
    Additive,
    /// `y = trend × seasonal × residual`
    Multiplicative,
}

/// Detector parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub model: DecompositionModel,

    /// Seasonal period as a fraction of the series length, in `(0, 1)`
    pub seasonality: f64,

    /// IQR fence multiplier (1.5 = outliers, 3.0 = extreme outliers)
    pub iqr_factor: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model: DecompositionModel::Additive,
            seasonality: 0.05,
            iqr_factor: 1.5,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), AnomalyError> {
        if !(self.seasonality > 0.0 && self.seasonality < 1.0) {
            return Err(AnomalyError::InvalidConfig(format!(
                "seasonality must be in (0, 1), got {}",
                self.seasonality
            )));
        }
        if !self.iqr_factor.is_finite() || self.iqr_factor < 0.0 {
            return Err(AnomalyError::InvalidConfig(format!(
                "iqr_factor must be finite and >= 0, got {}",
                self.iqr_factor
            )));
        }
        Ok(())
    }

    /// Seasonal period for a series of `len` observations
    ///
    /// `max(2, ceil(len × seasonality))`
    pub fn period_for(&self, len: usize) -> usize {
        let period = (len as f64 * self.seasonality).ceil();
        if period.is_finite() && period > 2.0 {
            period as usize
        } else {
            2
        }
    }
}

/// Is the newest observation of `timeseries` anomalous?
///
/// Returns `Ok(true)` when the last residual falls strictly outside the
/// `[Q1 − f·IQR, Q3 + f·IQR]` fences of all residuals.
///
/// # Errors
///
/// - `EmptyInput` for an empty series (checked before anything else)
/// - `NonFiniteValue`, `NonPositiveValue` (multiplicative only) for bad input
/// - `InsufficientData` when the series is shorter than two periods or no
///   residual could be computed
/// - `InvalidConfig` for an out-of-range config
pub fn detect_anomaly(timeseries: &[f64], config: &DetectorConfig) -> Result<bool, AnomalyError> {
    if timeseries.is_empty() {
        return Err(AnomalyError::EmptyInput);
    }
    config.validate()?;

    let period = config.period_for(timeseries.len());
    let decomposition = decompose(timeseries, period, config.model)?;

    let residuals = decomposition.finite_residuals();
    if residuals.is_empty() {
        return Err(AnomalyError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    Ok(is_latest_outlier(&residuals, config.iqr_factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_has_floor_of_two() {
        let config = DetectorConfig::default();
        assert_eq!(config.period_for(6), 2);
        assert_eq!(config.period_for(40), 2);
        assert_eq!(config.period_for(41), 3);
        assert_eq!(config.period_for(100), 5);
    }

    #[test]
    fn test_empty_checked_before_config() {
        let config = DetectorConfig {
            seasonality: 7.0,
            ..DetectorConfig::default()
        };
        assert_eq!(detect_anomaly(&[], &config), Err(AnomalyError::EmptyInput));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DetectorConfig {
            iqr_factor: -1.0,
            ..DetectorConfig::default()
        };
        assert!(matches!(
            detect_anomaly(&[1.0; 10], &config),
            Err(AnomalyError::InvalidConfig(_))
        ));

        let config = DetectorConfig {
            seasonality: 0.0,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_short_series_is_insufficient() {
        let result = detect_anomaly(&[0.5, 0.6, 0.7], &DetectorConfig::default());
        assert_eq!(
            result,
            Err(AnomalyError::InsufficientData {
                required: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: DetectorConfig = serde_json::from_str(r#"{"model": "multiplicative"}"#).unwrap();
        assert_eq!(config.model, DecompositionModel::Multiplicative);
        assert_eq!(config.seasonality, 0.05);
        assert_eq!(config.iqr_factor, 1.5);
    }
}
