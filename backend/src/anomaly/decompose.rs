//! Classical seasonal decomposition
//!
//! Trend is a centred moving average over one period. Its undefined edges are
//! filled by extending a least-squares line through the nearest `period`
//! trend values, so every observation gets a residual.

use super::{AnomalyError, DecompositionModel};

/// Components of a decomposed series, all the same length as the input
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
    pub period: usize,
    pub model: DecompositionModel,
}

impl Decomposition {
    /// Residuals with non-finite entries removed, order preserved
    pub fn finite_residuals(&self) -> Vec<f64> {
        self.residual.iter().copied().filter(|r| r.is_finite()).collect()
    }
}

/// Decompose `series` with the given seasonal `period`
///
/// # Errors
///
/// - `EmptyInput` for an empty series
/// - `NonFiniteValue` if any observation is NaN or infinite
/// - `NonPositiveValue` for a multiplicative model with a value `<= 0`
/// - `InsufficientData` when the series holds fewer than two full periods
pub fn decompose(
    series: &[f64],
    period: usize,
    model: DecompositionModel,
) -> Result<Decomposition, AnomalyError> {
    if series.is_empty() {
        return Err(AnomalyError::EmptyInput);
    }
    if let Some(index) = series.iter().position(|v| !v.is_finite()) {
        return Err(AnomalyError::NonFiniteValue { index });
    }
    if model == DecompositionModel::Multiplicative {
        if let Some(index) = series.iter().position(|v| *v <= 0.0) {
            return Err(AnomalyError::NonPositiveValue { index });
        }
    }

    let period = period.max(2);
    let n = series.len();
    if n < 2 * period {
        return Err(AnomalyError::InsufficientData {
            required: 2 * period,
            actual: n,
        });
    }

    let centred = centred_moving_average(series, period);
    let trend = extrapolate_edges(&centred, period)?;

    let detrended: Vec<f64> = series
        .iter()
        .zip(&trend)
        .map(|(&y, &t)| match model {
            DecompositionModel::Additive => y - t,
            DecompositionModel::Multiplicative => y / t,
        })
        .collect();

    let indices = seasonal_indices(&detrended, period, model);
    let seasonal: Vec<f64> = (0..n).map(|i| indices[i % period]).collect();

    let residual: Vec<f64> = series
        .iter()
        .zip(&trend)
        .zip(&seasonal)
        .zip(&detrended)
        .map(|(((&y, &t), &s), &d)| match model {
            DecompositionModel::Additive => d - s,
            DecompositionModel::Multiplicative => y / s / t,
        })
        .collect();

    Ok(Decomposition {
        trend,
        seasonal,
        residual,
        period,
        model,
    })
}

/// Weights of the centred moving average for `period`
///
/// Odd periods use `period` equal weights. Even periods use `period + 1`
/// weights with the two ends halved, so the window stays centred.
fn filter_weights(period: usize) -> Vec<f64> {
    let p = period as f64;
    if period % 2 == 0 {
        let mut weights = vec![1.0 / p; period + 1];
        weights[0] = 0.5 / p;
        weights[period] = 0.5 / p;
        weights
    } else {
        vec![1.0 / p; period]
    }
}

/// Two-sided moving average; `None` where the window does not fit
fn centred_moving_average(series: &[f64], period: usize) -> Vec<Option<f64>> {
    let weights = filter_weights(period);
    let half = weights.len() / 2;
    let n = series.len();

    (0..n)
        .map(|i| {
            if i < half || i + half >= n {
                return None;
            }
            let window = &series[i - half..=i + half];
            Some(window.iter().zip(&weights).map(|(x, w)| x * w).sum())
        })
        .collect()
}

/// Fill undefined trend edges by linear extrapolation
///
/// The front is fitted on up to `npoints` defined values starting at the
/// first defined index (stopping before the last defined one); the back on
/// up to `npoints` values ending just before the last defined index.
fn extrapolate_edges(trend: &[Option<f64>], npoints: usize) -> Result<Vec<f64>, AnomalyError> {
    let insufficient = || AnomalyError::InsufficientData {
        required: 1,
        actual: 0,
    };
    let front = trend.iter().position(Option::is_some).ok_or_else(insufficient)?;
    let back = trend.iter().rposition(Option::is_some).ok_or_else(insufficient)?;

    let defined = |i: usize| trend[i].unwrap_or(f64::NAN);
    let mut filled: Vec<f64> = trend.iter().map(|t| t.unwrap_or(f64::NAN)).collect();

    if front == back {
        let only = defined(front);
        filled.iter_mut().for_each(|t| *t = only);
        return Ok(filled);
    }

    let front_last = (front + npoints).min(back);
    let (slope, intercept) = fit_line(front..front_last, &defined);
    for (i, t) in filled.iter_mut().enumerate().take(front) {
        *t = slope * i as f64 + intercept;
    }

    let back_first = back.saturating_sub(npoints).max(front);
    let (slope, intercept) = fit_line(back_first..back, &defined);
    for (i, t) in filled.iter_mut().enumerate().skip(back + 1) {
        *t = slope * i as f64 + intercept;
    }

    Ok(filled)
}

/// Least-squares line `y = slope·x + intercept` through `(i, value(i))`
///
/// A single point has infinitely many exact fits; the minimum-norm one is
/// returned.
fn fit_line(range: std::ops::Range<usize>, value: &impl Fn(usize) -> f64) -> (f64, f64) {
    let m = range.len() as f64;
    match range.len() {
        0 => (0.0, 0.0),
        1 => {
            let x = range.start as f64;
            let y = value(range.start);
            let norm = x * x + 1.0;
            (x * y / norm, y / norm)
        }
        _ => {
            let x_mean = range.clone().map(|i| i as f64).sum::<f64>() / m;
            let y_mean = range.clone().map(value).sum::<f64>() / m;

            let (mut sxy, mut sxx) = (0.0, 0.0);
            for i in range {
                let dx = i as f64 - x_mean;
                sxy += dx * (value(i) - y_mean);
                sxx += dx * dx;
            }
            let slope = sxy / sxx;
            (slope, y_mean - slope * x_mean)
        }
    }
}

/// Per-phase average of the detrended series, centred on 0 (additive) or 1
/// (multiplicative)
fn seasonal_indices(detrended: &[f64], period: usize, model: DecompositionModel) -> Vec<f64> {
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];

    for (i, d) in detrended.iter().enumerate() {
        if d.is_finite() {
            sums[i % period] += d;
            counts[i % period] += 1;
        }
    }

    let mut indices: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(s, &c)| if c > 0 { s / c as f64 } else { f64::NAN })
        .collect();

    let mean = indices.iter().sum::<f64>() / period as f64;
    for index in &mut indices {
        match model {
            DecompositionModel::Additive => *index -= mean,
            DecompositionModel::Multiplicative => *index /= mean,
        }
    }
    indices
}
