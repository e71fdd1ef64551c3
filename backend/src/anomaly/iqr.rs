//! Interquartile-range outlier test
//!
//! Values below `Q1 − k·IQR` or above `Q3 + k·IQR` are outliers. Quartiles
//! use linear interpolation between closest ranks.

/// Outlier fences for a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Strictly outside the fences
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Quantile `q ∈ [0, 1]` of an ascending-sorted, non-empty slice
///
/// Uses rank `q·(n − 1)` with linear interpolation.
///
/// # Example
///
/// ```rust
/// use economy_simulator_core_rs::anomaly::percentile;
///
/// let sorted = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(percentile(&sorted, 0.25), 1.75);
/// assert_eq!(percentile(&sorted, 0.5), 2.5);
/// ```
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
        }
    }
}

/// Fences for `values` with multiplier `factor`; `None` for an empty sample
pub fn iqr_bounds(values: &[f64], factor: f64) -> Option<IqrBounds> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = percentile(&sorted, 0.25);
    let q3 = percentile(&sorted, 0.75);
    let spread = q3 - q1;

    Some(IqrBounds {
        q1,
        q3,
        lower: q1 - factor * spread,
        upper: q3 + factor * spread,
    })
}

/// Is the last value an outlier relative to the whole sample (itself
/// included)?
pub fn is_latest_outlier(values: &[f64], factor: f64) -> bool {
    match (values.last(), iqr_bounds(values, factor)) {
        (Some(&latest), Some(bounds)) => bounds.is_outlier(latest),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&sorted, 0.0), 10.0);
        assert_eq!(percentile(&sorted, 0.25), 20.0);
        assert_eq!(percentile(&sorted, 0.75), 40.0);
        assert_eq!(percentile(&sorted, 1.0), 50.0);
        assert_eq!(percentile(&sorted, 0.1), 14.0);
    }

    #[test]
    fn test_bounds_for_known_sample() {
        let bounds = iqr_bounds(&[4.0, 1.0, 3.0, 2.0, 5.0], 1.5).unwrap();
        assert_eq!(bounds.q1, 2.0);
        assert_eq!(bounds.q3, 4.0);
        assert_eq!(bounds.iqr(), 2.0);
        assert_eq!(bounds.lower, -1.0);
        assert_eq!(bounds.upper, 7.0);
    }

    #[test]
    fn test_only_last_value_is_tested() {
        // The early spike is an outlier but is not the latest value
        assert!(!is_latest_outlier(&[100.0, 1.0, 1.1, 0.9, 1.0, 1.05], 1.5));
        assert!(is_latest_outlier(&[1.0, 1.1, 0.9, 1.0, 1.05, 100.0], 1.5));
    }

    #[test]
    fn test_zero_spread_flags_any_difference() {
        assert!(!is_latest_outlier(&[0.0; 8], 1.5));
        let mut values = vec![0.0; 8];
        values.push(1e-6);
        assert!(is_latest_outlier(&values, 1.5));
    }

    #[test]
    fn test_empty_sample_is_not_outlier() {
        assert!(!is_latest_outlier(&[], 1.5));
        assert!(iqr_bounds(&[], 1.5).is_none());
    }
}
