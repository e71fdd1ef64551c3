//! Propensity random walk
//!
//! Each tick, a propensity either takes a caller-supplied override or moves
//! by a uniform shock in `[-volatility, +volatility)` and is clamped back into
//! `[PROPENSITY_MIN, PROPENSITY_MAX]`. Non-finite overrides are ignored and
//! the walk runs instead.

use crate::models::state::{PROPENSITY_MAX, PROPENSITY_MIN};
use crate::rng::RandomSource;
use log::warn;
use serde::{Deserialize, Serialize};

/// Clamp a propensity into `[0.01, 0.99]`
///
/// NaN maps to the midpoint of the range.
pub fn clamp_propensity(value: f64) -> f64 {
    if value.is_nan() {
        return (PROPENSITY_MIN + PROPENSITY_MAX) / 2.0;
    }
    value.clamp(PROPENSITY_MIN, PROPENSITY_MAX)
}

/// What happens to a manual override before it is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverridePolicy {
    /// Store the override exactly as given
    #[default]
    Verbatim,
    /// Clamp the override into `[0.01, 0.99]` like a random-walk value
    Clamp,
}

impl OverridePolicy {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            OverridePolicy::Verbatim => value,
            OverridePolicy::Clamp => clamp_propensity(value),
        }
    }
}

/// Random walk with a fixed step size
///
/// # Example
///
/// ```rust
/// use economy_simulator_core_rs::{OverridePolicy, PropensityWalk, RngManager};
///
/// let walk = PropensityWalk::new(0.05, OverridePolicy::Verbatim);
/// let mut rng = RngManager::new(1);
///
/// let next = walk.next(0.5, None, &mut rng);
/// assert!((0.44..0.56).contains(&next));
///
/// // Overrides bypass the random source entirely
/// assert_eq!(walk.next(0.5, Some(1.5), &mut rng), 1.5);
///
/// // ...unless they are not finite
/// assert!((0.44..0.56).contains(&walk.next(0.5, Some(f64::NAN), &mut rng)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropensityWalk {
    volatility: f64,
    override_policy: OverridePolicy,
}

impl PropensityWalk {
    pub fn new(volatility: f64, override_policy: OverridePolicy) -> Self {
        Self {
            volatility,
            override_policy,
        }
    }

    /// Resolve the next propensity value
    ///
    /// The random source is only drawn from when there is no finite override.
    pub fn next<R: RandomSource + ?Sized>(
        &self,
        previous: f64,
        override_value: Option<f64>,
        rng: &mut R,
    ) -> f64 {
        match override_value {
            Some(value) if value.is_finite() => self.override_policy.apply(value),
            Some(value) => {
                warn!("Ignoring non-finite propensity override {}", value);
                self.walk(previous, rng)
            }
            None => self.walk(previous, rng),
        }
    }

    fn walk<R: RandomSource + ?Sized>(&self, previous: f64, rng: &mut R) -> f64 {
        let shock = rng.uniform(-self.volatility, self.volatility);
        clamp_propensity(previous + shock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always returns the same end of the interval
    struct Extreme {
        high: bool,
        draws: usize,
    }

    impl RandomSource for Extreme {
        fn uniform(&mut self, low: f64, high: f64) -> f64 {
            self.draws += 1;
            if self.high {
                high
            } else {
                low
            }
        }
    }

    #[test]
    fn test_walk_clamps_at_upper_bound() {
        let walk = PropensityWalk::new(0.5, OverridePolicy::Verbatim);
        let mut rng = Extreme { high: true, draws: 0 };
        assert_eq!(walk.next(0.9, None, &mut rng), PROPENSITY_MAX);
    }

    #[test]
    fn test_walk_clamps_at_lower_bound() {
        let walk = PropensityWalk::new(0.5, OverridePolicy::Verbatim);
        let mut rng = Extreme { high: false, draws: 0 };
        assert_eq!(walk.next(0.1, None, &mut rng), PROPENSITY_MIN);
    }

    #[test]
    fn test_override_skips_rng() {
        let walk = PropensityWalk::new(0.5, OverridePolicy::Verbatim);
        let mut rng = Extreme { high: true, draws: 0 };
        assert_eq!(walk.next(0.5, Some(0.0), &mut rng), 0.0);
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn test_clamp_policy_bounds_override() {
        let walk = PropensityWalk::new(0.05, OverridePolicy::Clamp);
        let mut rng = Extreme { high: true, draws: 0 };
        assert_eq!(walk.next(0.5, Some(1.0), &mut rng), PROPENSITY_MAX);
        assert_eq!(walk.next(0.5, Some(-3.0), &mut rng), PROPENSITY_MIN);
        assert_eq!(walk.next(0.5, Some(0.42), &mut rng), 0.42);
    }

    #[test]
    fn test_non_finite_override_falls_back_to_walk() {
        for policy in [OverridePolicy::Verbatim, OverridePolicy::Clamp] {
            let walk = PropensityWalk::new(0.05, policy);
            let mut rng = Extreme { high: true, draws: 0 };
            for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                assert_eq!(walk.next(0.5, Some(value), &mut rng), 0.55);
            }
            assert_eq!(rng.draws, 3);
        }
    }

    #[test]
    fn test_clamp_maps_nan_to_midpoint() {
        assert_eq!(clamp_propensity(f64::NAN), 0.5);
        assert_eq!(clamp_propensity(f64::INFINITY), PROPENSITY_MAX);
        assert_eq!(clamp_propensity(f64::NEG_INFINITY), PROPENSITY_MIN);
    }
}
