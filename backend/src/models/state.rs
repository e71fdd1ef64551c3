//! Economic State
//!
//! One immutable record per simulation tick.
//!
//! # Critical Invariants
//!
//! 1. **Immutability**: A state is never modified after it is appended to
//!    the history; the next tick always produces a fresh record.
//! 2. **Flag Cardinality**: Each outlier window holds exactly as many flags
//!    as the history that contains the state, newest last.

use serde::{Deserialize, Serialize};

/// Lower bound of the propensity random walk
pub const PROPENSITY_MIN: f64 = 0.01;

/// Upper bound of the propensity random walk
pub const PROPENSITY_MAX: f64 = 0.99;

/// Trailing outlier windows for the tracked propensities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierFlags {
    alpha: Vec<bool>,
    rho: Vec<bool>,
}

impl OutlierFlags {
    /// Flags for a freshly seeded history: nothing flagged
    pub fn seed() -> Self {
        Self {
            alpha: vec![false],
            rho: vec![false],
        }
    }

    pub fn new(alpha: Vec<bool>, rho: Vec<bool>) -> Self {
        Self { alpha, rho }
    }

    /// Extend both windows by one flag, keeping at most `window` entries
    pub fn extended(&self, alpha_flag: bool, rho_flag: bool, window: usize) -> Self {
        Self {
            alpha: push_capped(&self.alpha, alpha_flag, window),
            rho: push_capped(&self.rho, rho_flag, window),
        }
    }

    pub fn alpha(&self) -> &[bool] {
        &self.alpha
    }

    pub fn rho(&self) -> &[bool] {
        &self.rho
    }

    /// Flag for the newest alpha value
    pub fn latest_alpha(&self) -> bool {
        self.alpha.last().copied().unwrap_or(false)
    }

    /// Flag for the newest rho value
    pub fn latest_rho(&self) -> bool {
        self.rho.last().copied().unwrap_or(false)
    }
}

fn push_capped(flags: &[bool], flag: bool, window: usize) -> Vec<bool> {
    let skip = (flags.len() + 1).saturating_sub(window);
    flags
        .iter()
        .copied()
        .chain(std::iter::once(flag))
        .skip(skip)
        .collect()
}

/// Scalar fields of [`EconomicState`] that can be extracted as a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    Alpha,
    Rho,
    SavingsHouseholds,
    SavingsFirms,
    Consumption,
    Wages,
}

impl Variable {
    pub const ALL: [Variable; 6] = [
        Variable::Alpha,
        Variable::Rho,
        Variable::SavingsHouseholds,
        Variable::SavingsFirms,
        Variable::Consumption,
        Variable::Wages,
    ];
}

/// State of the two-sector economy at one tick
///
/// # Example
///
/// ```rust
/// use economy_simulator_core_rs::{EconomicState, OutlierFlags, Variable};
///
/// let state = EconomicState::new(0.5, 0.4, 100.0, 80.0, 0.0, 0.0, OutlierFlags::seed());
/// assert_eq!(state.alpha(), 0.5);
/// assert_eq!(state.value(Variable::SavingsFirms), 80.0);
/// assert_eq!(state.outliers().alpha(), &[false]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicState {
    /// Household propensity to consume
    alpha: f64,

    /// Firm propensity to pay wages
    rho: f64,

    savings_households: f64,
    savings_firms: f64,
    consumption: f64,
    wages: f64,

    outliers: OutlierFlags,
}

impl EconomicState {
    pub fn new(
        alpha: f64,
        rho: f64,
        savings_households: f64,
        savings_firms: f64,
        consumption: f64,
        wages: f64,
        outliers: OutlierFlags,
    ) -> Self {
        Self {
            alpha,
            rho,
            savings_households,
            savings_firms,
            consumption,
            wages,
            outliers,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn savings_households(&self) -> f64 {
        self.savings_households
    }

    pub fn savings_firms(&self) -> f64 {
        self.savings_firms
    }

    pub fn consumption(&self) -> f64 {
        self.consumption
    }

    pub fn wages(&self) -> f64 {
        self.wages
    }

    pub fn outliers(&self) -> &OutlierFlags {
        &self.outliers
    }

    /// Read any scalar field by name
    pub fn value(&self, variable: Variable) -> f64 {
        match variable {
            Variable::Alpha => self.alpha,
            Variable::Rho => self.rho,
            Variable::SavingsHouseholds => self.savings_households,
            Variable::SavingsFirms => self.savings_firms,
            Variable::Consumption => self.consumption,
            Variable::Wages => self.wages,
        }
    }

    /// Sum of both savings balances
    pub fn total_savings(&self) -> f64 {
        self.savings_households + self.savings_firms
    }

    /// Sum of the four flow-matrix entries
    pub fn total_flow(&self) -> f64 {
        self.consumption + self.wages + self.savings_households + self.savings_firms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_flags_are_unflagged() {
        let flags = OutlierFlags::seed();
        assert_eq!(flags.alpha(), &[false]);
        assert_eq!(flags.rho(), &[false]);
        assert!(!flags.latest_alpha());
    }

    #[test]
    fn test_extended_grows_until_window() {
        let flags = OutlierFlags::seed().extended(true, false, 3);
        assert_eq!(flags.alpha(), &[false, true]);
        assert_eq!(flags.rho(), &[false, false]);

        let flags = flags.extended(false, true, 3).extended(true, true, 3);
        assert_eq!(flags.alpha(), &[true, false, true]);
        assert_eq!(flags.rho(), &[false, true, true]);
        assert!(flags.latest_alpha());
        assert!(flags.latest_rho());
    }

    #[test]
    fn test_extended_does_not_touch_original() {
        let original = OutlierFlags::seed();
        let _ = original.extended(true, true, 2);
        assert_eq!(original, OutlierFlags::seed());
    }

    #[test]
    fn test_value_by_variable() {
        let state = EconomicState::new(0.3, 0.6, 10.0, 20.0, 5.0, 7.0, OutlierFlags::seed());
        let values: Vec<f64> = Variable::ALL.iter().map(|v| state.value(*v)).collect();
        assert_eq!(values, vec![0.3, 0.6, 10.0, 20.0, 5.0, 7.0]);
        assert_eq!(state.total_savings(), 30.0);
        assert_eq!(state.total_flow(), 42.0);
    }
}
