//! Equilibrium solver
//!
//! Given the current propensities and the previous tick's savings, solves
//!
//! ```text
//! c = (1/α − ρ)⁻¹ · (ρ·S_f + S_h)
//! w = (1/ρ − α)⁻¹ · (α·S_h + S_f)
//! ```
//!
//! and moves savings by the net flow: `S_h' = S_h + w − c`,
//! `S_f' = S_f + c − w`. Total savings is conserved on every tick.
//!
//! # Degeneracy
//!
//! When either divisor `1/α − ρ` or `1/ρ − α` is zero or non-finite the
//! system has no unique solution. The solver then reuses the previous tick's
//! consumption and wages (both together) and flags the result as degenerate.

/// Everything the solver needs from the previous tick and the new propensities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumInputs {
    pub alpha: f64,
    pub rho: f64,
    pub savings_households: f64,
    pub savings_firms: f64,
    /// Fallback consumption for a degenerate tick
    pub previous_consumption: f64,
    /// Fallback wages for a degenerate tick
    pub previous_wages: f64,
}

/// Solved flows and updated savings for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equilibrium {
    pub consumption: f64,
    pub wages: f64,
    pub savings_households: f64,
    pub savings_firms: f64,
    /// True when the previous flows were reused
    pub degenerate: bool,
}

/// Solve one equilibrium tick
///
/// # Example
///
/// ```rust
/// use economy_simulator_core_rs::economy::{solve, EquilibriumInputs};
///
/// let eq = solve(EquilibriumInputs {
///     alpha: 0.5,
///     rho: 0.5,
///     savings_households: 100.0,
///     savings_firms: 100.0,
///     previous_consumption: 0.0,
///     previous_wages: 0.0,
/// });
///
/// // Symmetric economy: c = w = 150/1.5 = 100
/// assert!((eq.consumption - 100.0).abs() < 1e-9);
/// assert!((eq.wages - 100.0).abs() < 1e-9);
/// assert!(!eq.degenerate);
/// ```
pub fn solve(inputs: EquilibriumInputs) -> Equilibrium {
    let EquilibriumInputs {
        alpha,
        rho,
        savings_households: sh,
        savings_firms: sf,
        previous_consumption,
        previous_wages,
    } = inputs;

    let household_divisor = 1.0 / alpha - rho;
    let firm_divisor = 1.0 / rho - alpha;

    let (consumption, wages, degenerate) =
        if is_degenerate(household_divisor) || is_degenerate(firm_divisor) {
            (previous_consumption, previous_wages, true)
        } else {
            (
                (rho * sf + sh) / household_divisor,
                (alpha * sh + sf) / firm_divisor,
                false,
            )
        };

    Equilibrium {
        consumption,
        wages,
        savings_households: sh + wages - consumption,
        savings_firms: sf + consumption - wages,
        degenerate,
    }
}

fn is_degenerate(divisor: f64) -> bool {
    divisor == 0.0 || !divisor.is_finite()
}
