//! Two-sector economic model
//!
//! - **propensity**: clamped random walk for alpha/rho, and override policy
//! - **equilibrium**: closed-form consumption/wage solution per tick

pub mod equilibrium;
pub mod propensity;

pub use equilibrium::{solve, Equilibrium, EquilibriumInputs};
pub use propensity::{clamp_propensity, OverridePolicy, PropensityWalk};
