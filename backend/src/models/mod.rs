//! Domain models for the economy simulator

pub mod history;
pub mod matrix;
pub mod state;

// Re-exports
pub use history::SimulationHistory;
pub use matrix::FlowMatrix;
pub use state::{EconomicState, OutlierFlags, Variable, PROPENSITY_MAX, PROPENSITY_MIN};
