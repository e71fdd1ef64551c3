//! Flow Matrix
//!
//! Normalized 2×2 snapshot of how value is distributed between the two
//! sectors at the latest tick:
//!
//! ```text
//!              household            firm
//! household  [ savings_households,  consumption   ]
//! firm       [ wages,               savings_firms ]
//! ```

use crate::models::state::EconomicState;
use serde::{Deserialize, Serialize};

/// Normalized flow matrix
///
/// Entries sum to 1, or are all zero when the economy holds no value.
///
/// # Example
///
/// ```rust
/// use economy_simulator_core_rs::{EconomicState, FlowMatrix, OutlierFlags};
///
/// let state = EconomicState::new(0.5, 0.5, 30.0, 20.0, 40.0, 10.0, OutlierFlags::seed());
/// let matrix = FlowMatrix::from_state(&state);
/// assert_eq!(matrix.as_array(), [[0.3, 0.4], [0.1, 0.2]]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowMatrix([[f64; 2]; 2]);

impl FlowMatrix {
    pub fn zero() -> Self {
        Self([[0.0; 2]; 2])
    }

    pub fn from_state(state: &EconomicState) -> Self {
        let total = state.total_flow();
        if total == 0.0 {
            return Self::zero();
        }

        Self([
            [
                state.savings_households() / total,
                state.consumption() / total,
            ],
            [state.wages() / total, state.savings_firms() / total],
        ])
    }

    pub fn as_array(&self) -> [[f64; 2]; 2] {
        self.0
    }

    /// Entry at `(row, col)`; `None` when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.0.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().flatten().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().flatten().all(|v| *v == 0.0)
    }
}

impl From<FlowMatrix> for [[f64; 2]; 2] {
    fn from(matrix: FlowMatrix) -> Self {
        matrix.0
    }
}
