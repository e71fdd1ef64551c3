//! Simulation History
//!
//! Bounded FIFO of [`EconomicState`] records. The container enforces the
//! capacity itself: pushing into a full history evicts the oldest state.

use crate::models::state::{EconomicState, Variable};
use std::collections::VecDeque;

/// Fixed-capacity, append-only window of economic states
///
/// Never empty: it is created with a seed state and only ever grows or
/// rotates.
///
/// # Example
///
/// ```rust
/// use economy_simulator_core_rs::{EconomicState, OutlierFlags, SimulationHistory};
///
/// let seed = EconomicState::new(0.5, 0.5, 1.0, 1.0, 0.0, 0.0, OutlierFlags::seed());
/// let mut history = SimulationHistory::new(2, seed.clone());
/// history.push(seed.clone());
/// assert!(history.is_full());
///
/// let evicted = history.push(seed);
/// assert!(evicted.is_some());
/// assert_eq!(history.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationHistory {
    states: VecDeque<EconomicState>,
    capacity: usize,
}

impl SimulationHistory {
    /// Create a history holding only `seed`
    ///
    /// A capacity below 1 is raised to 1 so the history can always hold its
    /// latest state.
    pub fn new(capacity: usize, seed: EconomicState) -> Self {
        let capacity = capacity.max(1);
        let mut states = VecDeque::new();
        states.push_back(seed);
        Self { states, capacity }
    }

    /// Rebuild a history from ordered states (oldest first)
    ///
    /// Returns `None` when `states` is empty or longer than `capacity`.
    pub fn from_states(capacity: usize, states: Vec<EconomicState>) -> Option<Self> {
        if states.is_empty() || states.len() > capacity {
            return None;
        }
        Some(Self {
            states: VecDeque::from(states),
            capacity,
        })
    }

    /// Append a state, evicting and returning the oldest one when full
    pub fn push(&mut self, state: EconomicState) -> Option<EconomicState> {
        let evicted = if self.is_full() {
            self.states.pop_front()
        } else {
            None
        };
        self.states.push_back(state);
        evicted
    }

    /// Most recent state
    pub fn latest(&self) -> &EconomicState {
        // Invariant: never empty (seeded at construction, push never shrinks).
        &self.states[self.states.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Never true: the history is seeded at construction
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.states.len() >= self.capacity
    }

    /// States oldest first
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &EconomicState> + '_ {
        self.states.iter()
    }

    /// Series of one variable, oldest first
    pub fn values(&self, variable: Variable) -> Vec<f64> {
        self.states.iter().map(|s| s.value(variable)).collect()
    }

    /// Series of one variable with `next` appended
    pub fn values_with(&self, variable: Variable, next: f64) -> Vec<f64> {
        let mut series = Vec::with_capacity(self.states.len() + 1);
        series.extend(self.states.iter().map(|s| s.value(variable)));
        series.push(next);
        series
    }

    /// Owned copy of all states, oldest first
    pub fn to_vec(&self) -> Vec<EconomicState> {
        self.states.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::state::OutlierFlags;

    fn state(alpha: f64) -> EconomicState {
        EconomicState::new(alpha, 0.5, 1.0, 1.0, 0.0, 0.0, OutlierFlags::seed())
    }

    #[test]
    fn test_eviction_is_fifo() {
        let mut history = SimulationHistory::new(3, state(0.1));
        assert_eq!(history.push(state(0.2)), None);
        assert_eq!(history.push(state(0.3)), None);

        let evicted = history.push(state(0.4)).unwrap();
        assert_eq!(evicted.alpha(), 0.1);
        assert_eq!(history.values(Variable::Alpha), vec![0.2, 0.3, 0.4]);
        assert_eq!(history.latest().alpha(), 0.4);
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let mut history = SimulationHistory::new(4, state(0.5));
        for i in 0..20 {
            history.push(state(i as f64 / 100.0));
            assert!(history.len() <= 4);
        }
        assert!(history.is_full());
    }

    #[test]
    fn test_huge_capacity_does_not_preallocate() {
        let mut history = SimulationHistory::new(usize::MAX, state(0.1));
        history.push(state(0.2));
        assert_eq!(history.len(), 2);
        assert!(!history.is_full());
    }

    #[test]
    fn test_values_with_appends_candidate() {
        let mut history = SimulationHistory::new(3, state(0.1));
        history.push(state(0.2));
        assert_eq!(history.values_with(Variable::Alpha, 0.9), vec![0.1, 0.2, 0.9]);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_from_states_rejects_bad_lengths() {
        assert!(SimulationHistory::from_states(2, vec![]).is_none());
        assert!(SimulationHistory::from_states(2, vec![state(0.1); 3]).is_none());

        let history = SimulationHistory::from_states(2, vec![state(0.1), state(0.2)]).unwrap();
        assert!(history.is_full());
        assert_eq!(history.latest().alpha(), 0.2);
    }
}
