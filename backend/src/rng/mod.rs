//! Deterministic random number generation
//!
//! The only source of randomness in the engine is the propensity random
//! walk. It goes through the [`RandomSource`] trait so callers can inject
//! their own generator; the default is the seeded xorshift64* [`RngManager`].

mod xorshift;

pub use xorshift::RngManager;

/// A source of uniformly distributed shocks
///
/// Implementations must be deterministic for a given internal state so that
/// two engines fed the same source produce identical histories.
pub trait RandomSource {
    /// Draw a value uniformly from `[low, high)`
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

impl RandomSource for RngManager {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (**self).uniform(low, high)
    }
}
