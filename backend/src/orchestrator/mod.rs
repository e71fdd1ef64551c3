//! Orchestrator - simulation engine and checkpointing
//!
//! See `engine.rs` for the tick loop and `checkpoint.rs` for save/load.

pub mod checkpoint;
pub mod engine;

// Re-export main types for convenience
pub use engine::{EngineConfig, SimulationEngine, SimulationError, TickResult};

// Re-export checkpoint types
pub use checkpoint::{compute_config_hash, validate_snapshot, EngineSnapshot};
