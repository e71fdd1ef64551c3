//! FFI (Foreign Function Interface) module
//!
//! PyO3 bindings exposing the engine to a Python host (e.g. a dashboard).
//!
//! # Design Principles
//!
//! 1. **Minimal boundary**: Only expose what the host needs
//! 2. **Simple types**: Primitives, strings, dicts and lists at the boundary
//! 3. **Validate inputs**: Bad configs become `ValueError`, never panics
//! 4. **No references**: Python gets copies, never references to Rust state

pub mod economy;
pub mod types;
