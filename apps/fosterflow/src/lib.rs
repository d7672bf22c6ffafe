//! # FosterFlow Binary Library
//!
//! This library exposes the FosterFlow modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;

// Re-export the engine crates for convenience
pub use fosterflow_core;
pub use fosterflow_sync;
