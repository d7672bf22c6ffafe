//! # FosterFlow Core - THE LOGIC
//!
//! Deterministic feature-flag engine for the FosterFlow client.
//!
//! ```text
//! registry ──► rollout evaluator ──► FlagStore ◄── reconcile (wire records)
//!                    ▲                   │
//!                identity          StateStore (redb / memory)
//! ```
//!
//! - `registry`: the closed, compiled-in set of flag definitions
//! - `rollout`: stable percentage-bucket membership
//! - `identity`: per-installation token with fixed expiry
//! - `state`: resolved values, write-through persistence, reconciliation
//! - `storage`: durable key-value backends
//! - `wire`: JSON types shared with the flag API server
//!
//! This crate is pure: no async, no network, and wall-clock time is always
//! a caller-supplied parameter.

pub mod error;
pub mod identity;
pub mod registry;
pub mod rollout;
pub mod state;
pub mod storage;
pub mod wire;

pub use error::{FlagError, Result};
pub use identity::Identity;
pub use registry::{FlagDefinition, FlagId, REGISTRY};
pub use state::{FlagState, FlagStore};
pub use storage::{MemoryStore, RedbStore, StateStore};
pub use wire::{FetchFlagsResponse, FlagUpdate, RemoteFlagRecord};
