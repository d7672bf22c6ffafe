//! # Error Types
//!
//! Error taxonomy for the flag engine.
//!
//! - `UnknownFlag` is a programmer error: the registry is a closed set, so
//!   referencing an id outside it indicates a caller bug.
//! - `Storage` and `Codec` cover the durable persistence path.

use thiserror::Error;

/// Result type for flag engine operations.
pub type Result<T> = std::result::Result<T, FlagError>;

/// Errors from the flag engine.
#[derive(Debug, Error)]
pub enum FlagError {
    /// The id is not part of the flag registry.
    #[error("Unknown feature flag: {0}")]
    UnknownFlag(String),

    /// Durable storage failed (redb open, read, write or commit).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Persisted value could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(#[from] postcard::Error),
}

impl FlagError {
    /// Wrap any displayable storage-layer error.
    pub(crate) fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}
