//! # FosterFlow Sync - THE KIT
//!
//! HTTP client for the flag API with graceful local fallback.
//!
//! ```rust,ignore
//! use fosterflow_sync::FlagsClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = FlagsClient::new("http://localhost:8080");
//!
//!     // Never fails: transport errors degrade to registry defaults.
//!     let outcome = client.fetch_all().await;
//!     if outcome.is_fallback() {
//!         eprintln!("serving local defaults, server unreachable");
//!     }
//!     for flag in &outcome.value.flags {
//!         println!("{} = {}", flag.id, flag.enabled);
//!     }
//! }
//! ```
//!
//! ## Ordering
//!
//! Requests carry no sequence numbers. A single client issues them
//! sequentially and callers await a push before writing the result to the
//! local store, so within one process the effective policy is
//! last-request-wins. Concurrent clients racing on the same flag resolve as
//! last-write-wins on the server.

use chrono::Utc;
use fosterflow_core::wire::{self, FetchFlagsResponse, FlagUpdate, RemoteFlagRecord};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors from the sync client.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server does not know this flag id. Non-retryable.
    #[error("Feature flag not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status.
    #[error("Server error: {status} - {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },
}

// =============================================================================
// PROVENANCE
// =============================================================================

/// Where a sync result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Confirmed by the remote authoritative source.
    Remote,

    /// Assumed locally after a transport failure.
    LocalFallback,
}

/// A sync result tagged with its provenance, so callers can distinguish
/// confirmed-remote from assumed-local state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome<T> {
    /// The payload.
    pub value: T,

    /// Whether the payload was confirmed by the server.
    pub provenance: Provenance,
}

impl<T> SyncOutcome<T> {
    fn remote(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Remote,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::LocalFallback,
        }
    }

    /// Whether this outcome was assumed locally rather than confirmed.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.provenance == Provenance::LocalFallback
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Bounded per-request timeout before a request counts as failed and the
/// fallback path runs.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the FosterFlow flag API.
#[derive(Debug, Clone)]
pub struct FlagsClient {
    base_url: String,
    http: reqwest::Client,
}

impl FlagsClient {
    /// Create a client against `base_url` with the default bounded timeout.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let client = FlagsClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Fetch all flags from the server.
    ///
    /// Never fails: on transport failure or a non-success status the
    /// response is built locally from registry defaults and tagged
    /// `LocalFallback`, so flag retrieval never hard-fails the caller.
    pub async fn fetch_all(&self) -> SyncOutcome<FetchFlagsResponse> {
        match self.try_fetch_all().await {
            Ok(response) => SyncOutcome::remote(response),
            Err(err) => {
                warn!(error = %err, "flag fetch failed, serving registry defaults");
                SyncOutcome::fallback(FetchFlagsResponse {
                    flags: wire::fallback_flags(),
                    fetched_at: Utc::now(),
                })
            }
        }
    }

    /// Push a single-flag update to the server.
    ///
    /// A 404 surfaces as [`SyncError::NotFound`] (the id is outside the
    /// server's closed set; retrying cannot help). Any other failure
    /// returns an echo of the requested values tagged `LocalFallback`.
    pub async fn push_update(
        &self,
        id: &str,
        enabled: bool,
        rollout_percentage: Option<u8>,
    ) -> Result<SyncOutcome<RemoteFlagRecord>, SyncError> {
        match self.try_push(id, enabled, rollout_percentage).await {
            Ok(record) => Ok(SyncOutcome::remote(record)),
            Err(SyncError::NotFound(id)) => Err(SyncError::NotFound(id)),
            Err(err) => {
                warn!(flag = id, error = %err, "flag update failed, echoing requested values");
                Ok(SyncOutcome::fallback(RemoteFlagRecord {
                    id: id.to_string(),
                    enabled,
                    rollout_percentage,
                }))
            }
        }
    }

    async fn try_fetch_all(&self) -> Result<FetchFlagsResponse, SyncError> {
        let url = format!("{}/api/feature-flags", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Server {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }

    async fn try_push(
        &self,
        id: &str,
        enabled: bool,
        rollout_percentage: Option<u8>,
    ) -> Result<RemoteFlagRecord, SyncError> {
        let url = format!("{}/api/feature-flags/{}", self.base_url, id);
        let update = FlagUpdate {
            enabled: Some(enabled),
            rollout_percentage,
        };
        let response = self.http.put(&url).json(&update).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(SyncError::Server {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }
}
