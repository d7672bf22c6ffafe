//! # User Identity
//!
//! Stable per-installation pseudo-random identity token.
//!
//! The token is the sole input to rollout bucketing, so it must not change
//! for the life of the persisted record: `FlagStore::open` reuses a stored,
//! unexpired identity and only generates a fresh one when none exists or the
//! stored one has expired.
//!
//! Wall-clock time is always a caller-supplied parameter; this module never
//! reads the system clock.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

/// How long a generated identity stays valid.
pub const IDENTITY_TTL_DAYS: i64 = 365;

/// Length of the random portion of a token.
const TOKEN_RANDOM_LEN: usize = 13;

/// A per-installation identity with a fixed expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque token, stable for the life of this record.
    pub token: String,

    /// Expiry instant, stored as unix seconds.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Identity {
    /// Generate a fresh identity expiring `IDENTITY_TTL_DAYS` after `now`.
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        let random: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(TOKEN_RANDOM_LEN)
            .map(char::from)
            .collect();
        Self {
            token: format!("user_{}", random.to_lowercase()),
            expires_at: now + Duration::days(IDENTITY_TTL_DAYS),
        }
    }

    /// Whether this identity has passed its expiry instant.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// =============================================================================
// TESTS
// =============================================================================
