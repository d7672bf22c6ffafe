//! # Wire Types
//!
//! JSON representations shared by the flag API server and the sync client.
//!
//! Field names are camelCase on the wire (`rolloutPercentage`, `fetchedAt`)
//! to match the deployed HTTP contract. `RemoteFlagRecord::id` is a plain
//! string rather than a `FlagId` so records for server-added flags the
//! client does not recognize still deserialize; reconciliation ignores them.

use crate::registry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One flag as held by the remote authoritative source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFlagRecord {
    /// Wire token of the flag id.
    pub id: String,

    /// Resolved enabled state on the server.
    pub enabled: bool,

    /// Rollout percentage, when the flag is percentage-rolled-out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollout_percentage: Option<u8>,
}

/// Response body of `GET /api/feature-flags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchFlagsResponse {
    /// All flags known to the server.
    pub flags: Vec<RemoteFlagRecord>,

    /// When the server produced this snapshot (RFC 3339).
    pub fetched_at: DateTime<Utc>,
}

/// Request body of `PUT /api/feature-flags/{id}`.
///
/// Partial update: only the fields present are merged into the server
/// record, the rest are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollout_percentage: Option<u8>,
}

/// Build the local mock flag set from registry defaults.
///
/// Used as the fallback body when the remote source is unreachable, so flag
/// retrieval never hard-fails. One record per registry entry, in registry
/// order.
#[must_use]
pub fn fallback_flags() -> Vec<RemoteFlagRecord> {
    registry::definitions()
        .iter()
        .map(|def| RemoteFlagRecord {
            id: def.id.as_str().to_string(),
            enabled: def.default_enabled,
            rollout_percentage: def.rollout,
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    // Allow unwrap and panic in tests - these are standard for test code
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn record_serializes_camel_case() {
        let record = RemoteFlagRecord {
            id: "AI_INSIGHTS".to_string(),
            enabled: false,
            rollout_percentage: Some(10),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"id":"AI_INSIGHTS","enabled":false,"rolloutPercentage":10}"#
        );
    }

    #[test]
    fn record_omits_absent_rollout() {
        let record = RemoteFlagRecord {
            id: "ADVANCED_SEARCH".to_string(),
            enabled: true,
            rollout_percentage: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("rolloutPercentage"));
    }

    #[test]
    fn unknown_id_still_deserializes() {
        let json = r#"{"id":"SERVER_ONLY_FLAG","enabled":true}"#;
        let record: RemoteFlagRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "SERVER_ONLY_FLAG");
        assert_eq!(record.rollout_percentage, None);
    }

    #[test]
    fn update_is_fully_optional() {
        let update: FlagUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(update, FlagUpdate::default());

        let update: FlagUpdate =
            serde_json::from_str(r#"{"rolloutPercentage":35}"#).unwrap();
        assert_eq!(update.enabled, None);
        assert_eq!(update.rollout_percentage, Some(35));
    }

    #[test]
    fn fetch_response_uses_rfc3339_timestamp() {
        let response = FetchFlagsResponse {
            flags: fallback_flags(),
            fetched_at: "2026-08-29T12:00:00Z".parse().unwrap(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""fetchedAt":"2026-08-29T12:00:00Z""#));
    }

    #[test]
    fn fallback_covers_the_whole_registry() {
        let flags = fallback_flags();
        assert_eq!(flags.len(), crate::registry::definitions().len());

        let search = flags.iter().find(|f| f.id == "ADVANCED_SEARCH").unwrap();
        assert!(search.enabled);
        assert_eq!(search.rollout_percentage, None);

        let dash = flags.iter().find(|f| f.id == "CARERS_DASHBOARD").unwrap();
        assert!(!dash.enabled);
        assert_eq!(dash.rollout_percentage, Some(20));
    }
}
