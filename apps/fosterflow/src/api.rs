//! # Flag API Server
//!
//! Axum routes for the flag HTTP contract:
//!
//! - `GET  /api/feature-flags`      — all flags plus a fetch timestamp
//! - `PUT  /api/feature-flags/{id}` — merge the provided fields into one
//!   flag; unknown ids answer 404
//!
//! Non-API routes fall back to a static file service when a static
//! directory is configured.
//!
//! The flag map is in-memory, seeded from the registry at startup, and
//! mutated only by the PUT handler. Single-process only: no persistence
//! across restarts and no coordination between instances.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::Utc;
use fosterflow_core::registry::{self, FlagId};
use fosterflow_core::wire::{FetchFlagsResponse, FlagUpdate, RemoteFlagRecord};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Server-side record for one flag.
#[derive(Debug, Clone, Copy)]
struct ServerFlag {
    enabled: bool,
    rollout_percentage: Option<u8>,
}

/// Shared state for the flag API.
#[derive(Clone)]
pub struct ApiState {
    flags: Arc<Mutex<BTreeMap<FlagId, ServerFlag>>>,
}

impl ApiState {
    /// State seeded from the compiled-in registry defaults.
    #[must_use]
    pub fn seeded() -> Self {
        let flags = registry::definitions()
            .iter()
            .map(|def| {
                (
                    def.id,
                    ServerFlag {
                        enabled: def.default_enabled,
                        rollout_percentage: def.rollout,
                    },
                )
            })
            .collect();
        Self {
            flags: Arc::new(Mutex::new(flags)),
        }
    }
}

fn to_record(id: FlagId, flag: ServerFlag) -> RemoteFlagRecord {
    RemoteFlagRecord {
        id: id.as_str().to_string(),
        enabled: flag.enabled,
        rollout_percentage: flag.rollout_percentage,
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the API router. When `static_dir` is set, non-API routes serve
/// files out of it.
#[must_use]
pub fn router(state: ApiState, static_dir: Option<PathBuf>) -> Router {
    let mut router = Router::new()
        .route("/api/feature-flags", get(list_flags))
        .route("/api/feature-flags/{id}", put(update_flag))
        .with_state(state);

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn list_flags(State(state): State<ApiState>) -> Json<FetchFlagsResponse> {
    let flags = state.flags.lock().await;
    let records = flags
        .iter()
        .map(|(id, flag)| to_record(*id, *flag))
        .collect();
    Json(FetchFlagsResponse {
        flags: records,
        fetched_at: Utc::now(),
    })
}

async fn update_flag(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(update): Json<FlagUpdate>,
) -> Result<Json<RemoteFlagRecord>, (StatusCode, Json<Value>)> {
    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Feature flag not found" })),
        )
    };

    let Ok(flag_id) = FlagId::from_str(&id) else {
        return Err(not_found());
    };

    let mut flags = state.flags.lock().await;
    let Some(flag) = flags.get_mut(&flag_id) else {
        return Err(not_found());
    };

    // Merge only the provided fields.
    if let Some(enabled) = update.enabled {
        flag.enabled = enabled;
    }
    if let Some(percentage) = update.rollout_percentage {
        flag.rollout_percentage = Some(percentage.min(100));
    }

    tracing::info!(flag = %flag_id, enabled = flag.enabled, "flag updated");
    Ok(Json(to_record(flag_id, *flag)))
}
