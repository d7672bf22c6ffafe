//! # CLI Commands
//!
//! Each subcommand is a `cmd_*` function taking explicit arguments, so the
//! integration tests can drive them directly without spawning the binary.
//!
//! All local-store commands operate on a redb database file; `set` and
//! `sync` additionally talk to a flag API server through `fosterflow-sync`.

use crate::api::{self, ApiState};
use chrono::Utc;
use fosterflow_core::registry::{self, FlagId};
use fosterflow_core::{FlagStore, RedbStore};
use fosterflow_sync::FlagsClient;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Boxed error for CLI plumbing; every layer's error converts into it.
pub type CliError = Box<dyn std::error::Error + Send + Sync>;

/// Port used when neither `--port` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 8080;

/// Open (or create) the flag store backed by the database at `db_path`.
pub fn open_store(db_path: &Path) -> Result<FlagStore<RedbStore>, CliError> {
    let storage = RedbStore::open(db_path)?;
    Ok(FlagStore::open(storage, Utc::now())?)
}

// =============================================================================
// LOCAL STORE COMMANDS
// =============================================================================

/// List all flags with their resolved values.
pub fn cmd_list(db_path: &Path, json_mode: bool) -> Result<(), CliError> {
    let store = open_store(db_path)?;

    if json_mode {
        let flags: Vec<_> = registry::definitions()
            .iter()
            .map(|def| {
                json!({
                    "id": def.id.as_str(),
                    "displayName": def.display_name,
                    "enabled": store.state().get(def.id),
                    "rolloutPercentage": def.rollout,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json!({ "flags": flags }))?);
        return Ok(());
    }

    for def in registry::definitions() {
        let enabled = store.get(def.id)?;
        let value = if enabled { "on " } else { "off" };
        match def.rollout {
            Some(pct) => println!("{value}  {:<22} {} (rollout {pct}%)", def.id, def.display_name),
            None => println!("{value}  {:<22} {}", def.id, def.display_name),
        }
    }
    Ok(())
}

/// Print and return the resolved value of one flag.
pub fn cmd_get(db_path: &Path, id: &str) -> Result<bool, CliError> {
    let flag_id = FlagId::from_str(id)?;
    let store = open_store(db_path)?;
    let enabled = store.get(flag_id)?;
    println!("{}", if enabled { "on" } else { "off" });
    Ok(enabled)
}

/// Set one flag locally, optionally pushing the change to a server first.
///
/// With `--server`, the push is awaited before the local write so the store
/// records what the server confirmed (or, on transport failure, the echoed
/// optimistic value). A 404 from the server aborts without touching local
/// state.
pub async fn cmd_set(
    db_path: &Path,
    id: &str,
    enabled: bool,
    server: Option<&str>,
) -> Result<(), CliError> {
    let flag_id = FlagId::from_str(id)?;
    let mut store = open_store(db_path)?;

    let resolved = match server {
        Some(base_url) => {
            let client = FlagsClient::new(base_url);
            let outcome = client.push_update(id, enabled, None).await?;
            if outcome.is_fallback() {
                eprintln!("warning: server unreachable, change applied locally only");
            }
            outcome.value.enabled
        }
        None => enabled,
    };

    store.set(flag_id, resolved)?;
    println!("{flag_id} = {}", if resolved { "on" } else { "off" });
    Ok(())
}

/// Restore all flags to registry defaults, discarding manual overrides.
pub fn cmd_reset(db_path: &Path) -> Result<(), CliError> {
    let mut store = open_store(db_path)?;
    store.reset()?;
    println!("flag state restored to defaults");
    Ok(())
}

/// Print and return the rollout identity token.
pub fn cmd_identity(db_path: &Path) -> Result<String, CliError> {
    let store = open_store(db_path)?;
    let token = store.identity().token.clone();
    println!("{token}");
    Ok(token)
}

// =============================================================================
// SYNC COMMAND
// =============================================================================

/// Fetch all flags from the server and reconcile the local store.
///
/// Returns the number of entries applied. Transport failure degrades to
/// reconciling against registry defaults (reported, not fatal).
pub async fn cmd_sync(db_path: &Path, server: &str) -> Result<usize, CliError> {
    let mut store = open_store(db_path)?;
    let client = FlagsClient::new(server);

    let outcome = client.fetch_all().await;
    if outcome.is_fallback() {
        eprintln!("warning: server unreachable, reconciled against local defaults");
    }

    let applied = store.reconcile(&outcome.value.flags)?;
    println!(
        "reconciled {applied} flag(s) as of {}",
        outcome.value.fetched_at.to_rfc3339()
    );
    Ok(applied)
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Run the flag API server until ctrl-c.
///
/// Port precedence: `--port`, then the `PORT` environment variable, then
/// `DEFAULT_PORT`.
pub async fn cmd_serve(port: Option<u16>, static_dir: Option<PathBuf>) -> Result<(), CliError> {
    let port = port
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(DEFAULT_PORT);

    let app = api::router(ApiState::seeded(), static_dir);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "flag API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    // Serve until interrupted; failure to install the handler means we
    // simply never shut down gracefully.
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}
