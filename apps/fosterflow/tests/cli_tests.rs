//! Integration tests for FosterFlow CLI commands.
//!
//! Uses tempfile for the redb-backed flag store.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use fosterflow::cli::{
    cmd_get, cmd_identity, cmd_list, cmd_reset, cmd_set, cmd_sync, open_store,
};
use fosterflow_core::FlagId;
use std::path::PathBuf;
use tempfile::TempDir;

fn temp_db(dir: &TempDir) -> PathBuf {
    dir.path().join("flags.redb")
}

// =============================================================================
// STORE LIFECYCLE
// =============================================================================

#[test]
fn open_store_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir);

    let store = open_store(&db).unwrap();
    assert_eq!(store.state().len(), FlagId::ALL.len());
    assert!(db.exists());
}

#[test]
fn identity_is_stable_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir);

    let first = cmd_identity(&db).unwrap();
    let second = cmd_identity(&db).unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with("user_"));
}

// =============================================================================
// GET / SET / RESET
// =============================================================================

#[test]
fn get_unknown_flag_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir);
    assert!(cmd_get(&db, "NONEXISTENT").is_err());
}

#[test]
fn get_defaults_match_registry() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir);
    assert!(cmd_get(&db, "ADVANCED_SEARCH").unwrap());
    assert!(!cmd_get(&db, "WORKFLOW_AUTOMATION").unwrap());
}

#[tokio::test]
async fn set_then_get_round_trips_through_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir);

    cmd_set(&db, "WORKFLOW_AUTOMATION", true, None).await.unwrap();
    assert!(cmd_get(&db, "WORKFLOW_AUTOMATION").unwrap());

    cmd_set(&db, "WORKFLOW_AUTOMATION", false, None).await.unwrap();
    assert!(!cmd_get(&db, "WORKFLOW_AUTOMATION").unwrap());
}

#[tokio::test]
async fn set_unknown_flag_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir);
    assert!(cmd_set(&db, "NONEXISTENT", true, None).await.is_err());
}

#[tokio::test]
async fn reset_discards_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir);

    cmd_set(&db, "ADVANCED_SEARCH", false, None).await.unwrap();
    assert!(!cmd_get(&db, "ADVANCED_SEARCH").unwrap());

    cmd_reset(&db).unwrap();
    assert!(cmd_get(&db, "ADVANCED_SEARCH").unwrap());
}

// =============================================================================
// LIST
// =============================================================================

#[test]
fn list_table_and_json_modes_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir);
    assert!(cmd_list(&db, false).is_ok());
    assert!(cmd_list(&db, true).is_ok());
}

// =============================================================================
// SYNC (against an unreachable server: fallback path)
// =============================================================================

#[tokio::test]
async fn sync_without_server_reconciles_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir);

    // Flip a flag away from its default, then reconcile against an
    // unreachable server: the fallback carries registry defaults, which
    // overwrite the local override.
    cmd_set(&db, "ADVANCED_SEARCH", false, None).await.unwrap();
    let applied = cmd_sync(&db, "http://127.0.0.1:1").await.unwrap();
    assert_eq!(applied, FlagId::ALL.len());
    assert!(cmd_get(&db, "ADVANCED_SEARCH").unwrap());
}
