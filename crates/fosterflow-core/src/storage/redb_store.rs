//! redb-backed implementation of `StateStore`.
//!
//! Two tables, one record each: the postcard-encoded flag state snapshot
//! and the postcard-encoded identity. Every save is a full-record replace
//! inside a single write transaction, so a crash never leaves a partial
//! snapshot behind.

use crate::error::FlagError;
use crate::storage::StateStore;
use crate::{FlagState, Identity, Result};
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;

/// Table of postcard-encoded records keyed by a fixed string.
type BytesTable = TableDefinition<'static, &'static str, &'static [u8]>;

const STATE_TABLE: BytesTable = TableDefinition::new("flag_state");
const IDENTITY_TABLE: BytesTable = TableDefinition::new("identity");

/// Single key under which each table stores its record.
const CURRENT: &str = "current";

/// Durable store backed by a redb database file.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::create(path).map_err(FlagError::storage)?;
        Ok(Self { db })
    }

    fn read_record(&self, table: BytesTable) -> Result<Option<Vec<u8>>> {
        let txn = self.db.begin_read().map_err(FlagError::storage)?;
        let table = match txn.open_table(table) {
            Ok(table) => table,
            // A fresh database has no tables yet; that is simply "no record".
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(err) => return Err(FlagError::storage(err)),
        };
        let value = table.get(CURRENT).map_err(FlagError::storage)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn write_record(&mut self, table: BytesTable, bytes: &[u8]) -> Result<()> {
        let txn = self.db.begin_write().map_err(FlagError::storage)?;
        {
            let mut table = txn.open_table(table).map_err(FlagError::storage)?;
            table.insert(CURRENT, bytes).map_err(FlagError::storage)?;
        }
        txn.commit().map_err(FlagError::storage)
    }
}

impl StateStore for RedbStore {
    fn load_state(&self) -> Result<Option<FlagState>> {
        match self.read_record(STATE_TABLE)? {
            Some(bytes) => Ok(Some(postcard::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save_state(&mut self, state: &FlagState) -> Result<()> {
        let bytes = postcard::to_allocvec(state)?;
        self.write_record(STATE_TABLE, &bytes)
    }

    fn load_identity(&self) -> Result<Option<Identity>> {
        match self.read_record(IDENTITY_TABLE)? {
            Some(bytes) => Ok(Some(postcard::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save_identity(&mut self, identity: &Identity) -> Result<()> {
        let bytes = postcard::to_allocvec(identity)?;
        self.write_record(IDENTITY_TABLE, &bytes)
    }
}

// =============================================================================
// TESTS
// =============================================================================
