//! # Storage Module
//!
//! Durable key-value persistence scoped to the client installation.
//!
//! The flag store writes through to a `StateStore` so resolved flag values
//! and the rollout identity survive process restarts. Backends:
//! - `RedbStore`: redb embedded database (ACID, crash-safe)
//! - `MemoryStore`: ephemeral, for tests and one-shot runs

mod redb_store;

pub use redb_store::RedbStore;

use crate::{FlagState, Identity, Result};

/// Durable persistence for resolved flag state and the rollout identity.
pub trait StateStore {
    /// Load the persisted flag state, if any.
    fn load_state(&self) -> Result<Option<FlagState>>;

    /// Persist the full flag state, replacing any previous snapshot.
    fn save_state(&mut self, state: &FlagState) -> Result<()>;

    /// Load the persisted identity, if any.
    fn load_identity(&self) -> Result<Option<Identity>>;

    /// Persist the identity, replacing any previous record.
    fn save_identity(&mut self, identity: &Identity) -> Result<()>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process store with no durability. Survives nothing; useful for tests
/// and runs that do not need restart continuity.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Option<FlagState>,
    identity: Option<Identity>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load_state(&self) -> Result<Option<FlagState>> {
        Ok(self.state.clone())
    }

    fn save_state(&mut self, state: &FlagState) -> Result<()> {
        self.state = Some(state.clone());
        Ok(())
    }

    fn load_identity(&self) -> Result<Option<Identity>> {
        Ok(self.identity.clone())
    }

    fn save_identity(&mut self, identity: &Identity) -> Result<()> {
        self.identity = Some(identity.clone());
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    // Allow unwrap and panic in tests - these are standard for test code
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::FlagId;
    use chrono::Utc;

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        assert!(store.load_state().unwrap().is_none());
        assert!(store.load_identity().unwrap().is_none());

        let mut state = FlagState::new();
        state.insert(FlagId::AdvancedSearch, true);
        store.save_state(&state).unwrap();
        assert_eq!(store.load_state().unwrap(), Some(state));

        let identity = Identity::generate(Utc::now());
        store.save_identity(&identity).unwrap();
        assert_eq!(store.load_identity().unwrap(), Some(identity));
    }
}
