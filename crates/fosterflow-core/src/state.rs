//! # Flag Store
//!
//! Resolved per-installation flag values and their lifecycle.
//!
//! `FlagStore` owns the `FlagState` exclusively. It is built once at
//! application start (`open`), read by feature gates (`get`), mutated by
//! explicit toggles (`set`) and reconciliation (`reconcile`), and restored
//! to registry defaults by `reset`. Every mutation writes the full state
//! through to durable storage immediately so it survives restarts.
//!
//! Access is single-threaded and cooperative: two racing `set` calls
//! resolve as last-write-wins with no merge.

use crate::registry::{self, FlagId};
use crate::rollout;
use crate::storage::StateStore;
use crate::wire::RemoteFlagRecord;
use crate::{FlagError, Identity, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

// =============================================================================
// FLAG STATE
// =============================================================================

/// Mapping from flag id to its resolved boolean value.
///
/// `BTreeMap` for deterministic iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagState(BTreeMap<FlagId, bool>);

impl FlagState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved value for `id`, if present.
    #[must_use]
    pub fn get(&self, id: FlagId) -> Option<bool> {
        self.0.get(&id).copied()
    }

    /// Replace exactly one entry, preserving all others.
    pub fn insert(&mut self, id: FlagId, enabled: bool) {
        self.0.insert(id, enabled);
    }

    /// Iterate entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (FlagId, bool)> + '_ {
        self.0.iter().map(|(id, enabled)| (*id, *enabled))
    }

    /// Number of resolved flags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no flags are resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compute the initial state for `identity` from the registry: rollout
/// flags via the bucket evaluator, the rest via their defaults.
fn initial_state(identity: &Identity) -> FlagState {
    let mut state = FlagState::new();
    for def in registry::definitions() {
        let enabled = match def.rollout {
            Some(percentage) => rollout::is_enrolled(&identity.token, percentage),
            None => def.default_enabled,
        };
        state.insert(def.id, enabled);
    }
    state
}

// =============================================================================
// FLAG STORE
// =============================================================================

/// The owning handle for resolved flag state.
///
/// Constructed explicitly and passed by reference to consumers; there is no
/// ambient global.
#[derive(Debug)]
pub struct FlagStore<S: StateStore> {
    storage: S,
    identity: Identity,
    state: FlagState,
}

impl<S: StateStore> FlagStore<S> {
    /// Open the store: reuse or create the identity, then resolve the flag
    /// state.
    ///
    /// Identity: a stored, unexpired identity is reused unchanged (rollout
    /// determinism requires a stable token); otherwise a fresh one is
    /// generated and persisted with a fixed expiry.
    ///
    /// State: initial values are computed from the registry, then any
    /// persisted entries are overlaid so manual overrides survive restarts.
    /// Flags added to the registry since the last run still resolve, so
    /// `get` never fails for a registry id.
    pub fn open(mut storage: S, now: DateTime<Utc>) -> Result<Self> {
        let identity = match storage.load_identity()? {
            Some(identity) if !identity.is_expired(now) => identity,
            _ => {
                let identity = Identity::generate(now);
                storage.save_identity(&identity)?;
                identity
            }
        };

        let mut state = initial_state(&identity);
        if let Some(persisted) = storage.load_state()? {
            for (id, enabled) in persisted.iter() {
                state.insert(id, enabled);
            }
        }
        storage.save_state(&state)?;

        Ok(Self {
            storage,
            identity,
            state,
        })
    }

    /// The rollout identity for this installation.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The current resolved state.
    #[must_use]
    pub fn state(&self) -> &FlagState {
        &self.state
    }

    /// Resolved value for `id`.
    ///
    /// The registry is closed, so a miss here indicates a caller bug and
    /// surfaces as `UnknownFlag`.
    pub fn get(&self, id: FlagId) -> Result<bool> {
        self.state
            .get(id)
            .ok_or_else(|| FlagError::UnknownFlag(id.as_str().to_string()))
    }

    /// Overwrite the resolved value for `id` and persist immediately
    /// (write-through, not batched).
    pub fn set(&mut self, id: FlagId, enabled: bool) -> Result<()> {
        self.state.insert(id, enabled);
        self.storage.save_state(&self.state)
    }

    /// Recompute the state from the registry, discarding all manual
    /// overrides ("restore defaults"), and persist the result.
    pub fn reset(&mut self) -> Result<&FlagState> {
        self.state = initial_state(&self.identity);
        self.storage.save_state(&self.state)?;
        Ok(&self.state)
    }

    /// Overwrite local entries with records from the authoritative remote
    /// source. Records whose id the registry does not recognize are
    /// ignored (forward compatibility with server-added flags). Returns
    /// the number of entries applied.
    pub fn reconcile(&mut self, remote: &[RemoteFlagRecord]) -> Result<usize> {
        let mut applied = 0;
        for record in remote {
            let Ok(id) = FlagId::from_str(&record.id) else {
                continue;
            };
            self.state.insert(id, record.enabled);
            applied += 1;
        }
        self.storage.save_state(&self.state)?;
        Ok(applied)
    }
}

// =============================================================================
// TESTS
// =============================================================================
