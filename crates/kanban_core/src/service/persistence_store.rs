//! Snapshot persistence use-case service.
//!
//! # Responsibility
//! - Serialize/deserialize the board snapshot under one fixed key.
//! - Recover locally from every storage or decoding failure.
//!
//! # Invariants
//! - `save` overwrites the stored snapshot wholesale; no merge, no diff.
//! - `load` never fails: nothing stored, unreadable storage and corrupt
//!   payloads all yield the empty snapshot.
//! - No method propagates an error to its caller; failures are logged.

use crate::model::snapshot::Snapshot;
use crate::repo::state_repo::StateRepository;
use log::{debug, error, info, warn};
use std::time::Instant;

/// Key under which the board snapshot is stored.
pub const STATE_KEY: &str = "kanban-state";

/// Loads, saves and clears the single persisted snapshot.
pub struct PersistenceStore<R: StateRepository> {
    repo: R,
}

impl<R: StateRepository> PersistenceStore<R> {
    /// Creates a store over the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Underlying repository, mainly for diagnostics and tests.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Writes `snapshot`, replacing whatever was stored.
    ///
    /// Returns `false` when serialization or the write failed; the failure
    /// is logged and the caller's in-memory state stays authoritative.
    pub fn save(&self, snapshot: &Snapshot) -> bool {
        let started_at = Instant::now();
        let payload = match snapshot.to_json() {
            Ok(payload) => payload,
            Err(err) => {
                error!(
                    "event=state_save module=store status=error error_code=serialize_failed error={err}"
                );
                return false;
            }
        };

        match self.repo.write_state(STATE_KEY, &payload) {
            Ok(()) => {
                info!(
                    "event=state_save module=store status=ok lists={} cards={} bytes={} duration_ms={}",
                    snapshot.lists.len(),
                    snapshot.card_count(),
                    payload.len(),
                    started_at.elapsed().as_millis()
                );
                true
            }
            Err(err) => {
                error!(
                    "event=state_save module=store status=error error_code=write_failed bytes={} error={}",
                    payload.len(),
                    err
                );
                false
            }
        }
    }

    /// Returns the stored snapshot, or the empty snapshot.
    pub fn load(&self) -> Snapshot {
        let payload = match self.repo.read_state(STATE_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!("event=state_load module=store status=empty");
                return Snapshot::empty();
            }
            Err(err) => {
                warn!(
                    "event=state_load module=store status=error error_code=read_failed error={err}"
                );
                return Snapshot::empty();
            }
        };

        match Snapshot::from_json(&payload) {
            Ok(snapshot) => {
                info!(
                    "event=state_load module=store status=ok lists={} cards={}",
                    snapshot.lists.len(),
                    snapshot.card_count()
                );
                snapshot
            }
            Err(err) => {
                warn!(
                    "event=state_load module=store status=error error_code=decode_failed bytes={} error={}",
                    payload.len(),
                    err
                );
                Snapshot::empty()
            }
        }
    }

    /// Removes the stored snapshot entirely.
    ///
    /// Returns `false` only when the repository reported a failure.
    pub fn clear(&self) -> bool {
        match self.repo.remove_state(STATE_KEY) {
            Ok(existed) => {
                info!("event=state_clear module=store status=ok existed={existed}");
                true
            }
            Err(err) => {
                error!("event=state_clear module=store status=error error={err}");
                false
            }
        }
    }
}
