//! StateStore — redb-backed object persistence for QuorumGrid.
//!
//! Provides typed CRUD operations over replica sets, storage claims,
//! jobs, and events. All values are JSON-serialized into redb's
//! `&[u8]` value columns. The store supports both on-disk and
//! in-memory backends (the latter for testing).
//!
//! Replica sets and claims are updated with compare-and-swap on
//! `resource_version`; a stale caller gets `StateError::Conflict` and
//! must re-read before retrying.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe object store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent object store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "object store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory object store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory object store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(REPLICA_SETS).map_err(map_err!(Table))?;
        txn.open_table(CLAIMS).map_err(map_err!(Table))?;
        txn.open_table(JOBS).map_err(map_err!(Table))?;
        txn.open_table(EVENTS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    // ── Replica sets ───────────────────────────────────────────────

    /// Create a replica set. Fails if the key already exists.
    ///
    /// The stored object starts at `resource_version` 1 regardless of
    /// the version carried by the argument.
    pub fn create_replica_set(&self, set: &ReplicaSetObject) -> StateResult<ReplicaSetObject> {
        let key = set.table_key();
        let mut stored = set.clone();
        stored.resource_version = 1;
        let value = serde_json::to_vec(&stored).map_err(map_err!(Serialize))?;

        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(REPLICA_SETS).map_err(map_err!(Table))?;
            if table.get(key.as_str()).map_err(map_err!(Read))?.is_some() {
                return Err(StateError::AlreadyExists(key));
            }
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, "replica set created");
        Ok(stored)
    }

    /// Get a replica set by namespace/name key.
    pub fn get_replica_set(&self, key: &str) -> StateResult<Option<ReplicaSetObject>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(REPLICA_SETS).map_err(map_err!(Table))?;
        match table.get(key).map_err(map_err!(Read))? {
            Some(guard) => {
                let set: ReplicaSetObject =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(set))
            }
            None => Ok(None),
        }
    }

    /// Update a replica set with compare-and-swap on `resource_version`.
    ///
    /// Returns the stored object with its version bumped. A caller
    /// holding a stale version gets `StateError::Conflict`.
    pub fn update_replica_set(&self, set: &ReplicaSetObject) -> StateResult<ReplicaSetObject> {
        let key = set.table_key();
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let updated;
        {
            let mut table = txn.open_table(REPLICA_SETS).map_err(map_err!(Table))?;
            let stored: ReplicaSetObject = match table.get(key.as_str()).map_err(map_err!(Read))? {
                Some(guard) => {
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?
                }
                None => return Err(StateError::NotFound(key)),
            };
            if stored.resource_version != set.resource_version {
                return Err(StateError::Conflict {
                    key,
                    stored: stored.resource_version,
                    caller: set.resource_version,
                });
            }
            let mut next = set.clone();
            next.resource_version += 1;
            let value = serde_json::to_vec(&next).map_err(map_err!(Serialize))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
            updated = next;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(key = %updated.table_key(), version = updated.resource_version, "replica set updated");
        Ok(updated)
    }

    /// Delete a replica set by key. Returns true if it existed.
    pub fn delete_replica_set(&self, key: &str) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(REPLICA_SETS).map_err(map_err!(Table))?;
            existed = table.remove(key).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, existed, "replica set deleted");
        Ok(existed)
    }

    // ── Storage claims ─────────────────────────────────────────────

    /// Insert a storage claim. Fails if the key already exists.
    pub fn create_claim(&self, claim: &StorageClaim) -> StateResult<StorageClaim> {
        let key = claim.table_key();
        let mut stored = claim.clone();
        stored.resource_version = 1;
        let value = serde_json::to_vec(&stored).map_err(map_err!(Serialize))?;

        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(CLAIMS).map_err(map_err!(Table))?;
            if table.get(key.as_str()).map_err(map_err!(Read))?.is_some() {
                return Err(StateError::AlreadyExists(key));
            }
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, "claim created");
        Ok(stored)
    }

    /// Get a storage claim by namespace/name key.
    pub fn get_claim(&self, key: &str) -> StateResult<Option<StorageClaim>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(CLAIMS).map_err(map_err!(Table))?;
        match table.get(key).map_err(map_err!(Read))? {
            Some(guard) => {
                let claim: StorageClaim =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(claim))
            }
            None => Ok(None),
        }
    }

    /// Update a storage claim with compare-and-swap on `resource_version`.
    pub fn update_claim(&self, claim: &StorageClaim) -> StateResult<StorageClaim> {
        let key = claim.table_key();
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let updated;
        {
            let mut table = txn.open_table(CLAIMS).map_err(map_err!(Table))?;
            let stored: StorageClaim = match table.get(key.as_str()).map_err(map_err!(Read))? {
                Some(guard) => {
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?
                }
                None => return Err(StateError::NotFound(key)),
            };
            if stored.resource_version != claim.resource_version {
                return Err(StateError::Conflict {
                    key,
                    stored: stored.resource_version,
                    caller: claim.resource_version,
                });
            }
            let mut next = claim.clone();
            next.resource_version += 1;
            let value = serde_json::to_vec(&next).map_err(map_err!(Serialize))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
            updated = next;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(key = %updated.table_key(), version = updated.resource_version, "claim updated");
        Ok(updated)
    }

    /// Delete a storage claim by key. Returns true if it existed.
    pub fn delete_claim(&self, key: &str) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(CLAIMS).map_err(map_err!(Table))?;
            existed = table.remove(key).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, existed, "claim deleted");
        Ok(existed)
    }

    /// List all claims in a namespace (by key prefix scan).
    pub fn list_claims(&self, namespace: &str) -> StateResult<Vec<StorageClaim>> {
        let prefix = format!("{namespace}/");
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(CLAIMS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            if key.value().starts_with(&prefix) {
                let claim: StorageClaim =
                    serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
                results.push(claim);
            }
        }
        Ok(results)
    }

    // ── Jobs ───────────────────────────────────────────────────────

    /// Insert a job. Fails if the key already exists.
    pub fn create_job(&self, job: &JobObject) -> StateResult<()> {
        let key = job.table_key();
        let value = serde_json::to_vec(job).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(JOBS).map_err(map_err!(Table))?;
            if table.get(key.as_str()).map_err(map_err!(Read))?.is_some() {
                return Err(StateError::AlreadyExists(key));
            }
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, "job created");
        Ok(())
    }

    /// Get a job by namespace/name key.
    pub fn get_job(&self, key: &str) -> StateResult<Option<JobObject>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(JOBS).map_err(map_err!(Table))?;
        match table.get(key).map_err(map_err!(Read))? {
            Some(guard) => {
                let job: JobObject =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(job))
            }
            None => Ok(None),
        }
    }

    /// Delete a job by key. Returns true if it existed.
    pub fn delete_job(&self, key: &str) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(JOBS).map_err(map_err!(Table))?;
            existed = table.remove(key).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, existed, "job deleted");
        Ok(existed)
    }

    // ── Events ─────────────────────────────────────────────────────

    /// Append an event for a cluster, assigning the next sequence number.
    ///
    /// Reconcile passes for a cluster are single-flight, so the
    /// read-then-write sequence assignment is race-free per cluster.
    pub fn append_event(
        &self,
        cluster_key: &str,
        kind: EventKind,
        reason: &str,
        message: &str,
        timestamp: u64,
    ) -> StateResult<EventRecord> {
        let next_seq = self
            .list_events_for_cluster(cluster_key)?
            .last()
            .map(|e| e.seq + 1)
            .unwrap_or(1);

        let record = EventRecord {
            cluster_key: cluster_key.to_string(),
            seq: next_seq,
            kind,
            reason: reason.to_string(),
            message: message.to_string(),
            timestamp,
        };
        let key = record.table_key();
        let value = serde_json::to_vec(&record).map_err(map_err!(Serialize))?;

        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(EVENTS).map_err(map_err!(Table))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(record)
    }

    /// List all events for a cluster in sequence order.
    pub fn list_events_for_cluster(&self, cluster_key: &str) -> StateResult<Vec<EventRecord>> {
        let prefix = format!("{cluster_key}:");
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(EVENTS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            if key.value().starts_with(&prefix) {
                let record: EventRecord =
                    serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
                results.push(record);
            }
        }
        Ok(results)
    }
}
