//! Replica-set control — create, update, and delete with optimistic
//! conflict retry.

use std::sync::Mutex;

use tracing::debug;

use quorumgrid_state::testing::RequestTracker;
use quorumgrid_state::{ReplicaSetObject, StateError, StateStore};

use crate::error::{ControlError, ControlResult};
use crate::events::EventRecorder;
use crate::retry::retry_on_conflict;

/// Mutation interface for replica-set objects.
pub trait ReplicaSetControl: Send + Sync {
    /// Create a replica set owned by the given cluster.
    fn create_replica_set(
        &self,
        cluster_key: &str,
        set: &ReplicaSetObject,
    ) -> ControlResult<ReplicaSetObject>;

    /// Update a replica set, retrying on version conflicts.
    fn update_replica_set(
        &self,
        cluster_key: &str,
        set: &ReplicaSetObject,
    ) -> ControlResult<ReplicaSetObject>;

    /// Delete a replica set by key. Returns true if it existed.
    fn delete_replica_set(&self, cluster_key: &str, key: &str) -> ControlResult<bool>;
}

/// Store-backed replica-set control with event recording.
pub struct ReplicaSetController {
    state: StateStore,
    events: EventRecorder,
}

impl ReplicaSetController {
    /// Create a controller over the given store.
    pub fn new(state: StateStore, events: EventRecorder) -> Self {
        Self { state, events }
    }
}

impl ReplicaSetControl for ReplicaSetController {
    fn create_replica_set(
        &self,
        cluster_key: &str,
        set: &ReplicaSetObject,
    ) -> ControlResult<ReplicaSetObject> {
        let key = set.table_key();
        let result = self.state.create_replica_set(set).map_err(ControlError::from);
        self.events.record_operation(
            cluster_key,
            "create",
            &format!("ReplicaSet {key}"),
            result.as_ref().err().map(|e| e.to_string()).as_deref(),
        );
        result
    }

    fn update_replica_set(
        &self,
        cluster_key: &str,
        set: &ReplicaSetObject,
    ) -> ControlResult<ReplicaSetObject> {
        let key = set.table_key();
        // Only the caller's spec is reapplied on conflict; everything
        // else is taken from the latest persisted object so concurrent
        // writes to unrelated sections survive.
        let intended_spec = set.spec.clone();
        let mut current = set.clone();

        let result = retry_on_conflict(&key, |attempt| {
            if attempt > 0 {
                let latest = self
                    .state
                    .get_replica_set(&key)?
                    .ok_or_else(|| ControlError::State(StateError::NotFound(key.clone())))?;
                current = latest;
                current.spec = intended_spec.clone();
            }
            let updated = self.state.update_replica_set(&current)?;
            debug!(%key, version = updated.resource_version, "replica set updated");
            Ok(updated)
        });

        self.events.record_operation(
            cluster_key,
            "update",
            &format!("ReplicaSet {key}"),
            result.as_ref().err().map(|e| e.to_string()).as_deref(),
        );
        result
    }

    fn delete_replica_set(&self, cluster_key: &str, key: &str) -> ControlResult<bool> {
        let result = self.state.delete_replica_set(key).map_err(ControlError::from);
        self.events.record_operation(
            cluster_key,
            "delete",
            &format!("ReplicaSet {key}"),
            result.as_ref().err().map(|e| e.to_string()).as_deref(),
        );
        result
    }
}

/// Fake replica-set control with write-through storage and error injection.
pub struct FakeReplicaSetControl {
    state: StateStore,
    create_tracker: Mutex<RequestTracker>,
    update_tracker: Mutex<RequestTracker>,
    delete_tracker: Mutex<RequestTracker>,
}

impl FakeReplicaSetControl {
    /// Create a fake over the given store.
    pub fn new(state: StateStore) -> Self {
        Self {
            state,
            create_tracker: Mutex::new(RequestTracker::default()),
            update_tracker: Mutex::new(RequestTracker::default()),
            delete_tracker: Mutex::new(RequestTracker::default()),
        }
    }

    /// Make the Nth `create_replica_set` call fail.
    pub fn set_create_error(&self, message: &str, after: u32) {
        self.create_tracker.lock().unwrap().fail_with(message, after);
    }

    /// Make the Nth `update_replica_set` call fail.
    pub fn set_update_error(&self, message: &str, after: u32) {
        self.update_tracker.lock().unwrap().fail_with(message, after);
    }

    /// Make the Nth `delete_replica_set` call fail.
    pub fn set_delete_error(&self, message: &str, after: u32) {
        self.delete_tracker.lock().unwrap().fail_with(message, after);
    }
}

impl ReplicaSetControl for FakeReplicaSetControl {
    fn create_replica_set(
        &self,
        _cluster_key: &str,
        set: &ReplicaSetObject,
    ) -> ControlResult<ReplicaSetObject> {
        if let Some(message) = self.create_tracker.lock().unwrap().observe() {
            return Err(ControlError::Injected(message));
        }
        Ok(self.state.create_replica_set(set)?)
    }

    fn update_replica_set(
        &self,
        _cluster_key: &str,
        set: &ReplicaSetObject,
    ) -> ControlResult<ReplicaSetObject> {
        if let Some(message) = self.update_tracker.lock().unwrap().observe() {
            return Err(ControlError::Injected(message));
        }
        // Write through at the latest stored version, skipping the
        // conflict dance the real controller performs.
        let key = set.table_key();
        let mut next = set.clone();
        if let Some(latest) = self.state.get_replica_set(&key)? {
            next.resource_version = latest.resource_version;
        }
        Ok(self.state.update_replica_set(&next)?)
    }

    fn delete_replica_set(&self, _cluster_key: &str, key: &str) -> ControlResult<bool> {
        if let Some(message) = self.delete_tracker.lock().unwrap().observe() {
            return Err(ControlError::Injected(message));
        }
        Ok(self.state.delete_replica_set(key)?)
    }
}
