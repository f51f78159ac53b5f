//! Storage-claim control — lookup, annotate-update, and delete.

use std::sync::Mutex;

use tracing::debug;

use quorumgrid_state::testing::RequestTracker;
use quorumgrid_state::{StateError, StateStore, StorageClaim};

use crate::error::{ControlError, ControlResult};
use crate::events::EventRecorder;
use crate::retry::retry_on_conflict;

/// Mutation interface for storage claims.
pub trait ClaimControl: Send + Sync {
    /// Look up a claim by namespace and name.
    fn get_claim(&self, namespace: &str, name: &str) -> ControlResult<Option<StorageClaim>>;

    /// Update a claim (annotations included), retrying on version conflicts.
    fn update_claim(&self, cluster_key: &str, claim: &StorageClaim) -> ControlResult<StorageClaim>;

    /// Delete a claim. Returns true if it existed.
    fn delete_claim(&self, cluster_key: &str, namespace: &str, name: &str) -> ControlResult<bool>;
}

/// Store-backed claim control with event recording.
pub struct ClaimController {
    state: StateStore,
    events: EventRecorder,
}

impl ClaimController {
    /// Create a controller over the given store.
    pub fn new(state: StateStore, events: EventRecorder) -> Self {
        Self { state, events }
    }
}

impl ClaimControl for ClaimController {
    fn get_claim(&self, namespace: &str, name: &str) -> ControlResult<Option<StorageClaim>> {
        Ok(self.state.get_claim(&format!("{namespace}/{name}"))?)
    }

    fn update_claim(&self, cluster_key: &str, claim: &StorageClaim) -> ControlResult<StorageClaim> {
        let key = claim.table_key();
        // Annotations are reapplied onto the latest object on conflict,
        // one whole-key set-or-overwrite at a time.
        let intended_annotations = claim.annotations.clone();
        let mut current = claim.clone();

        let result = retry_on_conflict(&key, |attempt| {
            if attempt > 0 {
                let latest = self
                    .state
                    .get_claim(&key)?
                    .ok_or_else(|| ControlError::State(StateError::NotFound(key.clone())))?;
                current = latest;
                current.annotations = intended_annotations.clone();
            }
            let updated = self.state.update_claim(&current)?;
            debug!(%key, version = updated.resource_version, "claim updated");
            Ok(updated)
        });

        self.events.record_operation(
            cluster_key,
            "update",
            &format!("StorageClaim {key}"),
            result.as_ref().err().map(|e| e.to_string()).as_deref(),
        );
        result
    }

    fn delete_claim(&self, cluster_key: &str, namespace: &str, name: &str) -> ControlResult<bool> {
        let key = format!("{namespace}/{name}");
        let result = self.state.delete_claim(&key).map_err(ControlError::from);
        self.events.record_operation(
            cluster_key,
            "delete",
            &format!("StorageClaim {key}"),
            result.as_ref().err().map(|e| e.to_string()).as_deref(),
        );
        result
    }
}

/// Fake claim control with write-through storage and error injection.
pub struct FakeClaimControl {
    state: StateStore,
    get_tracker: Mutex<RequestTracker>,
    update_tracker: Mutex<RequestTracker>,
    delete_tracker: Mutex<RequestTracker>,
}

impl FakeClaimControl {
    /// Create a fake over the given store.
    pub fn new(state: StateStore) -> Self {
        Self {
            state,
            get_tracker: Mutex::new(RequestTracker::default()),
            update_tracker: Mutex::new(RequestTracker::default()),
            delete_tracker: Mutex::new(RequestTracker::default()),
        }
    }

    /// Make the Nth `get_claim` call fail.
    pub fn set_get_error(&self, message: &str, after: u32) {
        self.get_tracker.lock().unwrap().fail_with(message, after);
    }

    /// Make the Nth `update_claim` call fail.
    pub fn set_update_error(&self, message: &str, after: u32) {
        self.update_tracker.lock().unwrap().fail_with(message, after);
    }

    /// Make the Nth `delete_claim` call fail.
    pub fn set_delete_error(&self, message: &str, after: u32) {
        self.delete_tracker.lock().unwrap().fail_with(message, after);
    }

    /// Number of `delete_claim` calls observed.
    pub fn delete_calls(&self) -> u32 {
        self.delete_tracker.lock().unwrap().calls()
    }
}

impl ClaimControl for FakeClaimControl {
    fn get_claim(&self, namespace: &str, name: &str) -> ControlResult<Option<StorageClaim>> {
        if let Some(message) = self.get_tracker.lock().unwrap().observe() {
            return Err(ControlError::Injected(message));
        }
        Ok(self.state.get_claim(&format!("{namespace}/{name}"))?)
    }

    fn update_claim(&self, _cluster_key: &str, claim: &StorageClaim) -> ControlResult<StorageClaim> {
        if let Some(message) = self.update_tracker.lock().unwrap().observe() {
            return Err(ControlError::Injected(message));
        }
        let mut next = claim.clone();
        if let Some(latest) = self.state.get_claim(&claim.table_key())? {
            next.resource_version = latest.resource_version;
        }
        Ok(self.state.update_claim(&next)?)
    }

    fn delete_claim(&self, _cluster_key: &str, namespace: &str, name: &str) -> ControlResult<bool> {
        if let Some(message) = self.delete_tracker.lock().unwrap().observe() {
            return Err(ControlError::Injected(message));
        }
        Ok(self.state.delete_claim(&format!("{namespace}/{name}"))?)
    }
}
