//! One-shot job control — create and delete with event recording.
//!
//! Jobs back the backup, restore, and clean operations the reconcile
//! loop schedules around scaling; the scaling controller itself never
//! touches them.

use std::sync::Mutex;

use tracing::debug;

use quorumgrid_state::testing::RequestTracker;
use quorumgrid_state::{JobObject, StateStore};

use crate::error::{ControlError, ControlResult};
use crate::events::EventRecorder;

/// Mutation interface for one-shot jobs.
pub trait JobControl: Send + Sync {
    /// Create a job owned by the given cluster.
    fn create_job(&self, cluster_key: &str, job: &JobObject) -> ControlResult<()>;

    /// Delete a job by key. Returns true if it existed.
    fn delete_job(&self, cluster_key: &str, key: &str) -> ControlResult<bool>;
}

/// Store-backed job control with event recording.
pub struct JobController {
    state: StateStore,
    events: EventRecorder,
}

impl JobController {
    /// Create a controller over the given store.
    pub fn new(state: StateStore, events: EventRecorder) -> Self {
        Self { state, events }
    }
}

impl JobControl for JobController {
    fn create_job(&self, cluster_key: &str, job: &JobObject) -> ControlResult<()> {
        let key = job.table_key();
        let result = self.state.create_job(job).map_err(ControlError::from);
        debug!(%key, ok = result.is_ok(), "job create");
        self.events.record_operation(
            cluster_key,
            "create",
            &format!("Job {key}"),
            result.as_ref().err().map(|e| e.to_string()).as_deref(),
        );
        result
    }

    fn delete_job(&self, cluster_key: &str, key: &str) -> ControlResult<bool> {
        let result = self.state.delete_job(key).map_err(ControlError::from);
        debug!(%key, ok = result.is_ok(), "job delete");
        self.events.record_operation(
            cluster_key,
            "delete",
            &format!("Job {key}"),
            result.as_ref().err().map(|e| e.to_string()).as_deref(),
        );
        result
    }
}

/// Fake job control with write-through storage and error injection.
pub struct FakeJobControl {
    state: StateStore,
    create_tracker: Mutex<RequestTracker>,
    delete_tracker: Mutex<RequestTracker>,
}

impl FakeJobControl {
    /// Create a fake over the given store.
    pub fn new(state: StateStore) -> Self {
        Self {
            state,
            create_tracker: Mutex::new(RequestTracker::default()),
            delete_tracker: Mutex::new(RequestTracker::default()),
        }
    }

    /// Make the Nth `create_job` call fail.
    pub fn set_create_error(&self, message: &str, after: u32) {
        self.create_tracker.lock().unwrap().fail_with(message, after);
    }

    /// Make the Nth `delete_job` call fail.
    pub fn set_delete_error(&self, message: &str, after: u32) {
        self.delete_tracker.lock().unwrap().fail_with(message, after);
    }
}

impl JobControl for FakeJobControl {
    fn create_job(&self, _cluster_key: &str, job: &JobObject) -> ControlResult<()> {
        if let Some(message) = self.create_tracker.lock().unwrap().observe() {
            return Err(ControlError::Injected(message));
        }
        Ok(self.state.create_job(job)?)
    }

    fn delete_job(&self, _cluster_key: &str, key: &str) -> ControlResult<bool> {
        if let Some(message) = self.delete_tracker.lock().unwrap().observe() {
            return Err(ControlError::Injected(message));
        }
        Ok(self.state.delete_job(key)?)
    }
}
