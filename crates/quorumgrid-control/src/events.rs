//! Event recording for control operations.
//!
//! Every control call emits a `Successful{Verb}`/`Failed{Verb}` event
//! against the owning cluster object. Recording is best-effort: a
//! failure to persist the event is logged and never propagated into
//! the control result.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

use quorumgrid_state::{EventKind, StateStore};

/// Records operator-visible events against cluster objects.
#[derive(Clone)]
pub struct EventRecorder {
    state: StateStore,
}

impl EventRecorder {
    /// Create a recorder writing to the given store.
    pub fn new(state: StateStore) -> Self {
        Self { state }
    }

    /// Record an arbitrary event.
    pub fn record(&self, cluster_key: &str, kind: EventKind, reason: &str, message: &str) {
        if let Err(e) = self
            .state
            .append_event(cluster_key, kind, reason, message, epoch_secs())
        {
            warn!(%cluster_key, %reason, error = %e, "failed to record event");
        }
    }

    /// Record the outcome of a control operation.
    ///
    /// `verb` is the lowercase operation ("create", "update", "delete"),
    /// `object` describes the mutated object ("ReplicaSet ns/name").
    pub fn record_operation(
        &self,
        cluster_key: &str,
        verb: &str,
        object: &str,
        error: Option<&str>,
    ) {
        let titled = title_case(verb);
        match error {
            None => self.record(
                cluster_key,
                EventKind::Normal,
                &format!("Successful{titled}"),
                &format!("{verb} {object} for cluster {cluster_key} successful"),
            ),
            Some(err) => self.record(
                cluster_key,
                EventKind::Warning,
                &format!("Failed{titled}"),
                &format!("{verb} {object} for cluster {cluster_key} failed: {err}"),
            ),
        }
    }
}

/// Uppercase the first ASCII letter ("update" → "Update").
fn title_case(verb: &str) -> String {
    let mut chars = verb.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
