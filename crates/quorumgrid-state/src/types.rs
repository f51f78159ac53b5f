//! Domain types for the QuorumGrid object store.
//!
//! These types represent the persisted objects the scaling controller
//! operates on (replica sets, storage claims, jobs, events) plus the
//! read-only cluster status supplied by the failure-detection loop.
//! All persisted types are serializable to/from JSON for storage in
//! redb tables.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Annotation key marking a storage claim for deferred deletion.
///
/// The value is an RFC3339 timestamp set at scale-in time. A claim
/// carrying this mark must never be reused by a newly created ordinal
/// until the external reclaimer has processed it.
pub const DEFER_DELETE_ANNOTATION: &str = "quorumgrid.io/defer-deleting";

// ── Cluster ───────────────────────────────────────────────────────

/// Identity and observed status of the cluster object being reconciled.
///
/// One `ClusterMeta` is built per reconcile pass and per member role;
/// `status` is the sync status of that role's membership group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterMeta {
    pub namespace: String,
    pub name: String,
    /// Read-only; produced and refreshed by the failure-detection loop.
    pub status: ClusterSyncStatus,
}

impl ClusterMeta {
    /// Composite key identifying the cluster object.
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Observed membership status for one role's membership group.
///
/// Destructive scaling decisions are gated on `synced`; a stale
/// snapshot must never authorize a member deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClusterSyncStatus {
    /// True when the last observed membership snapshot is fresh enough
    /// to trust for destructive decisions.
    pub synced: bool,
    /// The member currently holding leadership, if known.
    pub leader: Option<MemberRef>,
    /// Members as last observed from the administrative API.
    pub members: Vec<MemberInfo>,
    /// Members flagged as failed by the failure-detection loop,
    /// keyed by member name.
    pub failed_members: HashMap<String, FailureInfo>,
}

/// Reference to a single member (name plus service-assigned ID).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberRef {
    pub name: String,
    pub external_id: String,
}

/// A member of a membership group as reported by the administrative API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberInfo {
    /// Deterministic name: `{cluster}-{role}-{ordinal}`.
    pub name: String,
    /// Service-assigned member ID.
    pub external_id: String,
    pub health: MemberHealth,
}

/// Health of a member as reported by the administrative API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberHealth {
    Healthy,
    Unhealthy,
    Unknown,
}

/// Failure record for a member, produced by the failure-detection loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureInfo {
    pub external_id: String,
    /// Unix timestamp (seconds) when the failure was detected.
    pub detected_at: u64,
}

// ── Replica set ───────────────────────────────────────────────────

/// Persisted replica-set object for one member role of a cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplicaSetObject {
    pub namespace: String,
    pub name: String,
    /// Bumped by the store on every successful update; updates carrying
    /// a stale version fail with `StateError::Conflict`.
    pub resource_version: u64,
    pub spec: ReplicaSetSpec,
}

/// Desired replica topology for a membership group.
///
/// `replicas` counts live members. `delete_slots` holds ordinals that
/// were vacated below the highest live ordinal, so removing a middle
/// member never renumbers the survivors above it. The live ordinals
/// are the first `replicas` naturals not in `delete_slots`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplicaSetSpec {
    pub replicas: u32,
    pub delete_slots: BTreeSet<u32>,
    /// Revision of the member template in effect (image, config hash).
    pub template_revision: String,
}

impl ReplicaSetObject {
    /// Build the composite key for the replica-sets table.
    pub fn table_key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

// ── Storage claim ─────────────────────────────────────────────────

/// Persisted storage claim for one member ordinal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageClaim {
    pub namespace: String,
    pub name: String,
    /// Bumped by the store on every successful update.
    pub resource_version: u64,
    /// String annotations; the deferred-delete mark lives here.
    pub annotations: BTreeMap<String, String>,
    /// Requested capacity in bytes.
    pub capacity_bytes: u64,
}

impl StorageClaim {
    /// Build the composite key for the claims table.
    pub fn table_key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// True when the claim is marked for deferred deletion.
    pub fn defer_deleting(&self) -> bool {
        self.annotations.contains_key(DEFER_DELETE_ANNOTATION)
    }
}

// ── Job ───────────────────────────────────────────────────────────

/// Persisted one-shot job object (backup, restore, clean).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobObject {
    pub namespace: String,
    pub name: String,
    /// Labels correlating the job with its owning cluster.
    pub labels: BTreeMap<String, String>,
    /// Unix timestamp (seconds) when the job was created.
    pub created_at: u64,
}

impl JobObject {
    /// Build the composite key for the jobs table.
    pub fn table_key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

// ── Events ────────────────────────────────────────────────────────

/// Severity of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Normal,
    Warning,
}

/// An operator-visible event recorded against a cluster object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRecord {
    /// `{namespace}/{name}` of the owning cluster object.
    pub cluster_key: String,
    /// Per-cluster sequence number assigned by the store.
    pub seq: u64,
    pub kind: EventKind,
    /// Machine-readable reason, e.g. `SuccessfulUpdate`.
    pub reason: String,
    pub message: String,
    /// Unix timestamp (seconds).
    pub timestamp: u64,
}

impl EventRecord {
    /// Build the composite key for the events table.
    ///
    /// The sequence number is zero-padded so lexicographic key order
    /// matches insertion order within a cluster.
    pub fn table_key(&self) -> String {
        format!("{}:{:020}", self.cluster_key, self.seq)
    }
}
