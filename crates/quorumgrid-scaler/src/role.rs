//! Role adapters — per-role parameters for the generic scaler.
//!
//! Every member role runs the same scaling state machine; a role only
//! supplies its naming scheme, its membership client, and the
//! sole-survivor exemption. Roles are specialized by data, never by
//! re-derived control flow.

use std::fmt;
use std::sync::Arc;

use quorumgrid_member::{MembershipClient, OfflineMembershipClient};
use quorumgrid_state::ClusterMeta;

/// The member roles of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberRole {
    /// Placement/metadata coordinators (quorum group with a leader).
    Coordinator,
    /// Data-storage members.
    Store,
    /// Stateless query members.
    Query,
    /// Replication-sync masters.
    SyncMaster,
    /// Replication-sync workers.
    SyncWorker,
}

impl MemberRole {
    /// Role name as used in member and claim identities.
    pub fn as_str(self) -> &'static str {
        match self {
            MemberRole::Coordinator => "coordinator",
            MemberRole::Store => "store",
            MemberRole::Query => "query",
            MemberRole::SyncMaster => "sync-master",
            MemberRole::SyncWorker => "sync-worker",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-role parameters consumed by the generic scaler.
pub trait RoleAdapter: Send + Sync {
    /// The role this adapter specializes.
    fn role(&self) -> MemberRole;

    /// Administrative client for this role's membership group.
    fn membership(&self) -> &dyn MembershipClient;

    /// Member identity for an ordinal: `{cluster}-{role}-{ordinal}`.
    ///
    /// Identity derives from nothing but the cluster name, the role,
    /// and the ordinal, so it survives any restart or rescheduling.
    fn member_name(&self, cluster: &ClusterMeta, ordinal: u32) -> String {
        format!("{}-{}-{}", cluster.name, self.role(), ordinal)
    }

    /// Storage claim name for an ordinal: `data-{cluster}-{role}-{ordinal}`.
    fn claim_name(&self, cluster: &ClusterMeta, ordinal: u32) -> String {
        format!("data-{}-{}-{}", cluster.name, self.role(), ordinal)
    }

    /// The sole surviving member has no peer to hand leadership to, so
    /// its removal skips the eviction round-trip.
    fn leader_eviction_exempt(&self, ordinal: u32) -> bool {
        ordinal == 0
    }
}

/// Standard role adapter: a role paired with its membership client.
pub struct ClusterRole {
    role: MemberRole,
    membership: Arc<dyn MembershipClient>,
}

impl ClusterRole {
    /// Pair a role with its membership client.
    pub fn new(role: MemberRole, membership: Arc<dyn MembershipClient>) -> Self {
        Self { role, membership }
    }

    pub fn coordinator(membership: Arc<dyn MembershipClient>) -> Self {
        Self::new(MemberRole::Coordinator, membership)
    }

    pub fn store(membership: Arc<dyn MembershipClient>) -> Self {
        Self::new(MemberRole::Store, membership)
    }

    pub fn query(membership: Arc<dyn MembershipClient>) -> Self {
        Self::new(MemberRole::Query, membership)
    }

    pub fn sync_master(membership: Arc<dyn MembershipClient>) -> Self {
        Self::new(MemberRole::SyncMaster, membership)
    }

    pub fn sync_worker(membership: Arc<dyn MembershipClient>) -> Self {
        Self::new(MemberRole::SyncWorker, membership)
    }

    /// Adapter for a role with no live cluster behind it; every member
    /// reads as absent, exercising the same code path offline.
    pub fn offline(role: MemberRole) -> Self {
        Self::new(role, Arc::new(OfflineMembershipClient))
    }
}

impl RoleAdapter for ClusterRole {
    fn role(&self) -> MemberRole {
        self.role
    }

    fn membership(&self) -> &dyn MembershipClient {
        self.membership.as_ref()
    }
}
