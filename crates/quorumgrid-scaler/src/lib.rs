//! quorumgrid-scaler — safe incremental scaling of clustered member
//! groups.
//!
//! Translates a desired replica-count change into the single safe step
//! between the observed and desired topology, and drives the external
//! membership API, leadership eviction, and deferred-storage-reclaim
//! marking required to execute that step.
//!
//! # Protocol
//!
//! ```text
//! scale(cluster, observed, desired):
//!   step = compute(observed.spec, desired.spec.replicas)   // ± one ordinal
//!
//!   out: delete stale deferred-delete claim for the ordinal,
//!        require synced, commit
//!
//!   in:  require synced
//!        leader at ordinal > 0  → evict_leader, Requeue
//!        delete_member          → re-list, verify absence
//!        mark claim for deferred deletion (RFC3339 timestamp)
//!        commit
//! ```
//!
//! `desired` is mutated only on commit; every failure and requeue
//! leaves it exactly as supplied, so a retried pass is always safe.
//! The surrounding reconciler serializes passes per cluster key, so the
//! scaler itself carries no locking.

pub mod calculator;
pub mod error;
pub mod role;
pub mod scaler;

pub use calculator::{ScaleStep, compute, live_ordinals};
pub use error::{ScaleError, ScaleOutcome, ScaleResult};
pub use role::{ClusterRole, MemberRole, RoleAdapter};
pub use scaler::MemberScaler;
