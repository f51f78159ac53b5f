//! quorumgrid-control — safe mutation of the orchestration objects the
//! scaling controller persists through.
//!
//! Each control wraps the object store with the discipline the
//! reconcile loop relies on:
//!
//! - updates retry on optimistic-concurrency conflicts by re-reading
//!   the latest persisted object and reapplying only the caller's
//!   intended spec, under a bounded backoff
//! - every call records a correlated success/failure event against the
//!   owning cluster object, so operators can observe repeated failures
//!   without consulting logs
//!
//! Fake controls with injectable errors mirror each interface for
//! deterministic protocol tests.

pub mod claims;
pub mod error;
pub mod events;
pub mod job;
pub mod replica_set;
mod retry;

pub use claims::{ClaimControl, ClaimController, FakeClaimControl};
pub use error::{ControlError, ControlResult};
pub use events::EventRecorder;
pub use job::{FakeJobControl, JobControl, JobController};
pub use replica_set::{FakeReplicaSetControl, ReplicaSetControl, ReplicaSetController};
