//! quorumgrid-member — administrative membership API for clustered
//! member groups.
//!
//! Defines the [`MembershipClient`] trait the scaling controller drives
//! (list, delete, evict-leader) plus in-memory implementations for
//! deterministic protocol testing. The client's success responses may
//! be stale; callers must re-verify after destructive calls.

pub mod client;
pub mod fake;

pub use client::{MemberError, MemberResult, MembershipClient};
pub use fake::{FakeMembershipClient, OfflineMembershipClient};
