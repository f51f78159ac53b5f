//! Membership client trait and error types.

use thiserror::Error;

use quorumgrid_state::MemberInfo;

/// Result type alias for membership operations.
pub type MemberResult<T> = Result<T, MemberError>;

/// Errors from the clustered service's administrative API.
#[derive(Debug, Error)]
pub enum MemberError {
    #[error("membership API error: {0}")]
    Api(String),

    #[error("membership API unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous client for one role's membership group.
///
/// Implementations are not required to be idempotent or immediately
/// consistent: `delete_member` may report success before the member
/// disappears from `list_members`. The scaling controller therefore
/// re-lists after every deletion. Deleting a member that is already
/// absent must succeed.
pub trait MembershipClient: Send + Sync {
    /// List the members currently registered with the group.
    fn list_members(&self) -> MemberResult<Vec<MemberInfo>>;

    /// Remove a member from the group by name.
    fn delete_member(&self, name: &str) -> MemberResult<()>;

    /// Ask the named member to hand leadership to a peer.
    fn evict_leader(&self, name: &str) -> MemberResult<()>;
}
