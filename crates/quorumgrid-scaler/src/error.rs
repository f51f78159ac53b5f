//! Scale result taxonomy.
//!
//! The three logical outcomes of a scaling pass — success, expected
//! retry, hard failure — are kept as distinct types so a caller cannot
//! mistake a pending leadership transfer for a failure. `Requeue` must
//! not feed failure-rate backoff; the `ScaleError` kinds are retried
//! under the caller's backoff policy.

use thiserror::Error;

use quorumgrid_member::MemberError;

/// Result type alias for scaling operations.
pub type ScaleResult = Result<ScaleOutcome, ScaleError>;

/// Successful outcome of one scaling pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleOutcome {
    /// One step was committed into the desired topology.
    Applied,
    /// Observed and desired already agree; nothing was called.
    NoOp,
    /// Expected transient condition (leadership transfer pending);
    /// try again promptly, nothing was mutated.
    Requeue(String),
}

/// Failure of one scaling pass. Nothing was mutated in every case.
#[derive(Debug, Error)]
pub enum ScaleError {
    /// Membership status not synced; destructive actions are unsafe.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// An administrative API call failed.
    #[error("membership API call failed: {0}")]
    ExternalApi(String),

    /// Post-deletion verification found the member still registered.
    #[error("consistency check failed: {0}")]
    Consistency(String),

    /// Storage claim lookup or update failed.
    #[error("storage claim operation failed: {0}")]
    Resource(String),
}

impl From<MemberError> for ScaleError {
    fn from(err: MemberError) -> Self {
        ScaleError::ExternalApi(err.to_string())
    }
}
