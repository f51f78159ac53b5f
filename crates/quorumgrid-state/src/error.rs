//! Error types for the QuorumGrid object store.

use thiserror::Error;

/// Result type alias for object store operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur during object store operations.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to open database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("version conflict on {key}: stored {stored}, caller {caller}")]
    Conflict {
        key: String,
        stored: u64,
        caller: u64,
    },
}

impl StateError {
    /// True for errors a caller may resolve by re-reading and retrying.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StateError::Conflict { .. })
    }
}
