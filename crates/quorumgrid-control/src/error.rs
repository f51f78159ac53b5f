//! Control error types.

use thiserror::Error;

use quorumgrid_state::StateError;

/// Result type alias for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while mutating orchestration objects.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("object store error: {0}")]
    State(#[from] StateError),

    #[error("update of {key} still conflicting after {attempts} attempts")]
    RetryLimit { key: String, attempts: u32 },

    #[error("injected fault: {0}")]
    Injected(String),
}
