//! Bounded retry for optimistic-concurrency conflicts.
//!
//! Shared by the replica-set and claim controls: an update that loses
//! a version race is retried under a linear backoff, with the caller's
//! attempt closure re-reading the latest object and reapplying its
//! intended change. The loop gives up with `ControlError::RetryLimit`
//! once the bound is reached.

use std::time::Duration;

use tracing::warn;

use crate::error::{ControlError, ControlResult};

/// Maximum attempts for a conflicting update before giving up.
pub(crate) const UPDATE_RETRIES: u32 = 5;

/// Base delay between conflict retries.
pub(crate) const RETRY_BASE_DELAY: Duration = Duration::from_millis(10);

/// Run `attempt` until it stops failing with a version conflict.
///
/// `attempt` receives the zero-based attempt number; on every attempt
/// after the first it must re-read the latest object before mutating.
/// Non-conflict errors are returned as-is.
pub(crate) fn retry_on_conflict<T>(
    key: &str,
    mut attempt: impl FnMut(u32) -> ControlResult<T>,
) -> ControlResult<T> {
    let mut attempts = 0;
    loop {
        match attempt(attempts) {
            Err(ControlError::State(err)) if err.is_conflict() => {
                attempts += 1;
                if attempts >= UPDATE_RETRIES {
                    return Err(ControlError::RetryLimit {
                        key: key.to_string(),
                        attempts,
                    });
                }
                warn!(%key, attempts, "update conflict, retrying");
                std::thread::sleep(RETRY_BASE_DELAY * attempts);
            }
            other => return other,
        }
    }
}
