//! Deterministic failure injection for fake collaborators.
//!
//! Fakes in the control and membership crates wrap each operation in a
//! `RequestTracker` so tests can make the Nth call fail without
//! touching the code under test.

/// Counts calls to one fake operation and optionally fails one of them.
///
/// Arm with [`fail_with`](RequestTracker::fail_with); the tracker fires
/// once the call count reaches `after`, then disarms so subsequent
/// calls succeed again.
#[derive(Debug, Default)]
pub struct RequestTracker {
    calls: u32,
    armed: Option<(u32, String)>,
}

impl RequestTracker {
    /// Fail with `message` once `after` calls have been observed
    /// (0 fails the very next call).
    pub fn fail_with(&mut self, message: &str, after: u32) {
        self.armed = Some((after, message.to_string()));
    }

    /// Record one call. Returns the injected error message if this
    /// call should fail.
    pub fn observe(&mut self) -> Option<String> {
        let fired = match &self.armed {
            Some((after, message)) if self.calls >= *after => Some(message.clone()),
            _ => None,
        };
        self.calls += 1;
        if fired.is_some() {
            self.armed = None;
        }
        fired
    }

    /// Number of calls observed so far.
    pub fn calls(&self) -> u32 {
        self.calls
    }
}
