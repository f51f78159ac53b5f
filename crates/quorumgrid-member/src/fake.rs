//! In-memory membership clients for protocol tests.

use std::sync::Mutex;

use tracing::debug;

use quorumgrid_state::testing::RequestTracker;
use quorumgrid_state::{MemberHealth, MemberInfo};

use crate::client::{MemberError, MemberResult, MembershipClient};

#[derive(Default)]
struct FakeState {
    members: Vec<MemberInfo>,
    deleted: Vec<String>,
    evicted: Vec<String>,
    /// When set, deleted members stay visible in `list_members`,
    /// modeling an eventually-consistent administrative API.
    linger_after_delete: bool,
    list_tracker: RequestTracker,
    delete_tracker: RequestTracker,
    evict_tracker: RequestTracker,
}

/// In-memory membership group with call recording and error injection.
pub struct FakeMembershipClient {
    inner: Mutex<FakeState>,
}

impl FakeMembershipClient {
    /// Create an empty group.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(FakeState::default()),
        }
    }

    /// Seed the group with members named `{cluster}-{role}-{ordinal}`.
    pub fn with_members(self, names: &[&str]) -> Self {
        {
            let mut state = self.inner.lock().unwrap();
            state.members = names
                .iter()
                .enumerate()
                .map(|(i, name)| MemberInfo {
                    name: name.to_string(),
                    external_id: format!("id-{i}"),
                    health: MemberHealth::Healthy,
                })
                .collect();
        }
        self
    }

    /// Keep deleted members visible in subsequent lists.
    pub fn with_stale_lists(self) -> Self {
        self.inner.lock().unwrap().linger_after_delete = true;
        self
    }

    /// Make the Nth `list_members` call fail.
    pub fn set_list_error(&self, message: &str, after: u32) {
        self.inner.lock().unwrap().list_tracker.fail_with(message, after);
    }

    /// Make the Nth `delete_member` call fail.
    pub fn set_delete_error(&self, message: &str, after: u32) {
        self.inner.lock().unwrap().delete_tracker.fail_with(message, after);
    }

    /// Make the Nth `evict_leader` call fail.
    pub fn set_evict_error(&self, message: &str, after: u32) {
        self.inner.lock().unwrap().evict_tracker.fail_with(message, after);
    }

    /// Names passed to `delete_member`, in call order.
    pub fn deleted(&self) -> Vec<String> {
        self.inner.lock().unwrap().deleted.clone()
    }

    /// Names passed to `evict_leader`, in call order.
    pub fn evicted(&self) -> Vec<String> {
        self.inner.lock().unwrap().evicted.clone()
    }

    /// Number of `list_members` calls observed.
    pub fn list_calls(&self) -> u32 {
        self.inner.lock().unwrap().list_tracker.calls()
    }
}

impl Default for FakeMembershipClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MembershipClient for FakeMembershipClient {
    fn list_members(&self) -> MemberResult<Vec<MemberInfo>> {
        let mut state = self.inner.lock().unwrap();
        if let Some(message) = state.list_tracker.observe() {
            return Err(MemberError::Api(message));
        }
        Ok(state.members.clone())
    }

    fn delete_member(&self, name: &str) -> MemberResult<()> {
        let mut state = self.inner.lock().unwrap();
        if let Some(message) = state.delete_tracker.observe() {
            return Err(MemberError::Api(message));
        }
        state.deleted.push(name.to_string());
        if !state.linger_after_delete {
            state.members.retain(|m| m.name != name);
        }
        debug!(%name, "fake member deleted");
        // Deleting an absent member is success, matching the real API.
        Ok(())
    }

    fn evict_leader(&self, name: &str) -> MemberResult<()> {
        let mut state = self.inner.lock().unwrap();
        if let Some(message) = state.evict_tracker.observe() {
            return Err(MemberError::Api(message));
        }
        state.evicted.push(name.to_string());
        debug!(%name, "fake leader eviction requested");
        Ok(())
    }
}

/// Membership client for roles with no live cluster behind them.
///
/// Reports every member as absent and accepts all deletions, so the
/// scaling state machine runs unchanged against an offline group.
pub struct OfflineMembershipClient;

impl MembershipClient for OfflineMembershipClient {
    fn list_members(&self) -> MemberResult<Vec<MemberInfo>> {
        Ok(Vec::new())
    }

    fn delete_member(&self, _name: &str) -> MemberResult<()> {
        Ok(())
    }

    fn evict_leader(&self, _name: &str) -> MemberResult<()> {
        Ok(())
    }
}
