//! Member scaler — drives the membership API, leadership eviction, and
//! deferred-storage marking for one safe scaling step.
//!
//! The desired replica-set object is mutated only after every side
//! effect has succeeded; failures and requeues leave it exactly as
//! supplied, so repeating a pass with the same inputs never duplicates
//! a member deletion or an annotation write.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use quorumgrid_control::ClaimControl;
use quorumgrid_state::{ClusterMeta, DEFER_DELETE_ANNOTATION, ReplicaSetObject};

use crate::calculator::{ScaleStep, compute};
use crate::error::{ScaleError, ScaleOutcome, ScaleResult};
use crate::role::RoleAdapter;

/// Generic scaling state machine, specialized per role by its adapter.
pub struct MemberScaler<A: RoleAdapter> {
    adapter: A,
    claims: Arc<dyn ClaimControl>,
}

impl<A: RoleAdapter> MemberScaler<A> {
    /// Create a scaler for one role of a cluster.
    pub fn new(adapter: A, claims: Arc<dyn ClaimControl>) -> Self {
        Self { adapter, claims }
    }

    /// Execute at most one scaling step between `observed` and `desired`.
    ///
    /// Called once per reconcile pass; passes for a given cluster are
    /// serialized by the caller's per-key work queue.
    pub fn scale(
        &self,
        cluster: &ClusterMeta,
        observed: &ReplicaSetObject,
        desired: &mut ReplicaSetObject,
    ) -> ScaleResult {
        match compute(&observed.spec, desired.spec.replicas) {
            ScaleStep::Out { .. } => self.scale_out(cluster, observed, desired),
            ScaleStep::In { .. } => self.scale_in(cluster, observed, desired),
            ScaleStep::Unchanged => {
                debug!(
                    cluster = %cluster.key(),
                    role = %self.adapter.role(),
                    replicas = observed.spec.replicas,
                    "topology already converged"
                );
                Ok(ScaleOutcome::NoOp)
            }
        }
    }

    /// Materialize one new ordinal.
    ///
    /// An ordinal must never be reborn onto storage earmarked for
    /// reclaim: a stale deferred-delete claim for the target ordinal is
    /// deleted before the topology commits.
    pub fn scale_out(
        &self,
        cluster: &ClusterMeta,
        observed: &ReplicaSetObject,
        desired: &mut ReplicaSetObject,
    ) -> ScaleResult {
        let ScaleStep::Out {
            ordinal,
            replicas,
            delete_slots,
        } = compute(&observed.spec, desired.spec.replicas)
        else {
            return Ok(ScaleOutcome::NoOp);
        };

        let role = self.adapter.role();
        info!(
            cluster = %cluster.key(),
            %role,
            ordinal,
            replicas,
            slots = ?delete_slots,
            "scaling out"
        );

        let claim_name = self.adapter.claim_name(cluster, ordinal);
        let stale = self
            .claims
            .get_claim(&cluster.namespace, &claim_name)
            .map_err(|e| ScaleError::Resource(e.to_string()))?;
        if let Some(claim) = stale
            && claim.defer_deleting()
        {
            info!(
                cluster = %cluster.key(),
                %claim_name,
                "deleting stale deferred-delete claim before reuse"
            );
            self.claims
                .delete_claim(&cluster.key(), &cluster.namespace, &claim_name)
                .map_err(|e| ScaleError::Resource(e.to_string()))?;
        }

        if !cluster.status.synced {
            return Err(ScaleError::Precondition(format!(
                "cluster {} {role} status not synced, can't scale out now",
                cluster.key()
            )));
        }

        desired.spec.replicas = replicas;
        desired.spec.delete_slots = delete_slots;
        Ok(ScaleOutcome::Applied)
    }

    /// Remove the highest live ordinal.
    ///
    /// The member is deleted from the application layer and its claim
    /// marked for deferred deletion before the topology shrinks; the
    /// workload is never cut out from under a still-registered member.
    pub fn scale_in(
        &self,
        cluster: &ClusterMeta,
        observed: &ReplicaSetObject,
        desired: &mut ReplicaSetObject,
    ) -> ScaleResult {
        let ScaleStep::In {
            ordinal,
            replicas,
            delete_slots,
        } = compute(&observed.spec, desired.spec.replicas)
        else {
            return Ok(ScaleOutcome::NoOp);
        };

        let role = self.adapter.role();
        if !cluster.status.synced {
            return Err(ScaleError::Precondition(format!(
                "cluster {} {role} status not synced, can't scale in now",
                cluster.key()
            )));
        }

        let member_name = self.adapter.member_name(cluster, ordinal);
        info!(
            cluster = %cluster.key(),
            %role,
            ordinal,
            replicas,
            slots = ?delete_slots,
            "scaling in"
        );

        let is_leader = cluster
            .status
            .leader
            .as_ref()
            .is_some_and(|leader| leader.name == member_name);
        if is_leader && !self.adapter.leader_eviction_exempt(ordinal) {
            self.adapter.membership().evict_leader(&member_name)?;
            info!(cluster = %cluster.key(), %member_name, "leader eviction requested");
            return Ok(ScaleOutcome::Requeue(format!(
                "member {member_name} is transferring leadership"
            )));
        }

        // Absent members delete as success, so a pass retried after a
        // claim failure converges without tripping on its own history.
        self.adapter.membership().delete_member(&member_name)?;
        info!(cluster = %cluster.key(), %member_name, "member deleted");

        let members = self.adapter.membership().list_members()?;
        if members.iter().any(|m| m.name == member_name) {
            return Err(ScaleError::Consistency(format!(
                "member {member_name} still registered after deletion"
            )));
        }

        let claim_name = self.adapter.claim_name(cluster, ordinal);
        let mut claim = self
            .claims
            .get_claim(&cluster.namespace, &claim_name)
            .map_err(|e| ScaleError::Resource(e.to_string()))?
            .ok_or_else(|| {
                ScaleError::Resource(format!(
                    "storage claim {}/{claim_name} not found",
                    cluster.namespace
                ))
            })?;
        let now = Utc::now().to_rfc3339();
        claim
            .annotations
            .insert(DEFER_DELETE_ANNOTATION.to_string(), now.clone());
        self.claims
            .update_claim(&cluster.key(), &claim)
            .map_err(|e| ScaleError::Resource(e.to_string()))?;
        info!(
            cluster = %cluster.key(),
            %claim_name,
            deferred_at = %now,
            "claim marked for deferred deletion"
        );

        desired.spec.replicas = replicas;
        desired.spec.delete_slots = delete_slots;
        Ok(ScaleOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    use quorumgrid_control::{ClaimController, EventRecorder, FakeClaimControl};
    use quorumgrid_member::FakeMembershipClient;
    use quorumgrid_state::{
        ClusterSyncStatus, MemberRef, ReplicaSetSpec, StateStore, StorageClaim,
    };

    use crate::role::{ClusterRole, MemberRole};

    fn cluster(synced: bool, leader: Option<&str>) -> ClusterMeta {
        ClusterMeta {
            namespace: "ns".to_string(),
            name: "demo".to_string(),
            status: ClusterSyncStatus {
                synced,
                leader: leader.map(|name| MemberRef {
                    name: name.to_string(),
                    external_id: "id-leader".to_string(),
                }),
                members: Vec::new(),
                failed_members: Default::default(),
            },
        }
    }

    fn replica_set(replicas: u32, slots: &[u32]) -> ReplicaSetObject {
        ReplicaSetObject {
            namespace: "ns".to_string(),
            name: "demo-store".to_string(),
            resource_version: 1,
            spec: ReplicaSetSpec {
                replicas,
                delete_slots: slots.iter().copied().collect(),
                template_revision: "rev-1".to_string(),
            },
        }
    }

    fn claim(name: &str, deferred: bool) -> StorageClaim {
        let mut annotations = BTreeMap::new();
        if deferred {
            annotations.insert(
                DEFER_DELETE_ANNOTATION.to_string(),
                "2026-01-01T00:00:00Z".to_string(),
            );
        }
        StorageClaim {
            namespace: "ns".to_string(),
            name: name.to_string(),
            resource_version: 0,
            annotations,
            capacity_bytes: 1024,
        }
    }

    struct Harness {
        state: StateStore,
        membership: Arc<FakeMembershipClient>,
        scaler: MemberScaler<ClusterRole>,
    }

    fn harness(members: &[&str]) -> Harness {
        let state = StateStore::open_in_memory().unwrap();
        let events = EventRecorder::new(state.clone());
        let claims: Arc<dyn ClaimControl> =
            Arc::new(ClaimController::new(state.clone(), events));
        let membership = Arc::new(FakeMembershipClient::new().with_members(members));
        let scaler = MemberScaler::new(ClusterRole::store(membership.clone()), claims);
        Harness {
            state,
            membership,
            scaler,
        }
    }

    fn fake_claim_harness(members: &[&str]) -> (Harness, Arc<FakeClaimControl>) {
        let state = StateStore::open_in_memory().unwrap();
        let fake_claims = Arc::new(FakeClaimControl::new(state.clone()));
        let membership = Arc::new(FakeMembershipClient::new().with_members(members));
        let scaler = MemberScaler::new(
            ClusterRole::store(membership.clone()),
            fake_claims.clone() as Arc<dyn ClaimControl>,
        );
        (
            Harness {
                state,
                membership,
                scaler,
            },
            fake_claims,
        )
    }

    // ── No-op ──────────────────────────────────────────────────────

    #[test]
    fn converged_topology_makes_zero_calls() {
        let h = harness(&["demo-store-0", "demo-store-1", "demo-store-2"]);
        let observed = replica_set(3, &[]);
        let mut desired = replica_set(3, &[]);

        let outcome = h
            .scaler
            .scale(&cluster(true, None), &observed, &mut desired)
            .unwrap();

        assert_eq!(outcome, ScaleOutcome::NoOp);
        assert_eq!(desired, replica_set(3, &[]));
        assert_eq!(h.membership.list_calls(), 0);
        assert!(h.membership.deleted().is_empty());
        assert!(h.membership.evicted().is_empty());
    }

    // ── Scenario A: leader at the target ordinal ───────────────────

    #[test]
    fn scale_in_evicts_leader_and_requeues() {
        let h = harness(&["demo-store-0", "demo-store-1", "demo-store-2"]);
        let observed = replica_set(3, &[]);
        let mut desired = replica_set(2, &[]);

        let outcome = h
            .scaler
            .scale(&cluster(true, Some("demo-store-2")), &observed, &mut desired)
            .unwrap();

        assert!(matches!(outcome, ScaleOutcome::Requeue(_)));
        assert_eq!(h.membership.evicted(), vec!["demo-store-2"]);
        assert!(h.membership.deleted().is_empty());
        // No mutation: the caller's desired object is untouched.
        assert_eq!(desired.spec.replicas, 2);
        assert_eq!(desired, replica_set(2, &[]));
    }

    // ── Scenario B: non-leader removal ─────────────────────────────

    #[test]
    fn scale_in_deletes_member_and_marks_claim() {
        let h = harness(&["demo-store-0", "demo-store-1", "demo-store-2"]);
        h.state.create_claim(&claim("data-demo-store-2", false)).unwrap();
        let observed = replica_set(3, &[]);
        let mut desired = replica_set(2, &[]);

        let outcome = h
            .scaler
            .scale(&cluster(true, Some("demo-store-0")), &observed, &mut desired)
            .unwrap();

        assert_eq!(outcome, ScaleOutcome::Applied);
        assert_eq!(h.membership.deleted(), vec!["demo-store-2"]);
        assert!(h.membership.evicted().is_empty());
        assert_eq!(desired.spec.replicas, 2);
        assert!(desired.spec.delete_slots.is_empty());

        let marked = h.state.get_claim("ns/data-demo-store-2").unwrap().unwrap();
        let stamp = marked.annotations.get(DEFER_DELETE_ANNOTATION).unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn scale_in_with_interior_hole_keeps_survivor_identity() {
        // Live {0, 2, 3}: the hole at 1 persists so member 2 keeps its name.
        let h = harness(&["demo-store-0", "demo-store-2", "demo-store-3"]);
        h.state.create_claim(&claim("data-demo-store-3", false)).unwrap();
        let observed = replica_set(3, &[1]);
        let mut desired = replica_set(2, &[1]);

        let outcome = h
            .scaler
            .scale(&cluster(true, None), &observed, &mut desired)
            .unwrap();

        assert_eq!(outcome, ScaleOutcome::Applied);
        assert_eq!(h.membership.deleted(), vec!["demo-store-3"]);
        assert_eq!(desired.spec.replicas, 2);
        assert_eq!(desired.spec.delete_slots, [1].into_iter().collect::<BTreeSet<_>>());
    }

    // ── Scenario C: not synced ─────────────────────────────────────

    #[test]
    fn scale_in_requires_synced_status() {
        let h = harness(&["demo-store-0", "demo-store-1", "demo-store-2"]);
        let observed = replica_set(3, &[]);
        let mut desired = replica_set(2, &[]);

        let err = h
            .scaler
            .scale(&cluster(false, Some("demo-store-2")), &observed, &mut desired)
            .unwrap_err();

        assert!(matches!(err, ScaleError::Precondition(_)));
        assert_eq!(h.membership.list_calls(), 0);
        assert!(h.membership.deleted().is_empty());
        assert!(h.membership.evicted().is_empty());
        assert_eq!(desired, replica_set(2, &[]));
    }

    #[test]
    fn scale_out_requires_synced_status() {
        let h = harness(&["demo-store-0", "demo-store-1"]);
        let observed = replica_set(2, &[]);
        let mut desired = replica_set(3, &[]);

        let err = h
            .scaler
            .scale(&cluster(false, None), &observed, &mut desired)
            .unwrap_err();

        assert!(matches!(err, ScaleError::Precondition(_)));
        assert_eq!(desired, replica_set(3, &[]));
    }

    // ── Scenario D: reuse of a marked ordinal ──────────────────────

    #[test]
    fn scale_out_deletes_stale_deferred_claim_first() {
        let h = harness(&["demo-store-0", "demo-store-1"]);
        h.state.create_claim(&claim("data-demo-store-2", true)).unwrap();
        let observed = replica_set(2, &[]);
        let mut desired = replica_set(3, &[]);

        let outcome = h
            .scaler
            .scale(&cluster(true, None), &observed, &mut desired)
            .unwrap();

        assert_eq!(outcome, ScaleOutcome::Applied);
        assert_eq!(desired.spec.replicas, 3);
        // The earmarked claim is gone; the new ordinal starts clean.
        assert!(h.state.get_claim("ns/data-demo-store-2").unwrap().is_none());
    }

    #[test]
    fn scale_out_failing_claim_deletion_commits_nothing() {
        let (h, fake_claims) = fake_claim_harness(&["demo-store-0", "demo-store-1"]);
        h.state.create_claim(&claim("data-demo-store-2", true)).unwrap();
        fake_claims.set_delete_error("api timeout", 0);
        let observed = replica_set(2, &[]);
        let mut desired = replica_set(3, &[]);

        let err = h
            .scaler
            .scale(&cluster(true, None), &observed, &mut desired)
            .unwrap_err();

        assert!(matches!(err, ScaleError::Resource(_)));
        assert_eq!(desired, replica_set(3, &[]));
        assert!(h.state.get_claim("ns/data-demo-store-2").unwrap().is_some());
    }

    #[test]
    fn scale_out_leaves_unmarked_claim_alone() {
        // A claim without the mark belongs to nobody's reclaim queue.
        let (h, fake_claims) = fake_claim_harness(&["demo-store-0", "demo-store-1"]);
        h.state.create_claim(&claim("data-demo-store-2", false)).unwrap();
        let observed = replica_set(2, &[]);
        let mut desired = replica_set(3, &[]);

        let outcome = h
            .scaler
            .scale(&cluster(true, None), &observed, &mut desired)
            .unwrap();

        assert_eq!(outcome, ScaleOutcome::Applied);
        assert_eq!(fake_claims.delete_calls(), 0);
        assert!(h.state.get_claim("ns/data-demo-store-2").unwrap().is_some());
    }

    #[test]
    fn scale_out_fills_hole_and_purges_its_old_claim() {
        let h = harness(&["demo-store-0", "demo-store-2"]);
        h.state.create_claim(&claim("data-demo-store-1", true)).unwrap();
        let observed = replica_set(2, &[1]);
        let mut desired = replica_set(3, &[1]);

        let outcome = h
            .scaler
            .scale(&cluster(true, None), &observed, &mut desired)
            .unwrap();

        assert_eq!(outcome, ScaleOutcome::Applied);
        assert_eq!(desired.spec.replicas, 3);
        assert!(desired.spec.delete_slots.is_empty());
        assert!(h.state.get_claim("ns/data-demo-store-1").unwrap().is_none());
    }

    // ── Sole survivor ──────────────────────────────────────────────

    #[test]
    fn sole_survivor_leader_is_removed_without_eviction() {
        let h = harness(&["demo-store-0"]);
        h.state.create_claim(&claim("data-demo-store-0", false)).unwrap();
        let observed = replica_set(1, &[]);
        let mut desired = replica_set(0, &[]);

        let outcome = h
            .scaler
            .scale(&cluster(true, Some("demo-store-0")), &observed, &mut desired)
            .unwrap();

        assert_eq!(outcome, ScaleOutcome::Applied);
        assert!(h.membership.evicted().is_empty());
        assert_eq!(h.membership.deleted(), vec!["demo-store-0"]);
        assert_eq!(desired.spec.replicas, 0);
    }

    // ── Failure paths leave the desired object untouched ───────────

    #[test]
    fn failed_member_deletion_commits_nothing() {
        let h = harness(&["demo-store-0", "demo-store-1", "demo-store-2"]);
        h.membership.set_delete_error("connection refused", 0);
        let observed = replica_set(3, &[]);
        let mut desired = replica_set(2, &[]);

        let err = h
            .scaler
            .scale(&cluster(true, None), &observed, &mut desired)
            .unwrap_err();

        assert!(matches!(err, ScaleError::ExternalApi(_)));
        assert_eq!(desired, replica_set(2, &[]));
    }

    #[test]
    fn failed_eviction_commits_nothing() {
        let h = harness(&["demo-store-0", "demo-store-1", "demo-store-2"]);
        h.membership.set_evict_error("leader busy", 0);
        let observed = replica_set(3, &[]);
        let mut desired = replica_set(2, &[]);

        let err = h
            .scaler
            .scale(&cluster(true, Some("demo-store-2")), &observed, &mut desired)
            .unwrap_err();

        assert!(matches!(err, ScaleError::ExternalApi(_)));
        assert!(h.membership.deleted().is_empty());
        assert_eq!(desired, replica_set(2, &[]));
    }

    #[test]
    fn failed_relist_after_deletion_commits_nothing() {
        let h = harness(&["demo-store-0", "demo-store-1"]);
        h.state.create_claim(&claim("data-demo-store-1", false)).unwrap();
        h.membership.set_list_error("api timeout", 0);
        let observed = replica_set(2, &[]);
        let mut desired = replica_set(1, &[]);
        let meta = cluster(true, None);

        let err = h.scaler.scale(&meta, &observed, &mut desired).unwrap_err();

        assert!(matches!(err, ScaleError::ExternalApi(_)));
        // The deletion went out, but nothing was committed or marked.
        assert_eq!(h.membership.deleted(), vec!["demo-store-1"]);
        assert_eq!(desired, replica_set(1, &[]));
        assert!(
            !h.state
                .get_claim("ns/data-demo-store-1")
                .unwrap()
                .unwrap()
                .defer_deleting()
        );

        // Next pass: the list API recovered; the already absent member
        // deletes as success and the pass converges.
        let outcome = h.scaler.scale(&meta, &observed, &mut desired).unwrap();
        assert_eq!(outcome, ScaleOutcome::Applied);
        assert_eq!(desired.spec.replicas, 1);
    }

    #[test]
    fn lingering_member_after_deletion_is_a_consistency_failure() {
        let state = StateStore::open_in_memory().unwrap();
        let events = EventRecorder::new(state.clone());
        let claims: Arc<dyn ClaimControl> =
            Arc::new(ClaimController::new(state.clone(), events));
        let membership = Arc::new(
            FakeMembershipClient::new()
                .with_members(&["demo-store-0", "demo-store-1", "demo-store-2"])
                .with_stale_lists(),
        );
        let scaler = MemberScaler::new(ClusterRole::store(membership.clone()), claims);
        state.create_claim(&claim("data-demo-store-2", false)).unwrap();
        let observed = replica_set(3, &[]);
        let mut desired = replica_set(2, &[]);

        let err = scaler
            .scale(&cluster(true, None), &observed, &mut desired)
            .unwrap_err();

        assert!(matches!(err, ScaleError::Consistency(_)));
        // The deletion went out, but the topology did not shrink.
        assert_eq!(membership.deleted(), vec!["demo-store-2"]);
        assert_eq!(desired, replica_set(2, &[]));
        // And the claim was not marked either.
        assert!(
            !state
                .get_claim("ns/data-demo-store-2")
                .unwrap()
                .unwrap()
                .defer_deleting()
        );
    }

    #[test]
    fn missing_claim_fails_then_retry_converges() {
        let h = harness(&["demo-store-0", "demo-store-1", "demo-store-2"]);
        let observed = replica_set(3, &[]);
        let mut desired = replica_set(2, &[]);
        let meta = cluster(true, None);

        // The member is deleted, but the claim lookup fails the pass.
        let err = h.scaler.scale(&meta, &observed, &mut desired).unwrap_err();
        assert!(matches!(err, ScaleError::Resource(_)));
        assert_eq!(desired, replica_set(2, &[]));

        // Next pass: the claim exists now; re-deleting the already
        // absent member is success, no eviction happens, and the
        // topology finally commits.
        h.state.create_claim(&claim("data-demo-store-2", false)).unwrap();
        let outcome = h.scaler.scale(&meta, &observed, &mut desired).unwrap();
        assert_eq!(outcome, ScaleOutcome::Applied);
        assert!(h.membership.evicted().is_empty());
        assert_eq!(h.membership.deleted(), vec!["demo-store-2", "demo-store-2"]);
        assert_eq!(desired.spec.replicas, 2);
    }

    #[test]
    fn repeated_scale_in_overwrites_single_annotation_key() {
        let h = harness(&["demo-store-0", "demo-store-1", "demo-store-2"]);
        h.state.create_claim(&claim("data-demo-store-2", false)).unwrap();
        let observed = replica_set(3, &[]);
        let meta = cluster(true, None);

        let mut desired = replica_set(2, &[]);
        h.scaler.scale(&meta, &observed, &mut desired).unwrap();

        // Retried pass against unchanged inputs (e.g. the commit was
        // lost upstream): same outcome, still exactly one key.
        let mut desired = replica_set(2, &[]);
        h.scaler.scale(&meta, &observed, &mut desired).unwrap();

        let marked = h.state.get_claim("ns/data-demo-store-2").unwrap().unwrap();
        assert_eq!(marked.annotations.len(), 1);
        assert!(marked.defer_deleting());
    }

    #[test]
    fn failed_annotation_update_commits_nothing() {
        let (h, fake_claims) = fake_claim_harness(&["demo-store-0", "demo-store-1"]);
        h.state.create_claim(&claim("data-demo-store-1", false)).unwrap();
        fake_claims.set_update_error("api timeout", 0);
        let observed = replica_set(2, &[]);
        let mut desired = replica_set(1, &[]);

        let err = h
            .scaler
            .scale(&cluster(true, None), &observed, &mut desired)
            .unwrap_err();

        assert!(matches!(err, ScaleError::Resource(_)));
        assert_eq!(desired, replica_set(1, &[]));
    }

    // ── Convergence ────────────────────────────────────────────────

    #[test]
    fn scale_out_converges_one_ordinal_per_pass() {
        let h = harness(&[]);
        let meta = cluster(true, None);
        let mut observed = replica_set(2, &[]);

        for expected in [3u32, 4, 5] {
            let mut desired = observed.clone();
            desired.spec.replicas = 5;
            let outcome = h.scaler.scale(&meta, &observed, &mut desired).unwrap();
            assert_eq!(outcome, ScaleOutcome::Applied);
            assert_eq!(desired.spec.replicas, expected);
            observed = desired;
        }

        // Converged: the next pass is a no-op.
        let mut desired = observed.clone();
        let outcome = h.scaler.scale(&meta, &observed, &mut desired).unwrap();
        assert_eq!(outcome, ScaleOutcome::NoOp);
    }

    // ── Offline role ───────────────────────────────────────────────

    #[test]
    fn offline_role_scales_in_without_a_live_cluster() {
        let state = StateStore::open_in_memory().unwrap();
        let events = EventRecorder::new(state.clone());
        let claims: Arc<dyn ClaimControl> =
            Arc::new(ClaimController::new(state.clone(), events));
        let scaler = MemberScaler::new(ClusterRole::offline(MemberRole::Query), claims);
        state.create_claim(&claim("data-demo-query-1", false)).unwrap();
        let observed = replica_set(2, &[]);
        let mut desired = replica_set(1, &[]);

        let outcome = scaler
            .scale(&cluster(true, None), &observed, &mut desired)
            .unwrap();

        assert_eq!(outcome, ScaleOutcome::Applied);
        assert_eq!(desired.spec.replicas, 1);
        assert!(
            state
                .get_claim("ns/data-demo-query-1")
                .unwrap()
                .unwrap()
                .defer_deleting()
        );
    }
}
