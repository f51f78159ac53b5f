//! ScaleStep calculator — the single safe step between two topologies.
//!
//! Pure functions only; the [`MemberScaler`](crate::scaler::MemberScaler)
//! decides whether a proposed step is actually committed.
//!
//! A topology encodes its live members as the first `replicas` naturals
//! not in `delete_slots`. Slots preserve the identity of survivors
//! above a vacated ordinal: removing a middle member leaves a hole
//! instead of renumbering everyone after it. Trailing holes carry no
//! information and are collapsed whenever a step is encoded, so
//! ordinal 0 is never a slot and slots sit strictly below the highest
//! live ordinal.

use std::collections::BTreeSet;

use quorumgrid_state::ReplicaSetSpec;

/// The single proposed change between an observed and desired topology.
///
/// `replicas` and `delete_slots` are the resulting topology if the
/// step commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleStep {
    /// Materialize `ordinal` (fill a hole or extend the tail).
    Out {
        ordinal: u32,
        replicas: u32,
        delete_slots: BTreeSet<u32>,
    },
    /// Remove `ordinal` (always the highest live member).
    In {
        ordinal: u32,
        replicas: u32,
        delete_slots: BTreeSet<u32>,
    },
    /// Observed and desired already agree.
    Unchanged,
}

/// The live ordinals of a topology: the first `replicas` naturals not
/// in `delete_slots`.
pub fn live_ordinals(spec: &ReplicaSetSpec) -> BTreeSet<u32> {
    let mut live = BTreeSet::new();
    let mut ordinal = 0;
    while live.len() < spec.replicas as usize {
        if !spec.delete_slots.contains(&ordinal) {
            live.insert(ordinal);
        }
        ordinal += 1;
    }
    live
}

/// Re-encode a live ordinal set as `(replicas, delete_slots)`,
/// collapsing trailing holes.
fn encode(live: &BTreeSet<u32>) -> (u32, BTreeSet<u32>) {
    let replicas = live.len() as u32;
    let delete_slots = match live.iter().next_back() {
        Some(&top) => (0..top).filter(|n| !live.contains(n)).collect(),
        None => BTreeSet::new(),
    };
    (replicas, delete_slots)
}

/// Compute the single step from `observed` toward `desired_replicas`.
///
/// At most one ordinal changes per call; a large gap converges over
/// repeated passes. Only the direction of the caller's request is
/// honored — the committed replica count is always observed ± 1, which
/// defends against a desired object carrying a stale, pre-stepped
/// count.
///
/// Scale-out fills the smallest vacant ordinal, so interior holes are
/// reborn before the tail extends; a slot at or beyond the tail of a
/// non-canonical input encodes nothing and is ignored. Scale-in
/// removes the highest live ordinal.
pub fn compute(observed: &ReplicaSetSpec, desired_replicas: u32) -> ScaleStep {
    if desired_replicas == observed.replicas {
        return ScaleStep::Unchanged;
    }

    let mut live = live_ordinals(observed);

    if desired_replicas > observed.replicas {
        let mut ordinal = 0;
        while live.contains(&ordinal) {
            ordinal += 1;
        }
        live.insert(ordinal);
        let (replicas, delete_slots) = encode(&live);
        ScaleStep::Out {
            ordinal,
            replicas,
            delete_slots,
        }
    } else {
        let Some(&ordinal) = live.iter().next_back() else {
            return ScaleStep::Unchanged;
        };
        live.remove(&ordinal);
        let (replicas, delete_slots) = encode(&live);
        ScaleStep::In {
            ordinal,
            replicas,
            delete_slots,
        }
    }
}
