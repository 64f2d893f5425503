// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use model::Vrf;
use net::{BehaviorType, Sid};
use std::collections::{BTreeMap, HashSet};

/// One SID a locator pool reports as previously allocated, as delivered by
/// the restoration scan (§4.6): "for each pool the allocator reports a list
/// of 'previously allocated' SIDs (owner + metadata)".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestoredSid {
    /// The pool this allocation came from.
    pub pool: String,
    /// The owner that made the allocation (expected to be `common::OWNER`,
    /// but restoration doesn't assume that — a foreign owner's allocation
    /// is simply incompatible with every VRF and gets released).
    pub owner: String,
    /// The metadata string recorded at allocation time — compared against
    /// VRF names to find the owning VRF.
    pub metadata: String,
    /// The SID itself.
    pub sid: Sid,
    /// The behavior type the pool advertised at allocation time.
    pub behavior_type: BehaviorType,
}

/// The outcome of running restoration against the current VRF store (§4.6).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestorationPlan {
    /// `(vrf name, restored SID)` pairs to adopt: the VRF's `sid_info`
    /// should be set to this SID unchanged.
    pub adopted: Vec<(String, RestoredSid)>,
    /// Restored allocations that should be released instead — incompatible
    /// with any VRF, or a later duplicate for a VRF already adopted.
    pub released: Vec<RestoredSid>,
}

/// Reconcile a flattened list of previously-allocated SIDs (from every known
/// locator pool) against the current VRF store (§4.6's four restoration
/// rules plus the duplicate-allocation tie-break):
///
/// - VRF absent → release.
/// - VRF present but `export_route_target` empty → release.
/// - VRF present but `locator_pool_ref` differs from the candidate's pool →
///   release.
/// - VRF present and compatible → adopt.
/// - Multiple compatible candidates for the same VRF (same `metadata`) →
///   adopt the one with the lexicographically earliest SID, release the
///   rest.
#[must_use]
pub fn restore(mut candidates: Vec<RestoredSid>, vrfs: &BTreeMap<String, Vrf>) -> RestorationPlan {
    // Earliest-SID-wins: process candidates in SID order so the first
    // compatible match per VRF name is the lexicographically smallest one.
    candidates.sort_by_key(|c| c.sid.address());

    let mut plan = RestorationPlan::default();
    let mut adopted_vrfs: HashSet<String> = HashSet::new();

    for candidate in candidates {
        let compatible = vrfs.get(&candidate.metadata).is_some_and(|vrf| {
            vrf.export_route_target.is_some()
                && vrf.locator_pool_ref.as_deref() == Some(candidate.pool.as_str())
        });

        if !compatible || adopted_vrfs.contains(&candidate.metadata) {
            plan.released.push(candidate);
            continue;
        }

        adopted_vrfs.insert(candidate.metadata.clone());
        plan.adopted.push((candidate.metadata.clone(), candidate));
    }

    plan
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use net::VrfId;

    fn vrf(name: &str, rt: Option<&str>, pool: Option<&str>) -> Vrf {
        Vrf {
            name: name.to_string(),
            vrf_id: VrfId::new(1),
            rules: vec![],
            export_route_target: rt.map(|s| s.parse().unwrap()),
            locator_pool_ref: pool.map(str::to_string),
            sid_info: None,
        }
    }

    fn candidate(pool: &str, metadata: &str, sid: &str) -> RestoredSid {
        RestoredSid {
            pool: pool.to_string(),
            owner: common::OWNER.to_string(),
            metadata: metadata.to_string(),
            sid: Sid::canonicalize(sid).unwrap(),
            behavior_type: BehaviorType::Base,
        }
    }

    fn store(vrfs: Vec<Vrf>) -> BTreeMap<String, Vrf> {
        vrfs.into_iter().map(|v| (v.name.clone(), v)).collect()
    }

    #[test]
    fn vrf_absent_is_released() {
        let vrfs = store(vec![]);
        let plan = restore(vec![candidate("pool1", "vrf0", "fd00:0:0:1::")], &vrfs);
        assert!(plan.adopted.is_empty());
        assert_eq!(plan.released.len(), 1);
    }

    #[test]
    fn vrf_without_route_target_is_released() {
        let vrfs = store(vec![vrf("vrf0", None, Some("pool1"))]);
        let plan = restore(vec![candidate("pool1", "vrf0", "fd00:0:0:1::")], &vrfs);
        assert!(plan.adopted.is_empty());
        assert_eq!(plan.released.len(), 1);
    }

    #[test]
    fn vrf_with_different_pool_ref_is_released() {
        let vrfs = store(vec![vrf("vrf0", Some("65000:1"), Some("pool2"))]);
        let plan = restore(vec![candidate("pool1", "vrf0", "fd00:0:0:1::")], &vrfs);
        assert!(plan.adopted.is_empty());
        assert_eq!(plan.released.len(), 1);
    }

    #[test]
    fn compatible_vrf_adopts_unchanged() {
        let vrfs = store(vec![vrf("vrf0", Some("65000:1"), Some("pool1"))]);
        let cand = candidate("pool1", "vrf0", "fd00:0:0:1::");
        let plan = restore(vec![cand.clone()], &vrfs);
        assert_eq!(plan.adopted, vec![("vrf0".to_string(), cand)]);
        assert!(plan.released.is_empty());
    }

    #[test]
    fn duplicate_allocations_adopt_lexicographically_earliest() {
        let vrfs = store(vec![vrf("vrf0", Some("65000:1"), Some("pool1"))]);
        let first = candidate("pool1", "vrf0", "fd00:0:0:1::");
        let second = candidate("pool1", "vrf0", "fd00:0:0:2::");
        // Feed them in reverse order; the tie-break must not depend on
        // input order.
        let plan = restore(vec![second.clone(), first.clone()], &vrfs);
        assert_eq!(plan.adopted, vec![("vrf0".to_string(), first)]);
        assert_eq!(plan.released, vec![second]);
    }
}
