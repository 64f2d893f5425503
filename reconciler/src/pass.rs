// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The pure desired-state computation (§4.5 steps 2-4 and §4.7): a
//! function of the store snapshots and the endpoint index, with no side
//! effects on the maps or allocators themselves.

use common::ReconcileError;
use endpoint::EndpointIndex;
use model::{EgressPolicy, PolicyMapKey, SidMapKey, Vrf, VrfMapKey};
use net::{Sid, VrfId};
use std::collections::BTreeMap;
use std::hash::{BuildHasher, Hash, Hasher};

/// The three desired map contents plus the VPN-relevant projection hash
/// (§4.7), computed fresh from the stores on every pass.
pub(crate) struct DesiredState {
    pub(crate) vrf_map: BTreeMap<VrfMapKey, VrfId>,
    pub(crate) policy_map: BTreeMap<PolicyMapKey, Sid>,
    pub(crate) sid_map: BTreeMap<SidMapKey, VrfId>,
    pub(crate) vpn_projection_hash: u64,
}

/// Compute desired state from the current stores (§4.5 steps 2-4, §4.7).
///
/// `vrfs` and `policies` must already be ordered by name (both
/// `VrfStore::snapshot` and `PolicyStore::snapshot` return `BTreeMap`s) so
/// that the VRF-map's first-seen-wins tie-break (§9's open question) is
/// deterministic.
pub(crate) fn compute_desired_state(
    vrfs: &BTreeMap<String, Vrf>,
    policies: &BTreeMap<String, EgressPolicy>,
    endpoints: &EndpointIndex,
) -> DesiredState {
    let vrf_map = desired_vrf_map(vrfs, endpoints);
    let policy_map = desired_policy_map(policies);
    let sid_map = desired_sid_map(vrfs, policies);
    let vpn_projection_hash = hash_vpn_projection(vrfs);

    DesiredState {
        vrf_map,
        policy_map,
        sid_map,
        vpn_projection_hash,
    }
}

/// Step 2: for each VRF rule, intersect `IPsMatching(selectors)` with the
/// rule's CIDRs. Duplicate `(ip, cidr)` keys across VRFs: first-seen wins,
/// by iterating VRFs in name order (§9).
fn desired_vrf_map(
    vrfs: &BTreeMap<String, Vrf>,
    endpoints: &EndpointIndex,
) -> BTreeMap<VrfMapKey, VrfId> {
    let mut desired = BTreeMap::new();
    for vrf in vrfs.values() {
        for rule in &vrf.rules {
            let ips = endpoints.ips_matching(&rule.selectors);
            for ip in ips {
                for cidr in &rule.cidrs {
                    desired
                        .entry(VrfMapKey { src: ip, dst: *cidr })
                        .or_insert(vrf.vrf_id);
                }
            }
        }
    }
    desired
}

/// Step 3: `(policy.vrfID, cidr) -> policy.destSID` for every policy CIDR.
fn desired_policy_map(policies: &BTreeMap<String, EgressPolicy>) -> BTreeMap<PolicyMapKey, Sid> {
    let mut desired = BTreeMap::new();
    for policy in policies.values() {
        for cidr in &policy.cidrs {
            desired.insert(
                PolicyMapKey {
                    vrf: policy.vrf_id,
                    dst: *cidr,
                },
                policy.dest_sid,
            );
        }
    }
    desired
}

/// Step 4: the union of VRF `SidInfo.sid -> vrfID` and policy
/// `destSID -> vrfID`. Conflicting claims on the same SID by different
/// vrfIDs keep the first-seen claimant and log `ErrSIDConflict` (§7).
fn desired_sid_map(
    vrfs: &BTreeMap<String, Vrf>,
    policies: &BTreeMap<String, EgressPolicy>,
) -> BTreeMap<SidMapKey, VrfId> {
    let mut desired = BTreeMap::new();
    for vrf in vrfs.values() {
        if let Some(info) = &vrf.sid_info {
            claim_sid(&mut desired, info.sid, vrf.vrf_id, &vrf.name);
        }
    }
    for policy in policies.values() {
        claim_sid(&mut desired, policy.dest_sid, policy.vrf_id, &policy.name);
    }
    desired
}

fn claim_sid(desired: &mut BTreeMap<SidMapKey, VrfId>, sid: Sid, vrf_id: VrfId, claimant: &str) {
    let key = SidMapKey(sid);
    match desired.get(&key) {
        Some(existing) if *existing != vrf_id => {
            let err = ReconcileError::SidConflict {
                sid: sid.to_string(),
                first_vrf: existing.to_string(),
                second_vrf: vrf_id.to_string(),
            };
            tracing::warn!(claimant, %err, "dropping later SID claim");
        }
        Some(_) => {}
        None => {
            desired.insert(key, vrf_id);
        }
    }
}

/// Step 6: a cheap hash of `{vrf.name -> (vrfID, RT, SidInfo.sid,
/// rule-hash)}`, restricted to VRFs with a non-empty route target (§4.7).
/// Deterministic across calls with identical input (fixed hasher seed) so
/// that "no change since last pass" is detectable by equality of this
/// value alone.
fn hash_vpn_projection(vrfs: &BTreeMap<String, Vrf>) -> u64 {
    let build_hasher = ahash::RandomState::with_seed(0);
    let mut hasher = build_hasher.build_hasher();
    for (name, vrf) in vrfs {
        let Some(rt) = &vrf.export_route_target else {
            continue;
        };
        name.hash(&mut hasher);
        vrf.vrf_id.hash(&mut hasher);
        rt.hash(&mut hasher);
        vrf.sid_info.as_ref().map(|info| info.sid).hash(&mut hasher);
        vrf.rules.hash(&mut hasher);
    }
    hasher.finish()
}
