// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use crate::route_target::RouteTarget;
use crate::selector::LabelSelector;
use crate::sidinfo::SidInfo;
use net::{Ipv4Cidr, VrfId};

/// One rule within a VRF: endpoints matching any of `selectors`, restricted
/// to `cidrs`, belong to this VRF.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VrfRule {
    /// Label selectors over endpoints (a rule matches the union of all of
    /// them). Never empty — the parser rejects rules with zero selectors.
    pub selectors: Vec<LabelSelector>,
    /// Destination CIDRs this rule applies to. Never empty — the parser
    /// rejects rules with zero destinations.
    pub cidrs: Vec<Ipv4Cidr>,
}

/// A routing domain.
///
/// `sid_info` is reconciler-managed: `None` when no SID is currently bound,
/// regardless of whether one is desired (a pool that hasn't appeared yet
/// also leaves this `None`, §4.5 step 1).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vrf {
    /// Unique key.
    pub name: String,
    /// Small integer used in map values.
    pub vrf_id: VrfId,
    /// Ordered rules; order matters only for readability — selection is a
    /// union across rules, not first-match.
    pub rules: Vec<VrfRule>,
    /// BGP VPN route target. `None` ⇒ `sid_info` must be `None` (§3 invariant).
    pub export_route_target: Option<RouteTarget>,
    /// Named locator pool this VRF's SID should come from, if any.
    /// `None` ⇒ SID comes from the default allocator.
    pub locator_pool_ref: Option<String>,
    /// Reconciler-managed SID binding.
    pub sid_info: Option<SidInfo>,
}

impl Vrf {
    /// Whether this VRF wants a SID at all (§4.5 step 1).
    #[must_use]
    pub const fn wants_sid(&self) -> bool {
        self.export_route_target.is_some()
    }

    /// Whether the locator pool this VRF currently asks for matches the pool
    /// that produced its current `sid_info`, if any.
    ///
    /// Used by the reconciler to detect the "allocator switch" case (§4.4):
    /// a mismatch here means release-then-reallocate, not an in-place update.
    #[must_use]
    pub fn sid_source_matches(&self, producing_pool: Option<&str>) -> bool {
        self.locator_pool_ref.as_deref() == producing_pool
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn wants_sid_tracks_export_route_target() {
        let mut vrf = Vrf {
            name: "vrf0".to_string(),
            vrf_id: VrfId::new(1),
            rules: vec![],
            export_route_target: None,
            locator_pool_ref: None,
            sid_info: None,
        };
        assert!(!vrf.wants_sid());
        vrf.export_route_target = Some("65000:1".parse().expect("valid rt for test"));
        assert!(vrf.wants_sid());
    }
}
