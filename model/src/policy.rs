// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use net::{Ipv4Cidr, Sid, VrfId};

/// An explicit, VRF-scoped egress route.
///
/// Bypasses selector matching for the SID lookup side, but still programs
/// the `(vrfID, CIDR) → SID` policy-map entry (and the `SID → vrfID`
/// SID-map entry) like a selector-derived VRF would.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EgressPolicy {
    /// Unique key.
    pub name: String,
    /// The VRF this policy is scoped to.
    pub vrf_id: VrfId,
    /// Destination CIDRs. Never empty.
    pub cidrs: Vec<Ipv4Cidr>,
    /// The destination segment identifier to steer matching traffic to.
    pub dest_sid: Sid,
}
