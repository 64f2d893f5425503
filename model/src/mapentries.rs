// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Keys for the three datapath maps the reconciler produces (§3).

use net::{Ipv4Cidr, Sid, VrfId};
use std::net::Ipv4Addr;

/// VRF map key: `(source IPv4, destination CIDR) → vrfID`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VrfMapKey {
    /// Source address of an egress packet.
    pub src: Ipv4Addr,
    /// Destination CIDR the packet's destination falls within.
    pub dst: Ipv4Cidr,
}

/// Policy map key: `(vrfID, destination CIDR) → destination SID`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolicyMapKey {
    /// The VRF this policy entry belongs to.
    pub vrf: VrfId,
    /// Destination CIDR.
    pub dst: Ipv4Cidr,
}

/// SID map key: `SID (IPv6) → vrfID`, used for local decapsulation binding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SidMapKey(pub Sid);
