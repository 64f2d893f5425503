// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Loosely-typed stand-ins for the CRD payloads the (out-of-scope)
//! Kubernetes-style watchers would hand this core. Everything here is
//! `String`-typed on purpose — the job of this crate is turning exactly
//! this kind of untrusted, textual input into `model` types.

use std::collections::BTreeMap;

/// A raw VRF rule, as it would arrive off the wire: label selectors as
/// plain key/value maps, CIDRs as unparsed strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawVrfRule {
    /// Each map is one selector; `rules` match the union of all of them.
    pub selectors: Vec<BTreeMap<String, String>>,
    /// Unparsed, unnormalized destination CIDRs.
    pub cidrs: Vec<String>,
}

/// A raw VRF CRD.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawVrf {
    pub name: String,
    pub vrf_id: u32,
    pub rules: Vec<RawVrfRule>,
    /// Empty string means "no route target".
    pub export_route_target: String,
    /// Empty string means "no locator pool, use the default allocator".
    pub locator_pool_ref: String,
}

/// A raw egress policy CRD.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawEgressPolicy {
    pub name: String,
    pub vrf_id: u32,
    pub cidrs: Vec<String>,
    pub dest_sid: String,
}

/// A raw endpoint CRD. `identity` arrives pre-resolved (or absent, if
/// resolution is still pending) — the identity allocator that performs that
/// resolution is out of scope (§1); this crate only validates the addresses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawEndpoint {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub identity: Option<u32>,
    /// Unparsed IPv4 addresses.
    pub ips: Vec<String>,
}
