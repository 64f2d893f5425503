// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use id::{Identity, LabelSet};
use std::net::Ipv4Addr;

/// One workload endpoint.
///
/// Created on the first `OnUpdateEndpoint`, mutated (replaced) on
/// subsequent updates, removed on `OnDeleteEndpoint`. If `identity` is
/// `None`, the endpoint is held but contributes nothing to VRF selection —
/// it is *inactive*, not absent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Endpoint {
    /// Stable name, typically `namespace/pod-name`.
    pub name: String,
    /// The endpoint's label set.
    pub labels: LabelSet,
    /// Numeric identity resolved from `labels`, or `None` while pending.
    pub identity: Option<Identity>,
    /// Ordered list of IPv4 addresses owned by this endpoint.
    pub ips: Vec<Ipv4Addr>,
}

impl Endpoint {
    /// Whether this endpoint currently contributes to VRF selection.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.identity.is_some()
    }
}
