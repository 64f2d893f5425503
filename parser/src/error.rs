// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use net::{CidrError, SidCanonicalizeError};

/// Parse-time validation failures (§4.1, §7 `ErrInvalidInput` family).
///
/// A `ParseError` always means the input was dropped: the callback that
/// produced it reports the error and nothing is stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A destination CIDR string didn't parse.
    #[error("invalid CIDR: {0}")]
    InvalidCidr(#[from] CidrError),

    /// A SID string didn't canonicalize.
    #[error("invalid SID: {0}")]
    InvalidSid(#[from] SidCanonicalizeError),

    /// A VRF rule had zero selectors or zero destination CIDRs.
    #[error("rule has no selectors or no destination CIDRs")]
    EmptyRules,

    /// A route target string wasn't a valid `ASN:value` pair.
    #[error("invalid route target: {0}")]
    InvalidRouteTarget(#[from] model::RouteTargetError),

    /// An endpoint IP address string didn't parse as IPv4.
    #[error("invalid IPv4 address: {0}")]
    InvalidAddress(String),
}
