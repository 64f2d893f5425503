// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Validates and normalizes inbound VRF/policy CRDs into `model` records
//! (§4.1). CIDR normalization and SID canonicalization themselves live on
//! the `net` types; this crate is a thin validating adapter on top.

mod error;
pub mod raw;

pub use error::ParseError;

use model::{EgressPolicy, Endpoint, LabelSelector, Vrf, VrfRule};
use net::{Ipv4Cidr, Sid, VrfId};
use raw::{RawEgressPolicy, RawEndpoint, RawVrf, RawVrfRule};

/// Parse and validate a raw VRF rule.
///
/// # Errors
///
/// Returns [`ParseError::EmptyRules`] if `raw` has no selectors or no CIDRs,
/// or [`ParseError::InvalidCidr`] if any CIDR fails to parse.
fn parse_rule(raw: &RawVrfRule) -> Result<VrfRule, ParseError> {
    if raw.selectors.is_empty() || raw.cidrs.is_empty() {
        return Err(ParseError::EmptyRules);
    }
    let selectors = raw
        .selectors
        .iter()
        .map(|requirements| LabelSelector::new(requirements.clone()))
        .collect();
    let cidrs = raw
        .cidrs
        .iter()
        .map(|s| Ipv4Cidr::parse_normalized(s))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(VrfRule { selectors, cidrs })
}

/// Parse and validate a raw VRF CRD into a [`model::Vrf`].
///
/// The returned `Vrf` always has `sid_info: None` — SID binding is
/// reconciler-managed, never part of the input (§3).
///
/// # Errors
///
/// See [`ParseError`]: malformed rule CIDRs, rules with zero selectors or
/// destinations, or a malformed `export_route_target`.
pub fn parse_vrf(raw: &RawVrf) -> Result<Vrf, ParseError> {
    let rules = raw
        .rules
        .iter()
        .map(parse_rule)
        .collect::<Result<Vec<_>, _>>()?;

    let export_route_target = if raw.export_route_target.is_empty() {
        None
    } else {
        Some(raw.export_route_target.parse()?)
    };

    let locator_pool_ref = if raw.locator_pool_ref.is_empty() {
        None
    } else {
        Some(raw.locator_pool_ref.clone())
    };

    Ok(Vrf {
        name: raw.name.clone(),
        vrf_id: VrfId::new(raw.vrf_id),
        rules,
        export_route_target,
        locator_pool_ref,
        sid_info: None,
    })
}

/// Parse and validate a raw egress policy CRD into a [`model::EgressPolicy`].
///
/// # Errors
///
/// Returns [`ParseError::EmptyRules`] if `raw.cidrs` is empty,
/// [`ParseError::InvalidCidr`] if any CIDR fails to parse, or
/// [`ParseError::InvalidSid`] if `raw.dest_sid` fails to canonicalize.
pub fn parse_policy(raw: &RawEgressPolicy) -> Result<EgressPolicy, ParseError> {
    if raw.cidrs.is_empty() {
        return Err(ParseError::EmptyRules);
    }
    let cidrs = raw
        .cidrs
        .iter()
        .map(|s| Ipv4Cidr::parse_normalized(s))
        .collect::<Result<Vec<_>, _>>()?;
    let dest_sid = Sid::canonicalize(&raw.dest_sid)?;
    Ok(EgressPolicy {
        name: raw.name.clone(),
        vrf_id: VrfId::new(raw.vrf_id),
        cidrs,
        dest_sid,
    })
}

/// Parse and validate a raw endpoint CRD into a [`model::Endpoint`].
///
/// Unlike VRFs and policies, an endpoint carries no CIDR or SID fields —
/// the only thing to validate is that every address parses as IPv4
/// (§4.2: the endpoint index itself handles a pending, unresolved
/// `identity` by marking the endpoint inactive, not by rejecting it here).
///
/// # Errors
///
/// Returns [`ParseError::InvalidAddress`] if any entry in `raw.ips` fails
/// to parse as an IPv4 address.
pub fn parse_endpoint(raw: &RawEndpoint) -> Result<Endpoint, ParseError> {
    let ips = raw
        .ips
        .iter()
        .map(|s| {
            s.parse()
                .map_err(|_| ParseError::InvalidAddress(s.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Endpoint {
        name: raw.name.clone(),
        labels: raw.labels.clone(),
        identity: raw.identity.map(id::Identity::new),
        ips,
    })
}
