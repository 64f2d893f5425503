// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Address, CIDR and segment-identifier primitives shared by the reconciler
//! and its stores. Deliberately small: no packet parsing lives here, only
//! the handful of newtypes the data model (§3 of the spec) is built from.

pub mod cidr;
pub mod sid;
pub mod vrf_id;

pub use cidr::{CidrError, Ipv4Cidr};
pub use sid::{AddressFamily, BehaviorAction, BehaviorType, Sid, SidCanonicalizeError};
pub use vrf_id::VrfId;
