// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! The reconciliation core's domain model: endpoints, VRFs, egress policies,
//! the SID records the reconciler manages, and the three map-entry shapes
//! the reconciler writes to the datapath.

pub mod endpoint;
pub mod mapentries;
pub mod policy;
pub mod route_target;
pub mod selector;
pub mod sidinfo;
pub mod vrf;

pub use endpoint::Endpoint;
pub use mapentries::{PolicyMapKey, SidMapKey, VrfMapKey};
pub use policy::EgressPolicy;
pub use route_target::{RouteTarget, RouteTargetError};
pub use selector::LabelSelector;
pub use sidinfo::SidInfo;
pub use vrf::{Vrf, VrfRule};
