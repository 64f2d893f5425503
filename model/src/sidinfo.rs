// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use net::{BehaviorAction, BehaviorType, Sid};

/// A SID record bound to a VRF.
///
/// `owner` is always `common::OWNER` (`"srv6-manager"`); `metadata` is the
/// owning VRF's name. Reconciler-managed: nothing outside the reconciler
/// ever constructs or mutates a `SidInfo` that's attached to a `Vrf`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SidInfo {
    /// Always `common::OWNER`.
    pub owner: String,
    /// The VRF name this SID is bound to.
    pub metadata: String,
    /// The segment identifier itself.
    pub sid: Sid,
    /// Which behavior family the owning pool advertises.
    pub behavior_type: BehaviorType,
    /// The concrete datapath behavior, derived from `behavior_type`.
    pub behavior_action: BehaviorAction,
}
