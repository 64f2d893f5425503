// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

/// Runtime reconciliation error kinds (§7).
///
/// None of these ever abort the reconciler's task; they are logged at the
/// point of occurrence and handled per-kind as documented on each variant.
/// The task's only exit path is shutdown (§5).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// A VRF names a locator pool that isn't registered yet. The VRF stays
    /// unresolved (`sid_info == None`) and is retried on the next pass.
    #[error("locator pool {pool:?} is not (yet) known")]
    PoolMissing {
        /// The pool name the VRF asked for.
        pool: String,
    },

    /// An allocator call failed. Surfaced and retried on the next pass.
    #[error("SID allocation failed for VRF {vrf:?}: {reason}")]
    AllocationFailed {
        /// The VRF the allocation was for.
        vrf: String,
        /// A human-readable reason, from the allocator.
        reason: String,
    },

    /// A single map write failed. Logged and skipped; other entries in the
    /// same pass are still reconciled, and this entry is retried next pass.
    #[error("datapath map I/O failed: {0}")]
    MapIo(String),

    /// Two sources (a VRF's `SidInfo` and an `EgressPolicy`, or two
    /// policies) claim the same SID with different vrfIDs. The first-seen
    /// binding is kept; the later one is dropped.
    #[error("SID {sid} claimed by both vrf {first_vrf} and vrf {second_vrf}")]
    SidConflict {
        /// The conflicting SID, rendered for display.
        sid: String,
        /// The vrfID that claimed the SID first (kept).
        first_vrf: String,
        /// The vrfID that claimed the SID second (dropped).
        second_vrf: String,
    },
}
