// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

/// Allocator-façade errors (§7 `ErrPoolMissing`, `ErrAllocationFailed`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    /// The VRF names a locator pool that isn't registered with the façade
    /// yet. The caller leaves `sid_info` unset and retries next pass.
    #[error("locator pool {0:?} is not (yet) known")]
    PoolMissing(String),

    /// The allocator call itself failed (the underlying allocator's own
    /// error, flattened to text). Surfaced and retried next pass.
    #[error("SID allocation failed: {0}")]
    Failed(String),
}
