// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use crate::error::AllocError;
use model::SidInfo;
use net::{BehaviorType, Sid};
use std::future::Future;

/// The default, non-pool SID allocator (§4.4: "empty → default IPAM
/// allocator"). Always produces `Base`/`EndDT4` bindings.
///
/// `async fn`-in-trait isn't used here (as in [`rekon`](../rekon/index.html)):
/// an explicit `-> impl Future<..> + Send` keeps the `Send` bound under the
/// implementor's control, which matters since allocator calls may suspend on
/// the SID manager's per-pool critical section (§5).
pub trait DefaultAllocator: Send + Sync {
    /// Allocate the next available SID for `owner`/`metadata`.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::Failed`] if the allocator has no SIDs left or
    /// the underlying call fails.
    fn allocate_next(
        &self,
        owner: &str,
        metadata: &str,
    ) -> impl Future<Output = Result<SidInfo, AllocError>> + Send;

    /// Bind a specific, already-known SID (used during restoration).
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::Failed`] if `sid` is already bound elsewhere.
    fn allocate(
        &self,
        sid: Sid,
        owner: &str,
        metadata: &str,
    ) -> impl Future<Output = Result<SidInfo, AllocError>> + Send;

    /// Release a previously allocated SID. Releasing an unknown SID is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::Failed`] on an underlying I/O failure.
    fn release(&self, sid: Sid) -> impl Future<Output = Result<(), AllocError>> + Send;

    /// List every SID currently allocated to `owner` (§4.6's restoration
    /// scan reads this for the default allocator too, in principle; in
    /// practice only locator pools persist across restarts here).
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::Failed`] on an underlying I/O failure.
    fn allocated_sids(
        &self,
        owner: &str,
    ) -> impl Future<Output = Result<Vec<SidInfo>, AllocError>> + Send;
}

/// A named locator pool's allocator (§4.4: "non-empty → call
/// `ManageSID(poolName, fn)`"), obtained through the SID manager (`sidmgr`)
/// and registered with [`crate::SidAllocatorFacade`].
///
/// Every locator pool advertises one [`BehaviorType`] for its whole
/// lifetime (until [`Self::behavior_type`] itself changes via an
/// `OnUpdateLocator`, at which point `sidmgr` swaps the registered
/// allocator object wholesale rather than mutating this one in place).
pub trait LocatorAllocator: Send + Sync {
    /// The behavior family this pool advertises.
    fn behavior_type(&self) -> BehaviorType;

    /// Allocate the next available SID for `owner`/`metadata`, with the
    /// given behavior (always [`Self::behavior_type`] in practice — see
    /// [`crate::SidAllocatorFacade::allocate_for`]).
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::Failed`] if the pool has no SIDs left.
    fn allocate_next(
        &self,
        owner: &str,
        metadata: &str,
        behavior: BehaviorType,
    ) -> impl Future<Output = Result<SidInfo, AllocError>> + Send;

    /// Bind a specific, already-known SID (used during restoration).
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::Failed`] if `sid` is already bound elsewhere.
    fn allocate(
        &self,
        sid: Sid,
        owner: &str,
        metadata: &str,
        behavior: BehaviorType,
    ) -> impl Future<Output = Result<SidInfo, AllocError>> + Send;

    /// Release a previously allocated SID.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::Failed`] on an underlying I/O failure.
    fn release(&self, sid: Sid) -> impl Future<Output = Result<(), AllocError>> + Send;

    /// List every SID this pool has allocated to `owner`. Read once at
    /// subscription time to drive restoration (§4.6).
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::Failed`] on an underlying I/O failure.
    fn allocated_sids(
        &self,
        owner: &str,
    ) -> impl Future<Output = Result<Vec<SidInfo>, AllocError>> + Send;
}
