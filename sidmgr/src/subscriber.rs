// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use sidalloc::LocatorAllocator;
use std::future::Future;
use std::sync::Arc;

/// The four locator lifecycle callbacks the SID manager delivers (§4.6).
///
/// Implemented by `reconciler` and handed to [`crate::SidManager::subscribe`].
pub trait Subscriber<L: LocatorAllocator>: Send + Sync {
    /// A new locator pool appeared. Implementors should register it and
    /// re-evaluate any VRF that names it.
    fn on_add_locator(&self, pool: String, allocator: Arc<L>) -> impl Future<Output = ()> + Send;

    /// `pool`'s allocator was replaced. If the advertised behavior type
    /// changed, every VRF currently bound to `pool` must release via `old`
    /// and reallocate via `new` (§4.6).
    fn on_update_locator(
        &self,
        pool: String,
        old: Arc<L>,
        new: Arc<L>,
    ) -> impl Future<Output = ()> + Send;

    /// `pool` is gone. Every VRF bound to it loses its `SidInfo`.
    fn on_delete_locator(&self, pool: String) -> impl Future<Output = ()> + Send;
}
