// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The SID manager subscriber (§4.6): drives [`sidalloc::SidAllocatorFacade`]'s
//! pool registry from the manager's locator lifecycle callbacks and wakes the
//! reconciler so the next pass picks up the change.

use common::WakeSignal;
use sidalloc::{DefaultAllocator, LocatorAllocator, SidAllocatorFacade};
use sidmgr::Subscriber;
use std::sync::Arc;
use store::VrfStore;

/// Bridges [`sidmgr::SidManager`] callbacks onto the reconciler's own state:
/// the allocator façade's pool registry and the VRF store's SID bookkeeping.
pub(crate) struct ManagerSubscriber<D, L> {
    facade: Arc<SidAllocatorFacade<D, L>>,
    vrf_store: Arc<VrfStore>,
    wake: Arc<WakeSignal>,
}

impl<D, L> ManagerSubscriber<D, L> {
    pub(crate) fn new(
        facade: Arc<SidAllocatorFacade<D, L>>,
        vrf_store: Arc<VrfStore>,
        wake: Arc<WakeSignal>,
    ) -> Self {
        ManagerSubscriber {
            facade,
            vrf_store,
            wake,
        }
    }

    /// Clear `sid_info` for every VRF currently bound through `pool`,
    /// releasing each one via `allocator` first. Used when a pool's
    /// allocator is replaced or removed outright.
    async fn release_and_clear_pool<A>(&self, pool: &str, allocator: &A)
    where
        A: LocatorAllocator,
    {
        for (name, vrf) in self.vrf_store.snapshot() {
            if vrf.locator_pool_ref.as_deref() != Some(pool) {
                continue;
            }
            let Some(info) = &vrf.sid_info else {
                continue;
            };
            if let Err(err) = allocator.release(info.sid).await {
                tracing::warn!(vrf = name, %err, "releasing SID during pool change failed; best effort");
            }
            self.vrf_store.set_sid(&name, None, None);
        }
    }
}

impl<D, L> Subscriber<L> for ManagerSubscriber<D, L>
where
    D: DefaultAllocator,
    L: LocatorAllocator,
{
    async fn on_add_locator(&self, pool: String, allocator: Arc<L>) {
        self.facade.register_pool(pool, allocator);
        self.wake.wake();
    }

    async fn on_update_locator(&self, pool: String, old: Arc<L>, new: Arc<L>) {
        if old.behavior_type() != new.behavior_type() {
            self.release_and_clear_pool(&pool, old.as_ref()).await;
        }
        self.facade.register_pool(pool, new);
        self.wake.wake();
    }

    async fn on_delete_locator(&self, pool: String) {
        if let Some(allocator) = self.facade.unregister_pool(&pool) {
            self.release_and_clear_pool(&pool, allocator.as_ref()).await;
        }
        self.wake.wake();
    }
}
