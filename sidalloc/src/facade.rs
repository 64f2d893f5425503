// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use crate::allocator::{DefaultAllocator, LocatorAllocator};
use crate::error::AllocError;
use model::{SidInfo, Vrf};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Abstracts over {default IPAM allocator, locator-pool allocator} and
/// chooses the right one per VRF (§4.4).
///
/// The pool registry is populated externally — by `sidmgr`'s
/// `OnAddLocator`/`OnUpdateLocator`/`OnDeleteLocator` callbacks — rather
/// than by this type reaching out to the SID manager itself on every
/// allocation. By the time a pool name appears here, whatever registered it
/// is already responsible for any per-pool serialization the real SID
/// manager's `ManageSID` provides (§5).
pub struct SidAllocatorFacade<D, L> {
    default: Arc<D>,
    pools: Mutex<HashMap<String, Arc<L>>>,
}

impl<D, L> SidAllocatorFacade<D, L>
where
    D: DefaultAllocator,
    L: LocatorAllocator,
{
    /// Build a façade around the default allocator. Locator pools are added
    /// later via [`Self::register_pool`].
    #[must_use]
    pub fn new(default: Arc<D>) -> Self {
        SidAllocatorFacade {
            default,
            pools: Mutex::new(HashMap::new()),
        }
    }

    /// Register (or replace) the allocator backing `name`.
    pub fn register_pool(&self, name: String, allocator: Arc<L>) {
        self.pools.lock().insert(name, allocator);
    }

    /// Unregister `name`, returning the allocator that was backing it, if
    /// any.
    pub fn unregister_pool(&self, name: &str) -> Option<Arc<L>> {
        self.pools.lock().remove(name)
    }

    /// The allocator currently backing `name`, if registered.
    #[must_use]
    pub fn pool(&self, name: &str) -> Option<Arc<L>> {
        self.pools.lock().get(name).cloned()
    }

    /// Allocate a fresh `SidInfo` for `vrf`, using the default allocator if
    /// `vrf.locator_pool_ref` is `None`, or the named pool's allocator
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::PoolMissing`] if `vrf.locator_pool_ref` names a
    /// pool not yet registered, or [`AllocError::Failed`] if the
    /// underlying allocator call fails.
    pub async fn allocate_for(&self, vrf: &Vrf) -> Result<SidInfo, AllocError> {
        match &vrf.locator_pool_ref {
            None => self.default.allocate_next(common::OWNER, &vrf.name).await,
            Some(pool_name) => {
                let pool = self
                    .pool(pool_name)
                    .ok_or_else(|| AllocError::PoolMissing(pool_name.clone()))?;
                let behavior = pool.behavior_type();
                pool.allocate_next(common::OWNER, &vrf.name, behavior).await
            }
        }
    }

    /// Release `sid_info` via the allocator that produced it. `source` is
    /// the pool name that produced it, or `None` for the default allocator
    /// (§4.4: "releases via the allocator that produced the current
    /// `SIDInfo`").
    ///
    /// Best-effort: if `source` names a pool that no longer exists, this
    /// logs and returns without error (§4.4, §7).
    pub async fn release(&self, sid_info: &SidInfo, source: Option<&str>) {
        let result = match source {
            None => self.default.release(sid_info.sid).await,
            Some(pool_name) => match self.pool(pool_name) {
                Some(pool) => pool.release(sid_info.sid).await,
                None => {
                    tracing::warn!(
                        pool = pool_name,
                        sid = %sid_info.sid,
                        "releasing SID from a pool that no longer exists; best effort"
                    );
                    return;
                }
            },
        };
        if let Err(err) = result {
            tracing::warn!(sid = %sid_info.sid, %err, "SID release failed; best effort");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::inmem::{InMemoryDefaultAllocator, InMemoryLocatorAllocator};
    use net::VrfId;
    use std::net::Ipv6Addr;

    fn vrf(name: &str, pool: Option<&str>) -> Vrf {
        Vrf {
            name: name.to_string(),
            vrf_id: VrfId::new(1),
            rules: vec![],
            export_route_target: Some("65000:1".parse().unwrap()),
            locator_pool_ref: pool.map(str::to_string),
            sid_info: None,
        }
    }

    #[tokio::test]
    async fn default_allocator_used_when_no_pool_ref() {
        let facade: SidAllocatorFacade<InMemoryDefaultAllocator, InMemoryLocatorAllocator> =
            SidAllocatorFacade::new(Arc::new(InMemoryDefaultAllocator::new(Ipv6Addr::new(
                0xfd00, 0, 1, 0, 0, 0, 0, 0,
            ))));
        let info = facade.allocate_for(&vrf("vrf0", None)).await.unwrap();
        assert_eq!(info.behavior_type, net::BehaviorType::Base);
    }

    #[tokio::test]
    async fn pool_missing_errors() {
        let facade: SidAllocatorFacade<InMemoryDefaultAllocator, InMemoryLocatorAllocator> =
            SidAllocatorFacade::new(Arc::new(InMemoryDefaultAllocator::new(Ipv6Addr::new(
                0xfd00, 0, 1, 0, 0, 0, 0, 0,
            ))));
        let err = facade
            .allocate_for(&vrf("vrf0", Some("pool1")))
            .await
            .unwrap_err();
        assert_eq!(err, AllocError::PoolMissing("pool1".to_string()));
    }

    #[tokio::test]
    async fn registered_pool_used_once_present() {
        let facade: SidAllocatorFacade<InMemoryDefaultAllocator, InMemoryLocatorAllocator> =
            SidAllocatorFacade::new(Arc::new(InMemoryDefaultAllocator::new(Ipv6Addr::new(
                0xfd00, 0, 1, 0, 0, 0, 0, 0,
            ))));
        facade.register_pool(
            "pool1".to_string(),
            Arc::new(InMemoryLocatorAllocator::new(
                Ipv6Addr::new(0xfd00, 0, 1, 2, 0, 0, 0, 0),
                net::BehaviorType::uSID,
            )),
        );
        let info = facade
            .allocate_for(&vrf("vrf0", Some("pool1")))
            .await
            .unwrap();
        assert_eq!(info.behavior_type, net::BehaviorType::uSID);
    }

    #[tokio::test]
    async fn release_of_unregistered_pool_is_best_effort() {
        let facade: SidAllocatorFacade<InMemoryDefaultAllocator, InMemoryLocatorAllocator> =
            SidAllocatorFacade::new(Arc::new(InMemoryDefaultAllocator::new(Ipv6Addr::new(
                0xfd00, 0, 1, 0, 0, 0, 0, 0,
            ))));
        let info = SidInfo {
            owner: common::OWNER.to_string(),
            metadata: "vrf0".to_string(),
            sid: net::Sid::canonicalize("fd00:0:1:1::").unwrap(),
            behavior_type: net::BehaviorType::Base,
            behavior_action: net::BehaviorAction::EndDT4,
        };
        // Must not panic even though "gone-pool" was never registered.
        facade.release(&info, Some("gone-pool")).await;
    }
}
