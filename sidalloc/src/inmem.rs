// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Reference in-memory test doubles for [`crate::DefaultAllocator`] and
//! [`crate::LocatorAllocator`], used by `reconciler`'s tests and the
//! example `agent` binary in place of a real IPAM allocator or a real
//! connection to the external SID manager.

use crate::allocator::{DefaultAllocator, LocatorAllocator};
use crate::error::AllocError;
use model::SidInfo;
use net::{BehaviorType, Sid};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::Ipv6Addr;
use std::sync::atomic::{AtomicU32, Ordering};

fn next_address(base: Ipv6Addr, offset: u32) -> Ipv6Addr {
    Ipv6Addr::from(u128::from(base) + u128::from(offset))
}

/// Hands out sequential addresses under `base`, always `Base`/`EndDT4`.
pub struct InMemoryDefaultAllocator {
    base: Ipv6Addr,
    next: AtomicU32,
    allocated: Mutex<HashMap<Sid, SidInfo>>,
}

impl InMemoryDefaultAllocator {
    #[must_use]
    pub fn new(base: Ipv6Addr) -> Self {
        InMemoryDefaultAllocator {
            base,
            next: AtomicU32::new(1),
            allocated: Mutex::new(HashMap::new()),
        }
    }

    fn bind(&self, sid: Sid, owner: &str, metadata: &str) -> SidInfo {
        let info = SidInfo {
            owner: owner.to_string(),
            metadata: metadata.to_string(),
            sid,
            behavior_type: BehaviorType::Base,
            behavior_action: BehaviorType::Base.derive_action(net::AddressFamily::V4),
        };
        self.allocated.lock().insert(sid, info.clone());
        info
    }
}

impl DefaultAllocator for InMemoryDefaultAllocator {
    async fn allocate_next(&self, owner: &str, metadata: &str) -> Result<SidInfo, AllocError> {
        let offset = self.next.fetch_add(1, Ordering::Relaxed);
        let sid = Sid::new(next_address(self.base, offset), net::DEFAULT_LOCATOR_LEN)
            .map_err(|err| AllocError::Failed(err.to_string()))?;
        Ok(self.bind(sid, owner, metadata))
    }

    async fn allocate(&self, sid: Sid, owner: &str, metadata: &str) -> Result<SidInfo, AllocError> {
        if self.allocated.lock().contains_key(&sid) {
            return Err(AllocError::Failed(format!("{sid} already allocated")));
        }
        Ok(self.bind(sid, owner, metadata))
    }

    async fn release(&self, sid: Sid) -> Result<(), AllocError> {
        self.allocated.lock().remove(&sid);
        Ok(())
    }

    async fn allocated_sids(&self, owner: &str) -> Result<Vec<SidInfo>, AllocError> {
        Ok(self
            .allocated
            .lock()
            .values()
            .filter(|info| info.owner == owner)
            .cloned()
            .collect())
    }
}

/// A single named locator pool: sequential addresses under `base`, a fixed
/// advertised [`BehaviorType`].
pub struct InMemoryLocatorAllocator {
    base: Ipv6Addr,
    behavior_type: BehaviorType,
    next: AtomicU32,
    allocated: Mutex<HashMap<Sid, SidInfo>>,
}

impl InMemoryLocatorAllocator {
    #[must_use]
    pub fn new(base: Ipv6Addr, behavior_type: BehaviorType) -> Self {
        InMemoryLocatorAllocator {
            base,
            behavior_type,
            next: AtomicU32::new(1),
            allocated: Mutex::new(HashMap::new()),
        }
    }

    /// Seed a pre-existing allocation, as if it had been made before the
    /// process started — used to build restoration-scan test scenarios.
    pub fn seed(&self, sid: Sid, owner: &str, metadata: &str) {
        let info = SidInfo {
            owner: owner.to_string(),
            metadata: metadata.to_string(),
            sid,
            behavior_type: self.behavior_type,
            behavior_action: self.behavior_type.derive_action(net::AddressFamily::V4),
        };
        self.allocated.lock().insert(sid, info);
    }

    fn bind(&self, sid: Sid, owner: &str, metadata: &str, behavior: BehaviorType) -> SidInfo {
        let info = SidInfo {
            owner: owner.to_string(),
            metadata: metadata.to_string(),
            sid,
            behavior_type: behavior,
            behavior_action: behavior.derive_action(net::AddressFamily::V4),
        };
        self.allocated.lock().insert(sid, info.clone());
        info
    }
}

impl LocatorAllocator for InMemoryLocatorAllocator {
    fn behavior_type(&self) -> BehaviorType {
        self.behavior_type
    }

    async fn allocate_next(
        &self,
        owner: &str,
        metadata: &str,
        behavior: BehaviorType,
    ) -> Result<SidInfo, AllocError> {
        let offset = self.next.fetch_add(1, Ordering::Relaxed);
        let sid = Sid::new(next_address(self.base, offset), net::DEFAULT_LOCATOR_LEN)
            .map_err(|err| AllocError::Failed(err.to_string()))?;
        Ok(self.bind(sid, owner, metadata, behavior))
    }

    async fn allocate(
        &self,
        sid: Sid,
        owner: &str,
        metadata: &str,
        behavior: BehaviorType,
    ) -> Result<SidInfo, AllocError> {
        if self.allocated.lock().contains_key(&sid) {
            return Err(AllocError::Failed(format!("{sid} already allocated")));
        }
        Ok(self.bind(sid, owner, metadata, behavior))
    }

    async fn release(&self, sid: Sid) -> Result<(), AllocError> {
        self.allocated.lock().remove(&sid);
        Ok(())
    }

    async fn allocated_sids(&self, owner: &str) -> Result<Vec<SidInfo>, AllocError> {
        Ok(self
            .allocated
            .lock()
            .values()
            .filter(|info| info.owner == owner)
            .cloned()
            .collect())
    }
}
