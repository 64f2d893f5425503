// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! A reference [`crate::SidManager`] backed by in-memory [`sidalloc`]
//! allocators, used by `reconciler`'s tests and the example `agent` binary
//! in place of a real connection to the external SID manager process.

use crate::manager::{SidManager, SidManagerError};
use crate::restore::RestoredSid;
use crate::subscriber::Subscriber;
use sidalloc::LocatorAllocator;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Pools known to this manager, keyed by name. A real implementation would
/// serialize access per pool inside `manage_sid`; this reference one holds
/// everything behind a single lock since it's only ever exercised by tests
/// and the example binary, never under real concurrency pressure.
pub struct InMemorySidManager<L> {
    pools: Mutex<HashMap<String, Arc<L>>>,
}

impl<L: LocatorAllocator> InMemorySidManager<L> {
    #[must_use]
    pub fn new() -> Self {
        InMemorySidManager {
            pools: Mutex::new(HashMap::new()),
        }
    }

    /// Register a pool as if the external manager already knew about it
    /// before the process started — used to seed restoration scenarios.
    pub async fn seed_pool(&self, name: impl Into<String>, allocator: Arc<L>) {
        self.pools.lock().await.insert(name.into(), allocator);
    }

    /// Register a new pool after subscription is already active, driving
    /// `on_add_locator` on `subscriber` (§4.6).
    pub async fn add_pool<S>(&self, name: impl Into<String>, allocator: Arc<L>, subscriber: &S)
    where
        S: Subscriber<L>,
    {
        let name = name.into();
        self.pools.lock().await.insert(name.clone(), allocator.clone());
        subscriber.on_add_locator(name, allocator).await;
    }

    /// Replace an existing pool's allocator, driving `on_update_locator`.
    pub async fn update_pool<S>(&self, name: impl Into<String>, allocator: Arc<L>, subscriber: &S)
    where
        S: Subscriber<L>,
    {
        let name = name.into();
        let old = self
            .pools
            .lock()
            .await
            .insert(name.clone(), allocator.clone());
        if let Some(old) = old {
            subscriber.on_update_locator(name, old, allocator).await;
        }
    }

    /// Remove a pool, driving `on_delete_locator`.
    pub async fn delete_pool<S>(&self, name: &str, subscriber: &S)
    where
        S: Subscriber<L>,
    {
        if self.pools.lock().await.remove(name).is_some() {
            subscriber.on_delete_locator(name.to_string()).await;
        }
    }
}

impl<L: LocatorAllocator> Default for InMemorySidManager<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: LocatorAllocator> SidManager<L> for InMemorySidManager<L> {
    async fn manage_sid(&self, pool: &str) -> Result<Arc<L>, SidManagerError> {
        self.pools
            .lock()
            .await
            .get(pool)
            .cloned()
            .ok_or_else(|| SidManagerError::PoolMissing(pool.to_string()))
    }

    async fn subscribe<S>(&self, subscriber: Arc<S>) -> Vec<RestoredSid>
    where
        S: Subscriber<L> + 'static,
    {
        let pools: Vec<(String, Arc<L>)> = self
            .pools
            .lock()
            .await
            .iter()
            .map(|(name, allocator)| (name.clone(), allocator.clone()))
            .collect();

        let mut restored = Vec::new();
        for (name, allocator) in pools {
            subscriber
                .on_add_locator(name.clone(), allocator.clone())
                .await;
            if let Ok(sids) = allocator.allocated_sids(common::OWNER).await {
                restored.extend(sids.into_iter().map(|info| RestoredSid {
                    pool: name.clone(),
                    owner: info.owner,
                    metadata: info.metadata,
                    sid: info.sid,
                    behavior_type: info.behavior_type,
                }));
            }
        }
        restored
    }
}
