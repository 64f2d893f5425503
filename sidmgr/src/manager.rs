// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use crate::restore::RestoredSid;
use crate::subscriber::Subscriber;
use sidalloc::LocatorAllocator;
use std::future::Future;
use std::sync::Arc;

/// Errors from [`SidManager::manage_sid`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SidManagerError {
    /// `ManageSID` was called for a pool the manager doesn't know about.
    #[error("locator pool {0:?} is not known to the SID manager")]
    PoolMissing(String),
}

/// The external SID manager's interface (§6): `ManageSID(pool, fn)` and
/// `Subscribe(name, subscriber, doneCb)`.
///
/// `manage_sid` models "get me the allocator for `pool`, inside the
/// manager's per-pool critical section" (§5) as returning the
/// already-serialized allocator handle rather than taking a closure —
/// idiomatic Rust prefers handing back a guarded value over callback-style
/// APIs, and the handle's own implementation is free to wrap a
/// `tokio::sync::Mutex` internally if it needs to.
///
/// `subscribe` models the spec's `doneCb` as the returned future resolving
/// exactly once, carrying the flattened restoration-scan candidate list
/// (§4.6) — a one-shot, single-settle primitive, per §9's design note on
/// the promise-resolved SID manager.
pub trait SidManager<L: LocatorAllocator>: Send + Sync {
    /// Get the allocator currently backing `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`SidManagerError::PoolMissing`] if `pool` isn't registered.
    fn manage_sid(&self, pool: &str) -> impl Future<Output = Result<Arc<L>, SidManagerError>> + Send;

    /// Register `subscriber` for locator lifecycle callbacks. The returned
    /// future resolves once subscription is active, after having already
    /// delivered one `on_add_locator` per pool the manager currently knows
    /// about, yielding every SID each pool reports as previously allocated
    /// (§4.6's restoration scan).
    fn subscribe<S>(&self, subscriber: Arc<S>) -> impl Future<Output = Vec<RestoredSid>> + Send
    where
        S: Subscriber<L> + 'static;
}
