// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! A one-shot, multi-waiter gate.
//!
//! Used for the reconciler's two startup preconditions (§5): cache sync
//! done, and the default SID allocator installed. Both are modeled as a
//! `Latch`; the reconciler `.wait()`s on both, in either order, before its
//! first pass — "order between them is arbitrary".

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct Latch {
    fired: AtomicBool,
    notify: Notify,
}

impl Latch {
    #[must_use]
    pub fn new() -> Self {
        Latch {
            fired: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Fire the latch. Idempotent; subsequent calls are no-ops.
    pub fn fire(&self) {
        self.fired.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Resolve once [`Self::fire`] has been called, including if it already
    /// was before this call.
    pub async fn wait(&self) {
        loop {
            if self.is_fired() {
                return;
            }
            let notified = self.notify.notified();
            if self.is_fired() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn wait_resolves_immediately_if_already_fired() {
        let latch = Latch::new();
        latch.fire();
        latch.wait().await;
    }

    #[tokio::test]
    async fn wait_resolves_after_fire_from_another_task() {
        let latch = Arc::new(Latch::new());
        let waiter = {
            let latch = latch.clone();
            tokio::spawn(async move {
                latch.wait().await;
            })
        };
        latch.fire();
        waiter.await.expect("waiter task panicked");
    }
}
