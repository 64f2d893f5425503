// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The single coalescing wake signal shared by every store and the
//! reconciler (§5): "external callbacks ... set a wake flag. The reconciler
//! drains the wake flag and runs one pass; if the wake flag is set again
//! during the pass, another pass follows (no missed updates, no unbounded
//! coalescing loss)".

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// A dirty flag plus a `Notify`, together giving "at least one more pass
/// runs if anything changed since the last one started" without queuing
/// individual events.
#[derive(Debug, Default)]
pub struct WakeSignal {
    dirty: AtomicBool,
    notify: Notify,
}

impl WakeSignal {
    /// A fresh signal, already dirty so the very first `wait` (once startup
    /// preconditions are met) runs an initial pass even with no callbacks
    /// having fired yet.
    #[must_use]
    pub fn new() -> Self {
        WakeSignal {
            dirty: AtomicBool::new(true),
            notify: Notify::new(),
        }
    }

    /// Mark the signal dirty and wake anyone waiting on it. Called by store
    /// mutators after every add/update/delete.
    pub fn wake(&self) {
        self.dirty.store(true, Ordering::Release);
        self.notify.notify_one();
    }

    /// Block until [`Self::wake`] has been called since the last
    /// [`Self::take_dirty`].
    pub async fn notified(&self) {
        self.notify.notified().await;
    }

    /// Atomically read-and-clear the dirty flag.
    #[must_use]
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_dirty() {
        let wake = WakeSignal::new();
        assert!(wake.take_dirty());
        assert!(!wake.take_dirty());
    }

    #[tokio::test]
    async fn wake_after_drain_is_observed_again() {
        let wake = WakeSignal::new();
        assert!(wake.take_dirty());
        wake.wake();
        wake.notified().await;
        assert!(wake.take_dirty());
    }
}
