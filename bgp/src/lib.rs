// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! The BGP signaler kick (§4.7): a zero-payload, level-triggered
//! notification that VPN-relevant state changed. The real BGP control-plane
//! signaler process is out of scope; this crate only defines the one-method
//! seam the reconciler calls through, plus a reference implementation.

use std::sync::Arc;
use tokio::sync::Notify;

/// Outbound interface to the external BGP signaler (§6): "a single
/// `Event()` method".
pub trait Signaler: Send + Sync {
    /// Notify the signaler that VPN-relevant state changed. Level-triggered
    /// by convention: the reconciler calls this at most once per pass
    /// (§4.7), and calling it more than once before anyone reacts must
    /// still only produce one observable wakeup.
    fn kick(&self);
}

/// Reference [`Signaler`] built on [`tokio::sync::Notify`], which coalesces
/// same-pass kicks by construction: `notify_one` called twice before anyone
/// awaits `notified` still only wakes one waiter once.
#[derive(Debug, Default)]
pub struct NotifySignaler {
    notify: Arc<Notify>,
}

impl NotifySignaler {
    #[must_use]
    pub fn new() -> Self {
        NotifySignaler {
            notify: Arc::new(Notify::new()),
        }
    }

    /// Resolve once [`Signaler::kick`] has been called since the last call
    /// to this method. Whatever drives the real BGP signaling connection
    /// awaits this in a loop.
    pub async fn notified(&self) {
        self.notify.notified().await;
    }
}

impl Clone for NotifySignaler {
    fn clone(&self) -> Self {
        NotifySignaler {
            notify: self.notify.clone(),
        }
    }
}

impl Signaler for NotifySignaler {
    fn kick(&self) {
        self.notify.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn kick_wakes_a_waiter() {
        let signaler = NotifySignaler::new();
        signaler.kick();
        tokio::time::timeout(Duration::from_millis(50), signaler.notified())
            .await
            .expect("kick should have woken the waiter");
    }

    #[tokio::test]
    async fn double_kick_before_await_coalesces_to_one_wakeup() {
        let signaler = NotifySignaler::new();
        signaler.kick();
        signaler.kick();
        signaler.notified().await;
        let second = tokio::time::timeout(Duration::from_millis(20), signaler.notified()).await;
        assert!(
            second.is_err(),
            "two kicks before any await must not queue two wakeups"
        );
    }
}
