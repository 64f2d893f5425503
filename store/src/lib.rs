// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! The canonical in-memory VRF and egress-policy stores (§4.3).
//!
//! Both are keyed by name, add/update is idempotent (replace by name), and
//! every mutation wakes the reconciler. `VrfStore` additionally tracks,
//! per VRF, which locator pool (if any) produced the VRF's current
//! `sid_info` — reconciler bookkeeping that must survive a VRF spec update
//! (§4.4's "allocator switch" detection needs it), so it lives alongside
//! the VRF rather than inside the VRF record that external input replaces.

use common::WakeSignal;
use model::{EgressPolicy, Vrf};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone, Debug)]
struct StoredVrf {
    vrf: Vrf,
    /// `None` when the current `sid_info` (if any) came from the default
    /// allocator, or when nothing has been allocated yet.
    sid_source: Option<String>,
}

/// The VRF store (§4.3). Ordering by name matters: the reconciler's §4.5
/// step-2 first-seen-wins tie-break relies on `snapshot()` iterating in
/// name order.
pub struct VrfStore {
    inner: Mutex<BTreeMap<String, StoredVrf>>,
    wake: Arc<WakeSignal>,
}

impl VrfStore {
    #[must_use]
    pub fn new(wake: Arc<WakeSignal>) -> Self {
        VrfStore {
            inner: Mutex::new(BTreeMap::new()),
            wake,
        }
    }

    /// Add or replace `vrf` by name. If an entry with the same name already
    /// exists, its reconciler-managed `sid_info` (and the pool that
    /// produced it) carries over onto the new record — a spec update must
    /// not silently drop a live SID binding; the next pass decides whether
    /// it's still valid.
    pub fn upsert(&self, mut vrf: Vrf) {
        let mut guard = self.inner.lock();
        let sid_source = if let Some(existing) = guard.get(&vrf.name) {
            vrf.sid_info = existing.vrf.sid_info.clone();
            existing.sid_source.clone()
        } else {
            None
        };
        guard.insert(vrf.name.clone(), StoredVrf { vrf, sid_source });
        drop(guard);
        self.wake.wake();
    }

    /// Remove the VRF named `name`, if present.
    pub fn remove(&self, name: &str) -> Option<Vrf> {
        let removed = self.inner.lock().remove(name).map(|s| s.vrf);
        self.wake.wake();
        removed
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Vrf> {
        self.inner.lock().get(name).map(|s| s.vrf.clone())
    }

    /// A stable, name-ordered snapshot of every VRF — the reconciler's
    /// read-at-pass-start and `GetAllVRFs()` (§6).
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Vrf> {
        self.inner
            .lock()
            .iter()
            .map(|(name, stored)| (name.clone(), stored.vrf.clone()))
            .collect()
    }

    /// The locator pool that produced `name`'s current `sid_info`, or
    /// `None` if it came from the default allocator or nothing is bound.
    #[must_use]
    pub fn sid_source(&self, name: &str) -> Option<String> {
        self.inner.lock().get(name).and_then(|s| s.sid_source.clone())
    }

    /// Reconciler-only: update `name`'s `sid_info` and recorded source pool
    /// in place. Does *not* wake the reconciler — this is bookkeeping the
    /// reconciler writes about its own decisions, not new external input.
    pub fn set_sid(&self, name: &str, info: Option<model::SidInfo>, source: Option<String>) {
        let mut guard = self.inner.lock();
        if let Some(stored) = guard.get_mut(name) {
            stored.vrf.sid_info = info;
            stored.sid_source = source;
        }
    }
}

/// The egress-policy store (§4.3). Policies carry no reconciler-managed
/// state, so this is a plain keyed replace-by-name store.
pub struct PolicyStore {
    inner: Mutex<BTreeMap<String, EgressPolicy>>,
    wake: Arc<WakeSignal>,
}

impl PolicyStore {
    #[must_use]
    pub fn new(wake: Arc<WakeSignal>) -> Self {
        PolicyStore {
            inner: Mutex::new(BTreeMap::new()),
            wake,
        }
    }

    pub fn upsert(&self, policy: EgressPolicy) {
        self.inner.lock().insert(policy.name.clone(), policy);
        self.wake.wake();
    }

    pub fn remove(&self, name: &str) -> Option<EgressPolicy> {
        let removed = self.inner.lock().remove(name);
        self.wake.wake();
        removed
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<EgressPolicy> {
        self.inner.lock().get(name).cloned()
    }

    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, EgressPolicy> {
        self.inner.lock().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use net::VrfId;

    fn vrf(name: &str) -> Vrf {
        Vrf {
            name: name.to_string(),
            vrf_id: VrfId::new(1),
            rules: vec![],
            export_route_target: None,
            locator_pool_ref: None,
            sid_info: None,
        }
    }

    #[test]
    fn upsert_preserves_sid_info_across_spec_update() {
        let store = VrfStore::new(Arc::new(WakeSignal::new()));
        store.upsert(vrf("vrf0"));
        let info = model::SidInfo {
            owner: common::OWNER.to_string(),
            metadata: "vrf0".to_string(),
            sid: net::Sid::canonicalize("fd00:0:1:1::").unwrap(),
            behavior_type: net::BehaviorType::Base,
            behavior_action: net::BehaviorAction::EndDT4,
        };
        store.set_sid("vrf0", Some(info.clone()), None);

        let mut updated = vrf("vrf0");
        updated.vrf_id = VrfId::new(2);
        store.upsert(updated);

        let stored = store.get("vrf0").unwrap();
        assert_eq!(stored.vrf_id, VrfId::new(2));
        assert_eq!(stored.sid_info, Some(info));
    }

    #[test]
    fn remove_then_get_is_none() {
        let store = VrfStore::new(Arc::new(WakeSignal::new()));
        store.upsert(vrf("vrf0"));
        store.remove("vrf0");
        assert!(store.get("vrf0").is_none());
    }

    #[test]
    fn snapshot_orders_by_name() {
        let store = VrfStore::new(Arc::new(WakeSignal::new()));
        store.upsert(vrf("zzz"));
        store.upsert(vrf("aaa"));
        let names: Vec<_> = store.snapshot().into_keys().collect();
        assert_eq!(names, vec!["aaa".to_string(), "zzz".to_string()]);
    }
}
