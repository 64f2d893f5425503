// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! The endpoint index (§4.2): the sole source of truth for "which endpoint
//! IPs live under which labels".

use ahash::RandomState;
use common::WakeSignal;
use model::{Endpoint, LabelSelector};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Keyed by endpoint name. Mutated only in response to `OnUpdateEndpoint`
/// and `OnDeleteEndpoint`; every mutation wakes the reconciler.
pub struct EndpointIndex {
    inner: Mutex<HashMap<String, Endpoint, RandomState>>,
    wake: Arc<WakeSignal>,
}

impl EndpointIndex {
    #[must_use]
    pub fn new(wake: Arc<WakeSignal>) -> Self {
        EndpointIndex {
            inner: Mutex::new(HashMap::default()),
            wake,
        }
    }

    /// Store or replace `endpoint` by name (§4.2).
    pub fn on_update_endpoint(&self, endpoint: Endpoint) {
        self.inner.lock().insert(endpoint.name.clone(), endpoint);
        self.wake.wake();
    }

    /// Remove the endpoint named `name`, if present.
    pub fn on_delete_endpoint(&self, name: &str) {
        self.inner.lock().remove(name);
        self.wake.wake();
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Endpoint> {
        self.inner.lock().get(name).cloned()
    }

    /// Every IPv4 address belonging to an *active* endpoint (identity
    /// resolved) matching any of `selectors`.
    ///
    /// A rule's selectors match the union of all of them (§4.3/GLOSSARY);
    /// the empty selector list matches nothing, same as an individual empty
    /// [`LabelSelector`].
    #[must_use]
    pub fn ips_matching(&self, selectors: &[LabelSelector]) -> BTreeSet<Ipv4Addr> {
        let guard = self.inner.lock();
        let mut ips = BTreeSet::new();
        for endpoint in guard.values() {
            if !endpoint.is_active() {
                continue;
            }
            if selectors.iter().any(|s| s.matches(&endpoint.labels)) {
                ips.extend(endpoint.ips.iter().copied());
            }
        }
        ips
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use id::Identity;

    fn endpoint(name: &str, vrf: &str, identity: Option<u32>, ips: &[&str]) -> Endpoint {
        Endpoint {
            name: name.to_string(),
            labels: [("vrf".to_string(), vrf.to_string())].into(),
            identity: identity.map(Identity::new),
            ips: ips.iter().map(|s| s.parse().unwrap()).collect(),
        }
    }

    fn selector(vrf: &str) -> LabelSelector {
        LabelSelector::new([("vrf".to_string(), vrf.to_string())].into())
    }

    #[test]
    fn matches_only_active_endpoints() {
        let index = EndpointIndex::new(Arc::new(WakeSignal::new()));
        index.on_update_endpoint(endpoint("pod1", "vrf0", Some(1), &["10.0.0.1"]));
        index.on_update_endpoint(endpoint("pod2", "vrf0", None, &["10.0.0.2"]));

        let ips = index.ips_matching(&[selector("vrf0")]);
        assert_eq!(ips.len(), 1);
        assert!(ips.contains(&"10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn empty_selector_list_matches_nothing() {
        let index = EndpointIndex::new(Arc::new(WakeSignal::new()));
        index.on_update_endpoint(endpoint("pod1", "vrf0", Some(1), &["10.0.0.1"]));
        assert!(index.ips_matching(&[]).is_empty());
    }

    #[test]
    fn delete_removes_endpoint() {
        let index = EndpointIndex::new(Arc::new(WakeSignal::new()));
        index.on_update_endpoint(endpoint("pod1", "vrf0", Some(1), &["10.0.0.1"]));
        index.on_delete_endpoint("pod1");
        assert!(index.ips_matching(&[selector("vrf0")]).is_empty());
    }

    #[test]
    fn update_replaces_by_name() {
        let index = EndpointIndex::new(Arc::new(WakeSignal::new()));
        index.on_update_endpoint(endpoint("pod1", "vrf0", Some(1), &["10.0.0.1"]));
        index.on_update_endpoint(endpoint("pod1", "vrf1", Some(1), &["10.0.0.1"]));
        assert!(index.ips_matching(&[selector("vrf0")]).is_empty());
        assert_eq!(index.ips_matching(&[selector("vrf1")]).len(), 1);
    }
}
