// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! The reconciliation core (§4, §5): a single level-triggered pass loop that
//! joins endpoints, VRFs and egress policies into three datapath maps, owns
//! SID lifecycle through [`sidalloc`], recovers bindings across restart
//! through [`sidmgr`], and kicks a [`bgp::Signaler`] on VPN-relevant change.

mod apply;
mod pass;
mod sid_reconcile;
mod subscriber;

use apply::diff_apply;
use bgp::Signaler;
use common::{Config, Latch, WakeSignal};
use endpoint::EndpointIndex;
use maps::DatapathMap;
use model::{PolicyMapKey, SidMapKey, Vrf, VrfMapKey};
use net::{Sid, VrfId};
use sid_reconcile::SidReconcile;
use sidalloc::{DefaultAllocator, LocatorAllocator, SidAllocatorFacade};
use sidmgr::{RestoredSid, SidManager};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use store::{PolicyStore, VrfStore};
use subscriber::ManagerSubscriber;
use tokio::sync::watch;
use tracing::Instrument;

/// What a single [`Reconciler::pass`] did, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Total map writes (upserts + deletes) across all three maps.
    pub writes: usize,
    /// Whether the BGP signaler was kicked this pass.
    pub kicked: bool,
}

/// The reconciliation core, generic over the three datapath maps, the two
/// SID allocator kinds, the SID manager, and the BGP signaler — no `dyn`
/// anywhere, per the rest of this workspace.
pub struct Reconciler<VM, PM, SMap, D, L, Mgr, Sig> {
    vrf_store: Arc<VrfStore>,
    policy_store: Arc<PolicyStore>,
    endpoints: Arc<EndpointIndex>,
    facade: Arc<SidAllocatorFacade<D, L>>,
    vrf_map: VM,
    policy_map: PM,
    sid_map: SMap,
    sid_manager: Arc<Mgr>,
    signaler: Sig,
    wake: Arc<WakeSignal>,
    cache_synced: Arc<Latch>,
    allocator_installed: Arc<Latch>,
    config: Config,
    last_vpn_hash: AtomicU64,
    have_vpn_hash: AtomicBool,
    pass_id: AtomicU64,
}

impl<VM, PM, SMap, D, L, Mgr, Sig> Reconciler<VM, PM, SMap, D, L, Mgr, Sig>
where
    VM: DatapathMap<VrfMapKey, VrfId>,
    PM: DatapathMap<PolicyMapKey, Sid>,
    SMap: DatapathMap<SidMapKey, VrfId>,
    D: DefaultAllocator,
    L: LocatorAllocator,
    Mgr: SidManager<L>,
    Sig: Signaler,
{
    /// Assemble a reconciler from its already-constructed parts. `wake`,
    /// `cache_synced` and `allocator_installed` are shared with whatever
    /// wiring code feeds the stores and the restart-recovery scan (§5): the
    /// latches are fired externally, not by this type.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vrf_store: Arc<VrfStore>,
        policy_store: Arc<PolicyStore>,
        endpoints: Arc<EndpointIndex>,
        facade: Arc<SidAllocatorFacade<D, L>>,
        vrf_map: VM,
        policy_map: PM,
        sid_map: SMap,
        sid_manager: Arc<Mgr>,
        signaler: Sig,
        wake: Arc<WakeSignal>,
        cache_synced: Arc<Latch>,
        allocator_installed: Arc<Latch>,
        config: Config,
    ) -> Self {
        Reconciler {
            vrf_store,
            policy_store,
            endpoints,
            facade,
            vrf_map,
            policy_map,
            sid_map,
            sid_manager,
            signaler,
            wake,
            cache_synced,
            allocator_installed,
            config,
            last_vpn_hash: AtomicU64::new(0),
            have_vpn_hash: AtomicBool::new(false),
            pass_id: AtomicU64::new(0),
        }
    }

    /// Fires once the initial cache load has completed (§5's first startup
    /// precondition).
    #[must_use]
    pub fn cache_synced(&self) -> &Latch {
        &self.cache_synced
    }

    /// Fires once the default SID allocator is installed (§5's second
    /// startup precondition).
    #[must_use]
    pub fn allocator_installed(&self) -> &Latch {
        &self.allocator_installed
    }

    /// A name-ordered snapshot of every known VRF (§6's `GetAllVRFs`).
    #[must_use]
    pub fn get_all_vrfs(&self) -> BTreeMap<String, Vrf> {
        self.vrf_store.snapshot()
    }

    /// Subscribe to the SID manager and run the restart-recovery scan
    /// (§4.6): register every pool already known at subscription time, fold
    /// its previously-allocated SIDs through [`sidmgr::restore`], adopt the
    /// compatible ones into the VRF store, and release the rest.
    pub async fn subscribe_sid_manager(&self) {
        let subscriber = Arc::new(ManagerSubscriber::new(
            self.facade.clone(),
            self.vrf_store.clone(),
            self.wake.clone(),
        ));
        let candidates = self.sid_manager.subscribe(subscriber).await;
        let vrfs = self.vrf_store.snapshot();
        let plan = sidmgr::restore(candidates, &vrfs);

        for (vrf_name, restored) in plan.adopted {
            let info = restored_to_sid_info(&restored);
            tracing::info!(vrf = vrf_name, sid = %info.sid, "adopted restored SID binding");
            self.vrf_store
                .set_sid(&vrf_name, Some(info), Some(restored.pool));
        }
        for released in plan.released {
            let info = restored_to_sid_info(&released);
            self.facade.release(&info, Some(&released.pool)).await;
        }
        self.wake.wake();
    }

    /// Run one reconciliation pass (§4.5): reconcile SID bindings, recompute
    /// desired map contents from scratch, diff-apply each map, and kick the
    /// BGP signaler if the VPN-relevant projection changed.
    ///
    /// Every pass runs inside its own `reconcile_pass` span (`pass_id`,
    /// `vrf_count`) so a single pass's log lines can be grepped together.
    pub async fn pass(&self) -> PassReport {
        let pass_id = self.pass_id.fetch_add(1, Ordering::Relaxed);
        let span = tracing::info_span!("reconcile_pass", pass_id, vrf_count = tracing::field::Empty);
        self.run_pass().instrument(span).await
    }

    async fn run_pass(&self) -> PassReport {
        self.reconcile_sids().await;

        let vrfs = self.vrf_store.snapshot();
        let policies = self.policy_store.snapshot();
        tracing::Span::current().record("vrf_count", vrfs.len());

        let desired = pass::compute_desired_state(&vrfs, &policies, &self.endpoints);

        if !self.config.enable_srv6 {
            tracing::debug!("srv6 disabled; skipping map writes this pass");
            return PassReport::default();
        }

        let mut writes = diff_apply(&self.vrf_map, &desired.vrf_map);
        writes += diff_apply(&self.policy_map, &desired.policy_map);
        writes += diff_apply(&self.sid_map, &desired.sid_map);

        let kicked = self.maybe_kick_bgp(desired.vpn_projection_hash);

        PassReport { writes, kicked }
    }

    /// Step 1 (§4.5): reconcile every VRF's SID binding against its current
    /// one, writing the outcome back into the store. Errors are logged and
    /// leave the VRF unresolved for the next pass (§7); they never abort the
    /// pass for other VRFs.
    async fn reconcile_sids(&self) {
        let sid_reconcile = SidReconcile::new(&self.facade);
        for (name, vrf) in self.vrf_store.snapshot() {
            let observation = vrf
                .sid_info
                .clone()
                .map(|info| (info, self.vrf_store.sid_source(&name)));
            match rekon::Reconcile::reconcile(&sid_reconcile, vrf, observation).await {
                Ok(outcome) => {
                    let source = outcome.as_ref().and_then(|(_, source)| source.clone());
                    let info = outcome.map(|(info, _)| info);
                    self.vrf_store.set_sid(&name, info, source);
                }
                Err(err) => {
                    tracing::warn!(vrf = name, %err, "SID reconciliation failed; retrying next pass");
                }
            }
        }
    }

    /// Step 6 (§4.7): kick the signaler if the VPN-relevant projection
    /// changed since the last pass. The *previous* stored hash (not the one
    /// just written) is what `changed` is computed against.
    fn maybe_kick_bgp(&self, projection_hash: u64) -> bool {
        let previously_set = self.have_vpn_hash.swap(true, Ordering::AcqRel);
        let previous_hash = self.last_vpn_hash.swap(projection_hash, Ordering::AcqRel);
        let changed = !previously_set || previous_hash != projection_hash;
        if changed {
            self.signaler.kick();
        }
        changed
    }

    /// The main loop (§5): wait for both startup preconditions, subscribe to
    /// the SID manager, then repeatedly drain the wake signal and pass until
    /// `shutdown` fires. `WakeSignal` starts dirty, so the loop checks for
    /// dirty work *before* waiting — otherwise the very first pass would
    /// never run without an external wake.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tokio::join!(self.cache_synced.wait(), self.allocator_installed.wait());
        self.subscribe_sid_manager().await;

        loop {
            if *shutdown.borrow() {
                return;
            }

            while self.wake.take_dirty() {
                let report = self.pass().await;
                tracing::debug!(writes = report.writes, kicked = report.kicked, "pass complete");
                if *shutdown.borrow() {
                    return;
                }
            }

            tokio::select! {
                () = self.wake.notified() => {}
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        return;
                    }
                }
            }
        }
    }
}

fn restored_to_sid_info(restored: &RestoredSid) -> model::SidInfo {
    model::SidInfo {
        owner: restored.owner.clone(),
        metadata: restored.metadata.clone(),
        sid: restored.sid,
        behavior_type: restored.behavior_type,
        behavior_action: restored
            .behavior_type
            .derive_action(net::AddressFamily::V4),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maps::InMemoryMap;
    use model::{EgressPolicy, Endpoint, LabelSelector, VrfRule};
    use net::Ipv4Cidr;
    use sidalloc::inmem::{InMemoryDefaultAllocator, InMemoryLocatorAllocator};
    use sidmgr::inmem::InMemorySidManager;
    use std::net::Ipv6Addr;
    use std::sync::atomic::AtomicUsize;
    use tracing_test::traced_test;

    #[derive(Clone, Default)]
    struct CountingSignaler {
        kicks: Arc<AtomicUsize>,
    }

    impl CountingSignaler {
        fn count(&self) -> usize {
            self.kicks.load(Ordering::SeqCst)
        }
    }

    impl Signaler for CountingSignaler {
        fn kick(&self) {
            self.kicks.fetch_add(1, Ordering::SeqCst);
        }
    }

    type TestReconciler = Reconciler<
        InMemoryMap<VrfMapKey, VrfId>,
        InMemoryMap<PolicyMapKey, Sid>,
        InMemoryMap<SidMapKey, VrfId>,
        InMemoryDefaultAllocator,
        InMemoryLocatorAllocator,
        InMemorySidManager<InMemoryLocatorAllocator>,
        CountingSignaler,
    >;

    fn build() -> (TestReconciler, CountingSignaler) {
        let wake = Arc::new(WakeSignal::new());
        let vrf_store = Arc::new(VrfStore::new(wake.clone()));
        let policy_store = Arc::new(PolicyStore::new(wake.clone()));
        let endpoints = Arc::new(EndpointIndex::new(wake.clone()));
        let facade = Arc::new(SidAllocatorFacade::new(Arc::new(
            InMemoryDefaultAllocator::new(Ipv6Addr::new(0xfd00, 0, 1, 0, 0, 0, 0, 0)),
        )));
        let sid_manager = Arc::new(InMemorySidManager::<InMemoryLocatorAllocator>::new());
        let signaler = CountingSignaler::default();
        let config = Config { enable_srv6: true };

        let reconciler = Reconciler::new(
            vrf_store,
            policy_store,
            endpoints,
            facade,
            InMemoryMap::new(),
            InMemoryMap::new(),
            InMemoryMap::new(),
            sid_manager,
            signaler.clone(),
            wake,
            Arc::new(Latch::new()),
            Arc::new(Latch::new()),
            config,
        );
        (reconciler, signaler)
    }

    fn endpoint(name: &str, vrf_label: &str, ips: &[&str]) -> Endpoint {
        Endpoint {
            name: name.to_string(),
            labels: [("vrf".to_string(), vrf_label.to_string())].into(),
            identity: Some(id::Identity::new(1)),
            ips: ips.iter().map(|s| s.parse().unwrap()).collect(),
        }
    }

    fn vrf_rule(vrf_label: &str, cidr: &str) -> VrfRule {
        VrfRule {
            selectors: vec![LabelSelector::new(
                [("vrf".to_string(), vrf_label.to_string())].into(),
            )],
            cidrs: vec![cidr.parse().unwrap()],
        }
    }

    fn vrf(name: &str, vrf_id: u32, rules: Vec<VrfRule>, rt: Option<&str>) -> Vrf {
        Vrf {
            name: name.to_string(),
            vrf_id: VrfId::new(vrf_id),
            rules,
            export_route_target: rt.map(|s| s.parse().unwrap()),
            locator_pool_ref: None,
            sid_info: None,
        }
    }

    #[tokio::test]
    async fn add_vrf_with_matching_selector_populates_vrf_map() {
        let (reconciler, _signaler) = build();
        reconciler
            .endpoints
            .on_update_endpoint(endpoint("pod1", "blue", &["10.0.0.1"]));
        reconciler
            .vrf_store
            .upsert(vrf("vrf0", 7, vec![vrf_rule("blue", "10.0.0.0/24")], None));

        reconciler.pass().await;

        let key = VrfMapKey {
            src: "10.0.0.1".parse().unwrap(),
            dst: "10.0.0.0/24".parse().unwrap(),
        };
        assert_eq!(reconciler.vrf_map.lookup(&key), Ok(VrfId::new(7)));
    }

    #[tokio::test]
    async fn updating_vrf_id_rewrites_vrf_map_entry() {
        let (reconciler, _signaler) = build();
        reconciler
            .endpoints
            .on_update_endpoint(endpoint("pod1", "blue", &["10.0.0.1"]));
        reconciler
            .vrf_store
            .upsert(vrf("vrf0", 7, vec![vrf_rule("blue", "10.0.0.0/24")], None));
        reconciler.pass().await;

        reconciler
            .vrf_store
            .upsert(vrf("vrf0", 9, vec![vrf_rule("blue", "10.0.0.0/24")], None));
        reconciler.pass().await;

        let key = VrfMapKey {
            src: "10.0.0.1".parse().unwrap(),
            dst: "10.0.0.0/24".parse().unwrap(),
        };
        assert_eq!(reconciler.vrf_map.lookup(&key), Ok(VrfId::new(9)));
    }

    #[tokio::test]
    async fn adding_route_target_allocates_from_default_allocator() {
        let (reconciler, _signaler) = build();
        reconciler
            .vrf_store
            .upsert(vrf("vrf0", 1, vec![], Some("65000:1")));
        reconciler.pass().await;

        let vrfs = reconciler.get_all_vrfs();
        let sid_info = vrfs
            .get("vrf0")
            .and_then(|v| v.sid_info.clone())
            .expect("SID should have been allocated");
        assert_eq!(sid_info.behavior_type, net::BehaviorType::Base);
    }

    #[tokio::test]
    async fn switching_to_pool_backed_sid_reallocates_via_pool() {
        let (reconciler, _signaler) = build();
        reconciler
            .vrf_store
            .upsert(vrf("vrf0", 1, vec![], Some("65000:1")));
        reconciler.pass().await;

        reconciler.facade.register_pool(
            "pool1".to_string(),
            Arc::new(InMemoryLocatorAllocator::new(
                Ipv6Addr::new(0xfd00, 0, 1, 2, 0, 0, 0, 0),
                net::BehaviorType::uSID,
            )),
        );
        let mut updated = vrf("vrf0", 1, vec![], Some("65000:1"));
        updated.locator_pool_ref = Some("pool1".to_string());
        reconciler.vrf_store.upsert(updated);
        reconciler.pass().await;

        let vrfs = reconciler.get_all_vrfs();
        let sid_info = vrfs.get("vrf0").and_then(|v| v.sid_info.clone()).unwrap();
        assert_eq!(sid_info.behavior_type, net::BehaviorType::uSID);
    }

    #[tokio::test]
    async fn pool_appearing_late_resolves_on_a_later_pass() {
        let (reconciler, _signaler) = build();
        let mut wants_pool = vrf("vrf0", 1, vec![], Some("65000:1"));
        wants_pool.locator_pool_ref = Some("pool1".to_string());
        reconciler.vrf_store.upsert(wants_pool);
        reconciler.pass().await;
        assert!(reconciler.get_all_vrfs()["vrf0"].sid_info.is_none());

        reconciler.facade.register_pool(
            "pool1".to_string(),
            Arc::new(InMemoryLocatorAllocator::new(
                Ipv6Addr::new(0xfd00, 0, 1, 2, 0, 0, 0, 0),
                net::BehaviorType::Base,
            )),
        );
        reconciler.wake.wake();
        reconciler.pass().await;
        assert!(reconciler.get_all_vrfs()["vrf0"].sid_info.is_some());
    }

    #[tokio::test]
    async fn restoration_with_duplicate_allocations_adopts_one_and_releases_the_rest() {
        let (reconciler, _signaler) = build();
        let mut wants_pool = vrf("vrf0", 1, vec![], Some("65000:1"));
        wants_pool.locator_pool_ref = Some("pool1".to_string());
        reconciler.vrf_store.upsert(wants_pool);

        let pool = Arc::new(InMemoryLocatorAllocator::new(
            Ipv6Addr::new(0xfd00, 0, 1, 2, 0, 0, 0, 0),
            net::BehaviorType::Base,
        ));
        let first = Sid::canonicalize("fd00:0:1:1::").unwrap();
        let second = Sid::canonicalize("fd00:0:1:2::").unwrap();
        pool.seed(second, common::OWNER, "vrf0");
        pool.seed(first, common::OWNER, "vrf0");
        reconciler.sid_manager.seed_pool("pool1", pool).await;

        reconciler.subscribe_sid_manager().await;

        let vrfs = reconciler.get_all_vrfs();
        let sid_info = vrfs.get("vrf0").and_then(|v| v.sid_info.clone()).unwrap();
        assert_eq!(sid_info.sid, first, "earliest SID must be adopted");
    }

    #[tokio::test]
    #[traced_test]
    async fn idempotent_second_pass_writes_nothing_and_does_not_rekick() {
        let (reconciler, signaler) = build();
        reconciler
            .endpoints
            .on_update_endpoint(endpoint("pod1", "blue", &["10.0.0.1"]));
        reconciler
            .vrf_store
            .upsert(vrf("vrf0", 1, vec![vrf_rule("blue", "10.0.0.0/24")], Some("65000:1")));

        let first = reconciler.pass().await;
        assert!(first.writes > 0);
        assert!(first.kicked);
        assert_eq!(signaler.count(), 1);

        let second = reconciler.pass().await;
        assert_eq!(second.writes, 0, "no input change must mean no map writes");
        assert!(!second.kicked, "no input change must mean no second kick");
        assert_eq!(signaler.count(), 1);
    }

    #[tokio::test]
    async fn sid_map_stays_consistent_with_bound_vrfs() {
        let (reconciler, _signaler) = build();
        reconciler
            .vrf_store
            .upsert(vrf("vrf0", 3, vec![], Some("65000:1")));
        reconciler.pass().await;

        let vrfs = reconciler.get_all_vrfs();
        let sid = vrfs["vrf0"].sid_info.as_ref().unwrap().sid;
        let key = SidMapKey(sid);
        assert_eq!(reconciler.sid_map.lookup(&key), Ok(VrfId::new(3)));
    }

    #[tokio::test]
    async fn egress_policy_populates_policy_map() {
        let (reconciler, _signaler) = build();
        reconciler.policy_store.upsert(EgressPolicy {
            name: "pol0".to_string(),
            vrf_id: VrfId::new(4),
            cidrs: vec!["10.1.0.0/24".parse::<Ipv4Cidr>().unwrap()],
            dest_sid: Sid::canonicalize("fd00:0:2:1::").unwrap(),
        });
        reconciler.pass().await;

        let key = PolicyMapKey {
            vrf: VrfId::new(4),
            dst: "10.1.0.0/24".parse().unwrap(),
        };
        assert_eq!(
            reconciler.policy_map.lookup(&key),
            Ok(Sid::canonicalize("fd00:0:2:1::").unwrap())
        );
    }

    #[tokio::test]
    async fn srv6_disabled_skips_map_writes() {
        let (reconciler, signaler) = build();
        let disabled = Reconciler::new(
            reconciler.vrf_store.clone(),
            reconciler.policy_store.clone(),
            reconciler.endpoints.clone(),
            reconciler.facade.clone(),
            InMemoryMap::new(),
            InMemoryMap::new(),
            InMemoryMap::new(),
            reconciler.sid_manager.clone(),
            signaler,
            reconciler.wake.clone(),
            Arc::new(Latch::new()),
            Arc::new(Latch::new()),
            Config { enable_srv6: false },
        );
        disabled
            .vrf_store
            .upsert(vrf("vrf0", 1, vec![], Some("65000:1")));
        let report = disabled.pass().await;
        assert_eq!(report, PassReport::default());
    }
}
