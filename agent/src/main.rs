// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Example embedding binary for the reconciliation core (§6): wires every
//! seam to an in-memory reference implementation and runs the pass loop
//! until interrupted. A real deployment replaces the in-memory stores'
//! CRD-watcher wiring, the datapath maps, the allocators and the SID
//! manager and BGP signaler with the real things; the reconciliation core
//! itself (`reconciler`) doesn't change.

use clap::Parser;
use std::net::Ipv6Addr;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Parser, Debug)]
#[command(
    name = "srv6em-agent",
    about = "Example embedding binary for the SRv6 egress-manager reconciliation core"
)]
struct Args {
    /// Whether map writes are enabled (§6's `Config.enable_srv6`).
    #[arg(long, env = "SRV6EM_ENABLE_SRV6", default_value_t = false)]
    enable_srv6: bool,

    /// Base address the in-memory default allocator hands out SIDs under.
    #[arg(long, env = "SRV6EM_DEFAULT_LOCATOR_BASE", default_value = "fd00:0:1::")]
    default_locator_base: Ipv6Addr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::tracing_init::init();
    let args = Args::parse();

    let wake = Arc::new(common::WakeSignal::new());
    let vrf_store = Arc::new(store::VrfStore::new(wake.clone()));
    let policy_store = Arc::new(store::PolicyStore::new(wake.clone()));
    let endpoints = Arc::new(endpoint::EndpointIndex::new(wake.clone()));

    let default_allocator = Arc::new(sidalloc::inmem::InMemoryDefaultAllocator::new(
        args.default_locator_base,
    ));
    let facade = Arc::new(sidalloc::SidAllocatorFacade::new(default_allocator));

    let sid_manager = Arc::new(sidmgr::inmem::InMemorySidManager::<
        sidalloc::inmem::InMemoryLocatorAllocator,
    >::new());
    let signaler = bgp::NotifySignaler::new();

    let cache_synced = Arc::new(common::Latch::new());
    let allocator_installed = Arc::new(common::Latch::new());

    let config = common::Config {
        enable_srv6: args.enable_srv6,
    };

    let reconciler = Arc::new(reconciler::Reconciler::new(
        vrf_store,
        policy_store,
        endpoints,
        facade,
        maps::InMemoryMap::new(),
        maps::InMemoryMap::new(),
        maps::InMemoryMap::new(),
        sid_manager,
        signaler,
        wake,
        cache_synced.clone(),
        allocator_installed.clone(),
        config,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let run_handle = {
        let reconciler = reconciler.clone();
        tokio::spawn(async move { reconciler.run(shutdown_rx).await })
    };

    // Nothing feeds the stores beyond this point in the example binary; a
    // real deployment's CRD watchers call into `vrf_store`/`policy_store`/
    // `endpoints` here, then fire `cache_synced` once their initial list
    // call completes.
    cache_synced.fire();
    allocator_installed.fire();

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    shutdown_tx.send(true).ok();
    run_handle.await?;

    Ok(())
}
