// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! A small tracing-subscriber init helper for the example `agent` binary.
//!
//! Logging *setup* (choosing sinks, formats, verbosity policy) is explicitly
//! the embedding binary's job, not the reconciliation core's — this just
//! saves `agent` from hand-rolling the same dozen lines every such binary
//! ends up with.

use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber that reads verbosity from `RUST_LOG`,
/// defaulting to `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
