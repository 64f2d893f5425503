// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Cross-cutting concerns shared by every crate in the workspace: the
//! reconciler-wide error kinds (§7 of the spec), the runtime configuration
//! struct (§6), and a tracing init helper for the example `agent` binary.

mod config;
mod error;
mod latch;
pub mod tracing_init;
mod wake;

pub use config::Config;
pub use error::ReconcileError;
pub use latch::Latch;
pub use wake::WakeSignal;

/// The constant owner name this manager uses when talking to allocators and
/// the SID manager (§6).
pub const OWNER: &str = "srv6-manager";
