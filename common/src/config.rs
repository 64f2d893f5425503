// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

/// Runtime configuration for the reconciliation core (§6).
///
/// This is a plain struct, not a CLI parser — argv parsing, env loading and
/// process lifecycle belong to whatever binary embeds this crate (the
/// `agent` crate shows one way, via `clap`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// When `false`, every inbound callback is still accepted (and, where
    /// applicable, still validated) but no map writes ever occur.
    pub enable_srv6: bool,
}

impl Default for Config {
    /// Safe default: `enable_srv6 = false`, so embedding this crate never
    /// starts writing to shared datapath maps without an explicit opt-in.
    fn default() -> Self {
        Config { enable_srv6: false }
    }
}
