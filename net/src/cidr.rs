// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Normalized IPv4 destination prefixes.

use ipnet::Ipv4Net;
use std::fmt::{Debug, Display, Formatter};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// A destination CIDR, always held in its normalized (network-address-only)
/// form: `10.0.1.5/24` and `10.0.1.0/24` both normalize to the latter.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Ipv4Cidr(Ipv4Net);

/// Error constructing an [`Ipv4Cidr`] from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CidrError {
    /// The input could not be parsed as an IPv4 network at all.
    #[error("invalid CIDR: {0}")]
    Malformed(String),
}

impl Ipv4Cidr {
    /// Parse and normalize `s` to its network address.
    ///
    /// # Errors
    ///
    /// Returns [`CidrError::Malformed`] if `s` is not a valid IPv4 CIDR.
    pub fn parse_normalized(s: &str) -> Result<Self, CidrError> {
        let net = Ipv4Net::from_str(s).map_err(|_| CidrError::Malformed(s.to_string()))?;
        Ok(Ipv4Cidr(net.trunc()))
    }

    /// Build a normalized CIDR from an address and prefix length, truncating
    /// any host bits.
    ///
    /// # Errors
    ///
    /// Returns [`CidrError::Malformed`] if `prefix_len` exceeds 32.
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> Result<Self, CidrError> {
        let net = Ipv4Net::new(addr, prefix_len)
            .map_err(|_| CidrError::Malformed(format!("{addr}/{prefix_len}")))?;
        Ok(Ipv4Cidr(net.trunc()))
    }

    /// The network address (already truncated).
    #[must_use]
    pub fn network(&self) -> Ipv4Addr {
        self.0.network()
    }

    /// The prefix length, in `0..=32`.
    #[must_use]
    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// Whether `addr` falls within this CIDR.
    #[must_use]
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.0.contains(&addr)
    }
}

impl Debug for Ipv4Cidr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Ipv4Cidr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = CidrError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_normalized(s)
    }
}

impl TryFrom<String> for Ipv4Cidr {
    type Error = CidrError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_normalized(&value)
    }
}

impl From<Ipv4Cidr> for String {
    fn from(value: Ipv4Cidr) -> Self {
        value.to_string()
    }
}
