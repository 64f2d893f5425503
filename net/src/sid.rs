// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Segment identifiers and the behaviors they encode.

use std::fmt::{Debug, Display, Formatter};
use std::net::Ipv6Addr;

/// A canonicalized SRv6 segment identifier: a 16-byte IPv6 address plus
/// the locator/function split within it.
///
/// Only the locator length is tracked; the function bits carry no meaning
/// this crate interprets — SID format policy beyond what the locator pool
/// exposes is out of scope.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sid {
    addr: Ipv6Addr,
    locator_len: u8,
}

/// Default locator length used when a SID is constructed without explicit
/// locator/function framing (e.g. from the default, non-pool allocator).
pub const DEFAULT_LOCATOR_LEN: u8 = 64;

/// Error canonicalizing a SID from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SidCanonicalizeError {
    /// The address text could not be parsed as an IPv6 address.
    #[error("invalid SID: {0}")]
    Malformed(String),
    /// `locator_len` was greater than 128.
    #[error("invalid SID locator length: {0}")]
    LocatorTooLong(u8),
}

impl Sid {
    /// Build a SID from an address and an explicit locator length.
    ///
    /// # Errors
    ///
    /// Returns [`SidCanonicalizeError::LocatorTooLong`] if `locator_len > 128`.
    pub fn new(addr: Ipv6Addr, locator_len: u8) -> Result<Self, SidCanonicalizeError> {
        if locator_len > 128 {
            return Err(SidCanonicalizeError::LocatorTooLong(locator_len));
        }
        Ok(Sid { addr, locator_len })
    }

    /// Canonicalize a textual IPv6 SID using the default locator length.
    ///
    /// # Errors
    ///
    /// Returns [`SidCanonicalizeError::Malformed`] if `s` is not a valid IPv6 address.
    pub fn canonicalize(s: &str) -> Result<Self, SidCanonicalizeError> {
        let addr: Ipv6Addr = s
            .parse()
            .map_err(|_| SidCanonicalizeError::Malformed(s.to_string()))?;
        Ok(Sid {
            addr,
            locator_len: DEFAULT_LOCATOR_LEN,
        })
    }

    /// The full 16-byte address.
    #[must_use]
    pub const fn address(&self) -> Ipv6Addr {
        self.addr
    }

    /// Bit-length of the locator portion of [`Self::address`].
    #[must_use]
    pub const fn locator_len(&self) -> u8 {
        self.locator_len
    }
}

impl Debug for Sid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.addr)
    }
}

impl Display for Sid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.addr)
    }
}

/// The behavior family a SID's owning locator pool advertises.
///
/// `Base` binds the SID to a single forwarding function; `uSID` packs
/// multiple segment functions into one address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorType {
    /// A single-function SID.
    Base,
    /// A micro-segment SID.
    #[allow(non_camel_case_types)]
    uSID,
}

/// The concrete datapath forwarding function a SID performs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorAction {
    /// End.DT4: decapsulate and perform IPv4 table lookup.
    EndDT4,
    /// uDT4: micro-segment IPv4 decapsulation and table lookup.
    #[allow(non_camel_case_types)]
    uDT4,
}

/// The address family a VRF operates over. Only IPv4 is modeled here, per
/// the spec's scope ("behavior action is derived ... for the VRF's IP
/// family (v4 here)").
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// IPv4.
    V4,
}

impl BehaviorType {
    /// Derive the concrete behavior action for `self` over `family`.
    ///
    /// `Base → EndDT4`, `uSID → uDT4`, deterministically, per the spec.
    #[must_use]
    pub const fn derive_action(self, family: AddressFamily) -> BehaviorAction {
        match (self, family) {
            (BehaviorType::Base, AddressFamily::V4) => BehaviorAction::EndDT4,
            (BehaviorType::uSID, AddressFamily::V4) => BehaviorAction::uDT4,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_parses_and_defaults_locator() {
        let sid = Sid::canonicalize("fd00:0:1:1::").unwrap();
        assert_eq!(sid.locator_len(), DEFAULT_LOCATOR_LEN);
    }

    #[test]
    fn canonicalize_rejects_garbage() {
        assert!(Sid::canonicalize("not-an-address").is_err());
    }

    #[test]
    fn behavior_derivation_is_deterministic() {
        assert_eq!(
            BehaviorType::Base.derive_action(AddressFamily::V4),
            BehaviorAction::EndDT4
        );
        assert_eq!(
            BehaviorType::uSID.derive_action(AddressFamily::V4),
            BehaviorAction::uDT4
        );
    }
}
