// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! The numeric identity an endpoint resolves to.
//!
//! The identity allocator itself (the component that maps label sets to
//! identity ids) lives outside this crate and outside this workspace: it is
//! an external collaborator this code only ever reads from, and it delivers
//! already-resolved identities on endpoint input (`parser::raw::RawEndpoint`)
//! rather than calling back into this crate to resolve them. What lives here
//! is just the opaque id type that resolution seam is expressed in terms of.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A resolved, opaque numeric identity.
///
/// `Identity` carries no semantics of its own; it exists purely so that
/// `Option<Identity>` can express "resolution pending" without conflating it
/// with identity `0`.
#[must_use]
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identity(u32);

impl Identity {
    /// Wrap a raw numeric identity.
    pub const fn new(raw: u32) -> Self {
        Identity(raw)
    }

    /// The wrapped numeric value.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Identity {
    fn from(value: u32) -> Self {
        Identity(value)
    }
}

/// A set of labels (`key=value` pairs), the unit that identity resolution
/// operates over.
pub type LabelSet = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_display_and_raw_round_trip() {
        let id = Identity::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn identity_from_u32() {
        assert_eq!(Identity::from(7), Identity::new(7));
    }
}
