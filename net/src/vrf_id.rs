// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use std::fmt::{Debug, Display, Formatter};

/// A numeric id for a VRF.
///
/// Any `u32` is valid. This type exists only to provide "units" — a `VrfId`
/// can't be accidentally compared against a raw port number or prefix length.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "u32", into = "u32"))]
#[repr(transparent)]
pub struct VrfId(u32);

impl VrfId {
    /// Wrap a raw VRF id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        VrfId(raw)
    }

    /// The wrapped numeric value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Debug for VrfId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "VrfId({})", self.0)
    }
}

impl Display for VrfId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for VrfId {
    fn from(value: u32) -> Self {
        VrfId(value)
    }
}

impl From<VrfId> for u32 {
    fn from(value: VrfId) -> Self {
        value.0
    }
}
