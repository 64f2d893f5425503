// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A BGP VPN route target, e.g. `65000:1`.
///
/// Presence of a route target on a VRF gates SID allocation (§3): a VRF
/// with no route target must never carry a `SidInfo`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct RouteTarget(String);

/// Error validating a route target string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteTargetError {
    /// The string wasn't of the form `ASN:value`.
    #[error("invalid route target: {0}")]
    Malformed(String),
}

impl RouteTarget {
    /// The raw `ASN:value` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RouteTarget {
    type Err = RouteTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((asn, value)) = s.split_once(':') else {
            return Err(RouteTargetError::Malformed(s.to_string()));
        };
        if asn.is_empty()
            || value.is_empty()
            || !asn.chars().all(|c| c.is_ascii_digit())
            || !value.chars().all(|c| c.is_ascii_digit())
        {
            return Err(RouteTargetError::Malformed(s.to_string()));
        }
        Ok(RouteTarget(s.to_string()))
    }
}

impl TryFrom<String> for RouteTarget {
    type Error = RouteTargetError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RouteTarget> for String {
    fn from(value: RouteTarget) -> Self {
        value.0
    }
}

impl Display for RouteTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_asn_colon_value() {
        assert!("65000:1".parse::<RouteTarget>().is_ok());
    }

    #[test]
    fn rejects_non_numeric_or_missing_colon() {
        assert!("65000".parse::<RouteTarget>().is_err());
        assert!("asn:1".parse::<RouteTarget>().is_err());
        assert!(":1".parse::<RouteTarget>().is_err());
    }
}
