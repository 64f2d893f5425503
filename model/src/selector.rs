// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use id::LabelSet;

/// An exact-match label selector over endpoint labels.
///
/// An endpoint matches a selector when every `key=value` pair in the
/// selector is present (with equal value) in the endpoint's label set; the
/// endpoint may carry additional labels the selector doesn't mention.
///
/// A selector with no requirements matches nothing — the spec calls this out
/// explicitly ("empty selector matches none") precisely to avoid the common
/// footgun where an empty selector is read as "match everything".
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelSelector {
    requirements: LabelSet,
}

impl LabelSelector {
    /// Build a selector from a set of required `key=value` labels.
    #[must_use]
    pub fn new(requirements: LabelSet) -> Self {
        LabelSelector { requirements }
    }

    /// Whether `labels` satisfies this selector.
    #[must_use]
    pub fn matches(&self, labels: &LabelSet) -> bool {
        if self.requirements.is_empty() {
            return false;
        }
        self.requirements
            .iter()
            .all(|(k, v)| labels.get(k).is_some_and(|actual| actual == v))
    }
}
