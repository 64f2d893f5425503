// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The diff-and-apply step (§4.5 step 5): the only place that writes to
//! [`maps::DatapathMap`]s. Never clears a map wholesale — only the keys
//! that actually need to change are touched.

use maps::DatapathMap;
use std::collections::BTreeMap;

/// Diff `desired` against `map`'s current contents and write only the
/// deltas: delete keys present in `map` but absent from `desired`, upsert
/// keys whose desired value differs from (or is absent in) the current
/// one. Returns the number of writes performed — used by tests to assert
/// idempotence (zero writes on a second pass with no input change).
pub(crate) fn diff_apply<K, V, M>(map: &M, desired: &BTreeMap<K, V>) -> usize
where
    K: Clone + Eq + Ord,
    V: Clone + PartialEq,
    M: DatapathMap<K, V>,
{
    let mut current: BTreeMap<K, V> = BTreeMap::new();
    map.iterate(&mut |k, v| {
        current.insert(k.clone(), v.clone());
    });

    let mut writes = 0;

    let stale: Vec<K> = current
        .keys()
        .filter(|k| !desired.contains_key(*k))
        .cloned()
        .collect();
    for key in stale {
        match map.delete(&key) {
            Ok(()) => writes += 1,
            Err(err) => tracing::warn!(%err, "datapath map delete failed; will retry next pass"),
        }
    }

    for (key, value) in desired {
        if current.get(key) != Some(value) {
            match map.upsert(key.clone(), value.clone()) {
                Ok(()) => writes += 1,
                Err(err) => tracing::warn!(%err, "datapath map upsert failed; will retry next pass"),
            }
        }
    }

    writes
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maps::InMemoryMap;

    #[test]
    fn first_apply_writes_every_desired_entry() {
        let map: InMemoryMap<u32, u32> = InMemoryMap::new();
        let desired = BTreeMap::from([(1, 10), (2, 20)]);
        assert_eq!(diff_apply(&map, &desired), 2);
        assert_eq!(diff_apply(&map, &desired), 0, "second apply must be a no-op");
    }

    #[test]
    fn stale_keys_are_deleted_and_changed_values_upserted() {
        let map: InMemoryMap<u32, u32> = InMemoryMap::new();
        let first = BTreeMap::from([(1, 10), (2, 20)]);
        diff_apply(&map, &first);

        let second = BTreeMap::from([(1, 11)]); // 2 dropped, 1 changed
        let writes = diff_apply(&map, &second);
        assert_eq!(writes, 2);
        assert_eq!(map.lookup(&1), Ok(11));
        assert_eq!(map.lookup(&2), Err(maps::MapError::KeyNotExist));
    }
}
