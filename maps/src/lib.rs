// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! The datapath map trait (§6) and an in-memory reference implementation.
//!
//! The real maps are kernel-resident hash tables owned by the in-kernel
//! forwarding program; this crate only defines the seam the reconciler
//! writes through (`upsert`/`delete`/`iterate`/`lookup`), plus
//! [`InMemoryMap`], a reference implementation good enough to stand in for
//! "kernel-resident hash table" in tests and the example `agent` binary.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;

/// Errors a datapath map operation can return (§6, §7 `ErrMapIO`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// [`DatapathMap::lookup`] found no entry for the given key.
    #[error("key does not exist")]
    KeyNotExist,
    /// The underlying map write failed transiently. The caller (the
    /// reconciler) logs and skips the offending entry; other entries in the
    /// same pass still reconcile, and this one retries next pass.
    #[error("map I/O error: {0}")]
    Io(String),
}

/// Writes are non-blocking syscalls in the real implementation (§5); this
/// trait has no `async` methods.
pub trait DatapathMap<K, V>: Send + Sync {
    /// Insert or overwrite the value at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Io`] on a transient write failure.
    fn upsert(&self, key: K, value: V) -> Result<(), MapError>;

    /// Remove `key`, if present. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Io`] on a transient write failure.
    fn delete(&self, key: &K) -> Result<(), MapError>;

    /// Look up the current value at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotExist`] if `key` is absent.
    fn lookup(&self, key: &K) -> Result<V, MapError>;

    /// Call `f` once per current `(key, value)` pair. Order is unspecified.
    fn iterate(&self, f: &mut dyn FnMut(&K, &V));
}

/// An in-memory reference datapath map, behind a single `RwLock` — there is
/// no datapath-thread-vs-control-thread split to serve here, unlike the
/// kernel implementation this stands in for.
#[derive(Debug, Default)]
pub struct InMemoryMap<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryMap<K, V> {
    #[must_use]
    pub fn new() -> Self {
        InMemoryMap {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone + Send + Sync, V: Clone + Send + Sync> DatapathMap<K, V>
    for InMemoryMap<K, V>
{
    fn upsert(&self, key: K, value: V) -> Result<(), MapError> {
        self.inner.write().insert(key, value);
        Ok(())
    }

    fn delete(&self, key: &K) -> Result<(), MapError> {
        self.inner.write().remove(key);
        Ok(())
    }

    fn lookup(&self, key: &K) -> Result<V, MapError> {
        self.inner
            .read()
            .get(key)
            .cloned()
            .ok_or(MapError::KeyNotExist)
    }

    fn iterate(&self, f: &mut dyn FnMut(&K, &V)) {
        for (k, v) in self.inner.read().iter() {
            f(k, v);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn lookup_missing_key_errors() {
        let map: InMemoryMap<u32, u32> = InMemoryMap::new();
        assert_eq!(map.lookup(&1), Err(MapError::KeyNotExist));
    }

    #[test]
    fn upsert_then_lookup_round_trips() {
        let map: InMemoryMap<u32, u32> = InMemoryMap::new();
        map.upsert(1, 100).unwrap();
        assert_eq!(map.lookup(&1), Ok(100));
    }

    #[test]
    fn delete_removes_entry() {
        let map: InMemoryMap<u32, u32> = InMemoryMap::new();
        map.upsert(1, 100).unwrap();
        map.delete(&1).unwrap();
        assert_eq!(map.lookup(&1), Err(MapError::KeyNotExist));
    }

    #[test]
    fn iterate_visits_every_entry() {
        let map: InMemoryMap<u32, u32> = InMemoryMap::new();
        map.upsert(1, 10).unwrap();
        map.upsert(2, 20).unwrap();
        let mut seen = Vec::new();
        map.iterate(&mut |k, v| seen.push((*k, *v)));
        seen.sort_unstable();
        assert_eq!(seen, vec![(1, 10), (2, 20)]);
    }
}
