//! # Generic concurrency-safe map.
//!
//! [`SyncMap`] is a thread-safe associative container usable from arbitrary
//! concurrent call sites without external locking. It is generic over one
//! `(K, V)` pair for its lifetime, so type confusion is impossible by
//! construction and no operation can fail.
//!
//! ## Rules
//! - Every operation is atomic per key; [`SyncMap::load_or_store`] is an
//!   indivisible check-then-act.
//! - No operation suspends or holds a lock across caller code:
//!   [`SyncMap::range`] clones a snapshot under the read lock and runs the
//!   visitor off-lock, so iteration never blocks unrelated operations.
//! - Lock poisoning is ignored: none of the operations leave the underlying
//!   `HashMap` in a torn state, so a poisoned lock carries no information.
//!
//! # Example
//! ```rust
//! use retrykit::SyncMap;
//!
//! let m: SyncMap<&str, u32> = SyncMap::new();
//! m.store("a", 1);
//!
//! assert_eq!(m.load(&"a"), Some(1));
//! assert_eq!(m.load_or_store("a", 99), (1, true));
//! assert_eq!(m.load_and_delete(&"a"), Some(1));
//! assert_eq!(m.load(&"a"), None);
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe map from `K` to `V`.
///
/// Created empty; mutated by any number of concurrent callers; dropped with
/// its owner. There is no explicit teardown.
#[derive(Debug)]
pub struct SyncMap<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for SyncMap<K, V> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> SyncMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<K, V>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, V>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the stored value, or `V::default()` if the key is absent.
    pub fn get(&self, key: &K) -> V
    where
        V: Clone + Default,
    {
        self.read().get(key).cloned().unwrap_or_default()
    }

    /// Returns the stored value, or `None` if the key is absent.
    pub fn load(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.read().get(key).cloned()
    }

    /// Inserts or overwrites the mapping for `key`.
    pub fn store(&self, key: K, value: V) {
        self.write().insert(key, value);
    }

    /// Removes the mapping for `key` if present; no-op otherwise.
    pub fn delete(&self, key: &K) {
        self.write().remove(key);
    }

    /// Atomically removes and returns the prior value, or `None` if the key
    /// was absent.
    pub fn load_and_delete(&self, key: &K) -> Option<V> {
        self.write().remove(key)
    }

    /// Returns the current value and `true` if `key` is present; otherwise
    /// stores `value` and returns it with `false`.
    ///
    /// The check and the insert happen under one write lock: of N concurrent
    /// calls for the same absent key, exactly one observes `false`.
    pub fn load_or_store(&self, key: K, value: V) -> (V, bool)
    where
        V: Clone,
    {
        match self.write().entry(key) {
            Entry::Occupied(entry) => (entry.get().clone(), true),
            Entry::Vacant(entry) => {
                entry.insert(value.clone());
                (value, false)
            }
        }
    }

    /// Visits a best-effort snapshot of all entries in unspecified order,
    /// stopping early if `visit` returns `false`.
    ///
    /// The snapshot is taken atomically, then iterated without the lock:
    /// concurrent mutations may or may not be reflected, but each visited
    /// entry was present at the snapshot instant.
    pub fn range<F>(&self, mut visit: F)
    where
        K: Clone,
        V: Clone,
        F: FnMut(&K, &V) -> bool,
    {
        let snapshot: Vec<(K, V)> = self
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for (key, value) in &snapshot {
            if !visit(key, value) {
                break;
            }
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.write().clear();
    }
}
