//! Atomically swapped snapshots.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

struct Generation<T> {
    number: u64,
    value: Arc<T>,
}

/// A value replaced wholesale and read as an immutable snapshot.
///
/// The lock is held only to clone or swap the `Arc`, never while building a
/// new value.
pub struct SnapshotCache<T> {
    current: RwLock<Generation<T>>,
}

impl<T> SnapshotCache<T> {
    /// Create a cache holding `initial` as generation 0.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            current: RwLock::new(Generation {
                number: 0,
                value: Arc::new(initial),
            }),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn load(&self) -> Arc<T> {
        Arc::clone(&self.current.read().value)
    }

    /// Current snapshot together with its generation number.
    #[must_use]
    pub fn load_with_generation(&self) -> (u64, Arc<T>) {
        let current = self.current.read();
        (current.number, Arc::clone(&current.value))
    }

    /// Generation number of the current snapshot.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.current.read().number
    }

    /// Publish a new snapshot and return its generation number.
    pub fn replace(&self, value: T) -> u64 {
        let value = Arc::new(value);
        let mut current = self.current.write();
        current.number += 1;
        current.value = value;
        current.number
    }
}

impl<T: Default> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> std::fmt::Debug for SnapshotCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotCache")
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

/// A keyed snapshot cache.
pub struct KeyedCache<K, V> {
    inner: SnapshotCache<HashMap<K, V>>,
}

impl<K, V> Default for KeyedCache<K, V> {
    fn default() -> Self {
        Self {
            inner: SnapshotCache::new(HashMap::new()),
        }
    }
}

impl<K, V> std::fmt::Debug for KeyedCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedCache")
            .field("generation", &self.inner.generation())
            .finish_non_exhaustive()
    }
}

impl<K: Eq + Hash, V: Clone> KeyedCache<K, V> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key` in the current snapshot.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.load().get(key).cloned()
    }

    /// The whole current snapshot.
    #[must_use]
    pub fn get_all(&self) -> Arc<HashMap<K, V>> {
        self.inner.load()
    }

    /// Replace every entry at once.
    pub fn replace(&self, entries: impl IntoIterator<Item = (K, V)>) -> u64 {
        self.inner.replace(entries.into_iter().collect())
    }

    /// Generation number of the current snapshot.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.generation()
    }

    /// Number of entries in the current snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.load().len()
    }

    /// True when the current snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.load().is_empty()
    }
}
