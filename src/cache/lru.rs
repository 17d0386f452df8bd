//! LRU cache built from a recency [`Deque`] and an `FxHashMap` key index.
//!
//! ## Architecture
//!
//! ```text
//!   map:   key ─► Entry { node: NodeId, value }
//!   queue: head (LRU) ─► k3 ◄──► k1 ◄──► k2 ◄── tail (MRU)
//! ```
//!
//! The deque holds keys in recency order, head = least recently used.
//! Every hit ([`get`](LruCache::get), [`insert`](LruCache::insert) over an
//! existing key, [`touch`](LruCache::touch)) moves the key's node to the
//! tail in O(1); eviction pops the head. [`peek`](LruCache::peek) reads
//! without refreshing.
//!
//! ## Operations
//!
//! | Operation                   | Complexity | Recency effect  |
//! |-----------------------------|------------|-----------------|
//! | `get` / `touch`             | O(1)       | refresh to MRU  |
//! | `insert` (new, at capacity) | O(1)       | evicts LRU head |
//! | `insert` (existing)         | O(1)       | refresh to MRU  |
//! | `peek` / `peek_lru`         | O(1)       | none            |
//! | `remove` / `pop_lru`        | O(1)       | —               |
//!
//! A capacity of zero is honored literally: such a cache stores nothing
//! and every insert is a no-op.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::deque::{Deque, NodeId};

#[derive(Debug)]
struct Entry<V> {
    node: NodeId,
    value: V,
}

/// Fixed-capacity map with least-recently-used eviction.
///
/// # Example
///
/// ```
/// use datakit::cache::LruCache;
///
/// let mut cache = LruCache::new(2);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.get(&"a");          // refresh "a"
/// cache.insert("c", 3);     // evicts "b", the LRU key
///
/// assert_eq!(cache.get(&"b"), None);
/// assert_eq!(cache.get(&"a"), Some(&1));
/// assert_eq!(cache.get(&"c"), Some(&3));
/// ```
#[derive(Debug)]
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    map: FxHashMap<K, Entry<V>>,
    queue: Deque<K>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            queue: Deque::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns the configured maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` if the next insert of a new key will evict.
    pub fn is_full(&self) -> bool {
        self.map.len() >= self.capacity
    }

    /// Returns `true` without refreshing recency.
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let node = self.map.get(key)?.node;
        let moved = self.queue.move_to_back(node);
        debug_assert!(moved.is_ok());
        self.map.get(key).map(|entry| &entry.value)
    }

    /// Returns the value for `key` without touching recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|entry| &entry.value)
    }

    /// Marks `key` most recently used without reading its value.
    /// Returns `false` if the key is absent.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.map.get(key) {
            Some(entry) => {
                let moved = self.queue.move_to_back(entry.node);
                debug_assert!(moved.is_ok());
                true
            },
            None => false,
        }
    }

    /// Inserts or updates `key`, marking it most recently used.
    ///
    /// Returns the previous value when the key already existed. Inserting
    /// a new key into a full cache evicts the least recently used entry
    /// first; at capacity zero the insert stores nothing.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }
        if let Some(entry) = self.map.get_mut(&key) {
            let old = std::mem::replace(&mut entry.value, value);
            let node = entry.node;
            let moved = self.queue.move_to_back(node);
            debug_assert!(moved.is_ok());
            return Some(old);
        }
        if self.map.len() >= self.capacity {
            self.pop_lru();
        }
        let node = self.queue.push_back(key.clone());
        self.map.insert(key, Entry { node, value });
        None
    }

    /// Removes `key` and returns its value, if present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.map.remove(key)?;
        let removed = self.queue.remove(entry.node);
        debug_assert!(removed.is_ok());
        Some(entry.value)
    }

    /// Evicts and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let key = self.queue.pop_front().ok()?;
        let entry = self.map.remove(&key)?;
        Some((key, entry.value))
    }

    /// Returns the least recently used entry without removing it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        let key = self.queue.front().ok()?;
        let entry = self.map.get(key)?;
        Some((key, &entry.value))
    }

    /// Drops all entries; capacity is unchanged.
    pub fn clear(&mut self) {
        self.map.clear();
        self.queue.clear();
    }

    /// Iterates keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.queue.iter()
    }

    #[cfg(any(test, debug_assertions))]
    /// Validates map/queue agreement (debug/test builds only).
    pub fn debug_validate_invariants(&self) {
        self.queue.debug_validate_invariants();
        assert!(self.map.len() <= self.capacity);
        assert_eq!(self.map.len(), self.queue.len());
        for (key, entry) in &self.map {
            assert!(self.queue.get(entry.node) == Some(key));
        }
    }
}

#[cfg(feature = "concurrency")]
pub use concurrent::ConcurrentLruCache;

#[cfg(feature = "concurrency")]
mod concurrent {
    use std::hash::Hash;

    use parking_lot::RwLock;

    use super::LruCache;

    /// Thread-safe wrapper around `LruCache` using a `parking_lot::RwLock`.
    ///
    /// Values are reached through closure accessors so no lock guard ever
    /// escapes. `get_with` takes the write lock because a hit reorders the
    /// recency queue; `peek_with` is the read-locked alternative.
    #[derive(Debug)]
    pub struct ConcurrentLruCache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        inner: RwLock<LruCache<K, V>>,
    }

    impl<K, V> ConcurrentLruCache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        /// Creates a cache holding at most `capacity` entries.
        pub fn new(capacity: usize) -> Self {
            Self {
                inner: RwLock::new(LruCache::new(capacity)),
            }
        }

        /// Returns the number of stored entries.
        pub fn len(&self) -> usize {
            let cache = self.inner.read();
            cache.len()
        }

        /// Returns `true` if the cache holds no entries.
        pub fn is_empty(&self) -> bool {
            let cache = self.inner.read();
            cache.is_empty()
        }

        /// Returns the configured maximum number of entries.
        pub fn capacity(&self) -> usize {
            let cache = self.inner.read();
            cache.capacity()
        }

        /// Returns `true` without refreshing recency.
        pub fn contains_key(&self, key: &K) -> bool {
            let cache = self.inner.read();
            cache.contains_key(key)
        }

        /// Runs `f` on the value for `key`, marking it most recently used.
        pub fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
            let mut cache = self.inner.write();
            cache.get(key).map(f)
        }

        /// Tries to run `f` on the value for `key` without blocking.
        pub fn try_get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
            let mut cache = self.inner.try_write()?;
            cache.get(key).map(f)
        }

        /// Runs `f` on the value for `key` without touching recency.
        pub fn peek_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
            let cache = self.inner.read();
            cache.peek(key).map(f)
        }

        /// Inserts or updates `key`; returns the previous value.
        pub fn insert(&self, key: K, value: V) -> Option<V> {
            let mut cache = self.inner.write();
            cache.insert(key, value)
        }

        /// Tries to insert without blocking; `None` means the lock was held.
        pub fn try_insert(&self, key: K, value: V) -> Option<Option<V>> {
            let mut cache = self.inner.try_write()?;
            Some(cache.insert(key, value))
        }

        /// Removes `key` and returns its value, if present.
        pub fn remove(&self, key: &K) -> Option<V> {
            let mut cache = self.inner.write();
            cache.remove(key)
        }

        /// Marks `key` most recently used; returns `false` if absent.
        pub fn touch(&self, key: &K) -> bool {
            let mut cache = self.inner.write();
            cache.touch(key)
        }

        /// Evicts and returns the least recently used entry.
        pub fn pop_lru(&self) -> Option<(K, V)> {
            let mut cache = self.inner.write();
            cache.pop_lru()
        }

        /// Drops all entries.
        pub fn clear(&self) {
            let mut cache = self.inner.write();
            cache.clear();
        }
    }
}
