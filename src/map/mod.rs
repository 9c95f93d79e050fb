//! StableMap Module
//!
//! Insertion-ordered hash map shared across threads.
//!
//! ## Responsibilities
//! - O(1) insert / lookup / delete through the key index
//! - Iteration in first-insertion order, skipping tombstones
//! - Amortized reclamation of tombstones (compaction)
//! - Single-writer/multi-reader access pattern
//!
//! ## Concurrency Model
//! One `RwLock` guards the entry store and key index together:
//! - **Read lock**: `get`, `contains_key`, snapshot construction for iteration
//! - **Write lock**: `insert`, `remove` (including compaction), `clear`, `compact`
//!
//! The live count is mirrored into an `AtomicUsize` while the write lock is
//! held, so `len` never takes the lock and never sees a half-applied mutation.

mod compaction;
mod entry;
mod index;
mod iter;
#[cfg(feature = "serde")]
mod serialize;

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::Result;

use compaction::CompactionPolicy;
use entry::EntryStore;
use index::KeyIndex;

pub use compaction::CompactionStats;
pub use iter::{materialize, Iter, Keys, Values};

/// State guarded by the map's lock
struct Inner<K, V, S> {
    /// Ordered entries, owner of every key/value
    store: EntryStore<K, V>,

    /// Key -> handle of the live entry
    index: KeyIndex<K, S>,
}

impl<K, V, S> Inner<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self
            .index
            .get(&key)
            .and_then(|id| self.store.value_mut(id))
        {
            return Some(mem::replace(slot, value));
        }

        let id = self.store.append(key.clone(), value);
        self.index.insert(key, id);
        None
    }
}

/// An insertion-ordered map with concurrent readers and writers
///
/// Updating an existing key keeps its position; deleting and re-inserting a
/// key moves it to the tail. All methods take `&self`, so the map can be
/// shared behind an `Arc`.
///
/// ```
/// use stablemap::StableMap;
///
/// let map = StableMap::new();
/// map.insert(1, "one");
/// map.insert(3, "three");
/// map.remove(&1);
/// map.insert(1, "ONE");
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.values().collect::<Vec<_>>(), vec!["three", "ONE"]);
/// ```
pub struct StableMap<K, V, S = RandomState> {
    /// Entry store + key index (many concurrent readers, exclusive writer)
    inner: RwLock<Inner<K, V, S>>,

    /// Live entry count (atomic, lock-free reads)
    len: AtomicUsize,

    /// When deletes trigger compaction
    policy: CompactionPolicy,

    /// Configuration the map was built with
    config: Config,
}

impl<K, V> StableMap<K, V, RandomState>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty map with the default configuration
    pub fn new() -> Self {
        Self::from_parts(Config::default(), RandomState::new())
    }

    /// Create an empty map with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        let config = Config::builder().initial_capacity(capacity).build();
        Self::from_parts(config, RandomState::new())
    }

    /// Create an empty map from a validated config
    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_config_and_hasher(config, RandomState::new())
    }
}

impl<K, V, S> StableMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// Create an empty map using `hasher` for the key index
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(Config::default(), hasher)
    }

    /// Create an empty map from a validated config and a custom hasher
    pub fn with_config_and_hasher(config: Config, hasher: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, hasher))
    }

    /// Build without validation (callers guarantee a valid config)
    pub(crate) fn from_parts(config: Config, hasher: S) -> Self {
        let capacity = config.initial_capacity;
        Self {
            inner: RwLock::new(Inner {
                store: EntryStore::with_capacity(capacity),
                index: KeyIndex::with_capacity_and_hasher(capacity, hasher),
            }),
            len: AtomicUsize::new(0),
            policy: CompactionPolicy::new(config.compaction_threshold),
            config,
        }
    }

    // =========================================================================
    // Mutations (write lock)
    // =========================================================================

    /// Insert or update a key
    ///
    /// A live key is updated in place and its previous value returned.
    /// Otherwise a new entry is appended at the tail and `None` is returned.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        let mut inner = self.inner.write();
        let previous = inner.insert(key, value);
        self.publish_len(&inner);
        previous
    }

    /// Delete a key, returning its value if it was live
    ///
    /// The entry becomes a tombstone and keeps its slot until the next
    /// compaction. Deleting an absent key does nothing.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut inner = self.inner.write();
        let id = inner.index.remove(key)?;
        let value = inner.store.tombstone(id);
        self.publish_len(&inner);

        if self.policy.should_compact(inner.store.tombstones()) {
            let stats = inner.store.compact();
            tracing::debug!(
                "Compaction reclaimed {} tombstones ({} scanned, {} survivors)",
                stats.reclaimed,
                stats.scanned,
                stats.survivors
            );
        }

        value
    }

    /// Remove every entry and reset all counters
    ///
    /// Snapshots taken before the call keep their (now stale) contents.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.store = EntryStore::with_capacity(self.config.initial_capacity);
        inner.index.reset(self.config.initial_capacity);
        self.publish_len(&inner);

        tracing::trace!("StableMap cleared");
    }

    /// Run a compaction pass now, regardless of the tombstone threshold
    pub fn compact(&self) -> CompactionStats {
        let stats = self.inner.write().store.compact();
        tracing::trace!(
            "Manual compaction reclaimed {} of {} slots",
            stats.reclaimed,
            stats.scanned
        );
        stats
    }

    // =========================================================================
    // Lookups (read lock)
    // =========================================================================

    /// Get a copy of the value for `key`
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.get_with(key, V::clone)
    }

    /// Get the value for `key`, or the default value, plus a found flag
    pub fn get_or_default<Q>(&self, key: &Q) -> (V, bool)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone + Default,
    {
        match self.get(key) {
            Some(value) => (value, true),
            None => (V::default(), false),
        }
    }

    /// Run `f` on the value for `key` without cloning it
    ///
    /// `f` runs under the read lock and must not call back into this map's
    /// mutating methods.
    pub fn get_with<Q, R, F>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> R,
    {
        let inner = self.inner.read();
        let id = inner.index.get(key)?;
        inner.store.value(id).map(f)
    }

    /// Check whether `key` has a live entry
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_with(key, |_| ()).is_some()
    }

    // =========================================================================
    // Iteration (snapshot under read lock)
    // =========================================================================

    /// Snapshot of `(key, value)` pairs in insertion order
    pub fn iter(&self) -> Iter<K, V>
    where
        V: Clone,
    {
        Iter::new(self.snapshot(|k, v| (k.clone(), v.clone())))
    }

    /// Snapshot of keys in insertion order
    pub fn keys(&self) -> Keys<K> {
        Keys::new(self.snapshot(|k, _| k.clone()))
    }

    /// Snapshot of values in insertion order
    pub fn values(&self) -> Values<V>
    where
        V: Clone,
    {
        Values::new(self.snapshot(|_, v| v.clone()))
    }

    fn snapshot<T, F>(&self, mut f: F) -> Vec<T>
    where
        F: FnMut(&K, &V) -> T,
    {
        let inner = self.inner.read();
        let mut items = Vec::with_capacity(inner.index.len());
        items.extend(inner.store.live().map(|(k, v)| f(k, v)));
        items
    }
}

impl<K, V, S> StableMap<K, V, S> {
    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Check if the map has no live entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of deleted entries not yet reclaimed by compaction
    pub fn tombstone_count(&self) -> usize {
        self.inner.read().store.tombstones()
    }

    /// Number of physical slots (live + tombstoned) in the entry sequence
    pub fn slot_count(&self) -> usize {
        self.inner.read().store.slot_count()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mirror the index size into the atomic counter (write lock held)
    fn publish_len(&self, inner: &Inner<K, V, S>) {
        self.len.store(inner.index.len(), Ordering::Release);
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<K, V, S> Default for StableMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::from_parts(Config::default(), S::default())
    }
}

impl<K, V, S> fmt::Debug for StableMap<K, V, S>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone + fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Clone for StableMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    /// Copy the live entries in order; tombstones are not carried over.
    fn clone(&self) -> Self {
        let inner = self.inner.read();
        let mut copy = Self::from_parts(self.config.clone(), inner.index.hasher().clone());
        copy.extend(inner.store.live().map(|(k, v)| (k.clone(), v.clone())));
        copy
    }
}

impl<K, V, S> PartialEq for StableMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
    S: BuildHasher,
{
    /// Equal when both hold the same live pairs in the same order
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V, S> Extend<(K, V)> for StableMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let inner = self.inner.get_mut();
        for (key, value) in iter {
            inner.insert(key, value);
        }
        self.len.store(inner.index.len(), Ordering::Release);
    }
}

impl<K, V, S> FromIterator<(K, V)> for StableMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a StableMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    type Item = (K, V);
    type IntoIter = Iter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
