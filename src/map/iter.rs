//! Snapshot iterators
//!
//! `iter`, `keys` and `values` copy the live entries out under the read lock
//! and hand back an owned iterator. Consuming it takes no lock, so a slow
//! consumer never blocks writers or compaction, and nothing it yields can be
//! freed underneath it. The price is a point-in-time view: mutations made
//! after the snapshot (including `clear`) are not reflected.

use std::iter::FusedIterator;
use std::vec;

/// Ordered `(key, value)` snapshot of a `StableMap`
#[derive(Debug, Clone)]
pub struct Iter<K, V> {
    inner: vec::IntoIter<(K, V)>,
}

/// Ordered key snapshot of a `StableMap`
#[derive(Debug, Clone)]
pub struct Keys<K> {
    inner: vec::IntoIter<K>,
}

/// Ordered value snapshot of a `StableMap`
#[derive(Debug, Clone)]
pub struct Values<V> {
    inner: vec::IntoIter<V>,
}

impl<K, V> Iter<K, V> {
    pub(crate) fn new(items: Vec<(K, V)>) -> Self {
        Self {
            inner: items.into_iter(),
        }
    }
}

impl<K> Keys<K> {
    pub(crate) fn new(items: Vec<K>) -> Self {
        Self {
            inner: items.into_iter(),
        }
    }
}

impl<V> Values<V> {
    pub(crate) fn new(items: Vec<V>) -> Self {
        Self {
            inner: items.into_iter(),
        }
    }
}

impl<K, V> Iterator for Iter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> Iterator for Keys<K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> Iterator for Values<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<K, V> {}
impl<K> ExactSizeIterator for Keys<K> {}
impl<V> ExactSizeIterator for Values<V> {}

impl<K, V> FusedIterator for Iter<K, V> {}
impl<K> FusedIterator for Keys<K> {}
impl<V> FusedIterator for Values<V> {}

/// Collect any sequence (typically `iter`, `keys` or `values`) into an
/// ordered `Vec`.
///
/// ```
/// use stablemap::{materialize, StableMap};
///
/// let map = StableMap::new();
/// map.insert(1, "one");
/// map.insert(3, "three");
/// assert_eq!(materialize(map.values()), vec!["one", "three"]);
/// ```
pub fn materialize<I: IntoIterator>(sequence: I) -> Vec<I::Item> {
    sequence.into_iter().collect()
}
