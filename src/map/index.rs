//! Key Index
//!
//! Hash index from key to the `EntryId` of its single live entry.
//! Holds handles only; the entry itself is owned by the entry store.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use super::entry::EntryId;

pub(crate) struct KeyIndex<K, S> {
    handles: HashMap<K, EntryId, S>,
}

impl<K, S> KeyIndex<K, S> {
    pub(crate) fn len(&self) -> usize {
        self.handles.len()
    }

    pub(crate) fn hasher(&self) -> &S {
        self.handles.hasher()
    }
}

impl<K, S> KeyIndex<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            handles: HashMap::with_capacity_and_hasher(capacity, hasher),
        }
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<EntryId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handles.get(key).copied()
    }

    pub(crate) fn insert(&mut self, key: K, id: EntryId) {
        self.handles.insert(key, id);
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<EntryId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handles.remove(key)
    }

    /// Drop every handle, shrinking back to `capacity`
    pub(crate) fn reset(&mut self, capacity: usize) {
        self.handles.clear();
        self.handles.shrink_to(capacity);
    }
}
