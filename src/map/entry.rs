//! Entry Store
//!
//! Owns every entry ever appended to the map, in insertion order.
//!
//! Entries live in a generational arena (`SlotMap`) and the order sequence
//! only holds `EntryId` handles. Compaction rewrites the order sequence and
//! frees tombstoned slots, but a surviving entry keeps the same `EntryId`,
//! so handles held by the key index never dangle or alias a reused slot.
//!
//! ```text
//!   order:  [ id0 ][ id1 ][ id2 ][ id3 ]      (insertion order)
//!              │      │      │      │
//!   slots:  { id0: (k0, Some(v0)) ,
//!             id1: (k1, None)      ,   <- tombstone
//!             id2: (k2, Some(v2))  ,
//!             id3: (k1, Some(v3))  }   <- k1 re-inserted at the tail
//! ```

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable, generation-checked handle to an entry.
    pub(crate) struct EntryId;
}

/// A single key/value slot.
///
/// `value == None` marks the entry as a tombstone: the key is kept until
/// compaction, the value is dropped at delete time.
#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    key: K,
    value: Option<V>,
}

impl<K, V> Entry<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value: Some(value),
        }
    }

    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    pub(crate) fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub(crate) fn is_tombstone(&self) -> bool {
        self.value.is_none()
    }
}

/// Append-only ordered storage of entries
pub(crate) struct EntryStore<K, V> {
    /// Arena owning the entries, addressed by `EntryId`
    pub(super) slots: SlotMap<EntryId, Entry<K, V>>,

    /// Handles in insertion order, live and tombstoned alike
    pub(super) order: Vec<EntryId>,

    /// Tombstones still present in `order`
    pub(super) tombstones: usize,
}

impl<K, V> EntryStore<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
            order: Vec::with_capacity(capacity),
            tombstones: 0,
        }
    }

    /// Append a new live entry at the tail
    pub(crate) fn append(&mut self, key: K, value: V) -> EntryId {
        let id = self.slots.insert(Entry::new(key, value));
        self.order.push(id);
        id
    }

    /// Live value behind a handle
    pub(crate) fn value(&self, id: EntryId) -> Option<&V> {
        self.slots.get(id).and_then(Entry::value)
    }

    /// Mutable live value behind a handle (in-place update)
    pub(crate) fn value_mut(&mut self, id: EntryId) -> Option<&mut V> {
        self.slots.get_mut(id).and_then(|entry| entry.value.as_mut())
    }

    /// Flag an entry as deleted, moving its value out.
    ///
    /// Returns `None` if the handle is stale or already a tombstone.
    pub(crate) fn tombstone(&mut self, id: EntryId) -> Option<V> {
        let value = self.slots.get_mut(id)?.value.take()?;
        self.tombstones += 1;
        Some(value)
    }

    /// Number of deleted entries awaiting compaction
    pub(crate) fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Number of slots in the order sequence (live + tombstoned)
    pub(crate) fn slot_count(&self) -> usize {
        self.order.len()
    }

    /// Walk live entries in insertion order
    pub(crate) fn live(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.order.iter().filter_map(move |&id| {
            let entry = self.slots.get(id)?;
            Some((entry.key(), entry.value()?))
        })
    }
}
