//! Compaction Policy
//!
//! Deletes only flag entries, so a churn-heavy map keeps growing its order
//! sequence. Once the tombstone count reaches the configured threshold the
//! deleting call rewrites the sequence, keeping survivors in their relative
//! order and freeing the tombstoned arena slots.
//!
//! The pass is O(n) and runs under the write lock, but only once per
//! `threshold` deletes.

use std::mem;

use super::entry::EntryStore;

/// Decides when a compaction pass is due
#[derive(Debug, Clone, Copy)]
pub(crate) struct CompactionPolicy {
    threshold: usize,
}

impl CompactionPolicy {
    pub(crate) fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub(crate) fn should_compact(&self, tombstones: usize) -> bool {
        tombstones >= self.threshold
    }
}

/// Outcome of a single compaction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactionStats {
    /// Slots walked (live + tombstoned)
    pub scanned: usize,

    /// Tombstones physically removed
    pub reclaimed: usize,

    /// Live entries carried over
    pub survivors: usize,
}

impl<K, V> EntryStore<K, V> {
    /// Drop all tombstones, preserving the order of live entries.
    ///
    /// Surviving entries keep their `EntryId`; only the order sequence is
    /// reallocated.
    pub(crate) fn compact(&mut self) -> CompactionStats {
        let old_order = mem::take(&mut self.order);
        let scanned = old_order.len();

        let mut order = Vec::with_capacity(scanned.saturating_sub(self.tombstones));
        let mut reclaimed = 0;

        for id in old_order {
            let live = self
                .slots
                .get(id)
                .is_some_and(|entry| !entry.is_tombstone());

            if live {
                order.push(id);
            } else {
                self.slots.remove(id);
                reclaimed += 1;
            }
        }

        let survivors = order.len();
        self.order = order;
        self.tombstones = 0;

        CompactionStats {
            scanned,
            reclaimed,
            survivors,
        }
    }
}
