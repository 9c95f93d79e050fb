//! Operation Tests
//!
//! Tests verify:
//! - Insert / update in place
//! - Lookup and membership
//! - Delete semantics and re-insertion at the tail
//! - Clear
//! - Trait impls (Default, Clone, PartialEq, FromIterator, Debug)

use stablemap::StableMap;

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_map_is_empty() {
    let map: StableMap<i32, String> = StableMap::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.tombstone_count(), 0);
    assert_eq!(map.slot_count(), 0);
}

#[test]
fn test_insert_and_get() {
    let map = StableMap::new();

    assert_eq!(map.insert("key1", "value1"), None);

    assert_eq!(map.get("key1"), Some("value1"));
    assert_eq!(map.len(), 1);
}

#[test]
fn test_get_nonexistent_key() {
    let map: StableMap<String, i32> = StableMap::new();

    assert_eq!(map.get("missing"), None);
    assert!(!map.contains_key("missing"));
}

#[test]
fn test_insert_overwrites_in_place() {
    let map = StableMap::new();

    map.insert(1, "a");
    map.insert(2, "b");
    assert_eq!(map.insert(1, "A"), Some("a"));

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&1), Some("A"));
    // Position is unchanged
    assert_eq!(map.keys().collect::<Vec<_>>(), vec![1, 2]);
    // No new slot was appended
    assert_eq!(map.slot_count(), 2);
}

#[test]
fn test_contains_key_tracks_lifecycle() {
    let map = StableMap::new();
    assert!(!map.contains_key(&1));

    map.insert(1, "one");
    assert!(map.contains_key(&1));

    map.remove(&1);
    assert!(!map.contains_key(&1));
}

#[test]
fn test_borrowed_key_lookup() {
    let map: StableMap<String, usize> = StableMap::new();
    map.insert("alpha".to_string(), 1);

    assert_eq!(map.get("alpha"), Some(1));
    assert!(map.contains_key("alpha"));
    assert_eq!(map.remove("alpha"), Some(1));
}

#[test]
fn test_get_or_default() {
    let map: StableMap<i32, String> = StableMap::new();
    map.insert(1, "one".to_string());

    assert_eq!(map.get_or_default(&1), ("one".to_string(), true));
    assert_eq!(map.get_or_default(&2), (String::new(), false));
}

#[test]
fn test_get_with_borrows_value() {
    let map = StableMap::new();
    map.insert("vec", vec![1, 2, 3]);

    assert_eq!(map.get_with("vec", |v| v.len()), Some(3));
    assert_eq!(map.get_with("other", |v| v.len()), None);
}

// =============================================================================
// Delete / Tombstone Tests
// =============================================================================

#[test]
fn test_remove_returns_value() {
    let map = StableMap::new();
    map.insert(1, "one");

    assert_eq!(map.remove(&1), Some("one"));
    assert_eq!(map.get(&1), None);
    assert_eq!(map.len(), 0);
}

#[test]
fn test_remove_leaves_tombstone() {
    let map = StableMap::new();
    map.insert(1, "one");
    map.insert(2, "two");

    map.remove(&1);

    assert_eq!(map.len(), 1);
    assert_eq!(map.tombstone_count(), 1);
    assert_eq!(map.slot_count(), 2); // tombstone still occupies a slot
}

#[test]
fn test_remove_nonexistent_key_is_noop() {
    let map = StableMap::new();
    map.insert(1, "one");

    assert_eq!(map.remove(&42), None);

    assert_eq!(map.len(), 1);
    assert_eq!(map.tombstone_count(), 0);
}

#[test]
fn test_double_remove_is_noop() {
    let map = StableMap::new();
    map.insert(1, "one");

    assert_eq!(map.remove(&1), Some("one"));
    assert_eq!(map.remove(&1), None);

    assert_eq!(map.len(), 0);
    assert_eq!(map.tombstone_count(), 1);
}

#[test]
fn test_remove_drops_value() {
    use std::sync::Arc;

    let resource = Arc::new(());
    let map = StableMap::new();
    map.insert(1, Arc::clone(&resource));
    assert_eq!(Arc::strong_count(&resource), 2);

    drop(map.remove(&1));

    // The tombstone keeps no reference to the value
    assert_eq!(Arc::strong_count(&resource), 1);
    assert_eq!(map.tombstone_count(), 1);
}

#[test]
fn test_reinsert_after_remove_moves_to_tail() {
    let map = StableMap::new();
    map.insert(1, "one");
    map.insert(2, "two");
    map.insert(3, "three");

    map.remove(&1);
    assert_eq!(map.insert(1, "ONE"), None);

    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&1), Some("ONE"));
    assert_eq!(map.keys().collect::<Vec<_>>(), vec![2, 3, 1]);
    // Old tombstone and new entry coexist until compaction
    assert_eq!(map.slot_count(), 4);
}

#[test]
fn test_repeated_delete_reinsert_accumulates_tombstones() {
    let map = StableMap::new();

    for i in 0..5 {
        map.insert("key", i);
        map.remove("key");
    }
    map.insert("key", 99);

    assert_eq!(map.len(), 1);
    assert_eq!(map.tombstone_count(), 5);
    assert_eq!(map.slot_count(), 6);
    assert_eq!(map.iter().collect::<Vec<_>>(), vec![("key", 99)]);
}

// =============================================================================
// Clear Tests
// =============================================================================

#[test]
fn test_clear() {
    let map = StableMap::new();
    map.insert(1, "one");
    map.insert(2, "two");
    map.remove(&2);

    map.clear();

    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.tombstone_count(), 0);
    assert_eq!(map.slot_count(), 0);
    assert!(!map.contains_key(&1));
    assert!(!map.contains_key(&2));
}

#[test]
fn test_clear_then_reuse() {
    let map = StableMap::new();
    map.insert(1, "one");
    map.insert(3, "three");

    map.clear();
    map.insert(3, "three");
    map.insert(1, "one");

    assert_eq!(map.values().collect::<Vec<_>>(), vec!["three", "one"]);
}

// =============================================================================
// Trait Tests
// =============================================================================

#[test]
fn test_default_is_empty() {
    let map: StableMap<u8, u8> = StableMap::default();
    assert!(map.is_empty());
}

#[test]
fn test_from_iterator_keeps_first_position() {
    let map: StableMap<&str, i32> = vec![("a", 1), ("b", 2), ("a", 3)].into_iter().collect();

    assert_eq!(map.len(), 2);
    assert_eq!(map.iter().collect::<Vec<_>>(), vec![("a", 3), ("b", 2)]);
}

#[test]
fn test_extend_appends() {
    let mut map = StableMap::new();
    map.insert(1, 'a');

    map.extend(vec![(2, 'b'), (3, 'c')]);

    assert_eq!(map.len(), 3);
    assert_eq!(map.keys().collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn test_clone_drops_tombstones() {
    let map = StableMap::new();
    map.insert(1, "one");
    map.insert(2, "two");
    map.remove(&1);

    let copy = map.clone();

    assert_eq!(copy.len(), 1);
    assert_eq!(copy.tombstone_count(), 0);
    assert_eq!(copy.slot_count(), 1);
    assert_eq!(copy, map);

    // Independent after the copy
    copy.insert(3, "three");
    assert!(!map.contains_key(&3));
}

#[test]
fn test_eq_is_order_sensitive() {
    let a: StableMap<i32, i32> = vec![(1, 1), (2, 2)].into_iter().collect();
    let b: StableMap<i32, i32> = vec![(2, 2), (1, 1)].into_iter().collect();
    let c: StableMap<i32, i32> = vec![(1, 1), (2, 2)].into_iter().collect();

    assert_ne!(a, b);
    assert_eq!(a, c);
}

#[test]
fn test_debug_lists_entries_in_order() {
    let map = StableMap::new();
    map.insert(2, "b");
    map.insert(1, "a");

    assert_eq!(format!("{:?}", map), r#"{2: "b", 1: "a"}"#);
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn test_unit_value() {
    let map = StableMap::new();
    map.insert("k", ());

    assert!(map.contains_key("k"));
    assert_eq!(map.get("k"), Some(()));
}

#[test]
fn test_large_value() {
    let map = StableMap::new();

    let large_value = vec![0xABu8; 1024 * 1024]; // 1 MB
    map.insert("big", large_value.clone());

    assert_eq!(map.get("big"), Some(large_value));
}

#[test]
fn test_many_entries() {
    let map = StableMap::new();

    for i in 0..1000 {
        map.insert(format!("key{:04}", i), i);
    }

    assert_eq!(map.len(), 1000);
    for (expected, (key, value)) in map.iter().enumerate() {
        assert_eq!(key, format!("key{:04}", expected));
        assert_eq!(value, expected);
    }
}
