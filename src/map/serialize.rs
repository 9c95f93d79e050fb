//! Serde support (feature `serde`)
//!
//! A `StableMap` is encoded as a plain map whose entries appear in iteration
//! order. Decoding inserts entries in the order they are read, so a
//! round-trip through an order-preserving format keeps the map's order.

use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

use ::serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use ::serde::ser::{Serialize, SerializeMap, Serializer};

use super::StableMap;
use crate::config::Config;

/// Upper bound on preallocation driven by an untrusted length hint
const MAX_PREALLOCATED_ENTRIES: usize = 4096;

impl<K, V, S> Serialize for StableMap<K, V, S>
where
    K: Serialize + Eq + Hash + Clone,
    V: Serialize + Clone,
    S: BuildHasher,
{
    fn serialize<T: Serializer>(&self, serializer: T) -> Result<T::Ok, T::Error> {
        let snapshot = self.iter();
        let mut map = serializer.serialize_map(Some(snapshot.len()))?;
        for (key, value) in snapshot {
            map.serialize_entry(&key, &value)?;
        }
        map.end()
    }
}

struct StableMapVisitor<K, V, S> {
    marker: PhantomData<fn() -> StableMap<K, V, S>>,
}

impl<'de, K, V, S> Visitor<'de> for StableMapVisitor<K, V, S>
where
    K: Deserialize<'de> + Eq + Hash + Clone,
    V: Deserialize<'de>,
    S: BuildHasher + Default,
{
    type Value = StableMap<K, V, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let capacity = access
            .size_hint()
            .unwrap_or(0)
            .min(MAX_PREALLOCATED_ENTRIES);
        let config = Config::builder().initial_capacity(capacity).build();

        let map = StableMap::from_parts(config, S::default());
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, K, V, S> Deserialize<'de> for StableMap<K, V, S>
where
    K: Deserialize<'de> + Eq + Hash + Clone,
    V: Deserialize<'de>,
    S: BuildHasher + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StableMapVisitor {
            marker: PhantomData,
        })
    }
}
