/*!
# Generalized Maps

Colors, distances, heap positions and edge weights are all stored behind [`Map`], so callers can
back them with a dense array ([`DenseMap`]) or a dictionary (`HashMap` / `FxHashMap`).
*/

use std::{
    collections::HashMap,
    hash::{BuildHasher, Hash},
};

use num::ToPrimitive;

use super::FromCapacity;

/// Minimalist trait for map-like collections.
pub trait Map<K, V> {
    /// Inserts an `(key, value)` pair into the map.
    /// If the key was present before, returns the previous value, otherwise returns `None`.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Removes a key from the map and returns the associated value if it existed.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Returns a reference to the value corresponding to the given key, or `None` if the key is not present.
    fn get(&self, key: &K) -> Option<&V>;

    /// Returns `true` if `key` has a value
    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Clears all elements from the map.
    fn clear(&mut self);

    /// Returns the number of elements currently stored in the map.
    fn len(&self) -> usize;

    /// Returns `true` if the map is empty. Default implementation uses `len()`.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V, S> Map<K, V> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        HashMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        HashMap::remove(self, key)
    }

    fn get(&self, key: &K) -> Option<&V> {
        HashMap::get(self, key)
    }

    fn clear(&mut self) {
        HashMap::clear(self)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

/// Dense map for integer keys backed by `Vec<Option<T>>`.
///
/// Lookups of keys beyond the allocated range return `None`; inserting such a key grows the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseMap<T> {
    slots: Vec<Option<T>>,
    len: usize,
}

impl<T> Default for DenseMap<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }
}

impl<T> DenseMap<T> {
    /// Creates an empty map with `n` preallocated slots
    pub fn new(n: usize) -> Self {
        let mut slots = Vec::with_capacity(n);
        slots.resize_with(n, || None);
        Self { slots, len: 0 }
    }

    /// Number of keys with a value
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns *true* if no key has a value
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a mutable reference to the value of `key`
    pub fn get_mut<K: ToPrimitive>(&mut self, key: &K) -> Option<&mut T> {
        self.slots.get_mut(key.to_usize()?)?.as_mut()
    }

    /// Iterates over all `(key, value)` pairs in increasing key order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k, v)))
    }

    /// Returns the slots, `None` for absent keys
    pub fn as_slots(&self) -> &[Option<T>] {
        &self.slots
    }
}

impl<T> FromCapacity for DenseMap<T> {
    fn from_total_used_capacity(total: usize, _used: usize) -> Self {
        Self::new(total)
    }
}

impl<K, T> Map<K, T> for DenseMap<T>
where
    K: ToPrimitive,
{
    /// # Panics
    /// Panics if `key` is not representable as `usize`
    fn insert(&mut self, key: K, value: T) -> Option<T> {
        let key = match key.to_usize() {
            Some(key) => key,
            None => panic!("key not representable as index"),
        };
        if key >= self.slots.len() {
            self.slots.resize_with(key + 1, || None);
        }

        let prev = self.slots[key].replace(value);
        if prev.is_none() {
            self.len += 1;
        }
        prev
    }

    fn remove(&mut self, key: &K) -> Option<T> {
        let prev = self.slots.get_mut(key.to_usize()?)?.take();
        if prev.is_some() {
            self.len -= 1;
        }
        prev
    }

    fn get(&self, key: &K) -> Option<&T> {
        self.slots.get(key.to_usize()?)?.as_ref()
    }

    fn clear(&mut self) {
        self.slots.iter_mut().for_each(|x| *x = None);
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }
}
