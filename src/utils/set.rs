/*!
# Generalized Sets

Explored sets of traversals are abstracted behind [`Set`] so callers can choose the most
efficient implementation for their graph:

- Dense graphs / many visited vertices -> [`NodeBitSet`]
- Few visited vertices in a huge graph -> `HashSet` / `FxHashSet`
- Dense, but the visited vertices must be enumerated in visit order -> [`NodeSet`]
*/

use std::{
    collections::{HashSet, hash_set::Iter},
    hash::{BuildHasher, Hash},
    iter::{Cloned, Copied},
};

use num::ToPrimitive;
use stream_bitset::{
    PrimIndex,
    bitset::BitSetImpl,
    prelude::{BitmaskSliceStream, BitmaskStreamConsumer, BitmaskStreamToIndices, ToBitmaskStream},
};

use super::FromCapacity;
use crate::node::*;

/// Minimalist trait for a set-like collection.
pub trait Set<T> {
    /// Inserts `value` into the set.
    /// Returns `true` if the element was already present.
    fn insert(&mut self, value: T) -> bool;

    /// Inserts multiple elements from an iterator.
    fn insert_multiple<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.insert(value);
        }
    }

    /// Removes `value` from the set.
    /// Returns `true` if the element was present.
    fn remove(&mut self, value: &T) -> bool;

    /// Iterator over elements in set.
    ///
    /// Returned by [`Set::iter`].
    type SetIter<'a>: Iterator<Item = T>
    where
        Self: 'a,
        T: Clone;

    /// Returns an iterator over all elements in the set.
    fn iter(&self) -> Self::SetIter<'_>
    where
        T: Clone;

    /// Returns `true` if the set contains `value`.
    fn contains(&self, value: &T) -> bool;

    /// Clears all elements from the set.
    fn clear(&mut self);

    /// Returns the number of elements in the set.
    fn len(&self) -> usize;

    /// Returns `true` if the set is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, S> Set<T> for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn insert(&mut self, value: T) -> bool {
        !HashSet::insert(self, value)
    }

    fn remove(&mut self, value: &T) -> bool {
        HashSet::remove(self, value)
    }

    type SetIter<'a>
        = Cloned<Iter<'a, T>>
    where
        Self: 'a,
        T: Clone;

    fn iter(&self) -> Self::SetIter<'_>
    where
        T: Clone,
    {
        HashSet::iter(self).cloned()
    }

    fn contains(&self, value: &T) -> bool {
        HashSet::contains(self, value)
    }

    fn clear(&mut self) {
        HashSet::clear(self);
    }

    fn len(&self) -> usize {
        HashSet::len(self)
    }
}

impl<I> Set<I> for BitSetImpl<I>
where
    I: PrimIndex,
{
    fn insert(&mut self, value: I) -> bool {
        self.set_bit(value)
    }

    fn remove(&mut self, value: &I) -> bool {
        self.clear_bit(*value)
    }

    type SetIter<'a>
        = BitmaskStreamToIndices<BitmaskSliceStream<'a>, I, true>
    where
        Self: 'a,
        I: Clone;

    fn iter(&self) -> Self::SetIter<'_> {
        self.bitmask_stream().iter_set_bits()
    }

    fn contains(&self, value: &I) -> bool {
        self.get_bit(*value)
    }

    fn clear(&mut self) {
        self.clear_all();
    }

    fn len(&self) -> usize {
        self.cardinality().to_usize().unwrap_or(usize::MAX)
    }
}

/// A set of nodes `0..n` supporting O(1) insertion, removal and iteration in insertion order
/// (as long as nothing is removed).
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    data: Vec<Node>,
    positions: Vec<Node>,
}

impl NodeSet {
    /// Creates an empty node-set of size `n`
    pub fn new(n: NumNodes) -> Self {
        Self {
            data: Vec::new(),
            positions: vec![INVALID_NODE; n as usize],
        }
    }

    /// Returns the elements as a slice
    pub fn as_slice(&self) -> &[Node] {
        &self.data
    }
}

impl FromCapacity for NodeSet {
    fn from_total_used_capacity(total: usize, used: usize) -> Self {
        let mut set = Self::new(total as NumNodes);
        set.data.reserve(used);
        set
    }
}

impl Set<Node> for NodeSet {
    fn insert(&mut self, value: Node) -> bool {
        let index = value as usize;
        if self.positions[index] != INVALID_NODE {
            return true;
        }

        self.positions[index] = self.data.len() as Node;
        self.data.push(value);

        false
    }

    fn remove(&mut self, value: &Node) -> bool {
        let index = *value as usize;
        let pos = match self.positions.get(index) {
            Some(&pos) if pos != INVALID_NODE => pos as usize,
            _ => return false,
        };

        self.data.swap_remove(pos);
        if pos < self.data.len() {
            self.positions[self.data[pos] as usize] = pos as Node;
        }

        self.positions[index] = INVALID_NODE;

        true
    }

    type SetIter<'a>
        = Copied<std::slice::Iter<'a, Node>>
    where
        Self: 'a,
        Node: Clone;

    fn iter(&self) -> Self::SetIter<'_> {
        self.data.iter().copied()
    }

    fn contains(&self, value: &Node) -> bool {
        self.positions
            .get(*value as usize)
            .is_some_and(|&p| p != INVALID_NODE)
    }

    fn clear(&mut self) {
        for &u in &self.data {
            self.positions[u as usize] = INVALID_NODE;
        }
        self.data.clear();
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashSet;
    use itertools::Itertools;

    fn exercise<S: Set<Node>>(mut set: S) {
        assert!(set.is_empty());
        assert!(!set.insert(3));
        assert!(set.insert(3));
        assert!(!set.insert(7));
        assert!(set.contains(&3));
        assert!(!set.contains(&4));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().sorted().collect_vec(), vec![3, 7]);

        assert!(set.remove(&3));
        assert!(!set.remove(&3));
        assert_eq!(set.len(), 1);

        set.insert_multiple([1, 2]);
        assert_eq!(set.len(), 3);
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn all_sets_agree() {
        exercise(NodeBitSet::new(10));
        exercise(NodeSet::new(10));
        exercise(FxHashSet::<Node>::default());
        exercise(std::collections::HashSet::<Node>::new());
    }

    #[test]
    fn node_set_keeps_insertion_order() {
        let mut set = NodeSet::from_capacity(6);
        for u in [4, 0, 5, 2] {
            set.insert(u);
        }
        assert_eq!(set.as_slice(), &[4, 0, 5, 2]);
        set.remove(&0);
        assert_eq!(set.as_slice(), &[4, 2, 5]);
        assert!(set.contains(&2));
        assert!(!set.contains(&60));
    }
}
