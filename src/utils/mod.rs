/*!
# Utilities

Building blocks the graph representations and traversals are parameterized over:
- abstractions over [`Set`] and [`Map`] so explored sets, color maps, distance maps and heap
  indices can be backed by bitsets, dense arrays or dictionaries,
- vertex [`Color`]s for depth-first traversals,
- the [`IndexedDaryHeap`] frontier of priority-driven searches,
- weight [`Monoid`]s and [`EdgeWeights`] lookups for shortest paths,
- the [`GrowableArray`] buckets of the incremental builder.
*/

use std::{
    collections::{HashMap, HashSet},
    hash::RandomState,
};

use fxhash::{FxBuildHasher, FxHashMap, FxHashSet};
use stream_bitset::{PrimIndex, bitset::BitSetImpl};

pub mod color;
pub mod growable;
pub mod heap;
pub mod map;
pub mod set;
pub mod weights;

pub use color::{Color, ColorMap};
pub use growable::GrowableArray;
pub use heap::{IndexedDaryHeap, NaturalOrder, PriorityOrder, ReverseOrder};
pub use map::{DenseMap, Map};
pub use set::{NodeSet, Set};
pub use weights::{Additive, Bottleneck, EdgeWeights, Monoid, WeightFn};

/// Helper trait for datastructure that can be initialized with capacity.
/// Can be interpreted as reserved space or guaranteed used space.
///
/// Note that this should mainly be used in conjunction with either [`Set`] or [`Map`]
/// datastructures: a dense structure must cover every key up to `total`, a hashing structure
/// only needs room for `used` entries.
pub trait FromCapacity: Sized {
    /// Create a new instance with a given capacity
    fn from_capacity(capacity: usize) -> Self {
        Self::from_total_used_capacity(capacity, capacity)
    }

    /// Creates a new instance from the total capacity (ie. max-value for example) and the actual
    /// capacity that will be used (space-wise).
    ///
    /// If you only have one value as an upper bound, provide it as both arguments.
    fn from_total_used_capacity(total: usize, used: usize) -> Self;
}

impl<I> FromCapacity for BitSetImpl<I>
where
    I: PrimIndex,
{
    /// # Panics
    /// Panics if `total` is not representable by `I`
    fn from_total_used_capacity(total: usize, _used: usize) -> Self {
        match I::from_usize(total) {
            Some(total) => Self::new(total),
            None => panic!("bitset capacity {total} exceeds the index type"),
        }
    }
}

impl<T> FromCapacity for HashSet<T, RandomState> {
    fn from_total_used_capacity(_total: usize, used: usize) -> Self {
        Self::with_capacity(used)
    }
}

impl<T> FromCapacity for FxHashSet<T> {
    fn from_total_used_capacity(_total: usize, used: usize) -> Self {
        Self::with_capacity_and_hasher(used, FxBuildHasher::default())
    }
}

impl<K, V> FromCapacity for HashMap<K, V, RandomState> {
    fn from_total_used_capacity(_total: usize, used: usize) -> Self {
        Self::with_capacity(used)
    }
}

impl<K, V> FromCapacity for FxHashMap<K, V> {
    fn from_total_used_capacity(_total: usize, used: usize) -> Self {
        Self::with_capacity_and_hasher(used, FxBuildHasher::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::*;

    #[test]
    fn capacities() {
        let bits = NodeBitSet::from_capacity(17);
        assert_eq!(bits.number_of_bits(), 17);

        let map: FxHashMap<Node, u32> = FxHashMap::from_total_used_capacity(1 << 30, 4);
        assert!(map.capacity() >= 4);

        let set: HashSet<Node> = HashSet::from_capacity(8);
        assert!(set.capacity() >= 8);
    }
}
