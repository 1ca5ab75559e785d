/*!
# Indexed D-ary Heap

[`IndexedDaryHeap`] is a min-heap of arity [`ARITY`] over `(element, priority)` pairs. An
injected index map stores the array position of every contained element, so
[`IndexedDaryHeap::decrease_key`] and [`IndexedDaryHeap::contains`] never search.

Children of position `i` are `ARITY * i + 1 ..= ARITY * i + ARITY`; the parent of `i > 0` is
`(i - 1) / ARITY`. Priorities are compared through a [`PriorityOrder`]; the order among equal
priorities is unspecified.

```
use csrkit::utils::IndexedDaryHeap;

let mut heap: IndexedDaryHeap<u32, u32> = IndexedDaryHeap::new();
for (element, priority) in [(0, 5), (1, 3), (2, 8), (3, 1)] {
    heap.insert(element, priority);
}
heap.decrease_key(&2, 2);

let order: Vec<u32> = std::iter::from_fn(|| heap.extract_min()).collect();
assert_eq!(order, vec![3, 2, 1, 0]);
```
*/

use super::{DenseMap, FromCapacity, Map};
use crate::error::*;

/// Number of children per heap node
pub const ARITY: usize = 4;

/// Strict weak order on priorities
pub trait PriorityOrder<P> {
    /// Returns *true* if `a` must leave the heap before `b`
    fn less(&self, a: &P, b: &P) -> bool;
}

/// `a < b` via [`PartialOrd`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NaturalOrder;

impl<P: PartialOrd> PriorityOrder<P> for NaturalOrder {
    #[inline(always)]
    fn less(&self, a: &P, b: &P) -> bool {
        a < b
    }
}

/// `a > b` via [`PartialOrd`], turning the heap into a max-heap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReverseOrder;

impl<P: PartialOrd> PriorityOrder<P> for ReverseOrder {
    #[inline(always)]
    fn less(&self, a: &P, b: &P) -> bool {
        a > b
    }
}

impl<P, F> PriorityOrder<P> for F
where
    F: Fn(&P, &P) -> bool,
{
    #[inline(always)]
    fn less(&self, a: &P, b: &P) -> bool {
        self(a, b)
    }
}

/// Indexed min-heap of arity [`ARITY`] with decrease-key
#[derive(Debug, Clone)]
pub struct IndexedDaryHeap<E, P, IM = DenseMap<usize>, O = NaturalOrder> {
    elements: Vec<(E, P)>,
    index: IM,
    order: O,
}

impl<E, P> IndexedDaryHeap<E, P>
where
    E: Copy,
    DenseMap<usize>: Map<E, usize>,
    NaturalOrder: PriorityOrder<P>,
{
    /// Creates an empty heap with a dense index map and the natural order of `P`
    pub fn new() -> Self {
        Self::with_index_and_order(DenseMap::default(), NaturalOrder)
    }
}

impl<E, P> Default for IndexedDaryHeap<E, P>
where
    E: Copy,
    DenseMap<usize>: Map<E, usize>,
    NaturalOrder: PriorityOrder<P>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, P, IM, O> IndexedDaryHeap<E, P, IM, O>
where
    E: Copy,
    IM: Map<E, usize>,
    O: PriorityOrder<P>,
{
    /// Creates an empty heap using the given index map (which must be empty) and order
    pub fn with_index_and_order(index: IM, order: O) -> Self {
        debug_assert!(index.is_empty());
        Self {
            elements: Vec::new(),
            index,
            order,
        }
    }

    /// Creates an empty heap for elements in `0..capacity`
    pub fn with_capacity(capacity: usize) -> Self
    where
        IM: FromCapacity,
        O: Default,
    {
        let mut heap = Self::with_index_and_order(IM::from_capacity(capacity), O::default());
        heap.elements.reserve(capacity);
        heap
    }

    /// Returns the number of contained elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns *true* if the heap contains no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns *true* if `element` is contained
    pub fn contains(&self, element: &E) -> bool {
        self.index.contains_key(element)
    }

    /// Returns the priority of `element` if contained
    pub fn priority_of(&self, element: &E) -> Option<&P> {
        let &pos = self.index.get(element)?;
        Some(&self.elements[pos].1)
    }

    /// Removes all elements
    pub fn clear(&mut self) {
        self.elements.clear();
        self.index.clear();
    }

    /// Inserts `element` with `priority` in `O(log n)`.
    ///
    /// If `element` is already contained, this behaves like [`Self::update`].
    pub fn insert(&mut self, element: E, priority: P) {
        if self.contains(&element) {
            self.update(&element, priority);
            return;
        }

        let pos = self.elements.len();
        self.elements.push((element, priority));
        self.sift_up(pos);
    }

    /// Inserts `element` if it is new, otherwise lowers its priority to `priority` if that
    /// is smaller. Returns *true* if the heap changed.
    pub fn add_or_update(&mut self, element: E, priority: P) -> bool {
        match self.index.get(&element) {
            None => {
                self.insert(element, priority);
                true
            }
            Some(&pos) => {
                if self.order.less(&priority, &self.elements[pos].1) {
                    self.elements[pos].1 = priority;
                    self.sift_up(pos);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Lowers the priority of a contained `element` to `priority` and restores the heap
    /// property by sifting it towards the root. Returns *false* if `element` is not contained.
    pub fn decrease_key(&mut self, element: &E, priority: P) -> bool {
        let Some(&pos) = self.index.get(element) else {
            return false;
        };
        debug_assert!(
            !self.order.less(&self.elements[pos].1, &priority),
            "decrease_key must not increase the priority"
        );

        self.elements[pos].1 = priority;
        self.sift_up(pos);
        true
    }

    /// Sets the priority of a contained `element` to `priority` in either direction.
    /// Returns *false* if `element` is not contained.
    pub fn update(&mut self, element: &E, priority: P) -> bool {
        let Some(&pos) = self.index.get(element) else {
            return false;
        };

        let decreased = self.order.less(&priority, &self.elements[pos].1);
        self.elements[pos].1 = priority;
        if decreased {
            self.sift_up(pos);
        } else {
            self.sift_down(pos);
        }
        true
    }

    /// Returns the minimum element and its priority in `O(1)`
    pub fn peek_min(&self) -> Option<(&E, &P)> {
        self.elements.first().map(|(e, p)| (e, p))
    }

    /// Like [`Self::peek_min`] but reports an empty heap as an error
    pub fn try_peek_min(&self) -> Result<(&E, &P)> {
        self.peek_min().ok_or(GraphError::EmptyHeap)
    }

    /// Removes the minimum element together with its priority in `O(log n)`
    pub fn pop(&mut self) -> Option<(E, P)> {
        if self.elements.is_empty() {
            return None;
        }

        let (element, priority) = self.elements.swap_remove(0);
        self.index.remove(&element);

        if !self.elements.is_empty() {
            let moved = self.elements[0].0;
            self.index.insert(moved, 0);
            self.sift_down(0);
        }

        Some((element, priority))
    }

    /// Removes the minimum element in `O(log n)`
    pub fn extract_min(&mut self) -> Option<E> {
        self.pop().map(|(e, _)| e)
    }

    /// Like [`Self::extract_min`] but reports an empty heap as an error
    pub fn try_extract_min(&mut self) -> Result<E> {
        self.extract_min().ok_or(GraphError::EmptyHeap)
    }

    /// Moves the entry at `pos` towards the root while it is smaller than its parent.
    ///
    /// The final slot is located first. The entry is placed there directly and the ancestors
    /// on the path shift down one level each, so every relocated entry (and the moved entry
    /// itself) is written to the index map exactly once.
    fn sift_up(&mut self, pos: usize) {
        let mut target = pos;
        while target > 0 {
            let parent = (target - 1) / ARITY;
            if !self
                .order
                .less(&self.elements[pos].1, &self.elements[parent].1)
            {
                break;
            }
            target = parent;
        }

        if target != pos {
            // `pos` now holds the old root of the path; pass it down to the child of `target`
            self.elements.swap(pos, target);
            let mut slot = pos;
            loop {
                let parent = (slot - 1) / ARITY;
                if parent == target {
                    break;
                }
                self.elements.swap(slot, parent);
                self.index.insert(self.elements[slot].0, slot);
                slot = parent;
            }
            self.index.insert(self.elements[slot].0, slot);
        }

        self.index.insert(self.elements[target].0, target);
        self.debug_check_local(target);
    }

    /// Moves the entry at `pos` towards the leaves while a child is smaller
    fn sift_down(&mut self, mut pos: usize) {
        let len = self.elements.len();
        loop {
            let first = ARITY * pos + 1;
            if first >= len {
                break;
            }

            let mut min_child = first;
            for child in (first + 1)..(first + ARITY).min(len) {
                if self
                    .order
                    .less(&self.elements[child].1, &self.elements[min_child].1)
                {
                    min_child = child;
                }
            }

            if !self
                .order
                .less(&self.elements[min_child].1, &self.elements[pos].1)
            {
                break;
            }

            self.elements.swap(pos, min_child);
            self.index.insert(self.elements[pos].0, pos);
            pos = min_child;
        }

        if pos < len {
            self.index.insert(self.elements[pos].0, pos);
            self.debug_check_local(pos);
        }
    }

    #[inline(always)]
    fn debug_check_local(&self, pos: usize) {
        if cfg!(debug_assertions) {
            if pos > 0 {
                let parent = (pos - 1) / ARITY;
                debug_assert!(
                    !self
                        .order
                        .less(&self.elements[pos].1, &self.elements[parent].1),
                    "heap order violated at {pos}"
                );
            }
            let first = ARITY * pos + 1;
            for child in first..(first + ARITY).min(self.elements.len()) {
                debug_assert!(
                    !self
                        .order
                        .less(&self.elements[child].1, &self.elements[pos].1),
                    "heap order violated at {child}"
                );
            }
        }
    }

    /// Returns *true* if no element is ordered before its parent and the index map is
    /// consistent with the array. Runs in `O(n)`.
    pub fn is_heap(&self) -> bool {
        let ordered = (1..self.elements.len()).all(|i| {
            !self
                .order
                .less(&self.elements[i].1, &self.elements[(i - 1) / ARITY].1)
        });
        let indexed = self.index.len() == self.elements.len()
            && self
                .elements
                .iter()
                .enumerate()
                .all(|(i, (e, _))| self.index.get(e) == Some(&i));
        ordered && indexed
    }

    /// Panics in debug builds if [`Self::is_heap`] fails
    pub fn assert_heap_invariant(&self) {
        debug_assert!(self.is_heap(), "heap invariant violated");
    }
}
