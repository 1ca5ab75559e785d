/*!
# Growable Arrays

[`GrowableArray`] is the per-vertex bucket of the incremental CSR builder. It allocates
lazily, starts at [`DEFAULT_CAPACITY`] (or a configured first capacity), grows geometrically and hands its storage over exactly once via
[`GrowableArray::into_vec`]; afterwards the bucket no longer exists, so a transferred buffer
can neither be reused nor released twice.
*/

/// Capacity allocated on the first push
pub const DEFAULT_CAPACITY: usize = 8;

/// An append-only array with explicit doubling growth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowableArray<T> {
    items: Vec<T>,
    first_capacity: usize,
}

impl<T> Default for GrowableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GrowableArray<T> {
    /// Creates an empty array without allocating
    pub const fn new() -> Self {
        Self::with_first_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty array without allocating; the first push allocates room for
    /// `first_capacity` items (at least one)
    pub const fn with_first_capacity(first_capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            first_capacity,
        }
    }

    /// Creates an empty array with room for `capacity` items
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            first_capacity: DEFAULT_CAPACITY,
        }
    }

    /// Appends `value`, doubling the capacity (at least to the first capacity) if full
    #[inline]
    pub fn push(&mut self, value: T) {
        if self.items.len() == self.items.capacity() {
            self.grow();
        }
        self.items.push(value);
    }

    #[cold]
    fn grow(&mut self) {
        let target = (self.items.capacity() * 2).max(self.first_capacity).max(1);
        self.items.reserve_exact(target - self.items.len());
    }

    /// Returns the number of stored items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns *true* if no items are stored
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the currently allocated capacity
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Returns the stored items in insertion order
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consumes the array and transfers ownership of its storage
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometric_growth() {
        let mut arr = GrowableArray::new();
        assert_eq!(arr.capacity(), 0);

        arr.push(1u32);
        assert_eq!(arr.capacity(), DEFAULT_CAPACITY);

        for i in 2..=(DEFAULT_CAPACITY as u32) {
            arr.push(i);
        }
        assert_eq!(arr.capacity(), DEFAULT_CAPACITY);

        arr.push(100);
        assert_eq!(arr.capacity(), 2 * DEFAULT_CAPACITY);
        assert_eq!(arr.len(), DEFAULT_CAPACITY + 1);
        assert_eq!(arr.as_slice()[0], 1);
        assert_eq!(*arr.as_slice().last().unwrap(), 100);

        let v = arr.into_vec();
        assert_eq!(v.len(), DEFAULT_CAPACITY + 1);
    }

    #[test]
    fn configured_first_capacity() {
        let mut arr = GrowableArray::with_first_capacity(3);
        assert_eq!(arr.capacity(), 0);
        arr.push('a');
        assert_eq!(arr.capacity(), 3);

        let mut arr = GrowableArray::with_first_capacity(0);
        arr.push(1u8);
        arr.push(2);
        assert_eq!(arr.as_slice(), &[1, 2]);
    }
}
