//! Fixed-capacity array-backed binary heap with lazy heapification.
//!
//! The ordering strategy is a [`HeapProperty`] value: [`MinFirst`] and
//! [`MaxFirst`] cover `Ord` element types, [`MinByKey`] / [`MaxByKey`]
//! order by an extracted key for everything else. [`MinHeap`] and
//! [`MaxHeap`] are the common aliases.
//!
//! ## Lazy heapification
//!
//! [`append`](FixedHeap::append) pushes without restoring heap order and
//! marks the heap dirty. The next ordered operation (`pop`, `peek`,
//! `displace`, `insert`, `iter`) runs a single bottom-up heapify pass
//! first, so bulk-loading n elements costs O(n) total instead of
//! O(n log n) sift-ups.
//!
//! ```text
//!   append, append, append, ...   ── O(1) each, heap dirty
//!   pop                            ── one O(n) heapify, then O(log n)
//! ```
//!
//! Capacity is fixed at construction; [`insert`](FixedHeap::insert) and
//! `append` fail with [`HeapError::Full`] rather than growing.

use crate::error::{ConfigError, HeapError};

/// Ordering strategy for a [`FixedHeap`].
///
/// `in_order(parent, child)` returns `true` when the pair satisfies the
/// heap property as-is. Implementations must be total and consistent; the
/// heap calls it on every comparison.
pub trait HeapProperty<T> {
    fn in_order(&self, parent: &T, child: &T) -> bool;
}

/// Smallest element at the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinFirst;

impl<T: Ord> HeapProperty<T> for MinFirst {
    fn in_order(&self, parent: &T, child: &T) -> bool {
        parent <= child
    }
}

/// Largest element at the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxFirst;

impl<T: Ord> HeapProperty<T> for MaxFirst {
    fn in_order(&self, parent: &T, child: &T) -> bool {
        parent >= child
    }
}

/// Smallest extracted key at the root.
#[derive(Debug, Clone, Copy)]
pub struct MinByKey<F>(pub F);

impl<T, K: Ord, F: Fn(&T) -> K> HeapProperty<T> for MinByKey<F> {
    fn in_order(&self, parent: &T, child: &T) -> bool {
        (self.0)(parent) <= (self.0)(child)
    }
}

/// Largest extracted key at the root.
#[derive(Debug, Clone, Copy)]
pub struct MaxByKey<F>(pub F);

impl<T, K: Ord, F: Fn(&T) -> K> HeapProperty<T> for MaxByKey<F> {
    fn in_order(&self, parent: &T, child: &T) -> bool {
        (self.0)(parent) >= (self.0)(child)
    }
}

/// Min-heap over `Ord` elements.
pub type MinHeap<T> = FixedHeap<T, MinFirst>;

/// Max-heap over `Ord` elements.
pub type MaxHeap<T> = FixedHeap<T, MaxFirst>;

/// Fixed-capacity binary heap parameterized by a [`HeapProperty`].
///
/// # Example
///
/// ```
/// use datakit::ds::MinHeap;
///
/// let mut heap = MinHeap::try_min(8).unwrap();
/// heap.append(5).unwrap();
/// heap.append(1).unwrap();
/// heap.append(3).unwrap();
///
/// assert_eq!(heap.pop(), Ok(1));
/// assert_eq!(heap.peek(), Ok(&3));
/// ```
#[derive(Debug, Clone)]
pub struct FixedHeap<T, P> {
    items: Vec<T>,
    capacity: usize,
    heapified: bool,
    property: P,
}

impl<T, P: HeapProperty<T>> FixedHeap<T, P> {
    /// Creates an empty heap with the given capacity and ordering.
    ///
    /// Fails with [`ConfigError`] when `capacity` is zero.
    pub fn try_new(capacity: usize, property: P) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("heap capacity must be greater than zero"));
        }
        Ok(Self {
            items: Vec::with_capacity(capacity),
            capacity,
            heapified: true,
            property,
        })
    }

    /// Returns the number of stored elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if the heap has no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if no more elements can be inserted.
    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    /// Returns `true` if the backing array currently satisfies the heap
    /// property (i.e. no deferred [`append`](Self::append) work is
    /// pending).
    pub fn is_heapified(&self) -> bool {
        self.heapified
    }

    /// Inserts an element, restoring heap order immediately.
    ///
    /// Fails with [`HeapError::Full`] at capacity; a full heap is never
    /// mutated by a failed insert.
    pub fn insert(&mut self, value: T) -> Result<(), HeapError> {
        if self.is_full() {
            return Err(HeapError::Full {
                capacity: self.capacity,
            });
        }
        self.ensure_heapified();
        self.items.push(value);
        self.sift_up(self.items.len() - 1);
        Ok(())
    }

    /// Inserts an element without restoring heap order, deferring the
    /// work to the next ordered operation.
    ///
    /// Fails with [`HeapError::Full`] at capacity.
    pub fn append(&mut self, value: T) -> Result<(), HeapError> {
        if self.is_full() {
            return Err(HeapError::Full {
                capacity: self.capacity,
            });
        }
        self.items.push(value);
        if self.items.len() > 1 {
            self.heapified = false;
        }
        Ok(())
    }

    /// Removes and returns the root element, or [`HeapError::Empty`].
    pub fn pop(&mut self) -> Result<T, HeapError> {
        if self.items.is_empty() {
            return Err(HeapError::Empty);
        }
        self.ensure_heapified();
        let root = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Ok(root)
    }

    /// Replaces the root with `value` and returns the old root.
    ///
    /// One sift instead of a `pop` + `insert` pair. Fails with
    /// [`HeapError::Empty`] on an empty heap.
    pub fn displace(&mut self, value: T) -> Result<T, HeapError> {
        if self.items.is_empty() {
            return Err(HeapError::Empty);
        }
        self.ensure_heapified();
        let old = std::mem::replace(&mut self.items[0], value);
        self.sift_down(0);
        Ok(old)
    }

    /// Returns the root element without removing it, or
    /// [`HeapError::Empty`]. Takes `&mut self` because it may flush a
    /// pending heapify.
    pub fn peek(&mut self) -> Result<&T, HeapError> {
        if self.items.is_empty() {
            return Err(HeapError::Empty);
        }
        self.ensure_heapified();
        Ok(&self.items[0])
    }

    /// Iterates the backing array in heap layout (root first, then
    /// level by level), not in sorted order. Flushes a pending heapify
    /// first.
    pub fn iter(&mut self) -> std::slice::Iter<'_, T> {
        self.ensure_heapified();
        self.items.iter()
    }

    /// Drops all elements; capacity is unchanged.
    pub fn clear(&mut self) {
        self.items.clear();
        self.heapified = true;
    }

    fn ensure_heapified(&mut self) {
        if self.heapified {
            return;
        }
        // Bottom-up heapify: sift down every internal node.
        for index in (0..self.items.len() / 2).rev() {
            self.sift_down(index);
        }
        self.heapified = true;
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.property.in_order(&self.items[parent], &self.items[index]) {
                break;
            }
            self.items.swap(parent, index);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut candidate = index;

            if left < self.items.len()
                && !self.property.in_order(&self.items[candidate], &self.items[left])
            {
                candidate = left;
            }
            if right < self.items.len()
                && !self.property.in_order(&self.items[candidate], &self.items[right])
            {
                candidate = right;
            }
            if candidate == index {
                break;
            }
            self.items.swap(index, candidate);
            index = candidate;
        }
    }

    #[cfg(any(test, debug_assertions))]
    /// Validates the heap property over the whole array (debug/test
    /// builds only). No-op while a heapify is pending.
    pub fn debug_validate_invariants(&self) {
        assert!(self.items.len() <= self.capacity);
        if !self.heapified {
            return;
        }
        for index in 1..self.items.len() {
            let parent = (index - 1) / 2;
            assert!(
                self.property.in_order(&self.items[parent], &self.items[index]),
                "heap property violated between indices {parent} and {index}"
            );
        }
    }
}

impl<T: Ord> MinHeap<T> {
    /// Creates an empty min-heap with the given capacity.
    pub fn try_min(capacity: usize) -> Result<Self, ConfigError> {
        Self::try_new(capacity, MinFirst)
    }
}

impl<T: Ord> MaxHeap<T> {
    /// Creates an empty max-heap with the given capacity.
    pub fn try_max(capacity: usize) -> Result<Self, ConfigError> {
        Self::try_new(capacity, MaxFirst)
    }
}

impl<T, K: Ord, F: Fn(&T) -> K> FixedHeap<T, MinByKey<F>> {
    /// Creates an empty heap ordered by the smallest extracted key.
    pub fn try_min_by_key(capacity: usize, key: F) -> Result<Self, ConfigError> {
        Self::try_new(capacity, MinByKey(key))
    }
}

impl<T, K: Ord, F: Fn(&T) -> K> FixedHeap<T, MaxByKey<F>> {
    /// Creates an empty heap ordered by the largest extracted key.
    pub fn try_max_by_key(capacity: usize, key: F) -> Result<Self, ConfigError> {
        Self::try_new(capacity, MaxByKey(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T, P: HeapProperty<T>>(heap: &mut FixedHeap<T, P>) -> Vec<T> {
        let mut out = Vec::new();
        while let Ok(value) = heap.pop() {
            out.push(value);
        }
        out
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(MinHeap::<u64>::try_min(0).is_err());
        assert!(MaxHeap::<u64>::try_max(0).is_err());
        let err = FixedHeap::<u64, _>::try_new(0, MinFirst).unwrap_err();
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn min_heap_pops_ascending() {
        let mut heap = MinHeap::try_min(16).unwrap();
        for value in [7, 1, 9, 3, 5, 2, 8] {
            heap.insert(value).unwrap();
            heap.debug_validate_invariants();
        }
        assert_eq!(drain(&mut heap), vec![1, 2, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn max_heap_pops_descending() {
        let mut heap = MaxHeap::try_max(16).unwrap();
        for value in [7, 1, 9, 3, 5, 2, 8] {
            heap.insert(value).unwrap();
        }
        assert_eq!(drain(&mut heap), vec![9, 8, 7, 5, 3, 2, 1]);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut heap = MinHeap::try_min(8).unwrap();
        for value in [4, 4, 1, 4] {
            heap.insert(value).unwrap();
        }
        assert_eq!(drain(&mut heap), vec![1, 4, 4, 4]);
    }

    #[test]
    fn append_defers_heapify_until_needed() {
        let mut heap = MinHeap::try_min(16).unwrap();
        for value in [9, 2, 7, 1, 8] {
            heap.append(value).unwrap();
        }
        assert!(!heap.is_heapified());
        assert_eq!(heap.len(), 5);

        // First ordered operation flushes the pending heapify.
        assert_eq!(heap.pop(), Ok(1));
        assert!(heap.is_heapified());
        assert_eq!(drain(&mut heap), vec![2, 7, 8, 9]);
    }

    #[test]
    fn append_then_insert_agree_with_pure_insert() {
        let values = [13, 4, 21, 4, 8, 1, 17, 2];

        let mut mixed = MinHeap::try_min(16).unwrap();
        for value in &values[..4] {
            mixed.append(*value).unwrap();
        }
        for value in &values[4..] {
            mixed.insert(*value).unwrap();
        }

        let mut pure = MinHeap::try_min(16).unwrap();
        for value in values {
            pure.insert(value).unwrap();
        }

        assert_eq!(drain(&mut mixed), drain(&mut pure));
    }

    #[test]
    fn single_append_stays_heapified() {
        let mut heap = MinHeap::try_min(4).unwrap();
        heap.append(1).unwrap();
        assert!(heap.is_heapified());
    }

    #[test]
    fn full_heap_rejects_insert_and_append() {
        let mut heap = MinHeap::try_min(2).unwrap();
        heap.insert(1).unwrap();
        heap.insert(2).unwrap();

        assert_eq!(heap.insert(3), Err(HeapError::Full { capacity: 2 }));
        assert_eq!(heap.append(3), Err(HeapError::Full { capacity: 2 }));
        assert_eq!(heap.len(), 2);
        // Contents untouched by the failed inserts.
        assert_eq!(drain(&mut heap), vec![1, 2]);
    }

    #[test]
    fn empty_heap_rejects_pop_peek_displace() {
        let mut heap = MinHeap::<u32>::try_min(4).unwrap();
        assert_eq!(heap.pop(), Err(HeapError::Empty));
        assert_eq!(heap.peek(), Err(HeapError::Empty));
        assert_eq!(heap.displace(1), Err(HeapError::Empty));
    }

    #[test]
    fn displace_replaces_root_in_one_step() {
        let mut heap = MinHeap::try_min(8).unwrap();
        for value in [2, 5, 9] {
            heap.insert(value).unwrap();
        }
        assert_eq!(heap.displace(7), Ok(2));
        assert_eq!(drain(&mut heap), vec![5, 7, 9]);
    }

    #[test]
    fn displace_on_singleton() {
        let mut heap = MinHeap::try_min(4).unwrap();
        heap.insert(3).unwrap();
        assert_eq!(heap.displace(10), Ok(3));
        assert_eq!(heap.peek(), Ok(&10));
    }

    #[test]
    fn peek_flushes_pending_heapify() {
        let mut heap = MinHeap::try_min(8).unwrap();
        heap.append(5).unwrap();
        heap.append(1).unwrap();
        assert!(!heap.is_heapified());
        assert_eq!(heap.peek(), Ok(&1));
        assert!(heap.is_heapified());
    }

    #[test]
    fn clear_resets_but_keeps_capacity() {
        let mut heap = MinHeap::try_min(4).unwrap();
        heap.append(2).unwrap();
        heap.append(1).unwrap();
        heap.clear();

        assert!(heap.is_empty());
        assert!(heap.is_heapified());
        assert_eq!(heap.capacity(), 4);
        heap.insert(9).unwrap();
        assert_eq!(heap.pop(), Ok(9));
    }

    #[test]
    fn by_key_orders_on_extracted_field() {
        #[derive(Debug, PartialEq)]
        struct Task {
            priority: u8,
            name: &'static str,
        }

        let mut heap =
            FixedHeap::try_min_by_key(8, |task: &Task| task.priority).unwrap();
        heap.insert(Task { priority: 3, name: "c" }).unwrap();
        heap.insert(Task { priority: 1, name: "a" }).unwrap();
        heap.insert(Task { priority: 2, name: "b" }).unwrap();

        assert_eq!(heap.pop().map(|task| task.name), Ok("a"));
        assert_eq!(heap.pop().map(|task| task.name), Ok("b"));
        assert_eq!(heap.pop().map(|task| task.name), Ok("c"));
    }

    #[test]
    fn max_by_key_orders_descending() {
        let mut heap = FixedHeap::try_max_by_key(8, |s: &&str| s.len()).unwrap();
        for word in ["hi", "longest", "mid"] {
            heap.insert(word).unwrap();
        }
        assert_eq!(heap.pop(), Ok("longest"));
        assert_eq!(heap.pop(), Ok("mid"));
        assert_eq!(heap.pop(), Ok("hi"));
    }

    #[test]
    fn iter_sees_all_elements() {
        let mut heap = MinHeap::try_min(8).unwrap();
        for value in [3, 1, 2] {
            heap.append(value).unwrap();
        }
        let mut seen: Vec<_> = heap.iter().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3]);
        assert!(heap.is_heapified());
    }

    #[test]
    fn bulk_random_drain_is_sorted() {
        let mut heap = MinHeap::try_min(256).unwrap();
        let mut expected = Vec::new();
        let mut state = 0x2545F4914F6CDD1Du64;
        for _ in 0..200 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let value = (state % 1000) as u32;
            heap.append(value).unwrap();
            expected.push(value);
        }
        expected.sort_unstable();
        assert_eq!(drain(&mut heap), expected);
    }
}
