//! FIFO queue with a hash index for O(1) membership tests and O(1)
//! removal by value.
//!
//! A plain queue answers "what is next?" cheaply but "is X enqueued?" and
//! "drop X from the middle" cost O(n). `HashQueue` pairs a [`Deque`] with
//! an `FxHashMap` from value to the node handles holding that value, so
//! all three are O(1).
//!
//! Duplicate values are allowed: each `enqueue` creates its own node, and
//! the index keeps the handles in arrival order, so [`remove`](HashQueue::remove)
//! always drops the *oldest* occurrence of a value.
//!
//! ```text
//!   queue:  head ─► "a" ◄──► "b" ◄──► "a" ◄── tail
//!   index:  "a" => [handle#0, handle#2]
//!           "b" => [handle#1]
//! ```

use std::collections::VecDeque;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::deque::{Deque, Iter, NodeId};
use crate::error::StructError;

/// FIFO queue with hash-indexed O(1) contains and remove-by-value.
///
/// # Example
///
/// ```
/// use datakit::ds::HashQueue;
///
/// let mut queue = HashQueue::new();
/// queue.enqueue("a");
/// queue.enqueue("b");
/// queue.enqueue("a");
///
/// assert!(queue.contains(&"b"));
/// assert_eq!(queue.remove(&"b"), Ok(true));
/// assert_eq!(queue.remove(&"b"), Ok(false));
///
/// // Duplicates dequeue in arrival order.
/// assert_eq!(queue.dequeue(), Ok("a"));
/// assert_eq!(queue.dequeue(), Ok("a"));
/// ```
#[derive(Debug)]
pub struct HashQueue<T>
where
    T: Eq + Hash + Clone,
{
    queue: Deque<T>,
    index: FxHashMap<T, VecDeque<NodeId>>,
}

impl<T> HashQueue<T>
where
    T: Eq + Hash + Clone,
{
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            queue: Deque::new(),
            index: FxHashMap::default(),
        }
    }

    /// Creates an empty queue with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: Deque::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Appends a value at the tail.
    pub fn enqueue(&mut self, value: T) {
        let id = self.queue.push_back(value.clone());
        self.index.entry(value).or_default().push_back(id);
    }

    /// Removes and returns the head value, or [`StructError::Empty`].
    pub fn dequeue(&mut self) -> Result<T, StructError> {
        let id = self.queue.front_id().ok_or(StructError::Empty)?;
        let value = self.queue.remove(id)?;
        self.drop_handle(&value, id);
        Ok(value)
    }

    /// Removes the oldest occurrence of `value` from anywhere in the queue.
    ///
    /// Returns `Ok(true)` if an occurrence was removed, `Ok(false)` if the
    /// value is not enqueued, and [`StructError::Empty`] when the queue has
    /// no elements at all.
    pub fn remove(&mut self, value: &T) -> Result<bool, StructError> {
        if self.queue.is_empty() {
            return Err(StructError::Empty);
        }
        let Some(handles) = self.index.get_mut(value) else {
            return Ok(false);
        };
        let Some(id) = handles.pop_front() else {
            self.index.remove(value);
            return Ok(false);
        };
        if handles.is_empty() {
            self.index.remove(value);
        }
        self.queue.remove(id)?;
        Ok(true)
    }

    /// Returns `true` if at least one occurrence of `value` is enqueued.
    pub fn contains(&self, value: &T) -> bool {
        self.index.contains_key(value)
    }

    /// Returns the value at the head, or [`StructError::Empty`].
    pub fn front(&self) -> Result<&T, StructError> {
        self.queue.front()
    }

    /// Returns the value at the tail, or [`StructError::Empty`].
    pub fn back(&self) -> Result<&T, StructError> {
        self.queue.back()
    }

    /// Returns the number of enqueued values (duplicates counted).
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns the number of enqueued values as a `u32`, failing with
    /// [`StructError::CountOverflow`] instead of truncating.
    pub fn count(&self) -> Result<u32, StructError> {
        self.queue.count()
    }

    /// Returns `true` if the queue has no elements.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops all elements.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.index.clear();
    }

    /// Returns an iterator over values from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        self.queue.iter()
    }

    fn drop_handle(&mut self, value: &T, id: NodeId) {
        if let Some(handles) = self.index.get_mut(value) {
            let popped = handles.pop_front();
            debug_assert_eq!(popped, Some(id));
            if handles.is_empty() {
                self.index.remove(value);
            }
        }
    }

    #[cfg(any(test, debug_assertions))]
    /// Validates index/queue agreement (debug/test builds only).
    pub fn debug_validate_invariants(&self) {
        self.queue.debug_validate_invariants();
        let indexed: usize = self.index.values().map(VecDeque::len).sum();
        assert_eq!(indexed, self.queue.len());
        for (value, handles) in &self.index {
            assert!(!handles.is_empty());
            for id in handles {
                assert!(self.queue.get(*id) == Some(value));
            }
        }
    }
}

impl<T> Default for HashQueue<T>
where
    T: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
