//! Doubly linked deque with stable node handles and O(1) arbitrary-node
//! removal.
//!
//! Nodes live in a slot vector owned by the deque and are linked by index,
//! so handles stay valid across unrelated mutations and no pointer chasing
//! or unsafe code is needed.
//!
//! ## Architecture
//!
//! ```text
//!   slots (Vec<Slot<T>>)
//!   ┌───────┬──────────────────────────────────────────────────────┐
//!   │ index │ Slot { generation, node: { value, prev, next } }     │
//!   ├───────┼──────────────────────────────────────────────────────┤
//!   │   0   │ gen 0, { value: A, prev: None, next: Some(1) }       │
//!   │   1   │ gen 0, { value: B, prev: Some(0), next: Some(2) }    │
//!   │   2   │ gen 0, { value: C, prev: Some(1), next: None }       │
//!   └───────┴──────────────────────────────────────────────────────┘
//!
//!   head ─► [0] ◄──► [1] ◄──► [2] ◄── tail
//! ```
//!
//! A [`NodeId`] carries the owning deque's instance id plus the slot's
//! generation, so three failure modes are all caught in O(1) and reported
//! as [`StructError::NotOwned`]:
//!
//! - a handle issued by a *different* deque (instance id mismatch),
//! - a handle to a node that was *removed* (generation mismatch after the
//!   slot is recycled, or out-of-range after `clear`),
//! - a handle to a node that was *unlinked* but is passed to an operation
//!   that requires a linked node.
//!
//! ## Operations
//!
//! | Operation                        | Complexity |
//! |----------------------------------|------------|
//! | `push_front` / `push_back`       | O(1)       |
//! | `pop_front` / `pop_back`         | O(1)       |
//! | `remove` / `unlink`              | O(1)       |
//! | `insert_before` / `insert_after` | O(1)       |
//! | `move_to_front` / `move_to_back` | O(1)       |
//! | `iter` / `iter_ids`              | O(n)       |
//!
//! Iterators observe the live structure; do not mutate the deque while an
//! iteration over it is in progress (the borrow checker enforces this for
//! the borrowing iterators).
//!
//! `debug_validate_invariants()` is available in debug/test builds.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::StructError;

/// Process-wide source of deque instance ids. `clear()` also draws a fresh
/// id, which invalidates every outstanding handle without touching slots.
static NEXT_DEQUE_ID: AtomicU64 = AtomicU64::new(1);

fn fresh_deque_id() -> u64 {
    NEXT_DEQUE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Opaque handle to a node within a [`Deque`].
///
/// Handles are cheap to copy and remain valid until the node is removed or
/// the deque is cleared. Using a handle with the wrong deque, or after its
/// node has been removed, fails with [`StructError::NotOwned`]; it never
/// silently touches another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    owner: u64,
    index: usize,
    generation: u64,
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
    linked: bool,
}

#[derive(Debug)]
struct Slot<T> {
    node: Option<Node<T>>,
    generation: u64,
}

/// Doubly linked deque with O(1) arbitrary-node deletion and relocation.
///
/// # Example
///
/// ```
/// use datakit::ds::Deque;
///
/// let mut deque = Deque::new();
/// let a = deque.push_back("a");
/// let b = deque.push_back("b");
/// deque.push_back("c");
///
/// deque.remove(b).unwrap();
/// deque.move_to_back(a).unwrap();
///
/// let order: Vec<_> = deque.iter().copied().collect();
/// assert_eq!(order, vec!["c", "a"]);
/// ```
#[derive(Debug)]
pub struct Deque<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
    id: u64,
}

impl<T> Deque<T> {
    /// Creates an empty deque.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            id: fresh_deque_id(),
        }
    }

    /// Creates an empty deque with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            id: fresh_deque_id(),
        }
    }

    /// Returns the number of linked nodes.
    ///
    /// This is the full-width accessor; see [`count`](Self::count) for the
    /// checked 32-bit variant.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of linked nodes as a `u32`.
    ///
    /// Fails with [`StructError::CountOverflow`] instead of truncating when
    /// the length does not fit.
    pub fn count(&self) -> Result<u32, StructError> {
        u32::try_from(self.len).map_err(|_| StructError::CountOverflow { len: self.len })
    }

    /// Returns `true` if the deque has no linked nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `id` refers to a linked node of this deque.
    pub fn contains(&self, id: NodeId) -> bool {
        self.resolve_linked(id).is_ok()
    }

    /// Returns the value at the head, or [`StructError::Empty`].
    pub fn front(&self) -> Result<&T, StructError> {
        self.head
            .and_then(|index| self.node(index))
            .map(|node| &node.value)
            .ok_or(StructError::Empty)
    }

    /// Returns the value at the tail, or [`StructError::Empty`].
    pub fn back(&self) -> Result<&T, StructError> {
        self.tail
            .and_then(|index| self.node(index))
            .map(|node| &node.value)
            .ok_or(StructError::Empty)
    }

    /// Returns the handle of the head node, if any.
    pub fn front_id(&self) -> Option<NodeId> {
        self.head.map(|index| self.handle(index))
    }

    /// Returns the handle of the tail node, if any.
    pub fn back_id(&self) -> Option<NodeId> {
        self.tail.map(|index| self.handle(index))
    }

    /// Returns the value for a handle, linked or unlinked.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.resolve(id).ok().and_then(|index| self.node(index)).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value for a handle.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let index = self.resolve(id).ok()?;
        self.node_mut(index).map(|node| &mut node.value)
    }

    /// Appends a value at the tail and returns its handle.
    pub fn push_back(&mut self, value: T) -> NodeId {
        let index = self.alloc(value);
        self.attach_back(index);
        self.handle(index)
    }

    /// Inserts a value at the head and returns its handle.
    pub fn push_front(&mut self, value: T) -> NodeId {
        let index = self.alloc(value);
        self.attach_front(index);
        self.handle(index)
    }

    /// Removes and returns the head value, or [`StructError::Empty`].
    pub fn pop_front(&mut self) -> Result<T, StructError> {
        let index = self.head.ok_or(StructError::Empty)?;
        self.detach(index);
        self.release(index).ok_or(StructError::Empty)
    }

    /// Removes and returns the tail value, or [`StructError::Empty`].
    pub fn pop_back(&mut self) -> Result<T, StructError> {
        let index = self.tail.ok_or(StructError::Empty)?;
        self.detach(index);
        self.release(index).ok_or(StructError::Empty)
    }

    /// Removes the node `id` wherever it sits and returns its value.
    ///
    /// Works on linked and unlinked nodes; the handle becomes permanently
    /// invalid. Fails with [`StructError::NotOwned`] when the handle is
    /// stale or belongs to another deque.
    pub fn remove(&mut self, id: NodeId) -> Result<T, StructError> {
        let index = self.resolve(id)?;
        if self.node(index).map(|node| node.linked).unwrap_or(false) {
            self.detach(index);
        }
        self.release(index).ok_or(StructError::NotOwned)
    }

    /// Unlinks the node `id` from the chain while keeping its slot and
    /// value alive, so it can be re-attached with
    /// [`link_front`](Self::link_front) or [`link_back`](Self::link_back).
    ///
    /// Fails with [`StructError::NotOwned`] if the node is not currently
    /// linked into this deque.
    pub fn unlink(&mut self, id: NodeId) -> Result<(), StructError> {
        let index = self.resolve_linked(id)?;
        self.detach(index);
        Ok(())
    }

    /// Attaches a previously unlinked node as the new head.
    ///
    /// Fails with [`StructError::AlreadyLinked`] if the node is still
    /// linked, preventing double insertion.
    pub fn link_front(&mut self, id: NodeId) -> Result<(), StructError> {
        let index = self.resolve_unlinked(id)?;
        self.attach_front(index);
        Ok(())
    }

    /// Attaches a previously unlinked node as the new tail.
    ///
    /// Fails with [`StructError::AlreadyLinked`] if the node is still
    /// linked.
    pub fn link_back(&mut self, id: NodeId) -> Result<(), StructError> {
        let index = self.resolve_unlinked(id)?;
        self.attach_back(index);
        Ok(())
    }

    /// Inserts a value immediately before the node `anchor`.
    pub fn insert_before(&mut self, anchor: NodeId, value: T) -> Result<NodeId, StructError> {
        let at = self.resolve_linked(anchor)?;
        let index = self.alloc(value);
        let prev = self.node(at).and_then(|node| node.prev);
        self.splice(index, prev, Some(at));
        Ok(self.handle(index))
    }

    /// Inserts a value immediately after the node `anchor`.
    pub fn insert_after(&mut self, anchor: NodeId, value: T) -> Result<NodeId, StructError> {
        let at = self.resolve_linked(anchor)?;
        let index = self.alloc(value);
        let next = self.node(at).and_then(|node| node.next);
        self.splice(index, Some(at), next);
        Ok(self.handle(index))
    }

    /// Relocates an already-linked node to the head. No-op if the node is
    /// the head already.
    pub fn move_to_front(&mut self, id: NodeId) -> Result<(), StructError> {
        let index = self.resolve_linked(id)?;
        if self.head == Some(index) {
            return Ok(());
        }
        self.detach(index);
        self.attach_front(index);
        Ok(())
    }

    /// Relocates an already-linked node to the tail. No-op if the node is
    /// the tail already.
    pub fn move_to_back(&mut self, id: NodeId) -> Result<(), StructError> {
        let index = self.resolve_linked(id)?;
        if self.tail == Some(index) {
            return Ok(());
        }
        self.detach(index);
        self.attach_back(index);
        Ok(())
    }

    /// Drops every node and resets the deque.
    ///
    /// All outstanding handles become invalid: the deque draws a fresh
    /// instance id, so no per-node bookkeeping is required.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
        self.id = fresh_deque_id();
    }

    /// Returns an iterator over values from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            deque: self,
            current: self.head,
        }
    }

    /// Returns an iterator over node handles from head to tail.
    pub fn iter_ids(&self) -> IdIter<'_, T> {
        IdIter {
            deque: self,
            current: self.head,
        }
    }

    #[cfg(any(test, debug_assertions))]
    /// Validates the link structure (debug/test builds only).
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.head.is_none(), self.tail.is_none());
        if self.head.is_none() {
            assert_eq!(self.len, 0);
            return;
        }

        let mut forward = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(index) = current {
            let node = self.node(index).expect("linked index must be occupied");
            assert!(node.linked);
            assert_eq!(node.prev, prev);
            prev = Some(index);
            current = node.next;
            forward += 1;
            assert!(forward <= self.len);
        }
        assert_eq!(prev, self.tail);
        assert_eq!(forward, self.len);

        let mut backward = 0usize;
        let mut current = self.tail;
        while let Some(index) = current {
            let node = self.node(index).expect("linked index must be occupied");
            current = node.prev;
            backward += 1;
        }
        assert_eq!(backward, self.len);
    }

    // -- slot management --------------------------------------------------

    fn handle(&self, index: usize) -> NodeId {
        NodeId {
            owner: self.id,
            index,
            generation: self.slots[index].generation,
        }
    }

    fn node(&self, index: usize) -> Option<&Node<T>> {
        self.slots.get(index).and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, index: usize) -> Option<&mut Node<T>> {
        self.slots.get_mut(index).and_then(|slot| slot.node.as_mut())
    }

    /// Maps a handle to a live slot index, rejecting foreign and stale
    /// handles.
    fn resolve(&self, id: NodeId) -> Result<usize, StructError> {
        if id.owner != self.id {
            return Err(StructError::NotOwned);
        }
        match self.slots.get(id.index) {
            Some(slot) if slot.generation == id.generation && slot.node.is_some() => Ok(id.index),
            _ => Err(StructError::NotOwned),
        }
    }

    fn resolve_linked(&self, id: NodeId) -> Result<usize, StructError> {
        let index = self.resolve(id)?;
        match self.node(index) {
            Some(node) if node.linked => Ok(index),
            _ => Err(StructError::NotOwned),
        }
    }

    fn resolve_unlinked(&self, id: NodeId) -> Result<usize, StructError> {
        let index = self.resolve(id)?;
        match self.node(index) {
            Some(node) if node.linked => Err(StructError::AlreadyLinked),
            Some(_) => Ok(index),
            None => Err(StructError::NotOwned),
        }
    }

    fn alloc(&mut self, value: T) -> usize {
        let node = Node {
            value,
            prev: None,
            next: None,
            linked: false,
        };
        if let Some(index) = self.free.pop() {
            self.slots[index].node = Some(node);
            index
        } else {
            self.slots.push(Slot {
                node: Some(node),
                generation: 0,
            });
            self.slots.len() - 1
        }
    }

    /// Frees a slot, bumping its generation so outstanding handles to it
    /// can never alias a recycled node.
    fn release(&mut self, index: usize) -> Option<T> {
        let slot = self.slots.get_mut(index)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        Some(node.value)
    }

    // -- link management --------------------------------------------------

    fn attach_front(&mut self, index: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(index) {
            node.prev = None;
            node.next = old_head;
            node.linked = true;
        }
        match old_head {
            Some(head) => {
                if let Some(head_node) = self.node_mut(head) {
                    head_node.prev = Some(index);
                }
            },
            None => self.tail = Some(index),
        }
        self.head = Some(index);
        self.len += 1;
    }

    fn attach_back(&mut self, index: usize) {
        let old_tail = self.tail;
        if let Some(node) = self.node_mut(index) {
            node.prev = old_tail;
            node.next = None;
            node.linked = true;
        }
        match old_tail {
            Some(tail) => {
                if let Some(tail_node) = self.node_mut(tail) {
                    tail_node.next = Some(index);
                }
            },
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;
    }

    /// Links `index` between `prev` and `next`, either of which may be an
    /// edge of the chain.
    fn splice(&mut self, index: usize, prev: Option<usize>, next: Option<usize>) {
        if let Some(node) = self.node_mut(index) {
            node.prev = prev;
            node.next = next;
            node.linked = true;
        }
        match prev {
            Some(prev_index) => {
                if let Some(prev_node) = self.node_mut(prev_index) {
                    prev_node.next = Some(index);
                }
            },
            None => self.head = Some(index),
        }
        match next {
            Some(next_index) => {
                if let Some(next_node) = self.node_mut(next_index) {
                    next_node.prev = Some(index);
                }
            },
            None => self.tail = Some(index),
        }
        self.len += 1;
    }

    fn detach(&mut self, index: usize) {
        let (prev, next, linked) = match self.node(index) {
            Some(node) => (node.prev, node.next, node.linked),
            None => return,
        };
        if !linked {
            return;
        }

        match prev {
            Some(prev_index) => {
                if let Some(prev_node) = self.node_mut(prev_index) {
                    prev_node.next = next;
                }
            },
            None => self.head = next,
        }
        match next {
            Some(next_index) => {
                if let Some(next_node) = self.node_mut(next_index) {
                    next_node.prev = prev;
                }
            },
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(index) {
            node.prev = None;
            node.next = None;
            node.linked = false;
        }
        self.len -= 1;
    }
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward iterator over values, head to tail.
pub struct Iter<'a, T> {
    deque: &'a Deque<T>,
    current: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.current?;
        let node = self.deque.node(index)?;
        self.current = node.next;
        Some(&node.value)
    }
}

/// Forward iterator over node handles, head to tail.
pub struct IdIter<'a, T> {
    deque: &'a Deque<T>,
    current: Option<usize>,
}

impl<'a, T> Iterator for IdIter<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.current?;
        let node = self.deque.node(index)?;
        self.current = node.next;
        Some(self.deque.handle(index))
    }
}
