//! # Pooled Linked List
//!
//! A doubly linked list whose nodes are never handed back to the allocator
//! while the list is alive. Removing a node resets its value to
//! `T::default()` and parks the storage in a FIFO free pool; the next
//! insertion dequeues the oldest pooled node instead of allocating.
//!
//! Nodes live in an arena and are linked by slot index, so there are no
//! ownership cycles between neighbours. Callers address nodes through
//! [`NodeHandle`]s, which carry the owning list's id and a generation stamp:
//! a handle from another list, or one whose node has been removed, is
//! rejected with [`ListError::InvalidHandle`] instead of corrupting the chain.
//!
//! ## Example
//! ```rust
//! use pooled_list::PooledList;
//!
//! let mut list = PooledList::new();
//! let b = list.add_last("b");
//! list.add_before(b, "a").unwrap();
//! list.add_after(b, "c").unwrap();
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
//!
//! list.remove(b).unwrap();
//! assert_eq!(list.pooled_count(), 1);
//! ```

mod error;
mod iter;

use std::collections::VecDeque;
use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

pub use error::{HandleFault, ListError};
pub use iter::{Entries, Iter};

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

/// Non-owning reference to a node of a [`PooledList`].
///
/// Only meaningful for the list that issued it, and only until the node is
/// removed. Handles are plain values; holding one does not keep anything alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    list: u64,
    slot: usize,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    /// Linked into the sequence.
    Live,
    /// Unlinked by [`PooledList::detach`], value kept, handle still valid.
    Detached,
    /// Parked in the free pool.
    Pooled,
}

struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
    generation: u64,
    state: NodeState,
}

/// Doubly linked list with node recycling.
pub struct PooledList<T> {
    id: u64,
    /// Nodes are boxed so a slot emptied by [`PooledList::clear_pool`] shrinks
    /// to a null pointer and the node storage itself is freed.
    slots: Vec<Option<Box<Node<T>>>>,
    pub(crate) head: Option<usize>,
    pub(crate) tail: Option<usize>,
    pub(crate) len: usize,
    pool: VecDeque<usize>,
    vacant: Vec<usize>,
    allocations: usize,
    next_generation: u64,
}

impl<T> PooledList<T> {
    /// Creates an empty list with an empty pool.
    pub fn new() -> Self {
        Self {
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            pool: VecDeque::new(),
            vacant: Vec::new(),
            allocations: 0,
            next_generation: 1,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes waiting in the free pool.
    pub fn pooled_count(&self) -> usize {
        self.pool.len()
    }

    /// How many node allocations this list has performed over its lifetime.
    /// Insertions served from the pool do not count.
    pub fn allocation_count(&self) -> usize {
        self.allocations
    }

    /// Handle of the head node.
    pub fn first(&self) -> Option<NodeHandle> {
        self.head.map(|slot| self.handle(slot))
    }

    /// Handle of the tail node.
    pub fn last(&self) -> Option<NodeHandle> {
        self.tail.map(|slot| self.handle(slot))
    }

    pub fn front(&self) -> Option<&T> {
        self.head.map(|slot| &self.node(slot).value)
    }

    pub fn back(&self) -> Option<&T> {
        self.tail.map(|slot| &self.node(slot).value)
    }

    /// Returns true if `handle` refers to a node currently linked into this list.
    pub fn is_live(&self, handle: NodeHandle) -> bool {
        self.resolve_live(handle).is_ok()
    }

    /// Value stored in a live or detached node.
    pub fn get(&self, handle: NodeHandle) -> Result<&T, ListError> {
        let slot = self.resolve(handle)?;
        Ok(&self.node(slot).value)
    }

    /// Mutable access to a live or detached node. Changing the value never
    /// moves the node.
    pub fn get_mut(&mut self, handle: NodeHandle) -> Result<&mut T, ListError> {
        let slot = self.resolve(handle)?;
        Ok(&mut self.node_mut(slot).value)
    }

    /// Handle of the node after `handle`, or `None` at the tail.
    pub fn next(&self, handle: NodeHandle) -> Result<Option<NodeHandle>, ListError> {
        let slot = self.resolve_live(handle)?;
        Ok(self.node(slot).next.map(|next| self.handle(next)))
    }

    /// Handle of the node before `handle`, or `None` at the head.
    pub fn prev(&self, handle: NodeHandle) -> Result<Option<NodeHandle>, ListError> {
        let slot = self.resolve_live(handle)?;
        Ok(self.node(slot).prev.map(|prev| self.handle(prev)))
    }

    /// Iterates live values from head to tail. Use `.rev()` for tail to head.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Like [`iter`](Self::iter), but also yields each node's handle.
    pub fn entries(&self) -> Entries<'_, T> {
        Entries::new(self)
    }

    /// Visits every live value from head to tail with mutable access.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        let mut current = self.head;
        while let Some(slot) = current {
            let node = self.node_mut(slot);
            f(&mut node.value);
            current = node.next;
        }
    }

    /// Moves a detached node to the front of the sequence.
    pub fn insert_existing_node_first(&mut self, node: NodeHandle) -> Result<(), ListError> {
        let slot = self.resolve_detached(node)?;
        self.link_first(slot);
        Ok(())
    }

    /// Moves a detached node to the back of the sequence.
    pub fn insert_existing_node_last(&mut self, node: NodeHandle) -> Result<(), ListError> {
        let slot = self.resolve_detached(node)?;
        self.link_last(slot);
        Ok(())
    }

    /// Links a detached node immediately before `anchor`.
    pub fn insert_existing_node_before(
        &mut self,
        anchor: NodeHandle,
        node: NodeHandle,
    ) -> Result<(), ListError> {
        let slot = self.resolve_detached(node)?;
        let anchor = self.resolve_live(anchor)?;
        self.link_before(anchor, slot);
        Ok(())
    }

    /// Links a detached node immediately after `anchor`.
    pub fn insert_existing_node_after(
        &mut self,
        anchor: NodeHandle,
        node: NodeHandle,
    ) -> Result<(), ListError> {
        let slot = self.resolve_detached(node)?;
        let anchor = self.resolve_live(anchor)?;
        self.link_after(anchor, slot);
        Ok(())
    }

    /// Unlinks a live node but keeps it (and its value) owned by the caller's
    /// handle, ready for one of the `insert_existing_node_*` calls or
    /// [`remove`](PooledList::remove).
    pub fn detach(&mut self, handle: NodeHandle) -> Result<(), ListError> {
        let slot = self.resolve_live(handle)?;
        self.unlink(slot);
        Ok(())
    }

    pub(crate) fn handle(&self, slot: usize) -> NodeHandle {
        NodeHandle {
            list: self.id,
            slot,
            generation: self.node(slot).generation,
        }
    }

    pub(crate) fn node(&self, slot: usize) -> &Node<T> {
        self.slots[slot]
            .as_deref()
            .expect("linked slot always holds a node")
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node<T> {
        self.slots[slot]
            .as_deref_mut()
            .expect("linked slot always holds a node")
    }

    /// Accepts live and detached nodes.
    fn resolve(&self, handle: NodeHandle) -> Result<usize, ListError> {
        if handle.list != self.id {
            return Err(ListError::invalid(handle, HandleFault::ForeignList));
        }
        match self.slots.get(handle.slot) {
            Some(Some(node))
                if node.generation == handle.generation && node.state != NodeState::Pooled =>
            {
                Ok(handle.slot)
            }
            _ => Err(ListError::invalid(handle, HandleFault::Stale)),
        }
    }

    fn resolve_live(&self, handle: NodeHandle) -> Result<usize, ListError> {
        let slot = self.resolve(handle)?;
        match self.node(slot).state {
            NodeState::Live => Ok(slot),
            _ => Err(ListError::invalid(handle, HandleFault::NotLinked)),
        }
    }

    fn resolve_detached(&self, handle: NodeHandle) -> Result<usize, ListError> {
        let slot = self.resolve(handle)?;
        match self.node(slot).state {
            NodeState::Detached => Ok(slot),
            _ => Err(ListError::invalid(handle, HandleFault::AlreadyLinked)),
        }
    }

    fn find_slot(&self, mut matches: impl FnMut(&T) -> bool) -> Option<usize> {
        let mut current = self.head;
        while let Some(slot) = current {
            let node = self.node(slot);
            if matches(&node.value) {
                return Some(slot);
            }
            current = node.next;
        }
        None
    }

    fn rfind_slot(&self, mut matches: impl FnMut(&T) -> bool) -> Option<usize> {
        let mut current = self.tail;
        while let Some(slot) = current {
            let node = self.node(slot);
            if matches(&node.value) {
                return Some(slot);
            }
            current = node.prev;
        }
        None
    }

    fn link_first(&mut self, slot: usize) {
        let old_head = self.head;
        let node = self.node_mut(slot);
        node.prev = None;
        node.next = old_head;
        node.state = NodeState::Live;
        match old_head {
            Some(head) => self.node_mut(head).prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
        self.len += 1;
    }

    fn link_last(&mut self, slot: usize) {
        let old_tail = self.tail;
        let node = self.node_mut(slot);
        node.prev = old_tail;
        node.next = None;
        node.state = NodeState::Live;
        match old_tail {
            Some(tail) => self.node_mut(tail).next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
    }

    fn link_before(&mut self, anchor: usize, slot: usize) {
        let prev = self.node(anchor).prev;
        let node = self.node_mut(slot);
        node.prev = prev;
        node.next = Some(anchor);
        node.state = NodeState::Live;
        self.node_mut(anchor).prev = Some(slot);
        match prev {
            Some(prev) => self.node_mut(prev).next = Some(slot),
            None => self.head = Some(slot),
        }
        self.len += 1;
    }

    fn link_after(&mut self, anchor: usize, slot: usize) {
        let next = self.node(anchor).next;
        let node = self.node_mut(slot);
        node.prev = Some(anchor);
        node.next = next;
        node.state = NodeState::Live;
        self.node_mut(anchor).next = Some(slot);
        match next {
            Some(next) => self.node_mut(next).prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.len += 1;
    }

    fn unlink(&mut self, slot: usize) {
        let node = self.node_mut(slot);
        let prev = node.prev.take();
        let next = node.next.take();
        node.state = NodeState::Detached;
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
        self.len -= 1;
    }

    fn bump_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }
}

impl<T: Default> PooledList<T> {
    /// Creates an empty list whose pool already holds `capacity` nodes.
    pub fn with_pool_capacity(capacity: usize) -> Self {
        let mut list = Self::new();
        list.reserve_pool(capacity);
        list
    }

    /// Allocates nodes into the pool until it holds at least `capacity`.
    pub fn reserve_pool(&mut self, capacity: usize) {
        let missing = capacity.saturating_sub(self.pool.len());
        for _ in 0..missing {
            let slot = self.allocate(T::default(), 0, NodeState::Pooled);
            self.pool.push_back(slot);
        }
        if missing > 0 {
            tracing::debug!("Pre-warmed list pool with {} nodes", missing);
        }
    }

    pub fn add_first(&mut self, value: T) -> NodeHandle {
        let slot = self.acquire(value);
        self.link_first(slot);
        self.handle(slot)
    }

    pub fn add_last(&mut self, value: T) -> NodeHandle {
        let slot = self.acquire(value);
        self.link_last(slot);
        self.handle(slot)
    }

    /// Inserts `value` immediately before the live node `anchor`.
    pub fn add_before(&mut self, anchor: NodeHandle, value: T) -> Result<NodeHandle, ListError> {
        let anchor = self.resolve_live(anchor)?;
        let slot = self.acquire(value);
        self.link_before(anchor, slot);
        Ok(self.handle(slot))
    }

    /// Inserts `value` immediately after the live node `anchor`.
    pub fn add_after(&mut self, anchor: NodeHandle, value: T) -> Result<NodeHandle, ListError> {
        let anchor = self.resolve_live(anchor)?;
        let slot = self.acquire(value);
        self.link_after(anchor, slot);
        Ok(self.handle(slot))
    }

    /// Removes a live or detached node, returning its value. The node's
    /// storage goes to the pool and `handle` becomes stale.
    pub fn remove(&mut self, handle: NodeHandle) -> Result<T, ListError> {
        let slot = self.resolve(handle)?;
        if self.node(slot).state == NodeState::Live {
            self.unlink(slot);
        }
        Ok(self.release(slot))
    }

    pub fn remove_first(&mut self) -> Result<T, ListError> {
        let slot = self.head.ok_or(ListError::EmptyList)?;
        self.unlink(slot);
        Ok(self.release(slot))
    }

    pub fn remove_last(&mut self) -> Result<T, ListError> {
        let slot = self.tail.ok_or(ListError::EmptyList)?;
        self.unlink(slot);
        Ok(self.release(slot))
    }

    /// Returns every live node to the pool. The pool itself is kept, so the
    /// next insertions reuse this storage.
    pub fn clear(&mut self) {
        let mut current = self.head;
        while let Some(slot) = current {
            current = self.node(slot).next;
            self.release(slot);
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Frees the storage of every pooled node. Live nodes are untouched.
    ///
    /// A freed slot that sits before a live node stays in the arena as an
    /// empty pointer-sized entry and is handed out by the next allocation.
    pub fn clear_pool(&mut self) {
        let dropped = self.pool.len();
        for slot in self.pool.drain(..) {
            self.slots[slot] = None;
            self.vacant.push(slot);
        }
        while let Some(None) = self.slots.last() {
            self.slots.pop();
        }
        let len = self.slots.len();
        self.vacant.retain(|&slot| slot < len);
        self.slots.shrink_to_fit();
        self.pool.shrink_to_fit();
        tracing::debug!("Dropped {} pooled list nodes", dropped);
    }

    fn acquire(&mut self, value: T) -> usize {
        let generation = self.bump_generation();
        if let Some(slot) = self.pool.pop_front() {
            let node = self.node_mut(slot);
            node.value = value;
            node.generation = generation;
            node.state = NodeState::Detached;
            tracing::trace!(slot, "Reusing pooled list node");
            return slot;
        }
        self.allocate(value, generation, NodeState::Detached)
    }

    fn allocate(&mut self, value: T, generation: u64, state: NodeState) -> usize {
        let node = Box::new(Node {
            value,
            prev: None,
            next: None,
            generation,
            state,
        });
        self.allocations += 1;
        match self.vacant.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, slot: usize) -> T {
        let node = self.node_mut(slot);
        let value = mem::take(&mut node.value);
        node.prev = None;
        node.next = None;
        node.state = NodeState::Pooled;
        self.pool.push_back(slot);
        value
    }
}

impl<T: PartialEq> PooledList<T> {
    /// First live node (from the head) equal to `value`.
    pub fn find(&self, value: &T) -> Option<NodeHandle> {
        self.find_slot(|candidate| candidate == value)
            .map(|slot| self.handle(slot))
    }

    /// Last live node (searching from the tail) equal to `value`.
    pub fn find_last(&self, value: &T) -> Option<NodeHandle> {
        self.rfind_slot(|candidate| candidate == value)
            .map(|slot| self.handle(slot))
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find_slot(|candidate| candidate == value).is_some()
    }
}

impl<T: PartialEq + Default> PooledList<T> {
    /// Removes the first live node equal to `value`. Returns false if there is none.
    pub fn remove_by_value(&mut self, value: &T) -> bool {
        match self.find_slot(|candidate| candidate == value) {
            Some(slot) => {
                self.unlink(slot);
                self.release(slot);
                true
            }
            None => false,
        }
    }
}

impl<T> Default for PooledList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for PooledList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Default> Extend<T> for PooledList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add_last(value);
        }
    }
}

impl<T: Default> FromIterator<T> for PooledList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}
