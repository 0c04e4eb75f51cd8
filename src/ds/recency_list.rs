//! Recency-ordered doubly linked list backed by [`SlotArena`].
//!
//! Nodes are linked by [`SlotId`] instead of pointers. Two sentinel nodes are
//! allocated first (slots 0 and 1) and live for the lifetime of the list, so
//! every live node always has a real `prev` and `next` and link surgery never
//! branches on "am I the first/last node".
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬──────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                   │
//!   ├────────┼──────────────────────────────────────────────┤
//!   │ 0      │ { None,     prev: -,    next: id_2 }  HEAD   │
//!   │ 1      │ { None,     prev: id_3, next: -    }  TAIL   │
//!   │ id_2   │ { Some(A),  prev: 0,    next: id_3 }         │
//!   │ id_3   │ { Some(B),  prev: id_2, next: 1    }         │
//!   └────────┴──────────────────────────────────────────────┘
//!
//!   HEAD ─► [A] ◄──► [B] ◄── TAIL
//!           LRU      MRU
//! ```
//!
//! ## Operations
//!
//! | Operation      | Time | Notes                                   |
//! |----------------|------|-----------------------------------------|
//! | `push_back`    | O(1) | New node becomes most-recently-used     |
//! | `remove`       | O(1) | Detach from anywhere + free the slot    |
//! | `move_to_back` | O(1) | Detach + reattach before the tail       |
//! | `front`/`back` | O(1) | Least / most recently used live node    |
//! | `clear`        | O(n) | Frees every live node, keeps sentinels  |

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Node<T> {
    prev: SlotId,
    next: SlotId,
    value: Option<T>,
}

impl<T> Node<T> {
    fn detached(value: Option<T>) -> Self {
        Self {
            prev: SlotId::DANGLING,
            next: SlotId::DANGLING,
            value,
        }
    }
}

/// Access-ordered list: head side is least recently used, tail side most.
#[derive(Debug)]
pub struct RecencyList<T> {
    arena: SlotArena<Node<T>>,
    head: SlotId,
    tail: SlotId,
}

impl<T> RecencyList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` live nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut arena = SlotArena::with_capacity(capacity + 2);
        let head = arena.insert(Node::detached(None));
        let tail = arena.insert(Node::detached(None));
        let mut list = Self { arena, head, tail };
        list.link_sentinels();
        list
    }

    /// Number of live (non-sentinel) nodes.
    pub fn len(&self) -> usize {
        self.arena.len() - 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `id` is a live node of this list.
    pub fn contains(&self, id: SlotId) -> bool {
        id != self.head && id != self.tail && self.arena.contains(id)
    }

    /// Handle of the least recently used node.
    pub fn front_id(&self) -> Option<SlotId> {
        let first = self.arena.get(self.head)?.next;
        (first != self.tail).then_some(first)
    }

    /// Handle of the most recently used node.
    pub fn back_id(&self) -> Option<SlotId> {
        let last = self.arena.get(self.tail)?.prev;
        (last != self.head).then_some(last)
    }

    /// Least recently used value.
    pub fn front(&self) -> Option<&T> {
        self.front_id().and_then(|id| self.get(id))
    }

    /// Most recently used value.
    pub fn back(&self) -> Option<&T> {
        self.back_id().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).and_then(|node| node.value.as_ref())
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).and_then(|node| node.value.as_mut())
    }

    /// Appends `value` as the most recently used node.
    pub fn push_back(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node::detached(Some(value)));
        self.attach_back(id);
        id
    }

    /// Detaches `id` and returns its value; `None` for stale ids and sentinels.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        self.detach(id)?;
        self.arena.remove(id).and_then(|node| node.value)
    }

    /// Removes and returns the least recently used value.
    #[cfg(test)]
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        let id = self.front_id()?;
        self.remove(id)
    }

    /// Removes and returns the most recently used value.
    #[cfg(test)]
    pub(crate) fn pop_back(&mut self) -> Option<T> {
        let id = self.back_id()?;
        self.remove(id)
    }

    /// Marks `id` as most recently used; returns `false` if `id` is not live.
    pub fn move_to_back(&mut self, id: SlotId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.back_id() == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_back(id);
        true
    }

    /// Frees every live node and relinks the sentinels.
    pub fn clear(&mut self) {
        let mut current = self.front_id();
        while let Some(id) = current {
            current = self
                .arena
                .remove(id)
                .map(|node| node.next)
                .filter(|&next| next != self.tail);
        }
        self.link_sentinels();
    }

    /// Iterates values from least to most recently used.
    pub fn iter(&self) -> RecencyIter<'_, T> {
        RecencyIter {
            list: self,
            current: self.front_id(),
        }
    }

    /// Iterates `(SlotId, &T)` from least to most recently used.
    pub fn iter_entries(&self) -> RecencyEntryIter<'_, T> {
        RecencyEntryIter {
            list: self,
            current: self.front_id(),
        }
    }

    /// Walks the chain in both directions and checks it against the arena.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut count = 0usize;
        let mut prev = self.head;
        let mut current = self
            .arena
            .get(self.head)
            .ok_or_else(|| InvariantError::new("recency list: head sentinel missing"))?
            .next;

        while current != self.tail {
            let node = self.arena.get(current).ok_or_else(|| {
                InvariantError::new(format!("recency list: stale link {:?}", current))
            })?;
            if node.prev != prev {
                return Err(InvariantError::new(format!(
                    "recency list: node {:?} has prev {:?}, expected {:?}",
                    current, node.prev, prev
                )));
            }
            if node.value.is_none() {
                return Err(InvariantError::new(format!(
                    "recency list: node {:?} holds no value",
                    current
                )));
            }
            count += 1;
            if count > self.len() {
                return Err(InvariantError::new("recency list: cycle detected"));
            }
            prev = current;
            current = node.next;
        }

        let tail_prev = self
            .arena
            .get(self.tail)
            .ok_or_else(|| InvariantError::new("recency list: tail sentinel missing"))?
            .prev;
        if tail_prev != prev {
            return Err(InvariantError::new(
                "recency list: tail sentinel does not point at last node",
            ));
        }
        if count != self.len() {
            return Err(InvariantError::new(format!(
                "recency list: walked {} nodes but len is {}",
                count,
                self.len()
            )));
        }
        Ok(())
    }

    fn link_sentinels(&mut self) {
        let (head, tail) = (self.head, self.tail);
        if let Some(node) = self.arena.get_mut(head) {
            node.next = tail;
        }
        if let Some(node) = self.arena.get_mut(tail) {
            node.prev = head;
        }
    }

    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };
        self.arena.get_mut(prev)?.next = next;
        self.arena.get_mut(next)?.prev = prev;

        let node = self.arena.get_mut(id)?;
        node.prev = SlotId::DANGLING;
        node.next = SlotId::DANGLING;
        Some(())
    }

    fn attach_back(&mut self, id: SlotId) -> Option<()> {
        let tail = self.tail;
        let last = self.arena.get(tail)?.prev;
        {
            let node = self.arena.get_mut(id)?;
            node.prev = last;
            node.next = tail;
        }
        self.arena.get_mut(last)?.next = id;
        self.arena.get_mut(tail)?.prev = id;
        Some(())
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over values from least to most recently used.
pub struct RecencyIter<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for RecencyIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = (node.next != self.list.tail).then_some(node.next);
        node.value.as_ref()
    }
}

/// Iterator over `(SlotId, &T)` pairs from least to most recently used.
pub struct RecencyEntryIter<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for RecencyEntryIter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = (node.next != self.list.tail).then_some(node.next);
        node.value.as_ref().map(|value| (id, value))
    }
}
