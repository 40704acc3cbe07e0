//! Pipe backed by a doubly linked chain of nodes.
//!
//! # Implementation details
//! - **Node arena**: nodes live in a `Vec` and link to each other by [`IndexType`]
//!   handles. `next` gives the chain order head → tail; `prev` is a plain back-handle,
//!   so there is no ownership cycle and no unsafe code.
//! - **Free list**: removed nodes are threaded through their `next` field starting at
//!   `free_head` and reused by later inserts. The arena therefore never holds more
//!   than `capacity` nodes, and nothing is allocated before the first insert.
//! - **Incremental length**: `len` is adjusted on every insert and removal; it is
//!   never recomputed by walking the chain.

use core::iter::FusedIterator;

use tracing::{debug, trace};

use crate::error::{PipeError, Result};
use crate::pipe::{admit, impl_pipe_traits};
use crate::{IndexType, Pipe};

struct Node<E, I> {
    value: Option<E>,
    prev: I,
    next: I,
}

/// A pipe stored as a doubly linked chain in a node arena.
///
/// `I` is the node handle type; it bounds the capacity to
/// [`I::max_capacity()`](IndexType::max_capacity).
///
/// ```rust
/// use bounded_pipe::{LinkedPipe, Pipe};
///
/// let mut pipe: LinkedPipe<u64> = LinkedPipe::new(1_000_000).unwrap();
/// pipe.append(2).unwrap();
/// pipe.prepend(1).unwrap();
/// assert_eq!(pipe.to_string(), "[1, 2]:1000000");
/// ```
pub struct LinkedPipe<E, I: IndexType = u32> {
    nodes: Vec<Node<E, I>>,
    free_head: I,
    head: I,
    tail: I,
    len: usize,
    capacity: usize,
}

impl<E, I: IndexType> LinkedPipe<E, I> {
    /// Creates an empty pipe holding at most `capacity` elements.
    ///
    /// # Errors
    /// [`PipeError::InvalidArgument`] if `capacity` is zero or larger than the
    /// handle type `I` can address.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            debug!(capacity, "rejected linked pipe capacity");
            return Err(PipeError::InvalidArgument(
                "capacity must be greater than zero",
            ));
        }
        if capacity > I::max_capacity() {
            debug!(
                capacity,
                max = I::max_capacity(),
                "rejected linked pipe capacity"
            );
            return Err(PipeError::InvalidArgument(
                "capacity exceeds the node handle range",
            ));
        }
        Ok(Self::empty(capacity))
    }

    fn empty(capacity: usize) -> Self {
        Self {
            nodes: Vec::new(),
            free_head: I::NONE,
            head: I::NONE,
            tail: I::NONE,
            len: 0,
            capacity,
        }
    }

    /// Takes a node from the free list, or grows the arena, and fills it.
    fn alloc(&mut self, value: E, prev: I, next: I) -> I {
        let node = Node {
            value: Some(value),
            prev,
            next,
        };
        if self.free_head != I::NONE {
            let idx = self.free_head;
            let slot = &mut self.nodes[idx.as_usize()];
            self.free_head = slot.next;
            *slot = node;
            idx
        } else {
            let idx = I::from_usize(self.nodes.len());
            self.nodes.push(node);
            idx
        }
    }

    /// Returns a detached node to the free list and hands back its value.
    fn release(&mut self, idx: I) -> E {
        let slot = &mut self.nodes[idx.as_usize()];
        let value = slot.value.take();
        slot.prev = I::NONE;
        slot.next = self.free_head;
        self.free_head = idx;
        match value {
            Some(value) => value,
            None => unreachable!("Logic Error: linked node {idx:?} was already free"),
        }
    }

    #[inline(always)]
    fn value_at(&self, idx: I) -> Option<&E> {
        if idx == I::NONE {
            None
        } else {
            self.nodes[idx.as_usize()].value.as_ref()
        }
    }
}

impl<E, I: IndexType> Pipe<E> for LinkedPipe<E, I> {
    type Iter<'a>
        = Iter<'a, E, I>
    where
        E: 'a;

    #[inline(always)]
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.len
    }

    fn first(&self) -> Option<&E> {
        self.value_at(self.head)
    }

    fn last(&self) -> Option<&E> {
        self.value_at(self.tail)
    }

    fn prepend<V: Into<Option<E>>>(&mut self, element: V) -> Result<()> {
        let element = admit(&*self, element.into())?;
        let old_head = self.head;
        let idx = self.alloc(element, I::NONE, old_head);
        if old_head == I::NONE {
            self.tail = idx;
        } else {
            self.nodes[old_head.as_usize()].prev = idx;
        }
        self.head = idx;
        self.len += 1;
        Ok(())
    }

    fn append<V: Into<Option<E>>>(&mut self, element: V) -> Result<()> {
        let element = admit(&*self, element.into())?;
        let old_tail = self.tail;
        let idx = self.alloc(element, old_tail, I::NONE);
        if old_tail == I::NONE {
            self.head = idx;
        } else {
            self.nodes[old_tail.as_usize()].next = idx;
        }
        self.tail = idx;
        self.len += 1;
        Ok(())
    }

    fn remove_first(&mut self) -> Result<E> {
        if self.head == I::NONE {
            trace!("rejected remove_first on empty pipe");
            return Err(PipeError::EmptyContainer);
        }
        let idx = self.head;
        let next = self.nodes[idx.as_usize()].next;
        if next == I::NONE {
            // Sole element: both ends must be cleared.
            self.head = I::NONE;
            self.tail = I::NONE;
        } else {
            self.nodes[next.as_usize()].prev = I::NONE;
            self.head = next;
        }
        self.len -= 1;
        Ok(self.release(idx))
    }

    fn remove_last(&mut self) -> Result<E> {
        if self.tail == I::NONE {
            trace!("rejected remove_last on empty pipe");
            return Err(PipeError::EmptyContainer);
        }
        let idx = self.tail;
        let prev = self.nodes[idx.as_usize()].prev;
        if prev == I::NONE {
            self.head = I::NONE;
            self.tail = I::NONE;
        } else {
            self.nodes[prev.as_usize()].next = I::NONE;
            self.tail = prev;
        }
        self.len -= 1;
        Ok(self.release(idx))
    }

    fn clear(&mut self) {
        trace!(dropped = self.len, "cleared linked pipe");
        self.nodes.clear();
        self.free_head = I::NONE;
        self.head = I::NONE;
        self.tail = I::NONE;
        self.len = 0;
    }

    fn new_instance(&self) -> Self {
        Self::empty(self.capacity)
    }

    fn iter(&self) -> Iter<'_, E, I> {
        Iter {
            nodes: &self.nodes,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }
}

impl_pipe_traits!([I: IndexType] LinkedPipe<E, I>);

impl<'a, E, I: IndexType> IntoIterator for &'a LinkedPipe<E, I> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E, I>;

    fn into_iter(self) -> Iter<'a, E, I> {
        self.iter()
    }
}

/// Iterator over a [`LinkedPipe`], first to last.
pub struct Iter<'a, E, I> {
    nodes: &'a [Node<E, I>],
    front: I,
    back: I,
    remaining: usize,
}

impl<'a, E, I: IndexType> Iterator for Iter<'a, E, I> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.front.as_usize()];
        self.front = node.next;
        self.remaining -= 1;
        node.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<E, I: IndexType> DoubleEndedIterator for Iter<'_, E, I> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.back.as_usize()];
        self.back = node.prev;
        self.remaining -= 1;
        node.value.as_ref()
    }
}

impl<E, I: IndexType> ExactSizeIterator for Iter<'_, E, I> {}
impl<E, I: IndexType> FusedIterator for Iter<'_, E, I> {}
