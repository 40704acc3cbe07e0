//! Pipe backed by a growable `VecDeque`.
//!
//! The simplest backing: every primitive maps onto one `VecDeque` call, which makes
//! it the reference the other backings are checked against.

use std::collections::{vec_deque, VecDeque};

use tracing::{debug, trace};

use crate::error::{PipeError, Result};
use crate::pipe::{admit, impl_pipe_traits};
use crate::Pipe;

/// A pipe whose storage is a `VecDeque` that grows on demand up to `capacity`.
pub struct ListPipe<E> {
    list: VecDeque<E>,
    capacity: usize,
}

impl<E> ListPipe<E> {
    /// Creates an empty pipe holding at most `capacity` elements.
    ///
    /// # Errors
    /// [`PipeError::InvalidArgument`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            debug!(capacity, "rejected list pipe capacity");
            return Err(PipeError::InvalidArgument(
                "capacity must be greater than zero",
            ));
        }
        Ok(Self::empty(capacity))
    }

    fn empty(capacity: usize) -> Self {
        Self {
            list: VecDeque::new(),
            capacity,
        }
    }
}

impl<E> Pipe<E> for ListPipe<E> {
    type Iter<'a>
        = vec_deque::Iter<'a, E>
    where
        E: 'a;

    #[inline(always)]
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.list.len()
    }

    fn first(&self) -> Option<&E> {
        self.list.front()
    }

    fn last(&self) -> Option<&E> {
        self.list.back()
    }

    fn prepend<V: Into<Option<E>>>(&mut self, element: V) -> Result<()> {
        let element = admit(&*self, element.into())?;
        self.list.push_front(element);
        Ok(())
    }

    fn append<V: Into<Option<E>>>(&mut self, element: V) -> Result<()> {
        let element = admit(&*self, element.into())?;
        self.list.push_back(element);
        Ok(())
    }

    fn remove_first(&mut self) -> Result<E> {
        self.list.pop_front().ok_or_else(|| {
            trace!("rejected remove_first on empty pipe");
            PipeError::EmptyContainer
        })
    }

    fn remove_last(&mut self) -> Result<E> {
        self.list.pop_back().ok_or_else(|| {
            trace!("rejected remove_last on empty pipe");
            PipeError::EmptyContainer
        })
    }

    fn clear(&mut self) {
        trace!(dropped = self.list.len(), "cleared list pipe");
        self.list.clear();
    }

    fn new_instance(&self) -> Self {
        Self::empty(self.capacity)
    }

    fn iter(&self) -> vec_deque::Iter<'_, E> {
        self.list.iter()
    }
}

impl_pipe_traits!([] ListPipe<E>);

impl<'a, E> IntoIterator for &'a ListPipe<E> {
    type Item = &'a E;
    type IntoIter = vec_deque::Iter<'a, E>;

    fn into_iter(self) -> vec_deque::Iter<'a, E> {
        self.list.iter()
    }
}
