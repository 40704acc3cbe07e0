//! Pipe backed by a fixed ring of slots.
//!
//! # Representation
//! `capacity` slots of `MaybeUninit<E>` are allocated once, at construction. Two
//! cursors, `first` and `last`, name the slots holding the first and last element.
//! Both hold the `NONE` sentinel while the pipe is empty; otherwise logical position
//! `i` lives in slot `(first + i) % capacity`.
//!
//! The length is never stored. It is derived from the cursors:
//! `((last - first) mod capacity) + 1` when non-empty, `0` when `first == NONE`.
//!
//! # State transitions
//! | From | Operation | Cursor update |
//! |------|-----------|---------------|
//! | Empty | `prepend`/`append` | `first = last = 0` |
//! | non-empty | `prepend` | `first = first - 1 (mod capacity)` |
//! | non-empty | `append` | `last = last + 1 (mod capacity)` |
//! | one element | `remove_first`/`remove_last` | `first = last = NONE` |
//! | more elements | `remove_first` | `first = first + 1 (mod capacity)` |
//! | more elements | `remove_last` | `last = last - 1 (mod capacity)` |

use core::iter::FusedIterator;
use core::mem::MaybeUninit;

use tracing::{debug, trace};

use crate::error::{PipeError, Result};
use crate::pipe::{admit, impl_pipe_traits};
use crate::Pipe;

/// Cursor value meaning "no slot".
const NONE: usize = usize::MAX;

/// A pipe stored in a ring buffer of `capacity` slots.
///
/// All operations at either end are O(1) and never move existing elements.
///
/// ```rust
/// use bounded_pipe::{CircArrayPipe, Pipe};
///
/// let mut pipe: CircArrayPipe<char> = CircArrayPipe::new(4).unwrap();
/// pipe.try_extend(['A', 'B', 'C']).unwrap();
/// pipe.remove_first().unwrap();
/// pipe.remove_first().unwrap();
/// pipe.append('X').unwrap();
/// pipe.append('Y').unwrap(); // lands in slot 0
/// assert_eq!(pipe.to_string(), "[C, X, Y]:4");
/// ```
pub struct CircArrayPipe<E> {
    slots: Box<[MaybeUninit<E>]>,
    first: usize,
    last: usize,
}

impl<E> CircArrayPipe<E> {
    /// Creates an empty pipe holding at most `capacity` elements.
    ///
    /// # Errors
    /// [`PipeError::InvalidArgument`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            debug!(capacity, "rejected circular-array pipe capacity");
            return Err(PipeError::InvalidArgument(
                "capacity must be greater than zero",
            ));
        }
        Ok(Self::with_slots(capacity))
    }

    fn with_slots(capacity: usize) -> Self {
        let slots = (0..capacity).map(|_| MaybeUninit::uninit()).collect();
        Self {
            slots,
            first: NONE,
            last: NONE,
        }
    }

    /// Advances a slot index by `add` positions, wrapping around the ring.
    #[inline(always)]
    fn wrap_add(&self, idx: usize, add: usize) -> usize {
        (idx + add) % self.slots.len()
    }

    /// Moves a slot index back by `sub` positions (`sub <= capacity`).
    #[inline(always)]
    fn wrap_sub(&self, idx: usize, sub: usize) -> usize {
        (idx + self.slots.len() - sub) % self.slots.len()
    }

    #[inline(always)]
    fn reset(&mut self) {
        self.first = NONE;
        self.last = NONE;
    }

    /// Stores the only element of a previously empty pipe in slot 0.
    fn occupy_empty(&mut self, element: E) {
        self.first = 0;
        self.last = 0;
        self.slots[0].write(element);
    }

    /// Returns the slot of the first element, or `None` when empty.
    #[inline(always)]
    fn first_slot(&self) -> Option<usize> {
        (self.first != NONE).then_some(self.first)
    }
}

impl<E> Pipe<E> for CircArrayPipe<E> {
    type Iter<'a>
        = Iter<'a, E>
    where
        E: 'a;

    #[inline(always)]
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn len(&self) -> usize {
        match self.first_slot() {
            None => 0,
            Some(first) => self.wrap_sub(self.last, first) + 1,
        }
    }

    fn first(&self) -> Option<&E> {
        // SAFETY: a non-NONE `first` always names an initialized slot.
        self.first_slot()
            .map(|slot| unsafe { self.slots[slot].assume_init_ref() })
    }

    fn last(&self) -> Option<&E> {
        self.first_slot()
            // SAFETY: `last` is set together with `first` and names an initialized slot.
            .map(|_| unsafe { self.slots[self.last].assume_init_ref() })
    }

    fn prepend<V: Into<Option<E>>>(&mut self, element: V) -> Result<()> {
        let element = admit(&*self, element.into())?;
        if self.first == NONE {
            self.occupy_empty(element);
            return Ok(());
        }
        self.first = self.wrap_sub(self.first, 1);
        self.slots[self.first].write(element);
        Ok(())
    }

    fn append<V: Into<Option<E>>>(&mut self, element: V) -> Result<()> {
        let element = admit(&*self, element.into())?;
        if self.first == NONE {
            self.occupy_empty(element);
            return Ok(());
        }
        self.last = self.wrap_add(self.last, 1);
        self.slots[self.last].write(element);
        Ok(())
    }

    fn remove_first(&mut self) -> Result<E> {
        let Some(taken) = self.first_slot() else {
            trace!("rejected remove_first on empty pipe");
            return Err(PipeError::EmptyContainer);
        };
        if taken == self.last {
            self.reset();
        } else {
            self.first = self.wrap_add(taken, 1);
        }
        // SAFETY: `taken` held the first element and is no longer covered by the cursors.
        Ok(unsafe { self.slots[taken].assume_init_read() })
    }

    fn remove_last(&mut self) -> Result<E> {
        if self.first == NONE {
            trace!("rejected remove_last on empty pipe");
            return Err(PipeError::EmptyContainer);
        }
        let taken = self.last;
        if taken == self.first {
            self.reset();
        } else {
            self.last = self.wrap_sub(taken, 1);
        }
        // SAFETY: `taken` held the last element and is no longer covered by the cursors.
        Ok(unsafe { self.slots[taken].assume_init_read() })
    }

    fn clear(&mut self) {
        let len = self.len();
        let first = self.first;
        // Cursors go first so a panicking destructor cannot lead to a double drop.
        self.reset();
        for i in 0..len {
            let slot = self.wrap_add(first, i);
            // SAFETY: slots `first..first + len` (mod capacity) were initialized.
            unsafe { self.slots[slot].assume_init_drop() };
        }
        trace!(dropped = len, "cleared circular-array pipe");
    }

    fn new_instance(&self) -> Self {
        Self::with_slots(self.capacity())
    }

    fn iter(&self) -> Iter<'_, E> {
        Iter {
            slots: &self.slots,
            front: self.first_slot().unwrap_or(0),
            remaining: self.len(),
        }
    }
}

impl<E> Drop for CircArrayPipe<E> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl_pipe_traits!([] CircArrayPipe<E>);

impl<'a, E> IntoIterator for &'a CircArrayPipe<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Iter<'a, E> {
        self.iter()
    }
}

/// Iterator over a [`CircArrayPipe`], first to last.
pub struct Iter<'a, E> {
    slots: &'a [MaybeUninit<E>],
    front: usize,
    remaining: usize,
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.front;
        self.front = (self.front + 1) % self.slots.len();
        self.remaining -= 1;
        // SAFETY: the iterator only visits the `len` initialized slots after `first`.
        Some(unsafe { self.slots[slot].assume_init_ref() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<E> DoubleEndedIterator for Iter<'_, E> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let slot = (self.front + self.remaining) % self.slots.len();
        // SAFETY: see `next`.
        Some(unsafe { self.slots[slot].assume_init_ref() })
    }
}

impl<E> ExactSizeIterator for Iter<'_, E> {}
impl<E> FusedIterator for Iter<'_, E> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LinkedPipe, ListPipe};
    use std::cell::Cell;
    use std::rc::Rc;

    fn init_pipe(capacity: usize, items: &[&'static str]) -> CircArrayPipe<&'static str> {
        let mut p = CircArrayPipe::new(capacity).unwrap();
        for &s in items {
            p.append(s).unwrap();
        }
        p
    }

    // ─── construction ─────────────────────────────────────────────────────────
    #[test]
    fn test_circ_new_rejects_zero_capacity() {
        assert_eq!(
            CircArrayPipe::<i32>::new(0).err(),
            Some(PipeError::InvalidArgument("capacity must be greater than zero"))
        );
    }

    #[test]
    fn test_circ_length_and_capacity() {
        let p = init_pipe(6, &["A", "B", "C"]);
        assert_eq!(p.len(), 3);
        assert_eq!(p.capacity(), 6);
        assert_eq!(init_pipe(6, &[]).len(), 0);
    }

    // ─── prepend / append ─────────────────────────────────────────────────────
    #[test]
    fn test_circ_prepend_onto_abc() {
        let mut p = init_pipe(6, &["A", "B", "C"]);
        p.prepend("X").unwrap();
        assert_eq!(p.len(), 4);
        assert_eq!(p.first(), Some(&"X"));
        assert_eq!(p.remove_first(), Ok("X"));
    }

    #[test]
    fn test_circ_prepend_onto_empty() {
        let mut p = init_pipe(6, &[]);
        p.prepend("X").unwrap();
        assert_eq!(p.len(), 1);
        assert_eq!(p.first(), p.last());
        assert_eq!(p.remove_first(), Ok("X"));
    }

    #[test]
    fn test_circ_append_onto_abc() {
        let mut p = init_pipe(6, &["A", "B", "C"]);
        p.append("X").unwrap();
        assert_eq!(p.len(), 4);
        assert_eq!(p.remove_last(), Ok("X"));
    }

    #[test]
    fn test_circ_insert_into_full_fails() {
        let mut p = init_pipe(3, &["A", "B", "C"]);
        assert_eq!(p.append("X"), Err(PipeError::CapacityExceeded { capacity: 3 }));
        assert_eq!(p.prepend("X"), Err(PipeError::CapacityExceeded { capacity: 3 }));
        assert_eq!(p.to_string(), "[A, B, C]:3");
    }

    #[test]
    fn test_circ_insert_none_fails_at_any_fill() {
        let mut full = init_pipe(3, &["A", "B", "C"]);
        let mut partial = init_pipe(6, &["A", "B", "C"]);
        assert_eq!(full.prepend(None::<&str>), Err(PipeError::InvalidElement));
        assert_eq!(full.append(None::<&str>), Err(PipeError::InvalidElement));
        assert_eq!(partial.prepend(None::<&str>), Err(PipeError::InvalidElement));
        assert_eq!(partial.append(None::<&str>), Err(PipeError::InvalidElement));
        assert_eq!(partial.len(), 3);
    }

    // ─── removal ──────────────────────────────────────────────────────────────
    #[test]
    fn test_circ_remove_both_ends() {
        let mut p = init_pipe(6, &["A", "B", "C"]);
        assert_eq!(p.remove_first(), Ok("A"));
        assert_eq!(p.remove_last(), Ok("C"));
        assert_eq!(p.len(), 1);
        assert_eq!(p.remove_last(), Ok("B"));
        assert!(p.is_empty());
        assert_eq!(p.first(), None);
        assert_eq!(p.last(), None);
    }

    #[test]
    fn test_circ_remove_from_empty_fails() {
        let mut p = init_pipe(6, &[]);
        assert_eq!(p.remove_first(), Err(PipeError::EmptyContainer));
        assert_eq!(p.remove_last(), Err(PipeError::EmptyContainer));
    }

    // ─── wrap-around (ring buffer) ────────────────────────────────────────────
    #[test]
    fn test_circ_wrap_append_after_front_removals() {
        let mut p = init_pipe(4, &["A", "B", "C"]);
        assert_eq!(p.remove_first(), Ok("A"));
        assert_eq!(p.remove_first(), Ok("B"));
        p.append("X").unwrap();
        p.append("Y").unwrap();
        // C sits in slot 2, X in slot 3, Y wrapped into slot 0
        assert_eq!((p.first, p.last), (2, 0));
        assert_eq!(p.len(), 3);
        assert_eq!(p, init_pipe(4, &["C", "X", "Y"]));
        assert_eq!(p.to_string(), "[C, X, Y]:4");
    }

    #[test]
    fn test_circ_wrap_prepend_from_slot_zero() {
        let mut p = init_pipe(4, &["A"]);
        p.prepend("Z").unwrap(); // first wraps to slot 3
        assert_eq!((p.first, p.last), (3, 0));
        p.append("B").unwrap();
        p.prepend("Y").unwrap();
        assert!(p.is_full());
        assert_eq!(p.len(), 4);
        assert_eq!(p.iter().copied().collect::<Vec<_>>(), ["Y", "Z", "A", "B"]);
        assert_eq!(p.remove_last(), Ok("B"));
        assert_eq!(p.remove_last(), Ok("A"));
        assert_eq!(p.remove_last(), Ok("Z"));
        assert_eq!(p.remove_last(), Ok("Y"));
        assert!(p.is_empty());
    }

    #[test]
    fn test_circ_wrap_full_ring_rotation() {
        let mut p: CircArrayPipe<i32> = CircArrayPipe::new(3).unwrap();
        for i in 0..20 {
            p.append(i).unwrap();
            if p.is_full() {
                assert_eq!(p.remove_first(), Ok(i - 2));
            }
            assert!(p.len() <= p.capacity());
        }
        assert_eq!(p.iter().copied().collect::<Vec<_>>(), [18, 19]);
    }

    // ─── iteration ────────────────────────────────────────────────────────────
    #[test]
    fn test_circ_iter_order_and_restart() {
        let p = init_pipe(6, &["A", "B", "C"]);
        assert_eq!(p.iter().copied().collect::<String>(), "ABC");
        assert_eq!(p.iter().rev().copied().collect::<String>(), "CBA");
        assert_eq!((&p).into_iter().len(), 3);
    }

    #[test]
    fn test_circ_iter_empty() {
        let p = init_pipe(6, &[]);
        let mut it = p.iter();
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    // ─── string form / equality ──────────────────────────────────────────────
    #[test]
    fn test_circ_to_string() {
        assert_eq!(init_pipe(6, &["A", "B", "C"]).to_string(), "[A, B, C]:6");
        assert_eq!(init_pipe(6, &[]).to_string(), "[]:6");
        assert_eq!(format!("{:?}", init_pipe(2, &["A"])), "[\"A\"]:2");
    }

    #[test]
    fn test_circ_equality() {
        let abc6 = init_pipe(6, &["A", "B", "C"]);
        assert_eq!(abc6, abc6);
        assert_eq!(abc6, init_pipe(6, &["A", "B", "C"]));
        assert_ne!(abc6, init_pipe(10, &["A", "B", "C"]));
        assert_ne!(abc6, init_pipe(6, &["A", "B"]));
        assert_ne!(abc6, init_pipe(6, &["D", "E", "F"]));
        assert_eq!(init_pipe(6, &[]), init_pipe(6, &[]));
        assert_ne!(init_pipe(6, &[]), init_pipe(5, &[]));
    }

    #[test]
    fn test_circ_equality_across_backings() {
        let abc6 = init_pipe(6, &["A", "B", "C"]);
        let mut list: ListPipe<&str> = ListPipe::new(6).unwrap();
        let mut linked: LinkedPipe<&str> = LinkedPipe::new(6).unwrap();
        list.try_extend(["A", "B", "C"]).unwrap();
        linked.try_extend(["A", "B", "C"]).unwrap();
        assert!(abc6 == list);
        assert!(abc6 == linked);
        assert_eq!(abc6.fingerprint(), list.fingerprint());
        assert_eq!(abc6.fingerprint(), linked.fingerprint());
    }

    // ─── copy / append_all ───────────────────────────────────────────────────
    #[test]
    fn test_circ_copy_is_shallow_and_independent() {
        let mut p: CircArrayPipe<Rc<String>> = CircArrayPipe::new(4).unwrap();
        p.append(Rc::new("A".to_string())).unwrap();
        p.append(Rc::new("B".to_string())).unwrap();
        let mut copied = p.copy();
        assert_eq!(copied, p);
        assert!(Rc::ptr_eq(copied.first().unwrap(), p.first().unwrap()));
        copied.remove_last().unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(copied.len(), 1);
    }

    #[test]
    fn test_circ_append_all_drains_source() {
        let mut p = init_pipe(6, &["A", "B", "C"]);
        let mut q = init_pipe(6, &["D", "E"]);
        p.append_all(&mut q).unwrap();
        assert_eq!(p.to_string(), "[A, B, C, D, E]:6");
        assert!(q.is_empty());
    }

    // ─── drop ─────────────────────────────────────────────────────────────────
    struct DropCounter<'a>(&'a Cell<usize>);

    impl Drop for DropCounter<'_> {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_circ_drops_live_elements_once() {
        let drops = Cell::new(0);
        {
            let mut p: CircArrayPipe<DropCounter<'_>> = CircArrayPipe::new(3).unwrap();
            for _ in 0..3 {
                p.append(DropCounter(&drops)).unwrap();
            }
            drop(p.remove_first().unwrap());
            p.append(DropCounter(&drops)).unwrap(); // wraps
            assert_eq!(drops.get(), 1);
            p.clear();
            assert_eq!(drops.get(), 4);
            p.append(DropCounter(&drops)).unwrap();
        }
        assert_eq!(drops.get(), 5);
    }
}
