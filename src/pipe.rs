//! The pipe contract and the behaviour every backing shares.
//!
//! A backing supplies the primitive operations of [`Pipe`]. Everything that can be
//! expressed through those primitives lives here exactly once:
//!
//! - the provided methods [`Pipe::append_all`], [`Pipe::copy`],
//!   [`Pipe::try_extend`] and [`Pipe::fingerprint`];
//! - structural equality, hashing and the `"[e1, e2]:capacity"` string form, which
//!   the `impl_pipe_traits!` macro wires into each backing's `PartialEq`, `Eq`,
//!   `Hash`, `Display`, `Debug` and `Clone` impls.
//!
//! Equality and hashing look only at capacity and element order, so pipes of
//! different backings compare and hash as equal when they hold the same sequence.

use core::fmt;
use core::hash::{Hash, Hasher};

use fnv::FnvHasher;
use tracing::trace;

use crate::error::{PipeError, Result};

// ─── Pipe ─────────────────────────────────────────────────────────────────────

/// A bounded, double-ended sequence of elements.
///
/// Inserts take `impl Into<Option<E>>`: a plain `E` is accepted as is, while `None`
/// stands for an absent element and is rejected with [`PipeError::InvalidElement`].
///
/// # Examples
///
/// ```rust
/// use bounded_pipe::{CircArrayPipe, Pipe, PipeError};
///
/// let mut pipe: CircArrayPipe<&str> = CircArrayPipe::new(3).unwrap();
/// pipe.append("B").unwrap();
/// pipe.prepend("A").unwrap();
/// pipe.append("C").unwrap();
/// assert_eq!(pipe.to_string(), "[A, B, C]:3");
/// assert_eq!(pipe.append("D"), Err(PipeError::CapacityExceeded { capacity: 3 }));
/// assert_eq!(pipe.remove_first(), Ok("A"));
/// ```
pub trait Pipe<E> {
    /// Forward iterator over the elements, first to last.
    type Iter<'a>: Iterator<Item = &'a E>
    where
        Self: 'a,
        E: 'a;

    /// Returns the number of elements this pipe can hold.
    fn capacity(&self) -> usize;

    /// Returns the number of elements currently in the pipe.
    fn len(&self) -> usize;

    /// Returns `true` if the pipe holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the pipe holds `capacity()` elements.
    fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Returns the first element, or `None` if the pipe is empty.
    fn first(&self) -> Option<&E>;

    /// Returns the last element, or `None` if the pipe is empty.
    fn last(&self) -> Option<&E>;

    /// Inserts `element` before the current first element.
    ///
    /// # Errors
    /// [`PipeError::InvalidElement`] if `element` is `None`,
    /// [`PipeError::CapacityExceeded`] if the pipe is full.
    fn prepend<V: Into<Option<E>>>(&mut self, element: V) -> Result<()>;

    /// Inserts `element` after the current last element.
    ///
    /// # Errors
    /// Same as [`prepend`](Pipe::prepend).
    fn append<V: Into<Option<E>>>(&mut self, element: V) -> Result<()>;

    /// Removes and returns the first element.
    ///
    /// # Errors
    /// [`PipeError::EmptyContainer`] if the pipe is empty.
    fn remove_first(&mut self) -> Result<E>;

    /// Removes and returns the last element.
    ///
    /// # Errors
    /// [`PipeError::EmptyContainer`] if the pipe is empty.
    fn remove_last(&mut self) -> Result<E>;

    /// Removes every element. The capacity is unchanged.
    fn clear(&mut self);

    /// Creates an empty pipe of the same backing and capacity.
    fn new_instance(&self) -> Self
    where
        Self: Sized;

    /// Returns an iterator over the elements, first to last.
    fn iter(&self) -> Self::Iter<'_>;

    /// Moves every element of `that` to the end of this pipe, leaving `that` empty.
    ///
    /// The transfer is all-or-nothing: when `that` holds more elements than this
    /// pipe has room for, neither pipe is modified.
    ///
    /// # Errors
    /// [`PipeError::InvalidArgument`] if `that` is `None`,
    /// [`PipeError::CapacityExceeded`] if the elements do not fit.
    fn append_all<'a, P, T>(&mut self, that: T) -> Result<()>
    where
        P: Pipe<E> + 'a,
        T: Into<Option<&'a mut P>>,
    {
        let that = that
            .into()
            .ok_or(PipeError::InvalidArgument("append_all source pipe is absent"))?;

        let room = self.capacity() - self.len();
        if that.len() > room {
            trace!(
                incoming = that.len(),
                room,
                capacity = self.capacity(),
                "rejected append_all: source does not fit"
            );
            return Err(PipeError::CapacityExceeded {
                capacity: self.capacity(),
            });
        }

        trace!(moved = that.len(), "draining pipe");
        while !that.is_empty() {
            let element = that.remove_first()?;
            self.append(element)?;
        }
        Ok(())
    }

    /// Returns a new pipe of the same backing and capacity holding clones of the
    /// elements in order.
    ///
    /// For reference-like elements (`Rc<T>`, `Arc<T>`, `&T`) the copy shares the
    /// referents with this pipe.
    fn copy(&self) -> Self
    where
        Self: Sized,
        E: Clone,
    {
        let mut result = self.new_instance();
        for element in self.iter() {
            match result.append(element.clone()) {
                Ok(()) => {}
                Err(_) => unreachable!("Logic Error: copy target shares the source capacity"),
            }
        }
        result
    }

    /// Appends every element produced by `iter`, stopping at the first failure.
    ///
    /// Elements appended before the failure stay in the pipe.
    fn try_extend<T: IntoIterator<Item = E>>(&mut self, iter: T) -> Result<()> {
        for element in iter {
            self.append(element)?;
        }
        Ok(())
    }

    /// Returns a stable 64-bit FNV-1a hash of the pipe.
    ///
    /// Uses the same input as the [`Hash`] impls, so equal pipes of any backing
    /// share a fingerprint, and the value does not change between runs.
    fn fingerprint(&self) -> u64
    where
        Self: Sized,
        E: Hash,
    {
        let mut hasher = FnvHasher::default();
        pipe_hash(self, &mut hasher);
        hasher.finish()
    }
}

// ─── Shared helpers ──────────────────────────────────────────────────────────

/// Validates an insert: the element must be present and the pipe must have room.
///
/// The element check comes first, so `None` is reported as `InvalidElement` even
/// on a full pipe.
pub(crate) fn admit<E, P: Pipe<E>>(pipe: &P, element: Option<E>) -> Result<E> {
    let element = element.ok_or(PipeError::InvalidElement)?;
    if pipe.is_full() {
        trace!(capacity = pipe.capacity(), "rejected insert into full pipe");
        return Err(PipeError::CapacityExceeded {
            capacity: pipe.capacity(),
        });
    }
    Ok(element)
}

/// Structural equality: same capacity, same length, pairwise-equal elements.
pub fn pipe_eq<E, A, B>(a: &A, b: &B) -> bool
where
    E: PartialEq,
    A: Pipe<E>,
    B: Pipe<E>,
{
    a.capacity() == b.capacity()
        && a.len() == b.len()
        && a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

/// Feeds the elements in order, then the capacity, into `state`.
pub fn pipe_hash<E, P, H>(pipe: &P, state: &mut H)
where
    E: Hash,
    P: Pipe<E>,
    H: Hasher,
{
    for element in pipe.iter() {
        element.hash(state);
    }
    pipe.capacity().hash(state);
}

/// Writes `"[e1, e2, ..., en]:capacity"` using `write_element` for each element.
pub(crate) fn fmt_pipe<E, P, F>(pipe: &P, f: &mut fmt::Formatter<'_>, write_element: F) -> fmt::Result
where
    P: Pipe<E>,
    F: Fn(&E, &mut fmt::Formatter<'_>) -> fmt::Result,
{
    f.write_str("[")?;
    for (i, element) in pipe.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_element(element, f)?;
    }
    write!(f, "]:{}", pipe.capacity())
}

/// Implements `PartialEq<Q: Pipe<E>>`, `Eq`, `Hash`, `Display`, `Debug` and `Clone`
/// for a backing through the shared helpers above.
///
/// The bracketed list carries the backing's generic parameters besides `E`.
macro_rules! impl_pipe_traits {
    ([$($gen:tt)*] $ty:ty) => {
        impl<E: PartialEq, Q: $crate::Pipe<E>, $($gen)*> PartialEq<Q> for $ty {
            fn eq(&self, other: &Q) -> bool {
                $crate::pipe::pipe_eq::<E, _, _>(self, other)
            }
        }

        impl<E: Eq, $($gen)*> Eq for $ty {}

        impl<E: ::core::hash::Hash, $($gen)*> ::core::hash::Hash for $ty {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                $crate::pipe::pipe_hash::<E, _, _>(self, state)
            }
        }

        impl<E: ::core::fmt::Display, $($gen)*> ::core::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                $crate::pipe::fmt_pipe::<E, _, _>(self, f, |e, f| ::core::fmt::Display::fmt(e, f))
            }
        }

        impl<E: ::core::fmt::Debug, $($gen)*> ::core::fmt::Debug for $ty {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                $crate::pipe::fmt_pipe::<E, _, _>(self, f, |e, f| ::core::fmt::Debug::fmt(e, f))
            }
        }

        impl<E: Clone, $($gen)*> Clone for $ty {
            fn clone(&self) -> Self {
                $crate::Pipe::copy(self)
            }
        }
    };
}

pub(crate) use impl_pipe_traits;
