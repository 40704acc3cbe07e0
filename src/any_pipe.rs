//! Pipes whose backing is chosen at runtime.
//!
//! [`PipeConfig`] names a [`Backing`] and a capacity and can be loaded with serde
//! from any format. [`PipeConfig::build`] validates it and produces an [`AnyPipe`],
//! which forwards the [`Pipe`] contract to the selected backing.
//!
//! ```rust
//! use bounded_pipe::{AnyPipe, Backing, Pipe, PipeConfig};
//!
//! let config = PipeConfig::new(Backing::Linked, 3);
//! let mut pipe: AnyPipe<&str> = config.build().unwrap();
//! pipe.append("A").unwrap();
//! assert_eq!(pipe.backing(), Backing::Linked);
//! assert_eq!(pipe.to_string(), "[A]:3");
//! ```

use core::fmt;
use core::iter::FusedIterator;
use core::str::FromStr;
use std::collections::vec_deque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipeError, Result};
use crate::pipe::impl_pipe_traits;
use crate::pipes::{circ_array, linked};
use crate::{CircArrayPipe, LinkedPipe, ListPipe, Pipe};

// ─── Backing ──────────────────────────────────────────────────────────────────

/// The storage strategy of a pipe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Backing {
    /// [`CircArrayPipe`]: fixed ring of slots.
    #[default]
    CircArray,
    /// [`LinkedPipe`]: doubly linked node arena.
    Linked,
    /// [`ListPipe`]: growable `VecDeque`.
    List,
}

impl Backing {
    /// Every backing, in declaration order.
    pub const ALL: [Backing; 3] = [Backing::CircArray, Backing::Linked, Backing::List];

    /// The kebab-case name used by `Display`, `FromStr` and serde.
    pub fn as_str(self) -> &'static str {
        match self {
            Backing::CircArray => "circ-array",
            Backing::Linked => "linked",
            Backing::List => "list",
        }
    }
}

impl fmt::Display for Backing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backing {
    type Err = PipeError;

    fn from_str(s: &str) -> Result<Self> {
        Backing::ALL
            .into_iter()
            .find(|backing| backing.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(PipeError::InvalidArgument("unknown pipe backing"))
    }
}

// ─── PipeConfig ───────────────────────────────────────────────────────────────

/// Declarative description of a pipe: which backing, and how many elements.
///
/// Missing fields fall back to [`PipeConfig::default`]. The capacity is only
/// checked by [`build`](PipeConfig::build).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipeConfig {
    pub backing: Backing,
    pub capacity: usize,
}

impl PipeConfig {
    /// Capacity used when a configuration does not name one.
    pub const DEFAULT_CAPACITY: usize = 16;

    pub fn new(backing: Backing, capacity: usize) -> Self {
        Self { backing, capacity }
    }

    /// Creates the empty pipe this configuration describes.
    ///
    /// # Errors
    /// [`PipeError::InvalidArgument`] if the capacity is rejected by the backing.
    pub fn build<E>(&self) -> Result<AnyPipe<E>> {
        debug!(backing = %self.backing, capacity = self.capacity, "building pipe");
        AnyPipe::new(self.backing, self.capacity)
    }
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self::new(Backing::default(), Self::DEFAULT_CAPACITY)
    }
}

// ─── AnyPipe ──────────────────────────────────────────────────────────────────

/// A pipe of any backing, selected at runtime.
pub enum AnyPipe<E> {
    CircArray(CircArrayPipe<E>),
    Linked(LinkedPipe<E>),
    List(ListPipe<E>),
}

/// Runs `$body` with `$p` bound to whichever backing is active.
macro_rules! dispatch {
    ($pipe:expr, $p:ident => $body:expr) => {
        match $pipe {
            AnyPipe::CircArray($p) => $body,
            AnyPipe::Linked($p) => $body,
            AnyPipe::List($p) => $body,
        }
    };
}

impl<E> AnyPipe<E> {
    /// Creates an empty pipe of the given backing.
    ///
    /// # Errors
    /// [`PipeError::InvalidArgument`] if `capacity` is rejected by the backing.
    pub fn new(backing: Backing, capacity: usize) -> Result<Self> {
        Ok(match backing {
            Backing::CircArray => AnyPipe::CircArray(CircArrayPipe::new(capacity)?),
            Backing::Linked => AnyPipe::Linked(LinkedPipe::new(capacity)?),
            Backing::List => AnyPipe::List(ListPipe::new(capacity)?),
        })
    }

    /// Returns the active backing.
    pub fn backing(&self) -> Backing {
        match self {
            AnyPipe::CircArray(_) => Backing::CircArray,
            AnyPipe::Linked(_) => Backing::Linked,
            AnyPipe::List(_) => Backing::List,
        }
    }
}

impl<E> Pipe<E> for AnyPipe<E> {
    type Iter<'a>
        = Iter<'a, E>
    where
        E: 'a;

    fn capacity(&self) -> usize {
        dispatch!(self, p => p.capacity())
    }

    fn len(&self) -> usize {
        dispatch!(self, p => p.len())
    }

    fn first(&self) -> Option<&E> {
        dispatch!(self, p => p.first())
    }

    fn last(&self) -> Option<&E> {
        dispatch!(self, p => p.last())
    }

    fn prepend<V: Into<Option<E>>>(&mut self, element: V) -> Result<()> {
        dispatch!(self, p => p.prepend(element))
    }

    fn append<V: Into<Option<E>>>(&mut self, element: V) -> Result<()> {
        dispatch!(self, p => p.append(element))
    }

    fn remove_first(&mut self) -> Result<E> {
        dispatch!(self, p => p.remove_first())
    }

    fn remove_last(&mut self) -> Result<E> {
        dispatch!(self, p => p.remove_last())
    }

    fn clear(&mut self) {
        dispatch!(self, p => p.clear())
    }

    fn new_instance(&self) -> Self {
        match self {
            AnyPipe::CircArray(p) => AnyPipe::CircArray(p.new_instance()),
            AnyPipe::Linked(p) => AnyPipe::Linked(p.new_instance()),
            AnyPipe::List(p) => AnyPipe::List(p.new_instance()),
        }
    }

    fn iter(&self) -> Iter<'_, E> {
        match self {
            AnyPipe::CircArray(p) => Iter::CircArray(p.iter()),
            AnyPipe::Linked(p) => Iter::Linked(p.iter()),
            AnyPipe::List(p) => Iter::List(p.iter()),
        }
    }
}

impl_pipe_traits!([] AnyPipe<E>);

impl<E> From<CircArrayPipe<E>> for AnyPipe<E> {
    fn from(pipe: CircArrayPipe<E>) -> Self {
        AnyPipe::CircArray(pipe)
    }
}

impl<E> From<LinkedPipe<E>> for AnyPipe<E> {
    fn from(pipe: LinkedPipe<E>) -> Self {
        AnyPipe::Linked(pipe)
    }
}

impl<E> From<ListPipe<E>> for AnyPipe<E> {
    fn from(pipe: ListPipe<E>) -> Self {
        AnyPipe::List(pipe)
    }
}

impl<'a, E> IntoIterator for &'a AnyPipe<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Iter<'a, E> {
        self.iter()
    }
}

/// Iterator over an [`AnyPipe`], first to last.
pub enum Iter<'a, E> {
    CircArray(circ_array::Iter<'a, E>),
    Linked(linked::Iter<'a, E, u32>),
    List(vec_deque::Iter<'a, E>),
}

macro_rules! dispatch_iter {
    ($iter:expr, $it:ident => $body:expr) => {
        match $iter {
            Iter::CircArray($it) => $body,
            Iter::Linked($it) => $body,
            Iter::List($it) => $body,
        }
    };
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        dispatch_iter!(self, it => it.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        dispatch_iter!(self, it => it.size_hint())
    }
}

impl<E> DoubleEndedIterator for Iter<'_, E> {
    fn next_back(&mut self) -> Option<Self::Item> {
        dispatch_iter!(self, it => it.next_back())
    }
}

impl<E> ExactSizeIterator for Iter<'_, E> {}
impl<E> FusedIterator for Iter<'_, E> {}
