//! # Bounded Pipe
//!
//! Bounded, double-ended sequences ("pipes") with three interchangeable backings.
//!
//! A pipe holds at most `capacity` elements, fixed at construction, and supports
//! insertion and removal at both ends. Every backing implements the same [`Pipe`]
//! contract, so they behave identically, compare equal to each other when they hold
//! the same elements, hash alike, and print alike.
//!
//! ## Backings
//!
//! | Type | Storage | Notes |
//! |------|---------|-------|
//! | [`CircArrayPipe`] | `capacity` slots allocated up front | length derived from the ring cursors |
//! | [`LinkedPipe`] | doubly linked node arena, grown on demand | handles are compact [`IndexType`] integers |
//! | [`ListPipe`] | `VecDeque` | the reference implementation |
//! | [`AnyPipe`] | any of the above, chosen at runtime | built from a [`PipeConfig`] |
//!
//! ## Contract
//!
//! * **Capacity:** inserting into a full pipe fails with [`PipeError::CapacityExceeded`].
//! * **No absent elements:** inserts take `impl Into<Option<E>>`; `None` fails with
//!   [`PipeError::InvalidElement`].
//! * **Strong guarantee:** a failed operation leaves the pipe unchanged.
//! * **String form:** `Display` renders `[e1, e2, ..., en]:capacity`.
//!
//! ## Examples
//!
//! ```rust
//! use bounded_pipe::{CircArrayPipe, LinkedPipe, ListPipe, Pipe, PipeError};
//!
//! let mut circ: CircArrayPipe<&str> = CircArrayPipe::new(6).unwrap();
//! let mut linked: LinkedPipe<&str> = LinkedPipe::new(6).unwrap();
//! let mut list: ListPipe<&str> = ListPipe::new(6).unwrap();
//!
//! for s in ["A", "B", "C"] {
//!     circ.append(s).unwrap();
//!     linked.append(s).unwrap();
//!     list.append(s).unwrap();
//! }
//!
//! assert!(circ == linked && linked == list);
//! assert_eq!(circ.to_string(), "[A, B, C]:6");
//! assert_eq!(circ.fingerprint(), list.fingerprint());
//!
//! assert_eq!(circ.prepend(None::<&str>), Err(PipeError::InvalidElement));
//!
//! // Drain `list` onto the end of `linked`.
//! linked.append_all(&mut list).unwrap();
//! assert_eq!(linked.to_string(), "[A, B, C, A, B, C]:6");
//! assert!(list.is_empty());
//! ```

// --- Module Declarations ---

pub mod any_pipe;
pub mod error;
pub mod pipe;
pub mod pipes;
mod utils;

// --- Re-exports ---

pub use any_pipe::{AnyPipe, Backing, PipeConfig};
pub use error::{PipeError, Result};
pub use pipe::Pipe;
pub use pipes::circ_array::CircArrayPipe;
pub use pipes::linked::LinkedPipe;
pub use pipes::list::ListPipe;
pub use utils::index_type::IndexType;
