//! Error type shared by every pipe backing.

use thiserror::Error;

/// Failure kinds reported by pipe operations.
///
/// Every operation that returns a `PipeError` leaves the pipe exactly as it was
/// before the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PipeError {
    /// An insert was attempted while `len() == capacity()`.
    #[error("pipe is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
    /// A removal was attempted on an empty pipe.
    #[error("pipe is empty")]
    EmptyContainer,
    /// An insert was called with an absent (`None`) element.
    #[error("pipe elements must not be absent")]
    InvalidElement,
    /// An argument other than an element was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Shorthand for results of pipe operations.
pub type Result<T> = core::result::Result<T, PipeError>;
