//! Compact node handles for the arena-backed linked pipe.

use core::hash::Hash;
use std::fmt::Debug;

/// An integer type used as a **node handle** in [`LinkedPipe`](crate::LinkedPipe).
///
/// Links between nodes are stored as indices into the node arena instead of
/// pointers, so `prev` back-links never own anything. A narrower type shrinks every
/// node; it also caps the capacity a pipe can be built with (see
/// [`max_capacity`](IndexType::max_capacity)).
pub trait IndexType: Copy + Eq + Hash + Debug + 'static {
    /// Sentinel value meaning "no node" (the end of a chain, or an empty pipe).
    const NONE: Self;

    /// The first valid handle.
    const ZERO: Self;

    /// Converts this handle to a `usize` for arena access.
    fn as_usize(self) -> usize;

    /// Converts an arena slot to a handle.
    ///
    /// # Panics
    /// May panic or truncate if `i` is too large for the underlying type; callers
    /// keep `i` below [`max_capacity`](IndexType::max_capacity).
    fn from_usize(i: usize) -> Self;

    /// The largest pipe capacity whose every slot has a handle distinct from `NONE`.
    #[inline(always)]
    fn max_capacity() -> usize {
        Self::NONE.as_usize()
    }
}

macro_rules! impl_index_type {
    ($($t:ty),*) => {
        $(
            impl IndexType for $t {
                const NONE: Self = <$t>::MAX;
                const ZERO: Self = 0;
                #[inline(always)]
                fn as_usize(self) -> usize {
                    self as usize
                }
                #[inline(always)]
                fn from_usize(i: usize) -> Self {
                    i as $t
                }
            }
        )*
    };
}

impl_index_type!(u8, u16, u32, usize);
