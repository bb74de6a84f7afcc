//! Integer handles naming stacks and positions within them.
//!
//! A handle is a plain unsigned integer. `0` is the terminal marker: it is
//! both the empty stack and the "one past the last node" position of every
//! chain. Any other value `h` names storage slot `h - 1`.

use std::fmt;
use std::hash::Hash;

mod sealed {
    pub trait Sealed {}
}

/// An unsigned integer type usable as a stack handle.
///
/// Implemented for `u8`, `u16`, `u32`, `u64` and `usize`. The width of the
/// handle bounds how many nodes a pool can address: a `StackPool<T, u8>`
/// holds at most 255 nodes, because slot 255 is the largest 1-based index
/// a `u8` can name.
pub trait Handle:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Default + sealed::Sealed
{
    /// The terminal marker, `0`.
    const TERMINAL: Self;

    /// Number of slots this handle type can address.
    const MAX_SLOTS: usize;

    /// Handle of the slot at the given 0-based storage index.
    ///
    /// Returns `None` if the resulting 1-based value does not fit the type.
    fn from_index(index: usize) -> Option<Self>;

    /// The 0-based storage index this handle names, or `None` for the
    /// terminal marker.
    fn to_index(self) -> Option<usize>;

    /// Whether this is the terminal marker.
    fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }
}

macro_rules! impl_handle {
    ($($t:ty),* $(,)?) => {$(
        impl sealed::Sealed for $t {}

        impl Handle for $t {
            const TERMINAL: Self = 0;

            const MAX_SLOTS: usize = if (<$t>::MAX as u128) < (usize::MAX as u128) {
                <$t>::MAX as usize
            } else {
                usize::MAX
            };

            #[inline]
            fn from_index(index: usize) -> Option<Self> {
                <$t>::try_from(index.checked_add(1)?).ok()
            }

            #[inline]
            fn to_index(self) -> Option<usize> {
                usize::try_from(self).ok()?.checked_sub(1)
            }
        }
    )*};
}

impl_handle!(u8, u16, u32, u64, usize);
