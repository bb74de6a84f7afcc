//! Borrowed per-stack views.
//!
//! [`StackView`] pairs a shared borrow of a [`StackPool`] with one head
//! handle so a stack can be walked with a `for` loop. It owns nothing and
//! cannot outlive the pool.

use std::fmt;

use crate::dump::StackDump;
use crate::handle::Handle;
use crate::iter::Iter;
use crate::pool::StackPool;

/// A read-only view of one stack in a pool.
///
/// ```
/// use stackpool::StackPool;
///
/// let mut pool: StackPool<u32> = StackPool::new();
/// let mut s = pool.new_stack();
/// for v in 0..3 {
///     s = pool.push(v, s)?;
/// }
/// let mut seen = Vec::new();
/// for v in pool.stack(s) {
///     seen.push(*v);
/// }
/// assert_eq!(seen, vec![2, 1, 0]);
/// # Ok::<(), stackpool::PoolError>(())
/// ```
pub struct StackView<'a, T, N: Handle = usize> {
    pool: &'a StackPool<T, N>,
    head: N,
}

impl<'a, T, N: Handle> StackView<'a, T, N> {
    pub(crate) fn new(pool: &'a StackPool<T, N>, head: N) -> Self {
        Self { pool, head }
    }

    /// Handle of the top node.
    pub fn head(&self) -> N {
        self.head
    }

    /// Whether the viewed stack is empty.
    pub fn is_empty(&self) -> bool {
        self.head.is_terminal()
    }

    /// Iterator positioned at the top.
    pub fn begin(&self) -> Iter<'a, T, N> {
        self.pool.begin(self.head)
    }

    /// The terminal iterator.
    pub fn end(&self) -> Iter<'a, T, N> {
        self.pool.end()
    }

    /// Iterate the values, top first.
    pub fn iter(&self) -> Iter<'a, T, N> {
        self.begin()
    }

    /// Number of nodes in the stack. Walks the whole chain.
    pub fn depth(&self) -> usize {
        self.iter().count()
    }
}

impl<T, N: Handle> Clone for StackView<'_, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, N: Handle> Copy for StackView<'_, T, N> {}

impl<'a, T, N: Handle> IntoIterator for StackView<'a, T, N> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}

impl<'a, T, N: Handle> IntoIterator for &StackView<'a, T, N> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}

impl<T: fmt::Display, N: Handle> fmt::Display for StackView<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&StackDump::new(self.pool.nodes(), self.head), f)
    }
}

impl<T: fmt::Debug, N: Handle> fmt::Debug for StackView<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
