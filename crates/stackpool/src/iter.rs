//! Handle-based traversal of a single stack.
//!
//! Both cursors hold a borrow of the pool's node slice and the handle of
//! the current position. Advancing reads the current node's `next` link;
//! no address arithmetic is involved, so a reallocation of the pool can
//! never leave a cursor dangling (the borrow prevents it outright).

use std::fmt;
use std::iter::FusedIterator;

use crate::handle::Handle;
use crate::pool::Node;

/// Read-only forward iterator over one stack, top first.
///
/// Created by [`StackPool::begin`](crate::StackPool::begin),
/// [`StackPool::iter`](crate::StackPool::iter) or a
/// [`StackView`](crate::StackView).
///
/// Two iterators compare equal when they sit at the same handle. Every
/// exhausted iterator sits at the terminal handle, so the end of any stack
/// equals the end of every other stack in the pool.
pub struct Iter<'a, T, N> {
    nodes: &'a [Node<T, N>],
    current: N,
}

impl<'a, T, N: Handle> Iter<'a, T, N> {
    pub(crate) fn new(nodes: &'a [Node<T, N>], start: N) -> Self {
        Self {
            nodes,
            current: start,
        }
    }

    /// Handle of the node the iterator will yield next.
    pub fn position(&self) -> N {
        self.current
    }

    /// Whether the iterator has reached the terminal handle.
    pub fn is_terminal(&self) -> bool {
        self.current.is_terminal()
    }
}

impl<'a, T, N: Handle> Iterator for Iter<'a, T, N> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let index = self.current.to_index()?;
        let nodes = self.nodes;
        let node = &nodes[index];
        self.current = node.next;
        Some(&node.value)
    }
}

impl<T, N: Handle> FusedIterator for Iter<'_, T, N> {}

impl<T, N: Handle> Clone for Iter<'_, T, N> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            current: self.current,
        }
    }
}

impl<T, N: Handle> PartialEq for Iter<'_, T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<T, N: Handle> Eq for Iter<'_, T, N> {}

impl<T, N: Handle> fmt::Debug for Iter<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("position", &self.current)
            .finish()
    }
}

/// Mutable cursor over one stack, top first.
///
/// Created by [`StackPool::cursor_mut`](crate::StackPool::cursor_mut). The
/// cursor lends out one `&mut T` at a time, which lets safe code mutate a
/// chain whose slot order is only known at runtime.
///
/// ```
/// use stackpool::StackPool;
///
/// let mut pool: StackPool<i32> = StackPool::new();
/// let mut s = pool.new_stack();
/// for v in [1, 2, 3] {
///     s = pool.push(v, s)?;
/// }
/// let mut cursor = pool.cursor_mut(s);
/// while let Some(v) = cursor.current_mut() {
///     *v *= 10;
///     cursor.move_next();
/// }
/// assert_eq!(pool.iter(s).copied().collect::<Vec<_>>(), vec![30, 20, 10]);
/// # Ok::<(), stackpool::PoolError>(())
/// ```
pub struct CursorMut<'a, T, N> {
    nodes: &'a mut [Node<T, N>],
    current: N,
}

impl<'a, T, N: Handle> CursorMut<'a, T, N> {
    pub(crate) fn new(nodes: &'a mut [Node<T, N>], start: N) -> Self {
        Self {
            nodes,
            current: start,
        }
    }

    /// Handle of the node under the cursor.
    pub fn position(&self) -> N {
        self.current
    }

    /// Whether the cursor has reached the terminal handle.
    pub fn is_terminal(&self) -> bool {
        self.current.is_terminal()
    }

    /// The value under the cursor, or `None` at the terminal handle.
    pub fn current(&self) -> Option<&T> {
        let index = self.current.to_index()?;
        Some(&self.nodes[index].value)
    }

    /// Mutable access to the value under the cursor.
    pub fn current_mut(&mut self) -> Option<&mut T> {
        let index = self.current.to_index()?;
        Some(&mut self.nodes[index].value)
    }

    /// Advance to the node beneath. Does nothing at the terminal handle.
    pub fn move_next(&mut self) {
        if let Some(index) = self.current.to_index() {
            self.current = self.nodes[index].next;
        }
    }
}

impl<T, N: Handle> fmt::Debug for CursorMut<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("position", &self.current)
            .finish()
    }
}
