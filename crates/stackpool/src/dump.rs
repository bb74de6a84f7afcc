//! Textual rendering of a stack's chain for debugging.

use std::fmt;

use crate::handle::Handle;
use crate::pool::Node;

/// Renders a chain as `value,next --> value,next --> end`.
///
/// Returned by [`StackPool::display_stack`](crate::StackPool::display_stack).
/// Each node shows its value and the handle it links to, so the output
/// exposes how stacks share slots of the pool.
pub struct StackDump<'a, T, N> {
    nodes: &'a [Node<T, N>],
    head: N,
}

impl<'a, T, N: Handle> StackDump<'a, T, N> {
    pub(crate) fn new(nodes: &'a [Node<T, N>], head: N) -> Self {
        Self { nodes, head }
    }
}

impl<T: fmt::Display, N: Handle> fmt::Display for StackDump<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut current = self.head;
        while let Some(index) = current.to_index() {
            let node = &self.nodes[index];
            write!(f, "{},{} --> ", node.value, node.next)?;
            current = node.next;
        }
        write!(f, "end")
    }
}
