//! The pooled multi-stack arena.
//!
//! [`StackPool`] owns one `Vec` of nodes shared by every stack drawn from
//! it. A stack is nothing more than the handle of its top node; each node
//! links to the one beneath it through its `next` field. Released slots are
//! threaded onto a single free list through that same field and are handed
//! out again before the storage grows.

use std::fmt;

use tracing::{debug, trace, warn};

use crate::config::PoolConfig;
use crate::dump::StackDump;
use crate::error::{PoolError, StackOp};
use crate::handle::Handle;
use crate::iter::{CursorMut, Iter};
use crate::view::StackView;

/// One storage slot.
///
/// `next` is the node beneath this one while the slot belongs to a live
/// stack, and the next free slot while it is on the free list. Exactly one
/// of the two chains threads through a slot at any time.
#[derive(Clone, Debug)]
pub(crate) struct Node<T, N> {
    pub(crate) value: T,
    pub(crate) next: N,
}

/// A pool of LIFO stacks sharing one contiguous node arena.
///
/// Stacks are addressed by handles of type `N` (see [`Handle`]). The
/// terminal handle `0` is the empty stack; [`push`](Self::push) and
/// [`pop`](Self::pop) take the current top and return the new one.
///
/// # Handle discipline
///
/// The pool does not track which handles the caller still holds. Passing a
/// handle that is not the current top of the stack being mutated, or one
/// whose slot has already been freed and reused, silently corrupts or
/// aliases chains. This never causes memory unsafety, only wrong data.
///
/// # Released values
///
/// Popping a node does not drop its value. The value stays in the slot
/// until a later push overwrites it, or until the pool itself is dropped.
///
/// # Example
///
/// ```
/// use stackpool::StackPool;
///
/// let mut pool: StackPool<i32> = StackPool::new();
/// let mut s = pool.new_stack();
/// s = pool.push(10, s)?;
/// s = pool.push(20, s)?;
/// assert_eq!(pool.iter(s).copied().collect::<Vec<_>>(), vec![20, 10]);
/// s = pool.pop(s)?;
/// assert_eq!(pool.value(s)?, &10);
/// s = pool.free_stack(s);
/// assert!(pool.is_empty(s));
/// # Ok::<(), stackpool::PoolError>(())
/// ```
#[derive(Clone)]
pub struct StackPool<T, N: Handle = usize> {
    /// Backing storage. Slot `i` is named by handle `i + 1`.
    nodes: Vec<Node<T, N>>,
    /// Head of the free list, or terminal when no slot is free.
    free_head: N,
    /// Number of slots on the free list.
    free_len: usize,
    /// Maximum number of slots `nodes` may grow to.
    limit: usize,
}

impl<T> StackPool<T> {
    /// Create an empty pool with no allocated storage.
    pub fn new() -> Self {
        Self::empty(PoolConfig::new().node_limit::<usize>())
    }

    /// Create a pool with storage reserved for `capacity` nodes.
    ///
    /// Fails with [`PoolError::AllocationFailed`] if the allocator cannot
    /// provide that much memory.
    pub fn with_capacity(capacity: usize) -> Result<Self, PoolError> {
        Self::with_config(&PoolConfig::new().with_initial_capacity(capacity))
    }
}

impl<T, N: Handle> StackPool<T, N> {
    fn empty(limit: usize) -> Self {
        Self {
            nodes: Vec::new(),
            free_head: N::TERMINAL,
            free_len: 0,
            limit,
        }
    }

    /// Create a pool from a [`PoolConfig`].
    ///
    /// Fails with [`PoolError::CapacityExceeded`] if `initial_capacity` is
    /// above the effective node limit, or [`PoolError::AllocationFailed`] if
    /// the reservation cannot be satisfied.
    pub fn with_config(config: &PoolConfig) -> Result<Self, PoolError> {
        let mut pool = Self::empty(config.node_limit::<N>());
        pool.reserve(config.initial_capacity)?;
        Ok(pool)
    }

    /// A new empty stack. Touches no storage.
    pub fn new_stack(&self) -> N {
        N::TERMINAL
    }

    /// Whether `head` is the empty stack.
    pub fn is_empty(&self, head: N) -> bool {
        head.is_terminal()
    }

    /// Ensure the backing storage can hold `capacity` nodes in total
    /// without reallocating.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), PoolError> {
        if capacity > self.limit {
            warn!(
                requested = capacity,
                limit = self.limit,
                "reserve rejected: node limit reached"
            );
            return Err(PoolError::CapacityExceeded {
                requested: capacity,
                limit: self.limit,
            });
        }
        if capacity <= self.nodes.capacity() {
            return Ok(());
        }
        self.nodes
            .try_reserve_exact(capacity - self.nodes.len())
            .map_err(|_| PoolError::AllocationFailed {
                requested: capacity,
            })?;
        debug!(
            requested = capacity,
            capacity = self.nodes.capacity(),
            "reserved pool storage"
        );
        Ok(())
    }

    /// Push `value` onto the stack whose top is `head` and return the new
    /// top.
    ///
    /// A free slot is reused when one exists; otherwise storage grows by one
    /// node. Growth fails with [`PoolError::CapacityExceeded`] at the node
    /// limit or [`PoolError::AllocationFailed`] if the allocator refuses; in
    /// both cases `value` is dropped and the pool is unchanged.
    pub fn push(&mut self, value: T, head: N) -> Result<N, PoolError> {
        let Some(index) = self.free_head.to_index() else {
            return self.grow(value, head);
        };
        let handle = self.free_head;
        let node = &mut self.nodes[index];
        self.free_head = node.next;
        self.free_len -= 1;
        // Drops the value the slot held when it was freed.
        *node = Node { value, next: head };
        trace!(%handle, "reused free slot");
        Ok(handle)
    }

    fn grow(&mut self, value: T, head: N) -> Result<N, PoolError> {
        let index = self.nodes.len();
        let requested = index.saturating_add(1);
        let handle = match N::from_index(index) {
            Some(handle) if requested <= self.limit => handle,
            _ => {
                warn!(requested, limit = self.limit, "push rejected: node limit reached");
                return Err(PoolError::CapacityExceeded {
                    requested,
                    limit: self.limit,
                });
            }
        };
        if self.nodes.len() == self.nodes.capacity() {
            let before = self.nodes.capacity();
            self.nodes
                .try_reserve(1)
                .map_err(|_| PoolError::AllocationFailed { requested })?;
            debug!(from = before, to = self.nodes.capacity(), "grew pool storage");
        }
        self.nodes.push(Node { value, next: head });
        Ok(handle)
    }

    /// Pop the top node of the stack whose top is `head` and return the new
    /// top.
    ///
    /// The slot moves to the front of the free list; its value is kept until
    /// the slot is reused. Fails with [`PoolError::EmptyStack`] when `head`
    /// is terminal.
    ///
    /// # Panics
    ///
    /// Panics if `head` names a slot the pool never allocated.
    pub fn pop(&mut self, head: N) -> Result<N, PoolError> {
        let free_head = self.free_head;
        let link = &mut self.node_mut(head, StackOp::Pop)?.next;
        let below = std::mem::replace(link, free_head);
        self.free_head = head;
        self.free_len += 1;
        Ok(below)
    }

    /// Pop every node of the stack whose top is `head`. Returns the empty
    /// stack.
    ///
    /// # Panics
    ///
    /// Panics if the chain reaches a slot the pool never allocated.
    pub fn free_stack(&mut self, mut head: N) -> N {
        while let Ok(below) = self.pop(head) {
            head = below;
        }
        head
    }

    /// The value stored at `handle`.
    ///
    /// `handle` may be any node of a live stack, not only its top. Fails
    /// with [`PoolError::EmptyStack`] when `handle` is terminal.
    ///
    /// # Panics
    ///
    /// Panics if `handle` names a slot the pool never allocated.
    pub fn value(&self, handle: N) -> Result<&T, PoolError> {
        Ok(&self.node(handle, StackOp::Value)?.value)
    }

    /// Mutable access to the value stored at `handle`.
    ///
    /// # Panics
    ///
    /// Panics if `handle` names a slot the pool never allocated.
    pub fn value_mut(&mut self, handle: N) -> Result<&mut T, PoolError> {
        Ok(&mut self.node_mut(handle, StackOp::Value)?.value)
    }

    /// The handle of the node beneath `handle`.
    ///
    /// # Panics
    ///
    /// Panics if `handle` names a slot the pool never allocated.
    pub fn next(&self, handle: N) -> Result<N, PoolError> {
        Ok(self.node(handle, StackOp::Next)?.next)
    }

    /// Mutable access to the link stored at `handle`.
    ///
    /// Rewriting links bypasses every chain invariant the pool relies on;
    /// the caller is responsible for keeping chains acyclic and disjoint.
    ///
    /// # Panics
    ///
    /// Panics if `handle` names a slot the pool never allocated.
    pub fn next_mut(&mut self, handle: N) -> Result<&mut N, PoolError> {
        Ok(&mut self.node_mut(handle, StackOp::Next)?.next)
    }

    fn node(&self, handle: N, op: StackOp) -> Result<&Node<T, N>, PoolError> {
        let index = handle.to_index().ok_or(PoolError::EmptyStack { op })?;
        Ok(&self.nodes[index])
    }

    fn node_mut(&mut self, handle: N, op: StackOp) -> Result<&mut Node<T, N>, PoolError> {
        let index = handle.to_index().ok_or(PoolError::EmptyStack { op })?;
        Ok(&mut self.nodes[index])
    }

    /// Capacity of the backing storage in nodes.
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Number of slots ever allocated (the high-water mark of live nodes).
    pub fn slots(&self) -> usize {
        self.nodes.len()
    }

    /// Number of slots currently on the free list.
    pub fn free_slots(&self) -> usize {
        self.free_len
    }

    /// Number of slots currently held by stacks.
    pub fn live_slots(&self) -> usize {
        self.nodes.len() - self.free_len
    }

    /// Maximum number of nodes this pool may hold.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Iterator positioned at the top of the stack `head`.
    pub fn begin(&self, head: N) -> Iter<'_, T, N> {
        Iter::new(&self.nodes, head)
    }

    /// The terminal iterator shared by every stack in the pool.
    pub fn end(&self) -> Iter<'_, T, N> {
        Iter::new(&self.nodes, N::TERMINAL)
    }

    /// Iterate the values of the stack `head`, top first.
    pub fn iter(&self, head: N) -> Iter<'_, T, N> {
        self.begin(head)
    }

    /// A borrowed view of the stack `head` for use with `for` loops.
    pub fn stack(&self, head: N) -> StackView<'_, T, N> {
        StackView::new(self, head)
    }

    /// A cursor for mutating the values of the stack `head` in order.
    pub fn cursor_mut(&mut self, head: N) -> CursorMut<'_, T, N> {
        CursorMut::new(&mut self.nodes, head)
    }

    /// Apply `f` to every value of the stack `head`, top first.
    pub fn for_each_mut<F>(&mut self, head: N, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let mut cursor = self.cursor_mut(head);
        while let Some(value) = cursor.current_mut() {
            f(value);
            cursor.move_next();
        }
    }

    /// Render the chain of `head` as `value,next --> ... end` for debugging.
    pub fn display_stack(&self, head: N) -> StackDump<'_, T, N>
    where
        T: fmt::Display,
    {
        StackDump::new(&self.nodes, head)
    }

    pub(crate) fn nodes(&self) -> &[Node<T, N>] {
        &self.nodes
    }
}

impl<T, N: Handle> Default for StackPool<T, N> {
    fn default() -> Self {
        Self::empty(N::MAX_SLOTS)
    }
}

impl<T, N: Handle> fmt::Debug for StackPool<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackPool")
            .field("slots", &self.nodes.len())
            .field("capacity", &self.nodes.capacity())
            .field("free_head", &self.free_head)
            .field("free_slots", &self.free_len)
            .field("limit", &self.limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<N: Handle>(pool: &StackPool<i32, N>, head: N) -> Vec<i32> {
        pool.iter(head).copied().collect()
    }

    #[test]
    fn new_stack_is_terminal_and_touches_nothing() {
        let pool: StackPool<i32> = StackPool::new();
        let s = pool.new_stack();
        assert_eq!(s, 0);
        assert!(pool.is_empty(s));
        assert_eq!(pool.slots(), 0);
        assert_eq!(pool.capacity(), 0);
    }

    #[test]
    fn push_on_empty_pool_appends_one_based_slots() {
        let mut pool: StackPool<i32> = StackPool::new();
        let a = pool.push(1, 0).unwrap();
        let b = pool.push(2, a).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(pool.next(b).unwrap(), a);
        assert_eq!(pool.next(a).unwrap(), 0);
    }

    #[test]
    fn pop_returns_node_beneath() {
        let mut pool: StackPool<i32> = StackPool::new();
        let a = pool.push(1, 0).unwrap();
        let b = pool.push(2, a).unwrap();
        assert_eq!(pool.pop(b).unwrap(), a);
        assert_eq!(pool.pop(a).unwrap(), 0);
    }

    #[test]
    fn pop_threads_slot_onto_free_list_front() {
        let mut pool: StackPool<i32> = StackPool::new();
        let a = pool.push(1, 0).unwrap();
        let b = pool.push(2, a).unwrap();
        let a_again = pool.pop(b).unwrap();
        pool.pop(a_again).unwrap();
        assert_eq!(pool.free_slots(), 2);
        // Most recently freed slot is handed out first.
        assert_eq!(pool.push(7, 0).unwrap(), a);
        assert_eq!(pool.push(8, 0).unwrap(), b);
        assert_eq!(pool.free_slots(), 0);
        assert_eq!(pool.slots(), 2);
    }

    #[test]
    fn free_list_is_reused_before_growing() {
        let mut pool: StackPool<i32> = StackPool::new();
        let mut s = pool.new_stack();
        for v in 0..5 {
            s = pool.push(v, s).unwrap();
        }
        s = pool.free_stack(s);
        assert_eq!(s, 0);
        let capacity = pool.capacity();
        for v in 0..5 {
            s = pool.push(v, s).unwrap();
        }
        assert_eq!(pool.slots(), 5);
        assert_eq!(pool.capacity(), capacity);
        assert_eq!(collect(&pool, s), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn empty_handle_is_rejected_uniformly() {
        let mut pool: StackPool<i32> = StackPool::new();
        assert_eq!(
            pool.pop(0),
            Err(PoolError::EmptyStack { op: StackOp::Pop })
        );
        assert_eq!(
            pool.value(0),
            Err(PoolError::EmptyStack { op: StackOp::Value })
        );
        assert_eq!(
            pool.value_mut(0).map(|v| *v),
            Err(PoolError::EmptyStack { op: StackOp::Value })
        );
        assert_eq!(
            pool.next(0),
            Err(PoolError::EmptyStack { op: StackOp::Next })
        );
        assert!(pool.next_mut(0).is_err());
        assert_eq!(pool.free_slots(), 0);
    }

    #[test]
    fn failed_pop_leaves_free_list_untouched() {
        let mut pool: StackPool<i32> = StackPool::new();
        let a = pool.push(1, 0).unwrap();
        pool.pop(a).unwrap();
        assert!(pool.pop(0).is_err());
        assert_eq!(pool.free_slots(), 1);
        assert_eq!(pool.push(2, 0).unwrap(), a);
    }

    #[test]
    fn value_mut_edits_interior_nodes() {
        let mut pool: StackPool<i32> = StackPool::new();
        let bottom = pool.push(1, 0).unwrap();
        let top = pool.push(2, bottom).unwrap();
        *pool.value_mut(bottom).unwrap() = 10;
        assert_eq!(collect(&pool, top), vec![2, 10]);
    }

    #[test]
    fn next_mut_relinks_chain() {
        let mut pool: StackPool<i32> = StackPool::new();
        let a = pool.push(1, 0).unwrap();
        let b = pool.push(2, a).unwrap();
        let c = pool.push(3, b).unwrap();
        // Splice b out of the chain.
        *pool.next_mut(c).unwrap() = a;
        assert_eq!(collect(&pool, c), vec![3, 1]);
    }

    #[test]
    #[should_panic]
    fn unallocated_handle_panics() {
        let pool: StackPool<i32> = StackPool::new();
        let _ = pool.value(3);
    }

    #[test]
    fn node_limit_rejects_growth_but_allows_reuse() {
        let config = PoolConfig::new().with_max_nodes(2);
        let mut pool: StackPool<i32, u32> = StackPool::with_config(&config).unwrap();
        let a = pool.push(1, 0).unwrap();
        let b = pool.push(2, a).unwrap();
        assert_eq!(
            pool.push(3, b),
            Err(PoolError::CapacityExceeded {
                requested: 3,
                limit: 2
            })
        );
        assert_eq!(collect(&pool, b), vec![2, 1]);

        let a = pool.pop(b).unwrap();
        assert_eq!(pool.push(4, a).unwrap(), b);
    }

    #[test]
    fn reserve_past_limit_fails() {
        let mut pool: StackPool<i32, u8> = StackPool::default();
        assert_eq!(
            pool.reserve(256),
            Err(PoolError::CapacityExceeded {
                requested: 256,
                limit: 255
            })
        );
        assert!(pool.reserve(255).is_ok());
        assert!(pool.capacity() >= 255);
    }

    #[test]
    fn reserve_never_shrinks() {
        let mut pool: StackPool<i32> = StackPool::with_capacity(32).unwrap();
        let before = pool.capacity();
        pool.reserve(4).unwrap();
        assert_eq!(pool.capacity(), before);
    }

    #[test]
    fn with_capacity_preallocates() {
        let pool: StackPool<i32> = StackPool::with_capacity(10).unwrap();
        assert!(pool.capacity() >= 10);
        assert_eq!(pool.slots(), 0);
    }

    #[test]
    fn with_config_rejects_initial_capacity_over_limit() {
        let config = PoolConfig::new()
            .with_initial_capacity(8)
            .with_max_nodes(4);
        let result = StackPool::<i32, u16>::with_config(&config);
        assert!(matches!(result, Err(PoolError::CapacityExceeded { .. })));
    }

    #[test]
    fn debug_reports_bookkeeping() {
        let mut pool: StackPool<i32> = StackPool::new();
        let s = pool.push(1, 0).unwrap();
        pool.pop(s).unwrap();
        let text = format!("{pool:?}");
        assert!(text.contains("slots: 1"));
        assert!(text.contains("free_slots: 1"));
    }

    #[test]
    fn clone_preserves_handles() {
        let mut pool: StackPool<i32> = StackPool::new();
        let mut s = pool.new_stack();
        for v in [1, 2, 3] {
            s = pool.push(v, s).unwrap();
        }
        let copy = pool.clone();
        pool.free_stack(s);
        assert_eq!(collect(&copy, s), vec![3, 2, 1]);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Push(usize, i32),
            Pop(usize),
            Free(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                3 => (0usize..4, any::<i32>()).prop_map(|(s, v)| Op::Push(s, v)),
                2 => (0usize..4).prop_map(Op::Pop),
                1 => (0usize..4).prop_map(Op::Free),
            ]
        }

        proptest! {
            #[test]
            fn pool_matches_vec_model(ops in proptest::collection::vec(op(), 1..200)) {
                let mut pool: StackPool<i32, u32> = StackPool::default();
                let mut heads = [0u32; 4];
                let mut model: [Vec<i32>; 4] = Default::default();
                let mut high_water = 0usize;

                for op in ops {
                    match op {
                        Op::Push(s, v) => {
                            heads[s] = pool.push(v, heads[s]).unwrap();
                            model[s].push(v);
                        }
                        Op::Pop(s) => {
                            let result = pool.pop(heads[s]);
                            match model[s].pop() {
                                Some(_) => heads[s] = result.unwrap(),
                                None => prop_assert!(result.is_err()),
                            }
                        }
                        Op::Free(s) => {
                            heads[s] = pool.free_stack(heads[s]);
                            model[s].clear();
                        }
                    }
                    let live: usize = model.iter().map(Vec::len).sum();
                    high_water = high_water.max(live);
                    prop_assert_eq!(pool.live_slots(), live);
                    prop_assert_eq!(pool.live_slots() + pool.free_slots(), pool.slots());
                    prop_assert_eq!(pool.slots(), high_water);
                }

                for (head, expected) in heads.iter().zip(&model) {
                    let actual: Vec<i32> = pool.iter(*head).copied().collect();
                    let mut expected = expected.clone();
                    expected.reverse();
                    prop_assert_eq!(actual, expected);
                }
            }

            #[test]
            fn push_then_pop_restores_head(
                values in proptest::collection::vec(any::<i32>(), 0..20),
                extra in any::<i32>(),
            ) {
                let mut pool: StackPool<i32> = StackPool::new();
                let mut s = pool.new_stack();
                for v in values {
                    s = pool.push(v, s).unwrap();
                }
                let top = pool.push(extra, s).unwrap();
                prop_assert_eq!(pool.pop(top).unwrap(), s);
            }
        }
    }
}
