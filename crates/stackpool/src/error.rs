//! Pool-specific error types.

use std::error::Error;
use std::fmt;

/// The pool operation that rejected a terminal handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StackOp {
    /// [`StackPool::pop`](crate::StackPool::pop).
    Pop,
    /// [`StackPool::value`](crate::StackPool::value) or
    /// [`StackPool::value_mut`](crate::StackPool::value_mut).
    Value,
    /// [`StackPool::next`](crate::StackPool::next) or
    /// [`StackPool::next_mut`](crate::StackPool::next_mut).
    Next,
}

impl fmt::Display for StackOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pop => write!(f, "pop"),
            Self::Value => write!(f, "value"),
            Self::Next => write!(f, "next"),
        }
    }
}

/// Errors that can occur during pool operations.
///
/// A failed operation leaves the pool exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// Growing the pool would pass its node limit.
    ///
    /// The limit is either the configured `max_nodes` or the number of
    /// slots the handle type can address, whichever is smaller.
    CapacityExceeded {
        /// Number of nodes the operation needed in total.
        requested: usize,
        /// Maximum number of nodes the pool may hold.
        limit: usize,
    },
    /// The allocator could not provide memory for the backing storage.
    AllocationFailed {
        /// Number of nodes the operation needed in total.
        requested: usize,
    },
    /// An operation that needs a node was given the terminal handle.
    EmptyStack {
        /// The operation that was attempted.
        op: StackOp,
    },
}

impl PoolError {
    /// Whether this error reports a storage growth failure, either from the
    /// node limit or from the allocator.
    pub fn is_capacity(&self) -> bool {
        matches!(
            self,
            Self::CapacityExceeded { .. } | Self::AllocationFailed { .. }
        )
    }
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { requested, limit } => {
                write!(
                    f,
                    "pool capacity exceeded: requested {requested} nodes, limit {limit} nodes"
                )
            }
            Self::AllocationFailed { requested } => {
                write!(f, "failed to allocate storage for {requested} nodes")
            }
            Self::EmptyStack { op } => {
                write!(f, "{op} requested on empty stack")
            }
        }
    }
}

impl Error for PoolError {}
