//! Pool configuration parameters.

use crate::handle::Handle;

/// Construction-time settings for a [`StackPool`](crate::StackPool).
///
/// All values are read once by
/// [`StackPool::with_config`](crate::StackPool::with_config) and are
/// immutable for the pool's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of nodes to reserve storage for up front.
    ///
    /// Default: 0 (no allocation until the first push).
    pub initial_capacity: usize,

    /// Upper bound on the number of nodes the pool may ever hold.
    ///
    /// Default: `None`, meaning only the handle type limits growth. A value
    /// larger than the handle type can address is clamped to it.
    pub max_nodes: Option<usize>,
}

impl PoolConfig {
    /// Default initial capacity: no up-front allocation.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 0;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            max_nodes: None,
        }
    }

    /// Set the number of nodes reserved at construction.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Cap the number of nodes the pool may hold.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    /// Effective node limit for handles of type `N`.
    pub fn node_limit<N: Handle>(&self) -> usize {
        match self.max_nodes {
            Some(max) => max.min(N::MAX_SLOTS),
            None => N::MAX_SLOTS,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}
