//! Many LIFO stacks sharing one pooled node arena.
//!
//! A [`StackPool`] stores the nodes of every stack drawn from it in a single
//! `Vec`. Stacks are named by small integer handles rather than pointers:
//! a stack *is* the handle of its top node, and `0` is the empty stack.
//! Popped slots go onto one intrusive free list, threaded through the same
//! `next` field live nodes use, and are reused before the storage grows.
//!
//! # Architecture
//!
//! ```text
//! StackPool<T, N>
//! ├── Vec<Node { value: T, next: N }>   slot i <-> handle i + 1
//! ├── free_head: N                       head of the free list (0 = none)
//! └── borrowed views
//!     ├── Iter / StackView               read-only walk from a head to 0
//!     ├── CursorMut                      in-place mutation, one node at a time
//!     └── StackDump                      "value,next --> ... end"
//! ```
//!
//! # Error policy
//!
//! Every operation that needs a node (`pop`, `value`, `next` and their
//! mutable forms) returns [`PoolError::EmptyStack`] when handed the terminal
//! handle. Growth failures surface as [`PoolError::CapacityExceeded`] or
//! [`PoolError::AllocationFailed`]. Handles that were already freed are not
//! detected; using them is memory-safe but yields unrelated data.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod dump;
pub mod error;
pub mod handle;
pub mod iter;
pub mod pool;
pub mod view;

// Public re-exports for the primary API surface.
pub use config::PoolConfig;
pub use dump::StackDump;
pub use error::{PoolError, StackOp};
pub use handle::Handle;
pub use iter::{CursorMut, Iter};
pub use pool::StackPool;
pub use view::StackView;
