//! Test utilities and fixtures for stackpool development.
//!
//! Provides helpers for building and reading back stacks, a drop-counting
//! value type for checking when a pool releases payloads, and one-shot
//! tracing setup for tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use stackpool::{Handle, PoolError, StackPool};
use tracing_subscriber::EnvFilter;

pub use fixtures::{DropLedger, Tracked};

/// Push `values` in order onto the stack `head` and return the new top.
///
/// The last value ends up on top.
pub fn push_all<T, N, I>(pool: &mut StackPool<T, N>, head: N, values: I) -> Result<N, PoolError>
where
    N: Handle,
    I: IntoIterator<Item = T>,
{
    values
        .into_iter()
        .try_fold(head, |top, value| pool.push(value, top))
}

/// Build a fresh stack holding `values`, last value on top.
pub fn build_stack<T, N, I>(pool: &mut StackPool<T, N>, values: I) -> N
where
    N: Handle,
    I: IntoIterator<Item = T>,
{
    let head = pool.new_stack();
    push_all(pool, head, values).expect("test stack fits in pool")
}

/// Clone the values of the stack `head`, top first.
pub fn collect<T: Clone, N: Handle>(pool: &StackPool<T, N>, head: N) -> Vec<T> {
    pool.iter(head).cloned().collect()
}

/// Install a test-writer subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
