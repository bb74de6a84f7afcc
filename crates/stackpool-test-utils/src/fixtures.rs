//! Payload fixtures for observing value lifetimes inside a pool.
//!
//! [`DropLedger`] hands out [`Tracked`] values and counts how many of them
//! have been dropped, so tests can pin down exactly when the pool releases
//! a payload.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts drops of the [`Tracked`] values it created.
#[derive(Clone, Debug, Default)]
pub struct DropLedger {
    drops: Arc<AtomicUsize>,
}

impl DropLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a value whose drop is recorded in this ledger.
    pub fn track(&self, id: u32) -> Tracked {
        Tracked {
            id,
            drops: Arc::clone(&self.drops),
        }
    }

    /// Number of tracked values dropped so far.
    pub fn dropped(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }
}

/// A payload that reports its own drop to a [`DropLedger`].
#[derive(Debug)]
pub struct Tracked {
    pub id: u32,
    drops: Arc<AtomicUsize>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}
