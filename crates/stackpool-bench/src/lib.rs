//! Benchmark workloads for stackpool.
//!
//! Provides deterministic operation sequences for benchmarks:
//!
//! - [`reference_profile`]: 16 stacks, 10K operations
//! - [`stress_profile`]: 256 stacks, 1M operations
//! - [`churn_ops`]: expands a profile into a push/pop/free sequence
//! - [`run_churn`]: replays a sequence against a pool

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use stackpool::{Handle, PoolError, StackPool};

/// Shape of a mixed push/pop workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChurnProfile {
    /// Number of stacks drawn from the pool.
    pub stacks: usize,
    /// Number of operations to generate.
    pub ops: usize,
    /// Out of 16 operations, how many are pushes. The rest are pops, except
    /// that every 64th operation frees a whole stack.
    pub push_weight: u8,
    /// Seed for the operation sequence.
    pub seed: u64,
}

/// One step of a churn workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChurnOp {
    /// Push `value` onto stack `stack`.
    Push { stack: usize, value: u64 },
    /// Pop stack `stack` if it is not empty.
    Pop { stack: usize },
    /// Free every node of stack `stack`.
    Free { stack: usize },
}

/// Reference workload: 16 stacks, 10K operations, push-heavy.
pub fn reference_profile(seed: u64) -> ChurnProfile {
    ChurnProfile {
        stacks: 16,
        ops: 10_000,
        push_weight: 10,
        seed,
    }
}

/// Stress workload: 256 stacks, 1M operations, balanced.
pub fn stress_profile(seed: u64) -> ChurnProfile {
    ChurnProfile {
        stacks: 256,
        ops: 1_000_000,
        push_weight: 8,
        seed,
    }
}

/// Expand a profile into its deterministic operation sequence.
pub fn churn_ops(profile: &ChurnProfile) -> Vec<ChurnOp> {
    let stacks = profile.stacks.max(1) as u64;
    let mut state = profile.seed;
    let mut ops = Vec::with_capacity(profile.ops);

    for i in 0..profile.ops {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let bits = state >> 33;
        let stack = (bits % stacks) as usize;

        let op = if i % 64 == 63 {
            ChurnOp::Free { stack }
        } else if (bits >> 16) % 16 < u64::from(profile.push_weight) {
            ChurnOp::Push { stack, value: bits }
        } else {
            ChurnOp::Pop { stack }
        };
        ops.push(op);
    }

    ops
}

/// Replay `ops` against `pool` and return the final head of every stack.
///
/// Pops on empty stacks are skipped. Fails only if the pool cannot grow.
pub fn run_churn<N: Handle>(
    pool: &mut StackPool<u64, N>,
    stacks: usize,
    ops: &[ChurnOp],
) -> Result<Vec<N>, PoolError> {
    let mut heads = vec![pool.new_stack(); stacks.max(1)];

    for op in ops {
        match *op {
            ChurnOp::Push { stack, value } => {
                heads[stack] = pool.push(value, heads[stack])?;
            }
            ChurnOp::Pop { stack } => {
                if !pool.is_empty(heads[stack]) {
                    heads[stack] = pool.pop(heads[stack])?;
                }
            }
            ChurnOp::Free { stack } => {
                heads[stack] = pool.free_stack(heads[stack]);
            }
        }
    }

    Ok(heads)
}

/// Replay `ops` against one `Vec` per stack, as a baseline.
pub fn run_churn_vecs(stacks: usize, ops: &[ChurnOp]) -> Vec<Vec<u64>> {
    let mut model = vec![Vec::new(); stacks.max(1)];

    for op in ops {
        match *op {
            ChurnOp::Push { stack, value } => model[stack].push(value),
            ChurnOp::Pop { stack } => {
                model[stack].pop();
            }
            ChurnOp::Free { stack } => model[stack].clear(),
        }
    }

    model
}
