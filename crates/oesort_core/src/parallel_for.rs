//! # Parallel-For Baseline
//!
//! Every phase is one parallel loop over the disjoint pairs of its parity.
//! The pool's join at the end of each loop is the implicit barrier, so no
//! cell is ever shared and no unsafe code is needed.

use rayon::prelude::*;

use crate::config::Strategy;
use crate::error::{SortError, SortResult};
use crate::kernel::Parity;
use crate::report::{ReportDetail, SortReport};

/// Pairs handed to one pool task at minimum.
const MIN_PAIRS_PER_TASK: usize = 512;

/// Sorts `v` in place on a dedicated pool of `workers` threads.
///
/// # Errors
///
/// `ExecutionFailure` if the pool cannot be built.
pub fn sort<T: Ord + Send>(v: &mut [T], workers: usize) -> SortResult<SortReport> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("oesort-pf-{i}"))
        .build()
        .map_err(|e| SortError::execution(format!("failed to build pool: {e}")))?;

    let (swaps, rounds) = pool.install(|| {
        let mut swaps = 0;
        let mut rounds = 0;
        loop {
            rounds += 1;
            let round_swaps = parallel_phase(v, Parity::Odd) + parallel_phase(v, Parity::Even);
            swaps += round_swaps;
            if round_swaps == 0 {
                break (swaps, rounds);
            }
        }
    });

    tracing::debug!(n = v.len(), workers, swaps, rounds, "parallel-for sort finished");

    Ok(SortReport {
        strategy: Strategy::ParallelFor,
        workers,
        blocks: 0,
        swaps,
        detail: ReportDetail::Rounds { rounds },
    })
}

fn parallel_phase<T: Ord + Send>(v: &mut [T], parity: Parity) -> u64 {
    let start = parity.offset().min(v.len());
    v[start..]
        .par_chunks_mut(2)
        .with_min_len(MIN_PAIRS_PER_TASK)
        .map(|pair| {
            if pair.len() == 2 && pair[1] < pair[0] {
                pair.swap(0, 1);
                1
            } else {
                0
            }
        })
        .sum()
}
