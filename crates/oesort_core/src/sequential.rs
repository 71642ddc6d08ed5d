//! # Sequential Baseline
//!
//! Single-threaded odd-even transposition sort. Slow, obviously correct,
//! and the oracle every parallel strategy is checked against.

use crate::config::Strategy;
use crate::kernel::{phase, Parity};
use crate::report::{ReportDetail, SortReport};

/// Sorts `v` in place: odd phase, even phase, until a round swaps nothing.
pub fn sort<T: Ord>(v: &mut [T]) -> SortReport {
    let mut swaps = 0;
    let mut rounds = 0;
    loop {
        rounds += 1;
        let round_swaps = phase(v, Parity::Odd) + phase(v, Parity::Even);
        swaps += round_swaps;
        if round_swaps == 0 {
            break;
        }
    }

    tracing::debug!(n = v.len(), swaps, rounds, "sequential sort finished");

    SortReport {
        strategy: Strategy::Sequential,
        workers: 1,
        blocks: 1,
        swaps,
        detail: ReportDetail::Rounds { rounds },
    }
}
