//! # Run Reports
//!
//! What a sort call observed about its own execution.

use crate::config::Strategy;

/// Summary of one sort call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortReport {
    /// Strategy that ran.
    pub strategy: Strategy,
    /// Worker threads used (1 for the sequential baseline).
    pub workers: usize,
    /// Blocks the array was split into; zero when the pool splits the work itself.
    pub blocks: usize,
    /// Total swaps performed.
    pub swaps: u64,
    /// Strategy-specific counters.
    pub detail: ReportDetail,
}

/// Strategy-specific counters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportDetail {
    /// Sequential or parallel-for: odd+even rounds, the final quiet one included.
    Rounds {
        /// Number of rounds.
        rounds: u64,
    },
    /// Lock-based async workers.
    Async {
        /// Per block, the 1-based sweep at which it last asserted local sortedness.
        settle_sweeps: Vec<u64>,
        /// Sortedness claims withdrawn because of neighbor interference.
        revocations: u64,
    },
    /// Barrier executor.
    Barrier {
        /// Phases dispatched by the controller.
        phases: u64,
    },
    /// Farm scheduler.
    Farm {
        /// Completed passes per block.
        passes: Vec<usize>,
        /// Sum of `passes`.
        total_passes: usize,
        /// Largest adjacent pass-count divergence observed by the master.
        max_skew: usize,
    },
}

impl SortReport {
    /// Report for an input too short to need any work.
    #[must_use]
    pub fn trivial(strategy: Strategy, workers: usize) -> Self {
        let detail = match strategy {
            Strategy::Sequential | Strategy::ParallelFor => ReportDetail::Rounds { rounds: 0 },
            Strategy::Async => ReportDetail::Async {
                settle_sweeps: Vec::new(),
                revocations: 0,
            },
            Strategy::Barrier => ReportDetail::Barrier { phases: 0 },
            Strategy::Farm => ReportDetail::Farm {
                passes: Vec::new(),
                total_passes: 0,
                max_skew: 0,
            },
        };
        Self {
            strategy,
            workers,
            blocks: 0,
            swaps: 0,
            detail,
        }
    }
}
