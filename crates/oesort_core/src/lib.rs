//! # OESORT Core
//!
//! In-place odd-even transposition sort under five synchronization
//! disciplines, all producing the same ascending order:
//! - **Sequential**: single-threaded oracle
//! - **Parallel-for**: one pool loop per phase
//! - **Async**: per-block locks, no barrier, distributed termination
//! - **Barrier**: controller-driven lock-step phases
//! - **Farm**: master/worker dispatch paced by neighbor fairness
//!
//! ## Architecture Rules
//!
//! 1. **Unsafe code lives in one place** - [`sync::SharedSlice`] is the only
//!    type that hands out aliased cells
//! 2. **Ascending lock order** - block locks low to high, counters innermost
//! 3. **Worker panics are errors** - never hangs, never aborts the caller
//!
//! ## Example
//!
//! ```rust
//! use oesort_core::{sort, SortConfig, Strategy};
//!
//! let mut v = vec![5, 3, 4, 1, 2];
//! let report = sort(&SortConfig::new(Strategy::Farm, 2), &mut v).unwrap();
//! assert_eq!(v, vec![1, 2, 3, 4, 5]);
//! assert_eq!(report.blocks, 4);
//! ```

#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod async_worker;
pub mod barrier;
pub mod config;
pub mod error;
pub mod farm;
pub mod kernel;
pub mod parallel_for;
pub mod partition;
pub mod report;
pub mod sequential;
pub mod sync;

pub use config::{SortConfig, Strategy};
pub use error::{SortError, SortResult};
pub use kernel::{is_sorted, Parity};
pub use partition::{Block, Partition};
pub use report::{ReportDetail, SortReport};

/// Sorts `v` ascending in place with the discipline `config` selects.
///
/// The configuration is validated against `v.len()` before any thread is
/// spawned. Inputs shorter than two elements return a report with no work.
///
/// # Errors
///
/// - `InvalidConfiguration` if the worker or block count does not fit `v`.
/// - `ExecutionFailure` if a worker cannot be spawned or panics. `v` then
///   holds some permutation of its input.
pub fn sort<T: Ord + Send>(config: &SortConfig, v: &mut [T]) -> SortResult<SortReport> {
    config.validate(v.len())?;
    tracing::debug!(
        strategy = %config.strategy,
        n = v.len(),
        workers = config.workers,
        blocks = config.block_count(),
        "sort starting"
    );
    if v.len() < 2 {
        return Ok(SortReport::trivial(config.strategy, config.workers));
    }

    let workers = config.workers;
    match config.strategy {
        Strategy::Sequential => Ok(sequential::sort(v)),
        Strategy::ParallelFor => parallel_for::sort(v, workers),
        Strategy::Async => async_worker::sort(v, workers),
        Strategy::Barrier => barrier::sort(v, workers),
        Strategy::Farm => farm::sort(v, workers, config.block_count()),
    }
}
