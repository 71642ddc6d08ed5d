//! # Asynchronous Block Workers
//!
//! One worker per block, no barrier. A worker sweeps its block over and
//! over, synchronizing only with its two neighbors, until the controller
//! sees every block assert local sortedness at once.
//!
//! ## Per-Sweep Protocol
//!
//! ```text
//! 1. lock own block, clear `interfered`
//! 2. two passes (offsets alternate each sweep) of compare-swap:
//!      interior pair  ─ no lock
//!      first pair     ─ locks [left, own]   marks left on swap
//!      last pair      ─ locks [right]       marks right on swap
//! 3. no swap this sweep? lock own block:
//!      not interfered and not counted → sorted = true, count += 1
//! ```
//!
//! A marked neighbor loses its sorted flag (and its place in the count)
//! before the swapping worker releases the neighbor's lock, so the count
//! can never reach the block total while an out-of-order pair remains.
//!
//! ## Shutdown
//!
//! The controller raises a relaxed `shutdown` flag once the count is full.
//! Workers may observe it late and run extra quiet sweeps; that delays exit
//! but never affects the result, which the count already established.

#![allow(unsafe_code)]

mod termination;

pub use termination::{BlockFlags, TerminationBoard};

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::config::Strategy;
use crate::error::{SortError, SortResult};
use crate::kernel::Parity;
use crate::partition::Partition;
use crate::report::{ReportDetail, SortReport};
use crate::sync::workers::{join_all, spawn};
use crate::sync::{PanicSentinel, SharedSlice, TallyWait};

/// What one worker did before shutting down.
#[derive(Clone, Copy, Debug, Default)]
struct WorkerTally {
    swaps: u64,
    settle_sweep: u64,
}

/// Per-run context shared by the controller and all workers.
struct AsyncRun<'a, T> {
    cells: SharedSlice<'a, T>,
    partition: Partition,
    board: TerminationBoard,
    /// Read without synchronization; a stale value only delays exit.
    shutdown: AtomicBool,
}

impl<'a, T: Ord + Send> AsyncRun<'a, T> {
    fn new(v: &'a mut [T], partition: Partition) -> Self {
        let blocks = partition.block_count();
        Self {
            cells: SharedSlice::new(v),
            partition,
            board: TerminationBoard::new(blocks),
            shutdown: AtomicBool::new(false),
        }
    }

    fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Worker body for block `b`.
    fn work(&self, b: usize) -> WorkerTally {
        let _sentinel = PanicSentinel::new(|| {
            self.stop();
            self.board.fail();
        });

        let mut tally = WorkerTally::default();
        let mut parity = Parity::Even;
        let mut sweeps = 0u64;

        while !self.shutdown.load(Ordering::Relaxed) {
            sweeps += 1;
            self.board.begin_sweep(b);
            let swaps = self.sweep(b, parity);
            parity = parity.flip();
            tally.swaps += swaps;

            if swaps == 0 && self.board.try_settle(b) {
                tally.settle_sweep = sweeps;
                tracing::trace!(block = b, sweep = sweeps, "block settled");
            }
        }

        tally
    }

    /// Both passes over block `b`, starting with offset `first`.
    ///
    /// Returns the number of swaps.
    fn sweep(&self, b: usize, first: Parity) -> u64 {
        let block = self.partition.block(b);
        let pairs = block.pairs(self.cells.len());
        let has_left = self.partition.has_left(b);
        let has_right = self.partition.has_right(b);

        let mut swaps = 0;
        for offset in [first.offset(), first.flip().offset()] {
            let mut i = pairs.start + offset;
            while i < pairs.end {
                let at_left = has_left && i == block.start;
                let at_right = has_right && i + 1 == block.end;
                let swapped = match (at_left, at_right) {
                    // SAFETY: Cells i and i + 1 lie strictly inside the block
                    // (or at index 0), which no other worker reaches.
                    (false, false) => unsafe { self.cells.compare_swap(i) },
                    (true, false) => self.swap_first_pair(b, i),
                    (false, true) => self.swap_last_pair(b, i),
                    (true, true) => self.swap_lone_pair(b, i),
                };
                swaps += u64::from(swapped);
                i += 2;
            }
        }
        swaps
    }

    /// Pair `(start, start + 1)`: cell `start` is shared with the left neighbor.
    fn swap_first_pair(&self, b: usize, i: usize) -> bool {
        let mut left = self.board.lock(b - 1);
        let _own = self.board.lock(b);
        // SAFETY: Cell i is guarded by the own lock, held; cell i + 1 is
        // interior to the block.
        let swapped = unsafe { self.cells.compare_swap(i) };
        if swapped {
            self.board.interfere(&mut left);
        }
        swapped
    }

    /// Pair `(end - 1, end)`: cell `end` belongs to the right neighbor.
    fn swap_last_pair(&self, b: usize, i: usize) -> bool {
        let mut right = self.board.lock(b + 1);
        // SAFETY: Cell i + 1 is guarded by the right neighbor's lock, held;
        // cell i is interior to the block.
        let swapped = unsafe { self.cells.compare_swap(i) };
        if swapped {
            self.board.interfere(&mut right);
        }
        swapped
    }

    /// One-cell block: its only pair touches both neighbors.
    fn swap_lone_pair(&self, b: usize, i: usize) -> bool {
        let mut left = self.board.lock(b - 1);
        let _own = self.board.lock(b);
        let mut right = self.board.lock(b + 1);
        // SAFETY: Cell i is guarded by the own lock and cell i + 1 by the
        // right neighbor's lock, both held.
        let swapped = unsafe { self.cells.compare_swap(i) };
        if swapped {
            self.board.interfere(&mut left);
            self.board.interfere(&mut right);
        }
        swapped
    }
}

/// Sorts `v` in place with one lock-synchronized worker per block.
///
/// Inputs shorter than two elements return at once without spawning.
///
/// # Errors
///
/// - `InvalidConfiguration` if `workers` is zero or exceeds `v.len()`.
/// - `ExecutionFailure` if a worker cannot be spawned or panics.
pub fn sort<T: Ord + Send>(v: &mut [T], workers: usize) -> SortResult<SortReport> {
    if workers == 0 {
        return Err(SortError::invalid("worker count must be positive"));
    }
    if v.len() < 2 {
        return Ok(SortReport::trivial(Strategy::Async, workers));
    }

    let n = v.len();
    let partition = Partition::new(n, workers)?;
    let run = AsyncRun::new(v, partition);

    let tallies = thread::scope(|s| -> SortResult<Vec<WorkerTally>> {
        let run = &run;
        let mut handles = Vec::with_capacity(workers);
        for b in 0..workers {
            match spawn(s, format!("oesort-async-{b}"), move || run.work(b)) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    run.stop();
                    // Already failing: the spawn error is the one to report
                    let _ = join_all(handles);
                    return Err(e);
                }
            }
        }

        let outcome = run.board.wait();
        run.stop();
        let tallies = join_all(handles)?;
        match outcome {
            TallyWait::Reached => Ok(tallies),
            TallyWait::Failed => Err(SortError::execution("async worker failed")),
        }
    })?;

    let swaps = tallies.iter().map(|t| t.swaps).sum();
    let settle_sweeps: Vec<u64> = tallies.iter().map(|t| t.settle_sweep).collect();
    let revocations = run.board.revocations();

    tracing::debug!(n, workers, swaps, revocations, "async sort finished");

    Ok(SortReport {
        strategy: Strategy::Async,
        workers,
        blocks: workers,
        swaps,
        detail: ReportDetail::Async {
            settle_sweeps,
            revocations,
        },
    })
}
