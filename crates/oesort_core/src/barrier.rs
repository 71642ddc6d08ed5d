//! # Barrier Phase Executor
//!
//! A controller thread drives every worker through the same phase in
//! lock-step. One full barrier per phase, O(n/k) work per worker per phase.
//!
//! ## Architecture
//!
//! ```text
//!              ┌────────────────────────────────────┐
//!              │            Controller              │
//!              │  flip parity → dispatch all → wait │
//!              └──────┬───────────────────▲─────────┘
//!        PhaseGate    │                   │   Tally (done count)
//!      (pending[b])   ▼                   │
//!   ┌──────────┐ ┌──────────┐       ┌──────────┐
//!   │ Worker 0 │ │ Worker 1 │  ...  │ Worker k │
//!   └──────────┘ └──────────┘       └──────────┘
//! ```
//!
//! Workers states: WaitingForWork → Working → WaitingForWork ... → Done.
//!
//! All pairs of one parity are disjoint, so no cell is ever touched by two
//! workers inside a phase and no per-block lock is needed.

#![allow(unsafe_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use parking_lot::{Condvar, Mutex};

use crate::config::Strategy;
use crate::error::{SortError, SortResult};
use crate::kernel::Parity;
use crate::partition::Partition;
use crate::report::{ReportDetail, SortReport};
use crate::sync::workers::{join_all, spawn};
use crate::sync::{PanicSentinel, SharedSlice, Tally, TallyWait};

/// Consecutive swap-free phases that prove the array sorted (one per parity).
const QUIET_PHASES_TO_STOP: u32 = 2;

#[derive(Debug)]
struct GateState {
    /// `pending[b]`: worker b has been dispatched and not yet picked the phase up.
    pending: Vec<bool>,
    parity: Parity,
    shutdown: bool,
}

/// Per-worker "dispatched" condition, shared under one lock.
#[derive(Debug)]
struct PhaseGate {
    state: Mutex<GateState>,
    dispatched: Condvar,
}

impl PhaseGate {
    fn new(workers: usize) -> Self {
        Self {
            state: Mutex::new(GateState {
                pending: vec![false; workers],
                parity: Parity::Even,
                shutdown: false,
            }),
            dispatched: Condvar::new(),
        }
    }

    /// Releases every worker into a phase of `parity`.
    fn dispatch(&self, parity: Parity) {
        let mut state = self.state.lock();
        state.parity = parity;
        state.pending.fill(true);
        self.dispatched.notify_all();
    }

    /// Releases every worker for exit.
    fn shutdown(&self) {
        let mut state = self.state.lock();
        state.shutdown = true;
        self.dispatched.notify_all();
    }

    /// Blocks worker `b` until dispatched; `None` means shut down.
    fn wait_for_work(&self, b: usize) -> Option<Parity> {
        let mut state = self.state.lock();
        while !state.pending[b] && !state.shutdown {
            self.dispatched.wait(&mut state);
        }
        if state.shutdown {
            return None;
        }
        state.pending[b] = false;
        Some(state.parity)
    }
}

/// Per-run context shared by the controller and all workers.
struct BarrierRun<'a, T> {
    cells: SharedSlice<'a, T>,
    partition: Partition,
    gate: PhaseGate,
    done: Tally,
    /// Monotone within a phase: workers only ever set it.
    swapped: AtomicBool,
}

impl<T: Ord + Send> BarrierRun<'_, T> {
    /// Worker body for block `b`. Returns its swap count.
    fn work(&self, b: usize) -> u64 {
        let _sentinel = PanicSentinel::new(|| self.done.fail());

        let block = self.partition.block(b);
        let pairs = block.pairs(self.cells.len());
        let mut swaps = 0;

        while let Some(parity) = self.gate.wait_for_work(b) {
            // SAFETY: Every worker runs the same parity, whose pairs are
            // pairwise disjoint; this block's pairs start inside it.
            let phase_swaps = unsafe { self.cells.sweep(parity.align(pairs.start), pairs.end) };
            if phase_swaps > 0 {
                self.swapped.store(true, Ordering::Relaxed);
            }
            swaps += phase_swaps;
            self.done.increment();
        }

        swaps
    }

    /// Drives phases until two in a row swap nothing. Returns the phase count.
    fn control(&self) -> SortResult<u64> {
        let mut parity = Parity::Even;
        let mut phases = 0u64;
        let mut quiet = 0u32;

        while quiet < QUIET_PHASES_TO_STOP {
            parity = parity.flip();
            // No worker is running: the reset cannot race a setter
            self.swapped.store(false, Ordering::Relaxed);
            self.gate.dispatch(parity);
            if self.done.wait_and_reset() == TallyWait::Failed {
                return Err(SortError::execution("barrier worker failed"));
            }
            phases += 1;

            if self.swapped.load(Ordering::Relaxed) {
                quiet = 0;
            } else {
                quiet += 1;
            }
            tracing::trace!(phases, ?parity, quiet, "phase complete");
        }

        Ok(phases)
    }
}

/// Sorts `v` in place with `workers` threads released phase by phase.
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
        return Ok(SortReport::trivial(Strategy::Barrier, workers));
    }

    let n = v.len();
    let partition = Partition::new(n, workers)?;
    let run = BarrierRun {
        cells: SharedSlice::new(v),
        partition,
        gate: PhaseGate::new(workers),
        done: Tally::new(workers),
        swapped: AtomicBool::new(false),
    };

    let (phases, per_worker) = thread::scope(|s| -> SortResult<(u64, Vec<u64>)> {
        let run = &run;
        let mut handles = Vec::with_capacity(workers);
        for b in 0..workers {
            match spawn(s, format!("oesort-barrier-{b}"), move || run.work(b)) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    run.gate.shutdown();
                    let _ = join_all(handles);
                    return Err(e);
                }
            }
        }

        let phases = run.control();
        run.gate.shutdown();
        let per_worker = join_all(handles)?;
        Ok((phases?, per_worker))
    })?;

    let swaps = per_worker.iter().sum();
    tracing::debug!(n, workers, swaps, phases, "barrier sort finished");

    Ok(SortReport {
        strategy: Strategy::Barrier,
        workers,
        blocks: workers,
        swaps,
        detail: ReportDetail::Barrier { phases },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequential;

    #[test]
    fn test_sorts_small_input() {
        let mut v = vec![5, 3, 4, 1, 2];
        sort(&mut v, 2).unwrap();
        assert_eq!(v, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_two_elements_need_both_parities() {
        // A single odd phase sees no pair here; stopping on it would leave [2, 1].
        let mut v = vec![2, 1];
        let report = sort(&mut v, 1).unwrap();
        assert_eq!(v, vec![1, 2]);
        assert_eq!(report.swaps, 1);
    }

    #[test]
    fn test_sorted_input_stops_after_one_round() {
        let mut v: Vec<u16> = (0..1000).collect();
        let report = sort(&mut v, 4).unwrap();
        assert_eq!(report.swaps, 0);
        assert_eq!(report.detail, ReportDetail::Barrier { phases: 2 });
    }

    #[test]
    fn test_matches_sequential_swap_count() {
        let input: Vec<i32> = (0..700).map(|i| (i * 131) % 257).collect();
        let mut expected = input.clone();
        let seq = sequential::sort(&mut expected);
        let mut actual = input;
        let report = sort(&mut actual, 5).unwrap();
        assert_eq!(actual, expected);
        // Lock-step phases perform exactly the same compare-swaps
        assert_eq!(report.swaps, seq.swaps);
    }

    #[test]
    fn test_gate_hands_out_each_phase_once() {
        let gate = PhaseGate::new(2);
        gate.dispatch(Parity::Odd);
        assert_eq!(gate.wait_for_work(0), Some(Parity::Odd));
        assert!(!gate.state.lock().pending[0]);
        assert!(gate.state.lock().pending[1]);
        gate.shutdown();
        assert_eq!(gate.wait_for_work(0), None);
    }
}
