//! # Farm Scheduler
//!
//! A master thread hands block-passes to a pool of interchangeable workers
//! over channels. Blocks advance at their own pace, bounded by their
//! neighbors, instead of in global lock-step.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌─────────────────────────────┐
//!                 │           Master            │
//!                 │  FarmScheduler (not shared) │
//!                 └──────┬───────────────▲──────┘
//!          tasks (Task)  │               │  feedback (Completed / Failed)
//!                        ▼               │
//!   ┌──────────┐ ┌──────────┐       ┌──────────┐
//!   │ Worker 0 │ │ Worker 1 │  ...  │ Worker w │   any worker, any block
//!   └──────────┘ └──────────┘       └──────────┘
//! ```
//!
//! Every block runs exactly n passes, where n is the array length. Because
//! neighbors in flight always run the same pass, the execution is
//! equivalent to n lock-step phases, which sort any input.

#![allow(unsafe_code)]

pub mod scheduler;

pub use scheduler::{FarmScheduler, Step, Task};

use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::config::Strategy;
use crate::error::{SortError, SortResult};
use crate::partition::Partition;
use crate::report::{ReportDetail, SortReport};
use crate::sync::workers::{join_all, spawn};
use crate::sync::{PanicSentinel, SharedSlice};

/// Worker-to-master message.
#[derive(Clone, Copy, Debug)]
enum Feedback {
    Completed { block: usize, swaps: u64 },
    Failed,
}

/// Shared by every worker; the scheduler stays with the master.
struct FarmRun<'a, T> {
    cells: SharedSlice<'a, T>,
    partition: Partition,
}

impl<T: Ord + Send> FarmRun<'_, T> {
    /// Worker body: run tasks until the master hangs up.
    fn work(&self, tasks: &Receiver<Task>, feedback: &Sender<Feedback>) {
        let _sentinel = PanicSentinel::new(|| {
            let _ = feedback.send(Feedback::Failed);
        });

        for task in tasks {
            let pairs = self.partition.block(task.block).pairs(self.cells.len());
            // SAFETY: The master only runs a block while each neighbor is idle
            // or on the same pass; same-parity pairs never share a cell.
            let swaps = unsafe { self.cells.sweep(task.parity.align(pairs.start), pairs.end) };
            if feedback
                .send(Feedback::Completed {
                    block: task.block,
                    swaps,
                })
                .is_err()
            {
                break;
            }
        }
    }
}

/// Master loop: feed workers until every block ran its last pass.
///
/// Returns the swaps reported by the workers.
fn drive(
    scheduler: &mut FarmScheduler,
    tasks: &Sender<Task>,
    feedback: &Receiver<Feedback>,
) -> SortResult<u64> {
    let send_all = |batch: Vec<Task>| -> SortResult<()> {
        for task in batch {
            tasks
                .send(task)
                .map_err(|_| SortError::execution("farm workers hung up"))?;
        }
        Ok(())
    };

    send_all(scheduler.start())?;
    let mut swaps = 0;
    loop {
        match feedback.recv() {
            Ok(Feedback::Completed { block, swaps: s }) => {
                swaps += s;
                match scheduler.complete(block) {
                    Step::Done => return Ok(swaps),
                    Step::Dispatch(batch) => send_all(batch)?,
                    Step::Stalled => return Err(SortError::execution("farm scheduler stalled")),
                }
            }
            Ok(Feedback::Failed) | Err(_) => {
                return Err(SortError::execution("farm worker failed"));
            }
        }
    }
}

/// Sorts `v` in place by farming `blocks` blocks out to `workers` threads.
///
/// Inputs shorter than two elements return at once without spawning.
///
/// # Errors
///
/// - `InvalidConfiguration` if `workers` or `blocks` is zero, or `blocks`
///   exceeds `v.len()`.
/// - `ExecutionFailure` if a worker cannot be spawned or panics.
pub fn sort<T: Ord + Send>(v: &mut [T], workers: usize, blocks: usize) -> SortResult<SortReport> {
    if workers == 0 {
        return Err(SortError::invalid("worker count must be positive"));
    }
    if blocks == 0 {
        return Err(SortError::invalid("block count must be positive"));
    }
    if v.len() < 2 {
        return Ok(SortReport::trivial(Strategy::Farm, workers));
    }

    let n = v.len();
    let partition = Partition::new(n, blocks)?;
    let run = FarmRun {
        cells: SharedSlice::new(v),
        partition,
    };
    let mut scheduler = FarmScheduler::new(blocks, n);

    let swaps = thread::scope(|s| -> SortResult<u64> {
        let run = &run;
        // In flight never exceeds one task per block, so neither channel fills.
        let (task_tx, task_rx) = bounded::<Task>(blocks);
        let (feedback_tx, feedback_rx) = bounded::<Feedback>(blocks + workers);

        let mut handles = Vec::with_capacity(workers);
        for w in 0..workers {
            let tasks = task_rx.clone();
            let feedback = feedback_tx.clone();
            match spawn(s, format!("oesort-farm-{w}"), move || {
                run.work(&tasks, &feedback);
            }) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    drop(task_tx);
                    let _ = join_all(handles);
                    return Err(e);
                }
            }
        }
        // Only workers hold feedback senders now: all of them gone means disconnect
        drop(feedback_tx);
        drop(task_rx);

        let outcome = drive(&mut scheduler, &task_tx, &feedback_rx);
        drop(task_tx);
        join_all(handles)?;
        outcome
    })?;

    tracing::debug!(
        n,
        workers,
        blocks,
        swaps,
        max_skew = scheduler.max_skew(),
        "farm sort finished"
    );

    Ok(SortReport {
        strategy: Strategy::Farm,
        workers,
        blocks,
        swaps,
        detail: ReportDetail::Farm {
            passes: scheduler.passes().to_vec(),
            total_passes: scheduler.total_passes(),
            max_skew: scheduler.max_skew(),
        },
    })
}
