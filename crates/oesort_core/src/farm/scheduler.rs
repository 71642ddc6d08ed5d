//! # Farm Scheduler
//!
//! The master's bookkeeping: pass counters and busy flags, owned by one
//! thread and never shared.
//!
//! ## Eligibility
//!
//! Block b may be dispatched iff
//!
//! ```text
//! !busy[b]  &&  passes[b] < n  &&  passes[b] <= passes[b - 1]  &&  passes[b] <= passes[b + 1]
//! ```
//!
//! A block therefore never starts pass k before both neighbors finished
//! pass k - 1, and never while a neighbor runs pass k + 1. Adjacent blocks
//! in flight always run the same pass number, hence the same parity, hence
//! disjoint pairs; the run replays n lock-step phases without a barrier.

use crate::kernel::Parity;

/// One block-pass handed to a worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Task {
    /// Block to sweep.
    pub block: usize,
    /// Parity of the pass, `passes[block] % 2`.
    pub parity: Parity,
}

/// What the master does after a completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Send these tasks (possibly none) and keep waiting.
    Dispatch(Vec<Task>),
    /// Every block completed its last pass.
    Done,
    /// Nothing in flight, nothing eligible, not done.
    Stalled,
}

/// Pass counters and busy flags for `blocks` blocks.
#[derive(Clone, Debug)]
pub struct FarmScheduler {
    passes: Vec<usize>,
    busy: Vec<bool>,
    /// Passes each block must complete (the array length).
    target: usize,
    total: usize,
    in_flight: usize,
    max_skew: usize,
}

impl FarmScheduler {
    /// Creates a scheduler where each of `blocks` blocks needs `target` passes.
    #[must_use]
    pub fn new(blocks: usize, target: usize) -> Self {
        Self {
            passes: vec![0; blocks],
            busy: vec![false; blocks],
            target,
            total: 0,
            in_flight: 0,
            max_skew: 0,
        }
    }

    /// Initial emission: one task per block.
    pub fn start(&mut self) -> Vec<Task> {
        self.dispatch_eligible()
    }

    /// Records that `block` finished its pass and decides what to send next.
    ///
    /// # Panics
    ///
    /// Panics if `block` was not in flight.
    pub fn complete(&mut self, block: usize) -> Step {
        assert!(self.busy[block], "block {block} completed while idle");
        self.busy[block] = false;
        self.in_flight -= 1;
        self.passes[block] += 1;
        self.total += 1;
        self.track_skew(block);

        if self.is_done() {
            return Step::Done;
        }

        let tasks = self.dispatch_eligible();
        if tasks.is_empty() && self.in_flight == 0 {
            return Step::Stalled;
        }
        Step::Dispatch(tasks)
    }

    /// True once `total == target * blocks`, which given `passes[b] <= target`
    /// means every block completed exactly `target` passes.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.total == self.target * self.passes.len()
    }

    /// Completed passes per block.
    #[must_use]
    pub fn passes(&self) -> &[usize] {
        &self.passes
    }

    /// Sum of completed passes.
    #[must_use]
    pub const fn total_passes(&self) -> usize {
        self.total
    }

    /// Largest `|passes[b] - passes[b + 1]|` seen after any completion.
    #[must_use]
    pub const fn max_skew(&self) -> usize {
        self.max_skew
    }

    /// Tasks sent and not yet completed.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn is_eligible(&self, b: usize) -> bool {
        let p = self.passes[b];
        let left_ok = b == 0 || p <= self.passes[b - 1];
        let right_ok = b + 1 == self.passes.len() || p <= self.passes[b + 1];
        !self.busy[b] && p < self.target && left_ok && right_ok
    }

    /// Scans every block once and dispatches the eligible ones.
    fn dispatch_eligible(&mut self) -> Vec<Task> {
        let eligible: Vec<usize> = (0..self.passes.len())
            .filter(|&b| self.is_eligible(b))
            .collect();
        eligible.into_iter().map(|b| self.dispatch(b)).collect()
    }

    fn dispatch(&mut self, b: usize) -> Task {
        self.busy[b] = true;
        self.in_flight += 1;
        tracing::trace!(block = b, pass = self.passes[b], "dispatch");
        Task {
            block: b,
            parity: Parity::of_pass(self.passes[b]),
        }
    }

    fn track_skew(&mut self, b: usize) {
        let p = self.passes[b];
        if b > 0 {
            self.max_skew = self.max_skew.max(p.abs_diff(self.passes[b - 1]));
        }
        if b + 1 < self.passes.len() {
            self.max_skew = self.max_skew.max(p.abs_diff(self.passes[b + 1]));
        }
    }
}
