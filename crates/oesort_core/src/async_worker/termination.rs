//! # Termination Board
//!
//! Distributed detection of global sortedness without a barrier.
//!
//! ## Invariant
//!
//! `sorted[b]` is true iff, since the start of block b's last sweep, no
//! out-of-order pair was found in b and no neighbor swapped a cell that
//! one of b's pairs reads. All flags true at once implies the array is
//! sorted, so the sorted-count reaching the block count ends the run.
//!
//! ## Lock Order
//!
//! ```text
//! block lock 0 < block lock 1 < ... < block lock k-1 < count lock
//! ```
//!
//! Block locks are always taken in ascending index order, and the count
//! lock (inside [`Tally`]) is always innermost.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, MutexGuard};

use crate::sync::{Tally, TallyWait};

/// Flags guarded by one block lock.
///
/// The same lock also guards the block's first array cell, the one its
/// left neighbor's last pair reaches into.
#[derive(Debug, Default)]
pub struct BlockFlags {
    /// The block asserts local sortedness and is counted.
    pub sorted: bool,
    /// A neighbor swapped one of this block's cells since its sweep began.
    pub interfered: bool,
}

/// Per-block flags plus the global sorted-count.
#[derive(Debug)]
pub struct TerminationBoard {
    flags: Vec<Mutex<BlockFlags>>,
    sorted_count: Tally,
    revocations: AtomicU64,
}

impl TerminationBoard {
    /// Creates a board for `blocks` blocks, none sorted.
    #[must_use]
    pub fn new(blocks: usize) -> Self {
        Self {
            flags: (0..blocks).map(|_| Mutex::new(BlockFlags::default())).collect(),
            sorted_count: Tally::new(blocks),
            revocations: AtomicU64::new(0),
        }
    }

    /// Acquires block `b`'s lock.
    #[inline]
    pub fn lock(&self, b: usize) -> MutexGuard<'_, BlockFlags> {
        self.flags[b].lock()
    }

    /// Starts a sweep of block `b`: forget interference from before it.
    pub fn begin_sweep(&self, b: usize) {
        self.lock(b).interfered = false;
    }

    /// Records that a neighbor swapped a cell `flags` guards.
    ///
    /// Revokes the block's sortedness if it was asserted. Must be called
    /// with the block's lock held, which `&mut BlockFlags` proves.
    pub fn interfere(&self, flags: &mut BlockFlags) {
        flags.interfered = true;
        if flags.sorted {
            flags.sorted = false;
            self.sorted_count.decrement();
            self.revocations.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("sortedness revoked");
        }
    }

    /// Asserts local sortedness for block `b` after a sweep with no swap.
    ///
    /// Refused if a neighbor interfered during the sweep. Returns true if
    /// the block was newly counted.
    pub fn try_settle(&self, b: usize) -> bool {
        let mut flags = self.lock(b);
        if flags.interfered || flags.sorted {
            return false;
        }
        flags.sorted = true;
        self.sorted_count.increment();
        true
    }

    /// Whether block `b` currently asserts sortedness.
    #[must_use]
    pub fn is_settled(&self, b: usize) -> bool {
        self.lock(b).sorted
    }

    /// Blocks currently asserting sortedness.
    #[must_use]
    pub fn settled_count(&self) -> usize {
        self.sorted_count.count()
    }

    /// Sortedness claims withdrawn so far.
    #[must_use]
    pub fn revocations(&self) -> u64 {
        self.revocations.load(Ordering::Relaxed)
    }

    /// Blocks until every block asserts sortedness or a worker fails.
    pub fn wait(&self) -> TallyWait {
        self.sorted_count.wait()
    }

    /// Wakes the waiter with a failure.
    pub fn fail(&self) {
        self.sorted_count.fail();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_sweep_settles() {
        let board = TerminationBoard::new(2);
        board.begin_sweep(0);
        assert!(board.try_settle(0));
        assert!(board.is_settled(0));
        assert_eq!(board.settled_count(), 1);
    }

    #[test]
    fn test_settle_counts_once() {
        let board = TerminationBoard::new(2);
        assert!(board.try_settle(1));
        board.begin_sweep(1);
        assert!(!board.try_settle(1));
        assert_eq!(board.settled_count(), 1);
    }

    #[test]
    fn test_interference_during_sweep_blocks_settle() {
        let board = TerminationBoard::new(2);

        // Block 1 starts a sweep and finds nothing out of order...
        board.begin_sweep(1);
        // ...while block 0 swaps across their shared boundary in the same instant.
        board.interfere(&mut board.lock(1));

        assert!(!board.try_settle(1));
        assert_eq!(board.settled_count(), 0);

        // Only a fresh sweep with no new interference may settle.
        board.begin_sweep(1);
        assert!(board.try_settle(1));
    }

    #[test]
    fn test_interference_revokes_settled_block() {
        let board = TerminationBoard::new(3);
        assert!(board.try_settle(0));
        assert!(board.try_settle(1));
        assert_eq!(board.settled_count(), 2);

        board.interfere(&mut board.lock(1));

        assert!(!board.is_settled(1));
        assert_eq!(board.settled_count(), 1);
        assert_eq!(board.revocations(), 1);
    }

    #[test]
    fn test_interference_on_unsettled_block_is_not_a_revocation() {
        let board = TerminationBoard::new(2);
        board.interfere(&mut board.lock(0));
        assert_eq!(board.revocations(), 0);
    }

    #[test]
    fn test_wait_returns_when_all_settled() {
        let board = TerminationBoard::new(2);
        std::thread::scope(|s| {
            s.spawn(|| {
                board.try_settle(0);
                board.try_settle(1);
            });
            assert_eq!(board.wait(), TallyWait::Reached);
        });
    }
}
