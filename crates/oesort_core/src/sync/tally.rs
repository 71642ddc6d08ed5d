//! # Tally
//!
//! A counter behind its own lock with a single "target reached" condition.
//! The async workers use it as the global sorted-count, the barrier
//! controller as its phase-completion count.

use parking_lot::{Condvar, Mutex};

/// Outcome of waiting on a [`Tally`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TallyWait {
    /// The count reached the target.
    Reached,
    /// A worker raised the failure flag before the target was reached.
    Failed,
}

#[derive(Debug, Default)]
struct TallyState {
    count: usize,
    failed: bool,
}

/// Counter with a blocking wait for `count == target`.
#[derive(Debug)]
pub struct Tally {
    target: usize,
    state: Mutex<TallyState>,
    reached: Condvar,
}

impl Tally {
    /// Creates a tally that signals when `target` is reached.
    #[must_use]
    pub fn new(target: usize) -> Self {
        Self {
            target,
            state: Mutex::new(TallyState::default()),
            reached: Condvar::new(),
        }
    }

    /// The count that wakes the waiter.
    #[inline]
    #[must_use]
    pub const fn target(&self) -> usize {
        self.target
    }

    /// Current count.
    #[must_use]
    pub fn count(&self) -> usize {
        self.state.lock().count
    }

    /// Adds one and wakes the waiter if the target is reached.
    ///
    /// Returns the new count.
    pub fn increment(&self) -> usize {
        let mut state = self.state.lock();
        state.count += 1;
        let count = state.count;
        if count == self.target {
            self.reached.notify_one();
        }
        count
    }

    /// Removes one.
    pub fn decrement(&self) {
        let mut state = self.state.lock();
        debug_assert!(state.count > 0, "tally underflow");
        state.count -= 1;
    }

    /// Raises the failure flag and wakes the waiter.
    pub fn fail(&self) {
        let mut state = self.state.lock();
        state.failed = true;
        self.reached.notify_all();
    }

    /// Blocks until the count equals the target or a failure is raised,
    /// then resets the count to zero.
    pub fn wait_and_reset(&self) -> TallyWait {
        let mut state = self.state.lock();
        while state.count != self.target && !state.failed {
            self.reached.wait(&mut state);
        }
        if state.failed {
            return TallyWait::Failed;
        }
        state.count = 0;
        TallyWait::Reached
    }

    /// Blocks until the count equals the target or a failure is raised.
    pub fn wait(&self) -> TallyWait {
        let mut state = self.state.lock();
        while state.count != self.target && !state.failed {
            self.reached.wait(&mut state);
        }
        if state.failed {
            TallyWait::Failed
        } else {
            TallyWait::Reached
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_tally_counts_up_and_down() {
        let tally = Tally::new(3);
        tally.increment();
        tally.increment();
        tally.decrement();
        assert_eq!(tally.count(), 1);
    }

    #[test]
    fn test_wait_wakes_on_target() {
        let tally = Arc::new(Tally::new(4));
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let tally = Arc::clone(&tally);
                thread::spawn(move || {
                    tally.increment();
                })
            })
            .collect();
        assert_eq!(tally.wait_and_reset(), TallyWait::Reached);
        assert_eq!(tally.count(), 0);
        for w in workers {
            w.join().unwrap();
        }
    }

    #[test]
    fn test_wait_wakes_on_failure() {
        let tally = Arc::new(Tally::new(2));
        let failing = Arc::clone(&tally);
        let handle = thread::spawn(move || failing.fail());
        assert_eq!(tally.wait(), TallyWait::Failed);
        handle.join().unwrap();
    }
}
