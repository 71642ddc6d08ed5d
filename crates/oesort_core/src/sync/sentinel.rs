//! # Panic Sentinel
//!
//! Runs a closure when a worker thread unwinds, so the thread waiting on
//! that worker learns about the failure instead of blocking forever.

use std::thread;

/// Calls `on_panic` if dropped while the current thread is panicking.
pub struct PanicSentinel<F: FnMut()> {
    on_panic: F,
}

impl<F: FnMut()> PanicSentinel<F> {
    /// Arms the sentinel.
    #[must_use]
    pub fn new(on_panic: F) -> Self {
        Self { on_panic }
    }
}

impl<F: FnMut()> Drop for PanicSentinel<F> {
    fn drop(&mut self) {
        if thread::panicking() {
            (self.on_panic)();
        }
    }
}
