//! # Synchronization Primitives
//!
//! The pieces shared by the three parallel disciplines.
//!
//! ## The Problem
//!
//! ```text
//! Worker 0:  swaps (4, 5)   ─┐
//!                            ├─ both touch cell 5
//! Worker 1:  swaps (5, 6)   ─┘
//!
//! Without synchronization: lost or duplicated element
//! With one global lock:    no parallelism
//! ```
//!
//! ## The Solution
//!
//! Interior cells are owned by exactly one block and need nothing. Only
//! the boundary cell of each block is synchronized, by a per-block lock or
//! by a schedule that never runs conflicting pairs together.

mod sentinel;
mod shared_slice;
mod tally;
pub mod workers;

pub use sentinel::PanicSentinel;
pub use shared_slice::SharedSlice;
pub use tally::{Tally, TallyWait};
