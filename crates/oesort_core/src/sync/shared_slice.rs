//! # Shared Array
//!
//! One exclusively borrowed buffer, handed to many workers at once.
//!
//! ## Safety Note
//!
//! This module requires unsafe code: the borrow checker cannot see that
//! block ranges are disjoint. Every caller states which protocol gives it
//! exclusive access to the two cells it touches.

#![allow(unsafe_code)]
//!
//! ## Ownership Map
//!
//! ```text
//!        block 0            block 1            block 2
//!   ┌──┬──┬──┬──┬──┐  ┌──┬──┬──┬──┬──┐  ┌──┬──┬──┬──┐
//!   │B │  │  │  │  │  │B │  │  │  │  │  │B │  │  │  │
//!   └──┴──┴──┴──┴──┘  └──┴──┴──┴──┴──┘  └──┴──┴──┴──┘
//!    ▲                 ▲                 ▲
//!    │                 └── lock 1        └── lock 2
//!    └── never shared (no left neighbor)
//!
//!   B     = boundary cell, reachable from the left neighbor's last pair
//!   blank = interior cell, reachable only from the owning block
//! ```
//!
//! - Interior cells: no synchronization, ownership by partition.
//! - Boundary cells: accessed only under the owning block's lock (async
//!   model) or under a scheduling rule that keeps neighbors apart
//!   (barrier and farm models).

use std::marker::PhantomData;
use std::ptr::NonNull;

/// A mutable slice that several threads may touch at disjoint indices.
pub struct SharedSlice<'a, T> {
    ptr: NonNull<T>,
    len: usize,
    _borrow: PhantomData<&'a mut [T]>,
}

// SAFETY: Elements move between threads only through swaps, which needs `T: Send`.
unsafe impl<T: Send> Send for SharedSlice<'_, T> {}
// SAFETY: Concurrent access is restricted to disjoint cells by every caller of
// the unsafe methods below; the type itself hands out no references.
unsafe impl<T: Send> Sync for SharedSlice<'_, T> {}

impl<'a, T> SharedSlice<'a, T> {
    /// Wraps an exclusive borrow. The slice is unusable elsewhere until
    /// the wrapper is dropped.
    #[must_use]
    pub fn new(slice: &'a mut [T]) -> Self {
        Self {
            len: slice.len(),
            ptr: NonNull::from(slice).cast(),
            _borrow: PhantomData,
        }
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the slice is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T: Ord> SharedSlice<'_, T> {
    /// Swaps cells `i` and `i + 1` if they are out of order.
    ///
    /// # Safety
    ///
    /// No other thread may read or write cell `i` or `i + 1` for the
    /// duration of the call.
    ///
    /// # Panics
    ///
    /// Panics if `i + 1` is out of bounds.
    #[inline]
    pub unsafe fn compare_swap(&self, i: usize) -> bool {
        assert!(i + 1 < self.len, "pair ({i}, {}) out of bounds", i + 1);
        // SAFETY: Both indices are in bounds (checked above) and the caller
        // guarantees exclusive access to them.
        unsafe {
            let left = self.ptr.as_ptr().add(i);
            let right = left.add(1);
            if *right < *left {
                std::ptr::swap(left, right);
                true
            } else {
                false
            }
        }
    }

    /// Compare-swaps every pair `from, from + 2, ...` while below `to`.
    ///
    /// Returns the number of swaps.
    ///
    /// # Safety
    ///
    /// No other thread may touch a cell of any pair `(i, i + 1)` visited
    /// here for the duration of the call.
    pub unsafe fn sweep(&self, from: usize, to: usize) -> u64 {
        let mut swaps = 0;
        let mut i = from;
        while i < to {
            // SAFETY: Forwarded from the caller.
            swaps += u64::from(unsafe { self.compare_swap(i) });
            i += 2;
        }
        swaps
    }
}
