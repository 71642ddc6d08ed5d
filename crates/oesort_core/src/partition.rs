//! # Block Partitioner
//!
//! Balanced contiguous decomposition of `[0, n)` into `k` blocks.
//!
//! ```text
//!   n = 11, k = 4         ⌈11/4⌉ = 3, ⌊11/4⌋ = 2, 11 mod 4 = 3 long blocks first
//!
//!   ┌─────────┬─────────┬─────────┬──────┐
//!   │ 0  1  2 │ 3  4  5 │ 6  7  8 │ 9 10 │
//!   └─────────┴─────────┴─────────┴──────┘
//!     block 0   block 1   block 2  block 3
//! ```
//!
//! A block also owns the compare-swap pairs `(i, i + 1)` whose left index
//! lies inside it. The last pair of every non-final block therefore reaches
//! one cell into the next block: that cell is the boundary element.

use std::ops::Range;

use crate::error::{SortError, SortResult};

/// A half-open index range assigned to exactly one worker at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// Position of the block in the partition.
    pub index: usize,
    /// First element (inclusive).
    pub start: usize,
    /// One past the last element.
    pub end: usize,
}

impl Block {
    /// Number of elements in the block.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the block holds no element.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Left indices of the compare-swap pairs this block owns.
    ///
    /// `n` is the array length; the final block stops at `n - 1`.
    #[inline]
    #[must_use]
    pub fn pairs(&self, n: usize) -> Range<usize> {
        self.start..self.end.min(n.saturating_sub(1))
    }
}

/// The full decomposition of an array into balanced blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    len: usize,
    blocks: Vec<Block>,
}

impl Partition {
    /// Splits `[0, n)` into `k` contiguous blocks.
    ///
    /// Every block length is `⌊n/k⌋` or `⌈n/k⌉`; the `n mod k` longer
    /// blocks come first.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `k == 0` or `k > n`.
    pub fn new(n: usize, k: usize) -> SortResult<Self> {
        if k == 0 {
            return Err(SortError::invalid("block count must be positive"));
        }
        if k > n {
            return Err(SortError::invalid(format!(
                "block count {k} exceeds array length {n}"
            )));
        }

        let base = n / k;
        let remainder = n % k;
        let mut blocks = Vec::with_capacity(k);
        let mut start = 0;
        for index in 0..k {
            let len = base + usize::from(index < remainder);
            blocks.push(Block {
                index,
                start,
                end: start + len,
            });
            start += len;
        }
        debug_assert_eq!(start, n);

        Ok(Self { len: n, blocks })
    }

    /// Array length covered by the partition.
    #[inline]
    #[must_use]
    pub const fn array_len(&self) -> usize {
        self.len
    }

    /// Number of blocks.
    #[inline]
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// All blocks, left to right.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Block by index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn block(&self, index: usize) -> Block {
        self.blocks[index]
    }

    /// Whether block `index` has a neighbor on the left.
    #[inline]
    #[must_use]
    pub const fn has_left(&self, index: usize) -> bool {
        index > 0
    }

    /// Whether block `index` has a neighbor on the right.
    #[inline]
    #[must_use]
    pub fn has_right(&self, index: usize) -> bool {
        index + 1 < self.blocks.len()
    }
}
