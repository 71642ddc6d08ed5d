//! # Compare-Swap Kernel
//!
//! The single primitive every strategy is built from: look at an adjacent
//! pair `(i, i + 1)` and swap it if it is out of order.

/// Which pairs a phase touches.
///
/// `Even` phases look at pairs whose left index is even, `Odd` at pairs
/// whose left index is odd. All pairs of one parity are disjoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Parity {
    /// Pairs `(0, 1)`, `(2, 3)`, ...
    Even = 0,
    /// Pairs `(1, 2)`, `(3, 4)`, ...
    Odd = 1,
}

impl Parity {
    /// The other parity.
    #[inline]
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Even => Self::Odd,
            Self::Odd => Self::Even,
        }
    }

    /// Parity of the `k`-th pass (`k` counted from zero).
    #[inline]
    #[must_use]
    pub const fn of_pass(k: usize) -> Self {
        if k % 2 == 0 {
            Self::Even
        } else {
            Self::Odd
        }
    }

    /// Offset added to the first index of a range.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> usize {
        self as usize
    }

    /// First index `>= start` whose parity matches.
    #[inline]
    #[must_use]
    pub const fn align(self, start: usize) -> usize {
        start + ((start & 1) ^ self.offset())
    }
}

/// Swaps `v[i]` and `v[i + 1]` if they are out of order.
///
/// Returns whether a swap happened.
#[inline]
pub fn compare_swap<T: Ord>(v: &mut [T], i: usize) -> bool {
    if v[i + 1] < v[i] {
        v.swap(i, i + 1);
        true
    } else {
        false
    }
}

/// Runs one phase of the given parity over the whole slice.
///
/// Returns the number of swaps.
pub fn phase<T: Ord>(v: &mut [T], parity: Parity) -> u64 {
    let mut swaps = 0;
    let mut i = parity.offset();
    while i + 1 < v.len() {
        swaps += u64::from(compare_swap(v, i));
        i += 2;
    }
    swaps
}

/// Returns true if the slice is non-decreasing.
#[must_use]
pub fn is_sorted<T: Ord>(v: &[T]) -> bool {
    v.windows(2).all(|w| w[0] <= w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align() {
        assert_eq!(Parity::Even.align(4), 4);
        assert_eq!(Parity::Odd.align(4), 5);
        assert_eq!(Parity::Even.align(5), 6);
        assert_eq!(Parity::Odd.align(5), 5);
    }

    #[test]
    fn test_of_pass_alternates() {
        assert_eq!(Parity::of_pass(0), Parity::Even);
        assert_eq!(Parity::of_pass(1), Parity::Odd);
        assert_eq!(Parity::of_pass(2).flip(), Parity::Odd);
    }

    #[test]
    fn test_phase_touches_only_its_pairs() {
        let mut v = vec![2, 1, 4, 3, 6, 5];
        assert_eq!(phase(&mut v, Parity::Odd), 0);
        assert_eq!(phase(&mut v, Parity::Even), 3);
        assert_eq!(v, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_compare_swap_keeps_equal_pairs() {
        let mut v = vec![7, 7];
        assert!(!compare_swap(&mut v, 0));
    }
}
