//! # Strategy Scenario Tests
//!
//! Every discipline run through the public entry point on the same inputs:
//!
//! 1. **Small inputs**: the classic five-element case, empty and singleton arrays
//! 2. **Oracle agreement**: identical output and swap count to the sequential sort
//! 3. **Sorted inputs**: no swaps, minimal termination work
//! 4. **Rejected configurations**: nothing spawned, nothing touched
//! 5. **Worker panics**: surfaced as `ExecutionFailure`
//!
//! Run with: cargo test -p oesort_core --test strategy_scenarios

use std::cmp::Ordering;

use oesort_core::{is_sorted, sort, ReportDetail, SortConfig, SortError, Strategy};

fn inversions(v: &[i32]) -> u64 {
    let mut count = 0;
    for i in 0..v.len() {
        for j in i + 1..v.len() {
            count += u64::from(v[j] < v[i]);
        }
    }
    count
}

fn scrambled(n: i32) -> Vec<i32> {
    (0..n).map(|i| (i * 7919 + 13) % 1021).collect()
}

// ============================================================================
// SMALL INPUTS
// ============================================================================

#[test]
fn every_strategy_sorts_five_elements_with_two_workers() {
    for strategy in Strategy::ALL {
        let mut v = vec![5, 3, 4, 1, 2];
        let report = sort(&SortConfig::new(strategy, 2), &mut v).unwrap();
        assert_eq!(v, vec![1, 2, 3, 4, 5], "{strategy}");
        assert_eq!(report.swaps, 8, "{strategy}");
        assert_eq!(report.strategy, strategy);
    }
}

#[test]
fn empty_and_singleton_inputs_are_untouched() {
    for strategy in Strategy::ALL {
        let mut empty: Vec<i32> = Vec::new();
        let report = sort(&SortConfig::new(strategy, 4), &mut empty).unwrap();
        assert_eq!(report.swaps, 0);
        assert!(empty.is_empty());

        let mut one = vec![7];
        let report = sort(&SortConfig::new(strategy, 4), &mut one).unwrap();
        assert_eq!(report.swaps, 0);
        assert_eq!(one, vec![7], "{strategy}");
    }
}

#[test]
fn two_reversed_elements() {
    for strategy in Strategy::ALL {
        let mut v = vec![2, 1];
        let config = SortConfig::new(strategy, 1).with_blocks(2);
        let report = sort(&config, &mut v).unwrap();
        assert_eq!(v, vec![1, 2], "{strategy}");
        assert_eq!(report.swaps, 1, "{strategy}");
    }
}

#[test]
fn one_cell_blocks_with_duplicates() {
    for strategy in [Strategy::Async, Strategy::Barrier, Strategy::Farm] {
        let mut v = vec![3, 1, 3, 2, 1, 2, 3, 1];
        let config = SortConfig::new(strategy, 8).with_blocks(8);
        sort(&config, &mut v).unwrap();
        assert_eq!(v, vec![1, 1, 1, 2, 2, 3, 3, 3], "{strategy}");
    }
}

// ============================================================================
// ORACLE AGREEMENT
// ============================================================================

#[test]
fn single_worker_matches_sequential() {
    let input = scrambled(600);
    let mut expected = input.clone();
    sort(&SortConfig::new(Strategy::Sequential, 1), &mut expected).unwrap();

    for strategy in Strategy::ALL {
        let mut actual = input.clone();
        let report = sort(&SortConfig::new(strategy, 1), &mut actual).unwrap();
        assert_eq!(actual, expected, "{strategy}");
        assert_eq!(report.swaps, inversions(&input), "{strategy}");
    }
}

#[test]
fn many_workers_match_sequential() {
    let input = scrambled(2000);
    let mut expected = input.clone();
    expected.sort_unstable();

    for strategy in Strategy::ALL {
        for workers in [2, 3, 8] {
            let mut actual = input.clone();
            let report = sort(&SortConfig::new(strategy, workers), &mut actual).unwrap();
            assert_eq!(actual, expected, "{strategy} x{workers}");
            assert_eq!(report.swaps, inversions(&input), "{strategy} x{workers}");
        }
    }
}

#[test]
fn farm_block_count_independent_of_workers() {
    let input = scrambled(300);
    for (workers, blocks) in [(1, 7), (3, 3), (4, 30)] {
        let mut v = input.clone();
        let config = SortConfig::new(Strategy::Farm, workers).with_blocks(blocks);
        let report = sort(&config, &mut v).unwrap();
        assert!(is_sorted(&v));
        assert_eq!(report.blocks, blocks);
        let ReportDetail::Farm { max_skew, .. } = report.detail else {
            panic!("expected farm detail");
        };
        assert!(max_skew <= 1, "skew {max_skew} with {blocks} blocks");
    }
}

// ============================================================================
// SORTED INPUTS
// ============================================================================

#[test]
fn sorted_input_does_minimal_work() {
    for k in [1, 4, 16] {
        let sorted: Vec<i32> = (0..1000).collect();

        let mut v = sorted.clone();
        let report = sort(&SortConfig::new(Strategy::Async, k), &mut v).unwrap();
        assert_eq!(v, sorted);
        assert_eq!(report.swaps, 0);
        assert_eq!(
            report.detail,
            ReportDetail::Async {
                settle_sweeps: vec![1; k],
                revocations: 0,
            }
        );

        let mut v = sorted.clone();
        let report = sort(&SortConfig::new(Strategy::Barrier, k), &mut v).unwrap();
        assert_eq!(report.swaps, 0);
        assert_eq!(report.detail, ReportDetail::Barrier { phases: 2 });

        let mut v = sorted.clone();
        let report = sort(&SortConfig::new(Strategy::Farm, k), &mut v).unwrap();
        assert_eq!(v, sorted);
        assert_eq!(report.swaps, 0);
        let ReportDetail::Farm { passes, .. } = report.detail else {
            panic!("expected farm detail");
        };
        assert!(passes.iter().all(|&p| p == 1000));
    }
}

#[test]
fn reverse_sorted_input_costs_every_inversion() {
    let input: Vec<i32> = (0..256).rev().collect();
    for strategy in Strategy::ALL {
        let mut v = input.clone();
        let report = sort(&SortConfig::new(strategy, 4), &mut v).unwrap();
        assert!(is_sorted(&v), "{strategy}");
        assert_eq!(report.swaps, 256 * 255 / 2, "{strategy}");
    }
}

// ============================================================================
// REJECTED CONFIGURATIONS
// ============================================================================

#[test]
fn zero_workers_rejected_everywhere() {
    for strategy in Strategy::ALL {
        let mut v = vec![3, 2, 1];
        let result = sort(&SortConfig::new(strategy, 0), &mut v);
        assert!(
            matches!(result, Err(SortError::InvalidConfiguration { .. })),
            "{strategy}"
        );
        assert_eq!(v, vec![3, 2, 1]);
    }
}

#[test]
fn more_blocks_than_elements_rejected_for_blocked_strategies() {
    for strategy in [Strategy::Async, Strategy::Barrier] {
        let mut v = vec![3, 2, 1];
        let result = sort(&SortConfig::new(strategy, 4), &mut v);
        assert!(matches!(result, Err(SortError::InvalidConfiguration { .. })));
        assert_eq!(v, vec![3, 2, 1]);
    }

    let mut v = vec![5, 4, 3, 2, 1];
    let config = SortConfig::new(Strategy::Farm, 1).with_blocks(6);
    assert!(matches!(
        sort(&config, &mut v),
        Err(SortError::InvalidConfiguration { .. })
    ));

    let config = SortConfig::new(Strategy::Farm, 1).with_blocks(0);
    assert!(matches!(
        sort(&config, &mut v),
        Err(SortError::InvalidConfiguration { .. })
    ));
}

#[test]
fn pool_strategies_accept_more_workers_than_elements() {
    for strategy in [Strategy::Sequential, Strategy::ParallelFor] {
        let mut v = vec![3, 2, 1];
        sort(&SortConfig::new(strategy, 8), &mut v).unwrap();
        assert_eq!(v, vec![1, 2, 3]);
    }
}

// ============================================================================
// WORKER PANICS
// ============================================================================

/// Panics whenever it is compared against the poisoned value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Fragile(i32);

const POISON: i32 = 13;

impl Ord for Fragile {
    fn cmp(&self, other: &Self) -> Ordering {
        assert!(
            self.0 != POISON && other.0 != POISON,
            "compared the poisoned value"
        );
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for Fragile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[test]
fn worker_panic_becomes_execution_failure() {
    for strategy in [Strategy::Async, Strategy::Barrier, Strategy::Farm] {
        let mut v: Vec<Fragile> = (0..64).rev().map(Fragile).collect();
        let result = sort(&SortConfig::new(strategy, 4), &mut v);
        assert!(
            matches!(result, Err(SortError::ExecutionFailure { .. })),
            "{strategy}: {result:?}"
        );

        // Still a permutation of the input
        let mut values: Vec<i32> = v.iter().map(|f| f.0).collect();
        values.sort_unstable();
        assert_eq!(values, (0..64).collect::<Vec<_>>());
    }
}
