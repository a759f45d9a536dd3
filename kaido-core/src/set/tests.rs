//! Unit tests exercised against both sorted-set implementations.

use std::collections::BTreeSet;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use rstest::rstest;

use super::{CoarseLockSet, FineLockSet, SortedSet};

fn coarse() -> Box<dyn SortedSet<i32>> {
    Box::new(CoarseLockSet::new())
}

fn fine() -> Box<dyn SortedSet<i32>> {
    Box::new(FineLockSet::new())
}

#[rstest]
#[case::coarse(coarse())]
#[case::fine(fine())]
fn insert_remove_contains_round(#[case] set: Box<dyn SortedSet<i32>>) {
    assert!(set.insert(5));
    assert!(!set.insert(5));
    assert!(set.insert(3));
    assert!(set.contains(&3));
    assert!(!set.remove(&7));
    assert_eq!(set.len(), 2);
    assert!(set.remove(&5));
    assert_eq!(set.len(), 1);
    assert!(set.check_invariants());
}

#[rstest]
#[case::coarse(coarse())]
#[case::fine(fine())]
fn empty_set_behaviour(#[case] set: Box<dyn SortedSet<i32>>) {
    assert!(set.is_empty());
    assert!(!set.contains(&0));
    assert!(!set.remove(&0));
    assert!(set.is_empty());
    assert!(set.check_invariants());
}

#[rstest]
#[case::coarse(coarse())]
#[case::fine(fine())]
fn values_equal_to_sentinel_bounds_are_ordinary_data(#[case] set: Box<dyn SortedSet<i32>>) {
    assert!(set.insert(i32::MAX));
    assert!(set.insert(i32::MIN));
    assert!(set.insert(0));
    assert!(set.contains(&i32::MIN));
    assert!(set.contains(&i32::MAX));
    assert_eq!(set.len(), 3);
    assert!(set.check_invariants());
    assert!(set.remove(&i32::MAX));
    assert!(set.remove(&i32::MIN));
    assert_eq!(set.len(), 1);
    assert!(set.check_invariants());
}

#[rstest]
#[case::coarse(coarse())]
#[case::fine(fine())]
fn reinsertion_after_removal(#[case] set: Box<dyn SortedSet<i32>>) {
    assert!(set.insert(11));
    assert!(set.remove(&11));
    assert!(set.insert(11));
    assert!(set.contains(&11));
    assert_eq!(set.len(), 1);
}

#[rstest]
#[case::coarse(coarse())]
#[case::fine(fine())]
fn interleaved_inserts_stay_sorted(#[case] set: Box<dyn SortedSet<i32>>) {
    for value in [8, 1, 5, 3, 9, 2, 7] {
        assert!(set.insert(value));
        assert!(set.check_invariants());
    }
    assert_eq!(set.len(), 7);
}

/// Operation stream: 0 = insert, 1 = remove, 2 = contains.
fn op_sequence() -> impl Strategy<Value = Vec<(u8, i32)>> {
    proptest::collection::vec((0u8..3, -24i32..24), 1..160)
}

fn matches_oracle(set: &dyn SortedSet<i32>, ops: &[(u8, i32)]) -> Result<(), TestCaseError> {
    let mut oracle = BTreeSet::new();
    for &(op, value) in ops {
        match op {
            0 => prop_assert_eq!(set.insert(value), oracle.insert(value)),
            1 => prop_assert_eq!(set.remove(&value), oracle.remove(&value)),
            _ => prop_assert_eq!(set.contains(&value), oracle.contains(&value)),
        }
        prop_assert_eq!(set.len(), oracle.len());
        prop_assert!(set.check_invariants());
    }
    Ok(())
}

proptest! {
    #[test]
    fn coarse_set_matches_btreeset_oracle(ops in op_sequence()) {
        matches_oracle(&CoarseLockSet::new(), &ops)?;
    }

    #[test]
    fn fine_set_matches_btreeset_oracle(ops in op_sequence()) {
        matches_oracle(&FineLockSet::new(), &ops)?;
    }
}
