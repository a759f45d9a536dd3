//! Unit tests for the fine-grained priority queue.
//!
//! Cases that exercise [`kaido_test_support`] fixtures live in
//! `tests/priority_queue.rs` instead: `kaido-test-support` depends on
//! `kaido-core`, so pulling it into this crate's own unit-test binary would
//! compile two disjoint copies of `kaido-core` and make their types
//! mismatch. Integration tests don't have that problem because they only
//! ever see the one copy of `kaido-core` that `kaido-test-support` itself
//! depends on.

use rstest::rstest;

use super::FineLockQueue;

#[test]
fn pop_on_empty_returns_none_and_leaves_state_untouched() {
    let queue: FineLockQueue<i64> = FineLockQueue::new();
    assert_eq!(queue.pop(), None);
    assert!(queue.is_empty());
    assert!(queue.check_invariants());
}

#[test]
fn single_push_round_trips() {
    let queue = FineLockQueue::new();
    queue.push(41);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.pop(), Some(41));
    assert_eq!(queue.pop(), None);
}

#[rstest]
#[case::ascending(&[1, 2, 3, 4])]
#[case::descending(&[4, 3, 2, 1])]
#[case::mixed(&[2, 4, 1, 3])]
fn natural_order_pops_descending(#[case] values: &[i32]) {
    let queue = FineLockQueue::new();
    for &value in values {
        queue.push(value);
        assert!(queue.check_invariants());
    }
    let drained: Vec<i32> = std::iter::from_fn(|| queue.pop()).collect();
    assert_eq!(drained, [4, 3, 2, 1]);
}

#[test]
fn duplicates_are_kept() {
    let queue = FineLockQueue::new();
    queue.push(7);
    queue.push(7);
    queue.push(7);
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.pop(), Some(7));
    assert_eq!(queue.pop(), Some(7));
    assert_eq!(queue.pop(), Some(7));
    assert_eq!(queue.pop(), None);
}
