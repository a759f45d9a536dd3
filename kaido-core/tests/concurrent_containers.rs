//! Cross-thread container scenarios: disjoint inserts, mixed workloads, and
//! a randomised push/pop stress run.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use kaido_core::{CoarseLockSet, FineLockQueue, FineLockSet, SortedSet};
use kaido_test_support::tickets::{PriorityOrder, Ticket};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const INSERTER_THREADS: usize = 4;
const INSERTS_PER_THREAD: usize = 500;

fn concurrent_disjoint_inserts<S: SortedSet<i32> + Sync>(set: &S) {
    let total = INSERTER_THREADS * INSERTS_PER_THREAD;
    let mut values: Vec<i32> = (0..total as i32).collect();
    // Shuffling spreads each thread's block across the whole key range so
    // the threads actually contend on neighbouring cells.
    values.shuffle(&mut SmallRng::seed_from_u64(7));

    thread::scope(|scope| {
        for block in values.chunks(INSERTS_PER_THREAD) {
            scope.spawn(move || {
                for &value in block {
                    assert!(set.insert(value), "values are disjoint, insert must succeed");
                }
            });
        }
    });

    assert_eq!(set.len(), total);
    for value in 0..total as i32 {
        assert!(set.contains(&value));
    }
    assert!(set.check_invariants());
}

#[test]
fn coarse_set_accepts_concurrent_disjoint_inserts() {
    concurrent_disjoint_inserts(&CoarseLockSet::new());
}

#[test]
fn fine_set_accepts_concurrent_disjoint_inserts() {
    concurrent_disjoint_inserts(&FineLockSet::new());
}

fn concurrent_mixed_operations<S: SortedSet<i32> + Sync>(set: &S) {
    for value in 0..64 {
        assert!(set.insert(value * 2));
    }
    thread::scope(|scope| {
        for worker in 0..4u64 {
            scope.spawn(move || {
                let mut rng = SmallRng::seed_from_u64(worker);
                for _ in 0..400 {
                    let value = rng.gen_range(0..128);
                    match rng.gen_range(0..3) {
                        0 => {
                            set.insert(value);
                        }
                        1 => {
                            set.remove(&value);
                        }
                        _ => {
                            set.contains(&value);
                        }
                    }
                }
            });
        }
    });
    assert!(set.check_invariants());
}

#[test]
fn coarse_set_survives_concurrent_mixed_operations() {
    concurrent_mixed_operations(&CoarseLockSet::new());
}

#[test]
fn fine_set_survives_concurrent_mixed_operations() {
    concurrent_mixed_operations(&FineLockSet::new());
}

#[test]
fn queue_orders_concurrent_pushes() {
    let queue = FineLockQueue::with_comparator(PriorityOrder);
    let queue = &queue;
    let sequence = AtomicU64::new(0);
    let sequence = &sequence;

    thread::scope(|scope| {
        for worker in 0..4i32 {
            scope.spawn(move || {
                let mut rng = SmallRng::seed_from_u64(worker as u64 + 11);
                for _ in 0..250 {
                    let seq = sequence.fetch_add(1, Ordering::Relaxed);
                    queue.push(Ticket::new(rng.gen_range(0..40), seq));
                }
            });
        }
    });

    assert_eq!(queue.len(), 1000);
    assert!(queue.check_invariants());

    // Draining single-threaded must observe non-increasing priorities.
    let mut previous = i32::MAX;
    let mut drained = 0;
    while let Some(ticket) = queue.pop() {
        assert!(ticket.priority <= previous);
        previous = ticket.priority;
        drained += 1;
    }
    assert_eq!(drained, 1000);
    assert!(queue.is_empty());
}

fn random_push_pop_stress(duration: Duration) {
    let threads = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(2)
        .max(2);
    let queue = FineLockQueue::with_comparator(PriorityOrder);
    let queue = &queue;
    let sequence = AtomicU64::new(0);
    let sequence = &sequence;
    let pushes = AtomicUsize::new(0);
    let pushes = &pushes;
    let pops = AtomicUsize::new(0);
    let pops = &pops;
    let deadline = Instant::now() + duration;

    thread::scope(|scope| {
        for worker in 0..threads {
            scope.spawn(move || {
                let mut rng = SmallRng::seed_from_u64(worker as u64);
                while Instant::now() < deadline {
                    if rng.gen_bool(0.5) {
                        let seq = sequence.fetch_add(1, Ordering::Relaxed);
                        queue.push(Ticket::new(rng.gen_range(0..100), seq));
                        pushes.fetch_add(1, Ordering::Relaxed);
                    } else if queue.pop().is_some() {
                        pops.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });

    assert!(queue.check_invariants());
    assert_eq!(
        queue.len(),
        pushes.load(Ordering::Relaxed) - pops.load(Ordering::Relaxed),
    );
}

#[test]
fn queue_survives_a_short_random_stress_run() {
    random_push_pop_stress(Duration::from_millis(750));
}

#[test]
#[ignore = "ten-second stress run; execute on demand"]
fn queue_survives_a_long_random_stress_run() {
    random_push_pop_stress(Duration::from_secs(10));
}
