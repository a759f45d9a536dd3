//! Fine-grained sorted set: one mutex per cell, hand-over-hand traversal.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use parking_lot::{Mutex, RawMutex, lock_api::ArcMutexGuard};

use crate::bounded::Bounded;

use super::SortedSet;

struct Cell<T> {
    value: T,
    /// `None` only on the tail sentinel.
    next: Option<CellRef<T>>,
}

type CellRef<T> = Arc<Mutex<Cell<T>>>;

/// Owned guard over a cell; owning (rather than borrowing) the guard is what
/// lets the traversal move its lock pair forward without fighting the
/// borrow checker.
type CellGuard<T> = ArcMutexGuard<RawMutex, Cell<T>>;

/// Sorted linked-list set with per-cell locking.
///
/// Navigation locks adjacent cells in list order and releases the trailing
/// lock only once the leading lock is held ("hand-over-hand"), so writers
/// working on disjoint regions of the list proceed in parallel. Locks are
/// always taken head-to-tail, which rules out cycles in the lock order and
/// therefore deadlock.
///
/// A removed cell is unlinked while both covering locks are held and its
/// storage is reclaimed by the last [`Arc`] once those guards drop; a
/// traversal can only reach a cell by locking it, so no reader can be
/// standing on a cell at the moment it is unlinked.
///
/// # Examples
/// ```
/// use kaido_core::{FineLockSet, SortedSet};
///
/// let set = FineLockSet::new();
/// assert!(set.insert(2));
/// assert!(set.insert(9));
/// assert!(!set.insert(2));
/// assert!(set.contains(&9));
/// assert_eq!(set.len(), 2);
/// ```
pub struct FineLockSet<T> {
    head: CellRef<T>,
    tail: CellRef<T>,
    len: AtomicUsize,
}

impl<T: Bounded + Ord> FineLockSet<T> {
    /// Creates an empty set holding only the two sentinels.
    #[must_use]
    pub fn new() -> Self {
        let tail = Arc::new(Mutex::new(Cell {
            value: T::MAX,
            next: None,
        }));
        let head = Arc::new(Mutex::new(Cell {
            value: T::MIN,
            next: Some(Arc::clone(&tail)),
        }));
        Self {
            head,
            tail,
            len: AtomicUsize::new(0),
        }
    }

    /// Walks to the first cell whose value is not less than `value`,
    /// returning the locked `(pred, curr)` pair with `curr` identified.
    ///
    /// On return exactly two locks are held; dropping the guards releases
    /// them successor-first.
    fn locate(&self, value: &T) -> (CellGuard<T>, CellRef<T>, CellGuard<T>) {
        let mut pred_guard = self.head.lock_arc();
        let mut curr = pred_guard
            .next
            .clone()
            .expect("head sentinel always has a successor");
        let mut curr_guard = curr.lock_arc();
        while !Arc::ptr_eq(&curr, &self.tail) && curr_guard.value < *value {
            let next = curr_guard
                .next
                .clone()
                .expect("data cells always have a successor");
            pred_guard = curr_guard;
            curr = next;
            curr_guard = curr.lock_arc();
        }
        (pred_guard, curr, curr_guard)
    }
}

impl<T: Bounded + Ord> Default for FineLockSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Bounded + Ord> SortedSet<T> for FineLockSet<T> {
    fn insert(&self, value: T) -> bool {
        let (mut pred_guard, curr, curr_guard) = self.locate(&value);
        if !Arc::ptr_eq(&curr, &self.tail) && curr_guard.value == value {
            return false;
        }
        let cell = Arc::new(Mutex::new(Cell {
            value,
            next: Some(curr),
        }));
        pred_guard.next = Some(cell);
        // Counter moves while both covering locks are held.
        self.len.fetch_add(1, Ordering::Relaxed);
        true
    }

    fn remove(&self, value: &T) -> bool {
        let (mut pred_guard, curr, mut curr_guard) = self.locate(value);
        if Arc::ptr_eq(&curr, &self.tail) || curr_guard.value != *value {
            return false;
        }
        pred_guard.next = curr_guard.next.take();
        self.len.fetch_sub(1, Ordering::Relaxed);
        // Guards drop here; the unlinked cell is freed by the final Arc
        // only after its lock has been released.
        true
    }

    fn contains(&self, value: &T) -> bool {
        let (_pred_guard, curr, curr_guard) = self.locate(value);
        !Arc::ptr_eq(&curr, &self.tail) && curr_guard.value == *value
    }

    fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    fn check_invariants(&self) -> bool {
        let mut pred = Arc::clone(&self.head);
        let mut pred_guard = pred.lock_arc();
        if pred_guard.value != T::MIN {
            return false;
        }
        let mut count = 0usize;
        loop {
            let Some(curr) = pred_guard.next.clone() else {
                // Only the tail sentinel terminates the chain.
                return Arc::ptr_eq(&pred, &self.tail)
                    && pred_guard.value == T::MAX
                    && count == self.len.load(Ordering::Relaxed);
            };
            let curr_guard = curr.lock_arc();
            if !Arc::ptr_eq(&curr, &self.tail) {
                if !Arc::ptr_eq(&pred, &self.head) && pred_guard.value >= curr_guard.value {
                    return false;
                }
                count += 1;
            }
            pred = curr;
            pred_guard = curr_guard;
        }
    }
}

impl<T> Drop for FineLockSet<T> {
    fn drop(&mut self) {
        // Sever each link before dropping the cell so a long chain of Arcs
        // cannot recurse the stack on destruction.
        let mut next = self.head.lock().next.take();
        while let Some(cell) = next {
            next = cell.lock().next.take();
        }
    }
}
