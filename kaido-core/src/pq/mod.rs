//! Fine-grained concurrent priority queue over a sorted linked list.
//!
//! The list is kept ascending under a caller-supplied comparator, so the
//! highest-priority element is always the immediate predecessor of the tail
//! sentinel. Traversal uses the same hand-over-hand locking discipline as
//! [`crate::FineLockSet`].

use std::mem;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use parking_lot::{Mutex, RawMutex, lock_api::ArcMutexGuard};

use crate::bounded::Bounded;

/// Strict-weak-order comparison used to sort queue elements.
///
/// `less(a, b)` must behave like `a < b` for the priority the queue should
/// respect: `pop` returns the greatest element under this order.
pub trait Comparator<T> {
    /// Returns whether `a` orders strictly before `b`.
    fn less(&self, a: &T, b: &T) -> bool;
}

/// Comparator delegating to the element's [`Ord`] instance.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NaturalOrder;

impl<T: Ord> Comparator<T> for NaturalOrder {
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

struct Cell<T> {
    value: T,
    /// `None` only on the tail sentinel.
    next: Option<CellRef<T>>,
}

type CellRef<T> = Arc<Mutex<Cell<T>>>;
type CellGuard<T> = ArcMutexGuard<RawMutex, Cell<T>>;

/// Concurrent priority queue with per-cell locking and FIFO tie-breaking.
///
/// `push` advances past every element *strictly* less than the new value and
/// splices in front of the first element that is not less. Equal-priority
/// elements therefore accumulate in front of their earlier peers, and since
/// `pop` extracts from the tail end, equal priorities leave the queue in
/// insertion order.
///
/// # Examples
/// ```
/// use kaido_core::FineLockQueue;
///
/// let queue = FineLockQueue::new();
/// queue.push(10);
/// queue.push(30);
/// queue.push(20);
/// assert_eq!(queue.pop(), Some(30));
/// assert_eq!(queue.pop(), Some(20));
/// assert_eq!(queue.pop(), Some(10));
/// assert_eq!(queue.pop(), None);
/// ```
pub struct FineLockQueue<T, C = NaturalOrder> {
    head: CellRef<T>,
    tail: CellRef<T>,
    len: AtomicUsize,
    cmp: C,
}

impl<T: Bounded + Ord> FineLockQueue<T, NaturalOrder> {
    /// Creates an empty queue ordered by the element's [`Ord`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T: Bounded + Ord> Default for FineLockQueue<T, NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Bounded, C: Comparator<T>> FineLockQueue<T, C> {
    /// Creates an empty queue ordered by `cmp`.
    ///
    /// # Examples
    /// ```
    /// use kaido_core::{Comparator, FineLockQueue};
    ///
    /// struct Descending;
    /// impl Comparator<i32> for Descending {
    ///     fn less(&self, a: &i32, b: &i32) -> bool {
    ///         a > b
    ///     }
    /// }
    ///
    /// // Under `Descending` the smallest value is the comparator-greatest,
    /// // so `pop` drains in ascending order.
    /// let queue = FineLockQueue::with_comparator(Descending);
    /// queue.push(9);
    /// queue.push(3);
    /// assert_eq!(queue.pop(), Some(3));
    /// assert_eq!(queue.pop(), Some(9));
    /// ```
    #[must_use]
    pub fn with_comparator(cmp: C) -> Self {
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
            cmp,
        }
    }

    /// Inserts `value`, keeping the list ascending under the comparator.
    pub fn push(&self, value: T) {
        let mut pred_guard = self.head.lock_arc();
        let mut curr = pred_guard
            .next
            .clone()
            .expect("head sentinel always has a successor");
        let mut curr_guard = curr.lock_arc();
        while !Arc::ptr_eq(&curr, &self.tail) && self.cmp.less(&curr_guard.value, &value) {
            let next = curr_guard
                .next
                .clone()
                .expect("data cells always have a successor");
            pred_guard = curr_guard;
            curr = next;
            curr_guard = curr.lock_arc();
        }
        let cell = Arc::new(Mutex::new(Cell {
            value,
            next: Some(curr),
        }));
        pred_guard.next = Some(cell);
        self.len.fetch_add(1, Ordering::Relaxed);
    }

    /// Removes and returns the highest-priority element, or `None` when the
    /// queue holds no data cells.
    ///
    /// Among equal-priority elements the earliest inserted is returned.
    pub fn pop(&self) -> Option<T> {
        let mut pred_guard = self.head.lock_arc();
        let mut curr = pred_guard
            .next
            .clone()
            .expect("head sentinel always has a successor");
        let mut curr_guard = curr.lock_arc();
        if Arc::ptr_eq(&curr, &self.tail) {
            return None;
        }
        // Walk until `curr` is the tail's immediate predecessor, keeping the
        // travelling pair locked the whole way.
        loop {
            let next = curr_guard
                .next
                .clone()
                .expect("data cells always have a successor");
            if Arc::ptr_eq(&next, &self.tail) {
                let tail_guard = next.lock_arc();
                let value = mem::replace(&mut curr_guard.value, T::MIN);
                pred_guard.next = Some(next.clone());
                self.len.fetch_sub(1, Ordering::Relaxed);
                // All three locks release as the guards drop; the unlinked
                // cell is freed afterwards by its final Arc.
                drop(tail_guard);
                drop(curr_guard);
                drop(pred_guard);
                return Some(value);
            }
            pred_guard = curr_guard;
            curr = next;
            curr_guard = curr.lock_arc();
        }
    }

    /// Number of data cells, excluding the two sentinels.
    ///
    /// Relaxed load; exact only at quiescence.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Returns whether the queue holds no data cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Audits the structural invariants in a quiescent state: sentinel
    /// values, non-decreasing order under the comparator, tail
    /// reachability, and counter accuracy.
    pub fn check_invariants(&self) -> bool
    where
        T: PartialEq,
    {
        let mut pred = Arc::clone(&self.head);
        let mut pred_guard = pred.lock_arc();
        if pred_guard.value != T::MIN {
            return false;
        }
        let mut count = 0usize;
        loop {
            let Some(curr) = pred_guard.next.clone() else {
                return Arc::ptr_eq(&pred, &self.tail)
                    && pred_guard.value == T::MAX
                    && count == self.len.load(Ordering::Relaxed);
            };
            let curr_guard = curr.lock_arc();
            if !Arc::ptr_eq(&curr, &self.tail) {
                // Non-decreasing: the successor must not order before its
                // predecessor.
                if !Arc::ptr_eq(&pred, &self.head)
                    && self.cmp.less(&curr_guard.value, &pred_guard.value)
                {
                    return false;
                }
                count += 1;
            }
            pred = curr;
            pred_guard = curr_guard;
        }
    }
}

impl<T, C> Drop for FineLockQueue<T, C> {
    fn drop(&mut self) {
        // Sever each link before dropping the cell so a long chain of Arcs
        // cannot recurse the stack on destruction.
        let mut next = self.head.lock().next.take();
        while let Some(cell) = next {
            next = cell.lock().next.take();
        }
    }
}

#[cfg(test)]
mod tests;
