//! Coarse-grained sorted set: one readers-writer lock over the whole list.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::bounded::Bounded;

use super::SortedSet;

struct Cell<T> {
    value: T,
    /// `None` only on the tail sentinel.
    next: Option<Box<Cell<T>>>,
}

impl<T> Cell<T> {
    fn is_tail(&self) -> bool {
        self.next.is_none()
    }
}

struct Chain<T> {
    head: Box<Cell<T>>,
}

/// Sorted linked-list set guarded by a single [`RwLock`].
///
/// Membership tests take a shared lock and can run concurrently with each
/// other; insertion and removal take the exclusive lock. Every operation is
/// linearisable at the point its lock is held. The shared lock keeps
/// readers on a consistent snapshot for their whole traversal, which is why
/// a readers-writer lock is used rather than a plain mutex.
///
/// # Examples
/// ```
/// use kaido_core::{CoarseLockSet, SortedSet};
///
/// let set = CoarseLockSet::new();
/// assert!(set.insert(3));
/// assert!(set.insert(5));
/// assert_eq!(set.len(), 2);
/// assert!(set.remove(&5));
/// assert!(!set.contains(&5));
/// ```
pub struct CoarseLockSet<T> {
    chain: RwLock<Chain<T>>,
    len: AtomicUsize,
}

impl<T: Bounded + Ord> CoarseLockSet<T> {
    /// Creates an empty set holding only the two sentinels.
    #[must_use]
    pub fn new() -> Self {
        let tail = Box::new(Cell {
            value: T::MAX,
            next: None,
        });
        let head = Box::new(Cell {
            value: T::MIN,
            next: Some(tail),
        });
        Self {
            chain: RwLock::new(Chain { head }),
            len: AtomicUsize::new(0),
        }
    }
}

impl<T: Bounded + Ord> Default for CoarseLockSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursive traversal helper for [`CoarseLockSet::insert`].
///
/// Recursion (rather than a loop that keeps re-borrowing through `link`)
/// is what lets the borrow checker accept walking a `&mut Option<Box<_>>`
/// chain while still being able to splice a node in at the end.
fn insert_at<T: Bounded + Ord>(link: &mut Option<Box<Cell<T>>>, value: T) -> bool {
    let cell = link
        .as_deref()
        .expect("traversal cannot advance past the tail sentinel");
    if !cell.is_tail() && cell.value < value {
        return insert_at(&mut link.as_mut().expect("checked above").next, value);
    }
    if !cell.is_tail() && cell.value == value {
        return false;
    }
    let successor = link.take().expect("successor cell just observed");
    *link = Some(Box::new(Cell {
        value,
        next: Some(successor),
    }));
    true
}

/// Recursive traversal helper for [`CoarseLockSet::remove`]. See
/// [`insert_at`] for why recursion is used instead of a loop.
///
/// Returns the spliced-out victim cell (with its `next` already cleared)
/// rather than dropping it itself, so the caller can defer the drop until
/// after the exclusive lock is released.
fn remove_at<T: Bounded + Ord>(
    link: &mut Option<Box<Cell<T>>>,
    value: &T,
) -> Option<Box<Cell<T>>> {
    let cell = link
        .as_deref()
        .expect("traversal cannot advance past the tail sentinel");
    if !cell.is_tail() && cell.value < *value {
        return remove_at(&mut link.as_mut().expect("checked above").next, value);
    }
    let matched = !cell.is_tail() && cell.value == *value;
    if !matched {
        return None;
    }
    let mut victim = link.take().expect("matched cell just observed");
    *link = victim.next.take();
    Some(victim)
}

impl<T: Bounded + Ord> SortedSet<T> for CoarseLockSet<T> {
    fn insert(&self, value: T) -> bool {
        let mut chain = self.chain.write();
        let inserted = insert_at(&mut chain.head.next, value);
        if inserted {
            self.len.fetch_add(1, Ordering::Relaxed);
        }
        inserted
    }

    fn remove(&self, value: &T) -> bool {
        let mut chain = self.chain.write();
        let victim = remove_at(&mut chain.head.next, value);
        let removed = victim.is_some();
        if removed {
            self.len.fetch_sub(1, Ordering::Relaxed);
        }
        // The cell is unreachable once spliced out; free it only after the
        // exclusive lock is released.
        drop(chain);
        drop(victim);
        removed
    }

    fn contains(&self, value: &T) -> bool {
        let chain = self.chain.read();
        let mut cell = chain
            .head
            .next
            .as_deref()
            .expect("head sentinel always has a successor");
        while !cell.is_tail() && cell.value < *value {
            cell = cell
                .next
                .as_deref()
                .expect("data cells always have a successor");
        }
        !cell.is_tail() && cell.value == *value
    }

    fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    fn check_invariants(&self) -> bool {
        let chain = self.chain.read();
        if chain.head.value != T::MIN {
            return false;
        }
        let mut count = 0usize;
        let mut prev: Option<&T> = None;
        let mut cell = match chain.head.next.as_deref() {
            Some(cell) => cell,
            None => return false,
        };
        while !cell.is_tail() {
            if prev.is_some_and(|prev| *prev >= cell.value) {
                return false;
            }
            prev = Some(&cell.value);
            count += 1;
            cell = match cell.next.as_deref() {
                Some(next) => next,
                None => return false,
            };
        }
        cell.value == T::MAX && count == self.len.load(Ordering::Relaxed)
    }
}

impl<T> Drop for CoarseLockSet<T> {
    fn drop(&mut self) {
        // Unlink iteratively so dropping a long chain of boxes cannot
        // overflow the stack.
        let mut next = self.chain.get_mut().head.next.take();
        while let Some(mut cell) = next {
            next = cell.next.take();
        }
    }
}
