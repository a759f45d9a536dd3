//! Frontier (open-set) representations shared by the search variants.
//!
//! The parallel drivers are generic over [`FrontierQueue`]; the two
//! implementations are a standard binary heap behind a mutex and the
//! internally synchronised [`FineLockQueue`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use parking_lot::Mutex;

use crate::bounded::Bounded;
use crate::graph::NodeId;
use crate::pq::{Comparator, FineLockQueue};

/// A frontier entry: a discovered node and its f-score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct OpenEntry {
    pub(crate) node: NodeId,
    pub(crate) f_score: f64,
}

impl Bounded for OpenEntry {
    const MIN: Self = Self {
        node: NodeId::new(i64::MIN),
        f_score: f64::NEG_INFINITY,
    };
    const MAX: Self = Self {
        node: NodeId::new(i64::MAX),
        f_score: f64::INFINITY,
    };
}

/// Wrapper inverting the f-score order so [`BinaryHeap`] pops the minimum.
///
/// Ties break on the node id to keep pop order deterministic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ReverseEntry(pub(crate) OpenEntry);

impl Eq for ReverseEntry {}

impl Ord for ReverseEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .f_score
            .partial_cmp(&self.0.f_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.0.node.get().cmp(&self.0.node.get()))
    }
}

impl PartialOrd for ReverseEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Orders entries so the smallest f-score is the comparator-greatest
/// element, placing it at the extraction end of [`FineLockQueue`]. Equal
/// f-scores compare as equal, preserving the queue's FIFO tie-break.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct MinFScoreFirst;

impl Comparator<OpenEntry> for MinFScoreFirst {
    fn less(&self, a: &OpenEntry, b: &OpenEntry) -> bool {
        a.f_score
            .partial_cmp(&b.f_score)
            .unwrap_or(Ordering::Equal)
            == Ordering::Greater
    }
}

/// Minimum-f-score-first frontier shared between the outer search loop and
/// its fan-out workers.
pub(crate) trait FrontierQueue: Sync {
    /// Adds a discovered node to the frontier.
    fn push(&self, entry: OpenEntry);

    /// Removes the node with the smallest f-score, or `None` when the
    /// frontier is exhausted.
    fn pop(&self) -> Option<OpenEntry>;
}

/// `std::collections::BinaryHeap` behind a dedicated mutex.
#[derive(Debug, Default)]
pub(crate) struct MutexHeap {
    heap: Mutex<BinaryHeap<ReverseEntry>>,
}

impl FrontierQueue for MutexHeap {
    fn push(&self, entry: OpenEntry) {
        self.heap.lock().push(ReverseEntry(entry));
    }

    fn pop(&self) -> Option<OpenEntry> {
        self.heap.lock().pop().map(|ReverseEntry(entry)| entry)
    }
}

impl FrontierQueue for FineLockQueue<OpenEntry, MinFScoreFirst> {
    fn push(&self, entry: OpenEntry) {
        FineLockQueue::push(self, entry);
    }

    fn pop(&self) -> Option<OpenEntry> {
        FineLockQueue::pop(self)
    }
}
