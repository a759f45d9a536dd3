//! A* search over a [`RoadNetwork`]: one sequential variant and four
//! parallel variants.
//!
//! The parallel variants cross two independent choices: the open-set
//! representation ([`OpenSetKind`]) and how fan-out workers are provisioned
//! ([`WorkerKind`]). The outer loop is always serial; only the per-edge
//! relaxation of each expansion is parallelised. Because the shared-state
//! updates span several critical sections, the parallel variants trade away
//! A*'s optimality guarantee: returned paths are valid walks but not
//! necessarily minimum-cost ones.

mod open_set;
mod parallel;
pub(crate) mod pool;
mod sequential;

pub use self::pool::{PoolError, PoolErrorCode};

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;

use thiserror::Error;

use crate::graph::{NodeId, RoadNetwork};
use crate::heuristic::Heuristic;
use crate::pq::FineLockQueue;

use self::open_set::{MinFScoreFirst, MutexHeap, OpenEntry};

/// Stable codes describing [`SearchError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum SearchErrorCode {
    /// Start or goal id was missing from the node mapping.
    UnknownNode,
    /// The worker pool rejected an expansion task.
    PoolStopped,
}

impl SearchErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownNode => "SEARCH_UNKNOWN_NODE",
            Self::PoolStopped => "SEARCH_POOL_STOPPED",
        }
    }
}

impl fmt::Display for SearchErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type produced by the search entry points.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SearchError {
    /// Start or goal id was missing from the node mapping.
    #[error("node {id} is not part of the road network")]
    UnknownNode {
        /// The offending identifier.
        id: NodeId,
    },
    /// The worker pool rejected an expansion task.
    #[error("could not dispatch an expansion task: {source}")]
    Pool {
        /// Underlying pool failure.
        #[from]
        source: PoolError,
    },
}

impl SearchError {
    /// Retrieve the stable [`SearchErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> SearchErrorCode {
        match self {
            Self::UnknownNode { .. } => SearchErrorCode::UnknownNode,
            Self::Pool { .. } => SearchErrorCode::PoolStopped,
        }
    }
}

/// Convenient alias for results returned by the search surface.
pub type Result<T> = core::result::Result<T, SearchError>;

/// Open-set representation used by a parallel search.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OpenSetKind {
    /// `std::collections::BinaryHeap` behind a dedicated mutex.
    MutexBinaryHeap,
    /// Internally synchronised [`FineLockQueue`]; no external mutex.
    FineLockQueue,
}

/// Worker provisioning used by a parallel search.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WorkerKind {
    /// Fresh threads per expansion, joined before the next pop.
    SpawnPerExpansion,
    /// A persistent pool with a FIFO task queue.
    PersistentPool,
}

/// Runs sequential A* from `start` to `goal` with the great-circle
/// heuristic.
///
/// Returns the node sequence from `start` to `goal`, or an empty vector
/// when no path exists. With a non-negative consistent heuristic the result
/// is a minimum-cost path.
///
/// # Errors
/// Returns [`SearchError::UnknownNode`] when either endpoint is missing
/// from the node mapping.
///
/// # Examples
/// ```
/// use kaido_core::{NodeId, RoadNetwork, search};
///
/// let network = RoadNetwork::builder()
///     .with_node(1, 40.7128, -74.0060)
///     .with_node(2, 34.0522, -118.2437)
///     .with_node(3, 41.8781, -87.6298)
///     .with_bidirectional_edge(1, 3, 790.0)
///     .with_bidirectional_edge(2, 3, 2015.0)
///     .build();
/// let path = search(&network, NodeId::new(1), NodeId::new(2))?;
/// assert_eq!(path, [NodeId::new(1), NodeId::new(3), NodeId::new(2)]);
/// # Ok::<(), kaido_core::SearchError>(())
/// ```
pub fn search(network: &RoadNetwork, start: NodeId, goal: NodeId) -> Result<Vec<NodeId>> {
    sequential::run(network, start, goal, &Heuristic::GreatCircle)
}

/// Runs sequential A* with an explicit [`Heuristic`].
///
/// # Errors
/// Returns [`SearchError::UnknownNode`] when either endpoint is missing
/// from the node mapping.
pub fn search_with_heuristic(
    network: &RoadNetwork,
    start: NodeId,
    goal: NodeId,
    heuristic: &Heuristic,
) -> Result<Vec<NodeId>> {
    sequential::run(network, start, goal, heuristic)
}

/// Runs parallel A* with the great-circle heuristic.
///
/// `threads` workers relax each expansion's edges in contiguous chunks; the
/// outer loop stays serial. The returned path is a valid walk from `start`
/// to `goal` but is not guaranteed to be minimum-cost.
///
/// # Errors
/// Returns [`SearchError::UnknownNode`] when either endpoint is missing
/// from the node mapping.
pub fn search_parallel(
    network: &RoadNetwork,
    start: NodeId,
    goal: NodeId,
    threads: NonZeroUsize,
    open_set: OpenSetKind,
    workers: WorkerKind,
) -> Result<Vec<NodeId>> {
    search_parallel_with_heuristic(
        network,
        start,
        goal,
        threads,
        open_set,
        workers,
        &Heuristic::GreatCircle,
    )
}

/// Runs parallel A* with an explicit [`Heuristic`].
///
/// # Errors
/// Returns [`SearchError::UnknownNode`] when either endpoint is missing
/// from the node mapping.
pub fn search_parallel_with_heuristic(
    network: &RoadNetwork,
    start: NodeId,
    goal: NodeId,
    threads: NonZeroUsize,
    open_set: OpenSetKind,
    workers: WorkerKind,
    heuristic: &Heuristic,
) -> Result<Vec<NodeId>> {
    match open_set {
        OpenSetKind::MutexBinaryHeap => {
            let open = MutexHeap::default();
            parallel::run(network, start, goal, threads, workers, &open, heuristic)
        }
        OpenSetKind::FineLockQueue => {
            let open: FineLockQueue<OpenEntry, MinFScoreFirst> =
                FineLockQueue::with_comparator(MinFScoreFirst);
            parallel::run(network, start, goal, threads, workers, &open, heuristic)
        }
    }
}

/// Walks the parent mapping from `goal` back to the first node without an
/// entry, appends `start`, and reverses.
fn reconstruct_path(
    came_from: &HashMap<NodeId, NodeId>,
    start: NodeId,
    goal: NodeId,
) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut cursor = goal;
    while let Some(&parent) = came_from.get(&cursor) {
        path.push(cursor);
        cursor = parent;
    }
    path.push(start);
    path.reverse();
    path
}
