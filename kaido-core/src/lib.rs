//! Kaido core library.
//!
//! Concurrency subsystem of the kaido routing toolkit: sorted linked-list
//! containers (a coarse- and a fine-grained-locking set, and a fine-grained
//! priority queue with FIFO tie-breaking), a read-only road-network view,
//! and the A* engine (sequential plus four parallel variants) that uses
//! those containers as its frontier.

mod bounded;
mod graph;
mod heuristic;
mod pq;
mod search;
mod set;

pub use crate::{
    bounded::Bounded,
    graph::{NodeId, RoadEdge, RoadNetwork, RoadNetworkBuilder, RoadNode},
    heuristic::{
        BoundsAxis, EARTH_RADIUS_KM, Heuristic, HeuristicError, HeuristicErrorCode, PenaltyRegion,
        great_circle_km,
    },
    pq::{Comparator, FineLockQueue, NaturalOrder},
    search::{
        OpenSetKind, PoolError, PoolErrorCode, Result, SearchError, SearchErrorCode, WorkerKind,
        search, search_parallel, search_parallel_with_heuristic, search_with_heuristic,
    },
    set::{CoarseLockSet, FineLockSet, SortedSet},
};
