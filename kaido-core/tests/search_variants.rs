//! End-to-end coverage of the parallel search variant matrix.
//!
//! The parallel variants give no optimality guarantee, so these tests
//! assert only what the contract promises: termination, correct endpoints,
//! and that any returned path is a walk over existing edges.

use std::num::NonZeroUsize;

use kaido_core::{
    Heuristic, NodeId, OpenSetKind, PenaltyRegion, SearchErrorCode, WorkerKind, search_parallel,
    search_parallel_with_heuristic,
};
use kaido_test_support::networks::{self, CHICAGO, LOS_ANGELES, NYC};
use kaido_test_support::assert_valid_walk;
use rstest::rstest;

fn threads(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("thread count is non-zero")
}

#[rstest]
fn triangle_is_routable_by_every_variant(
    #[values(OpenSetKind::MutexBinaryHeap, OpenSetKind::FineLockQueue)] open_set: OpenSetKind,
    #[values(WorkerKind::SpawnPerExpansion, WorkerKind::PersistentPool)] workers: WorkerKind,
) {
    let network = networks::triangle();
    let path = search_parallel(&network, NYC, LOS_ANGELES, threads(4), open_set, workers)
        .expect("both endpoints exist");
    // Chicago is the only interchange, so even a non-optimal search has
    // exactly one route available.
    assert_eq!(path, [NYC, CHICAGO, LOS_ANGELES]);
}

#[rstest]
fn diamond_paths_are_valid_walks(
    #[values(OpenSetKind::MutexBinaryHeap, OpenSetKind::FineLockQueue)] open_set: OpenSetKind,
    #[values(WorkerKind::SpawnPerExpansion, WorkerKind::PersistentPool)] workers: WorkerKind,
    #[values(1, 2, 8)] thread_count: usize,
) {
    let network = networks::diamond(1.5);
    let path = search_parallel(
        &network,
        NodeId::new(1),
        NodeId::new(4),
        threads(thread_count),
        open_set,
        workers,
    )
    .expect("both endpoints exist");
    assert_valid_walk(&network, &path, NodeId::new(1), NodeId::new(4));
}

#[rstest]
fn unreachable_goal_terminates_with_an_empty_path(
    #[values(OpenSetKind::MutexBinaryHeap, OpenSetKind::FineLockQueue)] open_set: OpenSetKind,
    #[values(WorkerKind::SpawnPerExpansion, WorkerKind::PersistentPool)] workers: WorkerKind,
) {
    let network = networks::disconnected();
    let path = search_parallel(
        &network,
        NodeId::new(1),
        NodeId::new(9),
        threads(4),
        open_set,
        workers,
    )
    .expect("both endpoints exist");
    assert!(path.is_empty());
}

#[rstest]
fn start_equal_to_goal_is_a_single_hop_path(
    #[values(OpenSetKind::MutexBinaryHeap, OpenSetKind::FineLockQueue)] open_set: OpenSetKind,
    #[values(WorkerKind::SpawnPerExpansion, WorkerKind::PersistentPool)] workers: WorkerKind,
) {
    let network = networks::triangle();
    let path = search_parallel(&network, CHICAGO, CHICAGO, threads(2), open_set, workers)
        .expect("endpoint exists");
    assert_eq!(path, [CHICAGO]);
}

#[rstest]
fn unknown_endpoints_are_rejected(
    #[values(OpenSetKind::MutexBinaryHeap, OpenSetKind::FineLockQueue)] open_set: OpenSetKind,
    #[values(WorkerKind::SpawnPerExpansion, WorkerKind::PersistentPool)] workers: WorkerKind,
) {
    let network = networks::triangle();
    let err = search_parallel(
        &network,
        NodeId::new(404),
        LOS_ANGELES,
        threads(4),
        open_set,
        workers,
    )
    .expect_err("start node is unknown");
    assert_eq!(err.code(), SearchErrorCode::UnknownNode);
}

#[rstest]
fn penalised_heuristic_is_honoured_by_parallel_variants(
    #[values(OpenSetKind::MutexBinaryHeap, OpenSetKind::FineLockQueue)] open_set: OpenSetKind,
    #[values(WorkerKind::SpawnPerExpansion, WorkerKind::PersistentPool)] workers: WorkerKind,
) {
    let network = networks::diamond(1.5);
    let region = PenaltyRegion::new(49.5, 50.5, 0.5, 1.5, 1000.0).expect("bounds ordered");
    let path = search_parallel_with_heuristic(
        &network,
        NodeId::new(1),
        NodeId::new(4),
        threads(4),
        open_set,
        workers,
        &Heuristic::Penalised(region),
    )
    .expect("both endpoints exist");
    assert_valid_walk(&network, &path, NodeId::new(1), NodeId::new(4));
}

#[rstest]
fn repeated_runs_terminate(
    #[values(OpenSetKind::MutexBinaryHeap, OpenSetKind::FineLockQueue)] open_set: OpenSetKind,
    #[values(WorkerKind::SpawnPerExpansion, WorkerKind::PersistentPool)] workers: WorkerKind,
) {
    let network = networks::diamond(2.0);
    for _ in 0..8 {
        let path = search_parallel(
            &network,
            NodeId::new(1),
            NodeId::new(4),
            threads(3),
            open_set,
            workers,
        )
        .expect("both endpoints exist");
        assert_valid_walk(&network, &path, NodeId::new(1), NodeId::new(4));
    }
}
