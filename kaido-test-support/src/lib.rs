//! Shared test utilities used across kaido crates.

pub mod networks;
pub mod tickets;
pub mod tracing;

use kaido_core::{NodeId, RoadNetwork};

/// Asserts that `path` is a walk over existing edges from `start` to `goal`.
///
/// Used by the parallel-search tests, whose only path guarantee is validity
/// (the parallel variants may return non-optimal routes).
///
/// # Panics
/// Panics when the path is empty, has the wrong endpoints, or uses an edge
/// that does not exist in `network`.
pub fn assert_valid_walk(network: &RoadNetwork, path: &[NodeId], start: NodeId, goal: NodeId) {
    assert!(!path.is_empty(), "path must not be empty");
    assert_eq!(path[0], start, "path must begin at the start node");
    assert_eq!(*path.last().expect("non-empty"), goal, "path must end at the goal node");
    for pair in path.windows(2) {
        let edges = network
            .neighbours(pair[0])
            .unwrap_or_else(|| panic!("node {} has no outgoing edges", pair[0]));
        assert!(
            edges.iter().any(|edge| edge.target == pair[1]),
            "no edge from {} to {}",
            pair[0],
            pair[1],
        );
    }
}
