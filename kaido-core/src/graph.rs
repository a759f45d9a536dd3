//! Read-only road-network view consumed by the search engine.
//!
//! Construction happens up front (ingestion itself lives outside this
//! crate); during a search both mappings are immutable, so arbitrary
//! concurrent readers need no synchronisation.

use std::collections::HashMap;
use std::fmt;

/// Identifier of a road-network node (OSM-style 64-bit id).
///
/// # Examples
/// ```
/// use kaido_core::NodeId;
///
/// let id = NodeId::new(42);
/// assert_eq!(id.get(), 42);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(i64);

impl NodeId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for NodeId {
    fn from(raw: i64) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node with its geographic attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadNode {
    /// Identifier of this node.
    pub id: NodeId,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// A directed edge to `target` with a traversal cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadEdge {
    /// Identifier of the edge's target node.
    pub target: NodeId,
    /// Cost of traversing the edge.
    pub weight: f64,
}

/// Immutable adjacency and attribute mappings over a road network.
///
/// # Examples
/// ```
/// use kaido_core::{NodeId, RoadNetwork};
///
/// let network = RoadNetwork::builder()
///     .with_node(1, 51.5074, -0.1278)
///     .with_node(2, 48.8566, 2.3522)
///     .with_edge(1, 2, 343.0)
///     .build();
/// assert_eq!(network.node_count(), 2);
/// assert_eq!(network.neighbours(NodeId::new(1)).map(<[_]>::len), Some(1));
/// assert!(network.neighbours(NodeId::new(2)).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RoadNetwork {
    nodes: HashMap<NodeId, RoadNode>,
    adjacency: HashMap<NodeId, Vec<RoadEdge>>,
}

impl RoadNetwork {
    /// Builds a network directly from its two mappings.
    ///
    /// No cross-validation is performed; see [`RoadNetwork::builder`] for
    /// incremental construction.
    #[must_use]
    pub fn new(
        nodes: HashMap<NodeId, RoadNode>,
        adjacency: HashMap<NodeId, Vec<RoadEdge>>,
    ) -> Self {
        Self { nodes, adjacency }
    }

    /// Starts building a network.
    #[must_use]
    pub fn builder() -> RoadNetworkBuilder {
        RoadNetworkBuilder::default()
    }

    /// Returns the attributes of `id`, if it is part of the network.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&RoadNode> {
        self.nodes.get(&id)
    }

    /// Returns the outgoing edges of `id`.
    ///
    /// `None` means the node has no adjacency entry at all; nodes can be
    /// present in the attribute mapping without any outgoing edges.
    #[must_use]
    pub fn neighbours(&self, id: NodeId) -> Option<&[RoadEdge]> {
        self.adjacency.get(&id).map(Vec::as_slice)
    }

    /// Number of nodes in the attribute mapping.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Accumulates nodes and edges before freezing them into a [`RoadNetwork`].
///
/// The builder performs no cross-validation: an edge may reference a node
/// that never receives attributes. The search engine treats such edges as a
/// recoverable inconsistency, logging a warning and skipping them.
#[derive(Clone, Debug, Default)]
pub struct RoadNetworkBuilder {
    nodes: HashMap<NodeId, RoadNode>,
    adjacency: HashMap<NodeId, Vec<RoadEdge>>,
}

impl RoadNetworkBuilder {
    /// Registers a node and its coordinates, replacing any previous entry.
    #[must_use]
    pub fn with_node(mut self, id: impl Into<NodeId>, lat: f64, lon: f64) -> Self {
        let id = id.into();
        self.nodes.insert(id, RoadNode { id, lat, lon });
        self
    }

    /// Appends a directed edge from `from` to `to`.
    #[must_use]
    pub fn with_edge(mut self, from: impl Into<NodeId>, to: impl Into<NodeId>, weight: f64) -> Self {
        self.adjacency.entry(from.into()).or_default().push(RoadEdge {
            target: to.into(),
            weight,
        });
        self
    }

    /// Appends edges in both directions with the same weight.
    #[must_use]
    pub fn with_bidirectional_edge(
        self,
        a: impl Into<NodeId>,
        b: impl Into<NodeId>,
        weight: f64,
    ) -> Self {
        let a = a.into();
        let b = b.into();
        self.with_edge(a, b, weight).with_edge(b, a, weight)
    }

    /// Freezes the accumulated data into an immutable network.
    #[must_use]
    pub fn build(self) -> RoadNetwork {
        RoadNetwork::new(self.nodes, self.adjacency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_consumes_both_mappings() {
        let id = NodeId::new(5);
        let nodes = HashMap::from([(
            id,
            RoadNode {
                id,
                lat: 10.0,
                lon: 20.0,
            },
        )]);
        let adjacency = HashMap::from([(
            id,
            vec![RoadEdge {
                target: NodeId::new(6),
                weight: 3.0,
            }],
        )]);
        let network = RoadNetwork::new(nodes, adjacency);
        assert_eq!(network.node_count(), 1);
        assert_eq!(network.node(id).map(|n| n.lat), Some(10.0));
        assert_eq!(network.neighbours(id).map(<[_]>::len), Some(1));
    }

    #[test]
    fn builder_collects_nodes_and_edges() {
        let network = RoadNetwork::builder()
            .with_node(1, 0.0, 0.0)
            .with_node(2, 1.0, 1.0)
            .with_bidirectional_edge(1, 2, 5.0)
            .build();
        assert_eq!(network.node_count(), 2);
        let forward = network.neighbours(NodeId::new(1)).expect("edges present");
        assert_eq!(forward, [RoadEdge { target: NodeId::new(2), weight: 5.0 }]);
        let backward = network.neighbours(NodeId::new(2)).expect("edges present");
        assert_eq!(backward[0].target, NodeId::new(1));
    }

    #[test]
    fn missing_nodes_and_edges_are_none() {
        let network = RoadNetwork::builder().with_node(7, 0.0, 0.0).build();
        assert!(network.node(NodeId::new(8)).is_none());
        assert!(network.neighbours(NodeId::new(7)).is_none());
        assert_eq!(network.node(NodeId::new(7)).map(|n| n.id), Some(NodeId::new(7)));
    }

    #[test]
    fn later_node_registration_replaces_earlier() {
        let network = RoadNetwork::builder()
            .with_node(3, 1.0, 1.0)
            .with_node(3, 2.0, 2.0)
            .build();
        assert_eq!(network.node_count(), 1);
        let node = network.node(NodeId::new(3)).expect("node present");
        assert_eq!((node.lat, node.lon), (2.0, 2.0));
    }
}
