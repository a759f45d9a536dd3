//! Reference road networks shared by unit and integration tests.

use kaido_core::{NodeId, RoadNetwork, RoadNode, great_circle_km};

/// New York City in the [`triangle`] network.
pub const NYC: NodeId = NodeId::new(1);
/// Los Angeles in the [`triangle`] network.
pub const LOS_ANGELES: NodeId = NodeId::new(2);
/// Chicago in the [`triangle`] network.
pub const CHICAGO: NodeId = NodeId::new(3);

/// Three-city network with Chicago as the only interchange.
///
/// NYC and Los Angeles are connected solely through Chicago, so any route
/// between them must pass through it: `search(NYC, LOS_ANGELES)` yields
/// `[NYC, CHICAGO, LOS_ANGELES]`.
#[must_use]
pub fn triangle() -> RoadNetwork {
    RoadNetwork::builder()
        .with_node(NYC, 40.7128, -74.0060)
        .with_node(LOS_ANGELES, 34.0522, -118.2437)
        .with_node(CHICAGO, 41.8781, -87.6298)
        .with_bidirectional_edge(NYC, CHICAGO, 790.0)
        .with_bidirectional_edge(LOS_ANGELES, CHICAGO, 2015.0)
        .build()
}

/// Diamond network where the upper branch is geographically direct and the
/// lower branch carries a detour factor.
///
/// Nodes sit on real coordinates and edge weights are great-circle
/// distances (scaled by `detour` on the lower branch), so the great-circle
/// heuristic is consistent and sequential A* must route via the upper
/// branch `[1, 2, 4]`.
#[must_use]
pub fn diamond(detour: f64) -> RoadNetwork {
    let node = |id: i64, lat: f64, lon: f64| RoadNode {
        id: NodeId::new(id),
        lat,
        lon,
    };
    let entry = node(1, 50.0, 0.0);
    let upper = node(2, 50.0, 1.0);
    let lower = node(3, 49.0, 1.0);
    let exit = node(4, 50.0, 2.0);

    let mut builder = RoadNetwork::builder();
    for n in [entry, upper, lower, exit] {
        builder = builder.with_node(n.id, n.lat, n.lon);
    }
    builder
        .with_bidirectional_edge(entry.id, upper.id, great_circle_km(&entry, &upper))
        .with_bidirectional_edge(upper.id, exit.id, great_circle_km(&upper, &exit))
        .with_bidirectional_edge(entry.id, lower.id, great_circle_km(&entry, &lower) * detour)
        .with_bidirectional_edge(lower.id, exit.id, great_circle_km(&lower, &exit) * detour)
        .build()
}

/// Two disconnected components: an edge between nodes 1 and 2, and an
/// isolated node 9.
#[must_use]
pub fn disconnected() -> RoadNetwork {
    RoadNetwork::builder()
        .with_node(1, 0.0, 0.0)
        .with_node(2, 0.0, 1.0)
        .with_node(9, 45.0, 45.0)
        .with_bidirectional_edge(1, 2, 10.0)
        .build()
}
