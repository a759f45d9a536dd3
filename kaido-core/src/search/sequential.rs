//! Classical single-threaded A* over a binary-heap frontier.

use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, warn};

use crate::graph::{NodeId, RoadNetwork};
use crate::heuristic::Heuristic;

use super::open_set::{OpenEntry, ReverseEntry};
use super::{SearchError, reconstruct_path};

pub(super) fn run(
    network: &RoadNetwork,
    start: NodeId,
    goal: NodeId,
    heuristic: &Heuristic,
) -> Result<Vec<NodeId>, SearchError> {
    let start_node = *network
        .node(start)
        .ok_or(SearchError::UnknownNode { id: start })?;
    let goal_node = *network
        .node(goal)
        .ok_or(SearchError::UnknownNode { id: goal })?;

    debug!(start = start.get(), goal = goal.get(), "sequential search");

    let mut open = BinaryHeap::new();
    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();

    g_score.insert(start, 0.0);
    open.push(ReverseEntry(OpenEntry {
        node: start,
        f_score: heuristic.estimate_km(&start_node, &goal_node),
    }));

    while let Some(ReverseEntry(current)) = open.pop() {
        if current.node == goal {
            let path = reconstruct_path(&came_from, start, goal);
            debug!(hops = path.len(), "goal reached");
            return Ok(path);
        }

        let current_g = g_score.get(&current.node).copied().unwrap_or(f64::INFINITY);
        let Some(edges) = network.neighbours(current.node) else {
            continue;
        };

        for edge in edges {
            let Some(target_node) = network.node(edge.target) else {
                warn!(
                    node = edge.target.get(),
                    "edge targets a node missing from the attribute mapping; skipping"
                );
                continue;
            };
            let tentative_g = current_g + edge.weight;
            let incumbent = g_score.get(&edge.target).copied().unwrap_or(f64::INFINITY);
            if tentative_g < incumbent {
                g_score.insert(edge.target, tentative_g);
                came_from.insert(edge.target, current.node);
                open.push(ReverseEntry(OpenEntry {
                    node: edge.target,
                    f_score: tentative_g + heuristic.estimate_km(target_node, &goal_node),
                }));
            }
        }
    }

    debug!("open set exhausted before reaching the goal");
    Ok(Vec::new())
}
