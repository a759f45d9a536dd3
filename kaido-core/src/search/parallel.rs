//! Parallel A* drivers: serial outer loop, parallel edge fan-out.
//!
//! Each expansion splits the popped node's outgoing edges into contiguous
//! chunks and relaxes them on worker threads, either freshly spawned per
//! expansion or drawn from a persistent [`WorkerPool`]. All workers are
//! awaited before the next node is popped, so the expansions themselves
//! never overlap.
//!
//! The g-score and came-from updates are separate critical sections, so a
//! worker can push a neighbour whose g-score a racing worker is about to
//! improve. The result may be a non-optimal (but still valid) path; this is
//! the documented trade-off of the parallel variants.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::thread;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::graph::{NodeId, RoadEdge, RoadNetwork, RoadNode};
use crate::heuristic::Heuristic;

use super::open_set::{FrontierQueue, OpenEntry};
use super::pool::WorkerPool;
use super::{SearchError, WorkerKind, reconstruct_path};

pub(super) fn run<Q: FrontierQueue>(
    network: &RoadNetwork,
    start: NodeId,
    goal: NodeId,
    threads: NonZeroUsize,
    workers: WorkerKind,
    open: &Q,
    heuristic: &Heuristic,
) -> Result<Vec<NodeId>, SearchError> {
    let start_node = *network
        .node(start)
        .ok_or(SearchError::UnknownNode { id: start })?;
    let goal_node = *network
        .node(goal)
        .ok_or(SearchError::UnknownNode { id: goal })?;

    debug!(
        start = start.get(),
        goal = goal.get(),
        threads = threads.get(),
        ?workers,
        "parallel search"
    );

    let g_score = Mutex::new(HashMap::from([(start, 0.0f64)]));
    let came_from = Mutex::new(HashMap::new());
    open.push(OpenEntry {
        node: start,
        f_score: heuristic.estimate_km(&start_node, &goal_node),
    });

    let g_score = &g_score;
    let came_from = &came_from;
    let goal_node = &goal_node;

    thread::scope(|scope| -> Result<Vec<NodeId>, SearchError> {
        let pool = match workers {
            WorkerKind::PersistentPool => Some(WorkerPool::new(scope, threads)),
            WorkerKind::SpawnPerExpansion => None,
        };

        while let Some(current) = open.pop() {
            if current.node == goal {
                let came_from = came_from.lock();
                let path = reconstruct_path(&came_from, start, goal);
                debug!(hops = path.len(), "goal reached");
                return Ok(path);
            }

            let current_g = g_score
                .lock()
                .get(&current.node)
                .copied()
                .unwrap_or(f64::INFINITY);
            let Some(edges) = network.neighbours(current.node) else {
                continue;
            };
            if edges.is_empty() {
                continue;
            }

            let chunk_len = edges.len().div_ceil(threads.get());
            match &pool {
                Some(pool) => {
                    let mut pending = Vec::with_capacity(threads.get());
                    for chunk in edges.chunks(chunk_len) {
                        pending.push(pool.submit(Box::new(move || {
                            relax_chunk(RelaxContext {
                                network,
                                goal_node,
                                heuristic,
                                g_score,
                                came_from,
                                open,
                                chunk,
                                current: current.node,
                                current_g,
                            });
                        }))?);
                    }
                    for handle in pending {
                        handle.wait();
                    }
                }
                None => {
                    let mut pending = Vec::with_capacity(threads.get());
                    for chunk in edges.chunks(chunk_len) {
                        pending.push(scope.spawn(move || {
                            relax_chunk(RelaxContext {
                                network,
                                goal_node,
                                heuristic,
                                g_score,
                                came_from,
                                open,
                                chunk,
                                current: current.node,
                                current_g,
                            });
                        }));
                    }
                    for handle in pending {
                        handle.join().expect("expansion worker panicked");
                    }
                }
            }
        }

        debug!("open set exhausted before reaching the goal");
        Ok(Vec::new())
    })
}

struct RelaxContext<'a, Q> {
    network: &'a RoadNetwork,
    goal_node: &'a RoadNode,
    heuristic: &'a Heuristic,
    g_score: &'a Mutex<HashMap<NodeId, f64>>,
    came_from: &'a Mutex<HashMap<NodeId, NodeId>>,
    open: &'a Q,
    chunk: &'a [RoadEdge],
    current: NodeId,
    current_g: f64,
}

/// Relaxes one contiguous chunk of the popped node's outgoing edges.
///
/// g-score check-and-update and the came-from write are separate critical
/// sections guarded by their own mutexes; the frontier push goes last so a
/// popped entry always finds its g-score already recorded.
fn relax_chunk<Q: FrontierQueue>(ctx: RelaxContext<'_, Q>) {
    for edge in ctx.chunk {
        let Some(target_node) = ctx.network.node(edge.target) else {
            warn!(
                node = edge.target.get(),
                "edge targets a node missing from the attribute mapping; skipping"
            );
            continue;
        };
        let tentative_g = ctx.current_g + edge.weight;
        let improved = {
            let mut g_score = ctx.g_score.lock();
            let incumbent = g_score.get(&edge.target).copied().unwrap_or(f64::INFINITY);
            if tentative_g < incumbent {
                g_score.insert(edge.target, tentative_g);
                true
            } else {
                false
            }
        };
        if improved {
            ctx.came_from.lock().insert(edge.target, ctx.current);
            ctx.open.push(OpenEntry {
                node: edge.target,
                f_score: tentative_g + ctx.heuristic.estimate_km(target_node, ctx.goal_node),
            });
        }
    }
}
