//! Shortest-path search.
//!
//! Standard Dijkstra over the adjacency maps.  Two sources of nondeterminism
//! are closed off:
//!
//! - the heap orders entries by `(cost, node insertion index)`, so equal-cost
//!   frontier nodes pop in insertion order;
//! - relaxation uses strict `<`, so the first predecessor to reach a node at
//!   its final cost — found while scanning successors in insertion order —
//!   is the one kept.
//!
//! Repeated queries over the same graph therefore return the identical route,
//! even when several routes tie on total length.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use mas_core::Point;

use crate::graph::Graph;
use crate::{GraphError, GraphResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a shortest-path query: the node sequence from source to
/// destination (inclusive) and the total length.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Nodes to visit in order.  First element is the source, last the
    /// destination; a trivial query (`from == to`) yields a single node.
    pub nodes: Vec<Point>,
    /// Sum of traversed connection lengths.
    pub length: f64,
}

impl Path {
    /// Number of connections the path traverses.
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Total-ordered f64 wrapper so costs can live in the heap.  Lengths are
/// finite by graph construction, so `total_cmp` never sees NaN here.
#[derive(Copy, Clone, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Compute the minimum-total-length node sequence from `from` to `to`.
///
/// # Errors
///
/// - [`GraphError::UnknownNode`] if either endpoint is not in the graph.
/// - [`GraphError::NoPath`] if the destination is unreachable.
pub fn shortest_path(graph: &Graph, from: Point, to: Point) -> GraphResult<Path> {
    let source = graph.node_index(from).ok_or(GraphError::UnknownNode(from))?;
    let target = graph.node_index(to).ok_or(GraphError::UnknownNode(to))?;

    if source == target {
        return Ok(Path {
            nodes: vec![from],
            length: 0.0,
        });
    }

    let n = graph.node_count();
    // dist[v] = best known cost to reach v.
    let mut dist = vec![f64::INFINITY; n];
    // prev[v] = insertion index of the node that reached v.
    let mut prev = vec![usize::MAX; n];

    dist[source] = 0.0;

    // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key = node insertion index for deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(Cost, usize)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), source)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == target {
            return Ok(reconstruct(graph, &prev, source, target, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node] {
            continue;
        }

        let node_point = graph.node_at(node).expect("index from this graph");
        for conn in graph.out_connections(node_point) {
            let neighbor = graph
                .node_index(conn.to)
                .expect("destination nodes are registered");
            let new_cost = cost + conn.length;

            if new_cost < dist[neighbor] {
                dist[neighbor] = new_cost;
                prev[neighbor] = node;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    Err(GraphError::NoPath { from, to })
}

fn reconstruct(graph: &Graph, prev: &[usize], source: usize, target: usize, total: f64) -> Path {
    let mut indices = vec![target];
    let mut cur = target;
    while cur != source {
        cur = prev[cur];
        indices.push(cur);
    }
    indices.reverse();

    Path {
        nodes: indices
            .into_iter()
            .map(|i| graph.node_at(i).expect("index from this graph"))
            .collect(),
        length: total,
    }
}
