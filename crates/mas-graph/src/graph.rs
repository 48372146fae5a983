//! Graph representation.
//!
//! # Data layout
//!
//! Adjacency is a two-level [`IndexMap`]: node → (successor → length).  Both
//! levels preserve insertion order, so `nodes()` and `connections()` iterate
//! in the order connections were added — the determinism anchor for
//! shortest-path tie-breaking (see [`crate::path`]).
//!
//! Every node mentioned by any connection (source *or* destination) is a key
//! of the outer map, so isolated destinations are still enumerable and
//! indexable.

use indexmap::IndexMap;

use mas_core::{MasterRng, Point};

use crate::{GraphError, GraphResult};

/// A directed connection and its length, as returned by enumeration queries.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Connection {
    pub from: Point,
    pub to: Point,
    pub length: f64,
}

/// Mutable weighted directed graph over 2-D points.
///
/// Reads go through `&Graph`; the mutating operations are the explicit
/// `add_*`/`remove_*` set below.  Self-loops are rejected, and an existing
/// connection cannot be silently overwritten — remove it first.
#[derive(Default, Clone)]
pub struct Graph {
    adjacency: IndexMap<Point, IndexMap<Point, f64>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn connection_count(&self) -> usize {
        self.adjacency.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn contains_node(&self, node: Point) -> bool {
        self.adjacency.contains_key(&node)
    }

    pub fn has_connection(&self, from: Point, to: Point) -> bool {
        self.adjacency
            .get(&from)
            .is_some_and(|succ| succ.contains_key(&to))
    }

    /// Length of the `from -> to` connection, or `None` if absent.
    pub fn connection_length(&self, from: Point, to: Point) -> Option<f64> {
        self.adjacency.get(&from)?.get(&to).copied()
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = Point> + '_ {
        self.adjacency.keys().copied()
    }

    /// Insertion index of `node`, used as the deterministic tie-break key in
    /// shortest-path search.
    pub(crate) fn node_index(&self, node: Point) -> Option<usize> {
        self.adjacency.get_index_of(&node)
    }

    pub(crate) fn node_at(&self, index: usize) -> Option<Point> {
        self.adjacency.get_index(index).map(|(p, _)| *p)
    }

    /// Outgoing connections of `from`, in insertion order.
    ///
    /// Empty iterator if `from` is not in the graph.
    pub fn out_connections(&self, from: Point) -> impl Iterator<Item = Connection> + '_ {
        self.adjacency
            .get(&from)
            .into_iter()
            .flat_map(move |succ| {
                succ.iter()
                    .map(move |(&to, &length)| Connection { from, to, length })
            })
    }

    /// Out-degree of `from` (0 for unknown nodes).
    pub fn out_degree(&self, from: Point) -> usize {
        self.adjacency.get(&from).map_or(0, IndexMap::len)
    }

    /// All connections, grouped by source node, in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.adjacency.iter().flat_map(|(&from, succ)| {
            succ.iter()
                .map(move |(&to, &length)| Connection { from, to, length })
        })
    }

    /// A uniformly chosen node, drawn from `rng`.  `None` on an empty graph.
    ///
    /// Selection is by insertion index, so the draw is reproducible for a
    /// fixed construction sequence and rng state.
    pub fn random_node(&self, rng: &mut MasterRng) -> Option<Point> {
        if self.adjacency.is_empty() {
            return None;
        }
        let i = rng.gen_range(0..self.adjacency.len());
        self.node_at(i)
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Add a directed connection with the default (Euclidean) length.
    pub fn add_connection(&mut self, from: Point, to: Point) -> GraphResult<()> {
        let length = from.distance(to);
        self.add_connection_with_length(from, to, length)
    }

    /// Add a directed connection with an explicit length override.
    pub fn add_connection_with_length(
        &mut self,
        from: Point,
        to: Point,
        length: f64,
    ) -> GraphResult<()> {
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        if !(length.is_finite() && length > 0.0) {
            return Err(GraphError::InvalidLength { from, to, length });
        }
        if self.has_connection(from, to) {
            return Err(GraphError::ConnectionExists { from, to });
        }
        self.adjacency.entry(from).or_default().insert(to, length);
        // Destination nodes are first-class even before they grow out-edges.
        self.adjacency.entry(to).or_default();
        Ok(())
    }

    /// Convenience: add connections in **both directions** with the default
    /// length (the common case for two-way roads).
    pub fn add_undirected_connection(&mut self, a: Point, b: Point) -> GraphResult<()> {
        self.add_connection(a, b)?;
        self.add_connection(b, a)
    }

    /// Remove the `from -> to` connection, returning its length.
    pub fn remove_connection(&mut self, from: Point, to: Point) -> GraphResult<f64> {
        self.adjacency
            .get_mut(&from)
            .and_then(|succ| succ.shift_remove(&to))
            .ok_or(GraphError::UnknownConnection { from, to })
    }

    /// Remove `node` and every connection touching it.
    pub fn remove_node(&mut self, node: Point) -> GraphResult<()> {
        if self.adjacency.shift_remove(&node).is_none() {
            return Err(GraphError::UnknownNode(node));
        }
        for succ in self.adjacency.values_mut() {
            succ.shift_remove(&node);
        }
        Ok(())
    }

    /// Add every connection of `other` that is not already present.
    ///
    /// Existing connections keep their length; no override occurs.
    pub fn merge(&mut self, other: &Graph) {
        for conn in other.connections() {
            if !self.has_connection(conn.from, conn.to) {
                // Lengths in `other` already passed validation there.
                let _ = self.add_connection_with_length(conn.from, conn.to, conn.length);
            }
        }
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.node_count())
            .field("connections", &self.connection_count())
            .finish()
    }
}
