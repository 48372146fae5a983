//! Unit tests for mas-graph.
//!
//! All tests use hand-crafted graphs so determinism assertions can name exact
//! routes.

#[cfg(test)]
mod helpers {
    use mas_core::Point;

    use crate::Graph;

    pub fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    /// The canonical square with a diagonal shortcut:
    ///
    ///   D(0,10) ── C(10,10)
    ///     │      ╱   │
    ///   A(0,0) ──  B(10,0)
    ///
    /// Ring A→B→C→D→A plus the undirected diagonal A↔C.
    pub fn square_with_diagonal() -> (Graph, [Point; 4]) {
        let a = p(0.0, 0.0);
        let b = p(10.0, 0.0);
        let c = p(10.0, 10.0);
        let d = p(0.0, 10.0);

        let mut g = Graph::new();
        g.add_connection(a, b).unwrap();
        g.add_connection(b, c).unwrap();
        g.add_connection(c, d).unwrap();
        g.add_connection(d, a).unwrap();
        g.add_undirected_connection(a, c).unwrap();

        (g, [a, b, c, d])
    }
}

// ── Construction & queries ────────────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use super::helpers::p;
    use crate::{Graph, GraphError};

    #[test]
    fn empty_graph() {
        let g = Graph::new();
        assert!(g.is_empty());
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.connection_count(), 0);
    }

    #[test]
    fn default_length_is_euclidean() {
        let mut g = Graph::new();
        g.add_connection(p(0.0, 0.0), p(3.0, 4.0)).unwrap();
        assert_eq!(g.connection_length(p(0.0, 0.0), p(3.0, 4.0)), Some(5.0));
    }

    #[test]
    fn length_override() {
        let mut g = Graph::new();
        g.add_connection_with_length(p(0.0, 0.0), p(1.0, 0.0), 42.0)
            .unwrap();
        assert_eq!(g.connection_length(p(0.0, 0.0), p(1.0, 0.0)), Some(42.0));
    }

    #[test]
    fn destination_becomes_a_node() {
        let mut g = Graph::new();
        g.add_connection(p(0.0, 0.0), p(1.0, 0.0)).unwrap();
        assert!(g.contains_node(p(1.0, 0.0)));
        assert_eq!(g.out_degree(p(1.0, 0.0)), 0);
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn self_loop_rejected() {
        let mut g = Graph::new();
        let a = p(1.0, 1.0);
        assert_eq!(g.add_connection(a, a), Err(GraphError::SelfLoop(a)));
        assert!(g.is_empty());
    }

    #[test]
    fn duplicate_connection_rejected() {
        let mut g = Graph::new();
        g.add_connection(p(0.0, 0.0), p(1.0, 0.0)).unwrap();
        let again = g.add_connection(p(0.0, 0.0), p(1.0, 0.0));
        assert!(matches!(again, Err(GraphError::ConnectionExists { .. })));
    }

    #[test]
    fn invalid_length_rejected() {
        let mut g = Graph::new();
        let res = g.add_connection_with_length(p(0.0, 0.0), p(1.0, 0.0), 0.0);
        assert!(matches!(res, Err(GraphError::InvalidLength { .. })));
    }

    #[test]
    fn directed_connections_are_one_way() {
        let mut g = Graph::new();
        g.add_connection(p(0.0, 0.0), p(1.0, 0.0)).unwrap();
        assert!(g.has_connection(p(0.0, 0.0), p(1.0, 0.0)));
        assert!(!g.has_connection(p(1.0, 0.0), p(0.0, 0.0)));
    }

    #[test]
    fn remove_connection_returns_length() {
        let mut g = Graph::new();
        g.add_connection(p(0.0, 0.0), p(0.0, 2.0)).unwrap();
        let len = g.remove_connection(p(0.0, 0.0), p(0.0, 2.0)).unwrap();
        assert_eq!(len, 2.0);
        assert!(!g.has_connection(p(0.0, 0.0), p(0.0, 2.0)));

        let missing = g.remove_connection(p(0.0, 0.0), p(0.0, 2.0));
        assert!(matches!(missing, Err(GraphError::UnknownConnection { .. })));
    }

    #[test]
    fn remove_node_drops_incident_connections() {
        let (mut g, [a, b, c, _d]) = super::helpers::square_with_diagonal();
        g.remove_node(c).unwrap();
        assert!(!g.contains_node(c));
        assert!(!g.has_connection(b, c));
        assert!(!g.has_connection(a, c));
    }

    #[test]
    fn random_node_is_reproducible() {
        use mas_core::MasterRng;

        let (g, _) = super::helpers::square_with_diagonal();
        let a = g.random_node(&mut MasterRng::new(5)).unwrap();
        let b = g.random_node(&mut MasterRng::new(5)).unwrap();
        assert_eq!(a, b);
        assert!(g.contains_node(a));

        assert!(Graph::new().random_node(&mut MasterRng::new(5)).is_none());
    }

    #[test]
    fn merge_skips_existing() {
        let mut base = Graph::new();
        base.add_connection_with_length(p(0.0, 0.0), p(1.0, 0.0), 9.0)
            .unwrap();

        let mut other = Graph::new();
        other.add_connection(p(0.0, 0.0), p(1.0, 0.0)).unwrap(); // length 1.0
        other.add_connection(p(1.0, 0.0), p(2.0, 0.0)).unwrap();

        base.merge(&other);
        // Existing connection keeps its override; new one is added.
        assert_eq!(base.connection_length(p(0.0, 0.0), p(1.0, 0.0)), Some(9.0));
        assert!(base.has_connection(p(1.0, 0.0), p(2.0, 0.0)));
    }
}

// ── Iteration order ───────────────────────────────────────────────────────────

#[cfg(test)]
mod ordering {
    use super::helpers::p;
    use crate::Graph;

    #[test]
    fn nodes_iterate_in_insertion_order() {
        let mut g = Graph::new();
        g.add_connection(p(5.0, 5.0), p(1.0, 1.0)).unwrap();
        g.add_connection(p(3.0, 3.0), p(1.0, 1.0)).unwrap();

        let nodes: Vec<_> = g.nodes().collect();
        assert_eq!(nodes, vec![p(5.0, 5.0), p(1.0, 1.0), p(3.0, 3.0)]);
    }

    #[test]
    fn out_connections_iterate_in_insertion_order() {
        let mut g = Graph::new();
        let a = p(0.0, 0.0);
        g.add_connection(a, p(9.0, 0.0)).unwrap();
        g.add_connection(a, p(1.0, 0.0)).unwrap();
        g.add_connection(a, p(4.0, 0.0)).unwrap();

        let succ: Vec<_> = g.out_connections(a).map(|c| c.to).collect();
        assert_eq!(succ, vec![p(9.0, 0.0), p(1.0, 0.0), p(4.0, 0.0)]);
    }

    #[test]
    fn order_survives_removal() {
        let mut g = Graph::new();
        let a = p(0.0, 0.0);
        g.add_connection(a, p(1.0, 0.0)).unwrap();
        g.add_connection(a, p(2.0, 0.0)).unwrap();
        g.add_connection(a, p(3.0, 0.0)).unwrap();
        g.remove_connection(a, p(2.0, 0.0)).unwrap();

        let succ: Vec<_> = g.out_connections(a).map(|c| c.to).collect();
        assert_eq!(succ, vec![p(1.0, 0.0), p(3.0, 0.0)]);
    }
}

// ── Shortest path ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use super::helpers::{p, square_with_diagonal};
    use crate::{shortest_path, Graph, GraphError};

    #[test]
    fn trivial_same_node() {
        let (g, [a, ..]) = square_with_diagonal();
        let path = shortest_path(&g, a, a).unwrap();
        assert!(path.is_trivial());
        assert_eq!(path.length, 0.0);
        assert_eq!(path.nodes, vec![a]);
    }

    #[test]
    fn diagonal_beats_ring() {
        let (g, [a, _b, c, _d]) = square_with_diagonal();
        let path = shortest_path(&g, a, c).unwrap();

        // Diagonal: sqrt(200) ≈ 14.142; ring A→B→C = 20.
        assert_eq!(path.nodes, vec![a, c]);
        assert!((path.length - 200f64.sqrt()).abs() < 1e-9);
        assert_eq!(path.hops(), 1);
    }

    #[test]
    fn path_length_equals_sum_of_connections() {
        let (g, [a, b, c, d]) = square_with_diagonal();
        // Ring direction: B can only reach D the long way round.
        let path = shortest_path(&g, b, d).unwrap();
        let sum: f64 = path
            .nodes
            .windows(2)
            .map(|w| g.connection_length(w[0], w[1]).unwrap())
            .sum();
        assert_eq!(path.length, sum);
        assert_eq!(path.nodes, vec![b, c, d]);
        let _ = a;
    }

    #[test]
    fn equal_length_routes_tie_break_deterministically() {
        // Two node-disjoint routes of identical length from a to z:
        //   a → m1 → z  (via upper node, inserted first)
        //   a → m2 → z  (via lower node)
        let a = p(0.0, 0.0);
        let m1 = p(5.0, 5.0);
        let m2 = p(5.0, -5.0);
        let z = p(10.0, 0.0);

        let mut g = Graph::new();
        g.add_connection(a, m1).unwrap();
        g.add_connection(m1, z).unwrap();
        g.add_connection(a, m2).unwrap();
        g.add_connection(m2, z).unwrap();

        let first = shortest_path(&g, a, z).unwrap();
        // The earlier-inserted route must win, on every query.
        assert_eq!(first.nodes, vec![a, m1, z]);
        for _ in 0..10 {
            assert_eq!(shortest_path(&g, a, z).unwrap(), first);
        }
    }

    #[test]
    fn unreachable_destination_is_no_path() {
        let mut g = Graph::new();
        g.add_connection(p(0.0, 0.0), p(1.0, 0.0)).unwrap();
        g.add_connection(p(5.0, 5.0), p(6.0, 5.0)).unwrap();

        let res = shortest_path(&g, p(0.0, 0.0), p(6.0, 5.0));
        assert!(matches!(res, Err(GraphError::NoPath { .. })));
    }

    #[test]
    fn one_way_blocks_return() {
        let mut g = Graph::new();
        let a = p(0.0, 0.0);
        let b = p(1.0, 0.0);
        g.add_connection(a, b).unwrap();

        assert!(shortest_path(&g, a, b).is_ok());
        assert!(matches!(
            shortest_path(&g, b, a),
            Err(GraphError::NoPath { .. })
        ));
    }

    #[test]
    fn unknown_endpoint_rejected() {
        let (g, [a, ..]) = square_with_diagonal();
        let ghost = p(99.0, 99.0);
        assert_eq!(
            shortest_path(&g, a, ghost),
            Err(GraphError::UnknownNode(ghost))
        );
        assert_eq!(
            shortest_path(&g, ghost, a),
            Err(GraphError::UnknownNode(ghost))
        );
    }

    #[test]
    fn respects_length_overrides() {
        // Physical shortcut made expensive by an override: the long way wins.
        let a = p(0.0, 0.0);
        let b = p(1.0, 0.0);
        let c = p(2.0, 0.0);

        let mut g = Graph::new();
        g.add_connection_with_length(a, c, 100.0).unwrap(); // direct but costly
        g.add_connection(a, b).unwrap();
        g.add_connection(b, c).unwrap();

        let path = shortest_path(&g, a, c).unwrap();
        assert_eq!(path.nodes, vec![a, b, c]);
        assert_eq!(path.length, 2.0);
    }
}
