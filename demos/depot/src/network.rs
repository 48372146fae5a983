//! Synthetic city grid for the depot demo.

use mas_core::Point;
use mas_graph::{Graph, GraphResult};

/// Build a `side × side` grid of two-way streets with `spacing` units
/// between adjacent intersections.  Nodes are returned row-major.
pub fn build_grid(side: usize, spacing: f64) -> GraphResult<(Graph, Vec<Point>)> {
    let mut graph = Graph::new();
    let at = |col: usize, row: usize| Point::new(col as f64 * spacing, row as f64 * spacing);

    let mut nodes = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            let here = at(col, row);
            nodes.push(here);
            if col + 1 < side {
                graph.add_undirected_connection(here, at(col + 1, row))?;
            }
            if row + 1 < side {
                graph.add_undirected_connection(here, at(col, row + 1))?;
            }
        }
    }
    Ok((graph, nodes))
}
