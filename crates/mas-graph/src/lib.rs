//! `mas-graph` — weighted directed graph over 2-D points.
//!
//! The foundation of the road-network models: nodes are [`Point`]s, directed
//! connections carry a length (Euclidean by default, overridable).  Iteration
//! over nodes and connections follows **insertion order**, never hash order —
//! shortest-path tie-breaking, and therefore every simulation outcome built on
//! it, is deterministic for a given construction sequence.
//!
//! # Crate layout
//!
//! | Module    | Contents                                        |
//! |-----------|-------------------------------------------------|
//! | [`graph`] | `Graph`, `Connection`                           |
//! | [`path`]  | `Path`, Dijkstra `shortest_path`                |
//! | [`error`] | `GraphError`, `GraphResult<T>`                  |
//!
//! [`Point`]: mas_core::Point

pub mod error;
pub mod graph;
pub mod path;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use graph::{Connection, Graph};
pub use path::{shortest_path, Path};
