//! Graph-subsystem error type.

use thiserror::Error;

use mas_core::Point;

/// Errors produced by `mas-graph`.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("self-loop connection at {0} is not allowed")]
    SelfLoop(Point),

    #[error("connection {from} -> {to} already exists")]
    ConnectionExists { from: Point, to: Point },

    #[error("connection {from} -> {to} does not exist")]
    UnknownConnection { from: Point, to: Point },

    #[error("node {0} is not part of the graph")]
    UnknownNode(Point),

    #[error("connection {from} -> {to} has invalid length {length}")]
    InvalidLength { from: Point, to: Point, length: f64 },

    #[error("no path from {from} to {to}")]
    NoPath { from: Point, to: Point },
}

pub type GraphResult<T> = Result<T, GraphError>;
