use mas_core::{EntityId, Point};
use mas_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RoadError {
    /// The object was never added to this road model, or was removed.
    #[error("no road object with handle {0}")]
    UnknownObject(EntityId),

    /// The object is already tracked by this road model.
    #[error("road object {0} is already added")]
    AlreadyAdded(EntityId),

    /// The object is tracked but already has a position; placed objects move
    /// via the movement operations, they are not re-placed.
    #[error("road object {0} is already placed")]
    AlreadyPlaced(EntityId),

    /// The object has no position yet.
    #[error("road object {0} is not placed")]
    Unplaced(EntityId),

    /// The point lies outside the plane model's bounds.
    #[error("point {0} is outside the road model bounds")]
    OutOfBounds(Point),

    /// The target resource is held by another object (collision variant).
    #[error("point {0} is occupied")]
    Occupied(Point),

    /// The object's speed is zero; it cannot move.
    #[error("road object {0} is immobile (zero speed)")]
    Immobile(EntityId),

    /// A path leg does not follow an existing connection from the object's
    /// position.
    #[error("object {id} has no connection {from} -> {to} to follow")]
    IllegalPath { id: EntityId, from: Point, to: Point },

    /// Movement was requested with no time budget left.
    #[error("movement requested with an exhausted time budget")]
    BudgetExhausted,

    /// A connection is too short for the collision model's vehicle length:
    /// the resource regions of its two endpoints would overlap.
    #[error(
        "connection {from} -> {to} of length {length} is shorter than \
         twice the vehicle length {vehicle_length}"
    )]
    ConnectionTooShort {
        from: Point,
        to: Point,
        length: f64,
        vehicle_length: f64,
    },

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type RoadResult<T> = Result<T, RoadError>;
