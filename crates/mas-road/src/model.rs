//! The `RoadModel` trait and the movement result type.

use std::any::TypeId;

use mas_core::{EntityId, Point, TimeLapse};
use mas_model::{Capability, ModelError, ModelResult, SimEntity};

use crate::error::RoadResult;

/// Tolerance for "reached the end of a connection" comparisons.
pub(crate) const EPS: f64 = 1e-9;

/// Whole time units needed to cover `distance` at `speed`, clamped to
/// `budget`.  Partial units round up: a mover that spends any fraction of a
/// unit is charged the full unit.
pub(crate) fn travel_time(distance: f64, speed: f64, budget: u64) -> u64 {
    if distance <= 0.0 {
        return 0;
    }
    ((distance / speed).ceil() as u64).min(budget)
}

// ── MoveProgress ──────────────────────────────────────────────────────────────

/// What a single movement operation achieved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoveProgress {
    /// Distance covered, in graph/plane units.
    pub distance: f64,
    /// Time units consumed from the budget.
    pub time_consumed: u64,
    /// Nodes (or waypoints) fully reached, in traversal order.
    pub traveled_nodes: Vec<Point>,
}

// ── RoadModel ─────────────────────────────────────────────────────────────────

/// Position tracking and budgeted movement for spatial objects.
///
/// Objects go through an `UNPLACED → PLACED` lifecycle: an object added
/// without a position is tracked but has no point until placed; movement
/// operations require a placed object.  `kind` is the object's concrete type
/// recorded at claim time, queryable via
/// [`objects_of_type`](Self::objects_of_type).
///
/// Movement consumes simulated time from the caller's [`TimeLapse`] in
/// proportion to `distance / speed` and never overdraws it; a move that runs
/// out of budget leaves the object placed at the point it reached.
pub trait RoadModel {
    /// Track an object without placing it.
    fn add_object(&mut self, id: EntityId, kind: TypeId, speed: f64) -> RoadResult<()>;

    /// Track an object and place it at `position` (which must exist in the
    /// model's space).
    fn add_object_at(
        &mut self,
        id: EntityId,
        kind: TypeId,
        speed: f64,
        position: Point,
    ) -> RoadResult<()>;

    /// Place a tracked, unplaced object.
    fn place(&mut self, id: EntityId, position: Point) -> RoadResult<()>;

    /// Stop tracking an object.
    fn remove_object(&mut self, id: EntityId) -> RoadResult<()>;

    fn contains_object(&self, id: EntityId) -> bool;

    fn is_placed(&self, id: EntityId) -> bool;

    /// Current point of a placed object.
    fn position(&self, id: EntityId) -> RoadResult<Point>;

    /// All tracked objects, in addition order.
    fn object_ids(&self) -> Vec<EntityId>;

    /// Tracked objects whose recorded concrete type is `kind`.
    fn objects_with_kind(&self, kind: TypeId) -> Vec<EntityId>;

    /// Move toward `destination`, spending at most the budget's remaining
    /// time.  Fails with an exhausted budget; otherwise returns how far the
    /// object got.
    fn move_to(
        &mut self,
        id: EntityId,
        destination: Point,
        time: &mut TimeLapse,
    ) -> RoadResult<MoveProgress>;

    /// Advance along `path` waypoint by waypoint within the budget.
    fn follow_path(
        &mut self,
        id: EntityId,
        path: &[Point],
        time: &mut TimeLapse,
    ) -> RoadResult<MoveProgress>;

    /// Chase another tracked object's current point.
    fn move_to_object(
        &mut self,
        id: EntityId,
        target: EntityId,
        time: &mut TimeLapse,
    ) -> RoadResult<MoveProgress> {
        let destination = self.position(target)?;
        self.move_to(id, destination, time)
    }

    /// Typed convenience over [`objects_with_kind`](Self::objects_with_kind).
    fn objects_of_type<T: 'static>(&self) -> Vec<EntityId>
    where
        Self: Sized,
    {
        self.objects_with_kind(TypeId::of::<T>())
    }
}

// ── Registration claim plumbing ───────────────────────────────────────────────

/// Claim an entity on behalf of a road model if it satisfies the road-user
/// role.  Records the entity's concrete type and speed; an initial position
/// places it immediately, otherwise it starts unplaced.
pub(crate) fn claim_road_user(
    model: &mut dyn RoadModel,
    identity: Capability,
    id: EntityId,
    entity: &mut dyn SimEntity,
) -> ModelResult<bool> {
    let Some(user) = entity.as_road_user() else {
        return Ok(false);
    };
    let speed = user.speed();
    let placement = user.initial_position();
    let kind = entity.as_any().type_id();

    let outcome = match placement {
        Some(position) => model.add_object_at(id, kind, speed, position),
        None => model.add_object(id, kind, speed),
    };
    match outcome {
        Ok(()) => Ok(true),
        Err(err) => Err(ModelError::RegistrationFailed {
            model: identity,
            reason: err.to_string(),
        }),
    }
}
