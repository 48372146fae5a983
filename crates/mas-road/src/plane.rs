//! Unconstrained-plane road model: straight-line travel inside a rectangle.

use std::any::{Any, TypeId};

use indexmap::IndexMap;

use mas_core::{EntityId, Point, TimeLapse};
use mas_model::{Capability, DependencyLookup, Model, ModelBuilder, ModelResult, SimEntity};

use crate::error::{RoadError, RoadResult};
use crate::model::{MoveProgress, RoadModel, claim_road_user, travel_time};

struct PlaneObject {
    kind: TypeId,
    speed: f64,
    position: Option<Point>,
}

/// Road model where any point within rectangular bounds is reachable in a
/// straight line.  Object speed is clamped to the model's `max_speed`.
pub struct PlaneRoadModel {
    min: Point,
    max: Point,
    max_speed: f64,
    objects: IndexMap<EntityId, PlaneObject>,
}

impl PlaneRoadModel {
    /// # Panics
    /// Panics if the bounds are degenerate or `max_speed` is not positive.
    pub fn new(min: Point, max: Point, max_speed: f64) -> Self {
        assert!(
            min.x < max.x && min.y < max.y,
            "plane bounds must span a non-empty rectangle"
        );
        assert!(
            max_speed > 0.0 && max_speed.is_finite(),
            "max_speed must be positive"
        );
        Self {
            min,
            max,
            max_speed,
            objects: IndexMap::new(),
        }
    }

    /// The rectangle's `(min, max)` corners.
    pub fn bounds(&self) -> (Point, Point) {
        (self.min, self.max)
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// `true` if `point` lies within the bounds (inclusive).
    pub fn in_bounds(&self, point: Point) -> bool {
        self.min.x <= point.x && point.x <= self.max.x
            && self.min.y <= point.y && point.y <= self.max.y
    }

    /// Straight-line distance between two tracked objects' points.
    pub fn distance_between(&self, a: EntityId, b: EntityId) -> RoadResult<f64> {
        Ok(self.position(a)?.distance(self.position(b)?))
    }
}

impl RoadModel for PlaneRoadModel {
    fn add_object(&mut self, id: EntityId, kind: TypeId, speed: f64) -> RoadResult<()> {
        if self.objects.contains_key(&id) {
            return Err(RoadError::AlreadyAdded(id));
        }
        self.objects.insert(
            id,
            PlaneObject {
                kind,
                speed,
                position: None,
            },
        );
        Ok(())
    }

    fn add_object_at(
        &mut self,
        id: EntityId,
        kind: TypeId,
        speed: f64,
        position: Point,
    ) -> RoadResult<()> {
        if !self.in_bounds(position) {
            return Err(RoadError::OutOfBounds(position));
        }
        self.add_object(id, kind, speed)?;
        if let Some(entry) = self.objects.get_mut(&id) {
            entry.position = Some(position);
        }
        Ok(())
    }

    fn place(&mut self, id: EntityId, position: Point) -> RoadResult<()> {
        if !self.in_bounds(position) {
            return Err(RoadError::OutOfBounds(position));
        }
        let entry = self
            .objects
            .get_mut(&id)
            .ok_or(RoadError::UnknownObject(id))?;
        if entry.position.is_some() {
            return Err(RoadError::AlreadyPlaced(id));
        }
        entry.position = Some(position);
        Ok(())
    }

    fn remove_object(&mut self, id: EntityId) -> RoadResult<()> {
        self.objects
            .shift_remove(&id)
            .map(|_| ())
            .ok_or(RoadError::UnknownObject(id))
    }

    fn contains_object(&self, id: EntityId) -> bool {
        self.objects.contains_key(&id)
    }

    fn is_placed(&self, id: EntityId) -> bool {
        self.objects
            .get(&id)
            .is_some_and(|entry| entry.position.is_some())
    }

    fn position(&self, id: EntityId) -> RoadResult<Point> {
        let entry = self.objects.get(&id).ok_or(RoadError::UnknownObject(id))?;
        entry.position.ok_or(RoadError::Unplaced(id))
    }

    fn object_ids(&self) -> Vec<EntityId> {
        self.objects.keys().copied().collect()
    }

    fn objects_with_kind(&self, kind: TypeId) -> Vec<EntityId> {
        self.objects
            .iter()
            .filter(|(_, entry)| entry.kind == kind)
            .map(|(&id, _)| id)
            .collect()
    }

    fn move_to(
        &mut self,
        id: EntityId,
        destination: Point,
        time: &mut TimeLapse,
    ) -> RoadResult<MoveProgress> {
        if !self.in_bounds(destination) {
            return Err(RoadError::OutOfBounds(destination));
        }
        if !time.has_time_left() {
            return Err(RoadError::BudgetExhausted);
        }
        let max_speed = self.max_speed;
        let entry = self
            .objects
            .get_mut(&id)
            .ok_or(RoadError::UnknownObject(id))?;
        let from = entry.position.ok_or(RoadError::Unplaced(id))?;
        let speed = entry.speed.min(max_speed);
        if speed <= 0.0 {
            return Err(RoadError::Immobile(id));
        }

        let full = from.distance(destination);
        let reach = speed * time.time_left() as f64;
        let travel = full.min(reach);
        let arrived = full - travel <= f64::EPSILON * full.max(1.0);
        let new_position = if arrived {
            destination
        } else {
            from.lerp(destination, travel / full)
        };
        entry.position = Some(new_position);

        let consumed = travel_time(travel, speed, time.time_left());
        time.consume(consumed);
        Ok(MoveProgress {
            distance: travel,
            time_consumed: consumed,
            traveled_nodes: if arrived { vec![destination] } else { vec![] },
        })
    }

    fn follow_path(
        &mut self,
        id: EntityId,
        path: &[Point],
        time: &mut TimeLapse,
    ) -> RoadResult<MoveProgress> {
        if !time.has_time_left() {
            return Err(RoadError::BudgetExhausted);
        }
        let mut progress = MoveProgress::default();
        for &waypoint in path {
            if !time.has_time_left() {
                break;
            }
            let leg = self.move_to(id, waypoint, time)?;
            let arrived = !leg.traveled_nodes.is_empty();
            progress.distance += leg.distance;
            progress.time_consumed += leg.time_consumed;
            progress.traveled_nodes.extend(leg.traveled_nodes);
            if !arrived {
                break;
            }
        }
        Ok(progress)
    }
}

impl Model for PlaneRoadModel {
    fn register(&mut self, id: EntityId, entity: &mut dyn SimEntity) -> ModelResult<bool> {
        claim_road_user(self, Capability::of::<Self>(), id, entity)
    }

    fn unregister(&mut self, id: EntityId) -> ModelResult<bool> {
        Ok(self.objects.shift_remove(&id).is_some())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Builder registering a [`PlaneRoadModel`] with the kernel.
pub struct PlaneRoadModelBuilder {
    min: Point,
    max: Point,
    max_speed: f64,
}

impl PlaneRoadModelBuilder {
    pub fn new(min: Point, max: Point, max_speed: f64) -> Self {
        Self {
            min,
            max,
            max_speed,
        }
    }
}

impl ModelBuilder for PlaneRoadModelBuilder {
    fn provides(&self) -> Vec<Capability> {
        vec![Capability::of::<PlaneRoadModel>()]
    }

    fn build(&mut self, _deps: &mut DependencyLookup<'_>) -> ModelResult<Box<dyn Model>> {
        Ok(Box::new(PlaneRoadModel::new(
            self.min,
            self.max,
            self.max_speed,
        )))
    }
}
