//! Collision-avoiding graph road model.
//!
//! Every graph node, together with the portion of each incident connection
//! within one vehicle length of it, is a resource of capacity 1.  A mover may
//! only cross into a node's region if no other object holds it; a blocked
//! mover stops at the region boundary (`connection length − vehicle length`)
//! and retries on a later tick.  There is no rerouting and no reservation —
//! contention resolves purely by stopping.
//!
//! Occupancy is derived from the position table on every query, so it can
//! never disagree with committed positions.

use std::any::{Any, TypeId};

use mas_core::{EntityId, Point, TimeLapse};
use mas_graph::{Graph, Path};
use mas_model::{Capability, DependencyLookup, Model, ModelBuilder, ModelResult, SimEntity};

use crate::error::{RoadError, RoadResult};
use crate::graph::{GraphRoadModel, RoadPosition};
use crate::model::{MoveProgress, RoadModel, claim_road_user};

/// `true` if any object other than `exclude` holds `node`'s resource region.
fn occupies(
    model: &GraphRoadModel,
    vehicle_length: f64,
    node: Point,
    exclude: Option<EntityId>,
) -> bool {
    model.objects.iter().any(|(&id, object)| {
        if Some(id) == exclude {
            return false;
        }
        match object.position {
            Some(RoadPosition::OnNode(point)) => point == node,
            Some(RoadPosition::OnConnection { from, to, traveled }) => {
                if from == node {
                    traveled < vehicle_length
                } else if to == node {
                    model
                        .graph
                        .connection_length(from, to)
                        .is_some_and(|length| length - traveled < vehicle_length)
                } else {
                    false
                }
            }
            None => false,
        }
    })
}

fn check_spacing(graph: &Graph, vehicle_length: f64) -> RoadResult<()> {
    for conn in graph.connections() {
        if conn.length < 2.0 * vehicle_length {
            return Err(RoadError::ConnectionTooShort {
                from: conn.from,
                to: conn.to,
                length: conn.length,
                vehicle_length,
            });
        }
    }
    Ok(())
}

// ── CollisionGraphRoadModel ───────────────────────────────────────────────────

/// Graph road model where node regions are mutually exclusive resources.
pub struct CollisionGraphRoadModel {
    base: GraphRoadModel,
    vehicle_length: f64,
}

impl CollisionGraphRoadModel {
    /// Fails if any connection is shorter than `2 × vehicle_length` — the
    /// resource regions of its endpoints would overlap.
    ///
    /// # Panics
    /// Panics if `vehicle_length` is not positive.
    pub fn new(graph: Graph, vehicle_length: f64) -> RoadResult<Self> {
        assert!(
            vehicle_length > 0.0 && vehicle_length.is_finite(),
            "vehicle_length must be positive"
        );
        check_spacing(&graph, vehicle_length)?;
        Ok(Self {
            base: GraphRoadModel::new(graph),
            vehicle_length,
        })
    }

    pub fn graph(&self) -> &Graph {
        self.base.graph()
    }

    pub fn vehicle_length(&self) -> f64 {
        self.vehicle_length
    }

    /// `true` if any object currently holds `point`'s resource region.
    ///
    /// Pure read — agents use it to plan around contention instead of
    /// blocking on it.
    pub fn is_occupied(&self, point: Point) -> bool {
        occupies(&self.base, self.vehicle_length, point, None)
    }

    /// The object's exact network position (node or connection progress).
    pub fn road_position(&self, id: EntityId) -> RoadResult<RoadPosition> {
        self.base.road_position(id)
    }

    /// Shortest route from the object's position to `destination`.
    pub fn shortest_path_to(&self, id: EntityId, destination: Point) -> RoadResult<Path> {
        self.base.shortest_path_to(id, destination)
    }

    fn gated(
        &mut self,
        id: EntityId,
        path: &[Point],
        time: &mut TimeLapse,
    ) -> RoadResult<MoveProgress> {
        // Occupancy covers node regions only: movers queued behind the same
        // closed gate all clamp to `length − vehicle_length` and share that
        // mid-connection point.  Follower spacing along a connection is left
        // to the agents (via `is_occupied` planning).
        let vehicle_length = self.vehicle_length;
        self.base
            .advance(id, path, time, vehicle_length, move |model, mover, node| {
                !occupies(model, vehicle_length, node, Some(mover))
            })
    }
}

impl RoadModel for CollisionGraphRoadModel {
    fn add_object(&mut self, id: EntityId, kind: TypeId, speed: f64) -> RoadResult<()> {
        self.base.add_object(id, kind, speed)
    }

    fn add_object_at(
        &mut self,
        id: EntityId,
        kind: TypeId,
        speed: f64,
        position: Point,
    ) -> RoadResult<()> {
        if self.is_occupied(position) {
            return Err(RoadError::Occupied(position));
        }
        self.base.add_object_at(id, kind, speed, position)
    }

    fn place(&mut self, id: EntityId, position: Point) -> RoadResult<()> {
        if self.is_occupied(position) {
            return Err(RoadError::Occupied(position));
        }
        self.base.place(id, position)
    }

    fn remove_object(&mut self, id: EntityId) -> RoadResult<()> {
        self.base.remove_object(id)
    }

    fn contains_object(&self, id: EntityId) -> bool {
        self.base.contains_object(id)
    }

    fn is_placed(&self, id: EntityId) -> bool {
        self.base.is_placed(id)
    }

    fn position(&self, id: EntityId) -> RoadResult<Point> {
        self.base.position(id)
    }

    fn object_ids(&self) -> Vec<EntityId> {
        self.base.object_ids()
    }

    fn objects_with_kind(&self, kind: TypeId) -> Vec<EntityId> {
        self.base.objects_with_kind(kind)
    }

    fn move_to(
        &mut self,
        id: EntityId,
        destination: Point,
        time: &mut TimeLapse,
    ) -> RoadResult<MoveProgress> {
        let path = self.base.route_to(id, destination)?;
        self.gated(id, &path, time)
    }

    fn follow_path(
        &mut self,
        id: EntityId,
        path: &[Point],
        time: &mut TimeLapse,
    ) -> RoadResult<MoveProgress> {
        self.gated(id, path, time)
    }
}

impl Model for CollisionGraphRoadModel {
    fn register(&mut self, id: EntityId, entity: &mut dyn SimEntity) -> ModelResult<bool> {
        claim_road_user(self, Capability::of::<Self>(), id, entity)
    }

    fn unregister(&mut self, id: EntityId) -> ModelResult<bool> {
        Ok(self.base.objects.shift_remove(&id).is_some())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Builder registering a [`CollisionGraphRoadModel`] with the kernel.
///
/// Spacing validation happens here, at scenario-construction time, so a bad
/// graph fails before the kernel configures.
pub struct CollisionGraphRoadModelBuilder {
    graph: Graph,
    vehicle_length: f64,
}

impl CollisionGraphRoadModelBuilder {
    /// # Panics
    /// Panics if `vehicle_length` is not positive.
    pub fn new(graph: Graph, vehicle_length: f64) -> RoadResult<Self> {
        assert!(
            vehicle_length > 0.0 && vehicle_length.is_finite(),
            "vehicle_length must be positive"
        );
        check_spacing(&graph, vehicle_length)?;
        Ok(Self {
            graph,
            vehicle_length,
        })
    }
}

impl ModelBuilder for CollisionGraphRoadModelBuilder {
    fn provides(&self) -> Vec<Capability> {
        vec![Capability::of::<CollisionGraphRoadModel>()]
    }

    fn build(&mut self, _deps: &mut DependencyLookup<'_>) -> ModelResult<Box<dyn Model>> {
        // Spacing was validated when the builder was constructed.
        Ok(Box::new(CollisionGraphRoadModel {
            base: GraphRoadModel::new(self.graph.clone()),
            vehicle_length: self.vehicle_length,
        }))
    }
}
