//! Graph-constrained road model: movement restricted to connections.

use std::any::{Any, TypeId};

use indexmap::IndexMap;

use mas_core::{EntityId, Point, TimeLapse};
use mas_graph::{Graph, GraphError, Path, shortest_path};
use mas_model::{Capability, DependencyLookup, Model, ModelBuilder, ModelResult, SimEntity};

use crate::error::{RoadError, RoadResult};
use crate::model::{EPS, MoveProgress, RoadModel, claim_road_user, travel_time};

// ── RoadPosition ──────────────────────────────────────────────────────────────

/// Where a placed object is on the network: parked on a node, or part-way
/// along a directed connection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RoadPosition {
    OnNode(Point),
    OnConnection {
        from: Point,
        to: Point,
        /// Distance covered from `from`, in `[0, connection length)`.
        traveled: f64,
    },
}

pub(crate) struct GraphObject {
    pub(crate) kind: TypeId,
    pub(crate) speed: f64,
    pub(crate) position: Option<RoadPosition>,
}

// ── GraphRoadModel ────────────────────────────────────────────────────────────

/// Road model where objects travel only along graph connections.
///
/// Routing goes through the graph's deterministic shortest-path search.  An
/// object part-way along a connection must finish that connection before it
/// can diverge; its routes therefore start at the connection's endpoint.
pub struct GraphRoadModel {
    pub(crate) graph: Graph,
    pub(crate) objects: IndexMap<EntityId, GraphObject>,
}

impl GraphRoadModel {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            objects: IndexMap::new(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The object's exact network position (node or connection progress).
    pub fn road_position(&self, id: EntityId) -> RoadResult<RoadPosition> {
        let entry = self.objects.get(&id).ok_or(RoadError::UnknownObject(id))?;
        entry.position.ok_or(RoadError::Unplaced(id))
    }

    /// Shortest route from the object's position to `destination`.
    ///
    /// For an object part-way along a connection the route starts at that
    /// connection's endpoint.
    pub fn shortest_path_to(&self, id: EntityId, destination: Point) -> RoadResult<Path> {
        let start = self.route_start(id)?;
        Ok(shortest_path(&self.graph, start, destination)?)
    }

    fn route_start(&self, id: EntityId) -> RoadResult<Point> {
        Ok(match self.road_position(id)? {
            RoadPosition::OnNode(node) => node,
            RoadPosition::OnConnection { to, .. } => to,
        })
    }

    fn point_of(&self, position: RoadPosition) -> Point {
        match position {
            RoadPosition::OnNode(node) => node,
            RoadPosition::OnConnection { from, to, traveled } => {
                let length = self
                    .graph
                    .connection_length(from, to)
                    .unwrap_or(f64::INFINITY);
                from.lerp(to, (traveled / length).clamp(0.0, 1.0))
            }
        }
    }

    /// Walk `path` within the budget, gated at node entry.
    ///
    /// `gate(model, mover, node)` decides whether `mover` may enter `node`'s
    /// resource region; when closed, the mover stops `hold_back` before the
    /// node and keeps the connection position.  The position update commits
    /// once, after planning, together with the budget consumption — an
    /// observer never sees a half-applied move.
    pub(crate) fn advance(
        &mut self,
        id: EntityId,
        path: &[Point],
        time: &mut TimeLapse,
        hold_back: f64,
        gate: impl Fn(&Self, EntityId, Point) -> bool,
    ) -> RoadResult<MoveProgress> {
        if !time.has_time_left() {
            return Err(RoadError::BudgetExhausted);
        }
        let entry = self.objects.get(&id).ok_or(RoadError::UnknownObject(id))?;
        let speed = entry.speed;
        let mut position = entry.position.ok_or(RoadError::Unplaced(id))?;
        if speed <= 0.0 {
            return Err(RoadError::Immobile(id));
        }

        let mut range = speed * time.time_left() as f64;
        let mut distance = 0.0;
        let mut traveled_nodes = Vec::new();

        'waypoints: for &next in path {
            let (from, to, mut traveled) = match position {
                RoadPosition::OnNode(node) if node == next => continue 'waypoints,
                RoadPosition::OnNode(node) => {
                    if !self.graph.has_connection(node, next) {
                        return Err(RoadError::IllegalPath {
                            id,
                            from: node,
                            to: next,
                        });
                    }
                    (node, next, 0.0)
                }
                // Mid-connection objects must finish the connection first.
                RoadPosition::OnConnection { to, .. } if to != next => {
                    return Err(RoadError::IllegalPath {
                        id,
                        from: to,
                        to: next,
                    });
                }
                RoadPosition::OnConnection { from, to, traveled } => (from, to, traveled),
            };

            let length = self
                .graph
                .connection_length(from, to)
                .ok_or(GraphError::UnknownConnection { from, to })?;

            let open = gate(self, id, to);
            let limit = if open {
                length
            } else {
                (length - hold_back).max(traveled)
            };
            let step = (limit - traveled).max(0.0).min(range);
            traveled += step;
            range -= step;
            distance += step;

            if open && length - traveled <= EPS {
                position = RoadPosition::OnNode(to);
                traveled_nodes.push(to);
            } else {
                // Blocked at the region boundary, or out of budget.
                position = RoadPosition::OnConnection { from, to, traveled };
                break 'waypoints;
            }
            if range <= EPS {
                break 'waypoints;
            }
        }

        let consumed = travel_time(distance, speed, time.time_left());
        time.consume(consumed);
        if let Some(entry) = self.objects.get_mut(&id) {
            entry.position = Some(position);
        }
        Ok(MoveProgress {
            distance,
            time_consumed: consumed,
            traveled_nodes,
        })
    }

    pub(crate) fn route_to(&self, id: EntityId, destination: Point) -> RoadResult<Vec<Point>> {
        let start = self.route_start(id)?;
        Ok(shortest_path(&self.graph, start, destination)?.nodes)
    }

    pub(crate) fn insert(
        &mut self,
        id: EntityId,
        kind: TypeId,
        speed: f64,
        position: Option<RoadPosition>,
    ) -> RoadResult<()> {
        if self.objects.contains_key(&id) {
            return Err(RoadError::AlreadyAdded(id));
        }
        self.objects.insert(
            id,
            GraphObject {
                kind,
                speed,
                position,
            },
        );
        Ok(())
    }
}

impl RoadModel for GraphRoadModel {
    fn add_object(&mut self, id: EntityId, kind: TypeId, speed: f64) -> RoadResult<()> {
        self.insert(id, kind, speed, None)
    }

    fn add_object_at(
        &mut self,
        id: EntityId,
        kind: TypeId,
        speed: f64,
        position: Point,
    ) -> RoadResult<()> {
        if !self.graph.contains_node(position) {
            return Err(GraphError::UnknownNode(position).into());
        }
        self.insert(id, kind, speed, Some(RoadPosition::OnNode(position)))
    }

    fn place(&mut self, id: EntityId, position: Point) -> RoadResult<()> {
        if !self.graph.contains_node(position) {
            return Err(GraphError::UnknownNode(position).into());
        }
        let entry = self
            .objects
            .get_mut(&id)
            .ok_or(RoadError::UnknownObject(id))?;
        if entry.position.is_some() {
            return Err(RoadError::AlreadyPlaced(id));
        }
        entry.position = Some(RoadPosition::OnNode(position));
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
        Ok(self.point_of(self.road_position(id)?))
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
        let path = self.route_to(id, destination)?;
        self.advance(id, &path, time, 0.0, |_, _, _| true)
    }

    fn follow_path(
        &mut self,
        id: EntityId,
        path: &[Point],
        time: &mut TimeLapse,
    ) -> RoadResult<MoveProgress> {
        self.advance(id, path, time, 0.0, |_, _, _| true)
    }
}

impl Model for GraphRoadModel {
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

/// Builder registering a [`GraphRoadModel`] with the kernel.
pub struct GraphRoadModelBuilder {
    graph: Graph,
}

impl GraphRoadModelBuilder {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }
}

impl ModelBuilder for GraphRoadModelBuilder {
    fn provides(&self) -> Vec<Capability> {
        vec![Capability::of::<GraphRoadModel>()]
    }

    fn build(&mut self, _deps: &mut DependencyLookup<'_>) -> ModelResult<Box<dyn Model>> {
        Ok(Box::new(GraphRoadModel::new(self.graph.clone())))
    }
}
