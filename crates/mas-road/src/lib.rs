//! `mas-road` — spatial position tracking and budgeted movement.
//!
//! Three road models with progressively stronger contracts, all registerable
//! with the kernel as models that claim road-user entities:
//!
//! - [`PlaneRoadModel`]: straight-line travel inside rectangular bounds.
//! - [`GraphRoadModel`]: travel restricted to graph connections, with
//!   deterministic shortest-path routing.
//! - [`CollisionGraphRoadModel`]: additionally treats node regions as
//!   capacity-1 resources; blocked movers stop and retry.
//!
//! # Crate layout
//!
//! | Module        | Contents                                            |
//! |---------------|-----------------------------------------------------|
//! | [`model`]     | `RoadModel` trait, `MoveProgress`                   |
//! | [`plane`]     | `PlaneRoadModel` + builder                          |
//! | [`graph`]     | `GraphRoadModel`, `RoadPosition` + builder          |
//! | [`collision`] | `CollisionGraphRoadModel`, occupancy + builder      |
//! | [`error`]     | `RoadError`, `RoadResult<T>`                        |

pub mod collision;
pub mod error;
pub mod graph;
pub mod model;
pub mod plane;


pub use collision::{CollisionGraphRoadModel, CollisionGraphRoadModelBuilder};
pub use error::{RoadError, RoadResult};
pub use graph::{GraphRoadModel, GraphRoadModelBuilder, RoadPosition};
pub use model::{MoveProgress, RoadModel};
pub use plane::{PlaneRoadModel, PlaneRoadModelBuilder};
