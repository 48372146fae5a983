//! `mas-model` — pluggable models and the registry that wires them together.
//!
//! A *model* is a subsystem that claims registered objects matching its
//! accepted role and exposes capabilities to other models.  At configuration
//! time the registry computes a deterministic build order from each model
//! builder's declared `provides`/`dependencies` sets; at runtime it routes
//! every object registration to all interested models.
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`capability`] | `Capability` — inspectable type-keyed capability tags |
//! | [`entity`]     | `SimEntity` role registry, `TickListener`, `RoadUser`, `ModelReceiver` |
//! | [`model`]      | `Model`, `ModelBuilder`, `DependencyLookup`           |
//! | [`resolver`]   | topological build-order resolution                    |
//! | [`manager`]    | `ModelManager` — built models + registration routing  |
//! | [`error`]      | `ModelError`, `ModelResult<T>`                        |

pub mod capability;
pub mod entity;
pub mod error;
pub mod manager;
pub mod model;
pub mod resolver;


pub use capability::Capability;
pub use entity::{ModelReceiver, RoadUser, SimEntity, TickListener};
pub use error::{ModelError, ModelResult};
pub use manager::ModelManager;
pub use model::{DependencyLookup, Model, ModelBuilder};
pub use resolver::resolve;
