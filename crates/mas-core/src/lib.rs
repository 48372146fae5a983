//! `mas-core` — foundational types for the `rust_mas` simulation framework.
//!
//! This crate is a dependency of every other `mas-*` crate.  It intentionally
//! has no `mas-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                             |
//! |------------|------------------------------------------------------|
//! | [`ids`]    | `EntityId`                                           |
//! | [`point`]  | `Point`, Euclidean distance                          |
//! | [`time`]   | `SimClock`, `TimeLapse`                              |
//! | [`rng`]    | `MasterRng` (process-wide), `DerivedRng` (private)   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                               |
//! |---------|------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.  |

pub mod ids;
pub mod point;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::EntityId;
pub use point::Point;
pub use rng::{DerivedRng, MasterRng};
pub use time::{SimClock, TimeLapse};
