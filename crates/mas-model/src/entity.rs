//! The entity role registry.
//!
//! Objects registered with the kernel are heterogeneous: a truck may want
//! per-tick callbacks, a random stream, and a place on the road network, while
//! a depot only wants the latter.  Rather than runtime type tests against an
//! open set, every registerable object implements [`SimEntity`] and opts into
//! the roles it satisfies by overriding the corresponding `as_*` view — the
//! explicit role-tag registry.  All views default to `None`, so a minimal
//! entity only implements the two `Any` accessors.
//!
//! Models that accept roles beyond this registry downcast through
//! [`SimEntity::as_any_mut`] to their own accepted concrete types.

use std::any::Any;

use mas_core::{EntityId, Point, TimeLapse};
use mas_random::RandomUser;

use crate::manager::ModelManager;

// ── Roles ─────────────────────────────────────────────────────────────────────

/// Per-tick participant.
///
/// Both phases run once per logical step, over the same listener snapshot:
/// every listener's [`tick`](Self::tick) completes before any
/// [`after_tick`](Self::after_tick) begins, so post-phase code observes a
/// fully settled world state.
pub trait TickListener {
    /// Pre-phase: act within the tick's time budget.  `models` gives access
    /// to the built model set (road models etc.); `id` is the listener's own
    /// registration handle.
    fn tick(&mut self, id: EntityId, time: &mut TimeLapse, models: &mut ModelManager);

    /// Post-phase: observe the settled state of this step.  The budget is
    /// read-only here — simulated time is spent in the pre-phase.
    fn after_tick(&mut self, id: EntityId, time: &TimeLapse, models: &mut ModelManager) {
        let _ = (id, time, models);
    }
}

/// Spatial participant, claimable by road models.
pub trait RoadUser {
    /// Where the object wants to be placed when a road model claims it.
    /// `None` leaves it unplaced; it can be placed later via the model.
    fn initial_position(&self) -> Option<Point> {
        None
    }

    /// Movement speed in distance units per time unit.  Zero means the
    /// object is stationary (a depot, a parcel).
    fn speed(&self) -> f64 {
        0.0
    }
}

/// Collaborator that wants a look at the built model set.
///
/// Called exactly once, during the object's registration (models are always
/// fully built by then — ordinary registration requires a configured kernel).
pub trait ModelReceiver {
    fn init_models(&mut self, models: &ModelManager);
}

// ── SimEntity ─────────────────────────────────────────────────────────────────

/// A registerable simulation object.
///
/// The `as_*` methods are role views: return `Some(self)` for each role the
/// object satisfies.  The kernel and the models never test concrete types for
/// the built-in roles — only these views.
pub trait SimEntity: 'static {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn as_tick_listener(&mut self) -> Option<&mut dyn TickListener> {
        None
    }

    fn as_random_user(&mut self) -> Option<&mut dyn RandomUser> {
        None
    }

    fn as_road_user(&self) -> Option<&dyn RoadUser> {
        None
    }

    fn as_model_receiver(&mut self) -> Option<&mut dyn ModelReceiver> {
        None
    }
}
