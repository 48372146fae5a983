//! The `Model` and `ModelBuilder` traits and the build-time dependency view.

use std::any::Any;

use mas_core::EntityId;

use crate::capability::Capability;
use crate::entity::SimEntity;
use crate::error::{ModelError, ModelResult};

// ── Model ─────────────────────────────────────────────────────────────────────

/// A pluggable subsystem participating in object registration.
///
/// A model is offered every object registered with the kernel and claims the
/// ones matching its accepted role (via the [`SimEntity`] role views, or an
/// `as_any` downcast for model-specific roles).  Declining is not an error —
/// the kernel merely records which models claimed the object.
pub trait Model: 'static {
    /// Offer a newly registered object.  Return `Ok(true)` to claim it,
    /// `Ok(false)` to decline.  `Err` means the object matched this model's
    /// role but could not be accepted (e.g. an invalid placement).
    fn register(&mut self, id: EntityId, entity: &mut dyn SimEntity) -> ModelResult<bool>;

    /// Offer the removal of a previously registered object.  Return
    /// `Ok(true)` if this model was tracking it.
    fn unregister(&mut self, id: EntityId) -> ModelResult<bool>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ── ModelBuilder ──────────────────────────────────────────────────────────────

/// Configuration-time descriptor of a model.
///
/// Builders declare capability sets up front so the registry can compute a
/// build order before any model exists; `build` runs once, in resolved order,
/// with a [`DependencyLookup`] restricted to models built earlier.
pub trait ModelBuilder {
    /// Capabilities this model will provide.  Must be non-empty; the first
    /// entry doubles as the model's display identity in diagnostics.
    fn provides(&self) -> Vec<Capability>;

    /// Capabilities that must be built before this model.
    fn dependencies(&self) -> Vec<Capability> {
        Vec::new()
    }

    /// Instantiate the model.  Called exactly once; builders may move
    /// configuration out of themselves (`Option::take`).
    fn build(&mut self, deps: &mut DependencyLookup<'_>) -> ModelResult<Box<dyn Model>>;
}

// ── DependencyLookup ──────────────────────────────────────────────────────────

/// Build-time view over the models built so far.
///
/// Handed to each [`ModelBuilder::build`] call.  Looking up a capability that
/// is not built yet is a fatal construction error — the resolver guarantees
/// declared dependencies are present, so hitting it means an undeclared
/// dependency.
pub struct DependencyLookup<'a> {
    built: &'a mut [(Vec<Capability>, Box<dyn Model>)],
}

impl<'a> DependencyLookup<'a> {
    pub(crate) fn new(built: &'a mut [(Vec<Capability>, Box<dyn Model>)]) -> Self {
        Self { built }
    }

    fn position(&self, capability: Capability) -> Option<usize> {
        self.built
            .iter()
            .position(|(provides, _)| provides.contains(&capability))
    }

    /// Fetch an already-built model by its concrete type.
    pub fn get<M: Model>(&self) -> ModelResult<&M> {
        let capability = Capability::of::<M>();
        let i = self
            .position(capability)
            .ok_or(ModelError::UnresolvedDependency(capability))?;
        self.built[i]
            .1
            .as_any()
            .downcast_ref::<M>()
            .ok_or(ModelError::UnresolvedDependency(capability))
    }

    /// Fetch an already-built model by its concrete type, mutably.
    pub fn get_mut<M: Model>(&mut self) -> ModelResult<&mut M> {
        let capability = Capability::of::<M>();
        let i = self
            .position(capability)
            .ok_or(ModelError::UnresolvedDependency(capability))?;
        self.built[i]
            .1
            .as_any_mut()
            .downcast_mut::<M>()
            .ok_or(ModelError::UnresolvedDependency(capability))
    }
}
