//! The built model set and registration routing.

use mas_core::EntityId;

use crate::capability::Capability;
use crate::entity::SimEntity;
use crate::error::{ModelError, ModelResult};
use crate::model::{DependencyLookup, Model, ModelBuilder};
use crate::resolver::resolve;

/// Holds every built model and routes object registration to all of them.
///
/// Created by [`configure`](Self::configure) from a builder list — there is
/// no way to add a model afterwards, which is what locks the model set at the
/// kernel's configuration boundary.  Models keep their build order, so
/// registration offers are made in a deterministic sequence.
pub struct ModelManager {
    /// Built models with their provided capability sets, in build order.
    entries: Vec<(Vec<Capability>, Box<dyn Model>)>,
}

impl ModelManager {
    /// Resolve the build order and build every model.
    ///
    /// Fails fast on unsatisfiable/cyclic declarations (see
    /// [`resolve`]) or a builder error; on failure no manager exists, so a
    /// half-built model set is unrepresentable.
    pub fn configure(mut builders: Vec<Box<dyn ModelBuilder>>) -> ModelResult<Self> {
        let order = resolve(&builders)?;

        let mut entries: Vec<(Vec<Capability>, Box<dyn Model>)> = Vec::with_capacity(order.len());
        for i in order {
            let provides = builders[i].provides();
            let model = {
                let mut lookup = DependencyLookup::new(&mut entries);
                builders[i].build(&mut lookup)?
            };
            entries.push((provides, model));
        }

        Ok(Self { entries })
    }

    /// An empty manager, for kernels configured with zero models.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` if some built model provides `capability`.
    pub fn contains(&self, capability: Capability) -> bool {
        self.entries
            .iter()
            .any(|(provides, _)| provides.contains(&capability))
    }

    fn position(&self, capability: Capability) -> ModelResult<usize> {
        self.entries
            .iter()
            .position(|(provides, _)| provides.contains(&capability))
            .ok_or(ModelError::NoSuchModel(capability))
    }

    // ── Typed lookup ──────────────────────────────────────────────────────

    /// Fetch the model of concrete type `M`.
    ///
    /// Fails fast with [`ModelError::NoSuchModel`] if no such model was
    /// configured.
    pub fn get<M: Model>(&self) -> ModelResult<&M> {
        let capability = Capability::of::<M>();
        let i = self.position(capability)?;
        self.entries[i]
            .1
            .as_any()
            .downcast_ref::<M>()
            .ok_or(ModelError::NoSuchModel(capability))
    }

    /// Fetch the model of concrete type `M`, mutably.
    pub fn get_mut<M: Model>(&mut self) -> ModelResult<&mut M> {
        let capability = Capability::of::<M>();
        let i = self.position(capability)?;
        self.entries[i]
            .1
            .as_any_mut()
            .downcast_mut::<M>()
            .ok_or(ModelError::NoSuchModel(capability))
    }

    /// Fetch the model providing `capability` as a trait object.
    pub fn get_by_capability(&self, capability: Capability) -> ModelResult<&dyn Model> {
        let i = self.position(capability)?;
        Ok(self.entries[i].1.as_ref())
    }

    // ── Registration routing ──────────────────────────────────────────────

    /// Offer a newly registered object to every model, in build order.
    ///
    /// Returns how many models claimed it.  A model error aborts the routing
    /// and propagates — the caller decides whether to unwind.
    pub fn register_entity(
        &mut self,
        id: EntityId,
        entity: &mut dyn SimEntity,
    ) -> ModelResult<usize> {
        let mut claims = 0;
        for (_, model) in self.entries.iter_mut() {
            if model.register(id, entity)? {
                claims += 1;
            }
        }
        Ok(claims)
    }

    /// Offer the removal of an object to every model, in build order.
    ///
    /// Returns how many models were tracking it.
    pub fn unregister_entity(&mut self, id: EntityId) -> ModelResult<usize> {
        let mut claims = 0;
        for (_, model) in self.entries.iter_mut() {
            if model.unregister(id)? {
                claims += 1;
            }
        }
        Ok(claims)
    }
}
