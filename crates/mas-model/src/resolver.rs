//! Build-order resolution.
//!
//! Kahn's algorithm over the `dependencies -> provides` edges, with one
//! refinement: among builders whose dependencies are all satisfied, the one
//! declared **first** is built next.  Mutually independent models therefore
//! build in declaration order, making the whole order — and everything
//! downstream of model construction, including RNG distribution order —
//! deterministic for a given builder list.
//!
//! Unsatisfiable or cyclic declarations fail here, at configuration time,
//! with the offending capability or cycle members named.  Nothing is deferred
//! to first use.

use crate::capability::Capability;
use crate::error::{ModelError, ModelResult};
use crate::model::ModelBuilder;

/// Compute the build order for `builders` as indices into the slice.
///
/// The returned sequence contains every index exactly once, ordered so that
/// each builder's dependencies are provided by an earlier builder.
pub fn resolve(builders: &[Box<dyn ModelBuilder>]) -> ModelResult<Vec<usize>> {
    // Map each capability to its providing builder, rejecting duplicates.
    let mut provider_of: Vec<(Capability, usize)> = Vec::new();
    for (i, builder) in builders.iter().enumerate() {
        for capability in builder.provides() {
            if provider_of.iter().any(|&(c, _)| c == capability) {
                return Err(ModelError::DuplicateCapability(capability));
            }
            provider_of.push((capability, i));
        }
    }
    let provider = |capability: Capability| -> Option<usize> {
        provider_of
            .iter()
            .find(|&&(c, _)| c == capability)
            .map(|&(_, i)| i)
    };

    // Validate that every dependency has a provider before ordering.
    for builder in builders.iter() {
        for dep in builder.dependencies() {
            if provider(dep).is_none() {
                return Err(ModelError::UnsatisfiedDependency {
                    capability: dep,
                    required_by: identity(builder.as_ref()),
                });
            }
        }
    }

    // Kahn's algorithm, scanning for the first ready builder each round so
    // ties resolve by declaration order.
    let n = builders.len();
    let mut order = Vec::with_capacity(n);
    let mut placed = vec![false; n];

    while order.len() < n {
        let ready = (0..n).find(|&i| {
            !placed[i]
                && builders[i]
                    .dependencies()
                    .iter()
                    .all(|&dep| placed[provider(dep).expect("validated above")])
        });

        match ready {
            Some(i) => {
                placed[i] = true;
                order.push(i);
            }
            None => {
                // Every unplaced builder waits on another unplaced one.
                let members = (0..n)
                    .filter(|&i| !placed[i])
                    .map(|i| identity(builders[i].as_ref()))
                    .collect();
                return Err(ModelError::DependencyCycle { members });
            }
        }
    }

    Ok(order)
}

/// A builder's display identity: its first provided capability.
fn identity(builder: &dyn ModelBuilder) -> Capability {
    builder
        .provides()
        .first()
        .copied()
        .unwrap_or_else(Capability::of::<()>)
}
