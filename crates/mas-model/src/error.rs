//! Registry error type.
//!
//! Every variant is a distinguishable failure kind: callers can tell an
//! unsatisfiable dependency from a cycle from a lookup for a capability that
//! was never built.  All of them are surfaced at configuration time or
//! immediately at the failing call — never deferred to first use.

use thiserror::Error;

use crate::Capability;

/// Errors produced by `mas-model`.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A builder requires a capability no builder provides.
    #[error("capability {capability} required by {required_by} is not provided by any model")]
    UnsatisfiedDependency {
        capability: Capability,
        required_by: Capability,
    },

    /// The dependency declarations contain a cycle.
    #[error("model dependency cycle among: {}", format_members(members))]
    DependencyCycle { members: Vec<Capability> },

    /// Two builders declare the same provided capability.
    #[error("capability {0} is provided by more than one model")]
    DuplicateCapability(Capability),

    /// A builder looked up a capability that is not built yet (or never will
    /// be) — a build-order programming error.
    #[error("capability {0} is not available at this point of the build")]
    UnresolvedDependency(Capability),

    /// Post-configuration lookup for a capability that was never built.
    #[error("no model providing {0} was configured")]
    NoSuchModel(Capability),

    /// A model refused a registration it is required to handle.
    #[error("model {model} failed to register entity: {reason}")]
    RegistrationFailed {
        model: Capability,
        reason: String,
    },
}

fn format_members(members: &[Capability]) -> String {
    members
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type ModelResult<T> = Result<T, ModelError>;
