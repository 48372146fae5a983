//! Capability tags.
//!
//! A capability is the unit of inter-model dependency: builders declare which
//! capabilities they provide and require, and the registry resolves a build
//! order over those declarations.  Keys are `TypeId`s so lookups are exact,
//! with the type name carried alongside purely for diagnostics — a failed
//! resolution names the offending capability instead of an opaque id.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A type-keyed capability tag.
#[derive(Copy, Clone, Debug)]
pub struct Capability {
    id: TypeId,
    name: &'static str,
}

impl Capability {
    /// The capability tag for type `T` (usually a model type).
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified name of the keyed type.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

// Identity is the TypeId alone; the name is a diagnostic payload.
impl PartialEq for Capability {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Capability {}

impl Hash for Capability {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Last path segment is enough for humans; Debug keeps the full path.
        let short = self.name.rsplit("::").next().unwrap_or(self.name);
        f.write_str(short)
    }
}
