//! `mas-random` — the random-distribution subsystem.
//!
//! Hands out reproducible random sources, all derived from one master seed.
//! Each registrant receives a [`RandomProvider`] exactly once, during its own
//! registration, and the provider is **one-shot by construction**: every
//! accessor consumes the provider, and its borrow of the distributor ends
//! with the registration call.  Retaining a provider past the callback or
//! calling a second accessor is a compile error, not a runtime check.
//!
//! # Crate layout
//!
//! | Module          | Contents                                     |
//! |-----------------|----------------------------------------------|
//! | [`distributor`] | `RngDistributor`, `SharedRng`                |
//! | [`provider`]    | `RandomProvider`, `RandomUser`               |

pub mod distributor;
pub mod provider;


pub use distributor::{RngDistributor, SharedRng};
pub use provider::{RandomProvider, RandomUser};
