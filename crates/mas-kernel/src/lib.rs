//! `mas-kernel` — the tick-stepped simulation kernel.
//!
//! Ties the framework together: collects model builders, crosses the
//! configuration boundary exactly once, routes object registration to the
//! built models, distributes deterministic randomness, and drives the
//! two-phase tick loop.
//!
//! # Crate layout
//!
//! | Module        | Contents                                            |
//! |---------------|-----------------------------------------------------|
//! | [`simulator`] | `Simulator` — configuration, registration, ticking  |
//! | [`observer`]  | `KernelObserver` play-loop callbacks                |
//! | [`error`]     | `SimError`, `SimResult<T>`                          |

pub mod error;
pub mod observer;
pub mod simulator;

#[cfg(test)]
mod tests;

pub use error::{SimError, SimResult};
pub use observer::{KernelObserver, NoopObserver};
pub use simulator::{Simulator, StopHandle};
