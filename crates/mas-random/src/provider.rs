//! The one-shot provider and the registrant-side trait.

use std::any::TypeId;

use mas_core::{DerivedRng, MasterRng};

use crate::distributor::{RngDistributor, SharedRng};

/// A one-shot capability for obtaining a random source.
///
/// Received by a [`RandomUser`] during its registration, and valid only for
/// the duration of that call.  Every accessor takes `self` by value: at most
/// one of them can ever run on a given provider, and the compiler rejects
/// both a second call and any attempt to stash the provider for later — the
/// borrow of the distributor ends when [`RandomUser::init_random`] returns.
///
/// Which accessor to pick:
///
/// | Accessor                          | Use when…                                        |
/// |-----------------------------------|--------------------------------------------------|
/// | [`seed`](Self::seed)              | you seed your own generator type                 |
/// | [`master_instance`](Self::master_instance) | a quick draw from the global stream is enough |
/// | [`new_instance`](Self::new_instance)       | you want a private, independent stream       |
/// | [`shared_instance`](Self::shared_instance) | all registrants of your kind share a stream  |
pub struct RandomProvider<'a> {
    distributor: &'a mut RngDistributor,
}

impl<'a> RandomProvider<'a> {
    pub(crate) fn new(distributor: &'a mut RngDistributor) -> Self {
        Self { distributor }
    }

    /// Derive and return a fresh seed from the master generator.
    pub fn seed(self) -> u64 {
        self.distributor.derive_seed()
    }

    /// The master generator itself.
    ///
    /// Generation methods pass through; reseeding is impossible — the wrapper
    /// has no such surface.  The borrow lasts at most until the registration
    /// call returns.
    pub fn master_instance(self) -> &'a mut MasterRng {
        self.distributor.master_mut()
    }

    /// A fresh private generator, seeded from the master.
    pub fn new_instance(self) -> DerivedRng {
        self.distributor.master_mut().derive()
    }

    /// The shared generator for key type `K`.
    ///
    /// The first caller for a given `K` creates (and seeds) the instance;
    /// every later caller for the same `K` receives a handle to the identical
    /// generator.  Different keys never share a stream.
    pub fn shared_instance<K: 'static>(self) -> SharedRng {
        self.distributor.shared_for(TypeId::of::<K>())
    }
}

/// A registrant that consumes randomness.
///
/// Implementors receive their [`RandomProvider`] synchronously, inside the
/// registration call that adds them to the simulation.  Whatever source the
/// implementation takes from the provider must be extracted here; the
/// provider itself cannot outlive the call.
pub trait RandomUser {
    fn init_random(&mut self, provider: RandomProvider<'_>);
}
