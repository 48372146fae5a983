//! The distributor: owns the master generator and the shared-instance cache.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use mas_core::MasterRng;

use crate::provider::{RandomProvider, RandomUser};

// ── SharedRng ─────────────────────────────────────────────────────────────────

/// A handle to a generator shared by every registrant that requested the same
/// key type.
///
/// Cloning the handle does not clone the generator: all clones draw from one
/// underlying stream (observable via [`ptr_eq`](Self::ptr_eq)).  Like the
/// master, a shared generator exposes no reseed surface — disturbing a stream
/// several parties depend on would break reproducibility for all of them.
///
/// The simulation runs single-threaded; hence `Rc`, not `Arc`.
#[derive(Clone)]
pub struct SharedRng(Rc<RefCell<SmallRng>>);

impl SharedRng {
    fn new(seed: u64) -> Self {
        SharedRng(Rc::new(RefCell::new(SmallRng::seed_from_u64(seed))))
    }

    /// `true` if both handles draw from the same underlying generator.
    pub fn ptr_eq(&self, other: &SharedRng) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.borrow_mut().r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.borrow_mut().gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&self, p: f64) -> bool {
        self.0.borrow_mut().gen_bool(p.clamp(0.0, 1.0))
    }
}

// ── RngDistributor ────────────────────────────────────────────────────────────

/// Derives independent, reproducible random sources from one master seed.
///
/// For a fixed master seed and a fixed, stable distribution order, every
/// derived seed and generator stream is bit-for-bit identical across runs —
/// the distributor never consults anything but the master stream and its own
/// call history.
pub struct RngDistributor {
    master: MasterRng,
    /// Shared instances keyed by requesting type.  Created on first request;
    /// creation order (not map order) determines each instance's seed.
    shared: HashMap<TypeId, SharedRng>,
}

impl RngDistributor {
    pub fn new(master_seed: u64) -> Self {
        Self {
            master: MasterRng::new(master_seed),
            shared: HashMap::new(),
        }
    }

    /// The master generator, for code that does not go through the
    /// [`RandomUser`] protocol.
    pub fn master(&mut self) -> &mut MasterRng {
        &mut self.master
    }

    /// Hand `user` its one-shot [`RandomProvider`].
    ///
    /// The provider is constructed for this call, passed by value into
    /// [`RandomUser::init_random`], and ceases to exist when that call
    /// returns — there is no way to reach it afterwards.
    pub fn distribute(&mut self, user: &mut dyn RandomUser) {
        user.init_random(RandomProvider::new(self));
    }

    // ── Provider backing (crate-internal) ─────────────────────────────────

    pub(crate) fn derive_seed(&mut self) -> u64 {
        self.master.derive_seed()
    }

    pub(crate) fn master_mut(&mut self) -> &mut MasterRng {
        &mut self.master
    }

    pub(crate) fn shared_for(&mut self, key: TypeId) -> SharedRng {
        let Self { master, shared } = self;
        shared
            .entry(key)
            .or_insert_with(|| SharedRng::new(master.derive_seed()))
            .clone()
    }
}
