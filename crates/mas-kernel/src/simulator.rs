//! The `Simulator` struct: configuration boundary, registration, tick loop.

use std::cell::Cell;
use std::rc::Rc;

use indexmap::IndexMap;

use mas_core::{EntityId, MasterRng, SimClock, TimeLapse};
use mas_model::{Model, ModelBuilder, ModelManager, SimEntity};
use mas_random::RngDistributor;

use crate::{KernelObserver, NoopObserver, SimError, SimResult};

// ── StopHandle ────────────────────────────────────────────────────────────────

/// Cloneable handle that asks the play loop to stop at the next tick boundary.
///
/// Objects ticking inside the loop cannot reach the [`Simulator`] (it is
/// mutably borrowed while they run), so stopping from within goes through this
/// handle instead.  Requests are honored after the current tick completes.
#[derive(Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    /// Request the play loop to stop after the current tick.
    pub fn request_stop(&self) {
        self.0.set(true);
    }

    fn take(&self) -> bool {
        self.0.replace(false)
    }
}

// ── Simulator ─────────────────────────────────────────────────────────────────

/// The tick-stepped simulation kernel.
///
/// A `Simulator` has two phases separated by the **configuration boundary**:
///
/// 1. **Configuration**: [`add_model`](Self::add_model) collects model
///    builders.  Ordinary object registration is rejected here — the models
///    that would claim the objects do not exist yet.
/// 2. **Running**: [`configure`](Self::configure) resolves the builders'
///    capability dependencies, builds every model in that order, and locks
///    the model set.  From then on [`register`](Self::register) routes
///    objects to all models and [`tick`](Self::tick) drives the world.
///
/// Crossing the boundary is one-way; a second `configure` (explicit or via
/// the first `tick`) is an error or a no-op respectively.
///
/// All observable orders — model build order, registration routing order,
/// listener tick order, RNG distribution order — are fixed by declaration
/// and registration order, which is what makes a run reproducible from
/// `(master_seed, scenario)` alone.
pub struct Simulator {
    /// Logical clock; `running` is the play/pause flag of [`start`](Self::start).
    clock: SimClock,

    /// Source of all randomness: hands each registered `RandomUser` its
    /// one-shot provider, in registration order.
    random: RngDistributor,

    /// Builders collected before the configuration boundary.  Drained by
    /// `configure`.
    builders: Vec<Box<dyn ModelBuilder>>,

    /// The built model set.  Empty until `configure`.
    models: ModelManager,

    /// All registered objects, in registration order.
    entities: IndexMap<EntityId, Box<dyn SimEntity>>,

    /// Tick subscription list, in subscription order.
    listeners: Vec<EntityId>,

    /// Next handle to assign.
    next_id: u32,

    configured: bool,

    stop: StopHandle,
}

impl Simulator {
    /// Create an unconfigured simulator.
    ///
    /// `master_seed` seeds the master RNG; `time_step` is the tick length in
    /// time units (must be positive).
    pub fn new(master_seed: u64, time_step: u64) -> Self {
        Self {
            clock: SimClock::new(time_step),
            random: RngDistributor::new(master_seed),
            builders: Vec::new(),
            models: ModelManager::empty(),
            entities: IndexMap::new(),
            listeners: Vec::new(),
            next_id: 0,
            configured: false,
            stop: StopHandle::default(),
        }
    }

    // ── Configuration phase ───────────────────────────────────────────────

    /// Add a model builder.  Returns `Ok(false)` without adding if another
    /// already-added builder provides one of the same capabilities.
    ///
    /// Fails with [`SimError::AlreadyConfigured`] after the configuration
    /// boundary.
    pub fn add_model(&mut self, builder: Box<dyn ModelBuilder>) -> SimResult<bool> {
        if self.configured {
            return Err(SimError::AlreadyConfigured);
        }
        let provides = builder.provides();
        let overlap = self
            .builders
            .iter()
            .any(|b| b.provides().iter().any(|c| provides.contains(c)));
        if overlap {
            return Ok(false);
        }
        self.builders.push(builder);
        Ok(true)
    }

    /// Cross the configuration boundary: resolve the build order and build
    /// every model.  Fails on dependency problems, and on a second call.
    pub fn configure(&mut self) -> SimResult<()> {
        if self.configured {
            return Err(SimError::AlreadyConfigured);
        }
        let builders = std::mem::take(&mut self.builders);
        self.models = ModelManager::configure(builders)?;
        self.configured = true;
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Register an object with the kernel.
    ///
    /// Requires a configured kernel.  In order: the object receives its
    /// one-shot random provider (if it is a `RandomUser`), is offered to
    /// every model in build order, receives the built model set (if it is a
    /// `ModelReceiver`), and is subscribed to ticks (if it is a
    /// `TickListener`).  The returned handle reflects registration order.
    pub fn register(&mut self, mut entity: Box<dyn SimEntity>) -> SimResult<EntityId> {
        if !self.configured {
            return Err(SimError::NotConfigured("register"));
        }
        let id = EntityId(self.next_id);
        self.next_id += 1;

        if let Some(user) = entity.as_random_user() {
            self.random.distribute(user);
        }
        self.models.register_entity(id, entity.as_mut())?;
        if let Some(receiver) = entity.as_model_receiver() {
            receiver.init_models(&self.models);
        }
        let is_listener = entity.as_tick_listener().is_some();

        self.entities.insert(id, entity);
        if is_listener {
            self.listeners.push(id);
        }
        Ok(id)
    }

    /// Remove an object, returning ownership of it.
    ///
    /// Requires a configured kernel, like [`register`](Self::register).  The
    /// object is unsubscribed from ticks and every model is offered its
    /// removal.
    pub fn unregister(&mut self, id: EntityId) -> SimResult<Box<dyn SimEntity>> {
        if !self.configured {
            return Err(SimError::NotConfigured("unregister"));
        }
        let entity = self
            .entities
            .shift_remove(&id)
            .ok_or(SimError::UnknownEntity(id))?;
        self.listeners.retain(|&l| l != id);
        self.models.unregister_entity(id)?;
        Ok(entity)
    }

    /// Re-subscribe a registered object to ticks.  No-op if already
    /// subscribed.
    pub fn add_tick_listener(&mut self, id: EntityId) -> SimResult<()> {
        if !self.entities.contains_key(&id) {
            return Err(SimError::UnknownEntity(id));
        }
        if !self.listeners.contains(&id) {
            self.listeners.push(id);
        }
        Ok(())
    }

    /// Unsubscribe an object from ticks without unregistering it.  Returns
    /// whether it was subscribed.  Takes effect at the next tick — a snapshot
    /// already taken still runs.
    pub fn remove_tick_listener(&mut self, id: EntityId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|&l| l != id);
        self.listeners.len() < before
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the world by one tick.  Returns the number of listeners in
    /// this tick's snapshot.
    ///
    /// An unconfigured kernel configures implicitly here (with whatever
    /// builders were added).  The listener set is snapshotted up front:
    /// subscription changes made during the tick apply from the next tick.
    /// Every listener's pre-phase runs before any listener's post-phase, and
    /// each listener's post-phase sees the budget it left behind.
    pub fn tick(&mut self) -> SimResult<usize> {
        if !self.configured {
            self.configure()?;
        }

        let snapshot = self.listeners.clone();
        let mut lapses: Vec<(EntityId, TimeLapse)> = Vec::with_capacity(snapshot.len());

        // Pre-phase: every listener acts within a fresh budget for this tick.
        for &id in &snapshot {
            let Self {
                entities,
                models,
                clock,
                ..
            } = self;
            let Some(entity) = entities.get_mut(&id) else {
                continue; // unregistered mid-tick
            };
            if let Some(listener) = entity.as_tick_listener() {
                let mut lapse = clock.current_lapse();
                listener.tick(id, &mut lapse, models);
                lapses.push((id, lapse));
            }
        }

        // Post-phase: same snapshot, settled world, read-only budgets.
        for (id, lapse) in &lapses {
            let Self {
                entities, models, ..
            } = self;
            let Some(entity) = entities.get_mut(id) else {
                continue;
            };
            if let Some(listener) = entity.as_tick_listener() {
                listener.after_tick(*id, lapse, models);
            }
        }

        self.clock.advance();
        Ok(lapses.len())
    }

    /// Run the play loop until [`stop`](Self::stop) or a
    /// [`StopHandle`] request.  Configures implicitly if needed.
    pub fn start(&mut self) -> SimResult<()> {
        self.start_with(&mut NoopObserver)
    }

    /// [`start`](Self::start) with observer callbacks at tick boundaries.
    pub fn start_with<O: KernelObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        if !self.configured {
            self.configure()?;
        }
        self.clock.running = true;
        while self.clock.running {
            observer.on_tick_start(self.clock.time());
            let ticked = self.tick()?;
            observer.on_tick_end(self.clock.time(), ticked);
            if self.stop.take() {
                self.clock.running = false;
            }
        }
        observer.on_stop(self.clock.time());
        Ok(())
    }

    /// Run exactly `n` ticks from the current position.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Pause the play loop.  Has no effect on a kernel that is not playing.
    pub fn stop(&mut self) {
        self.clock.running = false;
    }

    /// Start if paused, pause if playing.
    ///
    /// Resuming enters the [`start`](Self::start) play loop, so the call
    /// blocks until the next stop request; pausing returns immediately.
    pub fn toggle_play_pause(&mut self) -> SimResult<()> {
        if self.clock.running {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }

    /// A handle that can stop the play loop from inside a tick.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Rewind the clock to time 0.  Registered objects and models keep their
    /// state — this rewinds time, not the world.
    pub fn reset_time(&mut self) {
        self.clock.reset();
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Current simulation time in time units.
    pub fn current_time(&self) -> u64 {
        self.clock.time()
    }

    /// Tick length in time units.
    pub fn time_step(&self) -> u64 {
        self.clock.time_step()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.running
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Borrow a registered object.
    pub fn entity(&self, id: EntityId) -> Option<&dyn SimEntity> {
        self.entities.get(&id).map(|e| e.as_ref())
    }

    /// Borrow a registered object, mutably.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut dyn SimEntity> {
        self.entities.get_mut(&id).map(|e| e.as_mut())
    }

    /// The built model set.
    pub fn models(&self) -> &ModelManager {
        &self.models
    }

    /// The built model set, mutably.
    pub fn models_mut(&mut self) -> &mut ModelManager {
        &mut self.models
    }

    /// Fetch a built model by concrete type.
    pub fn model<M: Model>(&self) -> SimResult<&M> {
        Ok(self.models.get::<M>()?)
    }

    /// Fetch a built model by concrete type, mutably.
    pub fn model_mut<M: Model>(&mut self) -> SimResult<&mut M> {
        Ok(self.models.get_mut::<M>()?)
    }

    /// The master generator, for scenario setup code that does not register
    /// as a `RandomUser`.
    pub fn master_rng(&mut self) -> &mut MasterRng {
        self.random.master()
    }
}
