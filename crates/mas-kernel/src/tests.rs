//! Unit tests for mas-kernel.

#[cfg(test)]
mod fixtures {
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    use mas_core::{EntityId, TimeLapse};
    use mas_model::{
        Capability, DependencyLookup, Model, ModelBuilder, ModelManager, ModelReceiver,
        ModelResult, SimEntity, TickListener,
    };
    use mas_random::{RandomProvider, RandomUser};

    use crate::StopHandle;

    pub type Log = Rc<RefCell<Vec<String>>>;

    pub fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    /// A model that counts every claim it makes.
    pub struct Counter {
        pub registered: usize,
    }

    impl Model for Counter {
        fn register(&mut self, _id: EntityId, _entity: &mut dyn SimEntity) -> ModelResult<bool> {
            self.registered += 1;
            Ok(true)
        }
        fn unregister(&mut self, _id: EntityId) -> ModelResult<bool> {
            Ok(true)
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    pub struct CounterBuilder;

    impl ModelBuilder for CounterBuilder {
        fn provides(&self) -> Vec<Capability> {
            vec![Capability::of::<Counter>()]
        }
        fn build(&mut self, _deps: &mut DependencyLookup<'_>) -> ModelResult<Box<dyn Model>> {
            Ok(Box::new(Counter { registered: 0 }))
        }
    }

    /// A listener that records both phases into a shared log.
    pub struct Clocked {
        pub label: &'static str,
        pub log: Log,
    }

    impl TickListener for Clocked {
        fn tick(&mut self, _id: EntityId, time: &mut TimeLapse, _models: &mut ModelManager) {
            self.log
                .borrow_mut()
                .push(format!("{}:tick@{}", self.label, time.start_time()));
        }
        fn after_tick(&mut self, _id: EntityId, time: &TimeLapse, _models: &mut ModelManager) {
            self.log
                .borrow_mut()
                .push(format!("{}:after@{}", self.label, time.start_time()));
        }
    }

    impl SimEntity for Clocked {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        fn as_tick_listener(&mut self) -> Option<&mut dyn TickListener> {
            Some(self)
        }
    }

    /// A listener that spends its whole budget every tick and records what it
    /// was given.
    pub struct Spender {
        pub budgets: Vec<u64>,
    }

    impl TickListener for Spender {
        fn tick(&mut self, _id: EntityId, time: &mut TimeLapse, _models: &mut ModelManager) {
            self.budgets.push(time.time_left());
            time.consume_all();
        }
    }

    impl SimEntity for Spender {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        fn as_tick_listener(&mut self) -> Option<&mut dyn TickListener> {
            Some(self)
        }
    }

    /// A listener that asks the play loop to stop after `after` ticks.
    pub struct Stopper {
        pub handle: StopHandle,
        pub after: u64,
        pub ticks: u64,
    }

    impl TickListener for Stopper {
        fn tick(&mut self, _id: EntityId, _time: &mut TimeLapse, _models: &mut ModelManager) {
            self.ticks += 1;
            if self.ticks >= self.after {
                self.handle.request_stop();
            }
        }
    }

    impl SimEntity for Stopper {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        fn as_tick_listener(&mut self) -> Option<&mut dyn TickListener> {
            Some(self)
        }
    }

    /// An entity that keeps the seed its one-shot provider handed it.
    pub struct Seeded {
        pub seed: Option<u64>,
    }

    impl RandomUser for Seeded {
        fn init_random(&mut self, provider: RandomProvider<'_>) {
            self.seed = Some(provider.seed());
        }
    }

    impl SimEntity for Seeded {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        fn as_random_user(&mut self) -> Option<&mut dyn RandomUser> {
            Some(self)
        }
    }

    /// An entity that checks the model set it receives at registration.
    pub struct Inspector {
        pub saw_counter: bool,
    }

    impl ModelReceiver for Inspector {
        fn init_models(&mut self, models: &ModelManager) {
            self.saw_counter = models.contains(Capability::of::<Counter>());
        }
    }

    impl SimEntity for Inspector {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        fn as_model_receiver(&mut self) -> Option<&mut dyn ModelReceiver> {
            Some(self)
        }
    }
}

#[cfg(test)]
mod lifecycle {
    use super::fixtures::{Clocked, CounterBuilder, log};
    use crate::{SimError, Simulator};

    #[test]
    fn register_before_configure_is_rejected() {
        let mut sim = Simulator::new(42, 1000);
        let entity = Box::new(Clocked {
            label: "a",
            log: log(),
        });
        assert!(matches!(
            sim.register(entity),
            Err(SimError::NotConfigured(_))
        ));
    }

    #[test]
    fn unregister_before_configure_is_rejected() {
        use mas_core::EntityId;

        let mut sim = Simulator::new(42, 1000);
        // A lifecycle-order error, not an unknown-handle one.
        assert!(matches!(
            sim.unregister(EntityId(0)),
            Err(SimError::NotConfigured(_))
        ));
    }

    #[test]
    fn configure_runs_once() {
        let mut sim = Simulator::new(42, 1000);
        sim.configure().unwrap();
        assert!(sim.is_configured());
        assert!(matches!(sim.configure(), Err(SimError::AlreadyConfigured)));
    }

    #[test]
    fn add_model_after_configure_is_rejected() {
        let mut sim = Simulator::new(42, 1000);
        sim.configure().unwrap();
        assert!(matches!(
            sim.add_model(Box::new(CounterBuilder)),
            Err(SimError::AlreadyConfigured)
        ));
    }

    #[test]
    fn overlapping_capability_is_skipped_not_fatal() {
        let mut sim = Simulator::new(42, 1000);
        assert!(sim.add_model(Box::new(CounterBuilder)).unwrap());
        assert!(!sim.add_model(Box::new(CounterBuilder)).unwrap());
        sim.configure().unwrap();
    }

    #[test]
    fn first_tick_configures_implicitly() {
        let mut sim = Simulator::new(42, 1000);
        sim.add_model(Box::new(CounterBuilder)).unwrap();
        sim.tick().unwrap();
        assert!(sim.is_configured());
        assert_eq!(sim.current_time(), 1000);
    }
}

#[cfg(test)]
mod registration {
    use super::fixtures::{Counter, CounterBuilder, Inspector, Seeded};
    use crate::{SimError, Simulator};
    use mas_core::EntityId;

    fn configured() -> Simulator {
        let mut sim = Simulator::new(42, 1000);
        sim.add_model(Box::new(CounterBuilder)).unwrap();
        sim.configure().unwrap();
        sim
    }

    #[test]
    fn handles_reflect_registration_order() {
        let mut sim = configured();
        let a = sim.register(Box::new(Seeded { seed: None })).unwrap();
        let b = sim.register(Box::new(Seeded { seed: None })).unwrap();
        assert!(a < b);
        assert_eq!(sim.entity_count(), 2);
    }

    #[test]
    fn objects_are_offered_to_models() {
        let mut sim = configured();
        sim.register(Box::new(Seeded { seed: None })).unwrap();
        sim.register(Box::new(Seeded { seed: None })).unwrap();
        assert_eq!(sim.model::<Counter>().unwrap().registered, 2);
    }

    #[test]
    fn model_receiver_sees_built_models() {
        let mut sim = configured();
        let id = sim
            .register(Box::new(Inspector { saw_counter: false }))
            .unwrap();
        let inspector = sim
            .entity(id)
            .and_then(|e| e.as_any().downcast_ref::<Inspector>())
            .unwrap();
        assert!(inspector.saw_counter);
    }

    #[test]
    fn unregister_returns_the_object() {
        let mut sim = configured();
        let id = sim.register(Box::new(Seeded { seed: None })).unwrap();
        let entity = sim.unregister(id).unwrap();
        assert!(entity.as_any().downcast_ref::<Seeded>().is_some());
        assert_eq!(sim.entity_count(), 0);
    }

    #[test]
    fn unknown_handle_is_an_error() {
        let mut sim = configured();
        assert!(matches!(
            sim.unregister(EntityId(7)),
            Err(SimError::UnknownEntity(EntityId(7)))
        ));
    }
}

#[cfg(test)]
mod ticking {
    use super::fixtures::{Clocked, Spender, log};
    use crate::Simulator;

    #[test]
    fn all_pre_phases_before_any_post_phase() {
        let mut sim = Simulator::new(42, 1000);
        sim.configure().unwrap();
        let events = log();
        sim.register(Box::new(Clocked {
            label: "a",
            log: events.clone(),
        }))
        .unwrap();
        sim.register(Box::new(Clocked {
            label: "b",
            log: events.clone(),
        }))
        .unwrap();

        sim.tick().unwrap();

        assert_eq!(
            *events.borrow(),
            vec!["a:tick@0", "b:tick@0", "a:after@0", "b:after@0"]
        );
    }

    #[test]
    fn each_tick_hands_out_a_fresh_budget() {
        let mut sim = Simulator::new(42, 500);
        sim.configure().unwrap();
        let id = sim.register(Box::new(Spender { budgets: vec![] })).unwrap();

        sim.run_ticks(3).unwrap();

        let spender = sim
            .entity(id)
            .and_then(|e| e.as_any().downcast_ref::<Spender>())
            .unwrap();
        assert_eq!(spender.budgets, vec![500, 500, 500]);
        assert_eq!(sim.current_time(), 1500);
    }

    #[test]
    fn unsubscribed_listener_is_left_out() {
        let mut sim = Simulator::new(42, 1000);
        sim.configure().unwrap();
        let events = log();
        let a = sim
            .register(Box::new(Clocked {
                label: "a",
                log: events.clone(),
            }))
            .unwrap();

        sim.tick().unwrap();
        assert!(sim.remove_tick_listener(a));
        sim.tick().unwrap();

        // Only the first tick reached the listener; it stays registered.
        assert_eq!(*events.borrow(), vec!["a:tick@0", "a:after@0"]);
        assert!(sim.contains(a));

        sim.add_tick_listener(a).unwrap();
        sim.tick().unwrap();
        assert_eq!(events.borrow().len(), 4);
    }

    #[test]
    fn reset_time_rewinds_the_clock_only() {
        let mut sim = Simulator::new(42, 1000);
        sim.configure().unwrap();
        sim.run_ticks(5).unwrap();
        assert_eq!(sim.current_time(), 5000);

        sim.reset_time();
        assert_eq!(sim.current_time(), 0);
        assert_eq!(sim.entity_count(), 0);
    }
}

#[cfg(test)]
mod playing {
    use super::fixtures::Stopper;
    use crate::{KernelObserver, Simulator};

    #[test]
    fn play_loop_runs_until_stop_requested() {
        let mut sim = Simulator::new(42, 1000);
        sim.configure().unwrap();
        let stopper = Box::new(Stopper {
            handle: sim.stop_handle(),
            after: 3,
            ticks: 0,
        });
        sim.register(stopper).unwrap();

        sim.start().unwrap();

        assert!(!sim.is_playing());
        assert_eq!(sim.current_time(), 3000);
    }

    #[test]
    fn toggle_starts_a_paused_kernel() {
        let mut sim = Simulator::new(42, 1000);
        sim.configure().unwrap();
        let stopper = Box::new(Stopper {
            handle: sim.stop_handle(),
            after: 2,
            ticks: 0,
        });
        sim.register(stopper).unwrap();

        assert!(!sim.is_playing());
        sim.toggle_play_pause().unwrap();
        assert_eq!(sim.current_time(), 2000);
    }

    #[test]
    fn observer_sees_every_tick_boundary() {
        struct Trace {
            starts: Vec<u64>,
            stops: Vec<u64>,
        }
        impl KernelObserver for Trace {
            fn on_tick_start(&mut self, time: u64) {
                self.starts.push(time);
            }
            fn on_stop(&mut self, final_time: u64) {
                self.stops.push(final_time);
            }
        }

        let mut sim = Simulator::new(42, 100);
        sim.configure().unwrap();
        let stopper = Box::new(Stopper {
            handle: sim.stop_handle(),
            after: 3,
            ticks: 0,
        });
        sim.register(stopper).unwrap();

        let mut trace = Trace {
            starts: vec![],
            stops: vec![],
        };
        sim.start_with(&mut trace).unwrap();

        assert_eq!(trace.starts, vec![0, 100, 200]);
        assert_eq!(trace.stops, vec![300]);
    }
}

#[cfg(test)]
mod determinism {
    use super::fixtures::{CounterBuilder, Seeded};
    use crate::Simulator;

    fn seeds(master_seed: u64) -> Vec<u64> {
        let mut sim = Simulator::new(master_seed, 1000);
        sim.add_model(Box::new(CounterBuilder)).unwrap();
        sim.configure().unwrap();

        let ids: Vec<_> = (0..4)
            .map(|_| sim.register(Box::new(Seeded { seed: None })).unwrap())
            .collect();

        ids.iter()
            .map(|&id| {
                sim.entity(id)
                    .and_then(|e| e.as_any().downcast_ref::<Seeded>())
                    .and_then(|s| s.seed)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn same_master_seed_same_distribution() {
        assert_eq!(seeds(42), seeds(42));
    }

    #[test]
    fn different_master_seed_diverges() {
        assert_ne!(seeds(42), seeds(43));
    }

    #[test]
    fn registrants_get_distinct_seeds() {
        let s = seeds(42);
        for i in 0..s.len() {
            for j in (i + 1)..s.len() {
                assert_ne!(s[i], s[j], "seeds {i} and {j} collide");
            }
        }
    }
}
