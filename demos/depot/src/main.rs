//! depot — smallest example for the rust_mas simulation framework.
//!
//! A handful of delivery trucks share a 4×4 street grid with one central
//! depot.  Each truck repeatedly draws a random intersection from its own
//! derived RNG stream and drives there under the collision-avoiding road
//! model, so two trucks never occupy the same intersection.  Re-running with
//! the same seed reproduces every route and every delivery count exactly.

mod network;

use std::any::Any;
use std::time::Instant;

use anyhow::Result;

use mas_core::{DerivedRng, EntityId, Point, TimeLapse};
use mas_kernel::{KernelObserver, Simulator, StopHandle};
use mas_model::{ModelManager, RoadUser, SimEntity, TickListener};
use mas_random::{RandomProvider, RandomUser};
use mas_road::{CollisionGraphRoadModel, CollisionGraphRoadModelBuilder, RoadModel};

use network::build_grid;

// ── Constants ─────────────────────────────────────────────────────────────────

const TRUCK_COUNT: usize = 5;
const SEED: u64 = 42;
const TICK_LENGTH: u64 = 60; // 1 tick = 1 minute of simulated time
const SHIFT_TICKS: u64 = 480; // an 8-hour shift
const GRID_SIDE: usize = 4;
const GRID_SPACING: f64 = 100.0;
const TRUCK_SPEED: f64 = 0.5; // units per time unit → 30 units per tick
const VEHICLE_LENGTH: f64 = 4.0;

// ── Application entities ──────────────────────────────────────────────────────

/// The depot: a stationary road user parked on its node.
struct Depot {
    at: Point,
}

impl RoadUser for Depot {
    fn initial_position(&self) -> Option<Point> {
        Some(self.at)
    }
}

impl SimEntity for Depot {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn as_road_user(&self) -> Option<&dyn RoadUser> {
        Some(self)
    }
}

/// A truck that drives to random intersections, one delivery at a time.
struct Truck {
    start: Point,
    rng: Option<DerivedRng>,
    destination: Option<Point>,
    deliveries: usize,
    distance: f64,
}

impl Truck {
    fn new(start: Point) -> Self {
        Self {
            start,
            rng: None,
            destination: None,
            deliveries: 0,
            distance: 0.0,
        }
    }

    fn pick_destination(&mut self, road: &CollisionGraphRoadModel, here: Point) -> Option<Point> {
        let rng = self.rng.as_mut()?;
        let candidates: Vec<Point> = road.graph().nodes().filter(|&n| n != here).collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.gen_range(0..candidates.len())])
    }
}

impl RandomUser for Truck {
    fn init_random(&mut self, provider: RandomProvider<'_>) {
        self.rng = Some(provider.new_instance());
    }
}

impl RoadUser for Truck {
    fn initial_position(&self) -> Option<Point> {
        Some(self.start)
    }
    fn speed(&self) -> f64 {
        TRUCK_SPEED
    }
}

impl TickListener for Truck {
    fn tick(&mut self, id: EntityId, time: &mut TimeLapse, models: &mut ModelManager) {
        let Ok(road) = models.get_mut::<CollisionGraphRoadModel>() else {
            return;
        };
        let Ok(here) = road.position(id) else {
            return;
        };

        if self.destination.is_none() {
            self.destination = self.pick_destination(road, here);
        }
        let Some(destination) = self.destination else {
            return;
        };

        match road.move_to(id, destination, time) {
            Ok(progress) => {
                self.distance += progress.distance;
                if progress.traveled_nodes.last() == Some(&destination) {
                    self.deliveries += 1;
                    self.destination = None;
                }
            }
            Err(_) => {
                // Unroutable destination; draw a new one next tick.
                self.destination = None;
            }
        }
    }
}

impl SimEntity for Truck {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn as_tick_listener(&mut self) -> Option<&mut dyn TickListener> {
        Some(self)
    }
    fn as_random_user(&mut self) -> Option<&mut dyn RandomUser> {
        Some(self)
    }
    fn as_road_user(&self) -> Option<&dyn RoadUser> {
        Some(self)
    }
}

/// Ends the play loop once the shift is over.
struct EndOfShift {
    handle: StopHandle,
    ticks_left: u64,
}

impl TickListener for EndOfShift {
    fn tick(&mut self, _id: EntityId, _time: &mut TimeLapse, _models: &mut ModelManager) {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        if self.ticks_left == 0 {
            self.handle.request_stop();
        }
    }
}

impl SimEntity for EndOfShift {
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

// ── Progress observer ─────────────────────────────────────────────────────────

struct ShiftProgress {
    report_every: u64,
    ticks: u64,
}

impl KernelObserver for ShiftProgress {
    fn on_tick_end(&mut self, time: u64, _listeners: usize) {
        self.ticks += 1;
        if self.ticks.is_multiple_of(self.report_every) {
            println!("  t={time} ({} of {SHIFT_TICKS} ticks)", self.ticks);
        }
    }

    fn on_stop(&mut self, final_time: u64) {
        println!("  shift over at t={final_time}");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== depot — rust_mas simulation framework ===");
    println!("Trucks: {TRUCK_COUNT}  |  Shift: {SHIFT_TICKS} ticks  |  Seed: {SEED}");
    println!();

    // 1. Build the street grid.
    let (grid, nodes) = build_grid(GRID_SIDE, GRID_SPACING)?;
    println!(
        "Street grid: {} intersections, {} one-way lanes",
        grid.node_count(),
        grid.connection_count()
    );

    // 2. Kernel with the collision-avoiding road model.
    let mut sim = Simulator::new(SEED, TICK_LENGTH);
    sim.add_model(Box::new(CollisionGraphRoadModelBuilder::new(
        grid,
        VEHICLE_LENGTH,
    )?))?;
    sim.configure()?;

    // 3. Register the depot at the grid center and the trucks on the first
    //    free intersections.  Registration order fixes each truck's RNG
    //    stream, so the whole run is reproducible from the seed.
    let depot_node = nodes[nodes.len() / 2];
    sim.register(Box::new(Depot { at: depot_node }))?;

    let mut truck_ids = Vec::with_capacity(TRUCK_COUNT);
    let starts = nodes.iter().filter(|&&n| n != depot_node).take(TRUCK_COUNT);
    for &start in starts {
        truck_ids.push(sim.register(Box::new(Truck::new(start)))?);
    }

    // 4. The shift clock stops the play loop after SHIFT_TICKS.
    sim.register(Box::new(EndOfShift {
        handle: sim.stop_handle(),
        ticks_left: SHIFT_TICKS,
    }))?;

    // 5. Run the shift.
    let t0 = Instant::now();
    let mut progress = ShiftProgress {
        report_every: SHIFT_TICKS / 4,
        ticks: 0,
    };
    sim.start_with(&mut progress)?;
    let elapsed = t0.elapsed();
    println!();
    println!("Shift complete in {:.3} s wall time", elapsed.as_secs_f64());
    println!();

    // 6. Per-truck summary.
    let road = sim.model::<CollisionGraphRoadModel>()?;
    println!("{:<8} {:<12} {:<12} {:<14}", "Truck", "Deliveries", "Distance", "Position");
    println!("{}", "-".repeat(48));
    for &id in &truck_ids {
        let truck = sim
            .entity(id)
            .and_then(|e| e.as_any().downcast_ref::<Truck>());
        let position = road
            .position(id)
            .map(|p| p.to_string())
            .unwrap_or_else(|_| "?".into());
        if let Some(truck) = truck {
            println!(
                "{:<8} {:<12} {:<12.1} {:<14}",
                id.0, truck.deliveries, truck.distance, position
            );
        }
    }

    Ok(())
}
