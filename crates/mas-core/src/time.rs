//! Logical time model.
//!
//! # Design
//!
//! Simulation time is a monotonically increasing `u64` in abstract *time
//! units*, advanced in fixed steps of `time_step` units per tick.  Using an
//! integer as the canonical time unit means all tick arithmetic is exact (no
//! floating-point drift) and the clock invariant — `time` is always a multiple
//! of `time_step` — is trivially maintained.
//!
//! Each tick, every listener receives a [`TimeLapse`]: a bounded time budget
//! covering exactly that step.  Movement operations consume from the budget
//! and can never overdraw it, which is how "an agent moves at most
//! `speed × time_step` per tick" falls out of the time model rather than
//! being re-checked by every model.

use std::fmt;

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The kernel's logical clock.
///
/// Owned and mutated exclusively by the simulation kernel: `advance()` once
/// per tick, `reset()` for controlled replay.  `running` is the play/pause
/// flag driving the kernel's `start()` loop.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Current simulation time, in time units.  Always a multiple of
    /// `time_step`.
    time: u64,
    /// How many time units one tick spans.
    time_step: u64,
    /// `true` while the kernel's `start()` loop is ticking.
    pub running: bool,
}

impl SimClock {
    /// Create a clock at time 0, not running.
    ///
    /// # Panics
    /// Panics if `time_step` is zero.
    pub fn new(time_step: u64) -> Self {
        assert!(time_step > 0, "time_step must be positive");
        Self {
            time: 0,
            time_step,
            running: false,
        }
    }

    /// Current simulation time in time units.
    #[inline]
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Length of one tick in time units.
    #[inline]
    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    /// Number of whole ticks elapsed since time 0 (or the last `reset()`).
    #[inline]
    pub fn elapsed_ticks(&self) -> u64 {
        self.time / self.time_step
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.time += self.time_step;
    }

    /// Rewind the clock to time 0.  Does not touch `running`.
    #[inline]
    pub fn reset(&mut self) {
        self.time = 0;
    }

    /// The [`TimeLapse`] budget spanning the current tick.
    #[inline]
    pub fn current_lapse(&self) -> TimeLapse {
        TimeLapse::new(self.time, self.time + self.time_step)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={} (tick {})", self.time, self.elapsed_ticks())
    }
}

// ── TimeLapse ─────────────────────────────────────────────────────────────────

/// A bounded time budget handed to each tick listener for one tick.
///
/// The lapse spans `[start, end)` in time units.  Consumers (movement
/// operations, mostly) call [`consume`](Self::consume) to account for
/// simulated time spent; once the budget is exhausted no further time can be
/// spent this tick.  A lapse never allows consuming past `end`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeLapse {
    start: u64,
    end: u64,
    consumed: u64,
}

impl TimeLapse {
    /// Create a budget spanning `[start, end)`.
    ///
    /// # Panics
    /// Panics if `end < start`.
    pub fn new(start: u64, end: u64) -> Self {
        assert!(end >= start, "time lapse end {end} precedes start {start}");
        Self {
            start,
            end,
            consumed: 0,
        }
    }

    /// Tick start time.
    #[inline]
    pub fn start_time(&self) -> u64 {
        self.start
    }

    /// Tick end time (exclusive).
    #[inline]
    pub fn end_time(&self) -> u64 {
        self.end
    }

    /// Total budget of this lapse, ignoring consumption.
    #[inline]
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }

    /// Time units spent so far.
    #[inline]
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Remaining budget.
    #[inline]
    pub fn time_left(&self) -> u64 {
        self.end - self.start - self.consumed
    }

    /// `true` while any budget remains.
    #[inline]
    pub fn has_time_left(&self) -> bool {
        self.time_left() > 0
    }

    /// The simulation time the consumer has reached within this tick.
    #[inline]
    pub fn current_time(&self) -> u64 {
        self.start + self.consumed
    }

    /// Spend `units` of budget.  Overdrawing is a caller bug; consumption
    /// saturates at the budget boundary.
    #[inline]
    pub fn consume(&mut self, units: u64) {
        debug_assert!(
            units <= self.time_left(),
            "consuming {units} units with only {} left",
            self.time_left()
        );
        self.consumed += units.min(self.time_left());
    }

    /// Spend the entire remaining budget, returning how much that was.
    #[inline]
    pub fn consume_all(&mut self) -> u64 {
        let left = self.time_left();
        self.consumed += left;
        left
    }
}

impl fmt::Display for TimeLapse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{}) {} left",
            self.start,
            self.end,
            self.time_left()
        )
    }
}
