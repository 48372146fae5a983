//! Kernel observer trait for progress reporting and data collection.

/// Callbacks invoked by [`Simulator::start_with`][crate::Simulator::start_with]
/// at tick boundaries.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl KernelObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, time: u64, listeners: usize) {
///         if time % self.interval == 0 {
///             println!("t={time}: ticked {listeners} listeners");
///         }
///     }
/// }
/// ```
pub trait KernelObserver {
    /// Called at the start of each tick, before any listener runs.
    fn on_tick_start(&mut self, _time: u64) {}

    /// Called after a tick completes (the clock has already advanced).
    ///
    /// `listeners` is the number of listeners in that tick's snapshot.
    fn on_tick_end(&mut self, _time: u64, _listeners: usize) {}

    /// Called once when the play loop stops.
    fn on_stop(&mut self, _final_time: u64) {}
}

/// A [`KernelObserver`] that does nothing.  Use when you need the play loop
/// but no progress callbacks.
pub struct NoopObserver;

impl KernelObserver for NoopObserver {}
