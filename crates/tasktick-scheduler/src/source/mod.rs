//! Tick sources and the tick handler seam.
//!
//! A [`TickSource`] decides *when* a tick happens; a [`TickHandler`] decides
//! what a tick does. The scheduler is a `TickHandler`. On a microcontroller
//! the source is a hardware timer whose interrupt calls
//! [`TickHandler::on_tick`] directly; on a host the sources here stand in for
//! it.
//!
//! - [`PeriodicTicker`]: wall-clock ticks at a fixed interval, for running a
//!   control loop in real time.
//! - [`SimulatedTicker`]: ticks on demand with a simulated clock, for
//!   deterministic runs and tests.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

mod periodic;
mod simulated;
mod timing;

pub use periodic::PeriodicTicker;
pub use simulated::SimulatedTicker;
pub use timing::TickTiming;

/// Receiver of ticks.
///
/// Implementations run in the tick source's context, which may preempt the
/// mainline, so `on_tick` must be short, non-blocking and infallible.
pub trait TickHandler {
    /// Handle one tick.
    fn on_tick(&self);
}

/// A fixed-interval tick generator.
pub trait TickSource {
    /// The interval between ticks.
    fn interval(&self) -> Duration;

    /// Wait until the next tick boundary.
    ///
    /// Returns the number of ticks delivered so far, including this one.
    fn wait_for_tick(&mut self) -> u64;
}

/// Deliver ticks from `source` to `handler` until `stop` is set.
///
/// `stop` is checked before every wait, so at most one more tick is delivered
/// after it is raised. Returns the number of ticks delivered by this call.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::thread;
/// use std::time::Duration;
/// use tasktick_scheduler::prelude::*;
///
/// let scheduler = Scheduler::<4>::new(SchedulerConfig::default())?;
/// let stop = AtomicBool::new(false);
/// scheduler.start();
///
/// thread::scope(|scope| {
///     let ticker = scope.spawn(|| {
///         let mut source = PeriodicTicker::new(Duration::from_millis(1));
///         drive(&mut source, &scheduler, &stop)
///     });
///     thread::sleep(Duration::from_millis(5));
///     stop.store(true, Ordering::Release);
///     assert!(ticker.join().is_ok());
/// });
/// # Ok::<(), SchedulerError>(())
/// ```
pub fn drive<S, H>(source: &mut S, handler: &H, stop: &AtomicBool) -> u64
where
    S: TickSource + ?Sized,
    H: TickHandler + ?Sized,
{
    let mut delivered = 0u64;
    while !stop.load(Ordering::Acquire) {
        source.wait_for_tick();
        handler.on_tick();
        delivered = delivered.saturating_add(1);
    }
    tracing::debug!(delivered, "tick source stopped");
    delivered
}
