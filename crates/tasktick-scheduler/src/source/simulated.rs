//! Simulated tick source.

use core::time::Duration;

use super::TickSource;

/// Tick source that never sleeps.
///
/// Every call to [`TickSource::wait_for_tick`] returns immediately and
/// advances a simulated clock by one interval, so a run of N ticks is exact
/// and reproducible regardless of host load.
#[derive(Debug, Clone)]
pub struct SimulatedTicker {
    interval: Duration,
    tick_count: u64,
}

impl SimulatedTicker {
    /// Create a simulated ticker with the given interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            tick_count: 0,
        }
    }

    /// Ticks delivered so far.
    #[inline]
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated time elapsed since creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        let ticks = u32::try_from(self.tick_count).unwrap_or(u32::MAX);
        self.interval.saturating_mul(ticks)
    }
}

impl TickSource for SimulatedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }

    fn wait_for_tick(&mut self) -> u64 {
        self.tick_count = self.tick_count.saturating_add(1);
        self.tick_count
    }
}
