//! Wall-clock tick source for hosted targets.

use core::time::Duration;
use std::time::Instant;

use super::{TickSource, TickTiming};
use crate::config::SchedulerConfig;

/// Below this much remaining time the ticker spins instead of sleeping.
const SPIN_TAIL: Duration = Duration::from_micros(80);

/// Periodic tick source driven by the host clock.
///
/// Tick boundaries are absolute: tick `k` is due at `origin + k * interval`,
/// so sleep overshoot on one tick does not push back the ones after it. If
/// the ticker falls behind (the thread was descheduled, say), the missed ticks
/// are delivered back to back until it catches up, and each is recorded in
/// [`TickTiming`] with its lateness.
///
/// The bulk of each wait is a thread sleep; the last [`SPIN_TAIL`] is a
/// busy-spin for precision.
#[derive(Debug, Clone)]
pub struct PeriodicTicker {
    interval: Duration,
    late_threshold: Duration,
    next_tick: Instant,
    tick_count: u64,
    timing: TickTiming,
}

impl PeriodicTicker {
    /// Create a ticker whose first tick is due one interval from now.
    ///
    /// A zero interval is raised to one nanosecond. Ticks later than a
    /// quarter of the interval are counted as late.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let interval = interval.max(Duration::from_nanos(1));
        Self::with_late_threshold(interval, interval / 4)
    }

    /// Create a ticker from the scheduler configuration.
    #[must_use]
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::with_late_threshold(config.tick_interval(), config.late_tick_threshold())
    }

    /// Create a ticker with an explicit lateness threshold.
    #[must_use]
    pub fn with_late_threshold(interval: Duration, late_threshold: Duration) -> Self {
        let interval = interval.max(Duration::from_nanos(1));
        let now = Instant::now();
        Self {
            interval,
            late_threshold,
            next_tick: now.checked_add(interval).unwrap_or(now),
            tick_count: 0,
            timing: TickTiming::default(),
        }
    }

    /// Ticks delivered so far.
    #[inline]
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Punctuality statistics.
    #[inline]
    #[must_use]
    pub const fn timing(&self) -> &TickTiming {
        &self.timing
    }

    /// Restart the tick sequence one interval from now and clear statistics.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.next_tick = now.checked_add(self.interval).unwrap_or(now);
        self.tick_count = 0;
        self.timing.reset();
    }

    fn sleep_until(target: Instant) {
        let now = Instant::now();
        if target <= now {
            return;
        }

        let remaining = target.duration_since(now);
        if remaining > SPIN_TAIL {
            std::thread::sleep(remaining.saturating_sub(SPIN_TAIL));
        }

        while Instant::now() < target {
            std::hint::spin_loop();
        }
    }
}

impl TickSource for PeriodicTicker {
    fn interval(&self) -> Duration {
        self.interval
    }

    fn wait_for_tick(&mut self) -> u64 {
        Self::sleep_until(self.next_tick);

        let woke = Instant::now();
        let lateness = woke.saturating_duration_since(self.next_tick);
        self.timing.record(lateness, lateness > self.late_threshold);

        self.tick_count = self.tick_count.saturating_add(1);
        self.next_tick = self.next_tick.checked_add(self.interval).unwrap_or(woke);
        self.tick_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_clamped() {
        let ticker = PeriodicTicker::new(Duration::ZERO);
        assert_eq!(ticker.interval(), Duration::from_nanos(1));
    }

    #[test]
    fn test_ticks_are_paced() {
        let interval = Duration::from_millis(2);
        let mut ticker = PeriodicTicker::new(interval);
        let start = Instant::now();

        for expected in 1..=5 {
            assert_eq!(ticker.wait_for_tick(), expected);
        }

        // Absolute deadlines: five ticks can never arrive before five intervals.
        assert!(start.elapsed() >= interval * 5);
        assert_eq!(ticker.timing().total_ticks, 5);
    }

    #[test]
    fn test_from_config_uses_threshold() {
        let config = SchedulerConfig {
            tick_interval_us: 1_000,
            late_tick_threshold_us: Some(100),
        };
        let ticker = PeriodicTicker::from_config(&config);
        assert_eq!(ticker.interval(), Duration::from_millis(1));
        assert_eq!(ticker.late_threshold, Duration::from_micros(100));
    }

    #[test]
    fn test_from_config_default_threshold_matches_new() {
        let config = SchedulerConfig {
            tick_interval_us: 1_000,
            late_tick_threshold_us: None,
        };
        let configured = PeriodicTicker::from_config(&config);
        let direct = PeriodicTicker::new(Duration::from_millis(1));
        assert_eq!(configured.late_threshold, direct.late_threshold);
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut ticker = PeriodicTicker::new(Duration::from_micros(100));
        ticker.wait_for_tick();
        ticker.reset();
        assert_eq!(ticker.tick_count(), 0);
        assert_eq!(ticker.timing().total_ticks, 0);
    }
}
