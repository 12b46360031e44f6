//! Tick timing statistics for hosted tick sources.

use core::time::Duration;

use serde::Serialize;

/// How punctually a wall-clock tick source delivered its ticks.
///
/// Lateness is measured from the scheduled tick boundary to the moment the
/// source woke up. Updating is O(1) and allocation-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TickTiming {
    /// Ticks delivered.
    pub total_ticks: u64,
    /// Ticks whose lateness exceeded the configured threshold.
    pub late_ticks: u64,
    /// Largest lateness observed, in nanoseconds.
    pub max_lateness_ns: u64,
    /// Lateness of the most recent tick, in nanoseconds.
    pub last_lateness_ns: u64,
    /// Sum of lateness over all ticks, in nanoseconds.
    pub total_lateness_ns: u64,
}

impl TickTiming {
    /// Record one delivered tick.
    pub fn record(&mut self, lateness: Duration, late: bool) {
        let lateness_ns = u64::try_from(lateness.as_nanos()).unwrap_or(u64::MAX);

        self.total_ticks = self.total_ticks.saturating_add(1);
        if late {
            self.late_ticks = self.late_ticks.saturating_add(1);
        }
        self.max_lateness_ns = self.max_lateness_ns.max(lateness_ns);
        self.last_lateness_ns = lateness_ns;
        self.total_lateness_ns = self.total_lateness_ns.saturating_add(lateness_ns);
    }

    /// Fraction of ticks that were late (0.0 to 1.0).
    #[must_use]
    pub fn late_tick_rate(&self) -> f64 {
        if self.total_ticks == 0 {
            0.0
        } else {
            self.late_ticks as f64 / self.total_ticks as f64
        }
    }

    /// Mean lateness in nanoseconds.
    #[must_use]
    pub fn mean_lateness_ns(&self) -> u64 {
        self.total_lateness_ns
            .checked_div(self.total_ticks)
            .unwrap_or(0)
    }

    /// Reset all statistics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
