//! Scheduler configuration.
//!
//! Table capacity is a const generic on [`Scheduler`](crate::Scheduler); the
//! values here cover the tick source. Both are fixed once the scheduler is
//! built.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SchedulerError, SchedulerResult};

/// Default tick interval in microseconds (10ms).
pub const DEFAULT_TICK_INTERVAL_US: u64 = 10_000;

/// Without an explicit threshold, a hosted tick later than this fraction of
/// the interval is counted as late.
pub const DEFAULT_LATE_TICK_DIVISOR: u64 = 4;

/// Longest tick interval accepted by [`SchedulerConfig::validate`] (1s).
pub const MAX_TICK_INTERVAL_US: u64 = 1_000_000;

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Fixed interval between ticks, in microseconds.
    pub tick_interval_us: u64,
    /// A hosted tick waking later than this is recorded as late, in
    /// microseconds. Unset means a quarter of the tick interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_tick_threshold_us: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_us: DEFAULT_TICK_INTERVAL_US,
            late_tick_threshold_us: None,
        }
    }
}

impl SchedulerConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if the tick interval is zero or
    /// above [`MAX_TICK_INTERVAL_US`], or if the lateness threshold is zero or
    /// longer than the interval itself. An unset threshold always fits.
    pub fn validate(&self) -> SchedulerResult {
        if self.tick_interval_us == 0 {
            return Err(SchedulerError::invalid_config(
                "tick_interval_us must be greater than 0",
            ));
        }
        if self.tick_interval_us > MAX_TICK_INTERVAL_US {
            return Err(SchedulerError::invalid_config(
                "tick_interval_us must not exceed 1 second",
            ));
        }
        match self.late_tick_threshold_us {
            Some(0) => Err(SchedulerError::invalid_config(
                "late_tick_threshold_us must be greater than 0",
            )),
            Some(threshold) if threshold > self.tick_interval_us => Err(
                SchedulerError::invalid_config(
                    "late_tick_threshold_us must not exceed tick_interval_us",
                ),
            ),
            _ => Ok(()),
        }
    }

    /// Tick interval as a [`Duration`].
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_micros(self.tick_interval_us)
    }

    /// Effective lateness threshold in microseconds, never below 1.
    #[must_use]
    pub const fn effective_late_tick_threshold_us(&self) -> u64 {
        let us = match self.late_tick_threshold_us {
            Some(us) => us,
            None => self.tick_interval_us / DEFAULT_LATE_TICK_DIVISOR,
        };
        if us == 0 { 1 } else { us }
    }

    /// Effective lateness threshold as a [`Duration`].
    #[must_use]
    pub const fn late_tick_threshold(&self) -> Duration {
        Duration::from_micros(self.effective_late_tick_threshold_us())
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> SchedulerConfigBuilder {
        SchedulerConfigBuilder::default()
    }
}

/// Builder for [`SchedulerConfig`].
#[derive(Debug, Default)]
pub struct SchedulerConfigBuilder {
    config: SchedulerConfig,
}

impl SchedulerConfigBuilder {
    /// Set the tick interval in microseconds.
    #[must_use]
    pub fn tick_interval_us(mut self, us: u64) -> Self {
        self.config.tick_interval_us = us;
        self
    }

    /// Set the tick interval from a [`Duration`], truncated to microseconds.
    #[must_use]
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.config.tick_interval_us = u64::try_from(interval.as_micros()).unwrap_or(u64::MAX);
        self
    }

    /// Set the late tick threshold in microseconds.
    #[must_use]
    pub fn late_tick_threshold_us(mut self, us: u64) -> Self {
        self.config.late_tick_threshold_us = Some(us);
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> SchedulerResult<SchedulerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
