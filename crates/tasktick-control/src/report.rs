//! Measurement reporting.

use core::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// A reportable averaged measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    /// Moving average of the temperature, in °C.
    AverageTemperature,
    /// Moving average of the light level, in percent.
    AverageLight,
}

impl Measurement {
    /// Unit suffix for display.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::AverageTemperature => "°C",
            Self::AverageLight => "%",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AverageTemperature => write!(f, "average temperature"),
            Self::AverageLight => write!(f, "average light"),
        }
    }
}

/// Sink for measurements, such as a serial link to a host.
pub trait Reporter: Sync {
    /// Publish one measurement.
    fn report(&self, measurement: Measurement, value: f64);
}

/// Reporter that emits each measurement as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, measurement: Measurement, value: f64) {
        tracing::info!(
            target: "tasktick::report",
            measurement = ?measurement,
            value,
            unit = measurement.unit(),
            "measurement"
        );
    }
}

/// Reporter that keeps the latest value of each measurement.
#[derive(Debug, Default)]
pub struct LatestReporter {
    latest: Mutex<Latest>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Latest {
    temperature: Option<f64>,
    light: Option<f64>,
    reports: u64,
}

impl LatestReporter {
    /// Create an empty reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: Mutex::new(Latest {
                temperature: None,
                light: None,
                reports: 0,
            }),
        }
    }

    /// Last reported value of `measurement`, if any.
    #[must_use]
    pub fn latest(&self, measurement: Measurement) -> Option<f64> {
        let latest = self.latest.lock();
        match measurement {
            Measurement::AverageTemperature => latest.temperature,
            Measurement::AverageLight => latest.light,
        }
    }

    /// Total reports received.
    #[must_use]
    pub fn reports(&self) -> u64 {
        self.latest.lock().reports
    }
}

impl Reporter for LatestReporter {
    fn report(&self, measurement: Measurement, value: f64) {
        let mut latest = self.latest.lock();
        match measurement {
            Measurement::AverageTemperature => latest.temperature = Some(value),
            Measurement::AverageLight => latest.light = Some(value),
        }
        latest.reports = latest.reports.saturating_add(1);
    }
}

impl<A: Reporter, B: Reporter> Reporter for (A, B) {
    fn report(&self, measurement: Measurement, value: f64) {
        self.0.report(measurement, value);
        self.1.report(measurement, value);
    }
}
