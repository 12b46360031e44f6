//! Controller configuration.

use serde::{Deserialize, Serialize};
use tasktick_scheduler::Ticks;

use crate::error::{ControlError, ControlResult};

/// Thresholds, roll amounts and task timing for the shutter controller.
///
/// Periods and delays are in scheduler ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Average light level above which the shutter is lowered, in percent.
    pub light_threshold_percent: f64,
    /// Average temperature above which the shutter is lowered, in °C.
    pub temperature_threshold_celsius: f64,
    /// Roll amount used by the light scan.
    pub light_roll_amount: f64,
    /// Roll amount used by the temperature scan.
    pub temperature_roll_amount: f64,
    /// Light scan period.
    pub light_scan_period: Ticks,
    /// Temperature scan period.
    pub temperature_scan_period: Ticks,
    /// Light report period.
    pub light_report_period: Ticks,
    /// Temperature report period.
    pub temperature_report_period: Ticks,
    /// Initial delay of both report tasks, so the averages have had a chance
    /// to fill before the first report.
    pub report_delay: Ticks,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            light_threshold_percent: 50.0,
            temperature_threshold_celsius: 25.0,
            light_roll_amount: 2.0,
            temperature_roll_amount: 0.10,
            light_scan_period: 10,
            temperature_scan_period: 50,
            light_report_period: 100,
            temperature_report_period: 100,
            report_delay: 99,
        }
    }
}

impl ControllerConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a threshold or roll amount is not a finite number,
    /// a roll amount is negative, the light threshold is outside 0 to 100, or
    /// any task period is zero (controller tasks are periodic).
    pub fn validate(&self) -> ControlResult {
        let finite = [
            ("light_threshold_percent", self.light_threshold_percent),
            (
                "temperature_threshold_celsius",
                self.temperature_threshold_celsius,
            ),
            ("light_roll_amount", self.light_roll_amount),
            ("temperature_roll_amount", self.temperature_roll_amount),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ControlError::invalid_configuration(format!(
                    "{name} must be a finite number"
                )));
            }
        }

        if !(0.0..=100.0).contains(&self.light_threshold_percent) {
            return Err(ControlError::invalid_configuration(
                "light_threshold_percent must be between 0 and 100",
            ));
        }
        if self.light_roll_amount < 0.0 || self.temperature_roll_amount < 0.0 {
            return Err(ControlError::invalid_configuration(
                "roll amounts must not be negative",
            ));
        }

        let periods = [
            ("light_scan_period", self.light_scan_period),
            ("temperature_scan_period", self.temperature_scan_period),
            ("light_report_period", self.light_report_period),
            ("temperature_report_period", self.temperature_report_period),
        ];
        for (name, period) in periods {
            if period == 0 {
                return Err(ControlError::invalid_configuration(format!(
                    "{name} must be greater than 0"
                )));
            }
        }
        Ok(())
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> ControllerConfigBuilder {
        ControllerConfigBuilder::default()
    }
}

/// Builder for [`ControllerConfig`].
#[derive(Debug, Default)]
pub struct ControllerConfigBuilder {
    config: ControllerConfig,
}

impl ControllerConfigBuilder {
    /// Set the light threshold in percent.
    #[must_use]
    pub fn light_threshold_percent(mut self, percent: f64) -> Self {
        self.config.light_threshold_percent = percent;
        self
    }

    /// Set the temperature threshold in °C.
    #[must_use]
    pub fn temperature_threshold_celsius(mut self, celsius: f64) -> Self {
        self.config.temperature_threshold_celsius = celsius;
        self
    }

    /// Set the roll amounts used by the light and temperature scans.
    #[must_use]
    pub fn roll_amounts(mut self, light: f64, temperature: f64) -> Self {
        self.config.light_roll_amount = light;
        self.config.temperature_roll_amount = temperature;
        self
    }

    /// Set the scan periods in ticks.
    #[must_use]
    pub fn scan_periods(mut self, light: Ticks, temperature: Ticks) -> Self {
        self.config.light_scan_period = light;
        self.config.temperature_scan_period = temperature;
        self
    }

    /// Set the report periods in ticks.
    #[must_use]
    pub fn report_periods(mut self, light: Ticks, temperature: Ticks) -> Self {
        self.config.light_report_period = light;
        self.config.temperature_report_period = temperature;
        self
    }

    /// Set the initial delay of the report tasks in ticks.
    #[must_use]
    pub fn report_delay(mut self, delay: Ticks) -> Self {
        self.config.report_delay = delay;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> ControlResult<ControllerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
