//! Shutter controller.
//!
//! Two scans share one piece of state, whether the shutter is currently
//! rolled up. A scan samples its sensor, folds the reading into a moving
//! average and compares the average with its threshold: above it, a rolled
//! up shutter is lowered; at or below it, a lowered shutter is raised. The
//! light and temperature scans move the shutter by different amounts, and
//! either one can undo the other's move.

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

use crate::average::MovingAverage;
use crate::config::ControllerConfig;
use crate::error::ControlResult;
use crate::report::{Measurement, Reporter};
use crate::sensor::{AdcChannel, AdcSource, light_percent, temperature_celsius};
use crate::shutter::Shutter;

/// Light samples kept in the moving average.
pub const LIGHT_WINDOW: usize = 10;

/// Temperature samples kept in the moving average.
pub const TEMPERATURE_WINDOW: usize = 10;

/// What a scan did to the shutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    /// The shutter was already where the average says it should be.
    Held,
    /// The shutter was lowered.
    RolledDown,
    /// The shutter was raised.
    RolledUp,
}

/// Controller activity counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ControllerStats {
    /// Completed light scans.
    pub light_scans: u64,
    /// Completed temperature scans.
    pub temperature_scans: u64,
    /// Shutter lowerings.
    pub roll_downs: u64,
    /// Shutter raisings.
    pub roll_ups: u64,
    /// Scans abandoned because the sensor could not be read.
    pub sensor_faults: u64,
    /// Measurements reported.
    pub reports: u64,
}

#[derive(Debug, Default)]
struct Counters {
    light_scans: AtomicU64,
    temperature_scans: AtomicU64,
    roll_downs: AtomicU64,
    roll_ups: AtomicU64,
    sensor_faults: AtomicU64,
    reports: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ControllerStats {
        ControllerStats {
            light_scans: self.light_scans.load(Ordering::Relaxed),
            temperature_scans: self.temperature_scans.load(Ordering::Relaxed),
            roll_downs: self.roll_downs.load(Ordering::Relaxed),
            roll_ups: self.roll_ups.load(Ordering::Relaxed),
            sensor_faults: self.sensor_faults.load(Ordering::Relaxed),
            reports: self.reports.load(Ordering::Relaxed),
        }
    }
}

/// Sunshade controller driving a [`Shutter`] from light and temperature
/// readings.
///
/// The shutter is assumed to start rolled up.
#[derive(Debug)]
pub struct ShutterController<A, S> {
    config: ControllerConfig,
    adc: A,
    shutter: S,
    lights: Mutex<MovingAverage<LIGHT_WINDOW>>,
    temperatures: Mutex<MovingAverage<TEMPERATURE_WINDOW>>,
    rolled_up: AtomicBool,
    counters: Counters,
}

impl<A: AdcSource, S: Shutter> ShutterController<A, S> {
    /// Create a controller.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: ControllerConfig, adc: A, shutter: S) -> ControlResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            adc,
            shutter,
            lights: Mutex::new(MovingAverage::new()),
            temperatures: Mutex::new(MovingAverage::new()),
            rolled_up: AtomicBool::new(true),
            counters: Counters::default(),
        })
    }

    /// Sample the light sensor and move the shutter if needed.
    ///
    /// # Errors
    ///
    /// Returns the sensor error if the light channel cannot be read. The
    /// average and the shutter are left untouched in that case.
    pub fn run_light_scan(&self) -> ControlResult<ScanOutcome> {
        let raw = self.sample(AdcChannel::Light)?;
        let light = light_percent(raw);

        let average = {
            let mut lights = self.lights.lock();
            lights.push(light);
            lights.average()
        };
        tracing::trace!(raw, light, average, "light sampled");
        Counters::bump(&self.counters.light_scans);

        Ok(self.steer(
            AdcChannel::Light,
            average > self.config.light_threshold_percent,
            self.config.light_roll_amount,
        ))
    }

    /// Sample the temperature sensor and move the shutter if needed.
    ///
    /// # Errors
    ///
    /// Returns the sensor error if the temperature channel cannot be read.
    /// The average and the shutter are left untouched in that case.
    pub fn run_temperature_scan(&self) -> ControlResult<ScanOutcome> {
        let raw = self.sample(AdcChannel::Temperature)?;
        let temperature = temperature_celsius(raw);

        let average = {
            let mut temperatures = self.temperatures.lock();
            temperatures.push(temperature);
            temperatures.average()
        };
        tracing::trace!(raw, temperature, average, "temperature sampled");
        Counters::bump(&self.counters.temperature_scans);

        Ok(self.steer(
            AdcChannel::Temperature,
            average > self.config.temperature_threshold_celsius,
            self.config.temperature_roll_amount,
        ))
    }

    /// Send the current average light level to `reporter`.
    pub fn report_light<R: Reporter + ?Sized>(&self, reporter: &R) {
        reporter.report(Measurement::AverageLight, self.average_light());
        Counters::bump(&self.counters.reports);
    }

    /// Send the current average temperature to `reporter`.
    pub fn report_temperature<R: Reporter + ?Sized>(&self, reporter: &R) {
        reporter.report(Measurement::AverageTemperature, self.average_temperature());
        Counters::bump(&self.counters.reports);
    }

    fn sample(&self, channel: AdcChannel) -> ControlResult<u16> {
        self.adc.sample(channel).inspect_err(|_| {
            Counters::bump(&self.counters.sensor_faults);
        })
    }

    fn steer(&self, trigger: AdcChannel, above_threshold: bool, amount: f64) -> ScanOutcome {
        // The status flips in the same atomic step that decides to move.
        if above_threshold {
            if self
                .rolled_up
                .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                self.shutter.roll_down(amount);
                Counters::bump(&self.counters.roll_downs);
                tracing::info!(%trigger, amount, "shutter rolled down");
                return ScanOutcome::RolledDown;
            }
        } else if self
            .rolled_up
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.shutter.roll_up(amount);
            Counters::bump(&self.counters.roll_ups);
            tracing::info!(%trigger, amount, "shutter rolled up");
            return ScanOutcome::RolledUp;
        }
        ScanOutcome::Held
    }
}

impl<A, S> ShutterController<A, S> {
    /// Current average light level, in percent.
    #[must_use]
    pub fn average_light(&self) -> f64 {
        self.lights.lock().average()
    }

    /// Current average temperature, in °C.
    #[must_use]
    pub fn average_temperature(&self) -> f64 {
        self.temperatures.lock().average()
    }

    /// Whether the shutter is rolled up.
    #[must_use]
    pub fn is_rolled_up(&self) -> bool {
        self.rolled_up.load(Ordering::Acquire)
    }

    /// Activity counts so far.
    #[must_use]
    pub fn stats(&self) -> ControllerStats {
        self.counters.snapshot()
    }

    /// Controller configuration.
    #[must_use]
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The sensor input.
    #[must_use]
    pub const fn adc(&self) -> &A {
        &self.adc
    }

    /// The driven shutter.
    #[must_use]
    pub const fn shutter(&self) -> &S {
        &self.shutter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::SimulatedAdc;
    use crate::shutter::SimulatedShutter;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    // 40.04 % light, 21.7 °C
    const DIM: u16 = 410;
    const COOL: u16 = 147;
    // 99.9 % light, 449.5 °C
    const BRIGHT: u16 = 1023;
    const HOT: u16 = 1023;

    fn controller(
        temperature: u16,
        light: u16,
    ) -> ControlResult<ShutterController<SimulatedAdc, SimulatedShutter>> {
        ShutterController::new(
            ControllerConfig::default(),
            SimulatedAdc::constant(temperature, light),
            SimulatedShutter::new(),
        )
    }

    #[test]
    fn test_starts_rolled_up() -> TestResult {
        let controller = controller(COOL, DIM)?;
        assert!(controller.is_rolled_up());
        assert_eq!(controller.run_light_scan()?, ScanOutcome::Held);
        assert_eq!(controller.run_temperature_scan()?, ScanOutcome::Held);
        assert_eq!(controller.shutter().state().roll_downs, 0);
        Ok(())
    }

    #[test]
    fn test_bright_light_rolls_down_once() -> TestResult {
        let controller = controller(COOL, BRIGHT)?;

        // Zero-filled window: the sixth bright sample is the first to pass 50 %.
        for _ in 0..5 {
            assert_eq!(controller.run_light_scan()?, ScanOutcome::Held);
        }
        assert_eq!(controller.run_light_scan()?, ScanOutcome::RolledDown);
        assert_eq!(controller.run_light_scan()?, ScanOutcome::Held);

        let state = controller.shutter().state();
        assert!((state.lowered - 2.0).abs() < f64::EPSILON);
        assert_eq!(state.roll_downs, 1);
        assert!(!controller.is_rolled_up());
        Ok(())
    }

    #[test]
    fn test_scans_share_status() -> TestResult {
        let controller = controller(COOL, BRIGHT)?;
        for _ in 0..6 {
            controller.run_light_scan()?;
        }
        assert!(!controller.is_rolled_up());

        // Cool temperature undoes the light scan's move, by its own amount.
        assert_eq!(controller.run_temperature_scan()?, ScanOutcome::RolledUp);
        let state = controller.shutter().state();
        assert!((state.lowered - 1.9).abs() < 1e-9);
        assert!(controller.is_rolled_up());
        Ok(())
    }

    #[test]
    fn test_hot_rolls_down_by_temperature_amount() -> TestResult {
        let controller = controller(HOT, DIM)?;
        assert_eq!(controller.run_temperature_scan()?, ScanOutcome::RolledDown);
        assert!((controller.shutter().state().lowered - 0.10).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_sensor_fault_leaves_state_alone() -> TestResult {
        let controller = controller(COOL, BRIGHT)?;
        controller.adc().set(AdcChannel::Light, 2048);

        assert!(controller.run_light_scan().is_err_and(|err| err.is_sensor_fault()));
        assert!(controller.average_light().abs() < f64::EPSILON);

        let stats = controller.stats();
        assert_eq!(stats.sensor_faults, 1);
        assert_eq!(stats.light_scans, 0);
        Ok(())
    }

    #[test]
    fn test_reports_current_averages() -> TestResult {
        let controller = controller(COOL, DIM)?;
        let reporter = crate::report::LatestReporter::new();

        controller.report_light(&reporter);
        assert_eq!(reporter.latest(Measurement::AverageLight), Some(0.0));

        controller.run_temperature_scan()?;
        controller.report_temperature(&reporter);
        let expected = temperature_celsius(COOL) / 10.0;
        assert!(
            reporter
                .latest(Measurement::AverageTemperature)
                .is_some_and(|value| (value - expected).abs() < 1e-9)
        );
        assert_eq!(controller.stats().reports, 2);
        Ok(())
    }
}
