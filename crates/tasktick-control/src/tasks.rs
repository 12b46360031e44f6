//! Scheduler tasks wrapping the controller.
//!
//! Each adapter borrows the controller and implements [`Task`], so the
//! scheduler can run it without knowing anything about sensors or shutters.
//! [`ControllerTasks`] bundles the four of them and registers them with the
//! periods from [`ControllerConfig`](crate::ControllerConfig).

use tasktick_scheduler::{Scheduler, Task, TaskId, Ticks};

use crate::controller::ShutterController;
use crate::error::ControlResult;
use crate::report::Reporter;
use crate::sensor::AdcSource;
use crate::shutter::Shutter;

/// Periodic light scan.
#[derive(Debug)]
pub struct LightScan<'c, A, S>(&'c ShutterController<A, S>);

/// Periodic temperature scan.
#[derive(Debug)]
pub struct TemperatureScan<'c, A, S>(&'c ShutterController<A, S>);

/// Periodic report of the average light level.
#[derive(Debug)]
pub struct LightReport<'c, A, S, R: ?Sized> {
    controller: &'c ShutterController<A, S>,
    reporter: &'c R,
}

/// Periodic report of the average temperature.
#[derive(Debug)]
pub struct TemperatureReport<'c, A, S, R: ?Sized> {
    controller: &'c ShutterController<A, S>,
    reporter: &'c R,
}

impl<A: AdcSource, S: Shutter> Task for LightScan<'_, A, S> {
    fn run(&self) {
        if let Err(err) = self.0.run_light_scan() {
            tracing::warn!(error = %err, "light scan skipped");
        }
    }
}

impl<A: AdcSource, S: Shutter> Task for TemperatureScan<'_, A, S> {
    fn run(&self) {
        if let Err(err) = self.0.run_temperature_scan() {
            tracing::warn!(error = %err, "temperature scan skipped");
        }
    }
}

impl<A: AdcSource, S: Shutter, R: Reporter + ?Sized> Task for LightReport<'_, A, S, R> {
    fn run(&self) {
        self.controller.report_light(self.reporter);
    }
}

impl<A: AdcSource, S: Shutter, R: Reporter + ?Sized> Task for TemperatureReport<'_, A, S, R> {
    fn run(&self) {
        self.controller.report_temperature(self.reporter);
    }
}

fn add_or_roll_back<'t, const N: usize>(
    scheduler: &Scheduler<'t, N>,
    task: &'t dyn Task,
    initial_delay: Ticks,
    period: Ticks,
    added: &[TaskId],
) -> ControlResult<TaskId> {
    scheduler.add(task, initial_delay, period).map_err(|err| {
        for id in added {
            if let Err(rollback) = scheduler.remove(*id) {
                tracing::debug!(%id, error = %rollback, "rollback removal failed");
            }
        }
        err.into()
    })
}

/// Handles of the registered controller tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerTaskIds {
    /// Light scan.
    pub light_scan: TaskId,
    /// Temperature scan.
    pub temperature_scan: TaskId,
    /// Light report.
    pub light_report: TaskId,
    /// Temperature report.
    pub temperature_report: TaskId,
}

impl ControllerTaskIds {
    /// All four handles, in registration order.
    #[must_use]
    pub const fn all(&self) -> [TaskId; 4] {
        [
            self.light_scan,
            self.temperature_scan,
            self.light_report,
            self.temperature_report,
        ]
    }

    /// Remove the tasks from `scheduler`, ignoring ones already gone.
    pub fn unregister<const N: usize>(self, scheduler: &Scheduler<'_, N>) {
        for id in self.all() {
            if let Err(err) = scheduler.remove(id) {
                tracing::debug!(%id, error = %err, "controller task already gone");
            }
        }
        tracing::info!("controller tasks unregistered");
    }
}

/// The controller's scheduler tasks.
///
/// ```rust
/// use tasktick_control::prelude::*;
/// use tasktick_scheduler::prelude::*;
///
/// let controller = ShutterController::new(
///     ControllerConfig::default(),
///     SimulatedAdc::default(),
///     SimulatedShutter::new(),
/// )?;
/// let reporter = TracingReporter;
/// let tasks = ControllerTasks::new(&controller, &reporter);
///
/// let scheduler = Scheduler::<8>::new(SchedulerConfig::default())?;
/// tasks.register(&scheduler)?;
/// scheduler.start();
///
/// for _ in 0..100 {
///     scheduler.on_tick();
///     scheduler.dispatch();
/// }
/// assert_eq!(controller.stats().light_scans, 10);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct ControllerTasks<'c, A, S, R: ?Sized> {
    light_scan: LightScan<'c, A, S>,
    temperature_scan: TemperatureScan<'c, A, S>,
    light_report: LightReport<'c, A, S, R>,
    temperature_report: TemperatureReport<'c, A, S, R>,
}

impl<'c, A, S, R> ControllerTasks<'c, A, S, R>
where
    A: AdcSource,
    S: Shutter,
    R: Reporter + ?Sized,
{
    /// Wrap `controller` and `reporter` in tasks.
    #[must_use]
    pub const fn new(controller: &'c ShutterController<A, S>, reporter: &'c R) -> Self {
        Self {
            light_scan: LightScan(controller),
            temperature_scan: TemperatureScan(controller),
            light_report: LightReport {
                controller,
                reporter,
            },
            temperature_report: TemperatureReport {
                controller,
                reporter,
            },
        }
    }

    /// Register all four tasks with `scheduler`.
    ///
    /// Scans start on the first tick; reports wait for the configured report
    /// delay. Either every task is registered or none is.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Scheduler`](crate::ControlError::Scheduler) if
    /// the table has fewer than four free slots.
    pub fn register<'t, const N: usize>(
        &'t self,
        scheduler: &Scheduler<'t, N>,
    ) -> ControlResult<ControllerTaskIds> {
        let config = self.light_scan.0.config();

        let light_scan = add_or_roll_back(
            scheduler,
            &self.light_scan,
            0,
            config.light_scan_period,
            &[],
        )?;
        let temperature_scan = add_or_roll_back(
            scheduler,
            &self.temperature_scan,
            0,
            config.temperature_scan_period,
            &[light_scan],
        )?;
        let light_report = add_or_roll_back(
            scheduler,
            &self.light_report,
            config.report_delay,
            config.light_report_period,
            &[light_scan, temperature_scan],
        )?;
        let temperature_report = add_or_roll_back(
            scheduler,
            &self.temperature_report,
            config.report_delay,
            config.temperature_report_period,
            &[light_scan, temperature_scan, light_report],
        )?;

        tracing::info!(
            %light_scan,
            %temperature_scan,
            %light_report,
            %temperature_report,
            "controller tasks registered"
        );
        Ok(ControllerTaskIds {
            light_scan,
            temperature_scan,
            light_report,
            temperature_report,
        })
    }
}
