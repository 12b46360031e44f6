//! Command implementations for tasktickctl

pub mod config;
pub mod run;
pub mod simulate;

use clap::Args;
use serde::Serialize;
use tasktick_control::{
    ControllerStats, LatestReporter, Measurement, ShutterController, ShutterState, SimulatedAdc,
    SimulatedShutter, TracingReporter,
};
use tasktick_scheduler::{CounterSnapshot, Scheduler, SlotSnapshot, TickTiming};

use crate::config::AppConfig;
use crate::error::CliError;

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SimulateArgs {
    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 1_000)]
    pub ticks: u64,

    /// Run a dispatch pass after every K ticks
    #[arg(
        short = 'k',
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub dispatch_every: u64,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// How long to run, in milliseconds
    #[arg(short, long, default_value_t = 1_000)]
    pub duration_ms: u64,
}

/// The demo controller with simulated hardware.
pub struct Rig {
    pub controller: ShutterController<SimulatedAdc, SimulatedShutter>,
    pub reporter: (LatestReporter, TracingReporter),
}

impl Rig {
    pub fn new(config: &AppConfig) -> Result<Self, CliError> {
        let adc = SimulatedAdc::new(config.sensors.temperature, config.sensors.light);
        let controller =
            ShutterController::new(config.controller.clone(), adc, SimulatedShutter::new())?;
        Ok(Self {
            controller,
            reporter: (LatestReporter::new(), TracingReporter),
        })
    }

    pub fn report<const N: usize>(
        &self,
        scheduler: &Scheduler<'_, N>,
        ticks: u64,
        timing: Option<TickTiming>,
    ) -> RunReport {
        let latest = &self.reporter.0;
        RunReport {
            ticks,
            scheduler: scheduler.counters().snapshot(),
            slots: scheduler.snapshot().to_vec(),
            controller: self.controller.stats(),
            shutter: self.controller.shutter().state(),
            rolled_up: self.controller.is_rolled_up(),
            average_light: self.controller.average_light(),
            average_temperature: self.controller.average_temperature(),
            reported_light: latest.latest(Measurement::AverageLight),
            reported_temperature: latest.latest(Measurement::AverageTemperature),
            timing,
        }
    }
}

/// Result of a simulate or run command.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub ticks: u64,
    pub scheduler: CounterSnapshot,
    pub slots: Vec<SlotSnapshot>,
    pub controller: ControllerStats,
    pub shutter: ShutterState,
    pub rolled_up: bool,
    pub average_light: f64,
    pub average_temperature: f64,
    pub reported_light: Option<f64>,
    pub reported_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<TickTiming>,
}
