//! Deterministic simulation on a simulated tick source

use anyhow::Result;
use tasktick_control::ControllerTasks;
use tasktick_scheduler::{DEFAULT_CAPACITY, Scheduler, SimulatedTicker, TickHandler, TickSource};

use crate::commands::{Rig, RunReport, SimulateArgs};
use crate::config::AppConfig;
use crate::error::CliError;
use crate::output;

/// Execute the simulate command
pub fn execute(args: &SimulateArgs, config: &AppConfig, json: bool) -> Result<()> {
    let report = simulate(args, config)?;
    output::print_report(&report, json)
}

/// Run the controller for `args.ticks` simulated ticks.
pub fn simulate(args: &SimulateArgs, config: &AppConfig) -> Result<RunReport, CliError> {
    let rig = Rig::new(config)?;
    let tasks = ControllerTasks::new(&rig.controller, &rig.reporter);
    let scheduler = Scheduler::<DEFAULT_CAPACITY>::new(config.scheduler.clone())?;
    tasks.register(&scheduler)?;

    let mut ticker = SimulatedTicker::new(config.scheduler.tick_interval());
    tracing::info!(
        ticks = args.ticks,
        dispatch_every = args.dispatch_every,
        "simulation started"
    );

    scheduler.start();
    for _ in 0..args.ticks {
        let tick = ticker.wait_for_tick();
        scheduler.on_tick();
        if tick % args.dispatch_every == 0 {
            scheduler.dispatch();
        }
    }
    scheduler.stop();

    tracing::info!(
        simulated_ms = u64::try_from(ticker.elapsed().as_millis()).unwrap_or(u64::MAX),
        "simulation finished"
    );
    Ok(rig.report(&scheduler, ticker.tick_count(), None))
}
