//! Real-time run on the host clock

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use tasktick_control::ControllerTasks;
use tasktick_scheduler::{DEFAULT_CAPACITY, PeriodicTicker, Scheduler, drive};

use crate::commands::{Rig, RunArgs, RunReport};
use crate::config::AppConfig;
use crate::error::CliError;
use crate::output;

/// Pause between dispatch passes that found nothing to do.
const IDLE_BACKOFF: Duration = Duration::from_micros(200);

/// Execute the run command
pub fn execute(args: &RunArgs, config: &AppConfig, json: bool) -> Result<()> {
    let report = run(args, config)?;
    output::print_report(&report, json)
}

/// Run the controller in real time for `args.duration_ms`.
///
/// A scoped thread drives the ticks while this thread is the control loop.
pub fn run(args: &RunArgs, config: &AppConfig) -> Result<RunReport, CliError> {
    let rig = Rig::new(config)?;
    let tasks = ControllerTasks::new(&rig.controller, &rig.reporter);
    let scheduler = Scheduler::<DEFAULT_CAPACITY>::new(config.scheduler.clone())?;
    tasks.register(&scheduler)?;

    let duration = Duration::from_millis(args.duration_ms);
    let stop = AtomicBool::new(false);
    tracing::info!(
        duration_ms = args.duration_ms,
        tick_interval_us = config.scheduler.tick_interval_us,
        "run started"
    );

    scheduler.start();
    let ticker = thread::scope(|scope| {
        let tick_thread = scope.spawn(|| {
            let mut source = PeriodicTicker::from_config(scheduler.config());
            let delivered = drive(&mut source, &scheduler, &stop);
            (delivered, *source.timing())
        });

        let started = Instant::now();
        let deadline = started.checked_add(duration).unwrap_or(started);
        while Instant::now() < deadline {
            if scheduler.dispatch() == 0 {
                thread::sleep(IDLE_BACKOFF);
            }
        }
        stop.store(true, Ordering::Release);
        tick_thread.join()
    });
    scheduler.stop();

    let (delivered, timing) = ticker.map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("unknown panic");
        tracing::error!(message, "tick thread panicked");
        CliError::TickThreadPanicked
    })?;
    if timing.late_ticks > 0 {
        tracing::warn!(
            late_ticks = timing.late_ticks,
            max_lateness_ns = timing.max_lateness_ns,
            "some ticks arrived late"
        );
    }
    tracing::info!(ticks = delivered, "run finished");
    Ok(rig.report(&scheduler, delivered, Some(timing)))
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_short_run_ticks_and_dispatches() -> TestResult {
        let mut config = AppConfig::default();
        config.scheduler.tick_interval_us = 1_000;
        config.scheduler.late_tick_threshold_us = Some(500);

        let report = run(&RunArgs { duration_ms: 50 }, &config)?;

        assert!(report.ticks > 0);
        assert_eq!(report.scheduler.ticks, report.ticks);
        assert!(report.controller.light_scans >= 1);
        assert!(report.timing.is_some_and(|timing| timing.total_ticks == report.ticks));
        Ok(())
    }
}
