//! Output formatting for CLI responses

use anyhow::{Error, Result};
use colored::Colorize;
use serde_json::json;

use crate::commands::RunReport;
use crate::config::AppConfig;
use crate::error::CliError;

const TASK_NAMES: [&str; 4] = [
    "light scan",
    "temperature scan",
    "light report",
    "temperature report",
];

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_type_name(error: &Error) -> &'static str {
    error
        .downcast_ref::<CliError>()
        .map_or("unknown", CliError::kind)
}

/// Print the effective configuration
pub fn print_config(config: &AppConfig, json: bool) -> Result<()> {
    if json {
        let output = json!({
            "success": true,
            "config": config
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", "Effective configuration:".bold());
        println!("{}", serde_json::to_string_pretty(config)?);
    }
    Ok(())
}

/// Print a run report
pub fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        let output = json!({
            "success": true,
            "report": report
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let counters = &report.scheduler;
    println!("{}", "Scheduler".bold());
    println!("  Ticks:       {}", report.ticks);
    println!("  Dispatches:  {}", counters.dispatches);
    println!("  Ignored:     {}", counters.ignored_ticks);
    if counters.runme_saturations > 0 {
        println!(
            "  Saturated:   {}",
            counters.runme_saturations.to_string().yellow()
        );
    }

    println!("{}", "Tasks".bold());
    for (index, slot) in report.slots.iter().enumerate().filter(|(_, slot)| slot.active) {
        let name = TASK_NAMES.get(index).copied().unwrap_or("task");
        let pending = if slot.runme > 0 {
            format!("{} pending", slot.runme).yellow()
        } else {
            "idle".green()
        };
        println!(
            "  [{index}] {name:<20} period {:>5}  next in {:>5}  {pending}",
            slot.period, slot.delay
        );
    }

    let stats = &report.controller;
    println!("{}", "Controller".bold());
    println!(
        "  Scans:       {} light, {} temperature",
        stats.light_scans, stats.temperature_scans
    );
    println!(
        "  Moves:       {} down, {} up",
        stats.roll_downs, stats.roll_ups
    );
    if stats.sensor_faults > 0 {
        println!("  Faults:      {}", stats.sensor_faults.to_string().red());
    }
    println!(
        "  Shutter:     {} (lowered {:.2})",
        if report.rolled_up {
            "up".green()
        } else {
            "down".yellow()
        },
        report.shutter.lowered
    );
    println!("  Light:       {:.1} %", report.average_light);
    println!("  Temperature: {:.1} °C", report.average_temperature);

    if let Some(timing) = &report.timing {
        println!("{}", "Tick timing".bold());
        println!(
            "  Late ticks:  {} ({:.2}%)",
            timing.late_ticks,
            timing.late_tick_rate() * 100.0
        );
        println!("  Mean late:   {} ns", timing.mean_lateness_ns());
        println!("  Max late:    {} ns", timing.max_lateness_ns);
    }
    Ok(())
}
