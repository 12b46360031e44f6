//! tasktickctl - tasktick scheduler runner
//!
//! Runs the demo shutter controller on the tasktick scheduler, either as a
//! deterministic tick-by-tick simulation or in real time on the host clock.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod config;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{RunArgs, SimulateArgs};
use crate::config::AppConfig;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "tasktickctl")]
#[command(about = "Run the tasktick cooperative scheduler and its demo shutter controller")]
#[command(version)]
#[command(long_about = "
tasktickctl drives a fixed-capacity, tick-driven task scheduler running a
sunshade controller: light and temperature scans that roll a shutter up and
down, and periodic reports of the averaged readings.

Sensors and the shutter are simulated. Use --json flag for machine-readable
output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (JSON, or YAML by extension)
    #[arg(short, long, global = true, env = "TASKTICK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a number of ticks as fast as possible
    Simulate(SimulateArgs),

    /// Run in real time on the host clock
    Run(RunArgs),

    /// Print the effective configuration
    Config,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "tasktickctl={log_level},tasktick_scheduler={log_level},tasktick_control={log_level},tasktick={log_level}"
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let result = execute_command(&cli);

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let exit_code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            std::process::exit(exit_code);
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    if let Commands::Completion { shell } = &cli.command {
        completion::generate_completion(*shell);
        return Ok(());
    }

    let config = AppConfig::load(cli.config.as_deref())?;
    match &cli.command {
        Commands::Simulate(args) => commands::simulate::execute(args, &config, cli.json),
        Commands::Run(args) => commands::run::execute(args, &config, cli.json),
        Commands::Config => commands::config::execute(&config, cli.json),
        Commands::Completion { .. } => Ok(()),
    }
}
