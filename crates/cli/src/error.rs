//! Error types for tasktickctl

use tasktick_control::ControlError;
use tasktick_scheduler::SchedulerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Controller error: {0}")]
    Control(#[from] ControlError),

    #[error("Tick thread panicked")]
    TickThreadPanicked,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfiguration(_)
            | Self::JsonError(_)
            | Self::YamlError(_)
            | Self::Scheduler(SchedulerError::InvalidConfig(_))
            | Self::Control(ControlError::InvalidConfiguration(_)) => 2,
            Self::Scheduler(_) | Self::Control(_) => 3,
            Self::TickThreadPanicked | Self::IoError(_) => 1,
        }
    }

    /// Short machine-readable name for JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "invalid_configuration",
            Self::Scheduler(_) => "scheduler",
            Self::Control(_) => "controller",
            Self::TickThreadPanicked => "tick_thread",
            Self::IoError(_) => "io",
            Self::JsonError(_) => "json",
            Self::YamlError(_) => "yaml",
        }
    }
}
