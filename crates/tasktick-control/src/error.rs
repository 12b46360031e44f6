//! Error types for the controller crate.

use tasktick_scheduler::SchedulerError;
use thiserror::Error;

use crate::sensor::AdcChannel;

/// Errors that can occur while configuring or running the controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    /// Invalid configuration provided.
    #[error("invalid controller configuration: {0}")]
    InvalidConfiguration(String),

    /// A conversion returned a value outside the ADC's range.
    #[error("{channel} sample {raw} exceeds the 10-bit ADC range")]
    SampleOutOfRange {
        /// Channel that produced the sample.
        channel: AdcChannel,
        /// The raw value read.
        raw: u16,
    },

    /// A channel could not be sampled at all.
    #[error("{channel} channel unavailable: {reason}")]
    ChannelUnavailable {
        /// Channel that failed.
        channel: AdcChannel,
        /// Why the channel failed.
        reason: String,
    },

    /// Registering the controller tasks with the scheduler failed.
    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

impl ControlError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Create a sample out of range error.
    #[must_use]
    pub const fn sample_out_of_range(channel: AdcChannel, raw: u16) -> Self {
        Self::SampleOutOfRange { channel, raw }
    }

    /// Create a channel unavailable error.
    #[must_use]
    pub fn channel_unavailable(channel: AdcChannel, reason: impl Into<String>) -> Self {
        Self::ChannelUnavailable {
            channel,
            reason: reason.into(),
        }
    }

    /// Whether the error came from reading a sensor.
    #[must_use]
    pub const fn is_sensor_fault(&self) -> bool {
        matches!(
            self,
            Self::SampleOutOfRange { .. } | Self::ChannelUnavailable { .. }
        )
    }
}

/// Result type for controller operations.
pub type ControlResult<T = ()> = Result<T, ControlError>;
