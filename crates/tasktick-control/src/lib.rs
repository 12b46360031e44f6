//! # tasktick-control
//!
//! Sunshade controller built on `tasktick-scheduler`.
//!
//! Light and temperature sensors are sampled periodically and smoothed with a
//! moving average; when either average crosses its threshold the shutter is
//! rolled down, and rolled back up once it falls below. Averages are reported
//! periodically through a [`Reporter`].
//!
//! ## Architecture
//!
//! - [`controller`] - scan logic and the shared shutter status
//! - [`tasks`] - [`Task`](tasktick_scheduler::Task) adapters and registration
//! - [`average`] - fixed-window moving average
//! - [`sensor`] - ADC channels, conversions and a simulated ADC
//! - [`shutter`] - shutter actuator trait and a simulated shutter
//! - [`report`] - measurement reporting
//! - [`config`] - thresholds, amounts and task timing
//! - [`error`] - error types
//!
//! Hardware access sits behind [`AdcSource`], [`Shutter`] and [`Reporter`];
//! the simulated implementations here are what the host CLI and the tests
//! run against.

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod average;
pub mod config;
pub mod controller;
pub mod error;
pub mod report;
pub mod sensor;
pub mod shutter;
pub mod tasks;

pub mod prelude;

pub use average::MovingAverage;
pub use config::{ControllerConfig, ControllerConfigBuilder};
pub use controller::{ControllerStats, ScanOutcome, ShutterController};
pub use error::{ControlError, ControlResult};
pub use report::{LatestReporter, Measurement, Reporter, TracingReporter};
pub use sensor::{AdcChannel, AdcSource, SimulatedAdc, Waveform};
pub use shutter::{Shutter, ShutterState, SimulatedShutter};
pub use tasks::{ControllerTaskIds, ControllerTasks};
