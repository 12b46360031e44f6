//! Prelude module for common controller types.

pub use crate::average::MovingAverage;
pub use crate::config::ControllerConfig;
pub use crate::controller::{ControllerStats, ScanOutcome, ShutterController};
pub use crate::error::{ControlError, ControlResult};
pub use crate::report::{LatestReporter, Measurement, Reporter, TracingReporter};
pub use crate::sensor::{AdcChannel, AdcSource, SimulatedAdc, Waveform};
pub use crate::shutter::{Shutter, SimulatedShutter};
pub use crate::tasks::{ControllerTaskIds, ControllerTasks};
