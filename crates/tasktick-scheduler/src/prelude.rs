//! Prelude module for common scheduler types.
//!
//! This module provides a convenient way to import the most commonly used
//! types from the scheduler crate.

pub use crate::DEFAULT_CAPACITY;
pub use crate::config::SchedulerConfig;
pub use crate::counters::CounterSnapshot;
pub use crate::error::{InvalidIndexReason, SchedulerError, SchedulerResult};
pub use crate::scheduler::Scheduler;
pub use crate::slot::SlotSnapshot;
pub use crate::source::{PeriodicTicker, SimulatedTicker, TickHandler, TickSource, drive};
pub use crate::task::{Task, TaskId};
