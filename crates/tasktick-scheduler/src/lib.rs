//! # tasktick-scheduler
//!
//! Fixed-capacity, tick-driven cooperative task scheduler for small control
//! loops.
//!
//! A periodic tick (a timer interrupt on a microcontroller, a timer thread on
//! a host) counts down every registered task; the mainline control loop calls
//! [`Scheduler::dispatch`] as often as it can and runs whichever tasks are
//! due. Tasks never preempt each other, only the tick does.
//!
//! ## Architecture
//!
//! - [`scheduler`] - task table, lifecycle and registration
//! - `tick` - the tick handler ([`TickHandler`] impl for [`Scheduler`])
//! - `dispatch` - the dispatcher
//! - [`slot`] - slot fields and the per-slot critical section
//! - [`source`] - tick sources and the [`TickHandler`] seam
//! - [`counters`] - lock-free activity counters
//! - [`config`] - tick configuration
//! - [`error`] - error types
//!
//! ## Tick semantics
//!
//! A task added with initial delay `D` and period `P` is flagged ready on
//! ticks `D + 1`, `D + 1 + P`, `D + 1 + 2P`, ... counted from registration.
//! A period of 0 makes a one-shot: it runs once and its slot is freed.
//! Pending runs accumulate in a saturating 8-bit counter when dispatch falls
//! behind.
//!
//! ## RT Safety
//!
//! - [`TickHandler::on_tick`] and [`Scheduler::dispatch`] never allocate,
//!   never log and never fail
//! - each slot is locked only for a handful of field updates
//! - tasks run with no lock held
//!
//! ## Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use tasktick_scheduler::prelude::*;
//!
//! let samples = AtomicU32::new(0);
//! let sample = || {
//!     samples.fetch_add(1, Ordering::Relaxed);
//! };
//!
//! let scheduler = Scheduler::<4>::new(SchedulerConfig::default())?;
//! scheduler.add(&sample, 0, 10)?;
//! scheduler.start();
//!
//! for _ in 0..30 {
//!     scheduler.on_tick();
//!     scheduler.dispatch();
//! }
//! assert_eq!(samples.load(Ordering::Relaxed), 3);
//! # Ok::<(), SchedulerError>(())
//! ```

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

pub mod config;
pub mod counters;
mod dispatch;
pub mod error;
pub mod scheduler;
pub mod slot;
pub mod source;
pub mod task;
mod tick;

pub mod prelude;

pub use config::{SchedulerConfig, SchedulerConfigBuilder};
pub use counters::{CounterSnapshot, SchedulerCounters};
pub use error::{InvalidIndexReason, SchedulerError, SchedulerResult};
pub use scheduler::Scheduler;
pub use slot::{RunCount, SlotSnapshot, Ticks};
pub use source::{PeriodicTicker, SimulatedTicker, TickHandler, TickSource, TickTiming, drive};
pub use task::{Task, TaskId};

/// Default task table capacity.
pub const DEFAULT_CAPACITY: usize = 8;
