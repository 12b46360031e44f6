//! Lock-free counters for scheduler activity.
//!
//! The tick handler and dispatcher update these from their hot paths, so every
//! update is a single relaxed atomic add: no locks, no allocation, no logging.
//! Counters are independent of one another; a snapshot is eventually
//! consistent, not a cross-counter atomic view.

use core::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counter values returned by [`SchedulerCounters::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CounterSnapshot {
    /// Ticks processed while the scheduler was running.
    pub ticks: u64,
    /// Ticks that arrived before `start()` or after `stop()`.
    pub ignored_ticks: u64,
    /// Callbacks invoked by the dispatcher.
    pub dispatches: u64,
    /// One-shot slots reclaimed after their single run.
    pub one_shot_reclaims: u64,
    /// Ready flags dropped because `runme` was already at its maximum.
    pub runme_saturations: u64,
    /// Successful registrations.
    pub registrations: u64,
    /// Explicit removals.
    pub removals: u64,
    /// Registrations rejected with `TableFull`.
    pub table_full_rejections: u64,
}

/// Atomic counters for scheduler activity.
///
/// # Example
///
/// ```rust
/// use tasktick_scheduler::SchedulerCounters;
///
/// let counters = SchedulerCounters::new();
/// counters.inc_tick();
/// counters.inc_dispatch();
///
/// let snapshot = counters.snapshot();
/// assert_eq!(snapshot.ticks, 1);
/// assert_eq!(snapshot.dispatches, 1);
/// ```
#[derive(Debug, Default)]
pub struct SchedulerCounters {
    ticks: AtomicU64,
    ignored_ticks: AtomicU64,
    dispatches: AtomicU64,
    one_shot_reclaims: AtomicU64,
    runme_saturations: AtomicU64,
    registrations: AtomicU64,
    removals: AtomicU64,
    table_full_rejections: AtomicU64,
}

impl SchedulerCounters {
    /// Create a set of counters, all zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            ignored_ticks: AtomicU64::new(0),
            dispatches: AtomicU64::new(0),
            one_shot_reclaims: AtomicU64::new(0),
            runme_saturations: AtomicU64::new(0),
            registrations: AtomicU64::new(0),
            removals: AtomicU64::new(0),
            table_full_rejections: AtomicU64::new(0),
        }
    }

    /// Count a processed tick.
    #[inline]
    pub fn inc_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a tick that arrived while stopped.
    #[inline]
    pub fn inc_ignored_tick(&self) {
        self.ignored_ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a dispatched callback.
    #[inline]
    pub fn inc_dispatch(&self) {
        self.dispatches.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a reclaimed one-shot slot.
    #[inline]
    pub fn inc_one_shot_reclaim(&self) {
        self.one_shot_reclaims.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a dropped ready flag.
    #[inline]
    pub fn inc_runme_saturation(&self) {
        self.runme_saturations.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a successful registration.
    #[inline]
    pub fn inc_registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    /// Count an explicit removal.
    #[inline]
    pub fn inc_removal(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a rejected registration.
    #[inline]
    pub fn inc_table_full(&self) {
        self.table_full_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Processed tick count.
    #[inline]
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Dispatched callback count.
    #[inline]
    #[must_use]
    pub fn dispatches(&self) -> u64 {
        self.dispatches.load(Ordering::Relaxed)
    }

    /// Read every counter without resetting.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            ignored_ticks: self.ignored_ticks.load(Ordering::Relaxed),
            dispatches: self.dispatches.load(Ordering::Relaxed),
            one_shot_reclaims: self.one_shot_reclaims.load(Ordering::Relaxed),
            runme_saturations: self.runme_saturations.load(Ordering::Relaxed),
            registrations: self.registrations.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            table_full_rejections: self.table_full_rejections.load(Ordering::Relaxed),
        }
    }

    /// Read every counter and reset it to zero.
    ///
    /// Meant for a periodic reporting task, not the tick path.
    #[must_use]
    pub fn snapshot_and_reset(&self) -> CounterSnapshot {
        CounterSnapshot {
            ticks: self.ticks.swap(0, Ordering::Relaxed),
            ignored_ticks: self.ignored_ticks.swap(0, Ordering::Relaxed),
            dispatches: self.dispatches.swap(0, Ordering::Relaxed),
            one_shot_reclaims: self.one_shot_reclaims.swap(0, Ordering::Relaxed),
            runme_saturations: self.runme_saturations.swap(0, Ordering::Relaxed),
            registrations: self.registrations.swap(0, Ordering::Relaxed),
            removals: self.removals.swap(0, Ordering::Relaxed),
            table_full_rejections: self.table_full_rejections.swap(0, Ordering::Relaxed),
        }
    }
}
