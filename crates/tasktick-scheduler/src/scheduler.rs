//! The scheduler: task table, lifecycle and registration.
//!
//! The tick handler lives in [`crate::tick`] and the dispatcher in
//! [`crate::dispatch`]; both operate on the table owned here.

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use crate::config::SchedulerConfig;
use crate::counters::SchedulerCounters;
use crate::error::{InvalidIndexReason, SchedulerError, SchedulerResult};
use crate::slot::{SlotCell, SlotSnapshot, Ticks};
use crate::task::{Task, TaskId};

/// Fixed-capacity cooperative task scheduler.
///
/// `N` is the task table capacity. `'t` bounds the registered tasks: the
/// scheduler only borrows them and never drops or frees one, removal just
/// forgets the reference.
///
/// Three contexts touch the scheduler:
/// - the tick source calls [`TickHandler::on_tick`](crate::TickHandler::on_tick)
///   once per tick, possibly from another thread or an interrupt;
/// - the control loop calls [`Scheduler::dispatch`] as often as it can;
/// - mainline code registers and removes tasks with [`Scheduler::add`] and
///   [`Scheduler::remove`].
///
/// All methods take `&self`; each slot is guarded by its own critical section.
///
/// # Example
///
/// ```rust
/// use tasktick_scheduler::prelude::*;
///
/// fn sample() {}
///
/// let scheduler = Scheduler::<4>::new(SchedulerConfig::default())?;
/// let id = scheduler.add(&sample, 0, 10)?;
/// scheduler.start();
///
/// scheduler.on_tick();
/// assert_eq!(scheduler.dispatch(), 1);
///
/// scheduler.remove(id)?;
/// # Ok::<(), SchedulerError>(())
/// ```
pub struct Scheduler<'t, const N: usize> {
    slots: [SlotCell<'t>; N],
    running: AtomicBool,
    config: SchedulerConfig,
    counters: SchedulerCounters,
}

impl<'t, const N: usize> Scheduler<'t, N> {
    /// Build a scheduler and initialize its table.
    ///
    /// The scheduler starts stopped: ticks are ignored until
    /// [`Scheduler::start`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: SchedulerConfig) -> SchedulerResult<Self> {
        config.validate()?;
        let scheduler = Self {
            slots: core::array::from_fn(|_| SlotCell::vacant()),
            running: AtomicBool::new(false),
            config,
            counters: SchedulerCounters::new(),
        };
        scheduler.init();
        Ok(scheduler)
    }

    /// Reset every slot to empty and stop ticking.
    ///
    /// Safe to call more than once. Handles to tasks that were registered
    /// before the reset become stale.
    pub fn init(&self) {
        self.running.store(false, Ordering::Release);
        for slot in &self.slots {
            slot.with(|state| {
                if state.is_active() {
                    state.vacate();
                }
            });
        }
        tracing::info!(
            capacity = N,
            tick_interval_us = self.config.tick_interval_us,
            "scheduler initialized"
        );
    }

    /// Let ticks reach the task table.
    ///
    /// Tasks registered between [`Scheduler::init`] and `start` share a common
    /// time origin, which keeps their relative phase deterministic.
    pub fn start(&self) {
        if !self.running.swap(true, Ordering::AcqRel) {
            tracing::info!(active_tasks = self.len(), "scheduler started");
        }
    }

    /// Stop ticks from reaching the task table. Registered tasks are kept.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            tracing::info!("scheduler stopped");
        }
    }

    /// Whether ticks are currently applied to the table.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Register a task.
    ///
    /// The task takes the lowest free slot. It first becomes ready on tick
    /// `initial_delay + 1` after registration (counting only ticks delivered
    /// while running) and then every `period` ticks. A `period` of 0 runs
    /// the task once and frees the slot.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::TableFull`] if every slot is taken. The table
    /// is not modified in that case.
    pub fn add(
        &self,
        task: &'t dyn Task,
        initial_delay: Ticks,
        period: Ticks,
    ) -> SchedulerResult<TaskId> {
        for (index, slot) in self.slots.iter().enumerate() {
            let claimed = slot.with(|state| {
                if state.is_active() {
                    None
                } else {
                    state.occupy(task, initial_delay, period);
                    Some(state.generation)
                }
            });

            if let Some(generation) = claimed {
                self.counters.inc_registration();
                tracing::debug!(index, initial_delay, period, "task registered");
                return Ok(TaskId::new(index, generation));
            }
        }

        self.counters.inc_table_full();
        tracing::warn!(capacity = N, "task table full, registration rejected");
        Err(SchedulerError::table_full(N))
    }

    /// Remove a registered task.
    ///
    /// The task is never dispatched again. If it is running right now it
    /// finishes normally; the dispatcher notices the slot changed and leaves
    /// it alone.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidIndex`] if the handle is out of range,
    /// its slot is empty, or the slot has been vacated since the handle was
    /// issued.
    pub fn remove(&self, id: TaskId) -> SchedulerResult {
        self.vacate_slot(id.index(), Some(id.generation()))
    }

    /// Remove whatever task occupies slot `index`.
    ///
    /// Unlike [`Scheduler::remove`] no generation check is made.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidIndex`] if `index` is out of range or
    /// the slot is empty.
    pub fn remove_at(&self, index: usize) -> SchedulerResult {
        self.vacate_slot(index, None)
    }

    fn vacate_slot(&self, index: usize, generation: Option<u32>) -> SchedulerResult {
        let slot = self.slots.get(index).ok_or(SchedulerError::invalid_index(
            index,
            InvalidIndexReason::OutOfBounds,
        ))?;

        slot.with(|state| {
            if !state.is_active() {
                return Err(InvalidIndexReason::Vacant);
            }
            if generation.is_some_and(|expected| expected != state.generation) {
                return Err(InvalidIndexReason::Stale);
            }
            state.vacate();
            Ok(())
        })
        .map_err(|reason| {
            tracing::debug!(index, %reason, "task removal rejected");
            SchedulerError::invalid_index(index, reason)
        })?;

        self.counters.inc_removal();
        tracing::debug!(index, "task removed");
        Ok(())
    }

    /// Task table capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.with(|state| state.is_active()))
            .count()
    }

    /// Whether no task is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of one slot, or `None` if `index` is out of range.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<SlotSnapshot> {
        self.slots
            .get(index)
            .map(|slot| slot.with(|state| state.snapshot()))
    }

    /// Copy of every slot, in index order.
    ///
    /// Each slot is copied inside its own critical section; a tick landing
    /// between two slots is reflected in the later ones only.
    #[must_use]
    pub fn snapshot(&self) -> [SlotSnapshot; N] {
        self.slots
            .each_ref()
            .map(|slot| slot.with(|state| state.snapshot()))
    }

    /// Activity counters.
    #[inline]
    #[must_use]
    pub fn counters(&self) -> &SchedulerCounters {
        &self.counters
    }

    /// Configuration the scheduler was built with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Configured tick interval.
    #[inline]
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }

    #[inline]
    pub(crate) fn slots(&self) -> &[SlotCell<'t>; N] {
        &self.slots
    }

    #[inline]
    pub(crate) fn slot_cell(&self, index: usize) -> Option<&SlotCell<'t>> {
        self.slots.get(index)
    }
}

impl<const N: usize> fmt::Debug for Scheduler<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("capacity", &N)
            .field("running", &self.is_running())
            .field("config", &self.config)
            .field("slots", &self.snapshot())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn noop() {}

    #[test]
    fn test_new_starts_stopped_and_empty() -> TestResult {
        let scheduler = Scheduler::<4>::new(SchedulerConfig::default())?;
        assert!(!scheduler.is_running());
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.capacity(), 4);
        Ok(())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SchedulerConfig {
            tick_interval_us: 0,
            ..SchedulerConfig::default()
        };
        let result = Scheduler::<4>::new(config);
        assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
    }

    #[test]
    fn test_add_takes_lowest_free_slot() -> TestResult {
        let scheduler = Scheduler::<4>::new(SchedulerConfig::default())?;
        let a = scheduler.add(&noop, 0, 1)?;
        let b = scheduler.add(&noop, 0, 1)?;
        let c = scheduler.add(&noop, 0, 1)?;
        assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));

        scheduler.remove(b)?;
        let d = scheduler.add(&noop, 0, 1)?;
        assert_eq!(d.index(), 1);
        assert_ne!(d, b);
        Ok(())
    }

    #[test]
    fn test_add_writes_slot_fields() -> TestResult {
        let scheduler = Scheduler::<2>::new(SchedulerConfig::default())?;
        let id = scheduler.add(&noop, 7, 9)?;
        let slot = scheduler.slot(id.index()).ok_or("slot missing")?;
        assert!(slot.active);
        assert_eq!(slot.delay, 7);
        assert_eq!(slot.period, 9);
        assert_eq!(slot.runme, 0);
        Ok(())
    }

    #[test]
    fn test_table_full_leaves_table_unchanged() -> TestResult {
        let scheduler = Scheduler::<2>::new(SchedulerConfig::default())?;
        scheduler.add(&noop, 1, 2)?;
        scheduler.add(&noop, 3, 4)?;

        let before = scheduler.snapshot();
        let result = scheduler.add(&noop, 5, 6);
        assert_eq!(result, Err(SchedulerError::TableFull { capacity: 2 }));
        assert_eq!(scheduler.snapshot(), before);
        assert_eq!(scheduler.counters().snapshot().table_full_rejections, 1);
        Ok(())
    }

    #[test]
    fn test_remove_twice_is_rejected() -> TestResult {
        let scheduler = Scheduler::<2>::new(SchedulerConfig::default())?;
        let id = scheduler.add(&noop, 0, 5)?;
        let other = scheduler.add(&noop, 2, 3)?;
        let other_before = scheduler.slot(other.index());

        scheduler.remove(id)?;
        assert!(matches!(
            scheduler.remove_at(id.index()),
            Err(SchedulerError::InvalidIndex {
                index: 0,
                reason: InvalidIndexReason::Vacant
            })
        ));
        assert_eq!(scheduler.slot(other.index()), other_before);
        Ok(())
    }

    #[test]
    fn test_remove_out_of_bounds() -> TestResult {
        let scheduler = Scheduler::<2>::new(SchedulerConfig::default())?;
        assert_eq!(
            scheduler.remove_at(2),
            Err(SchedulerError::InvalidIndex {
                index: 2,
                reason: InvalidIndexReason::OutOfBounds
            })
        );
        Ok(())
    }

    #[test]
    fn test_stale_handle_does_not_remove_new_task() -> TestResult {
        let scheduler = Scheduler::<1>::new(SchedulerConfig::default())?;
        let old = scheduler.add(&noop, 0, 0)?;
        scheduler.remove(old)?;
        let new = scheduler.add(&noop, 0, 4)?;
        assert_eq!(new.index(), old.index());

        assert_eq!(
            scheduler.remove(old),
            Err(SchedulerError::InvalidIndex {
                index: 0,
                reason: InvalidIndexReason::Stale
            })
        );
        assert!(scheduler.slot(0).is_some_and(|slot| slot.active));
        Ok(())
    }

    #[test]
    fn test_init_clears_table_and_stops() -> TestResult {
        let scheduler = Scheduler::<3>::new(SchedulerConfig::default())?;
        let id = scheduler.add(&noop, 0, 1)?;
        scheduler.start();

        scheduler.init();
        assert!(!scheduler.is_running());
        assert!(scheduler.is_empty());
        assert!(scheduler.remove(id).is_err());

        scheduler.init();
        assert!(scheduler.is_empty());
        Ok(())
    }

    #[test]
    fn test_start_stop_toggle() -> TestResult {
        let scheduler = Scheduler::<1>::new(SchedulerConfig::default())?;
        scheduler.start();
        scheduler.start();
        assert!(scheduler.is_running());
        scheduler.stop();
        assert!(!scheduler.is_running());
        Ok(())
    }
}
