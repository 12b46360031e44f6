//! Task table slots and the critical section guarding them.
//!
//! A slot's fields are read and written by two contexts: the tick handler,
//! which may preempt the mainline at any instruction boundary, and the
//! mainline dispatcher/registration code. Every access goes through
//! [`SlotCell::with`], so each field group is observed and updated as a unit.
//! On a hosted target the section is a `parking_lot` mutex; on a single-core
//! MCU the same shape is an interrupt-masking critical section.

use core::fmt;

use parking_lot::Mutex;
use serde::Serialize;

use crate::task::Task;

/// Tick count type used for delays and periods.
pub type Ticks = u16;

/// Pending run count type.
pub type RunCount = u8;

/// What a single tick did to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    /// Slot is empty.
    Idle,
    /// Delay was decremented; the task is not ready yet.
    CountedDown,
    /// The task became ready and `runme` went up by one.
    Ready,
    /// The task became ready but `runme` was already at its maximum.
    Saturated,
}

/// Fields of one task table entry.
#[derive(Clone, Copy)]
pub(crate) struct SlotState<'t> {
    pub(crate) task: Option<&'t dyn Task>,
    pub(crate) delay: Ticks,
    pub(crate) period: Ticks,
    pub(crate) runme: RunCount,
    pub(crate) generation: u32,
}

impl<'t> SlotState<'t> {
    pub(crate) const fn vacant() -> Self {
        Self {
            task: None,
            delay: 0,
            period: 0,
            runme: 0,
            generation: 0,
        }
    }

    #[inline]
    pub(crate) const fn is_active(&self) -> bool {
        self.task.is_some()
    }

    pub(crate) fn occupy(&mut self, task: &'t dyn Task, delay: Ticks, period: Ticks) {
        self.task = Some(task);
        self.delay = delay;
        self.period = period;
        self.runme = 0;
    }

    /// Reset to the empty state and retire every handle issued for it.
    pub(crate) fn vacate(&mut self) {
        self.task = None;
        self.delay = 0;
        self.period = 0;
        self.runme = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Advance this slot by one tick.
    ///
    /// A periodic task reloads with `period - 1` because the tick that made it
    /// ready already counts towards the next cycle. A one-shot keeps
    /// `delay == 0` and is flagged again on every tick until it is reclaimed.
    pub(crate) fn tick(&mut self) -> TickOutcome {
        if !self.is_active() {
            return TickOutcome::Idle;
        }

        if self.delay > 0 {
            self.delay -= 1;
            return TickOutcome::CountedDown;
        }

        if self.period > 0 {
            self.delay = self.period - 1;
        }

        match self.runme.checked_add(1) {
            Some(runme) => {
                self.runme = runme;
                TickOutcome::Ready
            }
            None => TickOutcome::Saturated,
        }
    }

    pub(crate) fn snapshot(&self) -> SlotSnapshot {
        SlotSnapshot {
            active: self.is_active(),
            delay: self.delay,
            period: self.period,
            runme: self.runme,
            generation: self.generation,
        }
    }
}

impl fmt::Debug for SlotState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotState")
            .field("active", &self.is_active())
            .field("delay", &self.delay)
            .field("period", &self.period)
            .field("runme", &self.runme)
            .field("generation", &self.generation)
            .finish()
    }
}

/// Point-in-time copy of a slot's fields.
///
/// Two snapshots compare equal only if every field matches, which makes a
/// table snapshot suitable for "nothing changed" assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SlotSnapshot {
    /// Whether a task is registered in the slot.
    pub active: bool,
    /// Ticks remaining before the task is next flagged ready.
    pub delay: Ticks,
    /// Reload interval in ticks; 0 for a one-shot task.
    pub period: Ticks,
    /// Pending, not yet dispatched runs.
    pub runme: RunCount,
    /// Number of times the slot has been vacated.
    pub generation: u32,
}

impl SlotSnapshot {
    /// Whether the task has at least one pending run.
    #[inline]
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.active && self.runme > 0
    }

    /// Whether the task is a one-shot.
    #[inline]
    #[must_use]
    pub const fn is_one_shot(&self) -> bool {
        self.active && self.period == 0
    }
}

/// A slot behind its critical section.
pub(crate) struct SlotCell<'t> {
    inner: Mutex<SlotState<'t>>,
}

impl<'t> SlotCell<'t> {
    pub(crate) const fn vacant() -> Self {
        Self {
            inner: Mutex::new(SlotState::vacant()),
        }
    }

    /// Run `f` with exclusive access to the slot.
    ///
    /// The section must stay short: no task code and no logging inside it.
    #[inline]
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut SlotState<'t>) -> R) -> R {
        let mut state = self.inner.lock();
        f(&mut state)
    }
}

impl fmt::Debug for SlotCell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SlotCell")
            .field(&self.with(|state| *state))
            .finish()
    }
}
