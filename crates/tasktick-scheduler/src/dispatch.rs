//! Dispatcher.
//!
//! Runs in the mainline control loop. A pass walks the table in index order
//! and runs each ready task once. Each slot is handled in two short critical
//! sections with the task itself in between:
//!
//! 1. claim: read the task reference, generation and `runme`;
//! 2. run the task with no lock held, so the tick handler keeps ticking and
//!    the task may add or remove tasks, including itself;
//! 3. settle: if the slot still holds the same registration, take one run off
//!    `runme` and reclaim it if it is a one-shot.

use crate::scheduler::Scheduler;

impl<const N: usize> Scheduler<'_, N> {
    /// Run every ready task once, in slot order.
    ///
    /// Never waits for a tick; with nothing ready it returns immediately.
    /// A task with several pending runs still runs only once per pass, so
    /// catching up takes several passes.
    ///
    /// Returns the number of tasks run.
    pub fn dispatch(&self) -> usize {
        (0..N).filter(|&index| self.dispatch_slot(index)).count()
    }

    /// Dispatch a single slot: one step of [`Scheduler::dispatch`].
    ///
    /// Returns `true` if the slot's task ran. Out-of-range indices, empty
    /// slots and slots with no pending run are skipped.
    pub fn dispatch_slot(&self, index: usize) -> bool {
        let Some(slot) = self.slot_cell(index) else {
            return false;
        };

        let claimed = slot.with(|state| match state.task {
            Some(task) if state.runme > 0 => Some((task, state.generation)),
            _ => None,
        });
        let Some((task, generation)) = claimed else {
            return false;
        };

        task.run();
        self.counters().inc_dispatch();

        let reclaimed = slot.with(|state| {
            if !state.is_active() || state.generation != generation {
                return false;
            }
            state.runme = state.runme.saturating_sub(1);
            if state.period == 0 {
                state.vacate();
                return true;
            }
            false
        });

        if reclaimed {
            self.counters().inc_one_shot_reclaim();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_nothing_ready_is_noop() -> TestResult {
        let runs = AtomicU32::new(0);
        let task = || {
            runs.fetch_add(1, Ordering::Relaxed);
        };
        let scheduler = Scheduler::<2>::new(SchedulerConfig::default())?;
        scheduler.add(&task, 3, 3)?;
        scheduler.start();

        assert_eq!(scheduler.dispatch(), 0);
        scheduler.on_tick();
        assert_eq!(scheduler.dispatch(), 0);
        assert_eq!(runs.load(Ordering::Relaxed), 0);
        Ok(())
    }

    #[test]
    fn test_one_shot_runs_then_slot_is_freed() -> TestResult {
        let runs = AtomicU32::new(0);
        let task = || {
            runs.fetch_add(1, Ordering::Relaxed);
        };
        let scheduler = Scheduler::<2>::new(SchedulerConfig::default())?;
        scheduler.add(&task, 0, 0)?;
        scheduler.start();

        scheduler.on_tick();
        assert_eq!(scheduler.slot(0).map(|slot| slot.runme), Some(1));

        assert_eq!(scheduler.dispatch(), 1);
        assert_eq!(runs.load(Ordering::Relaxed), 1);
        assert!(scheduler.slot(0).is_some_and(|slot| !slot.active));
        assert_eq!(scheduler.counters().snapshot().one_shot_reclaims, 1);
        Ok(())
    }

    #[test]
    fn test_one_shot_with_backlog_runs_once() -> TestResult {
        let runs = AtomicU32::new(0);
        let task = || {
            runs.fetch_add(1, Ordering::Relaxed);
        };
        let scheduler = Scheduler::<1>::new(SchedulerConfig::default())?;
        scheduler.add(&task, 0, 0)?;
        scheduler.start();

        for _ in 0..5 {
            scheduler.on_tick();
        }
        assert_eq!(scheduler.slot(0).map(|slot| slot.runme), Some(5));

        for _ in 0..5 {
            scheduler.dispatch();
        }
        assert_eq!(runs.load(Ordering::Relaxed), 1);
        Ok(())
    }

    #[test]
    fn test_backlog_drains_one_run_per_pass() -> TestResult {
        let runs = AtomicU32::new(0);
        let task = || {
            runs.fetch_add(1, Ordering::Relaxed);
        };
        let scheduler = Scheduler::<1>::new(SchedulerConfig::default())?;
        scheduler.add(&task, 0, 1)?;
        scheduler.start();

        for _ in 0..3 {
            scheduler.on_tick();
        }

        assert_eq!(scheduler.dispatch(), 1);
        assert_eq!(scheduler.slot(0).map(|slot| slot.runme), Some(2));
        assert_eq!(scheduler.dispatch(), 1);
        assert_eq!(scheduler.dispatch(), 1);
        assert_eq!(scheduler.dispatch(), 0);
        assert_eq!(runs.load(Ordering::Relaxed), 3);
        Ok(())
    }

    #[test]
    fn test_dispatch_slot_out_of_range() -> TestResult {
        let scheduler = Scheduler::<1>::new(SchedulerConfig::default())?;
        assert!(!scheduler.dispatch_slot(1));
        Ok(())
    }
}
