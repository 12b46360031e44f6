//! Tick handler.
//!
//! Runs once per tick, in whatever context the tick source lives in (timer
//! interrupt, timer thread, test loop). It never blocks beyond one slot's
//! critical section, never allocates, never logs and never fails: a ready
//! flag that cannot be recorded because `runme` is at its maximum is dropped
//! and counted.

use crate::scheduler::Scheduler;
use crate::slot::TickOutcome;
use crate::source::TickHandler;

impl<const N: usize> TickHandler for Scheduler<'_, N> {
    fn on_tick(&self) {
        if !self.is_running() {
            self.counters().inc_ignored_tick();
            return;
        }

        self.counters().inc_tick();
        for slot in self.slots() {
            if slot.with(|state| state.tick()) == TickOutcome::Saturated {
                self.counters().inc_runme_saturation();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn noop() {}

    #[test]
    fn test_ticks_ignored_until_started() -> TestResult {
        let scheduler = Scheduler::<2>::new(SchedulerConfig::default())?;
        scheduler.add(&noop, 2, 5)?;

        scheduler.on_tick();
        scheduler.on_tick();
        assert_eq!(scheduler.slot(0).map(|slot| slot.delay), Some(2));
        assert_eq!(scheduler.counters().snapshot().ignored_ticks, 2);

        scheduler.start();
        scheduler.on_tick();
        assert_eq!(scheduler.slot(0).map(|slot| slot.delay), Some(1));
        assert_eq!(scheduler.counters().ticks(), 1);
        Ok(())
    }

    #[test]
    fn test_zero_delay_ready_on_first_tick_not_at_registration() -> TestResult {
        let scheduler = Scheduler::<1>::new(SchedulerConfig::default())?;
        scheduler.start();
        scheduler.add(&noop, 0, 0)?;
        assert_eq!(scheduler.slot(0).map(|slot| slot.runme), Some(0));

        scheduler.on_tick();
        assert_eq!(scheduler.slot(0).map(|slot| slot.runme), Some(1));
        Ok(())
    }

    #[test]
    fn test_stop_freezes_countdown() -> TestResult {
        let scheduler = Scheduler::<1>::new(SchedulerConfig::default())?;
        scheduler.add(&noop, 10, 10)?;
        scheduler.start();
        scheduler.on_tick();
        scheduler.stop();
        scheduler.on_tick();
        scheduler.on_tick();
        assert_eq!(scheduler.slot(0).map(|slot| slot.delay), Some(9));
        Ok(())
    }

    #[test]
    fn test_saturation_is_counted() -> TestResult {
        let scheduler = Scheduler::<1>::new(SchedulerConfig::default())?;
        scheduler.add(&noop, 0, 0)?;
        scheduler.start();

        for _ in 0..300 {
            scheduler.on_tick();
        }

        assert_eq!(scheduler.slot(0).map(|slot| slot.runme), Some(u8::MAX));
        assert_eq!(scheduler.counters().snapshot().runme_saturations, 45);
        Ok(())
    }
}
