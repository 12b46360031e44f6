//! Integration tests for the scheduler crate.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use tasktick_scheduler::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn counter_task(counter: &AtomicU32) -> impl Fn() + Sync + '_ {
    move || {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

fn noop() {}

#[test]
fn test_three_periodic_tasks_over_sixty_ticks() -> TestResult {
    let a_runs = AtomicU32::new(0);
    let b_runs = AtomicU32::new(0);
    let c_runs = AtomicU32::new(0);
    let a = counter_task(&a_runs);
    let b = counter_task(&b_runs);
    let c = counter_task(&c_runs);

    let scheduler = Scheduler::<4>::new(SchedulerConfig::default())?;
    scheduler.add(&a, 0, 10)?;
    scheduler.add(&b, 0, 20)?;
    scheduler.add(&c, 0, 30)?;
    scheduler.start();

    for _ in 0..60 {
        scheduler.on_tick();
        scheduler.dispatch();
    }

    assert_eq!(a_runs.load(Ordering::Relaxed), 6);
    assert_eq!(b_runs.load(Ordering::Relaxed), 3);
    assert_eq!(c_runs.load(Ordering::Relaxed), 2);
    assert_eq!(scheduler.counters().dispatches(), 11);
    Ok(())
}

#[test]
fn test_indices_unique_until_full() -> TestResult {
    let scheduler = Scheduler::<DEFAULT_CAPACITY>::new(SchedulerConfig::default())?;

    let mut seen = Vec::new();
    for _ in 0..DEFAULT_CAPACITY {
        let id = scheduler.add(&noop, 1, 1)?;
        assert!(id.index() < DEFAULT_CAPACITY);
        assert!(!seen.contains(&id.index()));
        seen.push(id.index());
    }

    let before = scheduler.snapshot();
    assert_eq!(
        scheduler.add(&noop, 0, 0),
        Err(SchedulerError::TableFull {
            capacity: DEFAULT_CAPACITY
        })
    );
    assert_eq!(scheduler.snapshot(), before);
    Ok(())
}

#[test]
fn test_one_shot_after_delay() -> TestResult {
    let runs = AtomicU32::new(0);
    let task = counter_task(&runs);
    let scheduler = Scheduler::<2>::new(SchedulerConfig::default())?;
    scheduler.add(&task, 3, 0)?;
    scheduler.start();

    let mut fired_at = Vec::new();
    for tick in 1..=10u32 {
        scheduler.on_tick();
        if scheduler.dispatch() > 0 {
            fired_at.push(tick);
        }
    }

    assert_eq!(fired_at, vec![4]);
    assert_eq!(runs.load(Ordering::Relaxed), 1);
    assert!(scheduler.is_empty());
    Ok(())
}

#[test]
fn test_tasks_added_before_start_share_phase() -> TestResult {
    let first = AtomicU32::new(0);
    let second = AtomicU32::new(0);
    let first_task = counter_task(&first);
    let second_task = counter_task(&second);

    let scheduler = Scheduler::<2>::new(SchedulerConfig::default())?;
    scheduler.add(&first_task, 0, 5)?;
    // Ticks before start do not count, so registration order does not skew phase.
    scheduler.on_tick();
    scheduler.on_tick();
    scheduler.add(&second_task, 0, 5)?;
    scheduler.start();

    for _ in 0..5 {
        scheduler.on_tick();
        scheduler.dispatch();
        assert_eq!(
            first.load(Ordering::Relaxed),
            second.load(Ordering::Relaxed)
        );
    }
    assert_eq!(first.load(Ordering::Relaxed), 1);
    Ok(())
}

#[test]
fn test_dispatch_runs_in_slot_order() -> TestResult {
    let order = parking_lot::Mutex::new(Vec::new());
    let log = |tag: u8| {
        let order = &order;
        move || order.lock().push(tag)
    };
    let t0 = log(0);
    let t1 = log(1);
    let t2 = log(2);

    let scheduler = Scheduler::<3>::new(SchedulerConfig::default())?;
    scheduler.add(&t0, 0, 1)?;
    scheduler.add(&t1, 0, 1)?;
    scheduler.add(&t2, 0, 1)?;
    scheduler.remove_at(1)?;
    scheduler.add(&t1, 0, 1)?;
    scheduler.start();

    scheduler.on_tick();
    assert_eq!(scheduler.dispatch(), 3);
    assert_eq!(*order.lock(), vec![0, 1, 2]);
    Ok(())
}

static SELF_REMOVING: OnceLock<Scheduler<'static, 2>> = OnceLock::new();
static SELF_REMOVING_RUNS: AtomicU32 = AtomicU32::new(0);

fn remove_self() {
    SELF_REMOVING_RUNS.fetch_add(1, Ordering::Relaxed);
    if let Some(scheduler) = SELF_REMOVING.get() {
        // Removing the running task must not disturb the dispatcher.
        let _removed = scheduler.remove_at(0).is_ok();
    }
}

#[test]
fn test_task_removing_itself_mid_dispatch() -> TestResult {
    let scheduler = static_scheduler(&SELF_REMOVING)?;
    scheduler.add(&remove_self, 0, 1)?;
    scheduler.start();

    for _ in 0..5 {
        scheduler.on_tick();
        scheduler.dispatch();
    }

    assert_eq!(SELF_REMOVING_RUNS.load(Ordering::Relaxed), 1);
    assert!(scheduler.is_empty());
    assert_eq!(scheduler.counters().snapshot().removals, 1);
    assert_eq!(scheduler.counters().snapshot().one_shot_reclaims, 0);
    Ok(())
}

static CHAINING: OnceLock<Scheduler<'static, 3>> = OnceLock::new();
static CHAINED_RUNS: AtomicU32 = AtomicU32::new(0);

fn chained() {
    CHAINED_RUNS.fetch_add(1, Ordering::Relaxed);
}

fn schedule_follow_up() {
    if let Some(scheduler) = CHAINING.get() {
        let _added = scheduler.add(&chained, 2, 0).is_ok();
    }
}

#[test]
fn test_one_shot_registers_follow_up() -> TestResult {
    let scheduler = static_scheduler(&CHAINING)?;
    scheduler.add(&schedule_follow_up, 0, 0)?;
    scheduler.start();

    // Tick 1: trigger fires, reclaims slot 0 and the follow-up takes slot 1.
    scheduler.on_tick();
    assert_eq!(scheduler.dispatch(), 1);
    assert_eq!(scheduler.len(), 1);
    assert!(scheduler.slot(1).is_some_and(|slot| slot.active));

    // Follow-up has delay 2: ready on the third tick after registration.
    for _ in 0..2 {
        scheduler.on_tick();
        assert_eq!(scheduler.dispatch(), 0);
    }
    scheduler.on_tick();
    assert_eq!(scheduler.dispatch(), 1);
    assert_eq!(CHAINED_RUNS.load(Ordering::Relaxed), 1);
    assert!(scheduler.is_empty());
    Ok(())
}

static INTERLEAVED: OnceLock<Scheduler<'static, 4>> = OnceLock::new();

fn tick_mid_pass() {
    // Stands in for the timer interrupt firing while the dispatcher is busy.
    if let Some(scheduler) = INTERLEAVED.get() {
        scheduler.on_tick();
    }
}

fn assert_slots_consistent(slots: &[SlotSnapshot]) {
    for slot in slots {
        if !slot.active {
            assert_eq!((slot.delay, slot.period, slot.runme), (0, 0, 0));
        } else if slot.period == 0 && slot.runme > 0 {
            assert_eq!(slot.delay, 0, "ready one-shot with stale delay: {slot:?}");
        }
    }
}

#[test]
fn test_tick_between_dispatch_halves_keeps_slots_consistent() -> TestResult {
    let scheduler = static_scheduler(&INTERLEAVED)?;
    scheduler.add(&tick_mid_pass, 0, 1)?;
    scheduler.add(&noop, 0, 0)?;
    scheduler.add(&noop, 1, 3)?;
    scheduler.add(&noop, 0, 0)?;
    scheduler.start();

    scheduler.on_tick();
    for _ in 0..20 {
        // First half of the pass, then an explicit tick, then the second half.
        scheduler.dispatch_slot(0);
        scheduler.dispatch_slot(1);
        scheduler.on_tick();
        assert_slots_consistent(&scheduler.snapshot());
        scheduler.dispatch_slot(2);
        scheduler.dispatch_slot(3);
        assert_slots_consistent(&scheduler.snapshot());
    }

    // Both one-shots ran exactly once and were reclaimed.
    assert_eq!(scheduler.counters().snapshot().one_shot_reclaims, 2);
    assert_eq!(scheduler.len(), 2);
    Ok(())
}

#[test]
fn test_counters_track_lifecycle() -> TestResult {
    let scheduler = Scheduler::<1>::new(SchedulerConfig::default())?;
    let id = scheduler.add(&noop, 0, 0)?;
    assert!(scheduler.add(&noop, 0, 0).is_err());
    scheduler.on_tick();
    scheduler.start();
    scheduler.on_tick();
    scheduler.dispatch();
    assert!(scheduler.remove(id).is_err());

    let snapshot = scheduler.counters().snapshot();
    assert_eq!(snapshot.registrations, 1);
    assert_eq!(snapshot.table_full_rejections, 1);
    assert_eq!(snapshot.ignored_ticks, 1);
    assert_eq!(snapshot.ticks, 1);
    assert_eq!(snapshot.dispatches, 1);
    assert_eq!(snapshot.one_shot_reclaims, 1);
    assert_eq!(snapshot.removals, 0);
    Ok(())
}

fn static_scheduler<const N: usize>(
    cell: &'static OnceLock<Scheduler<'static, N>>,
) -> Result<&'static Scheduler<'static, N>, SchedulerError> {
    if let Some(scheduler) = cell.get() {
        return Ok(scheduler);
    }
    let scheduler = Scheduler::new(SchedulerConfig::default())?;
    Ok(cell.get_or_init(|| scheduler))
}
