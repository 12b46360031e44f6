//! Scheduled callbacks and the handles returned when registering them.

use core::fmt;

/// A procedure the scheduler can run.
///
/// Tasks take no arguments and return nothing. The dispatcher calls
/// [`Task::run`] synchronously and nothing else is dispatched until it
/// returns, so a task must finish well within one tick interval.
///
/// Any `Fn() + Sync` closure or function is a `Task`:
///
/// ```rust
/// use tasktick_scheduler::Task;
///
/// fn sample_sensors() {}
///
/// let task: &dyn Task = &sample_sensors;
/// task.run();
/// ```
pub trait Task: Sync {
    /// Run the task to completion.
    fn run(&self);
}

impl<F> Task for F
where
    F: Fn() + Sync,
{
    #[inline]
    fn run(&self) {
        self()
    }
}

/// Handle to a registered task.
///
/// The index is stable for as long as the task stays registered. The
/// generation changes whenever the slot is vacated, so a handle kept past its
/// task's removal is rejected instead of hitting whichever task reused the
/// slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    index: usize,
    generation: u32,
}

impl TaskId {
    pub(crate) const fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the task table.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Slot generation at registration time.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}.{}", self.index, self.generation)
    }
}
