//! Error types for the scheduler crate.
//!
//! Every variant is `Copy` so errors can be produced from the mainline
//! without allocating. The tick handler and dispatcher never return errors;
//! only registration, removal and configuration do.

use core::fmt;

use thiserror::Error;

/// Why an index-addressed operation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidIndexReason {
    /// The index is not inside the task table.
    OutOfBounds,
    /// The slot at the index holds no task.
    Vacant,
    /// The slot was vacated and possibly reused since the handle was issued.
    Stale,
}

impl fmt::Display for InvalidIndexReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "index out of bounds"),
            Self::Vacant => write!(f, "slot is vacant"),
            Self::Stale => write!(f, "handle is stale"),
        }
    }
}

/// Errors reported by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Registration found no empty slot. The table was left unchanged.
    #[error("task table full: all {capacity} slots are in use")]
    TableFull {
        /// Table capacity, which is never a valid slot index.
        capacity: usize,
    },

    /// An index-addressed operation named a slot it may not touch.
    #[error("invalid task index {index}: {reason}")]
    InvalidIndex {
        /// The rejected slot index.
        index: usize,
        /// Why the index was rejected.
        reason: InvalidIndexReason,
    },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl SchedulerError {
    /// Create a table full error.
    #[must_use]
    pub const fn table_full(capacity: usize) -> Self {
        Self::TableFull { capacity }
    }

    /// Create an invalid index error.
    #[must_use]
    pub const fn invalid_index(index: usize, reason: InvalidIndexReason) -> Self {
        Self::InvalidIndex { index, reason }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub const fn invalid_config(reason: &'static str) -> Self {
        Self::InvalidConfig(reason)
    }

    /// Whether the caller can reasonably retry the operation later.
    ///
    /// A full table frees up as tasks are removed or one-shots complete;
    /// bad indices and bad configuration never fix themselves.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::TableFull { .. })
    }
}

/// A specialized `Result` type for scheduler operations.
pub type SchedulerResult<T = ()> = Result<T, SchedulerError>;
