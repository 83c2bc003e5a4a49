//! Task state transitions for `taskdeck`.
//!
//! Every change to the tracker state is expressed as an [`Intent`] and
//! applied by the pure [`transition`] function. Nothing else mutates a
//! [`TasksState`](taskdeck_model::TasksState).

pub mod intent;
pub mod transition;

pub use intent::Intent;
pub use transition::transition;

use thiserror::Error;

/// Errors raised while validating a user request, before any intent is issued.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Task name is empty after trimming.
    #[error("task name cannot be empty")]
    NameEmpty,
    /// Tag name is empty after trimming.
    #[error("tag name cannot be empty")]
    TagNameEmpty,
    /// Priority outside the 1-5 scale.
    #[error("invalid priority {0} (expected 1-5)")]
    InvalidPriority(u8),
    /// Task with the given ID was not found.
    #[error("task not found: {0}")]
    TaskNotFound(String),
    /// Tag with the given ID was not found.
    #[error("tag not found: {0}")]
    TagNotFound(String),
    /// A reorder referenced an index outside the displayed list.
    #[error("position {index} out of range for {len} displayed tasks")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Length of the displayed list.
        len: usize,
    },
}
