//! Task status transition table.
//!
//! The complete set of legal `(from, to)` status changes is fixed. Anything
//! not listed, self-transitions and transitions out of `Undefined` included,
//! is illegal. Creating a task sets its status directly and never goes
//! through this table.

use crate::types::TaskStatus;

/// A status change `from -> to`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaskStatusTransition {
    /// Current status
    pub from: TaskStatus,
    /// Proposed status
    pub to: TaskStatus,
}

impl TaskStatusTransition {
    /// Create a transition
    #[must_use]
    pub const fn new(from: TaskStatus, to: TaskStatus) -> Self {
        Self { from, to }
    }

    /// Whether this transition is in [`ALLOWED_TRANSITIONS`]
    #[must_use]
    pub fn is_allowed(self) -> bool {
        ALLOWED_TRANSITIONS.contains(&self)
    }
}

/// Every legal status transition
pub const ALLOWED_TRANSITIONS: [TaskStatusTransition; 6] = [
    TaskStatusTransition::new(TaskStatus::Draft, TaskStatus::Finalized),
    TaskStatusTransition::new(TaskStatus::Finalized, TaskStatus::Completed),
    TaskStatusTransition::new(TaskStatus::Completed, TaskStatus::Open),
    TaskStatusTransition::new(TaskStatus::Finalized, TaskStatus::Deleted),
    TaskStatusTransition::new(TaskStatus::Draft, TaskStatus::Deleted),
    TaskStatusTransition::new(TaskStatus::Deleted, TaskStatus::Open),
];

/// Whether a task in `current` status may move to `proposed`
#[must_use]
pub fn is_valid_transition(current: TaskStatus, proposed: TaskStatus) -> bool {
    TaskStatusTransition::new(current, proposed).is_allowed()
}
