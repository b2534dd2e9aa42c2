//! Task aggregate.
//!
//! A task is one aggregate root made of two parts:
//!
//! - [`TaskDefinition`]: description, priority, due date, status
//! - [`TaskLabels`]: labels assigned to the task
//!
//! Both parts are handled within the same command, so the labels part reads
//! the definition's current status without any cross-entity coordination.

use crate::config::TodoConfig;
use crate::mismatch::ValueMismatch;
use crate::types::{
    DescriptionChange, DueDateChange, LabelId, PriorityChange, TaskId, TaskStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use todo_list_core::{
    command::Command,
    effect::{Effect, Effects},
    environment::Clock,
    reducer::Reducer,
    smallvec,
    stream::Version,
    Infallible,
};
use todo_list_macros::{Command, Event, State};

/// Task definition part: fields and status
pub mod definition;

/// Named status predicates
pub mod flow;

/// Task labels part
pub mod labels;

/// Status transition table
pub mod transition;

pub use definition::TaskDefinition;
pub use labels::TaskLabels;

/// State of a single task
#[derive(State, Clone, Debug, Default, PartialEq, Eq)]
pub struct Task {
    /// Fields and status
    pub definition: TaskDefinition,
    /// Assigned labels
    pub labels: TaskLabels,
    /// No further changes are accepted
    pub archived: bool,
    /// Marked deleted by the host
    pub deleted: bool,
    /// Number of events applied
    #[version]
    pub version: Version,
}

impl Task {
    /// Whether the task has been created (as a task or a draft)
    #[must_use]
    pub fn exists(&self) -> bool {
        self.definition.status != TaskStatus::Undefined
    }

    /// A deleted draft: archived and deleted, never restorable
    #[must_use]
    pub const fn is_erased(&self) -> bool {
        self.archived && self.deleted
    }

    /// Current status
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.definition.status
    }
}

/// Commands handled by the task aggregate
#[derive(Command, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[command(target = "task_id")]
pub enum TaskCommand {
    /// Create a finalized task with a description
    CreateBasicTask {
        /// Task to create
        task_id: TaskId,
        /// Initial description
        description: String,
    },

    /// Change the description
    UpdateTaskDescription {
        /// Task to update
        task_id: TaskId,
        /// Expected and new description
        description_change: DescriptionChange,
    },

    /// Change the due date
    UpdateTaskDueDate {
        /// Task to update
        task_id: TaskId,
        /// Expected and new due date
        due_date_change: DueDateChange,
    },

    /// Change the priority
    UpdateTaskPriority {
        /// Task to update
        task_id: TaskId,
        /// Expected and new priority
        priority_change: PriorityChange,
    },

    /// Mark a finalized task completed
    CompleteTask {
        /// Task to complete
        task_id: TaskId,
    },

    /// Reopen a completed task
    ReopenTask {
        /// Task to reopen
        task_id: TaskId,
    },

    /// Delete a finalized task or a draft
    DeleteTask {
        /// Task to delete
        task_id: TaskId,
    },

    /// Bring a deleted task back as open
    RestoreDeletedTask {
        /// Task to restore
        task_id: TaskId,
    },

    /// Create an empty draft (used by the task creation wizard)
    CreateDraft {
        /// Draft to create
        task_id: TaskId,
    },

    /// Turn a draft into a finalized task
    FinalizeDraft {
        /// Draft to finalize
        task_id: TaskId,
    },

    /// Assign a label to the task
    AssignLabelToTask {
        /// Task to label
        task_id: TaskId,
        /// Label to assign
        label_id: LabelId,
    },

    /// Remove an assigned label from the task
    RemoveLabelFromTask {
        /// Labelled task
        task_id: TaskId,
        /// Label to remove
        label_id: LabelId,
    },
}

/// Events emitted by the task aggregate
#[derive(Event, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskEvent {
    /// A finalized task was created
    TaskCreated {
        /// Created task
        task_id: TaskId,
        /// Initial description
        description: String,
        /// When the task was created
        created_at: DateTime<Utc>,
    },

    /// An empty draft was created
    TaskDraftCreated {
        /// Created draft
        task_id: TaskId,
        /// When the draft was created
        created_at: DateTime<Utc>,
    },

    /// The description changed
    TaskDescriptionUpdated {
        /// Updated task
        task_id: TaskId,
        /// Previous and new description
        description_change: DescriptionChange,
    },

    /// The due date changed
    TaskDueDateUpdated {
        /// Updated task
        task_id: TaskId,
        /// Previous and new due date
        due_date_change: DueDateChange,
    },

    /// The priority changed
    TaskPriorityUpdated {
        /// Updated task
        task_id: TaskId,
        /// Previous and new priority
        priority_change: PriorityChange,
    },

    /// The task was completed
    TaskCompleted {
        /// Completed task
        task_id: TaskId,
    },

    /// A completed task was reopened
    TaskReopened {
        /// Reopened task
        task_id: TaskId,
    },

    /// The task was deleted
    TaskDeleted {
        /// Deleted task
        task_id: TaskId,
    },

    /// A deleted task was restored as open
    DeletedTaskRestored {
        /// Restored task
        task_id: TaskId,
    },

    /// A draft was finalized
    TaskDraftFinalized {
        /// Finalized task
        task_id: TaskId,
    },

    /// A label was assigned
    LabelAssignedToTask {
        /// Labelled task
        task_id: TaskId,
        /// Assigned label
        label_id: LabelId,
    },

    /// A label was removed
    LabelRemovedFromTask {
        /// Task that lost the label
        task_id: TaskId,
        /// Removed label
        label_id: LabelId,
    },

    /// A restored task still carries this label
    LabelledTaskRestored {
        /// Restored task
        task_id: TaskId,
        /// Label the task carries
        label_id: LabelId,
    },
}

impl TaskEvent {
    /// Task the event belongs to
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        match self {
            Self::TaskCreated { task_id, .. }
            | Self::TaskDraftCreated { task_id, .. }
            | Self::TaskDescriptionUpdated { task_id, .. }
            | Self::TaskDueDateUpdated { task_id, .. }
            | Self::TaskPriorityUpdated { task_id, .. }
            | Self::TaskCompleted { task_id }
            | Self::TaskReopened { task_id }
            | Self::TaskDeleted { task_id }
            | Self::DeletedTaskRestored { task_id }
            | Self::TaskDraftFinalized { task_id }
            | Self::LabelAssignedToTask { task_id, .. }
            | Self::LabelRemovedFromTask { task_id, .. }
            | Self::LabelledTaskRestored { task_id, .. } => task_id,
        }
    }
}

/// Why a field update was refused
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldUpdateFailure {
    /// The task status does not allow the update
    #[error("task status {0:?} does not allow updates")]
    InvalidStatus(TaskStatus),

    /// The expected previous value does not match
    #[error("{0}")]
    Mismatch(ValueMismatch),
}

/// Rejections of task commands
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TaskRejection {
    /// The task was already created
    #[error("Task {task_id} already exists")]
    TaskAlreadyExists {
        /// Existing task
        task_id: TaskId,
    },

    /// The task was never created
    #[error("Task {task_id} not found")]
    TaskNotFound {
        /// Unknown task
        task_id: TaskId,
    },

    /// The task is a deleted draft and accepts no commands
    #[error("Task {task_id} was erased")]
    TaskErased {
        /// Erased task
        task_id: TaskId,
    },

    /// The description is too short
    #[error("Description of task {task_id} has {length} characters, at least {min_length} required")]
    InvalidDescription {
        /// Task the description was meant for
        task_id: TaskId,
        /// Length of the trimmed description
        length: usize,
        /// Configured minimum
        min_length: usize,
    },

    /// `UpdateTaskDescription` was refused
    #[error("Cannot update description of task {task_id}: {reason}")]
    CannotUpdateTaskDescription {
        /// Task to update
        task_id: TaskId,
        /// Why
        reason: FieldUpdateFailure,
    },

    /// `UpdateTaskDueDate` was refused
    #[error("Cannot update due date of task {task_id}: {reason}")]
    CannotUpdateTaskDueDate {
        /// Task to update
        task_id: TaskId,
        /// Why
        reason: FieldUpdateFailure,
    },

    /// `UpdateTaskPriority` was refused
    #[error("Cannot update priority of task {task_id}: {reason}")]
    CannotUpdateTaskPriority {
        /// Task to update
        task_id: TaskId,
        /// Why
        reason: FieldUpdateFailure,
    },

    /// The task cannot move to completed from its status
    #[error("Cannot complete task {task_id} in status {status:?}")]
    CannotCompleteTask {
        /// Task to complete
        task_id: TaskId,
        /// Current status
        status: TaskStatus,
    },

    /// Only completed tasks can be reopened
    #[error("Cannot reopen task {task_id} in status {status:?}")]
    CannotReopenTask {
        /// Task to reopen
        task_id: TaskId,
        /// Current status
        status: TaskStatus,
    },

    /// The task cannot move to deleted from its status
    #[error("Cannot delete task {task_id} in status {status:?}")]
    CannotDeleteTask {
        /// Task to delete
        task_id: TaskId,
        /// Current status
        status: TaskStatus,
    },

    /// Only deleted, non-erased tasks can be restored
    #[error("Cannot restore task {task_id} in status {status:?}")]
    CannotRestoreDeletedTask {
        /// Task to restore
        task_id: TaskId,
        /// Current status
        status: TaskStatus,
    },

    /// Drafts cannot be created over completed or deleted tasks
    #[error("Cannot create draft {task_id} in status {status:?}")]
    CannotCreateDraft {
        /// Draft to create
        task_id: TaskId,
        /// Current status
        status: TaskStatus,
    },

    /// Only drafts can be finalized
    #[error("Cannot finalize draft {task_id} in status {status:?}")]
    CannotFinalizeDraft {
        /// Draft to finalize
        task_id: TaskId,
        /// Current status
        status: TaskStatus,
    },

    /// The task does not accept labels in its status
    #[error("Cannot assign label {label_id} to task {task_id} in status {status:?}")]
    CannotAssignLabelToTask {
        /// Task to label
        task_id: TaskId,
        /// Label to assign
        label_id: LabelId,
        /// Current status
        status: TaskStatus,
    },

    /// The task does not allow removing labels in its status
    #[error("Cannot remove label {label_id} from task {task_id} in status {status:?}")]
    CannotRemoveLabelFromTask {
        /// Labelled task
        task_id: TaskId,
        /// Label to remove
        label_id: LabelId,
        /// Current status
        status: TaskStatus,
    },

    /// The label is not assigned to the task
    #[error("Label {label_id} is not assigned to task {task_id}")]
    LabelNotAssigned {
        /// Task
        task_id: TaskId,
        /// Label that is not assigned
        label_id: LabelId,
    },
}

/// Environment dependencies for the task reducer
#[derive(Clone)]
pub struct TaskEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
    /// Description rules
    pub config: TodoConfig,
}

impl TaskEnvironment {
    /// Creates a new `TaskEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, config: TodoConfig) -> Self {
        Self { clock, config }
    }
}

/// Reducer for the task aggregate
#[derive(Clone, Debug, Default)]
pub struct TaskReducer;

impl TaskReducer {
    /// Creates a new `TaskReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Single-event effects
fn emit(event: TaskEvent) -> Effects<TaskEvent> {
    smallvec![Effect::Emit(event)]
}

/// Reject commands for tasks that were never created
fn ensure_exists(task: &Task, task_id: &TaskId) -> Result<(), TaskRejection> {
    if task.exists() {
        Ok(())
    } else {
        Err(TaskRejection::TaskNotFound {
            task_id: task_id.clone(),
        })
    }
}

impl Reducer for TaskReducer {
    type State = Task;
    type Command = TaskCommand;
    type Event = TaskEvent;
    type Outbound = Infallible;
    type Rejection = TaskRejection;
    type Environment = TaskEnvironment;

    fn handle(
        &self,
        task: &Task,
        command: TaskCommand,
        env: &TaskEnvironment,
    ) -> Result<Effects<TaskEvent>, TaskRejection> {
        if task.is_erased() && !matches!(command, TaskCommand::RestoreDeletedTask { .. }) {
            return Err(TaskRejection::TaskErased {
                task_id: command.target().clone(),
            });
        }

        match command {
            TaskCommand::CreateBasicTask {
                task_id,
                description,
            } => definition::create_basic_task(task, task_id, description, env),
            TaskCommand::UpdateTaskDescription {
                task_id,
                description_change,
            } => definition::update_description(task, task_id, description_change, env),
            TaskCommand::UpdateTaskDueDate {
                task_id,
                due_date_change,
            } => definition::update_due_date(task, task_id, due_date_change),
            TaskCommand::UpdateTaskPriority {
                task_id,
                priority_change,
            } => definition::update_priority(task, task_id, priority_change),
            TaskCommand::CompleteTask { task_id } => definition::complete(task, task_id),
            TaskCommand::ReopenTask { task_id } => definition::reopen(task, task_id),
            TaskCommand::DeleteTask { task_id } => definition::delete(task, task_id),
            TaskCommand::RestoreDeletedTask { task_id } => definition::restore(task, task_id),
            TaskCommand::CreateDraft { task_id } => definition::create_draft(task, task_id, env),
            TaskCommand::FinalizeDraft { task_id } => {
                definition::finalize_draft(task, task_id, env)
            },
            TaskCommand::AssignLabelToTask { task_id, label_id } => {
                labels::assign_label(task, task_id, label_id)
            },
            TaskCommand::RemoveLabelFromTask { task_id, label_id } => {
                labels::remove_label(task, task_id, label_id)
            },
        }
    }

    fn apply(&self, task: Task, event: &TaskEvent) -> Task {
        let erase = matches!(event, TaskEvent::TaskDeleted { .. })
            && task.definition.status == TaskStatus::Draft;

        Task {
            definition: definition::apply(task.definition, event),
            labels: labels::apply(task.labels, event),
            archived: task.archived || erase,
            deleted: task.deleted || erase,
            version: task.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LabelId;
    use todo_list_testing::{ReducerTest, assertions, test_clock};

    pub(crate) fn test_env() -> TaskEnvironment {
        TaskEnvironment::new(Arc::new(test_clock()), TodoConfig::default())
    }

    fn draft_created(task_id: &TaskId) -> TaskEvent {
        TaskEvent::TaskDraftCreated {
            task_id: task_id.clone(),
            created_at: test_clock().now(),
        }
    }

    #[test]
    fn deleting_a_draft_erases_it() {
        let task_id = TaskId::new();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![draft_created(&task_id)])
            .when_command(TaskCommand::DeleteTask {
                task_id: task_id.clone(),
            })
            .then_state(|task| {
                assert_eq!(task.status(), TaskStatus::Deleted);
                assert!(task.archived);
                assert!(task.deleted);
                assert!(task.is_erased());
            })
            .run();
    }

    #[test]
    fn erased_task_rejects_everything_but_restore() {
        let task_id = TaskId::new();
        let rejected = task_id.clone();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![
                draft_created(&task_id),
                TaskEvent::TaskDeleted {
                    task_id: task_id.clone(),
                },
            ])
            .when_command(TaskCommand::AssignLabelToTask {
                task_id: task_id.clone(),
                label_id: LabelId::new(),
            })
            .then_rejection(move |rejection| {
                assert_eq!(
                    rejection,
                    &TaskRejection::TaskErased { task_id: rejected }
                );
            })
            .run();
    }

    #[test]
    fn restoring_an_erased_task_is_rejected() {
        let task_id = TaskId::new();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![
                draft_created(&task_id),
                TaskEvent::TaskDeleted {
                    task_id: task_id.clone(),
                },
            ])
            .when_command(TaskCommand::RestoreDeletedTask {
                task_id: task_id.clone(),
            })
            .then_rejection(|rejection| {
                assert!(matches!(
                    rejection,
                    TaskRejection::CannotRestoreDeletedTask {
                        status: TaskStatus::Deleted,
                        ..
                    }
                ));
            })
            .then_events(assertions::assert_no_events)
            .run();
    }

    #[test]
    fn event_task_id() {
        let task_id = TaskId::new();
        let event = TaskEvent::LabelledTaskRestored {
            task_id: task_id.clone(),
            label_id: LabelId::new(),
        };
        assert_eq!(event.task_id(), &task_id);
    }

    #[test]
    fn rejection_messages_carry_context() {
        let task_id = TaskId::from_uuid(uuid::Uuid::from_u128(1));
        let rejection = TaskRejection::CannotCompleteTask {
            task_id,
            status: TaskStatus::Draft,
        };
        assert_eq!(
            rejection.to_string(),
            "Cannot complete task 00000000-0000-0000-0000-000000000001 in status Draft"
        );
    }
}
