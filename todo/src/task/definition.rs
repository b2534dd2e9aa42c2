//! Task definition part.
//!
//! Owns the description, priority, due date and status of a task and the
//! lifecycle commands that move the status through the transition table.

use super::{
    Task, TaskEnvironment, TaskEvent, TaskRejection, emit, ensure_exists, FieldUpdateFailure,
    flow, transition::is_valid_transition,
};
use crate::config::TodoConfig;
use crate::mismatch::check_change;
use crate::types::{
    DescriptionChange, DueDateChange, PriorityChange, TaskId, TaskPriority, TaskStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use todo_list_core::effect::{Effect, Effects};

/// Fields and status of a task
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Task identifier, set on creation
    pub id: Option<TaskId>,
    /// What needs to be done
    pub description: String,
    /// Priority
    pub priority: TaskPriority,
    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
    /// Lifecycle status
    pub status: TaskStatus,
    /// When the task (or draft) was created
    pub created_at: Option<DateTime<Utc>>,
}

fn validate_description(
    task_id: &TaskId,
    description: &str,
    config: &TodoConfig,
) -> Result<(), TaskRejection> {
    let length = description.trim().chars().count();
    if length < config.min_description_length {
        return Err(TaskRejection::InvalidDescription {
            task_id: task_id.clone(),
            length,
            min_length: config.min_description_length,
        });
    }
    Ok(())
}

pub(super) fn create_basic_task(
    task: &Task,
    task_id: TaskId,
    description: String,
    env: &TaskEnvironment,
) -> Result<Effects<TaskEvent>, TaskRejection> {
    if task.exists() {
        return Err(TaskRejection::TaskAlreadyExists { task_id });
    }
    validate_description(&task_id, &description, &env.config)?;

    Ok(emit(TaskEvent::TaskCreated {
        task_id,
        description,
        created_at: env.clock.now(),
    }))
}

pub(super) fn create_draft(
    task: &Task,
    task_id: TaskId,
    env: &TaskEnvironment,
) -> Result<Effects<TaskEvent>, TaskRejection> {
    let status = task.status();
    if !flow::is_valid_create_draft_command(status) {
        return Err(TaskRejection::CannotCreateDraft { task_id, status });
    }
    if task.exists() {
        return Err(TaskRejection::TaskAlreadyExists { task_id });
    }

    Ok(emit(TaskEvent::TaskDraftCreated {
        task_id,
        created_at: env.clock.now(),
    }))
}

pub(super) fn update_description(
    task: &Task,
    task_id: TaskId,
    description_change: DescriptionChange,
    env: &TaskEnvironment,
) -> Result<Effects<TaskEvent>, TaskRejection> {
    ensure_exists(task, &task_id)?;

    let status = task.status();
    if !flow::ensure_neither_completed_nor_deleted(status) {
        return Err(TaskRejection::CannotUpdateTaskDescription {
            task_id,
            reason: FieldUpdateFailure::InvalidStatus(status),
        });
    }
    validate_description(&task_id, &description_change.new_value, &env.config)?;

    if let Err(mismatch) = check_change(
        &description_change,
        &task.definition.description,
        task.version,
    ) {
        return Err(TaskRejection::CannotUpdateTaskDescription {
            task_id,
            reason: FieldUpdateFailure::Mismatch(mismatch),
        });
    }

    Ok(emit(TaskEvent::TaskDescriptionUpdated {
        task_id,
        description_change,
    }))
}

pub(super) fn update_due_date(
    task: &Task,
    task_id: TaskId,
    due_date_change: DueDateChange,
) -> Result<Effects<TaskEvent>, TaskRejection> {
    ensure_exists(task, &task_id)?;

    let status = task.status();
    if !flow::is_valid_update_task_due_date_command(status) {
        return Err(TaskRejection::CannotUpdateTaskDueDate {
            task_id,
            reason: FieldUpdateFailure::InvalidStatus(status),
        });
    }

    if let Err(mismatch) = check_change(&due_date_change, &task.definition.due_date, task.version)
    {
        return Err(TaskRejection::CannotUpdateTaskDueDate {
            task_id,
            reason: FieldUpdateFailure::Mismatch(mismatch),
        });
    }

    Ok(emit(TaskEvent::TaskDueDateUpdated {
        task_id,
        due_date_change,
    }))
}

pub(super) fn update_priority(
    task: &Task,
    task_id: TaskId,
    priority_change: PriorityChange,
) -> Result<Effects<TaskEvent>, TaskRejection> {
    ensure_exists(task, &task_id)?;

    let status = task.status();
    if !flow::is_valid_update_task_priority_command(status) {
        return Err(TaskRejection::CannotUpdateTaskPriority {
            task_id,
            reason: FieldUpdateFailure::InvalidStatus(status),
        });
    }

    if let Err(mismatch) = check_change(&priority_change, &task.definition.priority, task.version)
    {
        return Err(TaskRejection::CannotUpdateTaskPriority {
            task_id,
            reason: FieldUpdateFailure::Mismatch(mismatch),
        });
    }

    Ok(emit(TaskEvent::TaskPriorityUpdated {
        task_id,
        priority_change,
    }))
}

pub(super) fn complete(task: &Task, task_id: TaskId) -> Result<Effects<TaskEvent>, TaskRejection> {
    ensure_exists(task, &task_id)?;

    let status = task.status();
    if !is_valid_transition(status, TaskStatus::Completed) {
        return Err(TaskRejection::CannotCompleteTask { task_id, status });
    }

    Ok(emit(TaskEvent::TaskCompleted { task_id }))
}

pub(super) fn reopen(task: &Task, task_id: TaskId) -> Result<Effects<TaskEvent>, TaskRejection> {
    ensure_exists(task, &task_id)?;

    let status = task.status();
    if !flow::ensure_completed(status) || !is_valid_transition(status, TaskStatus::Open) {
        return Err(TaskRejection::CannotReopenTask { task_id, status });
    }

    Ok(emit(TaskEvent::TaskReopened { task_id }))
}

pub(super) fn delete(task: &Task, task_id: TaskId) -> Result<Effects<TaskEvent>, TaskRejection> {
    ensure_exists(task, &task_id)?;

    let status = task.status();
    if !is_valid_transition(status, TaskStatus::Deleted) {
        return Err(TaskRejection::CannotDeleteTask { task_id, status });
    }

    Ok(emit(TaskEvent::TaskDeleted { task_id }))
}

/// Restores the task and re-announces every label it still carries
pub(super) fn restore(task: &Task, task_id: TaskId) -> Result<Effects<TaskEvent>, TaskRejection> {
    ensure_exists(task, &task_id)?;

    let status = task.status();
    if !flow::ensure_deleted(status)
        || task.is_erased()
        || !is_valid_transition(status, TaskStatus::Open)
    {
        return Err(TaskRejection::CannotRestoreDeletedTask { task_id, status });
    }

    let mut effects = emit(TaskEvent::DeletedTaskRestored {
        task_id: task_id.clone(),
    });
    effects.extend(task.labels.label_ids.iter().map(|label_id| {
        Effect::Emit(TaskEvent::LabelledTaskRestored {
            task_id: task_id.clone(),
            label_id: label_id.clone(),
        })
    }));

    Ok(effects)
}

pub(super) fn finalize_draft(
    task: &Task,
    task_id: TaskId,
    env: &TaskEnvironment,
) -> Result<Effects<TaskEvent>, TaskRejection> {
    ensure_exists(task, &task_id)?;

    let status = task.status();
    if !is_valid_transition(status, TaskStatus::Finalized) {
        return Err(TaskRejection::CannotFinalizeDraft { task_id, status });
    }
    // A finalized task meets the same rules as one created directly
    validate_description(&task_id, &task.definition.description, &env.config)?;

    Ok(emit(TaskEvent::TaskDraftFinalized { task_id }))
}

/// Fold an event into the definition part
pub(super) fn apply(definition: TaskDefinition, event: &TaskEvent) -> TaskDefinition {
    match event {
        TaskEvent::TaskCreated {
            task_id,
            description,
            created_at,
        } => TaskDefinition {
            id: Some(task_id.clone()),
            description: description.clone(),
            status: TaskStatus::Finalized,
            created_at: Some(*created_at),
            ..definition
        },
        TaskEvent::TaskDraftCreated {
            task_id,
            created_at,
        } => TaskDefinition {
            id: Some(task_id.clone()),
            status: TaskStatus::Draft,
            created_at: Some(*created_at),
            ..definition
        },
        TaskEvent::TaskDescriptionUpdated {
            description_change,
            ..
        } => TaskDefinition {
            description: description_change.new_value.clone(),
            ..definition
        },
        TaskEvent::TaskDueDateUpdated {
            due_date_change, ..
        } => TaskDefinition {
            due_date: due_date_change.new_value,
            ..definition
        },
        TaskEvent::TaskPriorityUpdated {
            priority_change, ..
        } => TaskDefinition {
            priority: priority_change.new_value,
            ..definition
        },
        TaskEvent::TaskCompleted { .. } => with_status(definition, TaskStatus::Completed),
        TaskEvent::TaskReopened { .. } | TaskEvent::DeletedTaskRestored { .. } => {
            with_status(definition, TaskStatus::Open)
        },
        TaskEvent::TaskDeleted { .. } => with_status(definition, TaskStatus::Deleted),
        TaskEvent::TaskDraftFinalized { .. } => with_status(definition, TaskStatus::Finalized),
        // Labels part events
        TaskEvent::LabelAssignedToTask { .. }
        | TaskEvent::LabelRemovedFromTask { .. }
        | TaskEvent::LabelledTaskRestored { .. } => definition,
    }
}

fn with_status(definition: TaskDefinition, status: TaskStatus) -> TaskDefinition {
    TaskDefinition {
        status,
        ..definition
    }
}

#[cfg(test)]
#[allow(clippy::panic)] // Test code
mod tests {
    use super::super::tests::test_env;
    use super::super::{TaskCommand, TaskReducer};
    use super::*;
    use crate::mismatch::PackedValue;
    use crate::types::{LabelId, ValueChange};
    use chrono::TimeZone;
    use todo_list_core::{environment::Clock, reducer::Reducer, stream::Version};
    use todo_list_testing::{ReducerTest, assertions, test_clock};

    fn created(task_id: &TaskId, description: &str) -> TaskEvent {
        TaskEvent::TaskCreated {
            task_id: task_id.clone(),
            description: description.to_string(),
            created_at: test_clock().now(),
        }
    }

    #[test]
    fn create_basic_task_finalizes() {
        let task_id = TaskId::new();
        let expected_id = task_id.clone();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .when_command(TaskCommand::CreateBasicTask {
                task_id: task_id.clone(),
                description: "Buy milk".to_string(),
            })
            .then_state(move |task| {
                assert_eq!(task.definition.id, Some(expected_id));
                assert_eq!(task.definition.description, "Buy milk");
                assert_eq!(task.status(), TaskStatus::Finalized);
                assert_eq!(task.definition.created_at, Some(test_clock().now()));
            })
            .then_events(|events| assertions::assert_events_count(events, 1))
            .then_outbound(assertions::assert_no_outbound)
            .run();
    }

    #[test]
    fn create_basic_task_twice_is_rejected() {
        let task_id = TaskId::new();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![created(&task_id, "Buy milk")])
            .when_command(TaskCommand::CreateBasicTask {
                task_id: task_id.clone(),
                description: "Buy bread".to_string(),
            })
            .then_rejection(|rejection| {
                assert!(matches!(rejection, TaskRejection::TaskAlreadyExists { .. }));
            })
            .run();
    }

    #[test]
    fn short_description_is_rejected() {
        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .when_command(TaskCommand::CreateBasicTask {
                task_id: TaskId::new(),
                description: "  a ".to_string(),
            })
            .then_rejection(|rejection| {
                assert!(matches!(
                    rejection,
                    TaskRejection::InvalidDescription {
                        length: 1,
                        min_length: 3,
                        ..
                    }
                ));
            })
            .then_state(|task| assert!(!task.exists()))
            .run();
    }

    #[test]
    fn description_update_with_matching_previous_value() {
        let task_id = TaskId::new();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![created(&task_id, "Buy milk")])
            .when_command(TaskCommand::UpdateTaskDescription {
                task_id: task_id.clone(),
                description_change: ValueChange::new(
                    "Buy milk".to_string(),
                    "Buy oat milk".to_string(),
                ),
            })
            .then_state(|task| assert_eq!(task.definition.description, "Buy oat milk"))
            .run();
    }

    #[test]
    fn description_update_with_stale_previous_value() {
        let task_id = TaskId::new();
        let given = Task {
            version: Version::new(4),
            ..TaskReducer::new().apply(Task::default(), &created(&task_id, "Buy bread"))
        };

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_state(given)
            .when_command(TaskCommand::UpdateTaskDescription {
                task_id: task_id.clone(),
                description_change: ValueChange::new(
                    "Buy milk".to_string(),
                    "Buy oat milk".to_string(),
                ),
            })
            .then_rejection(|rejection| {
                let TaskRejection::CannotUpdateTaskDescription {
                    reason: FieldUpdateFailure::Mismatch(mismatch),
                    ..
                } = rejection
                else {
                    panic!("unexpected rejection {rejection:?}");
                };
                assert_eq!(mismatch.expected, PackedValue::Text("Buy milk".to_string()));
                assert_eq!(mismatch.actual, PackedValue::Text("Buy bread".to_string()));
                assert_eq!(
                    mismatch.new_value,
                    PackedValue::Text("Buy oat milk".to_string())
                );
                assert_eq!(mismatch.version, Version::new(4));
            })
            .then_state(|task| assert_eq!(task.definition.description, "Buy bread"))
            .run();
    }

    #[test]
    fn completed_task_fields_are_frozen() {
        let task_id = TaskId::new();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![
                created(&task_id, "Buy milk"),
                TaskEvent::TaskCompleted {
                    task_id: task_id.clone(),
                },
            ])
            .when_command(TaskCommand::UpdateTaskPriority {
                task_id: task_id.clone(),
                priority_change: ValueChange::new(TaskPriority::Undefined, TaskPriority::High),
            })
            .then_rejection(|rejection| {
                assert!(matches!(
                    rejection,
                    TaskRejection::CannotUpdateTaskPriority {
                        reason: FieldUpdateFailure::InvalidStatus(TaskStatus::Completed),
                        ..
                    }
                ));
            })
            .run();
    }

    #[test]
    fn due_date_update() {
        let task_id = TaskId::new();
        let due = test_clock().now() + chrono::Duration::days(2);

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![created(&task_id, "Pay rent")])
            .when_command(TaskCommand::UpdateTaskDueDate {
                task_id: task_id.clone(),
                due_date_change: ValueChange::new(None, Some(due)),
            })
            .then_state(move |task| assert_eq!(task.definition.due_date, Some(due)))
            .run();
    }

    #[test]
    fn due_date_mismatch() {
        let task_id = TaskId::new();
        let due = test_clock().now();
        let stale = chrono::Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![
                created(&task_id, "Pay rent"),
                TaskEvent::TaskDueDateUpdated {
                    task_id: task_id.clone(),
                    due_date_change: ValueChange::new(None, Some(due)),
                },
            ])
            .when_command(TaskCommand::UpdateTaskDueDate {
                task_id: task_id.clone(),
                due_date_change: ValueChange::new(stale, None),
            })
            .then_rejection(move |rejection| {
                assert!(matches!(
                    rejection,
                    TaskRejection::CannotUpdateTaskDueDate {
                        reason: FieldUpdateFailure::Mismatch(mismatch),
                        ..
                    } if mismatch.actual == PackedValue::Timestamp(Some(due))
                ));
            })
            .run();
    }

    #[test]
    fn complete_then_reopen() {
        let task_id = TaskId::new();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![
                created(&task_id, "Buy milk"),
                TaskEvent::TaskCompleted {
                    task_id: task_id.clone(),
                },
            ])
            .when_command(TaskCommand::ReopenTask {
                task_id: task_id.clone(),
            })
            .then_state(|task| assert_eq!(task.status(), TaskStatus::Open))
            .run();
    }

    #[test]
    fn reopen_requires_completed() {
        let task_id = TaskId::new();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![created(&task_id, "Buy milk")])
            .when_command(TaskCommand::ReopenTask {
                task_id: task_id.clone(),
            })
            .then_rejection(|rejection| {
                assert!(matches!(
                    rejection,
                    TaskRejection::CannotReopenTask {
                        status: TaskStatus::Finalized,
                        ..
                    }
                ));
            })
            .run();
    }

    #[test]
    fn completing_a_draft_is_rejected() {
        let task_id = TaskId::new();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![TaskEvent::TaskDraftCreated {
                task_id: task_id.clone(),
                created_at: test_clock().now(),
            }])
            .when_command(TaskCommand::CompleteTask {
                task_id: task_id.clone(),
            })
            .then_rejection(|rejection| {
                assert!(matches!(
                    rejection,
                    TaskRejection::CannotCompleteTask {
                        status: TaskStatus::Draft,
                        ..
                    }
                ));
            })
            .run();
    }

    #[test]
    fn unknown_task_is_not_found() {
        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .when_command(TaskCommand::CompleteTask {
                task_id: TaskId::new(),
            })
            .then_rejection(|rejection| {
                assert!(matches!(rejection, TaskRejection::TaskNotFound { .. }));
            })
            .run();
    }

    #[test]
    fn restore_announces_labels() {
        let task_id = TaskId::new();
        let label_id = LabelId::new();
        let expected = vec![
            TaskEvent::DeletedTaskRestored {
                task_id: task_id.clone(),
            },
            TaskEvent::LabelledTaskRestored {
                task_id: task_id.clone(),
                label_id: label_id.clone(),
            },
        ];

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![
                created(&task_id, "Buy milk"),
                TaskEvent::LabelAssignedToTask {
                    task_id: task_id.clone(),
                    label_id: label_id.clone(),
                },
                TaskEvent::TaskDeleted {
                    task_id: task_id.clone(),
                },
            ])
            .when_command(TaskCommand::RestoreDeletedTask {
                task_id: task_id.clone(),
            })
            .then_events(move |events| assert_eq!(events, expected.as_slice()))
            .then_state(|task| {
                assert_eq!(task.status(), TaskStatus::Open);
                assert!(!task.deleted);
            })
            .run();
    }

    #[test]
    fn restore_requires_deleted() {
        let task_id = TaskId::new();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![created(&task_id, "Buy milk")])
            .when_command(TaskCommand::RestoreDeletedTask {
                task_id: task_id.clone(),
            })
            .then_rejection(|rejection| {
                assert!(matches!(
                    rejection,
                    TaskRejection::CannotRestoreDeletedTask { .. }
                ));
            })
            .run();
    }

    #[test]
    fn draft_lifecycle() {
        let task_id = TaskId::new();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![
                TaskEvent::TaskDraftCreated {
                    task_id: task_id.clone(),
                    created_at: test_clock().now(),
                },
                TaskEvent::TaskDescriptionUpdated {
                    task_id: task_id.clone(),
                    description_change: DescriptionChange::new(String::new(), "Plan trip".to_string()),
                },
            ])
            .when_command(TaskCommand::FinalizeDraft {
                task_id: task_id.clone(),
            })
            .then_state(|task| {
                assert_eq!(task.status(), TaskStatus::Finalized);
                assert!(!task.archived);
            })
            .run();
    }

    #[test]
    fn draft_without_description_cannot_be_finalized() {
        let task_id = TaskId::new();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![TaskEvent::TaskDraftCreated {
                task_id: task_id.clone(),
                created_at: test_clock().now(),
            }])
            .when_command(TaskCommand::FinalizeDraft {
                task_id: task_id.clone(),
            })
            .then_rejection(|rejection| {
                assert!(matches!(
                    rejection,
                    TaskRejection::InvalidDescription {
                        length: 0,
                        min_length: 3,
                        ..
                    }
                ));
            })
            .then_state(|task| assert_eq!(task.status(), TaskStatus::Draft))
            .run();
    }

    #[test]
    fn create_draft_over_completed_task_is_rejected() {
        let task_id = TaskId::new();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![
                created(&task_id, "Buy milk"),
                TaskEvent::TaskCompleted {
                    task_id: task_id.clone(),
                },
            ])
            .when_command(TaskCommand::CreateDraft {
                task_id: task_id.clone(),
            })
            .then_rejection(|rejection| {
                assert!(matches!(
                    rejection,
                    TaskRejection::CannotCreateDraft {
                        status: TaskStatus::Completed,
                        ..
                    }
                ));
            })
            .run();
    }

    #[test]
    fn create_draft_over_existing_task_is_rejected() {
        let task_id = TaskId::new();

        ReducerTest::new(TaskReducer::new())
            .with_env(test_env())
            .given_events(vec![created(&task_id, "Buy milk")])
            .when_command(TaskCommand::CreateDraft {
                task_id: task_id.clone(),
            })
            .then_rejection(|rejection| {
                assert!(matches!(rejection, TaskRejection::TaskAlreadyExists { .. }));
            })
            .run();
    }
}
