//! Task labels part.

use super::{Task, TaskEvent, TaskRejection, emit, ensure_exists, flow};
use crate::types::{LabelId, TaskId};
use serde::{Deserialize, Serialize};
use todo_list_core::effect::Effects;

/// Labels assigned to a task, in assignment order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLabels {
    /// Assigned label identifiers, no duplicates
    pub label_ids: Vec<LabelId>,
}

impl TaskLabels {
    /// Whether `label_id` is assigned
    #[must_use]
    pub fn contains(&self, label_id: &LabelId) -> bool {
        self.label_ids.contains(label_id)
    }
}

/// Assigning a label twice is accepted without emitting anything
pub(super) fn assign_label(
    task: &Task,
    task_id: TaskId,
    label_id: LabelId,
) -> Result<Effects<TaskEvent>, TaskRejection> {
    let status = task.status();
    if !task.exists() || !flow::is_valid_assign_label_to_task_command(status) {
        return Err(TaskRejection::CannotAssignLabelToTask {
            task_id,
            label_id,
            status,
        });
    }

    if task.labels.contains(&label_id) {
        return Ok(Effects::new());
    }

    Ok(emit(TaskEvent::LabelAssignedToTask { task_id, label_id }))
}

pub(super) fn remove_label(
    task: &Task,
    task_id: TaskId,
    label_id: LabelId,
) -> Result<Effects<TaskEvent>, TaskRejection> {
    ensure_exists(task, &task_id)?;

    let status = task.status();
    if !flow::is_valid_task_status_to_remove_label(status) {
        return Err(TaskRejection::CannotRemoveLabelFromTask {
            task_id,
            label_id,
            status,
        });
    }

    if !task.labels.contains(&label_id) {
        return Err(TaskRejection::LabelNotAssigned { task_id, label_id });
    }

    Ok(emit(TaskEvent::LabelRemovedFromTask { task_id, label_id }))
}

/// Fold an event into the labels part
pub(super) fn apply(mut labels: TaskLabels, event: &TaskEvent) -> TaskLabels {
    match event {
        TaskEvent::LabelAssignedToTask { label_id, .. } => {
            if !labels.contains(label_id) {
                labels.label_ids.push(label_id.clone());
            }
        },
        TaskEvent::LabelRemovedFromTask { label_id, .. } => {
            labels.label_ids.retain(|assigned| assigned != label_id);
        },
        // LabelledTaskRestored re-announces a label that never left
        _ => {},
    }
    labels
}
