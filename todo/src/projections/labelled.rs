//! Labels with the tasks that carry them.
//!
//! Deleting a task takes it off every label. Restoring it brings it back
//! through the `LabelledTaskRestored` events the task emits per label.

use crate::label::LabelEvent;
use crate::message::TodoEvent;
use crate::task::TaskEvent;
use crate::types::{LabelDetails, LabelId, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use todo_list_core::event::Event;
use todo_list_core::projection::{Projection, Result, processing_error};
use tokio::sync::RwLock;

/// A task as seen from a label
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelledTask {
    /// Task
    pub task_id: TaskId,
    /// Description
    pub description: String,
    /// Status
    pub status: TaskStatus,
}

/// A label and its tasks, in assignment order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelledTasks {
    /// Label
    pub label_id: LabelId,
    /// Title and color
    pub details: LabelDetails,
    /// Tasks carrying the label
    pub tasks: Vec<LabelledTask>,
}

#[derive(Debug, Default)]
struct LabelEntry {
    details: LabelDetails,
    task_ids: Vec<TaskId>,
}

#[derive(Debug, Default)]
struct Inner {
    labels: HashMap<LabelId, LabelEntry>,
    tasks: HashMap<TaskId, LabelledTask>,
}

impl Inner {
    fn task_mut(&mut self, task_id: &TaskId) -> Result<&mut LabelledTask> {
        self.tasks.get_mut(task_id).ok_or_else(|| {
            processing_error(LabelledTasksView::NAME, format!("unknown task {task_id}"))
        })
    }

    fn set_status(&mut self, task_id: &TaskId, status: TaskStatus) -> Result<()> {
        self.task_mut(task_id)?.status = status;
        Ok(())
    }

    fn attach(&mut self, label_id: &LabelId, task_id: &TaskId) {
        let entry = self.labels.entry(label_id.clone()).or_default();
        if !entry.task_ids.contains(task_id) {
            entry.task_ids.push(task_id.clone());
        }
    }

    fn detach(&mut self, label_id: &LabelId, task_id: &TaskId) {
        if let Some(entry) = self.labels.get_mut(label_id) {
            entry.task_ids.retain(|id| id != task_id);
        }
    }

    fn collect(&self, label_id: &LabelId, entry: &LabelEntry) -> LabelledTasks {
        LabelledTasks {
            label_id: label_id.clone(),
            details: entry.details.clone(),
            tasks: entry
                .task_ids
                .iter()
                .filter_map(|task_id| self.tasks.get(task_id))
                .cloned()
                .collect(),
        }
    }

    fn apply_task_event(&mut self, event: &TaskEvent) -> Result<()> {
        match event {
            TaskEvent::TaskCreated {
                task_id,
                description,
                ..
            } => {
                self.tasks.insert(
                    task_id.clone(),
                    LabelledTask {
                        task_id: task_id.clone(),
                        description: description.clone(),
                        status: TaskStatus::Finalized,
                    },
                );
                Ok(())
            },
            TaskEvent::TaskDraftCreated { task_id, .. } => {
                self.tasks.insert(
                    task_id.clone(),
                    LabelledTask {
                        task_id: task_id.clone(),
                        description: String::new(),
                        status: TaskStatus::Draft,
                    },
                );
                Ok(())
            },
            TaskEvent::TaskDescriptionUpdated {
                task_id,
                description_change,
            } => {
                self.task_mut(task_id)?
                    .description
                    .clone_from(&description_change.new_value);
                Ok(())
            },
            TaskEvent::TaskCompleted { task_id } => self.set_status(task_id, TaskStatus::Completed),
            TaskEvent::TaskReopened { task_id } | TaskEvent::DeletedTaskRestored { task_id } => {
                self.set_status(task_id, TaskStatus::Open)
            },
            TaskEvent::TaskDraftFinalized { task_id } => {
                self.set_status(task_id, TaskStatus::Finalized)
            },
            TaskEvent::TaskDeleted { task_id } => {
                self.set_status(task_id, TaskStatus::Deleted)?;
                for entry in self.labels.values_mut() {
                    entry.task_ids.retain(|id| id != task_id);
                }
                Ok(())
            },
            TaskEvent::LabelAssignedToTask { task_id, label_id }
            | TaskEvent::LabelledTaskRestored { task_id, label_id } => {
                self.attach(label_id, task_id);
                Ok(())
            },
            TaskEvent::LabelRemovedFromTask { task_id, label_id } => {
                self.detach(label_id, task_id);
                Ok(())
            },
            TaskEvent::TaskDueDateUpdated { .. } | TaskEvent::TaskPriorityUpdated { .. } => Ok(()),
        }
    }

    fn apply_label_event(&mut self, event: &LabelEvent) -> Result<()> {
        match event {
            LabelEvent::LabelCreated { label_id, details } => {
                self.labels.entry(label_id.clone()).or_default().details = details.clone();
                Ok(())
            },
            LabelEvent::LabelDetailsUpdated {
                label_id,
                label_details_change,
            } => {
                let entry = self.labels.get_mut(label_id).ok_or_else(|| {
                    processing_error(LabelledTasksView::NAME, format!("unknown label {label_id}"))
                })?;
                entry.details = label_details_change.new_value.clone();
                Ok(())
            },
        }
    }
}

/// Labels with their tasks
#[derive(Debug, Default)]
pub struct LabelledTasksView {
    inner: RwLock<Inner>,
}

impl LabelledTasksView {
    /// Projection name
    pub const NAME: &'static str = "labelled_tasks";

    /// Create an empty view
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks carrying `label_id`
    pub async fn label(&self, label_id: &LabelId) -> Option<LabelledTasks> {
        let inner = self.inner.read().await;
        inner
            .labels
            .get(label_id)
            .map(|entry| inner.collect(label_id, entry))
    }

    /// Every label, ordered by title
    pub async fn labels(&self) -> Vec<LabelledTasks> {
        let inner = self.inner.read().await;
        let mut labels: Vec<LabelledTasks> = inner
            .labels
            .iter()
            .map(|(label_id, entry)| inner.collect(label_id, entry))
            .collect();
        labels.sort_by(|a, b| {
            a.details
                .title
                .cmp(&b.details.title)
                .then_with(|| a.label_id.cmp(&b.label_id))
        });
        labels
    }
}

impl Projection for LabelledTasksView {
    type Event = TodoEvent;

    fn name(&self) -> &str {
        Self::NAME
    }

    async fn apply_event(&self, event: &TodoEvent) -> Result<()> {
        tracing::debug!(
            projection = Self::NAME,
            event = event.event_type(),
            "Applying event"
        );

        let mut inner = self.inner.write().await;
        match event {
            TodoEvent::Task(event) => inner.apply_task_event(event),
            TodoEvent::Label(event) => inner.apply_label_event(event),
            TodoEvent::Wizard(_) => Ok(()),
        }
    }

    async fn rebuild(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.labels.clear();
        inner.tasks.clear();
        tracing::debug!(projection = Self::NAME, "Cleared for rebuild");
        Ok(())
    }
}
