//! The user's task list.
//!
//! Holds every task the context has seen, drafts and deleted tasks included,
//! so later events always find their row. Queries only return tasks that are
//! neither drafts nor deleted: finalized drafts show up, deleted tasks come
//! back when restored.

use crate::message::TodoEvent;
use crate::task::TaskEvent;
use crate::types::{LabelId, TaskId, TaskPriority, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use todo_list_core::event::Event;
use todo_list_core::projection::{Projection, Result, processing_error};
use tokio::sync::RwLock;

/// One row of the list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyListItem {
    /// Task
    pub task_id: TaskId,
    /// Description
    pub description: String,
    /// Priority
    pub priority: TaskPriority,
    /// Due date
    pub due_date: Option<DateTime<Utc>>,
    /// Status
    pub status: TaskStatus,
    /// Assigned labels
    pub label_ids: Vec<LabelId>,
    /// Shortcut for `status == Completed`
    pub completed: bool,
    /// Creation time, used for ordering
    pub created_at: DateTime<Utc>,
}

impl MyListItem {
    fn new(
        task_id: TaskId,
        description: String,
        status: TaskStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id,
            description,
            priority: TaskPriority::Undefined,
            due_date: None,
            status,
            label_ids: Vec::new(),
            completed: false,
            created_at,
        }
    }

    fn is_visible(&self) -> bool {
        !matches!(self.status, TaskStatus::Draft | TaskStatus::Deleted)
    }

    fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.completed = status == TaskStatus::Completed;
    }
}

/// Visible tasks, oldest first
#[derive(Debug, Default)]
pub struct MyListView {
    items: RwLock<HashMap<TaskId, MyListItem>>,
}

impl MyListView {
    /// Projection name
    pub const NAME: &'static str = "my_list";

    /// Create an empty view
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible tasks ordered by creation time
    pub async fn items(&self) -> Vec<MyListItem> {
        let items = self.items.read().await;
        let mut visible: Vec<MyListItem> = items
            .values()
            .filter(|item| item.is_visible())
            .cloned()
            .collect();
        visible.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.task_id.cmp(&b.task_id))
        });
        visible
    }

    /// A visible task
    pub async fn get(&self, task_id: &TaskId) -> Option<MyListItem> {
        self.items
            .read()
            .await
            .get(task_id)
            .filter(|item| item.is_visible())
            .cloned()
    }
}

fn update<F>(items: &mut HashMap<TaskId, MyListItem>, task_id: &TaskId, f: F) -> Result<()>
where
    F: FnOnce(&mut MyListItem),
{
    let item = items
        .get_mut(task_id)
        .ok_or_else(|| processing_error(MyListView::NAME, format!("unknown task {task_id}")))?;
    f(item);
    Ok(())
}

impl Projection for MyListView {
    type Event = TodoEvent;

    fn name(&self) -> &str {
        Self::NAME
    }

    async fn apply_event(&self, event: &TodoEvent) -> Result<()> {
        let TodoEvent::Task(event) = event else {
            return Ok(());
        };

        tracing::debug!(
            projection = Self::NAME,
            event = event.event_type(),
            task_id = %event.task_id(),
            "Applying event"
        );

        let mut items = self.items.write().await;
        match event {
            TaskEvent::TaskCreated {
                task_id,
                description,
                created_at,
            } => {
                items.insert(
                    task_id.clone(),
                    MyListItem::new(
                        task_id.clone(),
                        description.clone(),
                        TaskStatus::Finalized,
                        *created_at,
                    ),
                );
                Ok(())
            },
            TaskEvent::TaskDraftCreated {
                task_id,
                created_at,
            } => {
                items.insert(
                    task_id.clone(),
                    MyListItem::new(task_id.clone(), String::new(), TaskStatus::Draft, *created_at),
                );
                Ok(())
            },
            TaskEvent::TaskDescriptionUpdated {
                task_id,
                description_change,
            } => update(&mut items, task_id, |item| {
                item.description.clone_from(&description_change.new_value);
            }),
            TaskEvent::TaskDueDateUpdated {
                task_id,
                due_date_change,
            } => update(&mut items, task_id, |item| {
                item.due_date = due_date_change.new_value;
            }),
            TaskEvent::TaskPriorityUpdated {
                task_id,
                priority_change,
            } => update(&mut items, task_id, |item| {
                item.priority = priority_change.new_value;
            }),
            TaskEvent::TaskCompleted { task_id } => update(&mut items, task_id, |item| {
                item.set_status(TaskStatus::Completed);
            }),
            TaskEvent::TaskReopened { task_id } | TaskEvent::DeletedTaskRestored { task_id } => {
                update(&mut items, task_id, |item| item.set_status(TaskStatus::Open))
            },
            TaskEvent::TaskDeleted { task_id } => update(&mut items, task_id, |item| {
                item.set_status(TaskStatus::Deleted);
            }),
            TaskEvent::TaskDraftFinalized { task_id } => update(&mut items, task_id, |item| {
                item.set_status(TaskStatus::Finalized);
            }),
            TaskEvent::LabelAssignedToTask { task_id, label_id }
            | TaskEvent::LabelledTaskRestored { task_id, label_id } => {
                update(&mut items, task_id, |item| {
                    if !item.label_ids.contains(label_id) {
                        item.label_ids.push(label_id.clone());
                    }
                })
            },
            TaskEvent::LabelRemovedFromTask { task_id, label_id } => {
                update(&mut items, task_id, |item| {
                    item.label_ids.retain(|assigned| assigned != label_id);
                })
            },
        }
    }

    async fn rebuild(&self) -> Result<()> {
        self.items.write().await.clear();
        tracing::debug!(projection = Self::NAME, "Cleared for rebuild");
        Ok(())
    }
}
