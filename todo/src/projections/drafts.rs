//! Drafts currently being built through the task creation wizard.

use crate::message::TodoEvent;
use crate::task::TaskEvent;
use crate::types::{TaskId, TaskPriority};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use todo_list_core::event::Event;
use todo_list_core::projection::{Projection, Result};
use tokio::sync::RwLock;

/// A task still in `Draft` status
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftTask {
    /// Draft
    pub task_id: TaskId,
    /// Description entered so far
    pub description: String,
    /// Priority entered so far
    pub priority: TaskPriority,
    /// Due date entered so far
    pub due_date: Option<DateTime<Utc>>,
    /// When the draft was created
    pub created_at: DateTime<Utc>,
}

/// Drafts keyed by task
#[derive(Debug, Default)]
pub struct DraftTasksView {
    drafts: RwLock<HashMap<TaskId, DraftTask>>,
}

impl DraftTasksView {
    /// Projection name
    pub const NAME: &'static str = "draft_tasks";

    /// Create an empty view
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All drafts, oldest first
    pub async fn drafts(&self) -> Vec<DraftTask> {
        let mut drafts: Vec<DraftTask> = self.drafts.read().await.values().cloned().collect();
        drafts.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.task_id.cmp(&b.task_id))
        });
        drafts
    }

    /// A single draft
    pub async fn get(&self, task_id: &TaskId) -> Option<DraftTask> {
        self.drafts.read().await.get(task_id).cloned()
    }
}

impl Projection for DraftTasksView {
    type Event = TodoEvent;

    fn name(&self) -> &str {
        Self::NAME
    }

    async fn apply_event(&self, event: &TodoEvent) -> Result<()> {
        let TodoEvent::Task(event) = event else {
            return Ok(());
        };

        let mut drafts = self.drafts.write().await;
        match event {
            TaskEvent::TaskDraftCreated {
                task_id,
                created_at,
            } => {
                drafts.insert(
                    task_id.clone(),
                    DraftTask {
                        task_id: task_id.clone(),
                        description: String::new(),
                        priority: TaskPriority::Undefined,
                        due_date: None,
                        created_at: *created_at,
                    },
                );
            },
            // Updates of non-draft tasks are not ours
            TaskEvent::TaskDescriptionUpdated {
                task_id,
                description_change,
            } => {
                if let Some(draft) = drafts.get_mut(task_id) {
                    draft.description.clone_from(&description_change.new_value);
                }
            },
            TaskEvent::TaskPriorityUpdated {
                task_id,
                priority_change,
            } => {
                if let Some(draft) = drafts.get_mut(task_id) {
                    draft.priority = priority_change.new_value;
                }
            },
            TaskEvent::TaskDueDateUpdated {
                task_id,
                due_date_change,
            } => {
                if let Some(draft) = drafts.get_mut(task_id) {
                    draft.due_date = due_date_change.new_value;
                }
            },
            TaskEvent::TaskDraftFinalized { task_id } | TaskEvent::TaskDeleted { task_id } => {
                if drafts.remove(task_id).is_some() {
                    tracing::debug!(
                        projection = Self::NAME,
                        event = event.event_type(),
                        task_id = %task_id,
                        "Draft removed"
                    );
                }
            },
            _ => {},
        }
        Ok(())
    }

    async fn rebuild(&self) -> Result<()> {
        self.drafts.write().await.clear();
        tracing::debug!(projection = Self::NAME, "Cleared for rebuild");
        Ok(())
    }
}
