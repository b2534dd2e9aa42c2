//! The todo list bounded context.
//!
//! [`TodoContext`] owns one [`Store`] per aggregate kind and the read models.
//! Posting a command routes it to its store, records the emitted events in
//! the journal, feeds them to every projection and then delivers whatever
//! the wizard dispatched, oldest first, until nothing is left.

use crate::config::TodoConfig;
use crate::label::{LabelReducer, LabelRejection};
use crate::message::{TodoCommand, TodoEvent};
use crate::projections::{DraftTasksView, LabelledTasksView, MyListView};
use crate::task::{TaskEnvironment, TaskReducer, TaskRejection};
use crate::wizard::{WizardEnvironment, WizardOutbound, WizardReducer, WizardRejection};
use std::collections::VecDeque;
use std::sync::Arc;
use todo_list_core::environment::{Clock, IdGenerator};
use todo_list_core::projection::{Projection, ProjectionError};
use todo_list_runtime::Store;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// A command rejected by one of the aggregates
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// Rejected by a task
    #[error(transparent)]
    Task(#[from] TaskRejection),

    /// Rejected by a label
    #[error(transparent)]
    Label(#[from] LabelRejection),

    /// Rejected by a task creation process
    #[error(transparent)]
    Wizard(#[from] WizardRejection),
}

/// Errors returned by [`TodoContext::post`]
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// The posted command was rejected
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// A read model could not apply an event
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl TodoError {
    /// The rejection, if the command was rejected
    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Projection(_) => None,
        }
    }
}

/// What an accepted command led to
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Receipt {
    /// Every event recorded, redeliveries included, in order
    pub events: Vec<TodoEvent>,
    /// Rejections of commands dispatched by the wizard
    pub rejections: Vec<Rejection>,
}

type Delivered = (Vec<TodoEvent>, Vec<WizardOutbound>);

/// Tasks, labels, task creation processes and their read models
pub struct TodoContext {
    tasks: Store<TaskReducer>,
    labels: Store<LabelReducer>,
    wizards: Store<WizardReducer>,
    my_list: MyListView,
    drafts: DraftTasksView,
    labelled_tasks: LabelledTasksView,
    journal: RwLock<Vec<TodoEvent>>,
}

impl TodoContext {
    /// Create an empty context
    #[must_use]
    pub fn new(config: TodoConfig, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            wizards: Store::new(
                "task_creations",
                WizardReducer::new(),
                WizardEnvironment::new(ids, config.clone()),
            ),
            tasks: Store::new(
                "tasks",
                TaskReducer::new(),
                TaskEnvironment::new(clock, config),
            ),
            labels: Store::new("labels", LabelReducer::new(), ()),
            my_list: MyListView::new(),
            drafts: DraftTasksView::new(),
            labelled_tasks: LabelledTasksView::new(),
            journal: RwLock::new(Vec::new()),
        }
    }

    /// Handle a command and everything it dispatches
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Rejected`] when the posted command itself is
    /// rejected; nothing changed in that case. Rejections of dispatched
    /// commands do not fail the call and are listed in the [`Receipt`].
    /// Returns [`TodoError::Projection`] when a read model fails.
    pub async fn post(&self, command: impl Into<TodoCommand>) -> Result<Receipt, TodoError> {
        self.post_command(command.into()).await
    }

    #[tracing::instrument(skip(self, command), name = "todo_post", fields(command = command.command_type()))]
    async fn post_command(&self, command: TodoCommand) -> Result<Receipt, TodoError> {
        let mut receipt = Receipt::default();

        let (events, outbound) = self.deliver(command).await?;
        self.publish(events, &mut receipt).await?;

        let mut queue: VecDeque<TodoCommand> = outbound.into_iter().map(Into::into).collect();
        while let Some(next) = queue.pop_front() {
            let command_type = next.command_type();
            match self.deliver(next).await {
                Ok((events, outbound)) => {
                    self.publish(events, &mut receipt).await?;
                    queue.extend(outbound.into_iter().map(TodoCommand::from));
                },
                Err(rejection) => {
                    warn!(command = command_type, %rejection, "Dispatched command rejected");
                    receipt.rejections.push(rejection);
                },
            }
        }

        Ok(receipt)
    }

    async fn deliver(&self, command: TodoCommand) -> Result<Delivered, Rejection> {
        match command {
            TodoCommand::Task(command) => {
                let dispatched = self.tasks.send(command).await?;
                Ok((dispatched.events.into_iter().map(TodoEvent::Task).collect(), Vec::new()))
            },
            TodoCommand::Label(command) => {
                let dispatched = self.labels.send(command).await?;
                Ok((dispatched.events.into_iter().map(TodoEvent::Label).collect(), Vec::new()))
            },
            TodoCommand::Wizard(command) => {
                let dispatched = self.wizards.send(command).await?;
                Ok((
                    dispatched.events.into_iter().map(TodoEvent::Wizard).collect(),
                    dispatched.outbound,
                ))
            },
        }
    }

    async fn publish(&self, events: Vec<TodoEvent>, receipt: &mut Receipt) -> Result<(), TodoError> {
        for event in events {
            self.journal.write().await.push(event.clone());
            self.project(&event).await?;
            receipt.events.push(event);
        }
        Ok(())
    }

    async fn project(&self, event: &TodoEvent) -> Result<(), ProjectionError> {
        self.my_list.apply_event(event).await?;
        self.drafts.apply_event(event).await?;
        self.labelled_tasks.apply_event(event).await?;
        Ok(())
    }

    /// Clear every read model and replay the journal into it
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] when a read model fails.
    pub async fn rebuild_projections(&self) -> Result<(), ProjectionError> {
        self.my_list.rebuild().await?;
        self.drafts.rebuild().await?;
        self.labelled_tasks.rebuild().await?;

        let journal = self.journal.read().await.clone();
        debug!(events = journal.len(), "Replaying journal into projections");
        for event in &journal {
            self.project(event).await?;
        }
        Ok(())
    }

    /// Task store
    #[must_use]
    pub const fn tasks(&self) -> &Store<TaskReducer> {
        &self.tasks
    }

    /// Label store
    #[must_use]
    pub const fn labels(&self) -> &Store<LabelReducer> {
        &self.labels
    }

    /// Task creation process store
    #[must_use]
    pub const fn wizards(&self) -> &Store<WizardReducer> {
        &self.wizards
    }

    /// The user's task list
    #[must_use]
    pub const fn my_list(&self) -> &MyListView {
        &self.my_list
    }

    /// Drafts being built
    #[must_use]
    pub const fn drafts(&self) -> &DraftTasksView {
        &self.drafts
    }

    /// Labels with their tasks
    #[must_use]
    pub const fn labelled_tasks(&self) -> &LabelledTasksView {
        &self.labelled_tasks
    }

    /// Every recorded event, in order
    pub async fn journal(&self) -> Vec<TodoEvent> {
        self.journal.read().await.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::label::LabelCommand;
    use crate::task::TaskCommand;
    use crate::types::{LabelId, TaskId};
    use todo_list_testing::{SequentialIds, test_clock};

    fn context() -> TodoContext {
        TodoContext::new(
            TodoConfig::default(),
            Arc::new(test_clock()),
            Arc::new(SequentialIds::new()),
        )
    }

    #[tokio::test]
    async fn posted_rejection_is_an_error() {
        let context = context();

        let error = context
            .post(TaskCommand::CompleteTask {
                task_id: TaskId::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            error.rejection(),
            Some(Rejection::Task(TaskRejection::TaskNotFound { .. }))
        ));
        assert!(context.journal().await.is_empty());
    }

    #[tokio::test]
    async fn events_reach_projections_and_journal() {
        let context = context();
        let label_id = LabelId::new();

        let receipt = context
            .post(LabelCommand::CreateBasicLabel {
                label_id: label_id.clone(),
                label_title: "errands".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(receipt.events.len(), 1);
        assert!(receipt.rejections.is_empty());
        assert_eq!(context.journal().await, receipt.events);
        assert!(context.labelled_tasks().label(&label_id).await.is_some());
    }

    #[tokio::test]
    async fn rebuild_reproduces_views() {
        let context = context();
        let task_id = TaskId::new();
        context
            .post(TaskCommand::CreateBasicTask {
                task_id: task_id.clone(),
                description: "Call mom".to_string(),
            })
            .await
            .unwrap();
        let before = context.my_list().items().await;

        context.rebuild_projections().await.unwrap();

        assert_eq!(context.my_list().items().await, before);
    }
}
