//! Messages of the todo list bounded context.
//!
//! [`TodoCommand`] and [`TodoEvent`] wrap the per-aggregate messages so the
//! context can route commands and feed events to read models through one
//! type each.

use crate::label::{LabelCommand, LabelEvent};
use crate::task::{TaskCommand, TaskEvent};
use crate::wizard::{WizardCommand, WizardEvent, WizardOutbound};
use serde::{Deserialize, Serialize};
use todo_list_core::{command::Command, event::Event};

/// Any command of the bounded context
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoCommand {
    /// For a task
    Task(TaskCommand),
    /// For a label
    Label(LabelCommand),
    /// For a task creation process
    Wizard(WizardCommand),
}

impl TodoCommand {
    /// Name of the wrapped command
    #[must_use]
    pub fn command_type(&self) -> &'static str {
        match self {
            Self::Task(command) => command.command_type(),
            Self::Label(command) => command.command_type(),
            Self::Wizard(command) => command.command_type(),
        }
    }
}

impl From<TaskCommand> for TodoCommand {
    fn from(command: TaskCommand) -> Self {
        Self::Task(command)
    }
}

impl From<LabelCommand> for TodoCommand {
    fn from(command: LabelCommand) -> Self {
        Self::Label(command)
    }
}

impl From<WizardCommand> for TodoCommand {
    fn from(command: WizardCommand) -> Self {
        Self::Wizard(command)
    }
}

impl From<WizardOutbound> for TodoCommand {
    fn from(outbound: WizardOutbound) -> Self {
        match outbound {
            WizardOutbound::Task(command) => Self::Task(command),
            WizardOutbound::Label(command) => Self::Label(command),
        }
    }
}

/// Any event of the bounded context
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoEvent {
    /// From a task
    Task(TaskEvent),
    /// From a label
    Label(LabelEvent),
    /// From a task creation process
    Wizard(WizardEvent),
}

impl Event for TodoEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::Task(event) => event.event_type(),
            Self::Label(event) => event.event_type(),
            Self::Wizard(event) => event.event_type(),
        }
    }
}

impl From<TaskEvent> for TodoEvent {
    fn from(event: TaskEvent) -> Self {
        Self::Task(event)
    }
}

impl From<LabelEvent> for TodoEvent {
    fn from(event: LabelEvent) -> Self {
        Self::Label(event)
    }
}

impl From<WizardEvent> for TodoEvent {
    fn from(event: WizardEvent) -> Self {
        Self::Wizard(event)
    }
}
