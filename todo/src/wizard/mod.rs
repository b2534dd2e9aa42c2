//! Task creation wizard.
//!
//! A process manager that walks the user through creating a task in stages
//! (see [`stage`]). It never changes tasks or labels itself: every handler
//! records a wizard event and dispatches [`WizardOutbound`] commands that the
//! host delivers to the task and label aggregates.
//!
//! Cancelling leaves the supervised draft as it is. Every intermediate state
//! of the draft is a valid task state, so nothing is rolled back.

use crate::config::TodoConfig;
use crate::label::LabelCommand;
use crate::task::TaskCommand;
use crate::types::{
    DescriptionChange, DueDateChange, LabelColor, LabelDetails, LabelId, PriorityChange,
    TaskCreationId, TaskId, ValueChange,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use todo_list_core::{
    command::Command,
    effect::{Effect, Effects},
    environment::IdGenerator,
    reducer::Reducer,
    smallvec,
    stream::Version,
};
use todo_list_macros::{Command, Event, State};

/// Stage ordering and transition rules
pub mod stage;

pub use stage::TaskCreationStage;

/// State of one task creation process
///
/// The process cannot see the task it supervises. Started on a `task_id`
/// that already exists, it still records the start while the task rejects
/// `CreateDraft`; the host reports that rejection (see
/// [`crate::context::Receipt`]) and the later `FinalizeDraft` is rejected the
/// same way.
#[derive(State, Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskCreation {
    /// Process identifier, set on start
    pub id: Option<TaskCreationId>,
    /// Draft being built
    pub task_id: Option<TaskId>,
    /// Current stage
    pub stage: TaskCreationStage,
    /// Completed or canceled
    pub archived: bool,
    /// Number of events applied
    #[version]
    pub version: Version,
}

/// Commands handled by the wizard
#[derive(Command, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[command(target = "id")]
pub enum WizardCommand {
    /// Start the process and create the draft
    StartTaskCreation {
        /// Process to start
        id: TaskCreationId,
        /// Draft to create
        task_id: TaskId,
    },

    /// Set description, priority and due date of the draft
    UpdateTaskDetails {
        /// Process
        id: TaskCreationId,
        /// New description, required on the first submission and held to
        /// the task's minimum length
        description_change: Option<DescriptionChange>,
        /// New priority
        priority_change: Option<PriorityChange>,
        /// New due date
        due_date_change: Option<DueDateChange>,
    },

    /// Assign existing labels and create new ones
    AddLabels {
        /// Process
        id: TaskCreationId,
        /// Labels that already exist
        existing_labels: Vec<LabelId>,
        /// Labels to create and assign
        new_labels: Vec<LabelDetails>,
    },

    /// Move on without labels
    SkipLabels {
        /// Process
        id: TaskCreationId,
    },

    /// Finalize the draft
    CompleteTaskCreation {
        /// Process
        id: TaskCreationId,
    },

    /// Abandon the process
    CancelTaskCreation {
        /// Process
        id: TaskCreationId,
    },
}

impl WizardCommand {
    /// Stage the command asks for
    #[must_use]
    pub const fn requested_stage(&self) -> TaskCreationStage {
        match self {
            Self::StartTaskCreation { .. } => TaskCreationStage::TaskDefinition,
            Self::UpdateTaskDetails { .. } => TaskCreationStage::LabelAssignment,
            Self::AddLabels { .. } | Self::SkipLabels { .. } => TaskCreationStage::Confirmation,
            Self::CompleteTaskCreation { .. } => TaskCreationStage::Completed,
            Self::CancelTaskCreation { .. } => TaskCreationStage::Canceled,
        }
    }
}

/// Events emitted by the wizard
#[derive(Event, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardEvent {
    /// The process started
    TaskCreationStarted {
        /// Process
        id: TaskCreationId,
        /// Draft being built
        task_id: TaskId,
    },

    /// Task details were submitted
    TaskDetailsUpdated {
        /// Process
        id: TaskCreationId,
        /// Draft
        task_id: TaskId,
        /// Submitted description
        description_change: Option<DescriptionChange>,
        /// Submitted priority
        priority_change: Option<PriorityChange>,
        /// Submitted due date
        due_date_change: Option<DueDateChange>,
    },

    /// Labels were added
    LabelsAdded {
        /// Process
        id: TaskCreationId,
        /// Draft
        task_id: TaskId,
        /// Existing labels assigned
        existing_labels: Vec<LabelId>,
        /// Identifiers of the labels created for the draft
        new_labels: Vec<LabelId>,
    },

    /// Label assignment was skipped
    LabelAssignmentSkipped {
        /// Process
        id: TaskCreationId,
        /// Draft
        task_id: TaskId,
    },

    /// The draft was finalized
    TaskCreationCompleted {
        /// Process
        id: TaskCreationId,
        /// Finalized task
        task_id: TaskId,
    },

    /// The process was abandoned
    TaskCreationCanceled {
        /// Process
        id: TaskCreationId,
        /// Draft left as is
        task_id: TaskId,
    },
}

impl WizardEvent {
    /// Process the event belongs to
    #[must_use]
    pub const fn id(&self) -> &TaskCreationId {
        match self {
            Self::TaskCreationStarted { id, .. }
            | Self::TaskDetailsUpdated { id, .. }
            | Self::LabelsAdded { id, .. }
            | Self::LabelAssignmentSkipped { id, .. }
            | Self::TaskCreationCompleted { id, .. }
            | Self::TaskCreationCanceled { id, .. } => id,
        }
    }

    /// Stage the event moves towards
    #[must_use]
    pub const fn stage(&self) -> TaskCreationStage {
        match self {
            Self::TaskCreationStarted { .. } => TaskCreationStage::TaskDefinition,
            Self::TaskDetailsUpdated { .. } => TaskCreationStage::LabelAssignment,
            Self::LabelsAdded { .. } | Self::LabelAssignmentSkipped { .. } => {
                TaskCreationStage::Confirmation
            },
            Self::TaskCreationCompleted { .. } => TaskCreationStage::Completed,
            Self::TaskCreationCanceled { .. } => TaskCreationStage::Canceled,
        }
    }
}

/// Rejections of wizard commands
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WizardRejection {
    /// The command would skip a stage or the process is terminated
    #[error("Task creation {process_id} cannot move to stage {requested:?} from {current:?}")]
    CannotMoveToStage {
        /// Process
        process_id: TaskCreationId,
        /// Stage the command asked for
        requested: TaskCreationStage,
        /// Stage the process is in
        current: TaskCreationStage,
    },

    /// The first task details submission needs a description, and any
    /// description sent must be long enough for the task to accept it
    #[error("Task creation {process_id} needs a valid task description")]
    CannotUpdateTaskDetails {
        /// Process
        process_id: TaskCreationId,
    },

    /// Neither existing nor new labels were given, or a new label has a
    /// blank title
    #[error("Task creation {process_id} got no valid labels to add")]
    CannotAddLabels {
        /// Process
        process_id: TaskCreationId,
    },
}

/// Commands the wizard sends to other aggregates
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardOutbound {
    /// For the supervised task
    Task(TaskCommand),
    /// For a label
    Label(LabelCommand),
}

/// Environment dependencies for the wizard reducer
#[derive(Clone)]
pub struct WizardEnvironment {
    /// Identifiers for labels created through the wizard
    pub ids: Arc<dyn IdGenerator>,
    /// Description rules shared with the task aggregate
    pub config: TodoConfig,
}

impl WizardEnvironment {
    /// Creates a new `WizardEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>, config: TodoConfig) -> Self {
        Self { ids, config }
    }
}

/// Reducer for task creation processes
#[derive(Clone, Debug, Default)]
pub struct WizardReducer;

impl WizardReducer {
    /// Creates a new `WizardReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

type WizardEffects = Effects<WizardEvent, WizardOutbound>;

/// Draft supervised by a started process
fn supervised_task(
    process: &TaskCreation,
    process_id: &TaskCreationId,
    requested: TaskCreationStage,
) -> Result<TaskId, WizardRejection> {
    process
        .task_id
        .clone()
        .ok_or_else(|| WizardRejection::CannotMoveToStage {
            process_id: process_id.clone(),
            requested,
            current: process.stage,
        })
}

fn assign(task_id: &TaskId, label_id: LabelId) -> WizardOutbound {
    WizardOutbound::Task(TaskCommand::AssignLabelToTask {
        task_id: task_id.clone(),
        label_id,
    })
}

impl Reducer for WizardReducer {
    type State = TaskCreation;
    type Command = WizardCommand;
    type Event = WizardEvent;
    type Outbound = WizardOutbound;
    type Rejection = WizardRejection;
    type Environment = WizardEnvironment;

    fn handle(
        &self,
        process: &TaskCreation,
        command: WizardCommand,
        env: &WizardEnvironment,
    ) -> Result<WizardEffects, WizardRejection> {
        let id = command.target().clone();
        let requested = command.requested_stage();
        stage::transit(&id, process.stage, requested)?;

        match command {
            WizardCommand::StartTaskCreation { id, task_id } => {
                if process.task_id.is_some() {
                    return Ok(Effects::new());
                }

                Ok(smallvec![
                    Effect::Emit(WizardEvent::TaskCreationStarted {
                        id,
                        task_id: task_id.clone(),
                    }),
                    Effect::Dispatch(WizardOutbound::Task(TaskCommand::CreateDraft { task_id })),
                ])
            },

            WizardCommand::UpdateTaskDetails {
                id,
                description_change,
                priority_change,
                due_date_change,
            } => {
                // A description the task would refuse must not advance the process
                let min_length = env.config.min_description_length.max(1);
                let acceptable = description_change
                    .as_ref()
                    .map(|change| change.new_value.trim().chars().count() >= min_length);
                let missing = process.stage == TaskCreationStage::TaskDefinition
                    && acceptable.is_none();
                if missing || acceptable == Some(false) {
                    return Err(WizardRejection::CannotUpdateTaskDetails { process_id: id });
                }
                let task_id = supervised_task(process, &id, requested)?;

                let mut effects: WizardEffects = smallvec![Effect::Emit(
                    WizardEvent::TaskDetailsUpdated {
                        id,
                        task_id: task_id.clone(),
                        description_change: description_change.clone(),
                        priority_change: priority_change.clone(),
                        due_date_change: due_date_change.clone(),
                    }
                )];
                if let Some(description_change) = description_change {
                    effects.push(Effect::Dispatch(WizardOutbound::Task(
                        TaskCommand::UpdateTaskDescription {
                            task_id: task_id.clone(),
                            description_change,
                        },
                    )));
                }
                if let Some(priority_change) = priority_change {
                    effects.push(Effect::Dispatch(WizardOutbound::Task(
                        TaskCommand::UpdateTaskPriority {
                            task_id: task_id.clone(),
                            priority_change,
                        },
                    )));
                }
                if let Some(due_date_change) = due_date_change {
                    effects.push(Effect::Dispatch(WizardOutbound::Task(
                        TaskCommand::UpdateTaskDueDate {
                            task_id,
                            due_date_change,
                        },
                    )));
                }

                Ok(effects)
            },

            WizardCommand::AddLabels {
                id,
                existing_labels,
                new_labels,
            } => {
                let blank_title = new_labels
                    .iter()
                    .any(|details| details.title.trim().is_empty());
                if (existing_labels.is_empty() && new_labels.is_empty()) || blank_title {
                    return Err(WizardRejection::CannotAddLabels { process_id: id });
                }
                let task_id = supervised_task(process, &id, requested)?;

                let mut outbound: Vec<WizardOutbound> = existing_labels
                    .iter()
                    .map(|label_id| assign(&task_id, label_id.clone()))
                    .collect();

                let mut created = Vec::with_capacity(new_labels.len());
                for details in new_labels {
                    let label_id = LabelId::from_uuid(env.ids.next_id());
                    outbound.push(WizardOutbound::Label(LabelCommand::CreateBasicLabel {
                        label_id: label_id.clone(),
                        label_title: details.title.clone(),
                    }));
                    if details.color != LabelColor::Undefined && details.color != LabelColor::BASIC
                    {
                        outbound.push(WizardOutbound::Label(LabelCommand::UpdateLabelDetails {
                            label_id: label_id.clone(),
                            label_details_change: ValueChange::new(
                                LabelDetails::basic(details.title.clone()),
                                details,
                            ),
                        }));
                    }
                    outbound.push(assign(&task_id, label_id.clone()));
                    created.push(label_id);
                }

                let mut effects: WizardEffects = smallvec![Effect::Emit(WizardEvent::LabelsAdded {
                    id,
                    task_id,
                    existing_labels,
                    new_labels: created,
                })];
                effects.extend(outbound.into_iter().map(Effect::Dispatch));
                Ok(effects)
            },

            WizardCommand::SkipLabels { id } => {
                let task_id = supervised_task(process, &id, requested)?;
                Ok(smallvec![Effect::Emit(WizardEvent::LabelAssignmentSkipped {
                    id,
                    task_id,
                })])
            },

            WizardCommand::CompleteTaskCreation { id } => {
                let task_id = supervised_task(process, &id, requested)?;
                Ok(smallvec![
                    Effect::Emit(WizardEvent::TaskCreationCompleted {
                        id,
                        task_id: task_id.clone(),
                    }),
                    Effect::Dispatch(WizardOutbound::Task(TaskCommand::FinalizeDraft { task_id })),
                ])
            },

            WizardCommand::CancelTaskCreation { id } => {
                let task_id = supervised_task(process, &id, requested)?;
                Ok(smallvec![Effect::Emit(WizardEvent::TaskCreationCanceled {
                    id,
                    task_id,
                })])
            },
        }
    }

    fn apply(&self, process: TaskCreation, event: &WizardEvent) -> TaskCreation {
        let requested = event.stage();
        let stage = stage::move_if_subsequent(process.stage, requested);

        let (id, task_id) = match event {
            WizardEvent::TaskCreationStarted { id, task_id } => {
                (Some(id.clone()), Some(task_id.clone()))
            },
            _ => (process.id, process.task_id),
        };

        TaskCreation {
            id,
            task_id,
            stage,
            archived: process.archived || stage.is_terminal(),
            version: process.version,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::types::TaskPriority;
    use todo_list_core::environment::Clock;
    use todo_list_testing::{ReducerTest, SequentialIds, assertions, test_clock};
    use uuid::Uuid;

    fn env() -> WizardEnvironment {
        WizardEnvironment::new(Arc::new(SequentialIds::new()), TodoConfig::default())
    }

    fn process_id() -> TaskCreationId {
        TaskCreationId::from_uuid(Uuid::from_u128(100))
    }

    fn task_id() -> TaskId {
        TaskId::from_uuid(Uuid::from_u128(200))
    }

    fn started() -> WizardEvent {
        WizardEvent::TaskCreationStarted {
            id: process_id(),
            task_id: task_id(),
        }
    }

    fn details_updated() -> WizardEvent {
        WizardEvent::TaskDetailsUpdated {
            id: process_id(),
            task_id: task_id(),
            description_change: Some(ValueChange::new(String::new(), "Plan trip".to_string())),
            priority_change: None,
            due_date_change: None,
        }
    }

    fn skipped() -> WizardEvent {
        WizardEvent::LabelAssignmentSkipped {
            id: process_id(),
            task_id: task_id(),
        }
    }

    fn describe(description: &str) -> WizardCommand {
        WizardCommand::UpdateTaskDetails {
            id: process_id(),
            description_change: Some(ValueChange::new(String::new(), description.to_string())),
            priority_change: None,
            due_date_change: None,
        }
    }

    #[test]
    fn start_creates_draft() {
        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .when_command(WizardCommand::StartTaskCreation {
                id: process_id(),
                task_id: task_id(),
            })
            .then_state(|process| {
                assert_eq!(process.stage, TaskCreationStage::TaskDefinition);
                assert_eq!(process.task_id, Some(task_id()));
                assert_eq!(process.id, Some(process_id()));
            })
            .then_outbound(|outbound| {
                assert_eq!(
                    outbound,
                    [WizardOutbound::Task(TaskCommand::CreateDraft {
                        task_id: task_id()
                    })]
                );
            })
            .run();
    }

    #[test]
    fn restarting_is_a_noop() {
        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .given_events(vec![started(), details_updated()])
            .when_command(WizardCommand::StartTaskCreation {
                id: process_id(),
                task_id: TaskId::new(),
            })
            .then_events(assertions::assert_no_events)
            .then_outbound(assertions::assert_no_outbound)
            .then_state(|process| {
                assert_eq!(process.stage, TaskCreationStage::LabelAssignment);
                assert_eq!(process.task_id, Some(task_id()));
            })
            .run();
    }

    #[test]
    fn canceling_an_unstarted_process_is_rejected() {
        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .when_command(WizardCommand::CancelTaskCreation { id: process_id() })
            .then_rejection(|rejection| {
                assert_eq!(
                    rejection,
                    &WizardRejection::CannotMoveToStage {
                        process_id: process_id(),
                        requested: TaskCreationStage::Canceled,
                        current: TaskCreationStage::Undefined,
                    }
                );
            })
            .run();
    }

    #[test]
    fn first_details_need_a_description() {
        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .given_events(vec![started()])
            .when_command(describe("  "))
            .then_rejection(|rejection| {
                assert_eq!(
                    rejection,
                    &WizardRejection::CannotUpdateTaskDetails {
                        process_id: process_id()
                    }
                );
            })
            .then_state(|process| assert_eq!(process.stage, TaskCreationStage::TaskDefinition))
            .run();
    }

    #[test]
    fn first_details_need_the_minimum_length() {
        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .given_events(vec![started()])
            .when_command(describe("ab"))
            .then_rejection(|rejection| {
                assert_eq!(
                    rejection,
                    &WizardRejection::CannotUpdateTaskDetails {
                        process_id: process_id()
                    }
                );
            })
            .then_state(|process| assert_eq!(process.stage, TaskCreationStage::TaskDefinition))
            .run();
    }

    #[test]
    fn minimum_length_follows_config() {
        ReducerTest::new(WizardReducer::new())
            .with_env(WizardEnvironment::new(
                Arc::new(SequentialIds::new()),
                TodoConfig::default().with_min_description_length(2),
            ))
            .given_events(vec![started()])
            .when_command(describe("ab"))
            .then_state(|process| assert_eq!(process.stage, TaskCreationStage::LabelAssignment))
            .then_outbound(|outbound| assertions::assert_outbound_count(outbound, 1))
            .run();
    }

    #[test]
    fn short_description_is_rejected_after_definition() {
        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .given_events(vec![started(), details_updated(), skipped()])
            .when_command(WizardCommand::UpdateTaskDetails {
                id: process_id(),
                description_change: Some(ValueChange::new("Plan trip".to_string(), "x".to_string())),
                priority_change: None,
                due_date_change: None,
            })
            .then_rejection(|rejection| {
                assert!(matches!(rejection, WizardRejection::CannotUpdateTaskDetails { .. }));
            })
            .then_state(|process| assert_eq!(process.stage, TaskCreationStage::Confirmation))
            .run();
    }

    #[test]
    fn details_dispatch_every_change() {
        let due = test_clock().now();

        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .given_events(vec![started()])
            .when_command(WizardCommand::UpdateTaskDetails {
                id: process_id(),
                description_change: Some(ValueChange::new(String::new(), "Plan trip".to_string())),
                priority_change: Some(ValueChange::new(TaskPriority::Undefined, TaskPriority::High)),
                due_date_change: Some(ValueChange::new(None, Some(due))),
            })
            .then_state(|process| assert_eq!(process.stage, TaskCreationStage::LabelAssignment))
            .then_outbound(|outbound| {
                assert!(matches!(
                    outbound,
                    [
                        WizardOutbound::Task(TaskCommand::UpdateTaskDescription { .. }),
                        WizardOutbound::Task(TaskCommand::UpdateTaskPriority { .. }),
                        WizardOutbound::Task(TaskCommand::UpdateTaskDueDate { .. }),
                    ]
                ));
            })
            .run();
    }

    #[test]
    fn resubmitting_details_never_moves_back() {
        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .given_events(vec![started(), details_updated(), skipped()])
            .when_command(WizardCommand::UpdateTaskDetails {
                id: process_id(),
                description_change: Some(ValueChange::new(
                    "Plan trip".to_string(),
                    "Plan a trip".to_string(),
                )),
                priority_change: None,
                due_date_change: None,
            })
            .then_state(|process| assert_eq!(process.stage, TaskCreationStage::Confirmation))
            .then_events(|events| assertions::assert_events_count(events, 1))
            .then_outbound(|outbound| {
                assert!(matches!(
                    outbound,
                    [WizardOutbound::Task(TaskCommand::UpdateTaskDescription { .. })]
                ));
            })
            .run();
    }

    #[test]
    fn later_submissions_may_omit_the_description() {
        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .given_events(vec![started(), details_updated()])
            .when_command(WizardCommand::UpdateTaskDetails {
                id: process_id(),
                description_change: None,
                priority_change: Some(ValueChange::new(TaskPriority::Undefined, TaskPriority::Low)),
                due_date_change: None,
            })
            .then_outbound(|outbound| assertions::assert_outbound_count(outbound, 1))
            .run();
    }

    #[test]
    fn skipping_a_stage_is_rejected() {
        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .given_events(vec![started()])
            .when_command(WizardCommand::SkipLabels { id: process_id() })
            .then_rejection(|rejection| {
                assert_eq!(
                    rejection,
                    &WizardRejection::CannotMoveToStage {
                        process_id: process_id(),
                        requested: TaskCreationStage::Confirmation,
                        current: TaskCreationStage::TaskDefinition,
                    }
                );
            })
            .run();
    }

    #[test]
    fn adding_no_labels_is_rejected() {
        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .given_events(vec![started(), details_updated()])
            .when_command(WizardCommand::AddLabels {
                id: process_id(),
                existing_labels: Vec::new(),
                new_labels: Vec::new(),
            })
            .then_rejection(|rejection| {
                assert!(matches!(rejection, WizardRejection::CannotAddLabels { .. }));
            })
            .then_state(|process| assert_eq!(process.stage, TaskCreationStage::LabelAssignment))
            .run();
    }

    #[test]
    fn new_label_needs_a_title() {
        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .given_events(vec![started(), details_updated()])
            .when_command(WizardCommand::AddLabels {
                id: process_id(),
                existing_labels: vec![LabelId::from_uuid(Uuid::from_u128(300))],
                new_labels: vec![LabelDetails::new("  ", LabelColor::Red)],
            })
            .then_rejection(|rejection| {
                assert!(matches!(rejection, WizardRejection::CannotAddLabels { .. }));
            })
            .then_outbound(assertions::assert_no_outbound)
            .run();
    }

    #[test]
    fn add_labels_creates_colors_and_assigns() {
        let existing = LabelId::from_uuid(Uuid::from_u128(300));
        let generated = LabelId::from_uuid(Uuid::from_u128(1));
        let gray = LabelId::from_uuid(Uuid::from_u128(2));
        let expected = vec![
            WizardOutbound::Task(TaskCommand::AssignLabelToTask {
                task_id: task_id(),
                label_id: existing.clone(),
            }),
            WizardOutbound::Label(LabelCommand::CreateBasicLabel {
                label_id: generated.clone(),
                label_title: "travel".to_string(),
            }),
            WizardOutbound::Label(LabelCommand::UpdateLabelDetails {
                label_id: generated.clone(),
                label_details_change: ValueChange::new(
                    LabelDetails::basic("travel"),
                    LabelDetails::new("travel", LabelColor::Blue),
                ),
            }),
            WizardOutbound::Task(TaskCommand::AssignLabelToTask {
                task_id: task_id(),
                label_id: generated.clone(),
            }),
            WizardOutbound::Label(LabelCommand::CreateBasicLabel {
                label_id: gray.clone(),
                label_title: "later".to_string(),
            }),
            WizardOutbound::Task(TaskCommand::AssignLabelToTask {
                task_id: task_id(),
                label_id: gray.clone(),
            }),
        ];
        let expected_event = WizardEvent::LabelsAdded {
            id: process_id(),
            task_id: task_id(),
            existing_labels: vec![existing.clone()],
            new_labels: vec![generated, gray],
        };

        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .given_events(vec![started(), details_updated()])
            .when_command(WizardCommand::AddLabels {
                id: process_id(),
                existing_labels: vec![existing],
                new_labels: vec![
                    LabelDetails::new("travel", LabelColor::Blue),
                    LabelDetails::basic("later"),
                ],
            })
            .then_outbound(move |outbound| assert_eq!(outbound, expected.as_slice()))
            .then_events(move |events| assert_eq!(events, [expected_event]))
            .then_state(|process| assert_eq!(process.stage, TaskCreationStage::Confirmation))
            .run();
    }

    #[test]
    fn complete_finalizes_draft_and_archives() {
        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .given_events(vec![started(), details_updated(), skipped()])
            .when_command(WizardCommand::CompleteTaskCreation { id: process_id() })
            .then_state(|process| {
                assert_eq!(process.stage, TaskCreationStage::Completed);
                assert!(process.archived);
            })
            .then_outbound(|outbound| {
                assert_eq!(
                    outbound,
                    [WizardOutbound::Task(TaskCommand::FinalizeDraft {
                        task_id: task_id()
                    })]
                );
            })
            .run();
    }

    #[test]
    fn cancel_archives_without_compensation() {
        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .given_events(vec![started(), details_updated()])
            .when_command(WizardCommand::CancelTaskCreation { id: process_id() })
            .then_state(|process| {
                assert_eq!(process.stage, TaskCreationStage::Canceled);
                assert!(process.archived);
            })
            .then_outbound(assertions::assert_no_outbound)
            .run();
    }

    #[test]
    fn terminated_process_rejects_commands() {
        ReducerTest::new(WizardReducer::new())
            .with_env(env())
            .given_events(vec![
                started(),
                WizardEvent::TaskCreationCanceled {
                    id: process_id(),
                    task_id: task_id(),
                },
            ])
            .when_command(describe("Plan trip"))
            .then_rejection(|rejection| {
                assert!(matches!(
                    rejection,
                    WizardRejection::CannotMoveToStage {
                        current: TaskCreationStage::Canceled,
                        ..
                    }
                ));
            })
            .run();
    }

    #[test]
    fn event_types_are_versioned() {
        use todo_list_core::event::Event as _;
        assert_eq!(started().event_type(), "TaskCreationStarted.v1");
        assert_eq!(skipped().id(), &process_id());
    }
}
