//! Label aggregate.
//!
//! Labels are created gray with [`LabelCommand::CreateBasicLabel`] and
//! recolored or renamed through [`LabelCommand::UpdateLabelDetails`], which
//! is guarded by the details the sender believes are current.

use crate::mismatch::{ValueMismatch, check_change};
use crate::types::{LabelDetails, LabelDetailsChange, LabelId};
use serde::{Deserialize, Serialize};
use todo_list_core::{
    Infallible,
    effect::{Effect, Effects},
    reducer::Reducer,
    smallvec,
    stream::Version,
};
use todo_list_macros::{Command, Event, State};

/// State of a single label
#[derive(State, Clone, Debug, Default, PartialEq, Eq)]
pub struct Label {
    /// Label identifier, set on creation
    pub id: Option<LabelId>,
    /// Title and color
    pub details: LabelDetails,
    /// Number of events applied
    #[version]
    pub version: Version,
}

impl Label {
    /// Whether the label has been created
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.id.is_some()
    }
}

/// Commands handled by the label aggregate
#[derive(Command, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[command(target = "label_id")]
pub enum LabelCommand {
    /// Create a gray label with a title
    CreateBasicLabel {
        /// Label to create
        label_id: LabelId,
        /// Title
        label_title: String,
    },

    /// Change title and/or color
    UpdateLabelDetails {
        /// Label to update
        label_id: LabelId,
        /// Expected and new details
        label_details_change: LabelDetailsChange,
    },
}

/// Events emitted by the label aggregate
#[derive(Event, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelEvent {
    /// A label was created
    LabelCreated {
        /// Created label
        label_id: LabelId,
        /// Initial details
        details: LabelDetails,
    },

    /// Title and/or color changed
    LabelDetailsUpdated {
        /// Updated label
        label_id: LabelId,
        /// Previous and new details
        label_details_change: LabelDetailsChange,
    },
}

impl LabelEvent {
    /// Label the event belongs to
    #[must_use]
    pub const fn label_id(&self) -> &LabelId {
        match self {
            Self::LabelCreated { label_id, .. } | Self::LabelDetailsUpdated { label_id, .. } => {
                label_id
            },
        }
    }
}

/// Rejections of label commands
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LabelRejection {
    /// The label was already created
    #[error("Label {label_id} already exists")]
    LabelAlreadyExists {
        /// Existing label
        label_id: LabelId,
    },

    /// Labels need a non-blank title
    #[error("Label {label_id} needs a title")]
    EmptyLabelTitle {
        /// Label to create
        label_id: LabelId,
    },

    /// The label was never created
    #[error("Label {label_id} not found")]
    LabelNotFound {
        /// Unknown label
        label_id: LabelId,
    },

    /// The expected details do not match
    #[error("Cannot update details of label {label_id}: {mismatch}")]
    CannotUpdateLabelDetails {
        /// Label to update
        label_id: LabelId,
        /// Expected, actual and new details
        mismatch: ValueMismatch,
    },
}

/// Reducer for the label aggregate
#[derive(Clone, Debug, Default)]
pub struct LabelReducer;

impl LabelReducer {
    /// Creates a new `LabelReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for LabelReducer {
    type State = Label;
    type Command = LabelCommand;
    type Event = LabelEvent;
    type Outbound = Infallible;
    type Rejection = LabelRejection;
    type Environment = ();

    fn handle(
        &self,
        label: &Label,
        command: LabelCommand,
        _env: &(),
    ) -> Result<Effects<LabelEvent>, LabelRejection> {
        match command {
            LabelCommand::CreateBasicLabel {
                label_id,
                label_title,
            } => {
                if label.exists() {
                    return Err(LabelRejection::LabelAlreadyExists { label_id });
                }
                if label_title.trim().is_empty() {
                    return Err(LabelRejection::EmptyLabelTitle { label_id });
                }

                Ok(smallvec![Effect::Emit(LabelEvent::LabelCreated {
                    label_id,
                    details: LabelDetails::basic(label_title),
                })])
            },
            LabelCommand::UpdateLabelDetails {
                label_id,
                label_details_change,
            } => {
                if !label.exists() {
                    return Err(LabelRejection::LabelNotFound { label_id });
                }
                check_change(&label_details_change, &label.details, label.version).map_err(
                    |mismatch| LabelRejection::CannotUpdateLabelDetails {
                        label_id: label_id.clone(),
                        mismatch,
                    },
                )?;

                Ok(smallvec![Effect::Emit(LabelEvent::LabelDetailsUpdated {
                    label_id,
                    label_details_change,
                })])
            },
        }
    }

    fn apply(&self, label: Label, event: &LabelEvent) -> Label {
        match event {
            LabelEvent::LabelCreated { label_id, details } => Label {
                id: Some(label_id.clone()),
                details: details.clone(),
                ..label
            },
            LabelEvent::LabelDetailsUpdated {
                label_details_change,
                ..
            } => Label {
                details: label_details_change.new_value.clone(),
                ..label
            },
        }
    }
}
