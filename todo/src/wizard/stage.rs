//! Stages of the task creation wizard and the rules for moving between them.
//!
//! Numbered stages are ordered `TaskDefinition(1) < LabelAssignment(2) <
//! Confirmation(3) < Completed(4)`. `Canceled` sits outside that ordering and
//! can be reached from any started, non-terminal stage.

use super::WizardRejection;
use crate::types::TaskCreationId;
use serde::{Deserialize, Serialize};

/// Stage of a task creation process
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskCreationStage {
    /// Not started
    #[default]
    Undefined,
    /// Description, priority and due date
    TaskDefinition,
    /// Existing or new labels
    LabelAssignment,
    /// Waiting for the user to confirm
    Confirmation,
    /// Draft finalized, process archived
    Completed,
    /// Abandoned, process archived
    Canceled,
}

impl TaskCreationStage {
    /// Position in the stage ordering, `None` for `Canceled`
    #[must_use]
    pub const fn number(self) -> Option<u8> {
        match self {
            Self::Undefined => Some(0),
            Self::TaskDefinition => Some(1),
            Self::LabelAssignment => Some(2),
            Self::Confirmation => Some(3),
            Self::Completed => Some(4),
            Self::Canceled => None,
        }
    }

    /// `Completed` or `Canceled`
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }
}

/// Check whether a process at `current` may handle a command requesting
/// `requested`
///
/// Revisiting the current or an earlier stage is allowed so data can be
/// corrected; the stage itself does not move back (see
/// [`move_if_subsequent`]).
///
/// # Errors
///
/// Returns [`WizardRejection::CannotMoveToStage`] when the process is
/// terminated, when a stage would be skipped, or when an unstarted process
/// is canceled.
pub fn transit(
    process_id: &TaskCreationId,
    current: TaskCreationStage,
    requested: TaskCreationStage,
) -> Result<(), WizardRejection> {
    let permitted = !current.is_terminal()
        && match (current.number(), requested.number()) {
            (Some(0), None) | (None, Some(_)) => false,
            (_, None) => true,
            (Some(current_number), Some(requested_number)) => {
                requested_number <= current_number || requested_number == current_number + 1
            },
        };

    if permitted {
        Ok(())
    } else {
        Err(WizardRejection::CannotMoveToStage {
            process_id: process_id.clone(),
            requested,
            current,
        })
    }
}

/// Stage after a command requesting `requested` succeeded at `current`
///
/// Only moves forward; `Canceled` always applies.
#[must_use]
pub fn move_if_subsequent(
    current: TaskCreationStage,
    requested: TaskCreationStage,
) -> TaskCreationStage {
    match (current.number(), requested.number()) {
        (_, None) => requested,
        (Some(current_number), Some(requested_number)) if requested_number > current_number => {
            requested
        },
        _ => current,
    }
}
