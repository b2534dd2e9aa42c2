//! Domain types shared by tasks, labels and the task creation wizard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            #[doc = concat!("Creates a new random `", stringify!($name), "`")]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[doc = concat!("Creates a `", stringify!($name), "` from a UUID")]
            #[must_use]
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Returns the inner UUID
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a task
    TaskId
);

uuid_id!(
    /// Unique identifier for a label
    LabelId
);

uuid_id!(
    /// Unique identifier for a task creation process (wizard)
    TaskCreationId
);

/// Lifecycle status of a task
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Task does not exist yet
    #[default]
    Undefined,
    /// Created by the wizard, not yet finalized
    Draft,
    /// Reopened or restored
    Open,
    /// Created directly or finalized from a draft
    Finalized,
    /// Done
    Completed,
    /// Deleted, restorable unless it was a draft
    Deleted,
}

impl TaskStatus {
    /// Every status, in declaration order
    pub const ALL: [Self; 6] = [
        Self::Undefined,
        Self::Draft,
        Self::Open,
        Self::Finalized,
        Self::Completed,
        Self::Deleted,
    ];
}

/// Priority of a task
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    /// No priority set
    #[default]
    Undefined,
    /// Low priority
    Low,
    /// Normal priority
    Normal,
    /// High priority
    High,
}

/// Color of a label
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelColor {
    /// No color set
    #[default]
    Undefined,
    /// Color of labels created through `CreateBasicLabel`
    Gray,
    /// Red
    Red,
    /// Green
    Green,
    /// Blue
    Blue,
}

impl LabelColor {
    /// Color given to basic labels
    pub const BASIC: Self = Self::Gray;
}

/// Title and color of a label
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelDetails {
    /// Label title
    pub title: String,
    /// Label color
    pub color: LabelColor,
}

impl LabelDetails {
    /// Details with an explicit color
    #[must_use]
    pub fn new(title: impl Into<String>, color: LabelColor) -> Self {
        Self {
            title: title.into(),
            color,
        }
    }

    /// Details of a basic (gray) label
    #[must_use]
    pub fn basic(title: impl Into<String>) -> Self {
        Self::new(title, LabelColor::BASIC)
    }
}

/// A field change guarded by the value the sender believes is current
///
/// The change is applied only if `previous_value` matches the entity's
/// actual value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueChange<T> {
    /// Value the sender expects to replace
    pub previous_value: T,
    /// Value to set
    pub new_value: T,
}

impl<T> ValueChange<T> {
    /// Create a change from `previous_value` to `new_value`
    pub const fn new(previous_value: T, new_value: T) -> Self {
        Self {
            previous_value,
            new_value,
        }
    }
}

/// Change of a task description
pub type DescriptionChange = ValueChange<String>;

/// Change of a task due date (`None` means no due date)
pub type DueDateChange = ValueChange<Option<DateTime<Utc>>>;

/// Change of a task priority
pub type PriorityChange = ValueChange<TaskPriority>;

/// Change of label details
pub type LabelDetailsChange = ValueChange<LabelDetails>;
