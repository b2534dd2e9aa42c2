//! Optimistic-precondition checks for field updates.
//!
//! Commands that change a field carry the value the sender believes is
//! current ([`ValueChange::previous_value`]). The change is accepted only if
//! that value matches the entity's actual value; otherwise the handler
//! rejects with a [`ValueMismatch`] describing what was expected, what was
//! found and what was about to be written.
//!
//! ```
//! use todo_list::mismatch::{PackedValue, check_change};
//! use todo_list::types::ValueChange;
//! use todo_list_core::stream::Version;
//!
//! let change = ValueChange::new("buy milk".to_string(), "buy oat milk".to_string());
//! let actual = "buy bread".to_string();
//!
//! let mismatch = check_change(&change, &actual, Version::new(4)).unwrap_err();
//! assert_eq!(mismatch.expected, PackedValue::Text("buy milk".to_string()));
//! assert_eq!(mismatch.actual, PackedValue::Text("buy bread".to_string()));
//! assert_eq!(mismatch.version, Version::new(4));
//! ```

use crate::types::{LabelDetails, TaskPriority, ValueChange};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;
use todo_list_core::stream::Version;

/// A field value packed into one type so mismatches compare structurally
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PackedValue {
    /// Text field (task description)
    Text(String),
    /// Optional timestamp (task due date)
    Timestamp(Option<DateTime<Utc>>),
    /// Task priority
    Priority(TaskPriority),
    /// Label title and color
    LabelDetails(LabelDetails),
}

impl fmt::Display for PackedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Timestamp(Some(at)) => write!(f, "{}", at.to_rfc3339()),
            Self::Timestamp(None) => f.write_str("<none>"),
            Self::Priority(priority) => write!(f, "{priority:?}"),
            Self::LabelDetails(details) => write!(f, "{:?} ({:?})", details.title, details.color),
        }
    }
}

/// Expected and actual value of a field disagree
///
/// Only ever built when `actual != expected`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueMismatch {
    /// Value the command expected to replace
    pub expected: PackedValue,
    /// Value the entity actually holds
    pub actual: PackedValue,
    /// Value the command wanted to write
    pub new_value: PackedValue,
    /// Entity version the command was evaluated against
    pub version: Version,
}

impl fmt::Display for ValueMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {} but found {} (new value {}, version {})",
            self.expected, self.actual, self.new_value, self.version
        )
    }
}

/// A field that can be guarded by a [`ValueChange`]
pub trait FieldValue {
    /// Whether `self` and `other` count as the same value
    fn matches(&self, other: &Self) -> bool;

    /// Pack the value for a [`ValueMismatch`]
    fn pack(&self) -> PackedValue;
}

impl FieldValue for String {
    fn matches(&self, other: &Self) -> bool {
        self == other
    }

    fn pack(&self) -> PackedValue {
        PackedValue::Text(self.clone())
    }
}

impl FieldValue for Option<DateTime<Utc>> {
    fn matches(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }

    fn pack(&self) -> PackedValue {
        PackedValue::Timestamp(*self)
    }
}

impl FieldValue for TaskPriority {
    fn matches(&self, other: &Self) -> bool {
        self == other
    }

    fn pack(&self) -> PackedValue {
        PackedValue::Priority(*self)
    }
}

impl FieldValue for LabelDetails {
    fn matches(&self, other: &Self) -> bool {
        self == other
    }

    fn pack(&self) -> PackedValue {
        PackedValue::LabelDetails(self.clone())
    }
}

/// Check `change` against the `actual` value of the field
///
/// # Errors
///
/// Returns a [`ValueMismatch`] when `change.previous_value` does not match
/// `actual`.
pub fn check_change<T: FieldValue>(
    change: &ValueChange<T>,
    actual: &T,
    version: Version,
) -> Result<(), ValueMismatch> {
    if change.previous_value.matches(actual) {
        return Ok(());
    }

    Err(ValueMismatch {
        expected: change.previous_value.pack(),
        actual: actual.pack(),
        new_value: change.new_value.pack(),
        version,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::types::LabelColor;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn matching_previous_value_passes() {
        let change = ValueChange::new(TaskPriority::Low, TaskPriority::High);
        assert!(check_change(&change, &TaskPriority::Low, Version::new(2)).is_ok());
    }

    #[test]
    fn due_dates_compare_by_instant() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let change = ValueChange::new(Some(at), None);

        assert!(check_change(&change, &Some(at), Version::INITIAL).is_ok());

        let mismatch = check_change(&change, &None, Version::new(3)).unwrap_err();
        assert_eq!(mismatch.expected, PackedValue::Timestamp(Some(at)));
        assert_eq!(mismatch.actual, PackedValue::Timestamp(None));
        assert_eq!(mismatch.new_value, PackedValue::Timestamp(None));
    }

    #[test]
    fn label_details_compare_structurally() {
        let change = ValueChange::new(
            LabelDetails::basic("home"),
            LabelDetails::new("home", LabelColor::Blue),
        );
        let actual = LabelDetails::new("home", LabelColor::Red);

        let mismatch = check_change(&change, &actual, Version::new(1)).unwrap_err();
        assert_eq!(mismatch.actual, PackedValue::LabelDetails(actual));
        assert_eq!(
            mismatch.to_string(),
            "expected \"home\" (Gray) but found \"home\" (Red) (new value \"home\" (Blue), version 1)"
        );
    }

    proptest! {
        #[test]
        fn mismatch_packs_all_three_values(
            expected in ".{0,12}",
            actual in ".{0,12}",
            new_value in ".{0,12}",
            version in 0_u64..1000,
        ) {
            prop_assume!(expected != actual);
            let change = ValueChange::new(expected.clone(), new_value.clone());

            let mismatch = check_change(&change, &actual, Version::new(version)).unwrap_err();

            prop_assert_eq!(mismatch.expected, PackedValue::Text(expected));
            prop_assert_eq!(mismatch.actual, PackedValue::Text(actual));
            prop_assert_eq!(mismatch.new_value, PackedValue::Text(new_value));
            prop_assert_eq!(mismatch.version, Version::new(version));
        }

        #[test]
        fn equal_values_never_mismatch(value in ".{0,12}", new_value in ".{0,12}") {
            let change = ValueChange::new(value.clone(), new_value);
            prop_assert!(check_change(&change, &value, Version::INITIAL).is_ok());
        }
    }
}
