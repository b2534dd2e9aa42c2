//! Entity stream versioning.
//!
//! Every entity owns a stream of events. The runtime bumps the entity's
//! [`Version`] once per applied event; reducers read it to report the
//! version a rejected command was evaluated against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event version number of an entity stream.
///
/// Versions start at 0 (no events) and increment by 1 for each event applied
/// to the entity.
///
/// # Examples
///
/// ```
/// use todo_list_core::stream::Version;
///
/// let v0 = Version::new(0);
/// let v1 = v0.next();
/// assert_eq!(v1, Version::new(1));
///
/// let v5 = Version::new(5);
/// assert_eq!(v5.value(), 5);
/// ```
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version(u64);

impl Version {
    /// The initial version (0) of an entity without events.
    pub const INITIAL: Self = Self(0);

    /// Create a new `Version` with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the version number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Get the next version (current + 1).
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Check if this is the initial version (0).
    #[must_use]
    pub const fn is_initial(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Version {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Version> for u64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

/// State that carries the version of its entity stream.
///
/// Implemented by `#[derive(State)]` for structs with a `#[version]` field.
pub trait Versioned {
    /// Current version of the entity
    fn version(&self) -> Version;

    /// Overwrite the version; called by the runtime after applying an event
    fn set_version(&mut self, version: Version);
}
