//! Configuration for the todo list.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Default minimum length of a task description
pub const DEFAULT_MIN_DESCRIPTION_LENGTH: usize = 3;

/// Default log filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoConfig {
    /// Minimum number of characters (after trimming) a task description
    /// must have (`TODO_MIN_DESCRIPTION_LENGTH`)
    pub min_description_length: usize,
    /// Fallback log filter when `RUST_LOG` is unset (`TODO_LOG_LEVEL`)
    pub log_level: String,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            min_description_length: DEFAULT_MIN_DESCRIPTION_LENGTH,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl TodoConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            min_description_length: lookup("TODO_MIN_DESCRIPTION_LENGTH")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_MIN_DESCRIPTION_LENGTH),
            log_level: lookup("TODO_LOG_LEVEL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Override the minimum description length
    #[must_use]
    pub fn with_min_description_length(mut self, length: usize) -> Self {
        self.min_description_length = length;
        self
    }
}
