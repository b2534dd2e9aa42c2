//! # Todo List Testing
//!
//! Testing utilities and helpers for the reducer-based todo list.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for events and outbound commands
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use todo_list_testing::{ReducerTest, assertions, test_clock};
//!
//! #[test]
//! fn completes_finalized_task() {
//!     ReducerTest::new(TaskReducer)
//!         .with_env(test_environment())
//!         .given_events(vec![task_created()])
//!         .when_command(TaskCommand::CompleteTask { task_id })
//!         .then_state(|task| assert_eq!(task.definition.status, TaskStatus::Completed))
//!         .then_outbound(assertions::assert_no_outbound)
//!         .run();
//! }
//! ```

use chrono::{DateTime, Utc};
use todo_list_core::environment::{Clock, IdGenerator};
use uuid::Uuid;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc, Uuid};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_list_testing::mocks::FixedClock;
    /// use todo_list_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable identifiers: `00000000-0000-0000-0000-000000000001`,
    /// `...0002`, and so on
    ///
    /// # Example
    ///
    /// ```
    /// use todo_list_testing::mocks::SequentialIds;
    /// use todo_list_core::environment::IdGenerator;
    /// use uuid::Uuid;
    ///
    /// let ids = SequentialIds::new();
    /// assert_eq!(ids.next_id(), Uuid::from_u128(1));
    /// assert_eq!(ids.next_id(), Uuid::from_u128(2));
    /// ```
    #[derive(Debug, Default)]
    pub struct SequentialIds {
        issued: AtomicU64,
    }

    impl SequentialIds {
        /// Start at 1
        #[must_use]
        pub const fn new() -> Self {
            Self {
                issued: AtomicU64::new(0),
            }
        }

        /// Number of identifiers handed out so far
        #[must_use]
        pub fn issued(&self) -> u64 {
            self.issued.load(Ordering::SeqCst)
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> Uuid {
            let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            Uuid::from_u128(u128::from(n))
        }
    }
}

/// Install a `tracing` subscriber for tests
///
/// Filtered by `RUST_LOG`, written through the test harness so output is
/// captured per test. Safe to call from every test; only the first call
/// installs the subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, SequentialIds, test_clock};
pub use reducer_test::{ReducerTest, assertions};
