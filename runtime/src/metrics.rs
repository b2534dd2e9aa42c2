//! Metric names recorded by the store runtime.
//!
//! The runtime records through the [`metrics`] facade only. Installing a
//! recorder (Prometheus, statsd, ...) is left to the host binary; without one
//! every call is a no-op.
//!
//! # Example
//!
//! ```ignore
//! use todo_list_runtime::metrics::describe_metrics;
//!
//! // After installing a recorder
//! describe_metrics();
//! ```

use metrics::{Unit, describe_counter};

// Re-export metrics macros for use in other modules
pub use metrics::counter;

/// Commands received by a store, labelled by `store`
pub const COMMANDS_TOTAL: &str = "store.commands.total";

/// Commands rejected by a reducer, labelled by `store`
pub const REJECTIONS_TOTAL: &str = "store.rejections.total";

/// Events appended to entity histories, labelled by `store`
pub const EVENTS_TOTAL: &str = "store.events.total";

/// Commands dispatched to other entities, labelled by `store`
pub const OUTBOUND_TOTAL: &str = "store.outbound.total";

/// Register descriptions for every metric the runtime records.
pub fn describe_metrics() {
    describe_counter!(COMMANDS_TOTAL, Unit::Count, "Commands received by a store");
    describe_counter!(
        REJECTIONS_TOTAL,
        Unit::Count,
        "Commands rejected by a reducer"
    );
    describe_counter!(EVENTS_TOTAL, Unit::Count, "Events appended to entity histories");
    describe_counter!(
        OUTBOUND_TOTAL,
        Unit::Count,
        "Commands dispatched to other entities"
    );
}
