//! Event trait for event-sourced entities.
//!
//! Events represent facts about things that have happened in the past and are
//! immutable. Reducers emit them, the runtime appends them to the entity's
//! history and projections consume them.
//!
//! # Example
//!
//! ```
//! use todo_list_core::event::Event;
//!
//! #[derive(Clone, Debug)]
//! enum LabelEvent {
//!     LabelCreated { title: String },
//!     LabelDetailsUpdated { title: String },
//! }
//!
//! impl Event for LabelEvent {
//!     fn event_type(&self) -> &'static str {
//!         match self {
//!             LabelEvent::LabelCreated { .. } => "LabelCreated.v1",
//!             LabelEvent::LabelDetailsUpdated { .. } => "LabelDetailsUpdated.v1",
//!         }
//!     }
//! }
//! ```

/// An event that can be appended to an entity history and replayed to
/// reconstruct state.
///
/// # Event Naming Convention
///
/// The `event_type()` method should return a stable string identifier that
/// includes a version number, e.g. `"TaskCreated.v1"`. `#[derive(Event)]`
/// generates `"<Variant>.v1"` for every variant.
pub trait Event {
    /// Returns the event type identifier for this event.
    fn event_type(&self) -> &'static str;
}
