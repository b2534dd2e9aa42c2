//! Projection system for building and maintaining read models from events.
//!
//! Projections are the **query side of CQRS**. Reducers and the runtime
//! handle the write side (commands → events → state); projections handle the
//! read side (events → denormalized views for queries).
//!
//! ## Example
//!
//! ```ignore
//! use todo_list_core::projection::*;
//!
//! impl Projection for DraftTasksView {
//!     type Event = TodoEvent;
//!
//!     fn name(&self) -> &str {
//!         "draft_tasks"
//!     }
//!
//!     async fn apply_event(&self, event: &Self::Event) -> Result<()> {
//!         match event {
//!             TodoEvent::Task(TaskEvent::TaskDraftCreated { task_id, .. }) => {
//!                 self.drafts.write().await.insert(task_id.clone(), ..);
//!                 Ok(())
//!             }
//!             _ => Ok(()),
//!         }
//!     }
//! }
//! ```

use std::future::Future;

/// Error type for projection operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    /// An event could not be applied to the read model
    #[error("Event processing error in {projection}: {message}")]
    EventProcessing {
        /// Projection that failed
        projection: String,
        /// What went wrong
        message: String,
    },
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;

/// A projection builds and maintains a read model from events.
///
/// # Philosophy
///
/// - **Optimized for Reads**: Shape designed for query patterns, not writes
/// - **Rebuildable**: Can be dropped and rebuilt from events at any time
/// - **Idempotent where possible**: Events may be replayed during a rebuild
pub trait Projection: Send + Sync {
    /// The event type this projection listens to.
    type Event: Send + Sync;

    /// Get the projection name (used for identification and logging).
    fn name(&self) -> &str;

    /// Apply an event to update the projection.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] if the event cannot be applied to the
    /// current read model.
    fn apply_event(&self, event: &Self::Event) -> impl Future<Output = Result<()>> + Send;

    /// Drop all projection data to prepare for a full replay.
    ///
    /// Default implementation is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] if rebuild fails.
    fn rebuild(&self) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
}

/// Build a [`ProjectionError::EventProcessing`] for `projection`.
#[must_use]
pub fn processing_error(projection: &str, message: impl Into<String>) -> ProjectionError {
    ProjectionError::EventProcessing {
        projection: projection.to_string(),
        message: message.into(),
    }
}
