//! Read models of the todo list.
//!
//! Every view implements [`Projection`](todo_list_core::projection::Projection)
//! over [`TodoEvent`](crate::message::TodoEvent) and keeps its data in memory
//! behind a `tokio` lock. Views are fed by
//! [`TodoContext`](crate::context::TodoContext) in event order and can be
//! cleared with `rebuild()` before a replay.

/// Drafts currently being built
pub mod drafts;

/// Labels and the tasks carrying them
pub mod labelled;

/// The user's visible task list
pub mod my_list;

pub use drafts::{DraftTask, DraftTasksView};
pub use labelled::{LabelledTask, LabelledTasks, LabelledTasksView};
pub use my_list::{MyListItem, MyListView};
