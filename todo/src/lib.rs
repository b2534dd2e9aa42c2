//! # Todo List
//!
//! Task lifecycle management, labels and a multi-stage task creation wizard,
//! written as pure reducers and hosted by the todo list runtime.
//!
//! ## Modules
//!
//! - [`task`]: the task aggregate, its status transition table and the
//!   named status checks every command handler uses
//! - [`label`]: the label aggregate
//! - [`wizard`]: the task creation process manager
//! - [`mismatch`]: "previous value" checks for field updates
//! - [`projections`]: read models
//! - [`context`]: routes commands between the aggregates and feeds the read
//!   models
//!
//! ## Example
//!
//! ```ignore
//! use todo_list::{TodoContext, TodoConfig, task::TaskCommand, types::TaskId};
//!
//! let context = TodoContext::new(TodoConfig::from_env(), Arc::new(SystemClock), Arc::new(RandomIds));
//! let task_id = TaskId::new();
//!
//! context.post(TaskCommand::CreateBasicTask {
//!     task_id: task_id.clone(),
//!     description: "Buy milk".to_string(),
//! }).await?;
//!
//! context.post(TaskCommand::CompleteTask { task_id }).await?;
//! ```

pub mod config;
pub mod context;
pub mod label;
pub mod message;
pub mod mismatch;
pub mod projections;
pub mod task;
pub mod types;
pub mod wizard;

pub use config::TodoConfig;
pub use context::{Receipt, Rejection, TodoContext, TodoError};
pub use message::{TodoCommand, TodoEvent};
