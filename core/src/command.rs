//! Command trait for entity-addressed messages.
//!
//! Every command names the entity it targets. The runtime uses the target to
//! find (or create) the entity and to guarantee a single writer per entity.
//!
//! `#[derive(Command)]` implements this trait for enums whose variants all
//! carry the same target field:
//!
//! ```ignore
//! #[derive(Command, Clone, Debug)]
//! #[command(target = "label_id")]
//! pub enum LabelCommand {
//!     CreateBasicLabel { label_id: LabelId, label_title: String },
//!     UpdateLabelDetails { label_id: LabelId, label_details_change: LabelDetailsChange },
//! }
//! ```

use std::fmt::Display;
use std::hash::Hash;

/// A command addressed to one entity.
pub trait Command {
    /// Identifier type of the targeted entity
    type Target: Clone + Eq + Hash + Display + Send + Sync;

    /// The entity this command is addressed to
    fn target(&self) -> &Self::Target;

    /// Stable name of the command, used for logging and metrics
    fn command_type(&self) -> &'static str;
}
