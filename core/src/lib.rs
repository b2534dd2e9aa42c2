//! # Todo List Core
//!
//! Core traits and types for the reducer-based todo list.
//!
//! This crate provides the abstractions the domain is written against: a
//! pure [`reducer::Reducer`] that turns commands into effects, effect
//! descriptions, versioning for entity streams, injected environment traits
//! and the read-model [`projection::Projection`] trait.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state of a single entity (task, label, wizard)
//! - **Command**: A request addressed to one entity, identified by its target id
//! - **Event**: An immutable fact produced by a command
//! - **Reducer**: `handle(State, Command, Environment) → Result<Effects, Rejection>`
//!   and `apply(State, Event) → State`
//! - **Effect**: Either an event to record or a command for another entity
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```ignore
//! use todo_list_core::*;
//!
//! impl Reducer for LabelReducer {
//!     type State = Label;
//!     type Command = LabelCommand;
//!     type Event = LabelEvent;
//!     type Outbound = Infallible;
//!     type Rejection = LabelRejection;
//!     type Environment = ();
//!
//!     fn handle(&self, state: &Label, command: LabelCommand, _env: &())
//!         -> Result<Effects<LabelEvent>, LabelRejection> {
//!         // Validate the command against the current state
//!         Ok(smallvec![Effect::Emit(LabelEvent::LabelCreated { .. })])
//!     }
//!
//!     fn apply(&self, state: Label, event: &LabelEvent) -> Label {
//!         // Fold the event into the state
//!         state
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};
pub use std::convert::Infallible;

/// Command trait - messages addressed to a single entity
pub mod command;

/// Event trait - immutable facts produced by reducers
pub mod event;

/// Projection trait - read models built from events
pub mod projection;

/// Entity stream versioning
pub mod stream;

/// Reducer module - The core trait for business logic
///
/// Reducers are split in two halves:
///
/// - `handle`: validates a command against the current state and describes
///   what happens (events to record, commands for other entities), or
///   returns a typed rejection
/// - `apply`: folds one event into the state; pure and infallible
///
/// The host runtime invokes `apply` for every emitted event and takes care
/// of versioning and history around it.
pub mod reducer {
    use super::effect::Effects;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The entity state this reducer operates on
    /// - `Command`: The commands this reducer handles
    /// - `Event`: The events this reducer emits and applies
    /// - `Outbound`: Commands this reducer sends to other entities
    ///   (`Infallible` for plain aggregates)
    /// - `Rejection`: The typed business rejection
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The command type this reducer handles
        type Command;

        /// The event type this reducer emits and applies
        type Event;

        /// Commands dispatched to other entities
        type Outbound;

        /// The rejection returned when a command cannot be accepted
        type Rejection;

        /// The environment type with injected dependencies
        type Environment;

        /// Handle a command against the current state
        ///
        /// This is a pure function that:
        /// 1. Validates the command against `state`
        /// 2. Returns effect descriptions (events, outbound commands)
        ///
        /// It never mutates state; the runtime applies the emitted events.
        ///
        /// # Errors
        ///
        /// Returns `Self::Rejection` when the command can never succeed
        /// against the current state. Rejections are permanent: resending
        /// the same command reproduces the same rejection.
        fn handle(
            &self,
            state: &Self::State,
            command: Self::Command,
            env: &Self::Environment,
        ) -> Result<Effects<Self::Event, Self::Outbound>, Self::Rejection>;

        /// Fold an event into the state, returning the new state
        #[must_use]
        fn apply(&self, state: Self::State, event: &Self::Event) -> Self::State;

        /// Fold a sequence of events into `state`
        #[must_use]
        fn replay<'a, I>(&self, state: Self::State, events: I) -> Self::State
        where
            I: IntoIterator<Item = &'a Self::Event>,
            Self::Event: 'a,
        {
            events
                .into_iter()
                .fold(state, |state, event| self.apply(state, event))
        }
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values returned by reducers. The runtime records emitted
/// events and hands dispatched commands back to the host for delivery.
pub mod effect {
    use smallvec::SmallVec;
    use std::convert::Infallible;

    /// Effect type - describes what a handled command causes
    ///
    /// # Type Parameters
    ///
    /// - `Event`: Events recorded on the handling entity
    /// - `Command`: Commands delivered to other entities
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Effect<Event, Command = Infallible> {
        /// Record an event on the handling entity
        Emit(Event),

        /// Deliver a command to another entity
        Dispatch(Command),
    }

    /// Effects returned from a single `handle` call
    pub type Effects<Event, Command = Infallible> = SmallVec<[Effect<Event, Command>; 4]>;

    impl<Event, Command> Effect<Event, Command> {
        /// Returns the event if this effect records one
        #[must_use]
        pub const fn as_event(&self) -> Option<&Event> {
            match self {
                Self::Emit(event) => Some(event),
                Self::Dispatch(_) => None,
            }
        }

        /// Returns the command if this effect dispatches one
        #[must_use]
        pub const fn as_command(&self) -> Option<&Command> {
            match self {
                Self::Emit(_) => None,
                Self::Dispatch(command) => Some(command),
            }
        }

        /// Split effects into recorded events and dispatched commands,
        /// preserving order within each group
        #[must_use]
        pub fn partition<I>(effects: I) -> (Vec<Event>, Vec<Command>)
        where
            I: IntoIterator<Item = Self>,
        {
            let mut events = Vec::new();
            let mut commands = Vec::new();
            for effect in effects {
                match effect {
                    Self::Emit(event) => events.push(event),
                    Self::Dispatch(command) => commands.push(command),
                }
            }
            (events, commands)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - uses system clock
    /// struct SystemClock;
    /// impl Clock for SystemClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         Utc::now()
    ///     }
    /// }
    ///
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Id generator - abstracts identifier creation for new entities
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier
        fn next_id(&self) -> Uuid;
    }

    /// Random (v4) identifiers
    #[derive(Clone, Copy, Debug, Default)]
    pub struct RandomIds;

    impl IdGenerator for RandomIds {
        fn next_id(&self) -> Uuid {
            Uuid::new_v4()
        }
    }
}
