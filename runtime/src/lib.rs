//! # Todo List Runtime
//!
//! Runtime for the reducer-based todo list.
//!
//! This crate provides the [`Store`] that owns every entity of one kind
//! (tasks, labels, wizards), feeds commands through the reducer, applies the
//! emitted events and hands outbound commands back to the caller.
//!
//! ## Core Components
//!
//! - **Store**: Entity state and history keyed by command target
//! - **Dispatched**: What an accepted command produced
//! - **Metrics**: Counter names recorded through the `metrics` facade
//!
//! ## Example
//!
//! ```ignore
//! use todo_list_runtime::Store;
//!
//! let labels = Store::new("labels", LabelReducer, ());
//!
//! // Send a command
//! let dispatched = labels.send(LabelCommand::CreateBasicLabel { .. }).await?;
//!
//! // Read state
//! let title = labels.state(&label_id, |l| l.details.title.clone()).await;
//! ```

use todo_list_core::{
    command::Command,
    effect::Effect,
    event::Event,
    reducer::Reducer,
    stream::{Version, Versioned},
};

/// Metric names and descriptions
pub mod metrics;

pub use store::{Dispatched, Store};

/// Store module - The runtime for reducers
pub mod store {
    use super::{Command, Effect, Event, Reducer, Version, Versioned};
    use crate::metrics::{COMMANDS_TOTAL, EVENTS_TOTAL, OUTBOUND_TOTAL, REJECTIONS_TOTAL};
    use std::collections::HashMap;
    use std::fmt::Display;
    use tokio::sync::RwLock;

    type Target<R> = <<R as Reducer>::Command as Command>::Target;

    /// State and event history of a single entity
    #[derive(Debug)]
    struct Entity<S, E> {
        state: S,
        history: Vec<E>,
    }

    /// Outcome of an accepted command
    ///
    /// - `events`: Events appended to the entity, in emission order
    /// - `outbound`: Commands the reducer dispatched to other entities,
    ///   in emission order. The store does not deliver them.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Dispatched<E, C> {
        /// Events appended to the target entity
        pub events: Vec<E>,
        /// Commands for other entities, to be delivered by the caller
        pub outbound: Vec<C>,
    }

    impl<E, C> Dispatched<E, C> {
        /// True when the command changed nothing and dispatched nothing
        #[must_use]
        pub fn is_noop(&self) -> bool {
            self.events.is_empty() && self.outbound.is_empty()
        }
    }

    /// The Store - runtime coordinator for one kind of entity
    ///
    /// Every entity is addressed by the target of the commands sent to it.
    /// Entities that never accepted an event read as absent; commands for
    /// them are handled against `State::default()`.
    ///
    /// # Type Parameters
    ///
    /// - `R`: Reducer implementation
    ///
    /// # Concurrency
    ///
    /// - Commands are handled while holding a write lock, so each entity
    ///   (and the store as a whole) has exactly one writer at a time
    /// - Events of one command are appended atomically: readers never see
    ///   a partially applied command
    ///
    /// # Example
    ///
    /// ```ignore
    /// let tasks = Store::new("tasks", TaskReducer, TaskEnvironment::new(config));
    ///
    /// tasks.send(TaskCommand::CreateBasicTask {
    ///     task_id,
    ///     description: "Buy milk".to_string(),
    /// }).await?;
    /// ```
    pub struct Store<R>
    where
        R: Reducer,
        R::Command: Command,
    {
        name: &'static str,
        entities: RwLock<HashMap<Target<R>, Entity<R::State, R::Event>>>,
        reducer: R,
        environment: R::Environment,
    }

    impl<R> Store<R>
    where
        R: Reducer,
        R::Command: Command,
        R::State: Clone + Default + Versioned,
        R::Event: Clone + Event,
        R::Rejection: Display,
    {
        /// Create an empty store
        ///
        /// # Arguments
        ///
        /// - `name`: Store name used in logs and metric labels
        /// - `reducer`: The reducer implementation (business logic)
        /// - `environment`: Injected dependencies
        #[must_use]
        pub fn new(name: &'static str, reducer: R, environment: R::Environment) -> Self {
            Self {
                name,
                entities: RwLock::new(HashMap::new()),
                reducer,
                environment,
            }
        }

        /// Store name
        #[must_use]
        pub const fn name(&self) -> &'static str {
            self.name
        }

        /// Send a command to the entity it targets
        ///
        /// This method:
        /// 1. Handles the command against the current state of the target
        /// 2. On acceptance, applies every emitted event in order, bumping
        ///    the entity version once per event and appending it to history
        /// 3. Returns the events and the outbound commands
        ///
        /// A command that is accepted without events leaves the entity
        /// untouched.
        ///
        /// # Errors
        ///
        /// Returns the reducer's rejection. Nothing is applied in that case.
        #[tracing::instrument(
            skip(self, command),
            name = "store_send",
            fields(
                store = self.name,
                command = command.command_type(),
                target = %command.target(),
            )
        )]
        pub async fn send(
            &self,
            command: R::Command,
        ) -> Result<Dispatched<R::Event, R::Outbound>, R::Rejection> {
            metrics::counter!(COMMANDS_TOTAL, "store" => self.name).increment(1);

            let target = command.target().clone();
            let mut entities = self.entities.write().await;

            let default_state;
            let state = match entities.get(&target) {
                Some(entity) => &entity.state,
                None => {
                    default_state = R::State::default();
                    &default_state
                },
            };

            let effects = match self.reducer.handle(state, command, &self.environment) {
                Ok(effects) => effects,
                Err(rejection) => {
                    metrics::counter!(REJECTIONS_TOTAL, "store" => self.name).increment(1);
                    tracing::info!(%rejection, "Command rejected");
                    return Err(rejection);
                },
            };

            let (events, outbound) = Effect::partition(effects);

            if !events.is_empty() {
                let entity = entities.entry(target).or_insert_with(|| Entity {
                    state: R::State::default(),
                    history: Vec::new(),
                });
                let mut state = std::mem::take(&mut entity.state);
                for event in &events {
                    tracing::trace!(event = event.event_type(), "Applying event");
                    state = self.apply_versioned(state, event);
                    entity.history.push(event.clone());
                }
                entity.state = state;
            }

            metrics::counter!(EVENTS_TOTAL, "store" => self.name).increment(events.len() as u64);
            metrics::counter!(OUTBOUND_TOTAL, "store" => self.name)
                .increment(outbound.len() as u64);

            tracing::debug!(
                events = events.len(),
                outbound = outbound.len(),
                "Command accepted"
            );

            Ok(Dispatched { events, outbound })
        }

        /// Read the state of one entity via a closure
        ///
        /// Returns `None` for entities that never accepted an event.
        ///
        /// ```ignore
        /// let status = tasks.state(&task_id, |t| t.definition.status).await;
        /// ```
        pub async fn state<F, T>(&self, id: &Target<R>, f: F) -> Option<T>
        where
            F: FnOnce(&R::State) -> T,
        {
            let entities = self.entities.read().await;
            entities.get(id).map(|entity| f(&entity.state))
        }

        /// Snapshot of the current state of one entity
        pub async fn snapshot(&self, id: &Target<R>) -> Option<R::State> {
            self.state(id, Clone::clone).await
        }

        /// Every event appended to one entity, oldest first
        pub async fn history(&self, id: &Target<R>) -> Vec<R::Event> {
            let entities = self.entities.read().await;
            entities
                .get(id)
                .map(|entity| entity.history.clone())
                .unwrap_or_default()
        }

        /// Rebuild the state of one entity from its history alone
        ///
        /// Produces the same state (version included) as the live entity.
        pub async fn rehydrate(&self, id: &Target<R>) -> Option<R::State> {
            let entities = self.entities.read().await;
            entities.get(id).map(|entity| {
                entity
                    .history
                    .iter()
                    .fold(R::State::default(), |state, event| {
                        self.apply_versioned(state, event)
                    })
            })
        }

        /// Number of entities with at least one event
        pub async fn len(&self) -> usize {
            self.entities.read().await.len()
        }

        /// True when no entity has accepted an event yet
        pub async fn is_empty(&self) -> bool {
            self.entities.read().await.is_empty()
        }

        fn apply_versioned(&self, state: R::State, event: &R::Event) -> R::State {
            let mut state = self.reducer.apply(state, event);
            let version: Version = state.version().next();
            state.set_version(version);
            state
        }
    }
}
