//! # Quadra Core
//!
//! Core traits and types for the Quadra booking architecture.
//!
//! This crate provides the fundamental abstractions for building the
//! booking features as pure, testable state machines:
//!
//! - **State**: owned domain state for a feature
//! - **Action**: all possible inputs to a reducer (commands and the events
//!   produced by effects)
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side-effect descriptions (values, not execution)
//! - **Environment**: injected dependencies behind traits
//!
//! The runtime crate interprets effects; nothing in this crate performs I/O.
//!
//! ## Example
//!
//! ```ignore
//! use quadra_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = CounterEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         env: &CounterEnvironment,
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => {
//!                 state.count += 1;
//!                 smallvec![Effect::None]
//!             }
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - the core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime. Most reductions return
        /// zero or one effect, hence the inline capacity of four.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side-effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable and cancellable.
pub mod effect {
    use futures::stream::Stream;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Boxed future producing an optional feedback action.
    pub type ActionFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Boxed stream of feedback actions.
    ///
    /// Used for long-lived subscriptions: every yielded action is fed back
    /// into the store until the stream ends or the effect is cancelled.
    pub type ActionStream<Action> = Pin<Box<dyn Stream<Item = Action> + Send>>;

    /// Identifier for a cancellable effect.
    ///
    /// Starting a new [`Effect::Cancellable`] with an id that is already
    /// in flight cancels the previous effect; [`Effect::Cancel`] with the
    /// same id cancels it explicitly. Ids are plain strings so features can
    /// use stable, readable keys (e.g. `"reservations-watch"`).
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct EffectId(String);

    impl EffectId {
        /// Create a new `EffectId` from a string.
        #[must_use]
        pub fn new(id: impl Into<String>) -> Self {
            Self(id.into())
        }

        /// Get the id as a string slice.
        #[must_use]
        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl std::fmt::Display for EffectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl From<&str> for EffectId {
        fn from(id: &str) -> Self {
            Self(id.to_string())
        }
    }

    impl From<String> for EffectId {
        fn from(id: String) -> Self {
            Self(id)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back
        /// into the reducer
        Future(ActionFuture<Action>),

        /// Long-lived stream of feedback actions
        ///
        /// Every item is dispatched to the store as it arrives. The effect
        /// completes when the stream ends. Wrap in [`Effect::Cancellable`]
        /// when the consumer must be able to detach.
        Stream(ActionStream<Action>),

        /// An effect that can be cancelled by id
        ///
        /// Registering a new cancellable effect under an id that is still
        /// running cancels the previous one first.
        Cancellable {
            /// Cancellation key
            id: EffectId,
            /// The effect to run under this key
            effect: Box<Effect<Action>>,
        },

        /// Cancel the in-flight effect registered under the given id
        ///
        /// A no-op if nothing is registered under the id; cancelling twice
        /// is safe.
        Cancel(EffectId),
    }

    // Manual Debug implementation since Future/Stream don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Stream(_) => write!(f, "Effect::Stream(<stream>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap this effect so it can be cancelled under `id`
        #[must_use]
        pub fn cancellable(self, id: impl Into<EffectId>) -> Effect<Action> {
            Effect::Cancellable {
                id: id.into(),
                effect: Box::new(self),
            }
        }
    }
}

/// Environment module - dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter of a reducer.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Production code uses [`SystemClock`]; tests inject a fixed clock so
    /// stamped dates are deterministic.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// System clock backed by [`Utc::now`].
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
