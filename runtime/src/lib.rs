//! # Quadra Runtime
//!
//! Runtime implementation for the Quadra booking architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: the runtime that manages state and executes effects
//! - **Effect execution**: interprets effect descriptions and feeds the
//!   actions they produce back into the reducer
//! - **Keyed cancellation**: long-lived effects (subscriptions) registered
//!   under an [`EffectId`] can be detached at any time
//!
//! ## Example
//!
//! ```ignore
//! use quadra_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use futures::StreamExt;
use quadra_core::effect::{Effect, EffectId};
use quadra_core::reducer::Reducer;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, oneshot, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown
        /// initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        ///
        /// The action broadcast channel was closed, typically because the
        /// store is shutting down.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Internal: tracks in-flight effects spawned for one `send` call
///
/// Cloned into every effect task; the counter reaching zero notifies the
/// matching [`EffectHandle`].
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

impl Clone for EffectTracking {
    fn clone(&self) -> Self {
        Self {
            counter: Arc::clone(&self.counter),
            notifier: self.notifier.clone(),
        }
    }
}

/// Handle for awaiting completion of the effects started by one `send`
///
/// `send()` returns after *starting* effect execution; use this handle when
/// a caller needs to wait for the directly-spawned effects to finish.
/// Feedback actions produced by those effects start their own effects,
/// which are not tracked by this handle.
pub struct EffectHandle {
    counter: Arc<AtomicUsize>,
    receiver: watch::Receiver<()>,
}

impl EffectHandle {
    /// Wait until all directly-spawned effects have completed
    pub async fn wait(mut self) {
        while self.counter.load(Ordering::SeqCst) > 0 {
            if self.receiver.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for effect completion with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running when
    /// the timeout expires.
    pub async fn wait_with_timeout(self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }

    /// Number of directly-spawned effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Ensures the counter is always decremented, even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Internal: one registered cancellable effect
///
/// The generation distinguishes the current occupant of an id from an
/// earlier one that has since been replaced, so natural completion only
/// deregisters its own entry.
struct CancelEntry {
    generation: u64,
    cancel: oneshot::Sender<()>,
}

type CancelRegistry = Arc<Mutex<HashMap<EffectId, CancelEntry>>>;

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop and keyed cancellation)
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
    cancellables: CancelRegistry,
    cancel_generation: Arc<AtomicU64>,
    /// Action broadcast channel for observing actions produced by effects.
    ///
    /// All actions produced by effects (e.g. from `Effect::Future` or
    /// `Effect::Stream`) are broadcast to observers. This enables
    /// request-response waiting and test synchronisation.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// The action broadcast capacity defaults to 16; increase it with
    /// [`Store::with_broadcast_capacity`] if observers frequently lag.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
    }

    /// Create a new Store with custom action broadcast capacity
    ///
    /// # Arguments
    ///
    /// - `initial_state`: The starting state for the store
    /// - `reducer`: The reducer implementation (business logic)
    /// - `environment`: Injected dependencies
    /// - `capacity`: Action broadcast channel capacity
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
            cancellables: Arc::new(Mutex::new(HashMap::new())),
            cancel_generation: Arc::new(AtomicU64::new(0)),
            action_broadcast,
        }
    }

    /// Send an action to the store
    ///
    /// This is the primary way to interact with the store:
    /// 1. Acquires write lock on state
    /// 2. Calls reducer with (state, action, environment)
    /// 3. Executes returned effects asynchronously
    /// 4. Effects may produce more actions (feedback loop)
    ///
    /// Multiple concurrent `send()` calls serialize at the reducer level;
    /// effects complete in non-deterministic order.
    ///
    /// # Returns
    ///
    /// An [`EffectHandle`] that can be used to wait for effect completion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            return Err(StoreError::ShutdownInProgress);
        }

        let (notifier, receiver) = watch::channel(());
        let tracking = EffectTracking {
            counter: Arc::new(AtomicUsize::new(0)),
            notifier,
        };
        let handle = EffectHandle {
            counter: Arc::clone(&tracking.counter),
            receiver,
        };

        let effects = {
            let mut state = self.state.write().await;

            let span = tracing::debug_span!("reducer_execution");
            let _enter = span.enter();
            self.reducer.reduce(&mut *state, action, &self.environment)
        };

        tracing::trace!("Reducer completed, executing {} effects", effects.len());
        for effect in effects {
            self.spawn_effect(effect, tracking.clone());
        }

        Ok(handle)
    }

    /// Send an action and wait for a matching result action
    ///
    /// This method is designed for request-response patterns: it subscribes
    /// to the action broadcast *before* sending (avoiding race conditions),
    /// sends the initial action, then waits for an action matching the
    /// predicate.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: timeout expired before a matching action
    /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
    /// - [`StoreError::ShutdownInProgress`]: the store is shutting down
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        let mut receiver = self.action_broadcast.subscribe();
        self.send(action).await?;

        tokio::time::timeout(timeout, async move {
            loop {
                match receiver.recv().await {
                    Ok(candidate) if predicate(&candidate) => return Ok(candidate),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    /// Subscribe to actions produced by effects
    ///
    /// Returns a broadcast receiver yielding every feedback action in the
    /// order the runtime dispatched it.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure to ensure the lock is released
    /// promptly:
    ///
    /// ```ignore
    /// let count = store.state(|s| s.reservations.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&*state)
    }

    /// Initiate graceful shutdown of the store
    ///
    /// This method:
    /// 1. Sets the shutdown flag (rejecting new actions)
    /// 2. Cancels all keyed effects (detaching subscriptions)
    /// 3. Waits for pending effects to complete (with timeout)
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before
    /// all pending effects complete.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");

        self.shutdown.store(true, Ordering::Release);

        // Detach subscriptions first, otherwise infinite streams would
        // keep the pending counter above zero forever.
        let entries: Vec<(EffectId, CancelEntry)> = {
            let mut registry = self
                .cancellables
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            registry.drain().collect()
        };
        for (id, entry) in entries {
            tracing::debug!(effect_id = %id, "Cancelling effect for shutdown");
            let _ = entry.cancel.send(());
        }

        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(100);

        loop {
            let pending = self.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(pending_effects = pending, "Shutdown timed out");
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Start executing an effect, attributing it to `tracking`
    ///
    /// `None` and `Cancel` resolve synchronously; everything else runs on
    /// a spawned task.
    fn spawn_effect(&self, effect: Effect<A>, tracking: EffectTracking) {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
            },
            Effect::Parallel(effects) => {
                for effect in effects {
                    self.spawn_effect(effect, tracking.clone());
                }
            },
            Effect::Cancel(id) => {
                self.cancel_effect(&id);
            },
            other => {
                tracking.increment();

                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                let store = self.clone();
                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking);
                    let _pending_guard = pending_guard;
                    Self::run_effect(store, other).await;
                });
            },
        }
    }

    /// Cancel the effect registered under `id`, if any
    ///
    /// Safe to call when nothing is registered; cancelling twice is a no-op.
    fn cancel_effect(&self, id: &EffectId) {
        let entry = {
            let mut registry = self
                .cancellables
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            registry.remove(id)
        };
        match entry {
            Some(entry) => {
                tracing::debug!(effect_id = %id, "Cancelling effect");
                let _ = entry.cancel.send(());
            },
            None => {
                tracing::trace!(effect_id = %id, "Cancel requested for unknown effect id");
            },
        }
    }

    /// Run an effect to completion inside an already-spawned task
    ///
    /// Boxed for async recursion (`Parallel`/`Sequential`/`Cancellable`
    /// nest arbitrarily).
    fn run_effect(store: Self, effect: Effect<A>) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(async move {
            match effect {
                Effect::None => {},
                Effect::Parallel(effects) => {
                    let children: Vec<_> = effects
                        .into_iter()
                        .map(|effect| Self::run_effect(store.clone(), effect))
                        .collect();
                    futures::future::join_all(children).await;
                },
                Effect::Sequential(effects) => {
                    for effect in effects {
                        Self::run_effect(store.clone(), effect).await;
                    }
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                    tokio::time::sleep(duration).await;
                    store.dispatch(*action).await;
                },
                Effect::Future(future) => {
                    tracing::trace!("Executing Effect::Future");
                    if let Some(action) = future.await {
                        store.dispatch(action).await;
                    }
                },
                Effect::Stream(mut stream) => {
                    tracing::trace!("Executing Effect::Stream");
                    while let Some(action) = stream.next().await {
                        store.dispatch(action).await;
                    }
                    tracing::trace!("Effect::Stream ended");
                },
                Effect::Cancellable { id, effect } => {
                    let (cancel, cancelled) = oneshot::channel();
                    let generation = store.cancel_generation.fetch_add(1, Ordering::SeqCst);

                    let previous = {
                        let mut registry = store
                            .cancellables
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner);
                        registry.insert(id.clone(), CancelEntry { generation, cancel })
                    };
                    if let Some(previous) = previous {
                        tracing::debug!(effect_id = %id, "Replacing in-flight cancellable effect");
                        let _ = previous.cancel.send(());
                    }

                    tokio::select! {
                        _ = cancelled => {
                            tracing::debug!(effect_id = %id, "Cancellable effect cancelled");
                        },
                        () = Self::run_effect(store.clone(), *effect) => {
                            // Completed naturally: deregister, but only our
                            // own generation (a replacement may have taken
                            // the id in the meantime).
                            let mut registry = store
                                .cancellables
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner);
                            if registry
                                .get(&id)
                                .is_some_and(|entry| entry.generation == generation)
                            {
                                registry.remove(&id);
                            }
                        },
                    }
                },
                Effect::Cancel(id) => {
                    store.cancel_effect(&id);
                },
            }
        })
    }

    /// Feed a feedback action to the reducer, then broadcast it
    ///
    /// Reduction happens before the broadcast so an observer that sees the
    /// action also sees the state it produced.
    async fn dispatch(&self, action: A) {
        if let Err(error) = self.send(action.clone()).await {
            tracing::debug!(error = %error, "Dropping feedback action");
        }

        let _ = self.action_broadcast.send(action);
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
            cancellables: Arc::clone(&self.cancellables),
            cancel_generation: Arc::clone(&self.cancel_generation),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quadra_core::{SmallVec, smallvec};
    use std::time::Duration;

    #[derive(Clone, Debug, Default)]
    struct TestState {
        count: u32,
        ticks: u32,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum TestAction {
        Increment,
        Tick,
        TriggerFuture,
        TriggerDelay,
        TriggerParallel,
        TriggerSequential,
        StartTicker { period: Duration },
        StopTicker,
        EmitThree,
    }

    #[derive(Clone)]
    struct TestEnv;

    #[derive(Clone)]
    struct TestReducer;

    const TICKER: &str = "ticker";

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.count += 1;
                    SmallVec::new()
                },
                TestAction::Tick => {
                    state.ticks += 1;
                    SmallVec::new()
                },
                TestAction::TriggerFuture => {
                    smallvec![Effect::Future(Box::pin(async {
                        Some(TestAction::Increment)
                    }))]
                },
                TestAction::TriggerDelay => {
                    smallvec![Effect::Delay {
                        duration: Duration::from_millis(10),
                        action: Box::new(TestAction::Increment),
                    }]
                },
                TestAction::TriggerParallel => {
                    smallvec![Effect::Parallel(vec![
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    ])]
                },
                TestAction::TriggerSequential => {
                    smallvec![Effect::Sequential(vec![
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    ])]
                },
                TestAction::StartTicker { period } => {
                    let ticks = futures::stream::unfold((), move |()| async move {
                        tokio::time::sleep(period).await;
                        Some((TestAction::Tick, ()))
                    });
                    smallvec![Effect::Stream(Box::pin(ticks)).cancellable(TICKER)]
                },
                TestAction::StopTicker => {
                    smallvec![Effect::Cancel(EffectId::new(TICKER))]
                },
                TestAction::EmitThree => {
                    smallvec![Effect::Stream(Box::pin(futures::stream::iter(vec![
                        TestAction::Increment,
                        TestAction::Increment,
                        TestAction::Increment,
                    ])))]
                },
            }
        }
    }

    fn make_store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState::default(), TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn send_updates_state() {
        let store = make_store();
        store.send(TestAction::Increment).await.unwrap();
        assert_eq!(store.state(|s| s.count).await, 1);
    }

    #[tokio::test]
    async fn future_effect_feeds_back_action() {
        let store = make_store();
        let result = store
            .send_and_wait_for(
                TestAction::TriggerFuture,
                |a| *a == TestAction::Increment,
                Duration::from_secs(1),
            )
            .await
            .unwrap();
        assert_eq!(result, TestAction::Increment);
        assert_eq!(store.state(|s| s.count).await, 1);
    }

    #[tokio::test]
    async fn delay_effect_dispatches_after_sleep() {
        let store = make_store();
        let handle = store.send(TestAction::TriggerDelay).await.unwrap();
        handle
            .wait_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(store.state(|s| s.count).await, 1);
    }

    #[tokio::test]
    async fn parallel_effects_all_run() {
        let store = make_store();
        let handle = store.send(TestAction::TriggerParallel).await.unwrap();
        handle
            .wait_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(store.state(|s| s.count).await, 3);
    }

    #[tokio::test]
    async fn sequential_effects_all_run() {
        let store = make_store();
        let handle = store.send(TestAction::TriggerSequential).await.unwrap();
        handle
            .wait_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(store.state(|s| s.count).await, 2);
    }

    #[tokio::test]
    async fn stream_effect_dispatches_every_item() {
        let store = make_store();
        let handle = store.send(TestAction::EmitThree).await.unwrap();
        handle
            .wait_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(store.state(|s| s.count).await, 3);
    }

    #[tokio::test]
    async fn cancellable_stream_stops_on_cancel() {
        let store = make_store();
        store
            .send(TestAction::StartTicker {
                period: Duration::from_millis(5),
            })
            .await
            .unwrap();

        // Let a few ticks arrive, then detach
        let mut actions = store.subscribe_actions();
        for _ in 0..3 {
            actions.recv().await.unwrap();
        }
        store.send(TestAction::StopTicker).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        let observed = store.state(|s| s.ticks).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.state(|s| s.ticks).await, observed);
    }

    #[tokio::test]
    async fn cancel_without_registration_is_a_noop() {
        let store = make_store();
        store.send(TestAction::StopTicker).await.unwrap();
        store.send(TestAction::StopTicker).await.unwrap();
        assert_eq!(store.state(|s| s.ticks).await, 0);
    }

    #[tokio::test]
    async fn restarting_a_cancellable_replaces_the_previous_one() {
        let store = make_store();
        store
            .send(TestAction::StartTicker {
                period: Duration::from_millis(5),
            })
            .await
            .unwrap();
        store
            .send(TestAction::StartTicker {
                period: Duration::from_millis(5),
            })
            .await
            .unwrap();

        let mut actions = store.subscribe_actions();
        for _ in 0..2 {
            actions.recv().await.unwrap();
        }

        // A single cancel must stop everything: only one ticker may remain
        store.send(TestAction::StopTicker).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        let observed = store.state(|s| s.ticks).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.state(|s| s.ticks).await, observed);
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() {
        let store = make_store();
        store.shutdown(Duration::from_secs(1)).await.unwrap();
        let result = store.send(TestAction::Increment).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    }

    #[tokio::test]
    async fn shutdown_detaches_subscriptions() {
        let store = make_store();
        store
            .send(TestAction::StartTicker {
                period: Duration::from_millis(5),
            })
            .await
            .unwrap();

        // Without cancellation the infinite ticker would hold the pending
        // counter above zero and this would time out.
        store.shutdown(Duration::from_secs(2)).await.unwrap();
    }

    #[tokio::test]
    async fn send_and_wait_for_times_out() {
        let store = make_store();
        let result = store
            .send_and_wait_for(
                TestAction::Increment,
                |a| *a == TestAction::Tick,
                Duration::from_millis(50),
            )
            .await;
        assert!(matches!(result, Err(StoreError::Timeout)));
    }
}
