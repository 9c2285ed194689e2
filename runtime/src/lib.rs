//! # Cineplex Runtime
//!
//! The Store that drives a reducer: it owns the state, runs the reducer for
//! each action, executes the returned effects on tokio and feeds the actions
//! they produce back into itself.
//!
//! ## Example
//!
//! ```ignore
//! use cineplex_runtime::Store;
//!
//! let store = Store::new(LocationFilterState::new(today), LocationFilterReducer, env);
//!
//! store.send(LocationFilterAction::Start).await?;
//! store.settled().await;
//!
//! let city = store.state(|s| s.selected_city().map(str::to_owned)).await;
//! ```

use cineplex_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store has been shut down and no longer accepts actions
        ///
        /// Results of effects still in flight at shutdown are discarded
        /// with this error.
        #[error("Store is shut down")]
        ShutdownInProgress,

        /// Timed out waiting for effects to settle
        #[error("Timed out with {0} effects still running")]
        Timeout(usize),
    }
}

pub use error::StoreError;

/// Counts effects in flight and wakes waiters when the count reaches zero.
///
/// The count lives inside the watch channel so updates and notifications
/// happen under one lock.
#[derive(Clone)]
struct PendingEffects {
    notifier: Arc<watch::Sender<usize>>,
}

impl PendingEffects {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            notifier: Arc::new(tx),
        }
    }

    fn increment(&self) -> PendingGuard {
        self.notifier.send_modify(|pending| *pending += 1);
        PendingGuard(self.clone())
    }

    fn load(&self) -> usize {
        *self.notifier.borrow()
    }
}

/// Decrements the pending counter on drop, even if the effect panicked.
struct PendingGuard(PendingEffects);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0
            .notifier
            .send_modify(|pending| *pending = pending.saturating_sub(1));
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, Duration, Effect, Ordering, PendingEffects, Reducer, RwLock, StoreError,
        broadcast,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Cloning a store is cheap; clones share state and effects.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        shutdown: Arc<AtomicBool>,
        pending: PendingEffects,
        /// Every action produced by an effect is broadcast here before it
        /// is fed back into the reducer.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + std::fmt::Debug + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a store whose action broadcast buffers `capacity` actions.
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending: PendingEffects::new(),
                action_broadcast,
            }
        }

        /// Send an action through the reducer and start its effects.
        ///
        /// Returns once the reducer has run; effects continue in the
        /// background. Use [`Store::settled`] to wait for them.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] after [`Store::shutdown`].
        #[tracing::instrument(skip(self), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::debug!("Rejected action: store is shut down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut state, action, &self.environment)
            };

            tracing::trace!("Reducer returned {} effects", effects.len());
            for effect in effects {
                self.execute_effect(effect);
            }

            Ok(())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.selected().len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Subscribe to every action produced by effects.
        ///
        /// Actions sent directly through [`Store::send`] are not broadcast.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Number of effects still running.
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending.load()
        }

        /// Wait until no effects are running.
        ///
        /// Effects spawned by fed-back actions are counted before their
        /// parent finishes, so this waits for the whole cascade.
        pub async fn settled(&self) {
            let mut rx = self.pending.notifier.subscribe();
            // wait_for only fails when the sender is dropped, and we hold it.
            let _ = rx.wait_for(|pending| *pending == 0).await;
        }

        /// [`Store::settled`] with an upper bound.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Timeout`] with the number of effects still
        /// running when the timeout expires.
        pub async fn settled_within(&self, timeout: Duration) -> Result<(), StoreError> {
            tokio::time::timeout(timeout, self.settled())
                .await
                .map_err(|_| StoreError::Timeout(self.pending.load()))
        }

        /// Stop accepting actions.
        ///
        /// Effects already running are not cancelled, but the actions they
        /// produce are dropped instead of reaching the state.
        pub fn shutdown(&self) {
            tracing::debug!("Store shut down");
            self.shutdown.store(true, Ordering::Release);
        }

        /// `true` once [`Store::shutdown`] has been called.
        #[must_use]
        pub fn is_shut_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        fn execute_effect(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let guard = self.pending.increment();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;

                        let Some(action) = fut.await else {
                            tracing::trace!("Effect::Future completed with no action");
                            return;
                        };

                        if store.is_shut_down() {
                            tracing::debug!(?action, "Discarding effect result after shutdown");
                            return;
                        }

                        let _ = store.action_broadcast.send(action.clone());
                        if let Err(error) = store.send(action).await {
                            tracing::debug!(%error, "Effect result not applied");
                        }
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                shutdown: Arc::clone(&self.shutdown),
                pending: self.pending.clone(),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

pub use store::Store;
