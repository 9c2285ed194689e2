//! Ergonomic testing utilities for reducers
//!
//! A fluent Given-When-Then harness. [`ReducerTest::run`] checks a single
//! reducer step; [`ReducerTest::run_to_completion`] also awaits every
//! `Effect::Future` and feeds the resulting actions back until the feature
//! goes quiet, which is how a fetch chain is tested without a store.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use cineplex_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Upper bound on feedback rounds in [`ReducerTest::run_to_completion`].
const MAX_FEEDBACK_ROUNDS: usize = 64;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use cineplex_testing::ReducerTest;
///
/// ReducerTest::new(SeatSelectionReducer)
///     .with_env(env)
///     .given_state(ready_state())
///     .when_action(SeatSelectionAction::Toggle { seat: seat("B5") })
///     .then_state(|state| assert_eq!(state.selected().len(), 1))
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Add an action to send (When)
    ///
    /// Can be called repeatedly; actions are reduced in order and effect
    /// assertions see the effects of the last one.
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add several actions at once (When)
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the effects of the last action (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// Effects are inspected, never executed.
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(mut self) {
        let (mut state, env) = self.prepare();
        assert!(!self.actions.is_empty(), "Action must be set with when_action()");

        let mut effects = Vec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }
        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }

    /// Run the test, executing effects and feeding their actions back.
    ///
    /// Futures from one round are awaited in order before the next round
    /// starts. Effect assertions see the effects of the last sent action,
    /// before any were executed; state assertions see the final state.
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set, if the
    /// feedback loop does not settle, or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub async fn run_to_completion(mut self)
    where
        A: 'static,
    {
        let (mut state, env) = self.prepare();
        assert!(!self.actions.is_empty(), "Action must be set with when_action()");

        let mut pending = Vec::new();
        let mut inspected = Vec::new();
        for action in self.actions {
            let effects = self.reducer.reduce(&mut state, action, &env).into_vec();
            inspected = effects.iter().map(describe).collect();
            pending.extend(effects);
        }

        let mut rounds = 0;
        while !pending.is_empty() {
            rounds += 1;
            assert!(
                rounds <= MAX_FEEDBACK_ROUNDS,
                "Effects did not settle after {MAX_FEEDBACK_ROUNDS} rounds"
            );

            let mut next = Vec::new();
            for effect in pending {
                let Some(fut) = effect.into_future() else {
                    continue;
                };
                if let Some(action) = fut.await {
                    next.extend(self.reducer.reduce(&mut state, action, &env));
                }
            }
            pending = next;
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }
        for assertion in self.effect_assertions {
            assertion(&inspected);
        }
    }

    #[allow(clippy::expect_used)] // Test code can use expect
    fn prepare(&mut self) -> (S, E) {
        let state = self
            .initial_state
            .take()
            .expect("Initial state must be set with given_state()");
        let env = self
            .environment
            .take()
            .expect("Environment must be set with with_env()");
        (state, env)
    }
}

/// Shape-only copy of an effect, so assertions can run after the real
/// futures have been consumed.
fn describe<A: 'static>(effect: &Effect<A>) -> Effect<A> {
    match effect {
        Effect::None => Effect::None,
        Effect::Future(_) => Effect::Future(Box::pin(std::future::pending())),
    }
}

/// Helper assertions for effects
pub mod assertions {
    use cineplex_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if any effect would do work.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {effects:?}"
        );
    }

    /// Assert the number of futures the effects would spawn
    ///
    /// # Panics
    ///
    /// Panics if the count doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_future_count<A>(effects: &[Effect<A>], expected: usize) {
        let found: usize = effects.iter().map(Effect::future_count).sum();
        assert_eq!(found, expected, "Expected {expected} futures, but found {found}");
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| e.future_count() > 0),
            "Expected at least one Future effect, but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cineplex_core::{Effects, smallvec};

    #[derive(Clone, Debug)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Load,
        Loaded(i32),
    }

    struct TestReducer;

    struct TestEnv;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> Effects<Self::Action> {
            match action {
                TestAction::Increment => {
                    state.count += 1;
                    smallvec![Effect::None]
                },
                TestAction::Load => {
                    smallvec![Effect::future(async { Some(TestAction::Loaded(10)) })]
                },
                TestAction::Loaded(n) => {
                    state.count += n;
                    smallvec![Effect::None]
                },
            }
        }
    }

    #[test]
    fn test_reducer_test_increment() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_reducer_test_action_sequence() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .when_actions([TestAction::Increment, TestAction::Increment, TestAction::Load])
            .then_state(|state| assert_eq!(state.count, 2))
            .then_effects(|effects| assertions::assert_future_count(effects, 1))
            .run();
    }

    #[tokio::test]
    async fn test_run_to_completion_feeds_back() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 1 })
            .when_action(TestAction::Load)
            .then_state(|state| assert_eq!(state.count, 11))
            .then_effects(assertions::assert_has_future_effect)
            .run_to_completion()
            .await;
    }

    #[test]
    fn test_assertions_no_effects() {
        assertions::assert_no_effects::<TestAction>(&[Effect::None]);
        assertions::assert_no_effects::<TestAction>(&[]);
    }
}
