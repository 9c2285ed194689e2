//! # Cineplex Core
//!
//! The small set of abstractions every Cineplex feature is written against.
//!
//! ## Core Concepts
//!
//! - **State**: owned data for one feature (a seat map, a filter chain)
//! - **Action**: every input to a feature, user intents and fetch results alike
//! - **Reducer**: `(State, Action, Environment) → Effects`, synchronous and pure
//! - **Effect**: a description of async work, executed by the runtime
//! - **Environment**: injected dependencies (remote API, clock)
//!
//! Reducers never perform I/O themselves. A fetch is returned as an
//! [`Effect::Future`](effect::Effect::Future) whose output action is fed back
//! into the same reducer, so every state transition is observable in tests
//! without a network.
//!
//! ## Example
//!
//! ```ignore
//! use cineplex_core::{effect::Effect, reducer::Reducer, SmallVec, smallvec};
//!
//! impl Reducer for CounterReducer {
//!     type State = u32;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut u32,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         *state += 1;
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

pub mod effect;
pub mod environment;
pub mod reducer;

pub use smallvec::{SmallVec, smallvec};

/// Effects returned from a single reducer call.
///
/// Most actions emit zero or one effect, so four inline slots avoid a heap
/// allocation on the hot path.
pub type Effects<A> = SmallVec<[effect::Effect<A>; 4]>;
