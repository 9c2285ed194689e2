//! Side effect descriptions.
//!
//! Effects are values. Reducers build them, the runtime executes them.
//! A reducer that needs several fetches returns several effects in its
//! [`Effects`](crate::Effects) list.

use futures::future::{BoxFuture, FutureExt};
use std::future::Future;

/// Boxed future produced by an effect.
pub type BoxedActionFuture<Action> = BoxFuture<'static, Option<Action>>;

/// A side effect to be executed by the runtime.
///
/// # Type Parameters
///
/// - `Action`: the action type an effect can feed back into its reducer
pub enum Effect<Action> {
    /// No-op effect
    None,

    /// Arbitrary async computation
    ///
    /// If the future resolves to `Some(action)`, the action is sent back
    /// into the store that executed the effect.
    Future(BoxedActionFuture<Action>),
}

impl<Action> std::fmt::Debug for Effect<Action> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "Effect::None"),
            Self::Future(_) => write!(f, "Effect::Future(<future>)"),
        }
    }
}

impl<Action> Effect<Action> {
    /// Wrap an async block as an effect.
    pub fn future<F>(fut: F) -> Self
    where
        F: Future<Output = Option<Action>> + Send + 'static,
    {
        Self::Future(fut.boxed())
    }

    /// `true` if executing this effect does nothing.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Number of futures this effect would spawn.
    #[must_use]
    pub const fn future_count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Future(_) => 1,
        }
    }

    /// Take the future out of an effect.
    ///
    /// Lets tests drive an effect by hand instead of through a store.
    #[must_use]
    pub fn into_future(self) -> Option<BoxedActionFuture<Action>> {
        match self {
            Self::None => None,
            Self::Future(fut) => Some(fut),
        }
    }
}
