//! The Reducer trait.

use crate::Effects;

/// Business logic for one feature.
///
/// A reducer mutates its state in place and returns the effects that should
/// run afterwards. It must not block, sleep or perform I/O; anything
/// asynchronous is described as an effect instead.
///
/// # Example
///
/// ```ignore
/// impl Reducer for SeatSelectionReducer {
///     type State = SeatSelectionState;
///     type Action = SeatSelectionAction;
///     type Environment = BookingEnvironment;
///
///     fn reduce(
///         &self,
///         state: &mut SeatSelectionState,
///         action: SeatSelectionAction,
///         env: &BookingEnvironment,
///     ) -> Effects<SeatSelectionAction> {
///         match action {
///             SeatSelectionAction::Reset => {
///                 state.clear_selection();
///                 smallvec![Effect::None]
///             }
///             // ...
///         }
///     }
/// }
/// ```
pub trait Reducer {
    /// The state type this reducer operates on
    type State;

    /// The action type this reducer processes
    type Action;

    /// The environment type with injected dependencies
    type Environment;

    /// Apply an action to the state and describe follow-up work.
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action>;
}
