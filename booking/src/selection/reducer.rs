//! Reducer for seat selection.

use super::{SeatSelectionAction, SeatSelectionState, ToggleOutcome};
use crate::environment::BookingEnvironment;
use crate::seat::SeatId;
use cineplex_core::{Effects, effect::Effect, reducer::Reducer};
use smallvec::smallvec;
use std::collections::HashSet;

/// Reducer for the seat selection page.
///
/// Occupied-seat failures are fail-open: the page stays usable with every
/// seat shown as available and the booking service has the final word.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeatSelectionReducer;

impl SeatSelectionReducer {
    /// Create a new seat selection reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn load_occupied(
        state: &mut SeatSelectionState,
        env: &BookingEnvironment,
    ) -> Effects<SeatSelectionAction> {
        let Some(showtime_id) = state.context().map(|context| context.showtime_id) else {
            tracing::debug!("No booking context, skipping occupied seat fetch");
            return smallvec![Effect::None];
        };

        let generation = state.begin_load();
        let api = env.api();
        tracing::debug!(%showtime_id, %generation, "Fetching occupied seats");

        smallvec![Effect::future(async move {
            let result = api.occupied_seats(showtime_id).await;
            Some(SeatSelectionAction::OccupiedLoaded { generation, result })
        })]
    }
}

fn parse_occupied(labels: Vec<String>) -> HashSet<SeatId> {
    labels
        .into_iter()
        .filter_map(|label| match label.parse::<SeatId>() {
            Ok(seat) => Some(seat),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping occupied seat outside the grid");
                None
            },
        })
        .collect()
}

impl Reducer for SeatSelectionReducer {
    type State = SeatSelectionState;
    type Action = SeatSelectionAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            SeatSelectionAction::LoadOccupied => Self::load_occupied(state, env),

            SeatSelectionAction::OccupiedLoaded { generation, result } => {
                if generation != state.generation() {
                    tracing::debug!(%generation, current = %state.generation(), "Dropping stale occupied seats");
                    return smallvec![Effect::None];
                }

                let occupied = match result {
                    Ok(labels) => parse_occupied(labels),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to load occupied seats, showing all seats as available");
                        HashSet::new()
                    },
                };
                state.finish_load(occupied);
                smallvec![Effect::None]
            },

            SeatSelectionAction::Toggle { seat } => {
                match state.toggle(seat) {
                    ToggleOutcome::Selected | ToggleOutcome::Deselected => {},
                    ToggleOutcome::IgnoredAtCapacity => {
                        tracing::debug!(%seat, "Seat limit reached, ignoring selection");
                    },
                    outcome => {
                        tracing::trace!(%seat, ?outcome, "Toggle ignored");
                    },
                }
                smallvec![Effect::None]
            },

            SeatSelectionAction::Reset => {
                state.reset();
                smallvec![Effect::None]
            },

            SeatSelectionAction::ChangeContext { context } => {
                state.replace_context(context);
                Self::load_occupied(state, env)
            },

            SeatSelectionAction::Checkout => match state.checkout_request() {
                Some(request) => {
                    tracing::info!(
                        showtime_id = %request.context.showtime_id,
                        seats = request.seats.len(),
                        total = %request.total,
                        "Continuing to payment"
                    );
                    smallvec![Effect::future(async move {
                        Some(SeatSelectionAction::CheckoutRequested { request })
                    })]
                },
                None => {
                    tracing::debug!("Nothing selected, checkout ignored");
                    smallvec![Effect::None]
                },
            },

            // Observed by subscribers; no state change
            SeatSelectionAction::CheckoutRequested { .. } => smallvec![Effect::None],
        }
    }
}
