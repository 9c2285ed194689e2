//! Reducer for the location filter.

use super::{LocationFilterAction, LocationFilterState};
use crate::environment::BookingEnvironment;
use crate::fetch::LoadStatus;
use cineplex_core::{Effects, effect::Effect, reducer::Reducer};
use smallvec::smallvec;

/// Reducer for the cascading city → cinema → showtimes filter.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocationFilterReducer;

impl LocationFilterReducer {
    /// Create a new location filter reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Point the filter at `city` and fetch its cinemas.
    ///
    /// The previous cinema is cleared first, so showtimes settle empty until
    /// the new list arrives.
    fn select_city(
        state: &mut LocationFilterState,
        city: String,
        env: &BookingEnvironment,
    ) -> Effects<LocationFilterAction> {
        state.selected_city = Some(city.clone());
        state.selected_cinema = None;
        let generation = state.cinemas.begin();
        state.showtimes.settle_empty(LoadStatus::Loaded);

        let api = env.api();
        tracing::debug!(%city, %generation, "Fetching cinemas");

        smallvec![Effect::future(async move {
            let result = api.cinemas(&city).await;
            Some(LocationFilterAction::CinemasLoaded { generation, result })
        })]
    }

    /// Re-query showtimes for the current cinema and date.
    ///
    /// Without both there is nothing to ask for: the list settles empty and
    /// any request still in flight is invalidated.
    fn refresh_showtimes(
        state: &mut LocationFilterState,
        env: &BookingEnvironment,
    ) -> Effects<LocationFilterAction> {
        let (Some(cinema_id), Some(date)) = (state.selected_cinema, state.date) else {
            state.showtimes.settle_empty(LoadStatus::Loaded);
            return smallvec![Effect::None];
        };

        let generation = state.showtimes.begin();
        let api = env.api();
        tracing::debug!(%cinema_id, %date, %generation, "Fetching showtimes");

        smallvec![Effect::future(async move {
            let result = api.showtimes_by_cinema(cinema_id, date).await;
            Some(LocationFilterAction::ShowtimesLoaded { generation, result })
        })]
    }
}

impl Reducer for LocationFilterReducer {
    type State = LocationFilterState;
    type Action = LocationFilterAction;
    type Environment = BookingEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            LocationFilterAction::Start => {
                if state.cities.status() != LoadStatus::Idle {
                    tracing::debug!("Cities already requested");
                    return smallvec![Effect::None];
                }

                let generation = state.cities.begin();
                let api = env.api();
                tracing::debug!(%generation, "Fetching cities");

                smallvec![Effect::future(async move {
                    let result = api.cities().await;
                    Some(LocationFilterAction::CitiesLoaded { generation, result })
                })]
            },

            LocationFilterAction::CitiesLoaded { generation, result } => {
                if !state.cities.is_current(generation) {
                    tracing::debug!(%generation, "Dropping stale cities");
                    return smallvec![Effect::None];
                }

                match result {
                    Ok(cities) => {
                        let first = cities.first().map(|c| c.city.clone());
                        state.cities.complete(cities);
                        if let Some(city) = first {
                            return Self::select_city(state, city, env);
                        }
                        tracing::info!("No cities available");
                        state.selected_city = None;
                        state.selected_cinema = None;
                        state.cinemas.settle_empty(LoadStatus::Loaded);
                        state.showtimes.settle_empty(LoadStatus::Loaded);
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to load cities");
                        state.cities.fail();
                        state.selected_city = None;
                        state.selected_cinema = None;
                        state.cinemas.settle_empty(LoadStatus::Errored);
                        state.showtimes.settle_empty(LoadStatus::Errored);
                    },
                }
                smallvec![Effect::None]
            },

            LocationFilterAction::SelectCity { city } => {
                if state.selected_city.as_deref() == Some(city.as_str()) {
                    return smallvec![Effect::None];
                }
                if !state.has_city(&city) {
                    tracing::warn!(%city, "Ignoring unknown city");
                    return smallvec![Effect::None];
                }
                Self::select_city(state, city, env)
            },

            LocationFilterAction::CinemasLoaded { generation, result } => {
                if !state.cinemas.is_current(generation) {
                    tracing::debug!(%generation, "Dropping stale cinemas");
                    return smallvec![Effect::None];
                }

                match result {
                    Ok(cinemas) => {
                        state.selected_cinema = cinemas.first().map(|c| c.cinema_id);
                        state.cinemas.complete(cinemas);
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, city = ?state.selected_city, "Failed to load cinemas");
                        state.selected_cinema = None;
                        state.cinemas.fail();
                    },
                }
                Self::refresh_showtimes(state, env)
            },

            LocationFilterAction::SelectCinema { cinema_id } => {
                if state.selected_cinema == Some(cinema_id) {
                    return smallvec![Effect::None];
                }
                if !state.has_cinema(cinema_id) {
                    tracing::warn!(%cinema_id, "Ignoring cinema outside the selected city");
                    return smallvec![Effect::None];
                }
                state.selected_cinema = Some(cinema_id);
                Self::refresh_showtimes(state, env)
            },

            LocationFilterAction::SelectDate { date } => {
                if state.date == date {
                    return smallvec![Effect::None];
                }
                let today = env.clock().today();
                if date.is_some_and(|day| day < today) {
                    tracing::warn!(?date, %today, "Ignoring date in the past");
                    return smallvec![Effect::None];
                }
                state.date = date;
                Self::refresh_showtimes(state, env)
            },

            LocationFilterAction::ShowtimesLoaded { generation, result } => {
                if !state.showtimes.is_current(generation) {
                    tracing::debug!(%generation, "Dropping stale showtimes");
                    return smallvec![Effect::None];
                }

                match result {
                    Ok(movies) => state.showtimes.complete(movies),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to load showtimes");
                        state.showtimes.fail();
                    },
                }
                smallvec![Effect::None]
            },

            LocationFilterAction::SelectShowtime {
                movie_id,
                showtime_id,
                format,
            } => match state.booking_context(movie_id, showtime_id, &format) {
                Some(context) => {
                    tracing::info!(%movie_id, %showtime_id, %format, "Showtime selected");
                    smallvec![Effect::future(async move {
                        Some(LocationFilterAction::ShowtimeSelected { context })
                    })]
                },
                None => {
                    tracing::warn!(%movie_id, %showtime_id, "Showtime not in the current list");
                    smallvec![Effect::None]
                },
            },

            // Observed by subscribers; no state change
            LocationFilterAction::ShowtimeSelected { .. } => smallvec![Effect::None],
        }
    }
}
