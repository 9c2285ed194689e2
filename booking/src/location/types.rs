//! State for the location filter.

use crate::fetch::{Chain, LoadStatus};
use crate::selection::BookingContext;
use chrono::NaiveDate;
use cineplex_api::{Cinema, CinemaId, CityWithCount, MovieId, MovieWithShowtimes, ShowtimeId};

/// Selections and fetched lists of the showtimes page.
///
/// The selected cinema is always one of the loaded cinemas, or none.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationFilterState {
    pub(crate) date: Option<NaiveDate>,
    pub(crate) cities: Chain<CityWithCount>,
    pub(crate) selected_city: Option<String>,
    pub(crate) cinemas: Chain<Cinema>,
    pub(crate) selected_cinema: Option<CinemaId>,
    pub(crate) showtimes: Chain<MovieWithShowtimes>,
}

impl LocationFilterState {
    /// Empty filter with `date` pre-selected.
    #[must_use]
    pub fn new(date: Option<NaiveDate>) -> Self {
        Self {
            date,
            cities: Chain::default(),
            selected_city: None,
            cinemas: Chain::default(),
            selected_cinema: None,
            showtimes: Chain::default(),
        }
    }

    /// Selected day
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// City list
    #[must_use]
    pub const fn cities(&self) -> &Chain<CityWithCount> {
        &self.cities
    }

    /// Selected city
    #[must_use]
    pub fn selected_city(&self) -> Option<&str> {
        self.selected_city.as_deref()
    }

    /// Cinemas of the selected city
    #[must_use]
    pub const fn cinemas(&self) -> &Chain<Cinema> {
        &self.cinemas
    }

    /// Selected cinema id
    #[must_use]
    pub const fn selected_cinema_id(&self) -> Option<CinemaId> {
        self.selected_cinema
    }

    /// Selected cinema
    #[must_use]
    pub fn selected_cinema(&self) -> Option<&Cinema> {
        let id = self.selected_cinema?;
        self.cinemas.items().iter().find(|cinema| cinema.cinema_id == id)
    }

    /// Movies playing at the selected cinema on the selected day
    #[must_use]
    pub const fn showtimes(&self) -> &Chain<MovieWithShowtimes> {
        &self.showtimes
    }

    /// True if every chain has settled
    #[must_use]
    pub fn is_settled(&self) -> bool {
        [self.cities.status(), self.cinemas.status(), self.showtimes.status()]
            .iter()
            .all(|status| matches!(status, LoadStatus::Loaded | LoadStatus::Errored))
    }

    /// Build the seat selection handoff for a listed showtime.
    ///
    /// Returns `None` if the movie or showtime is not in the current list.
    #[must_use]
    pub fn booking_context(
        &self,
        movie_id: MovieId,
        showtime_id: ShowtimeId,
        format: &str,
    ) -> Option<BookingContext> {
        let movie = self
            .showtimes
            .items()
            .iter()
            .find(|movie| movie.movie_id == movie_id)?;
        let slot = movie.showtime(showtime_id)?;

        Some(BookingContext {
            movie_id,
            movie_title: movie.title.clone(),
            showtime_id,
            start_time: slot.start_time,
            ticket_price: slot.ticket_price,
            cinema_name: self
                .selected_cinema()
                .map(|cinema| cinema.name.clone())
                .unwrap_or_default(),
            format: format.to_string(),
        })
    }

    pub(crate) fn has_city(&self, city: &str) -> bool {
        self.cities.items().iter().any(|c| c.city == city)
    }

    pub(crate) fn has_cinema(&self, cinema_id: CinemaId) -> bool {
        self.cinemas.items().iter().any(|c| c.cinema_id == cinema_id)
    }
}
