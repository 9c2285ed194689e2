//! Actions for the location filter.

use crate::fetch::Generation;
use crate::selection::BookingContext;
use chrono::NaiveDate;
use cineplex_api::{ApiError, Cinema, CinemaId, CityWithCount, MovieId, MovieWithShowtimes, ShowtimeId};

/// Everything that can happen to the location filter.
#[derive(Clone, Debug, PartialEq)]
pub enum LocationFilterAction {
    /// Load the city list (once)
    Start,

    /// City list arrived
    CitiesLoaded {
        /// Tag of the request this answers
        generation: Generation,
        /// Cities with cinema counts
        result: Result<Vec<CityWithCount>, ApiError>,
    },

    /// User picked a city
    SelectCity {
        /// City name as listed
        city: String,
    },

    /// Cinemas of the selected city arrived
    CinemasLoaded {
        /// Tag of the request this answers
        generation: Generation,
        /// Cinemas in the city
        result: Result<Vec<Cinema>, ApiError>,
    },

    /// User picked a cinema
    SelectCinema {
        /// Cinema from the current list
        cinema_id: CinemaId,
    },

    /// User picked (or cleared) the date
    SelectDate {
        /// Calendar day, `None` to clear
        date: Option<NaiveDate>,
    },

    /// Showtimes for the selected cinema and date arrived
    ShowtimesLoaded {
        /// Tag of the request this answers
        generation: Generation,
        /// Movies with their showtimes
        result: Result<Vec<MovieWithShowtimes>, ApiError>,
    },

    /// User picked a showtime
    SelectShowtime {
        /// Movie the showtime belongs to
        movie_id: MovieId,
        /// Showtime picked
        showtime_id: ShowtimeId,
        /// Format label the showtime was listed under
        format: String,
    },

    /// Notification: a showtime was picked and can be booked
    ShowtimeSelected {
        /// Handoff for seat selection
        context: BookingContext,
    },
}
