//! Actions for seat selection.

use super::types::{BookingContext, CheckoutRequest};
use crate::fetch::Generation;
use crate::seat::SeatId;
use cineplex_api::ApiError;

/// Everything that can happen to a seat selection.
#[derive(Clone, Debug, PartialEq)]
pub enum SeatSelectionAction {
    /// Fetch the occupied seats of the context's showtime
    LoadOccupied,

    /// Occupied-seat labels arrived (or the fetch failed)
    OccupiedLoaded {
        /// Tag of the request this answers
        generation: Generation,
        /// Raw seat labels from the API
        result: Result<Vec<String>, ApiError>,
    },

    /// User clicked a seat
    Toggle {
        /// Seat clicked
        seat: SeatId,
    },

    /// Drop the whole selection
    Reset,

    /// Switch to a different showtime; clears the selection and reloads
    ChangeContext {
        /// New context, `None` if the showtime is unknown
        context: Option<BookingContext>,
    },

    /// User asked to continue to payment
    Checkout,

    /// Notification: the selection was handed off to payment
    CheckoutRequested {
        /// Snapshot of the booking
        request: CheckoutRequest,
    },
}
