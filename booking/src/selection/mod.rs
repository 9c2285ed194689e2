//! Seat selection for one showtime.
//!
//! The state holds the booking context handed over by the location filter,
//! the occupied set fetched for the showtime, and the user's ordered
//! selection (at most [`MAX_SELECTED_SEATS`]). Seat status is always derived
//! from those two sets; there are no per-seat flags to keep in sync.
//!
//! ```text
//! BookingContext ─► LoadOccupied ─► occupied_seats(showtime) ─► OccupiedLoaded
//!                                                                   │
//!                         Toggle / Reset ◄── user ──► Checkout ─► CheckoutRequested
//! ```

pub mod actions;
pub mod reducer;
pub mod types;

pub use actions::SeatSelectionAction;
pub use reducer::SeatSelectionReducer;
pub use types::{
    BookingContext, CheckoutRequest, ExitAction, MAX_SELECTED_SEATS, SeatSelectionState,
    SelectionPhase, ToggleOutcome,
};

use crate::environment::BookingEnvironment;
use cineplex_runtime::Store;

/// Store running the seat selection feature.
pub type SeatSelectionStore =
    Store<SeatSelectionState, SeatSelectionAction, BookingEnvironment, SeatSelectionReducer>;

/// Create a seat selection store for `context`.
///
/// The occupied-seat query is not issued until [`SeatSelectionAction::LoadOccupied`]
/// is sent.
#[must_use]
pub fn store(context: Option<BookingContext>, env: BookingEnvironment) -> SeatSelectionStore {
    Store::new(SeatSelectionState::new(context), SeatSelectionReducer::new(), env)
}
