//! State types for seat selection.

use crate::fetch::Generation;
use crate::seat::{self, SeatId, SeatStatus};
use chrono::{DateTime, Utc};
use cineplex_api::{Money, MovieId, ShowtimeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Most seats one booking may hold
pub const MAX_SELECTED_SEATS: usize = 8;

/// What the seat page needs to know about the chosen showtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingContext {
    /// Movie
    pub movie_id: MovieId,
    /// Movie title, for display
    pub movie_title: String,
    /// Showtime being booked
    pub showtime_id: ShowtimeId,
    /// When the showtime starts
    pub start_time: DateTime<Utc>,
    /// Price of one seat
    pub ticket_price: Money,
    /// Cinema name, for display
    pub cinema_name: String,
    /// Projection format (e.g. "2D", "IMAX")
    pub format: String,
}

/// Handoff to payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Showtime being booked
    pub context: BookingContext,
    /// Seats in the order they were picked
    pub seats: Vec<SeatId>,
    /// `ticket_price × seats`
    pub total: Money,
}

/// Coarse page state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionPhase {
    /// No booking context; only leaving is possible
    Unavailable,
    /// Waiting for the occupied seats
    Loading,
    /// Seats can be toggled
    Ready,
}

/// Way out of a page that cannot be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitAction {
    /// Navigate back to the home page
    ReturnHome,
}

/// Result of applying a toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Seat appended to the selection
    Selected,
    /// Seat removed from the selection
    Deselected,
    /// No booking context
    IgnoredUnavailable,
    /// Occupied seats are still loading
    IgnoredLoading,
    /// Seat is taken
    IgnoredOccupied,
    /// Selection already holds [`MAX_SELECTED_SEATS`]
    IgnoredAtCapacity,
}

/// Seat selection for one showtime.
#[derive(Clone, Debug, PartialEq)]
pub struct SeatSelectionState {
    context: Option<BookingContext>,
    occupied: HashSet<SeatId>,
    selected: Vec<SeatId>,
    loading: bool,
    generation: Generation,
}

impl SeatSelectionState {
    /// Start a selection for `context`.
    ///
    /// With a context the state starts out loading, so no seat can be
    /// picked before the occupied set has been fetched.
    #[must_use]
    pub fn new(context: Option<BookingContext>) -> Self {
        Self {
            loading: context.is_some(),
            context,
            occupied: HashSet::new(),
            selected: Vec::new(),
            generation: Generation::default(),
        }
    }

    /// Coarse page state
    #[must_use]
    pub const fn phase(&self) -> SelectionPhase {
        match (&self.context, self.loading) {
            (None, _) => SelectionPhase::Unavailable,
            (Some(_), true) => SelectionPhase::Loading,
            (Some(_), false) => SelectionPhase::Ready,
        }
    }

    /// The only action offered when the page is unavailable
    #[must_use]
    pub const fn exit_action(&self) -> Option<ExitAction> {
        match self.context {
            None => Some(ExitAction::ReturnHome),
            Some(_) => None,
        }
    }

    /// Booking context, if any
    #[must_use]
    pub const fn context(&self) -> Option<&BookingContext> {
        self.context.as_ref()
    }

    /// Selected seats in pick order
    #[must_use]
    pub fn selected(&self) -> &[SeatId] {
        &self.selected
    }

    /// Seats taken by other bookings
    #[must_use]
    pub const fn occupied(&self) -> &HashSet<SeatId> {
        &self.occupied
    }

    /// True until the occupied-seat query has answered
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Tag of the newest occupied-seat request
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Price of the current selection
    #[must_use]
    pub fn total(&self) -> Money {
        self.context
            .as_ref()
            .map_or(Money::ZERO, |context| context.ticket_price.times(self.selected.len()))
    }

    /// Status of one seat
    #[must_use]
    pub fn seat_status(&self, seat: SeatId) -> SeatStatus {
        seat::seat_status(seat, &self.occupied, &self.selected)
    }

    /// The whole grid, row by row, with statuses
    #[must_use]
    pub fn seat_map(&self) -> Vec<(SeatId, SeatStatus)> {
        seat::grid().map(|seat| (seat, self.seat_status(seat))).collect()
    }

    /// Counter shown next to the grid, e.g. `"3/8"`
    #[must_use]
    pub fn selection_label(&self) -> String {
        format!("{}/{MAX_SELECTED_SEATS}", self.selected.len())
    }

    /// Checkout handoff, if anything is selected
    #[must_use]
    pub fn checkout_request(&self) -> Option<CheckoutRequest> {
        let context = self.context.as_ref()?;
        if self.selected.is_empty() {
            return None;
        }
        Some(CheckoutRequest {
            context: context.clone(),
            seats: self.selected.clone(),
            total: self.total(),
        })
    }

    /// Apply a click on `seat`.
    pub fn toggle(&mut self, seat: SeatId) -> ToggleOutcome {
        if self.context.is_none() {
            return ToggleOutcome::IgnoredUnavailable;
        }
        if self.loading {
            return ToggleOutcome::IgnoredLoading;
        }
        if self.occupied.contains(&seat) {
            return ToggleOutcome::IgnoredOccupied;
        }
        if let Some(index) = self.selected.iter().position(|s| *s == seat) {
            self.selected.remove(index);
            return ToggleOutcome::Deselected;
        }
        if self.selected.len() >= MAX_SELECTED_SEATS {
            return ToggleOutcome::IgnoredAtCapacity;
        }
        self.selected.push(seat);
        ToggleOutcome::Selected
    }

    /// Drop the selection.
    pub fn reset(&mut self) {
        self.selected.clear();
    }

    /// Switch showtime: new context, empty sets.
    ///
    /// Invalidates any occupied-seat request still in flight for the old
    /// context.
    pub(crate) fn replace_context(&mut self, context: Option<BookingContext>) {
        self.generation.bump();
        self.loading = context.is_some();
        self.context = context;
        self.occupied.clear();
        self.selected.clear();
    }

    /// Start an occupied-seat request; returns its tag.
    pub(crate) fn begin_load(&mut self) -> Generation {
        self.loading = true;
        self.generation.bump()
    }

    /// Install a fresh occupied set and leave the loading state.
    ///
    /// Any selected seat that turned out to be occupied is dropped.
    pub(crate) fn finish_load(&mut self, occupied: HashSet<SeatId>) {
        self.selected.retain(|seat| !occupied.contains(seat));
        self.occupied = occupied;
        self.loading = false;
    }
}
