//! Cascading location filter: city → cinema → (cinema, date) → showtimes.
//!
//! Each level is a [`Chain`](crate::fetch::Chain) re-fetched whenever its
//! inputs change. A fresh list auto-selects its first entry, which in turn
//! triggers the next level. Responses are tagged with the generation of the
//! request that produced them; anything superseded by a newer selection is
//! dropped on arrival.

pub mod actions;
pub mod reducer;
pub mod types;

pub use actions::LocationFilterAction;
pub use reducer::LocationFilterReducer;
pub use types::LocationFilterState;

use crate::environment::BookingEnvironment;
use cineplex_runtime::Store;

/// Store running the location filter.
pub type LocationFilterStore =
    Store<LocationFilterState, LocationFilterAction, BookingEnvironment, LocationFilterReducer>;

/// Create a location filter store with today's date pre-selected.
///
/// Nothing is fetched until [`LocationFilterAction::Start`] is sent.
#[must_use]
pub fn store(env: BookingEnvironment) -> LocationFilterStore {
    let today = env.clock().today();
    Store::new(LocationFilterState::new(Some(today)), LocationFilterReducer::new(), env)
}
