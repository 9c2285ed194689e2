//! The auditorium seat grid.
//!
//! Seats are never stored: the grid is generated from fixed bounds (rows
//! `A`–`J`, numbers 1–12) and a seat's status is derived on demand from the
//! occupied set and the current selection.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Row labels, front to back
pub const ROWS: [char; 10] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J'];

/// Seats in every row
pub const SEATS_PER_ROW: u8 = 12;

/// Rows rendered as VIP
pub const VIP_ROWS: [char; 3] = ['H', 'I', 'J'];

/// Cosmetic seat category; both classes cost the same.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatClass {
    /// Rows A–G
    Standard,
    /// Rows H–J
    Vip,
}

/// A seat label such as `B5`.
///
/// Only seats inside the grid can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatId {
    row: u8,
    number: u8,
}

impl SeatId {
    /// Seat at `row` (`'A'`..=`'J'`) and `number` (1..=12)
    #[must_use]
    pub fn new(row: char, number: u8) -> Option<Self> {
        let row = ROWS.iter().position(|r| *r == row)?;
        if !(1..=SEATS_PER_ROW).contains(&number) {
            return None;
        }
        Some(Self {
            row: u8::try_from(row).ok()?,
            number,
        })
    }

    /// Row label
    #[must_use]
    pub fn row(self) -> char {
        ROWS[usize::from(self.row)]
    }

    /// Seat number within the row, starting at 1
    #[must_use]
    pub const fn number(self) -> u8 {
        self.number
    }

    /// VIP or standard
    #[must_use]
    pub fn class(self) -> SeatClass {
        if VIP_ROWS.contains(&self.row()) {
            SeatClass::Vip
        } else {
            SeatClass::Standard
        }
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row(), self.number)
    }
}

/// A seat label outside the grid or malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a seat in the auditorium: {0:?}")]
pub struct InvalidSeat(pub String);

impl FromStr for SeatId {
    type Err = InvalidSeat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidSeat(s.to_string());
        let mut chars = s.trim().chars();
        let row = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        let number: u8 = chars.as_str().parse().map_err(|_| invalid())?;
        Self::new(row, number).ok_or_else(invalid)
    }
}

impl TryFrom<String> for SeatId {
    type Error = InvalidSeat;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatId> for String {
    fn from(seat: SeatId) -> Self {
        seat.to_string()
    }
}

/// How a seat should be presented right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeatStatus {
    /// Booked by someone else; not selectable
    Occupied,
    /// In the current selection
    Selected,
    /// Free to select
    Available(SeatClass),
}

/// Classify a seat from the occupied set and the selection.
///
/// Occupied wins over selected, so a stale selection can never render as
/// bookable.
#[must_use]
pub fn seat_status(seat: SeatId, occupied: &HashSet<SeatId>, selected: &[SeatId]) -> SeatStatus {
    if occupied.contains(&seat) {
        SeatStatus::Occupied
    } else if selected.contains(&seat) {
        SeatStatus::Selected
    } else {
        SeatStatus::Available(seat.class())
    }
}

/// Every seat, row by row, front to back.
pub fn grid() -> impl Iterator<Item = SeatId> {
    ROWS.into_iter().flat_map(row_seats)
}

/// Seats of one row, left to right.
pub fn row_seats(row: char) -> impl Iterator<Item = SeatId> {
    (1..=SEATS_PER_ROW).filter_map(move |number| SeatId::new(row, number))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(label: &str) -> SeatId {
        label.parse().unwrap()
    }

    #[test]
    fn grid_has_ten_rows_of_twelve() {
        let seats: Vec<_> = grid().collect();
        assert_eq!(seats.len(), 120);
        assert_eq!(seats.first().unwrap().to_string(), "A1");
        assert_eq!(seats.last().unwrap().to_string(), "J12");
    }

    #[test]
    fn labels_round_trip_through_display() {
        for seat in grid() {
            assert_eq!(seat.to_string().parse::<SeatId>().unwrap(), seat);
        }
    }

    #[test]
    fn labels_outside_the_grid_are_rejected() {
        for label in ["", "A", "A0", "A13", "K1", "1A", "AA1", "B-1"] {
            assert!(label.parse::<SeatId>().is_err(), "{label:?} should be rejected");
        }
    }

    #[test]
    fn lowercase_rows_are_accepted() {
        assert_eq!(seat("c7"), SeatId::new('C', 7).unwrap());
    }

    #[test]
    fn back_rows_are_vip() {
        assert_eq!(seat("G12").class(), SeatClass::Standard);
        assert_eq!(seat("H1").class(), SeatClass::Vip);
        assert_eq!(seat("J12").class(), SeatClass::Vip);
    }

    #[test]
    fn occupied_beats_selected() {
        let occupied: HashSet<_> = [seat("A1")].into();
        let selected = [seat("A1"), seat("B2")];

        assert_eq!(seat_status(seat("A1"), &occupied, &selected), SeatStatus::Occupied);
        assert_eq!(seat_status(seat("B2"), &occupied, &selected), SeatStatus::Selected);
        assert_eq!(
            seat_status(seat("I3"), &occupied, &selected),
            SeatStatus::Available(SeatClass::Vip)
        );
    }

    #[test]
    fn seats_serialize_as_labels() {
        assert_eq!(serde_json::to_string(&seat("E10")).unwrap(), "\"E10\"");
        assert!(serde_json::from_str::<SeatId>("\"Z9\"").is_err());
    }
}
