//! # Cineplex Booking
//!
//! Client-side state for a cinema ticketing app: browsing the catalog,
//! narrowing showtimes by city, cinema and day, picking seats, chatting with
//! support, and holding the signed-in session.
//!
//! Every feature is a reducer over its own state, run by a
//! [`Store`](cineplex_runtime::Store). Remote data arrives through the
//! [`CinemaApi`](cineplex_api::CinemaApi) trait in the [`BookingEnvironment`].
//!
//! # Flow
//!
//! ```text
//! catalog ──► location filter ──ShowtimeSelected──► seat selection ──CheckoutRequested──► payment
//!             (city → cinema → date → showtimes)    (occupied set, ≤ 8 seats)
//!
//! session (token + profile) ──token──► chat
//! ```
//!
//! Requests are never cancelled. Each fetch chain tags its requests with a
//! [`Generation`](fetch::Generation) and drops answers to superseded ones.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod chat;
pub mod config;
pub mod environment;
pub mod fetch;
pub mod location;
pub mod seat;
pub mod selection;
pub mod session;

pub use config::{ClientConfig, ConfigError};
pub use environment::BookingEnvironment;
pub use fetch::{Chain, Generation, LoadStatus};
pub use seat::{SeatClass, SeatId, SeatStatus};
