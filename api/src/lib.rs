//! # Cineplex API Client
//!
//! Typed client for the ticketing service's HTTP/JSON API: movie listings,
//! cities and cinemas, showtimes, seat occupancy, authentication and the
//! support chat.
//!
//! ## Example
//!
//! ```no_run
//! use cineplex_api::{ApiClient, CinemaApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new("http://localhost:5001/api");
//!
//!     for city in client.cities().await? {
//!         println!("{} ({} cinemas)", city.city, city.count);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Every response is decoded into an explicit schema. Transport failures,
//! non-2xx statuses and schema mismatches are distinct [`ApiError`] variants.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, CinemaApi, DEFAULT_API_URL};
pub use error::ApiError;
pub use types::{
    ChatRequest, ChatResponse, ChatTurn, Cinema, CinemaId, CityWithCount, LoginRequest,
    LoginResponse, Money, Movie, MovieId, MovieStatus, MovieWithShowtimes, RegisterRequest,
    RegisterResponse, RegisteredUser, Sender, ShowtimeId, ShowtimeSlot, UserId, UserProfile,
};
