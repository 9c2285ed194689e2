//! Wire schemas for every endpoint the client consumes.
//!
//! Responses are decoded into these types at the boundary; a body that does
//! not match surfaces as [`ApiError::Decode`](crate::ApiError::Decode) rather
//! than as missing fields deeper in the client.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw identifier
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// The raw identifier
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a movie
    MovieId
);
numeric_id!(
    /// Identifier of a scheduled screening
    ShowtimeId
);
numeric_id!(
    /// Identifier of a cinema
    CinemaId
);
numeric_id!(
    /// Identifier of a user account
    UserId
);

// ============================================================================
// Money
// ============================================================================

/// A non-negative amount in hundredths of the currency unit.
///
/// The API sends prices as decimal strings (`"90000.00"`); they are parsed
/// exactly, never through floating point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from hundredths
    #[must_use]
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Creates a `Money` value from whole units, `None` on overflow
    #[must_use]
    pub const fn from_major(major: u64) -> Option<Self> {
        match major.checked_mul(100) {
            Some(minor) => Some(Self(minor)),
            None => None,
        }
    }

    /// Amount in hundredths
    #[must_use]
    pub const fn minor(self) -> u64 {
        self.0
    }

    /// `self × count`, saturating at `u64::MAX` hundredths
    #[must_use]
    pub const fn times(self, count: usize) -> Self {
        Self(self.0.saturating_mul(count as u64))
    }
}

/// Error parsing a decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount {0:?}")]
pub struct ParseMoneyError(String);

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseMoneyError(s.to_string());
        let trimmed = s.trim();
        let (major, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        if major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let major: u64 = major.parse().map_err(|_| invalid())?;
        let fraction: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        major
            .checked_mul(100)
            .and_then(|minor| minor.checked_add(fraction))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl Visitor<'_> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal amount as string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                Money::from_major(v).ok_or_else(|| E::custom("amount overflows"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                let v = u64::try_from(v).map_err(|_| E::custom("negative amount"))?;
                self.visit_u64(v)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                // Floats only reach us from hand-written fixtures; round to hundredths.
                format!("{v:.2}").parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}

/// Accepts a count sent either as a JSON number or as a numeric string
/// (aggregate counts come back from the database driver as strings).
fn count_from_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u32),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

// ============================================================================
// Movies
// ============================================================================

/// Listing tab for `/movies?status=`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovieStatus {
    /// Currently screening
    #[default]
    NowShowing,
    /// Announced, not yet screening
    ComingSoon,
}

impl MovieStatus {
    /// Query-string value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NowShowing => "now-showing",
            Self::ComingSoon => "coming-soon",
        }
    }
}

impl fmt::Display for MovieStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movie in a listing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Movie identifier
    pub movie_id: MovieId,
    /// Title
    pub title: String,
    /// Genre label
    #[serde(default)]
    pub genre: Option<String>,
    /// Audience rating
    #[serde(default)]
    pub rating: Option<f64>,
    /// Runtime in minutes
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Release date as sent by the server
    #[serde(default)]
    pub release_date: Option<String>,
    /// Poster image URL
    #[serde(default)]
    pub poster_url: Option<String>,
}

// ============================================================================
// Cinemas & showtimes
// ============================================================================

/// A city and how many cinemas it has
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityWithCount {
    /// City name, used verbatim as the `city` query parameter
    pub city: String,
    /// Number of cinemas
    #[serde(deserialize_with = "count_from_string_or_number")]
    pub count: u32,
}

/// A cinema within a city
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cinema {
    /// Cinema identifier
    pub cinema_id: CinemaId,
    /// Display name
    pub name: String,
    /// City the cinema is in
    pub city: String,
}

/// One bookable screening in a `showtimes-by-cinema` response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowtimeSlot {
    /// Showtime identifier
    pub showtime_id: ShowtimeId,
    /// Screening start
    pub start_time: DateTime<Utc>,
    /// Price of one seat
    pub ticket_price: Money,
}

/// A movie with its screenings at one cinema on one day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieWithShowtimes {
    /// Movie identifier
    pub movie_id: MovieId,
    /// Title
    pub title: String,
    /// Genre label
    #[serde(default)]
    pub genre: Option<String>,
    /// Runtime in minutes
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Audience rating
    #[serde(default)]
    pub rating: Option<f64>,
    /// Age classification, e.g. `T13`
    #[serde(default)]
    pub age_rating: Option<String>,
    /// Poster image URL
    #[serde(default)]
    pub poster_url: Option<String>,
    /// Projection formats offered, e.g. `2D`, `IMAX`
    #[serde(default)]
    pub features: Vec<String>,
    /// Screenings
    #[serde(default)]
    pub times: Vec<ShowtimeSlot>,
}

impl MovieWithShowtimes {
    /// Look up one of this movie's screenings.
    #[must_use]
    pub fn showtime(&self, showtime_id: ShowtimeId) -> Option<&ShowtimeSlot> {
        self.times.iter().find(|slot| slot.showtime_id == showtime_id)
    }
}

// ============================================================================
// Authentication
// ============================================================================

/// Body of `POST /auth/register`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Plain password, sent over TLS
    pub password: String,
}

/// The account echoed back by a successful registration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    /// Account identifier
    #[serde(alias = "user_id", default)]
    pub id: Option<UserId>,
    /// Display name
    #[serde(alias = "username", default)]
    pub name: Option<String>,
    /// Login email
    #[serde(default)]
    pub email: Option<String>,
}

/// Response of `POST /auth/register`
///
/// Either `user` (success) or `message` (failure reason) is set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Created account
    #[serde(default)]
    pub user: Option<RegisteredUser>,
    /// Server message
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /auth/login`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plain password, sent over TLS
    pub password: String,
}

/// Response of `POST /auth/login`
///
/// Only a present, non-empty `token` means the login succeeded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token
    #[serde(default)]
    pub token: Option<String>,
    /// Server message
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    /// The token, if the server issued a usable one.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }
}

/// Response of `GET /users/me`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account identifier
    pub user_id: UserId,
    /// Display name
    pub username: String,
    /// Login email
    pub email: String,
    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,
}

// ============================================================================
// Chat
// ============================================================================

/// Who wrote a chat message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The signed-in customer
    User,
    /// The support bot
    Bot,
}

/// One message of the conversation history
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Client-assigned message id
    pub id: String,
    /// Message text
    pub text: String,
    /// Author
    pub sender: Sender,
    /// When the message was added
    pub timestamp: DateTime<Utc>,
}

/// Body of `POST /chat`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The new user message
    pub message: String,
    /// Whole conversation, including the new message
    pub history: Vec<ChatTurn>,
}

/// Response of `POST /chat`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Bot answer, Markdown
    pub reply: String,
}
