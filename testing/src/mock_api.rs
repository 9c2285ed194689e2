//! Scripted in-memory [`CinemaApi`].

use async_trait::async_trait;
use chrono::NaiveDate;
use cineplex_api::{
    ApiError, ChatRequest, ChatResponse, Cinema, CinemaApi, CinemaId, CityWithCount, LoginRequest,
    LoginResponse, Movie, MovieStatus, MovieWithShowtimes, RegisterRequest, RegisterResponse,
    ShowtimeId, UserProfile,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// A request the mock received, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `movies(status)`
    Movies(MovieStatus),
    /// `occupied_seats(id)`
    OccupiedSeats(ShowtimeId),
    /// `cities()`
    Cities,
    /// `cinemas(city)`
    Cinemas(String),
    /// `showtimes_by_cinema(cinema, date)`
    Showtimes(CinemaId, NaiveDate),
    /// `register` with this email
    Register(String),
    /// `login` with this email
    Login(String),
    /// `me` with this token
    Me(String),
    /// `chat` with this token, message and history length
    Chat {
        /// Bearer token sent
        token: String,
        /// New message
        message: String,
        /// Number of history entries sent
        history_len: usize,
    },
}

type Reply<T> = Result<T, ApiError>;

#[derive(Default)]
struct Script {
    movies: HashMap<MovieStatus, Reply<Vec<Movie>>>,
    occupied: HashMap<ShowtimeId, Reply<Vec<String>>>,
    cities: Option<Reply<Vec<CityWithCount>>>,
    cinemas: HashMap<String, Reply<Vec<Cinema>>>,
    cinema_gates: HashMap<String, Arc<Notify>>,
    showtimes: HashMap<(CinemaId, NaiveDate), Reply<Vec<MovieWithShowtimes>>>,
    register: Option<Reply<RegisterResponse>>,
    login: Option<Reply<LoginResponse>>,
    profiles: HashMap<String, Reply<UserProfile>>,
    chat: Option<Reply<ChatResponse>>,
    calls: Vec<ApiCall>,
}

/// Scripted stand-in for the ticketing API.
///
/// Unscripted list endpoints answer with an empty list, `login` and
/// `register` with an empty body, `me` with 401 and `chat` with a 500.
/// Clones share the script and the call log.
#[derive(Clone, Default)]
pub struct MockCinemaApi {
    script: Arc<Mutex<Script>>,
}

impl MockCinemaApi {
    /// Create a mock with nothing scripted
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: ApiCall) {
        self.script().calls.push(call);
    }

    /// Script the movie list for a tab
    #[must_use]
    pub fn with_movies(self, status: MovieStatus, reply: Reply<Vec<Movie>>) -> Self {
        self.script().movies.insert(status, reply);
        self
    }

    /// Script the occupied seats of a showtime
    #[must_use]
    pub fn with_occupied(self, showtime_id: ShowtimeId, reply: Reply<Vec<String>>) -> Self {
        self.script().occupied.insert(showtime_id, reply);
        self
    }

    /// Script the city list
    #[must_use]
    pub fn with_cities(self, reply: Reply<Vec<CityWithCount>>) -> Self {
        self.script().cities = Some(reply);
        self
    }

    /// Script the cinemas of a city
    #[must_use]
    pub fn with_cinemas(self, city: &str, reply: Reply<Vec<Cinema>>) -> Self {
        self.script().cinemas.insert(city.to_string(), reply);
        self
    }

    /// Hold `cinemas(city)` until the gate is notified
    #[must_use]
    pub fn with_cinemas_gate(self, city: &str, gate: Arc<Notify>) -> Self {
        self.script().cinema_gates.insert(city.to_string(), gate);
        self
    }

    /// Script the showtimes of a cinema on a day
    #[must_use]
    pub fn with_showtimes(
        self,
        cinema_id: CinemaId,
        date: NaiveDate,
        reply: Reply<Vec<MovieWithShowtimes>>,
    ) -> Self {
        self.script().showtimes.insert((cinema_id, date), reply);
        self
    }

    /// Script the registration response
    #[must_use]
    pub fn with_register(self, reply: Reply<RegisterResponse>) -> Self {
        self.script().register = Some(reply);
        self
    }

    /// Script the login response
    #[must_use]
    pub fn with_login(self, reply: Reply<LoginResponse>) -> Self {
        self.script().login = Some(reply);
        self
    }

    /// Script the profile returned for a token
    #[must_use]
    pub fn with_profile(self, token: &str, reply: Reply<UserProfile>) -> Self {
        self.script().profiles.insert(token.to_string(), reply);
        self
    }

    /// Script the chat reply
    #[must_use]
    pub fn with_chat(self, reply: Reply<ChatResponse>) -> Self {
        self.script().chat = Some(reply);
        self
    }

    /// Every call received so far
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.script().calls.clone()
    }

    /// Number of calls matching `predicate`
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&ApiCall) -> bool) -> usize {
        self.script().calls.iter().filter(|call| predicate(call)).count()
    }

    /// Number of `showtimes_by_cinema` calls
    #[must_use]
    pub fn showtime_requests(&self) -> usize {
        self.count(|call| matches!(call, ApiCall::Showtimes(..)))
    }
}

#[async_trait]
impl CinemaApi for MockCinemaApi {
    async fn movies(&self, status: MovieStatus) -> Result<Vec<Movie>, ApiError> {
        self.record(ApiCall::Movies(status));
        self.script().movies.get(&status).cloned().unwrap_or(Ok(Vec::new()))
    }

    async fn occupied_seats(&self, showtime_id: ShowtimeId) -> Result<Vec<String>, ApiError> {
        self.record(ApiCall::OccupiedSeats(showtime_id));
        self.script()
            .occupied
            .get(&showtime_id)
            .cloned()
            .unwrap_or(Ok(Vec::new()))
    }

    async fn cities(&self) -> Result<Vec<CityWithCount>, ApiError> {
        self.record(ApiCall::Cities);
        self.script().cities.clone().unwrap_or(Ok(Vec::new()))
    }

    async fn cinemas(&self, city: &str) -> Result<Vec<Cinema>, ApiError> {
        self.record(ApiCall::Cinemas(city.to_string()));
        let gate = self.script().cinema_gates.get(city).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.script().cinemas.get(city).cloned().unwrap_or(Ok(Vec::new()))
    }

    async fn showtimes_by_cinema(
        &self,
        cinema_id: CinemaId,
        date: NaiveDate,
    ) -> Result<Vec<MovieWithShowtimes>, ApiError> {
        self.record(ApiCall::Showtimes(cinema_id, date));
        self.script()
            .showtimes
            .get(&(cinema_id, date))
            .cloned()
            .unwrap_or(Ok(Vec::new()))
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.record(ApiCall::Register(request.email.clone()));
        self.script().register.clone().unwrap_or_else(|| Ok(RegisterResponse::default()))
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.record(ApiCall::Login(request.email.clone()));
        self.script().login.clone().unwrap_or_else(|| Ok(LoginResponse::default()))
    }

    async fn me(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.record(ApiCall::Me(token.to_string()));
        self.script().profiles.get(token).cloned().unwrap_or(Err(ApiError::Unauthorized {
            endpoint: "me",
            status: 401,
        }))
    }

    async fn chat(&self, token: &str, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.record(ApiCall::Chat {
            token: token.to_string(),
            message: request.message.clone(),
            history_len: request.history.len(),
        });
        self.script().chat.clone().unwrap_or_else(|| {
            Err(ApiError::Status {
                endpoint: "chat",
                status: 500,
                message: String::new(),
            })
        })
    }
}
