//! Ticketing API client implementation

use crate::error::ApiError;
use crate::types::{
    ChatRequest, ChatResponse, Cinema, CinemaId, CityWithCount, LoginRequest, LoginResponse, Movie,
    MovieStatus, MovieWithShowtimes, RegisterRequest, RegisterResponse, ShowtimeId, UserProfile,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Base URL of a locally running ticketing API
pub const DEFAULT_API_URL: &str = "http://localhost:5001/api";

/// Every remote call the client makes.
///
/// Feature reducers depend on this trait rather than on [`ApiClient`], so
/// tests can substitute a scripted implementation.
#[async_trait]
pub trait CinemaApi: Send + Sync {
    /// `GET /movies?status=`
    async fn movies(&self, status: MovieStatus) -> Result<Vec<Movie>, ApiError>;

    /// `GET /showtimes/{id}/occupied-seats`, raw seat labels such as `"A1"`
    async fn occupied_seats(&self, showtime_id: ShowtimeId) -> Result<Vec<String>, ApiError>;

    /// `GET /cinemas/cities`
    async fn cities(&self) -> Result<Vec<CityWithCount>, ApiError>;

    /// `GET /cinemas?city=`
    async fn cinemas(&self, city: &str) -> Result<Vec<Cinema>, ApiError>;

    /// `GET /showtimes-by-cinema?cinemaId=&date=YYYY-MM-DD`
    async fn showtimes_by_cinema(
        &self,
        cinema_id: CinemaId,
        date: NaiveDate,
    ) -> Result<Vec<MovieWithShowtimes>, ApiError>;

    /// `POST /auth/register`
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError>;

    /// `POST /auth/login`
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    /// `GET /users/me` with a bearer token
    async fn me(&self, token: &str) -> Result<UserProfile, ApiError>;

    /// `POST /chat` with a bearer token
    async fn chat(&self, token: &str, request: &ChatRequest) -> Result<ChatResponse, ApiError>;
}

/// reqwest-backed [`CinemaApi`]
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    api_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL (e.g. `http://localhost:5001/api`)
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: normalize_base(api_url.into()),
        }
    }

    /// Create a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the TLS backend cannot be initialised.
    pub fn with_timeout(api_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            api_url: normalize_base(api_url.into()),
        })
    }

    /// Base URL requests are issued against
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    async fn send(endpoint: &'static str, request: RequestBuilder) -> Result<Response, ApiError> {
        request.send().await.map_err(|e| {
            tracing::debug!(endpoint, error = %e, "Request failed before a response");
            ApiError::RequestFailed {
                endpoint,
                message: e.to_string(),
            }
        })
    }

    /// Issue a request and decode a 2xx body into `T`.
    async fn fetch<T: DeserializeOwned>(
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = Self::send(endpoint, request).await?;

        match response.status() {
            status if status.is_success() => decode(endpoint, response).await,
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(ApiError::Unauthorized {
                    endpoint,
                    status: status.as_u16(),
                })
            },
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    endpoint,
                    status: status.as_u16(),
                    message,
                })
            },
        }
    }

    /// Like [`ApiClient::fetch`], but a non-2xx body that still matches `T`
    /// is returned as `Ok`: the auth endpoints report failures as
    /// `{"message": ...}` with a 4xx status.
    async fn fetch_lenient<T: DeserializeOwned>(
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = Self::send(endpoint, request).await?;
        let status = response.status();

        if status.is_success() {
            return decode(endpoint, response).await;
        }

        let body = response.text().await.unwrap_or_default();
        serde_json::from_str(&body).map_err(|_| ApiError::Status {
            endpoint,
            status: status.as_u16(),
            message: body,
        })
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn normalize_base(mut api_url: String) -> String {
    while api_url.ends_with('/') {
        api_url.pop();
    }
    api_url
}

async fn decode<T: DeserializeOwned>(endpoint: &'static str, response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(|e| ApiError::RequestFailed {
        endpoint,
        message: e.to_string(),
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!(endpoint, error = %e, "Response did not match schema");
        ApiError::Decode {
            endpoint,
            message: e.to_string(),
        }
    })
}

#[async_trait]
impl CinemaApi for ApiClient {
    async fn movies(&self, status: MovieStatus) -> Result<Vec<Movie>, ApiError> {
        let request = self
            .client
            .get(self.url("/movies"))
            .query(&[("status", status.as_str())]);
        Self::fetch("movies", request).await
    }

    async fn occupied_seats(&self, showtime_id: ShowtimeId) -> Result<Vec<String>, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("/showtimes/{showtime_id}/occupied-seats")));
        Self::fetch("occupied-seats", request).await
    }

    async fn cities(&self) -> Result<Vec<CityWithCount>, ApiError> {
        let request = self.client.get(self.url("/cinemas/cities"));
        Self::fetch("cities", request).await
    }

    async fn cinemas(&self, city: &str) -> Result<Vec<Cinema>, ApiError> {
        let request = self.client.get(self.url("/cinemas")).query(&[("city", city)]);
        Self::fetch("cinemas", request).await
    }

    async fn showtimes_by_cinema(
        &self,
        cinema_id: CinemaId,
        date: NaiveDate,
    ) -> Result<Vec<MovieWithShowtimes>, ApiError> {
        let request = self.client.get(self.url("/showtimes-by-cinema")).query(&[
            ("cinemaId", cinema_id.to_string()),
            ("date", date.format("%Y-%m-%d").to_string()),
        ]);
        Self::fetch("showtimes-by-cinema", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let request = self.client.post(self.url("/auth/register")).json(request);
        Self::fetch_lenient("register", request).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let request = self.client.post(self.url("/auth/login")).json(request);
        Self::fetch_lenient("login", request).await
    }

    async fn me(&self, token: &str) -> Result<UserProfile, ApiError> {
        let request = self.client.get(self.url("/users/me")).bearer_auth(token);
        Self::fetch("me", request).await
    }

    async fn chat(&self, token: &str, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let request = self
            .client
            .post(self.url("/chat"))
            .bearer_auth(token)
            .json(request);
        Self::fetch("chat", request).await
    }
}
