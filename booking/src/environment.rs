//! Dependencies shared by every booking feature.

use crate::config::ClientConfig;
use cineplex_api::{ApiClient, ApiError, CinemaApi};
use cineplex_core::environment::{Clock, SystemClock};
use std::sync::Arc;

/// Environment injected into the booking reducers.
///
/// Production wires an [`ApiClient`] and the [`SystemClock`]; tests use a
/// scripted API and a fixed clock.
#[derive(Clone)]
pub struct BookingEnvironment {
    api: Arc<dyn CinemaApi>,
    clock: Arc<dyn Clock>,
}

impl BookingEnvironment {
    /// Create an environment from its parts.
    #[must_use]
    pub fn new(api: Arc<dyn CinemaApi>, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }

    /// Production environment talking to the configured API.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = match config.request_timeout {
            Some(timeout) => ApiClient::with_timeout(config.api_url.clone(), timeout)?,
            None => ApiClient::new(config.api_url.clone()),
        };
        Ok(Self::new(Arc::new(client), Arc::new(SystemClock)))
    }

    /// Handle to the remote API, for moving into effects.
    #[must_use]
    pub fn api(&self) -> Arc<dyn CinemaApi> {
        Arc::clone(&self.api)
    }

    /// Clock for timestamps and "today".
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub(crate) fn shared_clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }
}
