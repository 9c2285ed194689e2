//! Error types for the Cineplex API client

use thiserror::Error;

/// Errors that can occur when talking to the ticketing API
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, timeout)
    #[error("Request to {endpoint} failed: {message}")]
    RequestFailed {
        /// Logical endpoint name, e.g. `cinemas`
        endpoint: &'static str,
        /// Transport error description
        message: String,
    },

    /// Token missing, invalid or expired
    #[error("Unauthorized (status {status}) on {endpoint}")]
    Unauthorized {
        /// Logical endpoint name
        endpoint: &'static str,
        /// 401 or 403
        status: u16,
    },

    /// Any other non-2xx response
    #[error("API error on {endpoint} (status {status}): {message}")]
    Status {
        /// Logical endpoint name
        endpoint: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// A 2xx response whose body does not match the endpoint's schema
    #[error("Could not decode {endpoint} response: {message}")]
    Decode {
        /// Logical endpoint name
        endpoint: &'static str,
        /// serde error description
        message: String,
    },

    /// The HTTP client could not be built
    #[error("Invalid client configuration: {0}")]
    Configuration(String),
}

impl ApiError {
    /// `true` for errors that mean the stored credentials are no longer valid.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// `true` if the server answered but the body had the wrong shape.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Logical endpoint the error came from, if any.
    #[must_use]
    pub const fn endpoint(&self) -> Option<&'static str> {
        match self {
            Self::RequestFailed { endpoint, .. }
            | Self::Unauthorized { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(*endpoint),
            Self::Configuration(_) => None,
        }
    }
}
