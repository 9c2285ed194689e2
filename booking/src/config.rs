//! Client configuration.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Call `dotenvy::dotenv()` first to pick up a local `.env` file.

use cineplex_api::DEFAULT_API_URL;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Base URL of the ticketing API
pub const API_URL_VAR: &str = "CINEPLEX_API_URL";
/// JSON file holding the session token and cached profile
pub const STORAGE_PATH_VAR: &str = "CINEPLEX_STORAGE_PATH";
/// Default tracing filter
pub const LOG_LEVEL_VAR: &str = "CINEPLEX_LOG_LEVEL";
/// Per-request timeout in seconds; unset means no timeout
pub const REQUEST_TIMEOUT_VAR: &str = "CINEPLEX_REQUEST_TIMEOUT_SECS";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be used
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL, without a trailing slash
    pub api_url: String,
    /// Session file; `None` keeps the session in memory only
    pub storage_path: Option<PathBuf>,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Request timeout; `None` lets a hung request wait indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_path: None,
            log_level: "info".to_string(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let api_url = match get(API_URL_VAR) {
            Some(url) => parse_api_url(url)?,
            None => defaults.api_url,
        };

        let request_timeout = get(REQUEST_TIMEOUT_VAR)
            .map(|value| parse_timeout(&value))
            .transpose()?;

        Ok(Self {
            api_url,
            storage_path: get(STORAGE_PATH_VAR).map(PathBuf::from),
            log_level: get(LOG_LEVEL_VAR).unwrap_or(defaults.log_level),
            request_timeout,
        })
    }
}

fn parse_api_url(url: String) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::Invalid {
            var: API_URL_VAR,
            value: url,
            reason: "expected an http(s) URL".to_string(),
        })
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var: REQUEST_TIMEOUT_VAR,
            value: value.to_string(),
            reason: "must be at least one second".to_string(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::Invalid {
            var: REQUEST_TIMEOUT_VAR,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_point_at_local_api() {
        let config = load(&[]).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_url, "http://localhost:5001/api");
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn variables_override_defaults() {
        let config = load(&[
            (API_URL_VAR, "https://tickets.example.com/api/"),
            (STORAGE_PATH_VAR, "/tmp/session.json"),
            (LOG_LEVEL_VAR, "debug"),
            (REQUEST_TIMEOUT_VAR, "15"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "https://tickets.example.com/api");
        assert_eq!(config.storage_path, Some(PathBuf::from("/tmp/session.json")));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = load(&[(API_URL_VAR, "  "), (REQUEST_TIMEOUT_VAR, "")]).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn bad_timeout_is_rejected() {
        for value in ["soon", "-3", "0"] {
            let error = load(&[(REQUEST_TIMEOUT_VAR, value)]).unwrap_err();
            assert!(matches!(error, ConfigError::Invalid { var: REQUEST_TIMEOUT_VAR, .. }));
        }
    }

    #[test]
    fn non_http_url_is_rejected() {
        assert!(load(&[(API_URL_VAR, "localhost:5001")]).is_err());
    }
}
