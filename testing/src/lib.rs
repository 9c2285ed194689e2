//! # Cineplex Testing
//!
//! Testing utilities for Cineplex features.
//!
//! This crate provides:
//! - [`FixedClock`]: deterministic time
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`MockCinemaApi`]: scripted, call-recording stand-in for the remote API
//!
//! ## Example
//!
//! ```ignore
//! use cineplex_testing::{MockCinemaApi, test_clock};
//!
//! let api = MockCinemaApi::new().with_cities(vec![city("Hà Nội", 3)]);
//! let env = BookingEnvironment::new(Arc::new(api.clone()), Arc::new(test_clock()));
//! ```

pub mod mock_api;
pub mod reducer_test;

use chrono::{DateTime, NaiveDate, Utc};
use cineplex_core::environment::Clock;

pub use mock_api::{ApiCall, MockCinemaApi};
pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, NaiveDate, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, and reports the UTC calendar day as
    /// "today" so tests do not depend on the machine's time zone.
    ///
    /// # Example
    ///
    /// ```
    /// use cineplex_testing::mocks::FixedClock;
    /// use cineplex_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }

        fn today(&self) -> NaiveDate {
            self.time.date_naive()
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

pub use mocks::{FixedClock, test_clock};

/// Install a compact tracing subscriber for tests that want log output.
///
/// Honors `RUST_LOG`; safe to call from many tests.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default());
    }
}
