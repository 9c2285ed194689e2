//! Dependency injection traits.
//!
//! External dependencies are abstracted behind traits and handed to reducers
//! through their `Environment`.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```ignore
/// // Production - uses system clock
/// let clock = SystemClock;
/// let today = clock.today();
///
/// // Test - fixed time for deterministic tests
/// let clock = FixedClock::new(time);
/// assert_eq!(clock.now(), time);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;

    /// The current calendar day as seen by the user.
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
