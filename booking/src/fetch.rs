//! Bookkeeping for remote lists that are fetched, superseded and replaced.
//!
//! Every request a feature issues is tagged with the [`Generation`] of the
//! chain that issued it. Starting a new request (or settling the chain
//! without one) bumps the generation, so a response carrying an older tag is
//! known to be stale and is dropped.

use std::fmt;

/// Monotonic request tag for one fetch chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) const fn bump(&mut self) -> Self {
        self.0 = self.0.wrapping_add(1);
        *self
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a chain is in its load cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request succeeded (possibly with an empty list)
    Loaded,
    /// The last request failed; the list is empty
    Errored,
}

/// A remotely fetched list together with its load status and generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain<T> {
    items: Vec<T>,
    status: LoadStatus,
    generation: Generation,
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: LoadStatus::Idle,
            generation: Generation::default(),
        }
    }
}

impl<T> Chain<T> {
    /// Current items
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Current status
    #[must_use]
    pub const fn status(&self) -> LoadStatus {
        self.status
    }

    /// Tag of the newest request (or settle)
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// True while a request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// True if `generation` belongs to the newest request
    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    /// Clear the list and start a new request; returns its tag.
    pub fn begin(&mut self) -> Generation {
        self.items.clear();
        self.status = LoadStatus::Loading;
        self.generation.bump()
    }

    /// Settle with an empty list without a request, invalidating any request
    /// still in flight.
    pub fn settle_empty(&mut self, status: LoadStatus) {
        self.items.clear();
        self.status = status;
        self.generation.bump();
    }

    /// Replace the list with a successful response.
    pub fn complete(&mut self, items: Vec<T>) {
        self.items = items;
        self.status = LoadStatus::Loaded;
    }

    /// Record a failed response: the list becomes empty.
    pub fn fail(&mut self) {
        self.items.clear();
        self.status = LoadStatus::Errored;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_bumps_generation_and_clears() {
        let mut chain = Chain::default();
        chain.complete(vec![1, 2]);
        let first = chain.generation();

        let next = chain.begin();

        assert_ne!(first, next);
        assert!(chain.is_current(next));
        assert!(!chain.is_current(first));
        assert!(chain.items().is_empty());
        assert!(chain.is_loading());
    }

    #[test]
    fn settle_invalidates_in_flight_requests() {
        let mut chain: Chain<u8> = Chain::default();
        let in_flight = chain.begin();

        chain.settle_empty(LoadStatus::Loaded);

        assert!(!chain.is_current(in_flight));
        assert_eq!(chain.status(), LoadStatus::Loaded);
    }

    #[test]
    fn failure_empties_the_list() {
        let mut chain = Chain::default();
        chain.complete(vec!["x"]);
        chain.fail();
        assert!(chain.items().is_empty());
        assert_eq!(chain.status(), LoadStatus::Errored);
    }
}
