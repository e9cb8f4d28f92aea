//! Drill rating: a plain counter moved by a fixed delta per puzzle

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Rating for a player with no history
pub const DEFAULT_RATING: i64 = 300;

/// Change applied per solved or failed puzzle
pub const RATING_DELTA: i64 = 1;

/// Store key the rating lives under
pub const RATING_KEY: &str = "monkeyDrill_userRating";

/// Increment/decrement rating counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingTracker {
    rating: i64,
    /// Value restored by `reset`
    initial: i64,
    delta: i64,
}

impl Default for RatingTracker {
    fn default() -> Self {
        Self::new(DEFAULT_RATING, RATING_DELTA)
    }
}

impl RatingTracker {
    pub fn new(initial: i64, delta: i64) -> Self {
        Self {
            rating: initial,
            initial,
            delta,
        }
    }

    /// Restore the rating saved in `store`.
    ///
    /// A missing, unreadable or unparsable value starts from `initial`.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, initial: i64, delta: i64) -> Self {
        let mut tracker = Self::new(initial, delta);
        match store.get(RATING_KEY) {
            Ok(Some(raw)) => match raw.trim().parse() {
                Ok(rating) => tracker.rating = rating,
                Err(_) => warn!(%raw, "stored rating is not a number, using default"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "could not read stored rating"),
        }
        debug!(rating = tracker.rating, "rating loaded");
        tracker
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.set(RATING_KEY, self.rating.to_string())
    }

    pub fn rating(&self) -> i64 {
        self.rating
    }

    pub fn delta(&self) -> i64 {
        self.delta
    }

    /// Returns the new rating
    pub fn increment(&mut self) -> i64 {
        self.rating += self.delta;
        self.rating
    }

    /// Returns the new rating
    pub fn decrement(&mut self) -> i64 {
        self.rating -= self.delta;
        self.rating
    }

    pub fn reset(&mut self) {
        self.rating = self.initial;
    }
}

#[cfg(test)]
#[path = "rating_tests.rs"]
mod rating_tests;
