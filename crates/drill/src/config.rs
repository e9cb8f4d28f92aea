//! Drill configuration loaded from TOML

use chess_core::{Color, Countdown};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::ConfigError;
use crate::rating::{DEFAULT_RATING, RATING_DELTA};

/// Largest number of puzzles queued per drill
pub const DEFAULT_QUEUE_CAP: usize = 200;

/// Drill settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillConfig {
    /// Length of one drill session
    pub session_secs: u64,
    /// Remaining time at or below which the clock shows as low
    pub low_time_secs: u64,
    pub rating_delta: i64,
    pub initial_rating: i64,
    pub queue_cap: usize,
    /// Dataset solved when the player has White
    pub white_puzzles: PathBuf,
    pub black_puzzles: PathBuf,
    /// JSON key-value file for rating and results
    pub store_path: PathBuf,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            session_secs: 180,
            low_time_secs: 30,
            rating_delta: RATING_DELTA,
            initial_rating: DEFAULT_RATING,
            queue_cap: DEFAULT_QUEUE_CAP,
            white_puzzles: PathBuf::from("puzzles/lichess_db_puzzle-w-one-move.json"),
            black_puzzles: PathBuf::from("puzzles/lichess_db_puzzle-b-one-move.json"),
            store_path: PathBuf::from("drill_store.json"),
        }
    }
}

impl DrillConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load `path`; a file that does not exist gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn session_length(&self) -> Duration {
        Duration::from_secs(self.session_secs)
    }

    pub fn countdown(&self) -> Countdown {
        Countdown::new(self.session_length()).with_low_time(Duration::from_secs(self.low_time_secs))
    }

    pub fn puzzles_for(&self, side: Color) -> &Path {
        match side {
            Color::White => &self.white_puzzles,
            Color::Black => &self.black_puzzles,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
