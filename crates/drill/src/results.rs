//! Drill results: per-puzzle attempts, the persisted session log and reports

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StoreError;
use crate::store::{get_json, set_json, KeyValueStore};

/// Store key for the session log
pub const RESULTS_KEY: &str = "drillResults";

/// Outcome of one puzzle attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    pub success: bool,
    /// From the start of the player's turn to the deciding move
    pub time_ms: u64,
}

/// Results of one finished drill session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillLogEntry {
    /// Epoch milliseconds at which the session ended
    pub timestamp: u64,
    pub results: Vec<AttemptResult>,
}

/// Append-only log of drill sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrillLog {
    pub entries: Vec<DrillLogEntry>,
}

impl DrillLog {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(get_json(store, RESULTS_KEY)?.unwrap_or_default())
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        set_json(store, RESULTS_KEY, self)
    }

    /// Read the stored log, add `entry` and write it back.
    pub fn append<S: KeyValueStore + ?Sized>(
        store: &mut S,
        entry: DrillLogEntry,
    ) -> Result<(), StoreError> {
        let mut log = Self::load(&*store)?;
        log.entries.push(entry);
        log.save(store)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Generate a text report over every logged session
    pub fn generate_report(&self, rating: i64) -> String {
        let mut report = String::new();
        report.push_str("=== Drill History ===\n\n");
        report.push_str(&format!("Rating: {rating}\n"));
        report.push_str(&format!("Sessions: {}\n\n", self.entries.len()));

        report.push_str(&format!(
            "{:<20} {:>8} {:>8} {:>10}\n",
            "Finished", "Solved", "Tried", "Avg solve"
        ));
        report.push_str(&"-".repeat(50));
        report.push('\n');

        let mut total = Scoreboard::default();
        for entry in &self.entries {
            let board = Scoreboard::from_results(&entry.results);
            report.push_str(&format!(
                "{:<20} {:>8} {:>8} {:>10}\n",
                format_timestamp(entry.timestamp),
                board.solved,
                board.attempted,
                board.average_label()
            ));
            total.absorb(&board);
        }

        report.push_str(&"-".repeat(50));
        report.push('\n');
        report.push_str(&format!(
            "{:<20} {:>8} {:>8} {:>10}\n",
            "Total",
            total.solved,
            total.attempted,
            total.average_label()
        ));
        report
    }
}

fn format_timestamp(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Solved/attempted counts and average solve time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub solved: u32,
    pub attempted: u32,
    /// Sum of solve times of successful attempts
    solve_ms: u64,
}

impl Scoreboard {
    pub fn from_results(results: &[AttemptResult]) -> Self {
        let mut board = Self::default();
        for r in results {
            board.attempted += 1;
            if r.success {
                board.solved += 1;
                board.solve_ms += r.time_ms;
            }
        }
        board
    }

    pub fn failed(&self) -> u32 {
        self.attempted - self.solved
    }

    /// Mean time of the solved puzzles
    pub fn average_solve_ms(&self) -> Option<u64> {
        (self.solved > 0).then(|| self.solve_ms / u64::from(self.solved))
    }

    fn average_label(&self) -> String {
        match self.average_solve_ms() {
            Some(ms) => format!("{:.1}s", ms as f64 / 1000.0),
            None => "-".to_string(),
        }
    }

    fn absorb(&mut self, other: &Scoreboard) {
        self.solved += other.solved;
        self.attempted += other.attempted;
        self.solve_ms += other.solve_ms;
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Solved: {}/{}", self.solved, self.attempted)?;
        if let Some(ms) = self.average_solve_ms() {
            write!(f, "  Avg: {:.1}s", ms as f64 / 1000.0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod results_tests;
