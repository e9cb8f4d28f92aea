//! Puzzle sessions and timed puzzle drills
//!
//! This crate provides:
//! - A puzzle session state machine that validates moves against a fixed
//!   solution and plays the opponent's replies
//! - A timed drill engine with a puzzle queue, a countdown and a rating
//! - Puzzle dataset files and conversion from the Lichess CSV export
//! - A key-value store for the rating and the drill result log
//!
//! # Usage
//!
//! ```bash
//! # Convert the Lichess puzzle export into per-side dataset files
//! cargo run -p trainer -- import --csv lichess_db_puzzle.csv --out-dir puzzles
//!
//! # Run a three-minute drill
//! cargo run -p trainer -- drill
//! ```

mod config;
mod dataset;
mod engine;
mod error;
mod puzzle;
mod rating;
mod results;
mod store;

pub use config::*;
pub use dataset::*;
pub use engine::*;
pub use error::*;
pub use puzzle::*;
pub use rating::*;
pub use results::*;
pub use store::*;
