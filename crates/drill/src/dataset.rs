//! Puzzle dataset records, files and sources.
//!
//! Datasets are JSON files with a small attribution header and a `puzzles`
//! array. They are produced from the Lichess puzzle CSV export by
//! [`import_csv`], which keeps only puzzles with a single solution move and
//! splits them by the side the player solves for.

use chess_core::{parse_uci_move, Color, Move, MoveRecord, Position, RulesEngine, RulesResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::DatasetError;

/// Default size of a random subset written by the importer
pub const DEFAULT_SUBSET: usize = 10_000;

/// One puzzle as stored in a dataset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleRecord {
    pub id: String,
    /// Position before the opponent's setup move
    pub fen: String,
    #[serde(rename = "setupMove")]
    pub setup_move: String,
    /// UCI moves; a single string in files with one-move puzzles
    #[serde(deserialize_with = "one_or_many", serialize_with = "one_or_many_out")]
    pub solution: Vec<String>,
    pub rating: u32,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(rename = "gameUrl", default)]
    pub game_url: String,
}

fn one_or_many<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }
    Ok(match OneOrMany::deserialize(d)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

fn one_or_many_out<S: Serializer>(moves: &[String], s: S) -> Result<S::Ok, S::Error> {
    match moves {
        [single] => s.serialize_str(single),
        many => many.serialize(s),
    }
}

impl PuzzleRecord {
    /// The side that solves the puzzle: the one not to move in `fen`,
    /// since the opponent plays the setup move first.
    pub fn player_side(&self) -> Option<Color> {
        Position::from_fen(self.fen.as_str())
            .side_to_move()
            .map(Color::other)
    }

    pub fn setup(&self) -> RulesResult<Move> {
        parse_uci_move(&self.setup_move)
    }

    pub fn solution_moves(&self) -> RulesResult<Vec<Move>> {
        self.solution.iter().map(|m| parse_uci_move(m)).collect()
    }

    /// Load `fen` and play the setup move, giving the position the player
    /// solves from.
    pub fn setup_position<R: RulesEngine>(&self, rules: &R) -> RulesResult<MoveRecord> {
        let base = rules.load_position(&self.fen)?;
        rules.apply_move(&base, self.setup()?)
    }
}

/// A dataset file with its attribution header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleFile {
    #[serde(rename = "_source")]
    pub source: String,
    #[serde(rename = "_license")]
    pub license: String,
    #[serde(rename = "_url")]
    pub url: String,
    #[serde(rename = "_generated")]
    pub generated: String,
    #[serde(rename = "_count")]
    pub count: usize,
    #[serde(rename = "_note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub puzzles: Vec<PuzzleRecord>,
}

impl PuzzleFile {
    /// Wrap `puzzles` with the Lichess attribution.
    pub fn lichess(puzzles: Vec<PuzzleRecord>, generated: DateTime<Utc>) -> Self {
        Self {
            source: "Lichess Puzzle Database".to_string(),
            license: "CC0 Public Domain".to_string(),
            url: "https://database.lichess.org/#puzzles".to_string(),
            generated: generated.to_rfc3339_opts(SecondsFormat::Millis, true),
            count: puzzles.len(),
            note: None,
            puzzles,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: Self = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), count = file.puzzles.len(), "dataset loaded");
        Ok(file)
    }

    pub fn save(&self, path: &Path) -> Result<(), DatasetError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

// =============================================================================
// Lichess CSV import
// =============================================================================

/// Column layout of the Lichess puzzle export
const COL_ID: usize = 0;
const COL_FEN: usize = 1;
const COL_MOVES: usize = 2;
const COL_RATING: usize = 3;
const COL_THEMES: usize = 7;
const COL_GAME_URL: usize = 8;

/// One-move puzzles found by [`import_csv`], split by player side.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportSummary {
    /// Data rows read, header excluded
    pub processed: usize,
    pub white: Vec<PuzzleRecord>,
    pub black: Vec<PuzzleRecord>,
}

impl ImportSummary {
    pub fn kept(&self) -> usize {
        self.white.len() + self.black.len()
    }
}

/// Parse one CSV data row.
///
/// Rows with too few columns or a move list other than setup plus one
/// solution move yield `Ok(None)`.
pub fn parse_csv_row(line_no: usize, line: &str) -> Result<Option<PuzzleRecord>, DatasetError> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() <= COL_GAME_URL {
        return Ok(None);
    }
    let moves: Vec<&str> = parts[COL_MOVES].split_whitespace().collect();
    let &[setup, solution] = moves.as_slice() else {
        return Ok(None);
    };
    let rating = parts[COL_RATING]
        .trim()
        .parse()
        .map_err(|e| DatasetError::Csv {
            line: line_no,
            reason: format!("bad rating {:?}: {e}", parts[COL_RATING]),
        })?;

    Ok(Some(PuzzleRecord {
        id: parts[COL_ID].to_string(),
        fen: parts[COL_FEN].to_string(),
        setup_move: setup.to_string(),
        solution: vec![solution.to_string()],
        rating,
        themes: parts[COL_THEMES]
            .split_whitespace()
            .map(str::to_string)
            .collect(),
        game_url: parts[COL_GAME_URL].to_string(),
    }))
}

/// Read a Lichess puzzle CSV export, skipping the header row.
pub fn import_csv<B: BufRead>(reader: B) -> Result<ImportSummary, DatasetError> {
    let mut summary = ImportSummary::default();
    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line.map_err(|source| DatasetError::Io {
            path: PathBuf::from("<csv>"),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        summary.processed += 1;
        if summary.processed % 100_000 == 0 {
            info!(processed = summary.processed, kept = summary.kept(), "importing puzzles");
        }

        let Some(record) = parse_csv_row(idx + 1, &line)? else {
            continue;
        };
        match record.player_side() {
            Some(Color::White) => summary.white.push(record),
            Some(Color::Black) => summary.black.push(record),
            None => {
                return Err(DatasetError::Csv {
                    line: idx + 1,
                    reason: format!("no side to move in {:?}", record.fen),
                })
            }
        }
    }
    info!(
        processed = summary.processed,
        white = summary.white.len(),
        black = summary.black.len(),
        "import finished"
    );
    Ok(summary)
}

/// A random subset of at most `size` puzzles.
pub fn random_subset<G: Rng + ?Sized>(
    puzzles: &[PuzzleRecord],
    size: usize,
    rng: &mut G,
) -> Vec<PuzzleRecord> {
    puzzles.choose_multiple(rng, size).cloned().collect()
}

// =============================================================================
// Sources
// =============================================================================

/// Supplies the puzzles for one player side.
pub trait PuzzleSource {
    fn load(&self, side: Color) -> Result<Vec<PuzzleRecord>, DatasetError>;
}

/// One dataset file per player side.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub white: PathBuf,
    pub black: PathBuf,
}

impl FileSource {
    pub fn new(white: impl Into<PathBuf>, black: impl Into<PathBuf>) -> Self {
        Self {
            white: white.into(),
            black: black.into(),
        }
    }
}

impl PuzzleSource for FileSource {
    fn load(&self, side: Color) -> Result<Vec<PuzzleRecord>, DatasetError> {
        let path = match side {
            Color::White => &self.white,
            Color::Black => &self.black,
        };
        info!(%side, path = %path.display(), "loading puzzles");
        Ok(PuzzleFile::load(path)?.puzzles)
    }
}

/// Puzzles held in memory, split by the side each record's FEN implies.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    white: Vec<PuzzleRecord>,
    black: Vec<PuzzleRecord>,
}

impl MemorySource {
    pub fn new(puzzles: impl IntoIterator<Item = PuzzleRecord>) -> Self {
        let mut source = Self::default();
        for p in puzzles {
            match p.player_side() {
                Some(Color::White) => source.white.push(p),
                Some(Color::Black) => source.black.push(p),
                None => debug!(id = %p.id, "puzzle without side to move dropped"),
            }
        }
        source
    }
}

impl PuzzleSource for MemorySource {
    fn load(&self, side: Color) -> Result<Vec<PuzzleRecord>, DatasetError> {
        Ok(match side {
            Color::White => self.white.clone(),
            Color::Black => self.black.clone(),
        })
    }
}

impl<P: PuzzleSource + ?Sized> PuzzleSource for &P {
    fn load(&self, side: Color) -> Result<Vec<PuzzleRecord>, DatasetError> {
        (**self).load(side)
    }
}

#[cfg(test)]
#[path = "dataset_tests.rs"]
mod dataset_tests;
