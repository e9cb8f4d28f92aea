//! Import command - convert the Lichess puzzle CSV into dataset files

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chess_core::Color;
use chrono::Utc;
use clap::Parser;
use drill::{import_csv, random_subset, PuzzleFile, PuzzleRecord, DEFAULT_SUBSET};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Convert the Lichess puzzle CSV into per-side dataset files")]
pub struct ImportArgs {
    /// Lichess puzzle export (lichess_db_puzzle.csv)
    #[arg(long)]
    pub csv: PathBuf,

    /// Directory receiving the white and black dataset files
    #[arg(long, default_value = "puzzles")]
    pub out_dir: PathBuf,

    /// Puzzles kept per side
    #[arg(long, default_value_t = DEFAULT_SUBSET)]
    pub limit: usize,

    /// Seed for subset sampling
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Dataset file name for puzzles solved as `side`.
pub fn dataset_file_name(side: Color) -> &'static str {
    match side {
        Color::White => "lichess_db_puzzle-w-one-move.json",
        Color::Black => "lichess_db_puzzle-b-one-move.json",
    }
}

pub fn execute(args: ImportArgs) -> Result<()> {
    let file = File::open(&args.csv).with_context(|| format!("opening {}", args.csv.display()))?;
    println!("Reading {}...", args.csv.display());
    let summary = import_csv(BufReader::new(file)).context("parsing puzzle CSV")?;

    println!("Processed: {}", summary.processed);
    println!("One-move puzzles: {}", summary.kept());
    println!("  White to solve: {}", summary.white.len());
    println!("  Black to solve: {}", summary.black.len());

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    for (side, puzzles) in [(Color::White, &summary.white), (Color::Black, &summary.black)] {
        let subset = random_subset(puzzles, args.limit, &mut rng);
        let path = args.out_dir.join(dataset_file_name(side));
        write_dataset(&path, subset, puzzles.len())?;
    }
    Ok(())
}

fn write_dataset(path: &Path, subset: Vec<PuzzleRecord>, total: usize) -> Result<()> {
    let count = subset.len();
    info!(path = %path.display(), count, total, "writing dataset");
    let mut file = PuzzleFile::lichess(subset, Utc::now());
    if count < total {
        file = file.with_note(format!("Random subset of {count} from {total} total puzzles"));
    }
    file.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {count} puzzles to {}", path.display());
    Ok(())
}
