//! History command - report persisted drill sessions

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use drill::{DrillConfig, DrillLog, JsonFileStore, RatingTracker};

#[derive(Parser, Debug)]
#[command(about = "Show past drill sessions and the current rating")]
pub struct HistoryArgs {
    #[arg(long, default_value = "drill.toml")]
    pub config: PathBuf,
}

pub fn execute(args: HistoryArgs) -> Result<()> {
    let config = DrillConfig::load(&args.config)
        .with_context(|| format!("reading {}", args.config.display()))?;
    let store = JsonFileStore::open(&config.store_path)
        .with_context(|| format!("opening store {}", config.store_path.display()))?;

    let rating = RatingTracker::load(&store, config.initial_rating, config.rating_delta);
    let log = DrillLog::load(&store).context("reading drill results")?;

    if log.is_empty() {
        println!("No drill sessions recorded yet. Rating: {}", rating.rating());
        return Ok(());
    }
    print!("{}", log.generate_report(rating.rating()));
    Ok(())
}
