//! Trainer CLI
//!
//! Explore move trees with variations and run timed puzzle drills.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{drill, explore, history, import};

#[derive(Parser)]
#[command(name = "trainer")]
#[command(version, about = "Chess line explorer and puzzle drills", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a move tree interactively from UCI moves
    Explore(explore::ExploreArgs),

    /// Run a timed puzzle drill
    Drill(drill::DrillArgs),

    /// Convert the Lichess puzzle CSV into per-side dataset files
    Import(import::ImportArgs),

    /// Show past drill sessions and the current rating
    History(history::HistoryArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Explore(args) => explore::execute(args),
        Commands::Drill(args) => drill::execute(args),
        Commands::Import(args) => import::execute(args),
        Commands::History(args) => history::execute(args),
    }
}
