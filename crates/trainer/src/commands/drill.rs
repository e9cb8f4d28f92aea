//! Drill command - solve one-move puzzles against the clock

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chess_core::{parse_uci_move, Color, Position, ShakmatyRules, SystemClock};
use clap::Parser;
use drill::{DrillConfig, DrillEngine, DrillEvent, EndReason, FileSource, JsonFileStore, Scoreboard};
use tracing::info;

use super::prompt_line;

#[derive(Parser, Debug)]
#[command(about = "Run a timed puzzle drill")]
pub struct DrillArgs {
    /// Drill settings (TOML); missing file means defaults
    #[arg(long, default_value = "drill.toml")]
    pub config: PathBuf,

    /// Seed for side selection and puzzle order
    #[arg(long)]
    pub seed: Option<u64>,
}

type Engine = DrillEngine<ShakmatyRules, SystemClock, JsonFileStore>;

pub fn execute(args: DrillArgs) -> Result<()> {
    let config = DrillConfig::load(&args.config)
        .with_context(|| format!("reading {}", args.config.display()))?;
    let store = JsonFileStore::open(&config.store_path)
        .with_context(|| format!("opening store {}", config.store_path.display()))?;
    let source = FileSource::new(config.white_puzzles.clone(), config.black_puzzles.clone());
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, store = %config.store_path.display(), "drill configured");

    let mut engine = DrillEngine::new(ShakmatyRules::new(), SystemClock, store, config, seed);

    println!("=== Puzzle Drill ===");
    println!("Rating: {}", engine.rating());
    let events = engine.start(&source).context("starting drill")?;
    println!("You play {}. Enter moves in UCI notation, 'quit' to stop.", engine.player_side());
    println!();
    print_events(&engine, &events);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    while engine.is_active() {
        let prompt = format!("[{}] > ", engine.remaining_label());
        let Some(line) = prompt_line(&mut input, &prompt)? else {
            let events = engine.exit();
            print_events(&engine, &events);
            break;
        };

        // Time runs out between prompts; the late answer does not count.
        let expired = engine.tick();
        if !expired.is_empty() {
            print_events(&engine, &expired);
            break;
        }

        match line.as_str() {
            "" => continue,
            "quit" | "q" | "exit" => {
                let events = engine.exit();
                print_events(&engine, &events);
                break;
            }
            text => match parse_uci_move(text) {
                Ok(mv) => match engine.submit_move(mv) {
                    Ok(events) => print_events(&engine, &events),
                    Err(e) => eprintln!("Error: {e}"),
                },
                Err(e) => eprintln!("Error: {e}"),
            },
        }
    }
    Ok(())
}

fn print_events(engine: &Engine, events: &[DrillEvent]) {
    for event in events {
        match event {
            DrillEvent::PuzzleLoaded { id, rating, setup } => {
                println!("Puzzle {id} ({rating}), opponent played {setup}");
                if let Some(position) = engine.position() {
                    print_board(position, engine.player_side());
                }
            }
            DrillEvent::Solved { time_ms, rating, .. } => {
                println!("Correct! {:.1}s  Rating: {rating}", *time_ms as f64 / 1000.0);
                println!();
            }
            DrillEvent::Failed {
                rating,
                expected,
                played,
                ..
            } => {
                println!("Wrong: {played}, the answer was {expected}.  Rating: {rating}");
                println!();
            }
            DrillEvent::Skipped { id, reason } => {
                eprintln!("Skipping puzzle {id}: {reason}");
            }
            DrillEvent::Ended { reason, results } => {
                let label = match reason {
                    EndReason::TimeUp => "Time's up!",
                    EndReason::QueueExhausted => "No more puzzles.",
                    EndReason::Exited => "Drill stopped.",
                    EndReason::LoadFailed => "Could not load puzzles.",
                };
                println!();
                println!("=== {label} ===");
                println!("{}", Scoreboard::from_results(results));
                println!("Rating: {}", engine.rating());
            }
        }
    }
}

/// Print the board from the player's side, White pieces in upper case.
fn print_board(position: &Position, side: Color) {
    let mut rows: Vec<String> = position
        .placement()
        .split('/')
        .enumerate()
        .map(|(i, rank)| {
            let mut row = format!("{} ", 8 - i);
            for c in rank.chars() {
                match c.to_digit(10) {
                    Some(n) => (0..n).for_each(|_| row.push_str(" .")),
                    None => {
                        row.push(' ');
                        row.push(c);
                    }
                }
            }
            row
        })
        .collect();
    let mut files = "   a b c d e f g h".to_string();

    if side == Color::Black {
        rows.reverse();
        for row in &mut rows {
            let (label, squares) = row.split_at(2);
            let flipped: String = squares.split(' ').rev().collect::<Vec<_>>().join(" ");
            *row = format!("{label} {}", flipped.trim_end());
        }
        files = "   h g f e d c b a".to_string();
    }

    for row in rows {
        println!("{row}");
    }
    println!("{files}");
    println!();
}
