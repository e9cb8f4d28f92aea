//! Explore command - grow a move tree from typed moves
//!
//! Moves are entered in UCI notation. Playing a move away from the end of
//! the current line starts a variation; replaying an existing move follows it.

use std::io;
use std::str::FromStr;

use anyhow::{Context, Result};
use chess_core::{coord_to_sq, sq_to_coord, Color, ShakmatyRules, Square};
use clap::Parser;
use explorer::{Explorer, NodeId};

use super::prompt_line;

#[derive(Parser, Debug)]
#[command(about = "Build a move tree interactively")]
pub struct ExploreArgs {
    /// Starting position (defaults to the initial position)
    #[arg(long)]
    pub fen: Option<String>,
}

/// One line of input at the explorer prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExploreCommand {
    Move(String),
    Back,
    Forward,
    Start,
    End,
    Goto(NodeId),
    Tree,
    Fen,
    Attackers(Square, Color),
    Help,
    Quit,
}

impl FromStr for ExploreCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["back" | "b"] => Ok(Self::Back),
            ["forward" | "f"] => Ok(Self::Forward),
            ["start"] => Ok(Self::Start),
            ["end"] => Ok(Self::End),
            ["tree"] => Ok(Self::Tree),
            ["fen"] => Ok(Self::Fen),
            ["help" | "?"] => Ok(Self::Help),
            ["quit" | "q" | "exit"] => Ok(Self::Quit),
            ["goto", id] => id
                .parse()
                .map(Self::Goto)
                .map_err(|_| format!("bad node id: {id}")),
            ["attackers", square, side] => {
                let sq = coord_to_sq(square).ok_or_else(|| format!("bad square: {square}"))?;
                Ok(Self::Attackers(sq, side.parse()?))
            }
            [mv] => Ok(Self::Move(mv.to_string())),
            [] => Err("empty command".to_string()),
            _ => Err(format!("unknown command: {line}")),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  <uci move>                 play a move, e.g. e2e4 or e7e8q");
    println!("  back | forward             step along the current line");
    println!("  start | end                jump to either end of the line");
    println!("  goto <node>                jump to a node by id");
    println!("  tree                       show the movetext and continuations");
    println!("  fen                        show the current position");
    println!("  attackers <sq> <side>      pieces of a side attacking a square");
    println!("  quit");
}

pub fn execute(args: ExploreArgs) -> Result<()> {
    let rules = ShakmatyRules::new();
    let mut explorer = match &args.fen {
        Some(fen) => Explorer::from_fen(rules, fen).context("loading starting position")?,
        None => Explorer::new(rules),
    };

    println!("=== Line Explorer ===");
    print_help();
    println!();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    while let Some(line) = prompt_line(&mut input, &prompt(&explorer))? {
        if line.is_empty() {
            continue;
        }
        let cmd = match line.parse::<ExploreCommand>() {
            Ok(cmd) => cmd,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        if cmd == ExploreCommand::Quit {
            break;
        }
        run(&mut explorer, cmd);
    }
    Ok(())
}

fn prompt(explorer: &Explorer<ShakmatyRules>) -> String {
    match explorer.move_history().last() {
        Some(san) => format!("[{} {}] > ", explorer.tree().current_id(), san),
        None => "[start] > ".to_string(),
    }
}

fn run(explorer: &mut Explorer<ShakmatyRules>, cmd: ExploreCommand) {
    match cmd {
        ExploreCommand::Move(mv) => match explorer.make_uci_move(&mv) {
            Ok(id) => println!("{}", describe(explorer, id)),
            Err(e) => eprintln!("Error: {e}"),
        },
        ExploreCommand::Back => report_step(explorer.go_backward()),
        ExploreCommand::Forward => report_step(explorer.go_forward()),
        ExploreCommand::Start => report_step(explorer.go_to_start()),
        ExploreCommand::End => report_step(explorer.go_to_end()),
        ExploreCommand::Goto(id) => match explorer.jump_to(id) {
            Ok(()) => println!("{}", describe(explorer, id)),
            Err(e) => eprintln!("Error: {e}"),
        },
        ExploreCommand::Tree => print_tree(explorer),
        ExploreCommand::Fen => println!("{}", explorer.position()),
        ExploreCommand::Attackers(sq, side) => match explorer.attackers(sq, side) {
            Ok(squares) if squares.is_empty() => {
                println!("No {side} pieces attack {}", sq_to_coord(sq))
            }
            Ok(squares) => {
                let list: Vec<String> = squares.into_iter().map(sq_to_coord).collect();
                println!("{side} attackers of {}: {}", sq_to_coord(sq), list.join(" "));
            }
            Err(e) => eprintln!("Error: {e}"),
        },
        ExploreCommand::Help => print_help(),
        ExploreCommand::Quit => {}
    }
}

fn report_step(moved: bool) {
    if !moved {
        println!("(no move in that direction)");
    }
}

fn describe(explorer: &Explorer<ShakmatyRules>, id: NodeId) -> String {
    let line = explorer.move_history().join(" ");
    let tag = if explorer.is_at_final_position() { "" } else { " ..." };
    format!("node {id}: {line}{tag}")
}

fn print_tree(explorer: &Explorer<ShakmatyRules>) {
    let text = explorer.movetext();
    println!("{}", if text.is_empty() { "(no moves)" } else { text.as_str() });

    let tree = explorer.tree();
    for cont in explorer.continuations() {
        let sans: Vec<&str> = cont
            .moves
            .iter()
            .filter_map(|&id| tree.node(id).and_then(|n| n.notation.as_deref()))
            .collect();
        let marker = if cont.is_main_line { "*" } else { " " };
        println!(" {marker} node {:>3}: {}", cont.head, sans.join(" "));
    }
}

#[cfg(test)]
#[path = "explore_tests.rs"]
mod explore_tests;
