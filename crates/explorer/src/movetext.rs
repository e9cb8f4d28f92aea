//! Move text for trees with nested variations.
//!
//! [`LineView`] exposes the recursive structure as data; [`render`] turns it
//! into annotation-style text such as `1.e4 e5 (1...d5 2.exd5) 2.Nf3`, with
//! variations of variations to any depth. Bracket style alternates between
//! `()` at odd depths and `[]` at even depths.

use crate::tree::{GameNode, GameTree, NodeId};

/// One line of play: a head node followed by its main-line descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineView {
    /// 0 for the main line, 1 for its variations, and so on
    pub depth: usize,
    pub moves: Vec<LineMove>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMove {
    pub node: NodeId,
    pub san: String,
    pub is_white_move: bool,
    pub move_number: u32,
    /// Lines that replace this move, in creation order
    pub alternatives: Vec<LineView>,
}

/// The main line of `tree` with all variations nested inside.
pub fn main_line_view(tree: &GameTree) -> LineView {
    match tree.root().main_child {
        Some(head) => line_view(tree, head, 0),
        None => LineView {
            depth: 0,
            moves: Vec::new(),
        },
    }
}

/// The line starting at `head`, with its alternatives at `depth + 1`.
pub fn line_view(tree: &GameTree, head: NodeId, depth: usize) -> LineView {
    let moves = tree
        .line_from(head)
        .into_iter()
        .filter_map(|id| tree.node(id))
        .map(|node| LineMove {
            node: node.id,
            san: node.notation.clone().unwrap_or_default(),
            is_white_move: node.is_white_move(),
            move_number: node.move_number,
            alternatives: alternatives_to(tree, node)
                .iter()
                .map(|&alt| line_view(tree, alt, depth + 1))
                .collect(),
        })
        .collect();
    LineView { depth, moves }
}

/// Siblings that branch off where `node` continues its parent's line.
fn alternatives_to<'a>(tree: &'a GameTree, node: &GameNode) -> &'a [NodeId] {
    match node.parent.and_then(|p| tree.node(p)) {
        Some(parent) if parent.main_child == Some(node.id) => &parent.variations,
        _ => &[],
    }
}

/// `N.san` for White, bare `san` for Black.
pub fn format_move(mv: &LineMove) -> String {
    if mv.is_white_move {
        format!("{}.{}", mv.move_number, mv.san)
    } else {
        mv.san.clone()
    }
}

/// Like [`format_move`] but Black moves get `N...` as they open a line.
pub fn format_variation_start(mv: &LineMove) -> String {
    if mv.is_white_move {
        format_move(mv)
    } else {
        format!("{}...{}", mv.move_number, mv.san)
    }
}

pub fn brackets(depth: usize) -> (&'static str, &'static str) {
    match depth {
        0 => ("", ""),
        d if d % 2 == 1 => ("(", ")"),
        _ => ("[", "]"),
    }
}

/// Render the whole tree as move text.
pub fn render(tree: &GameTree) -> String {
    let mut out = String::new();
    render_line(&main_line_view(tree), &mut out);
    out
}

fn render_line(line: &LineView, out: &mut String) {
    let mut needs_number = true;
    for mv in &line.moves {
        if !out.is_empty() && !out.ends_with(&['(', '['][..]) {
            out.push(' ');
        }
        if needs_number {
            out.push_str(&format_variation_start(mv));
        } else {
            out.push_str(&format_move(mv));
        }
        needs_number = !mv.alternatives.is_empty();

        for alt in &mv.alternatives {
            let (open, close) = brackets(alt.depth);
            out.push(' ');
            out.push_str(open);
            render_line(alt, out);
            out.push_str(close);
        }
    }
}

#[cfg(test)]
#[path = "movetext_tests.rs"]
mod movetext_tests;
