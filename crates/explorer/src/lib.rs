//! Branching move tree for exploring chess lines.
//!
//! - [`tree`]: the arena of positions with main line and variations
//! - [`navigation`]: variation-aware cursor commands
//! - [`movetext`]: nested rendering of the tree
//! - [`session`]: an [`Explorer`] bundling the above with a rules engine

pub mod error;
pub mod movetext;
pub mod navigation;
pub mod session;
pub mod tree;

pub use error::{TreeError, TreeResult};
pub use movetext::{render, LineMove, LineView};
pub use navigation::CurrentPath;
pub use session::Explorer;
pub use tree::{Continuation, GameNode, GameTree, NodeId};
