//! Knot Syntax - text to node tree and back.
//!
//! The grammar is a bare S-expression dialect: `tag(child, child, ...)`,
//! quoted strings in `"..."` or `'...'`, single-character escapes with `\`,
//! and `;` line comments.
//!
//! # Architecture
//!
//! - [`parse`] / [`parse_into`]: a character-driven state machine that builds
//!   nodes bottom-up into a [`Tree`]; bare tokens are classified into
//!   [`Scalar`](knot_ir::Scalar) literals (`nil`, booleans, numbers, strings)
//! - [`render`] / [`render_compact`]: iterative serializers that quote and
//!   escape any tag that would otherwise re-parse differently
//!
//! Rendering then parsing yields a structurally equal tree; byte-identical
//! text is not a goal.

mod error;
mod escape;
mod literal;
mod parser;
mod render;

use knot_ir::{NodeId, Tree};

pub use error::{Location, SyntaxError, SyntaxErrorKind};
pub use literal::{classify, is_numeric_literal, is_reserved_word};
pub use parser::parse_into;
pub use render::{render, render_compact};

/// A freshly parsed document.
#[derive(Clone, Debug)]
pub struct Parsed {
    pub tree: Tree,
    pub root: NodeId,
}

/// Parse `source` into a new tree.
///
/// Empty or whitespace-only text (comments included) is "no program" and
/// yields `Ok(None)`.
pub fn parse(source: &str) -> Result<Option<Parsed>, SyntaxError> {
    let mut tree = Tree::with_capacity(source.len());
    let root = parse_into(&mut tree, source)?;
    Ok(root.map(|root| Parsed { tree, root }))
}
