//! Structural well-formedness check for rendered shell text.
//!
//! Parses the text with tree-sitter-bash and reports the first ERROR or
//! MISSING node. This only confirms the text is syntactically well formed;
//! it says nothing about whether the script does the right thing.

use tree_sitter::{Node, Parser};

use crate::error::{Error, Result};

/// Fail with [`Error::Syntax`] if `source` does not parse as bash.
pub fn check_syntax(source: &str) -> Result<()> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_bash::LANGUAGE.into())
        .map_err(|e| Error::Parser(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::Parser("parse was cancelled".to_string()))?;

    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }
    let bad = first_error(root).unwrap_or(root);
    let pos = bad.start_position();
    let snippet = source
        .lines()
        .nth(pos.row)
        .map(|l| l.trim().to_string())
        .unwrap_or_default();
    Err(Error::Syntax {
        line: pos.row + 1,
        column: pos.column + 1,
        snippet,
    })
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if (child.has_error() || child.is_missing())
            && let Some(found) = first_error(child)
        {
            return Some(found);
        }
    }
    None
}
