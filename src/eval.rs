//! Command substitution: wrapping constructs so their output is captured
//! with `$( ... )`.
//!
//! [`Evaluable::eval`] renders the construct once, when called, and picks
//! the wrapper from the result: a single line becomes an
//! [`EvalSubshellStatement`], anything longer an [`EvalSubshellBlock`].
//! Later changes to the source construct do not affect an existing
//! wrapper.

use std::fmt;

use log::trace;

use crate::config::FormatConfig;
use crate::node::{Case, Command, Content, For, If, Node, Select, Statement, Subshell, Until, While};
use crate::render;

/// Single-line substitution: `$(cmd)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalSubshellStatement {
    command: String,
}

impl EvalSubshellStatement {
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl fmt::Display for EvalSubshellStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$({})", self.command)
    }
}

/// Multi-line substitution: `$(`, the indented body, then `)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalSubshellBlock {
    lines: Vec<String>,
    indent: String,
}

impl EvalSubshellBlock {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for EvalSubshellBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "$(")?;
        for line in &self.lines {
            if line.is_empty() {
                writeln!(f)?;
            } else {
                writeln!(f, "{}{line}", self.indent)?;
            }
        }
        write!(f, ")")
    }
}

/// The wrapper chosen for an evaluated construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    Statement(EvalSubshellStatement),
    Block(EvalSubshellBlock),
}

impl Evaluation {
    /// Choose the wrapper for already-rendered lines.
    pub(crate) fn from_lines(mut lines: Vec<String>, indent: &str) -> Self {
        if lines.len() == 1 {
            let command = lines.remove(0);
            trace!("eval: single-line wrapper");
            Evaluation::Statement(EvalSubshellStatement { command })
        } else {
            trace!("eval: block wrapper for {} lines", lines.len());
            Evaluation::Block(EvalSubshellBlock {
                lines,
                indent: indent.to_string(),
            })
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Evaluation::Block(_))
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Statement(s) => fmt::Display::fmt(s, f),
            Evaluation::Block(b) => fmt::Display::fmt(b, f),
        }
    }
}

impl From<Evaluation> for String {
    fn from(e: Evaluation) -> Self {
        e.to_string()
    }
}

/// Constructs whose output can be captured with command substitution.
pub trait Evaluable {
    /// Lines placed inside `$( ... )`, rendered with `config`.
    fn evaluated_lines(&self, config: &FormatConfig) -> Vec<String>;

    /// Wrap with the default formatting policy.
    fn eval(&self) -> Evaluation {
        self.eval_with(&FormatConfig::default())
    }

    fn eval_with(&self, config: &FormatConfig) -> Evaluation {
        Evaluation::from_lines(self.evaluated_lines(config), &config.indent)
    }
}

/// Constructs that can be moved into a `( ... )` subshell.
pub trait Subshellable: Into<Content> + Sized {
    fn subshell(self) -> Subshell {
        Subshell::with_content([self])
    }
}

fn own_lines(node: &Node, config: &FormatConfig) -> Vec<String> {
    render::node_lines(node, config)
}

macro_rules! evaluable {
    ($($ty:ident),*) => {
        $(
            impl Evaluable for $ty {
                fn evaluated_lines(&self, config: &FormatConfig) -> Vec<String> {
                    own_lines(self.as_node(), config)
                }
            }

            impl Subshellable for $ty {}
        )*
    };
}

evaluable!(Statement, Command, If, While, Until, For, Case, Select);

/// A subshell evaluates to its body, without the parentheses.
impl Evaluable for Subshell {
    fn evaluated_lines(&self, config: &FormatConfig) -> Vec<String> {
        render::content_lines(self.as_node().content(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Decorate;

    #[test]
    fn statement_evaluates_inline() {
        let mut s = Statement::new("ls");
        s.pipe("wc -l");
        let e = s.eval();
        assert!(!e.is_block());
        assert_eq!(e.to_string(), "$(ls | wc -l)");
    }

    #[test]
    fn if_evaluates_as_block() {
        let mut cond = If::with_content("-f a", ["cat a"]);
        cond.otherwise(["echo none"]).unwrap();
        let e = cond.eval();
        assert!(e.is_block());
        assert_eq!(
            e.to_string(),
            "$(\n  if [ -f a ]; then\n    cat a\n  else\n    echo none\n  fi\n)"
        );
    }

    #[test]
    fn wrapper_is_fixed_at_construction() {
        let mut sub = Subshell::with_content(["date"]);
        let before = sub.eval();
        sub.add_content(["hostname"]);
        assert_eq!(before.to_string(), "$(date)");
        assert!(sub.eval().is_block());
    }

    #[test]
    fn subshellable_wraps_in_parens() {
        let sub = Statement::new("cd /tmp").subshell();
        assert_eq!(sub.as_node().content().len(), 1);
    }

    #[test]
    fn block_keeps_blank_lines_unindented() {
        let e = Evaluation::from_lines(vec!["a".into(), String::new(), "b".into()], "  ");
        assert_eq!(e.to_string(), "$(\n  a\n\n  b\n)");
    }
}
