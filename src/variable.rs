//! Named shell variables.

use std::fmt::Display;

use crate::node::Statement;

/// A shell variable by name. Holds no value: operations produce statements
/// or test expressions that refer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `$name`
    pub fn reference(&self) -> String {
        format!("${}", self.name)
    }

    /// `name=<expr>`. The expression is emitted verbatim, so it may be a
    /// substitution such as [`Subshell::eval_command`](crate::node::Subshell::eval_command)
    /// or an [`Evaluation`](crate::eval::Evaluation).
    pub fn set(&self, expr: impl Display) -> Statement {
        Statement::new(format!("{}={expr}", self.name))
    }

    /// `export name=<expr>`
    pub fn export(&self, expr: impl Display) -> Statement {
        Statement::new(format!("export {}={expr}", self.name))
    }

    /// `local name=<expr>`, for use inside function bodies.
    pub fn local(&self, expr: impl Display) -> Statement {
        Statement::new(format!("local {}={expr}", self.name))
    }

    /// `unset name`
    pub fn unset(&self) -> Statement {
        Statement::new(format!("unset {}", self.name))
    }

    /// Test expression that holds when the variable is empty or unset:
    /// `-z "$name"`. Nothing is evaluated here; use it as a condition.
    pub fn is_empty(&self) -> String {
        format!("-z \"${}\"", self.name)
    }

    /// Test expression that holds when the variable is non-empty: `-n "$name"`.
    pub fn is_not_empty(&self) -> String {
        format!("-n \"${}\"", self.name)
    }
}
