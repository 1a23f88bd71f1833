//! Error type shared by construction, configuration, and rendering.

use thiserror::Error;

use crate::node::Kind;

/// Errors raised while building or rendering a script.
#[derive(Error, Debug)]
pub enum Error {
    /// A structural operation was attempted out of sequence, e.g. a second
    /// `else` branch or adding a body to a kind that has none.
    #[error("invalid state on {kind}: {reason}")]
    InvalidState { kind: Kind, reason: String },

    /// A formatting configuration value is malformed or could not be parsed.
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    /// Rendered text failed the structural syntax check.
    #[error("syntax error at line {line}, column {column}: {snippet}")]
    Syntax {
        line: usize,
        column: usize,
        snippet: String,
    },

    /// The syntax checker could not be set up.
    #[error("parser unavailable: {0}")]
    Parser(String),

    /// A logger is already installed or could not be created.
    #[error("logger setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_state(kind: Kind, reason: impl Into<String>) -> Self {
        Error::InvalidState {
            kind,
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Error::Configuration {
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
