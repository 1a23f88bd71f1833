//! Operator chain attached to a single command-like node.
//!
//! A decorated command renders, left to right, as
//! `<command> [| pipe ...] [&& cmd | || cmd] [< path | > path | >> path]`,
//! with the comment (if any) on its own line above it.

/// Logical connector joining a command to its right-hand operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// `&&`: run next only if previous succeeded
    And,
    /// `||`: run next only if previous failed
    Or,
}

impl Connector {
    /// The connector's shell syntax.
    pub fn as_str(self) -> &'static str {
        match self {
            Connector::And => "&&",
            Connector::Or => "||",
        }
    }
}

/// A connector paired with the command it guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub connector: Connector,
    pub command: String,
}

/// Direction of a redirection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// `<`: read stdin from a file
    Read,
    /// `>`: truncate and write stdout
    Write,
    /// `>>`: append stdout
    Append,
}

impl RedirectMode {
    /// The redirection operator's shell syntax.
    pub fn as_str(self) -> &'static str {
        match self {
            RedirectMode::Read => "<",
            RedirectMode::Write => ">",
            RedirectMode::Append => ">>",
        }
    }
}

/// A redirection of the whole decorated expression to or from a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub mode: RedirectMode,
    pub target: String,
}

/// Pipes, connector, redirection, and comment for one command.
///
/// `pipe` accumulates. The connector and the redirection hold at most one
/// value each, so setting them again replaces the previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoration {
    pipeline: Vec<String>,
    connection: Option<Connection>,
    redirection: Option<Redirection>,
    comment: Option<String>,
}

impl Decoration {
    /// Append a pipe target.
    pub fn pipe(&mut self, command: impl Into<String>) -> &mut Self {
        self.pipeline.push(command.into());
        self
    }

    /// Set an `&&` connector, clearing any `||`.
    pub fn and(&mut self, command: impl Into<String>) -> &mut Self {
        self.connect(Connector::And, command)
    }

    /// Set an `||` connector, clearing any `&&`.
    pub fn or(&mut self, command: impl Into<String>) -> &mut Self {
        self.connect(Connector::Or, command)
    }

    fn connect(&mut self, connector: Connector, command: impl Into<String>) -> &mut Self {
        self.connection = Some(Connection {
            connector,
            command: command.into(),
        });
        self
    }

    /// Redirect stdin from `path`.
    pub fn read(&mut self, path: impl Into<String>) -> &mut Self {
        self.redirect(RedirectMode::Read, path)
    }

    /// Redirect stdout to `path`, truncating it.
    pub fn write(&mut self, path: impl Into<String>) -> &mut Self {
        self.redirect(RedirectMode::Write, path)
    }

    /// Redirect stdout to `path`, appending.
    pub fn append(&mut self, path: impl Into<String>) -> &mut Self {
        self.redirect(RedirectMode::Append, path)
    }

    fn redirect(&mut self, mode: RedirectMode, path: impl Into<String>) -> &mut Self {
        self.redirection = Some(Redirection {
            mode,
            target: path.into(),
        });
        self
    }

    /// Set the comment emitted above the command.
    pub fn set_comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.comment = Some(text.into());
        self
    }

    pub fn pipeline(&self) -> &[String] {
        &self.pipeline
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    pub fn redirection(&self) -> Option<&Redirection> {
        self.redirection.as_ref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// True when nothing has been attached.
    pub fn is_empty(&self) -> bool {
        self.pipeline.is_empty()
            && self.connection.is_none()
            && self.redirection.is_none()
            && self.comment.is_none()
    }

    /// Build the command line with every operator applied in fixed order.
    pub(crate) fn apply(&self, command: &str) -> String {
        let mut line = command.to_string();
        for target in &self.pipeline {
            line.push_str(" | ");
            line.push_str(target);
        }
        if let Some(c) = &self.connection {
            line.push(' ');
            line.push_str(c.connector.as_str());
            line.push(' ');
            line.push_str(&c.command);
        }
        if let Some(r) = &self.redirection {
            line.push(' ');
            line.push_str(r.mode.as_str());
            line.push(' ');
            line.push_str(&r.target);
        }
        line
    }

    /// Comment lines, each prefixed with `# ` unless already a comment.
    pub(crate) fn comment_lines(&self) -> Vec<String> {
        let Some(text) = &self.comment else {
            return Vec::new();
        };
        text.lines()
            .map(|l| {
                if l.trim_start().starts_with('#') {
                    l.to_string()
                } else if l.is_empty() {
                    "#".to_string()
                } else {
                    format!("# {l}")
                }
            })
            .collect()
    }
}

/// Fluent decoration for command-like builders.
///
/// Implemented by [`Statement`](crate::node::Statement) and
/// [`Command`](crate::node::Command); every method returns the builder so
/// calls chain: `stmt.pipe("grep x").write("out.txt")`.
pub trait Decorate {
    fn decoration_mut(&mut self) -> &mut Decoration;

    fn pipe(&mut self, command: impl Into<String>) -> &mut Self {
        self.decoration_mut().pipe(command);
        self
    }

    fn and(&mut self, command: impl Into<String>) -> &mut Self {
        self.decoration_mut().and(command);
        self
    }

    fn or(&mut self, command: impl Into<String>) -> &mut Self {
        self.decoration_mut().or(command);
        self
    }

    fn read(&mut self, path: impl Into<String>) -> &mut Self {
        self.decoration_mut().read(path);
        self
    }

    fn write(&mut self, path: impl Into<String>) -> &mut Self {
        self.decoration_mut().write(path);
        self
    }

    fn append(&mut self, path: impl Into<String>) -> &mut Self {
        self.decoration_mut().append(path);
        self
    }

    fn set_comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.decoration_mut().set_comment(text);
        self
    }
}
