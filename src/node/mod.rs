//! The construct tree: node kinds, content, and typed builders.
//!
//! Every construct is a [`Node`] with a kind-specific payload, an ordered
//! body of [`Content`], and (for command-like kinds) a [`Decoration`].
//! The typed builders ([`Statement`], [`If`], [`While`], ...) wrap a `Node`
//! and expose only the operations that make sense for their kind; they
//! convert into [`Content`] when nested into a parent.

pub mod block;
pub mod decoration;
pub mod leaf;
pub mod script;

pub use block::{Case, CaseOption, For, Function, If, IfState, Select, Subshell, Until, While};
pub use decoration::{Connection, Connector, Decorate, Decoration, RedirectMode, Redirection};
pub use leaf::{Command, Statement};
pub use script::Script;

use std::fmt;

use log::trace;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::id::NodeId;

/// Discriminator for every construct the tree can hold.
///
/// The serialized names double as configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Kind {
    RawLine,
    Statement,
    Command,
    If,
    ElseIf,
    Else,
    While,
    Until,
    For,
    Case,
    CaseOption,
    Select,
    Function,
    Subshell,
    Script,
}

impl Kind {
    pub const ALL: [Kind; 15] = [
        Kind::RawLine,
        Kind::Statement,
        Kind::Command,
        Kind::If,
        Kind::ElseIf,
        Kind::Else,
        Kind::While,
        Kind::Until,
        Kind::For,
        Kind::Case,
        Kind::CaseOption,
        Kind::Select,
        Kind::Function,
        Kind::Subshell,
        Kind::Script,
    ];

    /// Configuration key for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::RawLine => "rawLine",
            Kind::Statement => "statement",
            Kind::Command => "command",
            Kind::If => "if",
            Kind::ElseIf => "elseIf",
            Kind::Else => "else",
            Kind::While => "while",
            Kind::Until => "until",
            Kind::For => "for",
            Kind::Case => "case",
            Kind::CaseOption => "caseOption",
            Kind::Select => "select",
            Kind::Function => "function",
            Kind::Subshell => "subshell",
            Kind::Script => "script",
        }
    }

    /// Whether nodes of this kind hold a body.
    pub fn accepts_body(self) -> bool {
        !matches!(self, Kind::RawLine | Kind::Statement | Kind::Command)
    }

    /// Whether nodes of this kind carry a decoration.
    pub fn is_decoratable(self) -> bool {
        matches!(self, Kind::Statement | Kind::Command)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition guarding an `if`, `elif`, `while`, or `until`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// A test expression, rendered inside `[ ... ]`.
    Test(String),
    /// A command whose exit status is the condition, rendered verbatim.
    Command(String),
}

impl Condition {
    pub fn test(expr: impl Into<String>) -> Self {
        Condition::Test(expr.into())
    }

    pub fn command(cmd: impl Into<String>) -> Self {
        Condition::Command(cmd.into())
    }

    pub(crate) fn render(&self) -> String {
        match self {
            Condition::Test(expr) => format!("[ {expr} ]"),
            Condition::Command(cmd) => cmd.clone(),
        }
    }
}

impl From<&str> for Condition {
    fn from(expr: &str) -> Self {
        Condition::Test(expr.to_string())
    }
}

impl From<String> for Condition {
    fn from(expr: String) -> Self {
        Condition::Test(expr)
    }
}

/// Kind-specific payload of a node.
#[derive(Debug)]
pub(crate) enum Construct {
    RawLine(String),
    Statement {
        text: String,
        /// Function this statement calls, kept for traceability only.
        callee: Option<NodeId>,
    },
    Command {
        program: String,
        args: Vec<String>,
    },
    If {
        condition: Condition,
        branches: Vec<Node>,
        state: IfState,
    },
    ElseIf(Condition),
    Else,
    While(Condition),
    Until(Condition),
    For {
        variable: String,
        items: Vec<String>,
    },
    Case(String),
    CaseOption(String),
    Select {
        variable: String,
        items: Vec<String>,
    },
    Function(String),
    Subshell,
    Script {
        shebang: Option<String>,
    },
}

impl Construct {
    fn kind(&self) -> Kind {
        match self {
            Construct::RawLine(_) => Kind::RawLine,
            Construct::Statement { .. } => Kind::Statement,
            Construct::Command { .. } => Kind::Command,
            Construct::If { .. } => Kind::If,
            Construct::ElseIf(_) => Kind::ElseIf,
            Construct::Else => Kind::Else,
            Construct::While(_) => Kind::While,
            Construct::Until(_) => Kind::Until,
            Construct::For { .. } => Kind::For,
            Construct::Case(_) => Kind::Case,
            Construct::CaseOption(_) => Kind::CaseOption,
            Construct::Select { .. } => Kind::Select,
            Construct::Function(_) => Kind::Function,
            Construct::Subshell => Kind::Subshell,
            Construct::Script { .. } => Kind::Script,
        }
    }
}

/// One child in a node's body: a nested node or an opaque text line.
#[derive(Debug)]
pub enum Content {
    Line(String),
    Node(Node),
}

impl Content {
    fn matches(&self, pattern: &Regex) -> bool {
        match self {
            Content::Line(text) => pattern.is_match(text),
            Content::Node(node) => node.literal().is_some_and(|t| pattern.is_match(t)),
        }
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Line(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Line(text)
    }
}

impl From<Node> for Content {
    fn from(node: Node) -> Self {
        Content::Node(node)
    }
}

/// A construct in the tree.
///
/// A node is owned by exactly one parent. It is intentionally not `Clone`:
/// a copy would duplicate its identifier.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    pub(crate) construct: Construct,
    pub(crate) content: Vec<Content>,
    pub(crate) decoration: Option<Decoration>,
}

impl Node {
    pub(crate) fn new(construct: Construct) -> Self {
        let decoration = construct
            .kind()
            .is_decoratable()
            .then(Decoration::default);
        Self {
            id: NodeId::fresh(),
            construct,
            content: Vec::new(),
            decoration,
        }
    }

    /// A raw text line with its own identity. Its text is never parsed.
    pub fn raw(text: impl Into<String>) -> Self {
        Self::new(Construct::RawLine(text.into()))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> Kind {
        self.construct.kind()
    }

    pub fn content(&self) -> &[Content] {
        &self.content
    }

    /// `elif`/`else` branches of an if-chain; empty for every other kind.
    pub fn branches(&self) -> &[Node] {
        match &self.construct {
            Construct::If { branches, .. } => branches,
            _ => &[],
        }
    }

    pub fn decoration(&self) -> Option<&Decoration> {
        self.decoration.as_ref()
    }

    /// Mutable decoration; fails for kinds that cannot be decorated.
    pub fn decoration_mut(&mut self) -> Result<&mut Decoration> {
        let kind = self.kind();
        self.decoration
            .as_mut()
            .ok_or_else(|| Error::invalid_state(kind, "only statements and commands take decorations"))
    }

    /// Append children to the body; fails for kinds without a body, and
    /// for a `case` given anything but case options. Nothing is appended
    /// on failure.
    pub fn add_content<I, C>(&mut self, lines: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let kind = self.kind();
        if !kind.accepts_body() {
            return Err(Error::invalid_state(kind, "this construct has no body"));
        }
        let items: Vec<Content> = lines.into_iter().map(Into::into).collect();
        if kind == Kind::Case
            && items
                .iter()
                .any(|c| !matches!(c, Content::Node(n) if n.kind() == Kind::CaseOption))
        {
            return Err(Error::invalid_state(kind, "a case body holds only case options"));
        }
        self.content.extend(items);
        Ok(self)
    }

    pub(crate) fn extend<I, C>(&mut self, lines: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        self.content.extend(lines.into_iter().map(Into::into));
    }

    /// Recursively remove every raw line and statement whose literal text
    /// matches `pattern`. Structural nodes stay, even if left empty.
    ///
    /// Returns the number of removed items.
    pub fn remove_content(&mut self, pattern: &Regex) -> usize {
        let before = self.content.len();
        self.content.retain(|c| !c.matches(pattern));
        let mut removed = before - self.content.len();

        for child in &mut self.content {
            if let Content::Node(node) = child {
                removed += node.remove_content(pattern);
            }
        }
        if let Construct::If { branches, .. } = &mut self.construct {
            for branch in branches {
                removed += branch.remove_content(pattern);
            }
        }
        if removed > 0 {
            trace!("pruned {removed} item(s) under {} {}", self.kind(), self.id);
        }
        removed
    }

    /// Undecorated text of a raw line or statement.
    fn literal(&self) -> Option<&str> {
        match &self.construct {
            Construct::RawLine(text) | Construct::Statement { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Implements identity accessors and conversions for a builder wrapping a `Node`.
macro_rules! node_wrapper {
    ($ty:ident) => {
        impl $ty {
            /// Identifier assigned at construction.
            pub fn id(&self) -> $crate::id::NodeId {
                self.0.id()
            }

            pub fn as_node(&self) -> &$crate::node::Node {
                &self.0
            }

            pub fn into_node(self) -> $crate::node::Node {
                self.0
            }
        }

        impl From<$ty> for $crate::node::Node {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl From<$ty> for $crate::node::Content {
            fn from(value: $ty) -> Self {
                $crate::node::Content::Node(value.0)
            }
        }
    };
}

/// Adds infallible body operations to a builder whose kind accepts a body.
macro_rules! body_wrapper {
    ($ty:ident) => {
        $crate::node::node_wrapper!($ty);

        impl $ty {
            /// Append children to the body.
            pub fn add_content<I, C>(&mut self, lines: I) -> &mut Self
            where
                I: IntoIterator<Item = C>,
                C: Into<$crate::node::Content>,
            {
                self.0.extend(lines);
                self
            }

            /// Prune matching raw lines and statements at every depth.
            pub fn remove_content(&mut self, pattern: &regex_lite::Regex) -> usize {
                self.0.remove_content(pattern)
            }
        }
    };
}

pub(crate) use {body_wrapper, node_wrapper};
