//! Command-like leaves: free-form statements and quoted commands.

use std::borrow::Cow;

use crate::id::NodeId;
use crate::node::{Construct, Decorate, Decoration, Node, node_wrapper};

/// A single line of shell, written by the caller and emitted verbatim
/// (plus its decoration).
#[derive(Debug)]
pub struct Statement(pub(crate) Node);

node_wrapper!(Statement);

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Statement(Node::new(Construct::Statement {
            text: text.into(),
            callee: None,
        }))
    }

    /// A statement that calls the function identified by `callee`.
    pub(crate) fn call(text: String, callee: NodeId) -> Self {
        Statement(Node::new(Construct::Statement {
            text,
            callee: Some(callee),
        }))
    }

    /// The undecorated text.
    pub fn text(&self) -> &str {
        match &self.0.construct {
            Construct::Statement { text, .. } => text,
            _ => "",
        }
    }

    /// Id of the function this statement calls, if it was built as a call site.
    pub fn callee(&self) -> Option<NodeId> {
        match &self.0.construct {
            Construct::Statement { callee, .. } => *callee,
            _ => None,
        }
    }
}

/// A program invocation whose arguments are shell-quoted when rendered.
#[derive(Debug)]
pub struct Command(pub(crate) Node);

node_wrapper!(Command);

impl Command {
    pub fn new(program: impl Into<String>) -> Self {
        Command(Node::new(Construct::Command {
            program: program.into(),
            args: Vec::new(),
        }))
    }

    /// Append one argument.
    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        if let Construct::Command { args, .. } = &mut self.0.construct {
            args.push(arg.into());
        }
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Construct::Command { args, .. } = &mut self.0.construct {
            args.extend(items.into_iter().map(Into::into));
        }
        self
    }
}

fn decoration_of(node: &mut Node) -> &mut Decoration {
    node.decoration.get_or_insert_with(Decoration::default)
}

impl Decorate for Statement {
    fn decoration_mut(&mut self) -> &mut Decoration {
        decoration_of(&mut self.0)
    }
}

impl Decorate for Command {
    fn decoration_mut(&mut self) -> &mut Decoration {
        decoration_of(&mut self.0)
    }
}

/// Quote one word for POSIX shells; input shlex cannot quote (NUL bytes)
/// passes through unchanged.
pub(crate) fn quote(word: &str) -> Cow<'_, str> {
    shlex::try_quote(word).unwrap_or(Cow::Borrowed(word))
}

/// `program arg...` with every argument quoted.
pub(crate) fn command_line<'a>(program: &str, args: impl IntoIterator<Item = &'a String>) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&quote(arg));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Kind;

    #[test]
    fn statement_keeps_text() {
        let s = Statement::new("echo \"hi\"");
        assert_eq!(s.text(), "echo \"hi\"");
        assert_eq!(s.as_node().kind(), Kind::Statement);
        assert!(s.callee().is_none());
    }

    #[test]
    fn statement_chains_decoration() {
        let mut s = Statement::new("cat f");
        s.pipe("grep x").write("out.txt");
        let d = s.as_node().decoration().unwrap();
        assert_eq!(d.pipeline(), ["grep x"]);
        assert_eq!(d.redirection().unwrap().target, "out.txt");
    }

    #[test]
    fn command_collects_args() {
        let mut c = Command::new("cp");
        c.arg("a b").args(["c", "d"]);
        match &c.as_node().construct {
            Construct::Command { program, args } => {
                assert_eq!(program, "cp");
                assert_eq!(args, &["a b", "c", "d"]);
            }
            _ => panic!("not a command"),
        }
    }

    #[test]
    fn command_line_quotes_args() {
        let args = vec!["plain".to_string(), "two words".to_string(), "it's".to_string()];
        let line = command_line("echo", &args);
        assert!(line.starts_with("echo plain "));
        assert_eq!(shlex::split(&line).unwrap(), vec!["echo", "plain", "two words", "it's"]);
    }

    #[test]
    fn quote_passes_nul_through() {
        assert_eq!(quote("a\0b"), "a\0b");
    }
}
