//! The root container.

use std::collections::BTreeMap;

use crate::config::FormatConfig;
use crate::error::{Error, Result};
use crate::id::NodeId;
use crate::node::block::call_line;
use crate::node::{Construct, Content, Kind, Node, Statement, body_wrapper};

/// Root of a construct tree. Owns every node beneath it.
#[derive(Debug)]
pub struct Script(Node);

body_wrapper!(Script);

impl Script {
    pub fn new() -> Self {
        Script(Node::new(Construct::Script { shebang: None }))
    }

    pub fn with_content<I, C>(lines: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let mut script = Self::new();
        script.0.extend(lines);
        script
    }

    /// Set the interpreter line emitted first, e.g. `#!/usr/bin/env bash`.
    pub fn shebang(&mut self, line: impl Into<String>) -> &mut Self {
        if let Construct::Script { shebang } = &mut self.0.construct {
            *shebang = Some(line.into());
        }
        self
    }

    /// Insert a child at `index`, shifting later children. Fails if `index`
    /// is past the end.
    pub fn insert(&mut self, index: usize, item: impl Into<Content>) -> Result<&mut Self> {
        if index > self.0.content.len() {
            return Err(Error::invalid_state(
                Kind::Script,
                format!(
                    "insert position {index} is past the end ({} children)",
                    self.0.content.len()
                ),
            ));
        }
        self.0.content.insert(index, item.into());
        Ok(self)
    }

    /// Function registry: name → id for every function defined anywhere in
    /// the tree. When a name is defined twice the later definition wins, as
    /// it does in the shell.
    pub fn functions(&self) -> BTreeMap<String, NodeId> {
        let mut registry = BTreeMap::new();
        collect_functions(&self.0, &mut registry);
        registry
    }

    /// A call site for a function defined in this script.
    pub fn call<I, S>(&self, name: &str, args: I) -> Result<Statement>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = self.functions().get(name).copied().ok_or_else(|| {
            Error::invalid_state(Kind::Script, format!("no function named `{name}` is defined"))
        })?;
        Ok(Statement::call(call_line(name, args), id))
    }

    /// Render the script. See [`crate::render::dump`].
    pub fn dump(&self, config: &FormatConfig) -> Result<String> {
        crate::render::dump(self, config)
    }

    /// Render the script, then verify the output is structurally valid shell.
    pub fn dump_checked(&self, config: &FormatConfig) -> Result<String> {
        let text = self.dump(config)?;
        crate::check::check_syntax(&text)?;
        Ok(text)
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_functions(node: &Node, registry: &mut BTreeMap<String, NodeId>) {
    if let Construct::Function(name) = &node.construct {
        registry.insert(name.clone(), node.id());
    }
    for child in &node.content {
        if let Content::Node(n) = child {
            collect_functions(n, registry);
        }
    }
    for branch in node.branches() {
        collect_functions(branch, registry);
    }
}
