//! Rendering engine: walks a construct tree in document order and emits
//! indented shell source under a [`FormatConfig`].

mod syntax;

use log::debug;

use crate::config::FormatConfig;
use crate::error::Result;
use crate::node::{Construct, Content, Kind, Node, Script};
use syntax::Frame;

/// Render `script` to shell source.
///
/// Pure with respect to its inputs: the same tree and configuration always
/// produce byte-identical text. Fails only when `config` is malformed.
pub fn dump(script: &Script, config: &FormatConfig) -> Result<String> {
    config.validate()?;
    let mut renderer = Renderer::new(config);
    renderer.node(script.as_node(), 0);
    debug!(
        "rendered script {} ({} nodes) to {} lines",
        script.id(),
        renderer.nodes,
        renderer.lines.len()
    );
    Ok(renderer.finish())
}

/// Render a body at depth zero and return its lines. Used by subshell
/// evaluation to size and embed content.
pub(crate) fn content_lines(content: &[Content], config: &FormatConfig) -> Vec<String> {
    let mut renderer = Renderer::new(config);
    renderer.content(content, 0);
    renderer.lines
}

/// Render one node at depth zero and return its lines.
pub(crate) fn node_lines(node: &Node, config: &FormatConfig) -> Vec<String> {
    let mut renderer = Renderer::new(config);
    renderer.node(node, 0);
    renderer.lines
}

struct Renderer<'a> {
    config: &'a FormatConfig,
    lines: Vec<String>,
    nodes: usize,
}

impl<'a> Renderer<'a> {
    fn new(config: &'a FormatConfig) -> Self {
        Self {
            config,
            lines: Vec::new(),
            nodes: 0,
        }
    }

    fn finish(self) -> String {
        let mut out = String::new();
        for line in self.lines {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    fn emit(&mut self, depth: usize, text: &str) {
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines
                .push(format!("{}{text}", self.config.indent.repeat(depth)));
        }
    }

    /// Emit possibly multi-line text. The first line goes at `depth`;
    /// continuation lines are re-indented at `depth` when `reindent` is set
    /// and passed through untouched otherwise.
    fn emit_text(&mut self, depth: usize, text: &str, reindent: bool) {
        let mut lines = text.split('\n');
        if let Some(first) = lines.next() {
            self.emit(depth, first);
        }
        for line in lines {
            if reindent {
                self.emit(depth, line);
            } else {
                self.lines.push(line.to_string());
            }
        }
    }

    /// Validation guarantees non-negative counts.
    fn blank(&mut self, count: i64) {
        for _ in 0..count.max(0) {
            self.lines.push(String::new());
        }
    }

    fn content(&mut self, content: &[Content], depth: usize) {
        for item in content {
            match item {
                Content::Line(text) => {
                    let padding = self.config.padding(Kind::RawLine);
                    self.blank(padding.newlines_before);
                    self.emit_text(depth, text, false);
                    self.blank(padding.newlines_after);
                }
                Content::Node(node) => self.node(node, depth),
            }
        }
    }

    fn node(&mut self, node: &Node, depth: usize) {
        self.nodes += 1;
        let kind = node.kind();
        let padding = self.config.padding(kind);
        self.blank(padding.newlines_before);

        match syntax::frame(&node.construct, kind) {
            Frame::Leaf(text) => match node.decoration() {
                Some(decoration) => {
                    for comment in decoration.comment_lines() {
                        self.emit(depth, &comment);
                    }
                    self.emit_text(depth, &decoration.apply(&text), true);
                }
                None => self.emit_text(depth, &text, false),
            },
            Frame::Transparent => {
                if let Construct::Script {
                    shebang: Some(line),
                } = &node.construct
                {
                    self.emit(depth, line);
                }
                self.content(&node.content, depth);
            }
            Frame::Block { open, close } => {
                self.emit(depth, &open);
                self.content(&node.content, depth + 1);
                for branch in node.branches() {
                    self.node(branch, depth);
                }
                if let Some(close) = close {
                    self.emit(depth, close);
                }
            }
            Frame::Arm(head) => self.arm(&head, &node.content, depth),
        }

        self.blank(padding.newlines_after);
    }

    /// A case arm renders inline when its body is a single line that does
    /// not end in a comment; a comment would swallow the `;;`.
    fn arm(&mut self, head: &str, body: &[Content], depth: usize) {
        let inner = content_lines(body, self.config);
        match inner.as_slice() {
            [] => self.emit(depth, &format!("{head} ;;")),
            [only] if !only.is_empty() && !syntax::has_comment(only) => {
                self.emit(depth, &format!("{head} {only} ;;"))
            }
            _ => {
                self.emit(depth, head);
                self.content(body, depth + 1);
                self.emit(depth + 1, ";;");
            }
        }
    }
}
