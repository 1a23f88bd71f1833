//! shellgen: build shell scripts from typed constructs.
//!
//! Callers assemble a tree of constructs (statements, conditionals, loops,
//! functions, subshells, variables) under a [`Script`] root, attach pipes,
//! connectors, redirections, and comments to individual commands, and then
//! render the tree once with [`dump`]. Rendering is deterministic and always
//! produces correctly nested, correctly indented shell text.
//!
//! # Architecture
//!
//! - **[`id`]** — Process-unique identifiers assigned to every construct.
//! - **[`node`]** — Construct tree: node kinds, typed builders, decoration model.
//! - **[`variable`]** — Named variables: assignments and test expressions.
//! - **[`eval`]** — Command substitution wrappers (`$( ... )`).
//! - **[`render`]** — Rendering engine: keyword table, indentation, padding.
//! - **[`config`]** — Formatting policy: defaults, files, user overlay merge.
//! - **[`check`]** — Structural syntax check of rendered text via tree-sitter-bash.
//! - **[`logging`]** — Logger setup for embedders.
//!
//! ```
//! use shellgen::{Decorate, Script, Statement};
//!
//! let mut stmt = Statement::new("cat f");
//! stmt.pipe("grep x").write("out.txt");
//! let script = Script::with_content([stmt]);
//! assert_eq!(shellgen::dump(&script).unwrap(), "cat f | grep x > out.txt\n");
//! ```

/// Structural syntax check of rendered shell text.
pub mod check;
/// Formatting policy types, loading, and overlay merge logic.
pub mod config;
/// Crate error type.
pub mod error;
/// Command substitution: evaluable and subshellable constructs.
pub mod eval;
/// Identity provider.
pub mod id;
/// Logger initialisation.
pub mod logging;
/// Construct tree and decoration model.
pub mod node;
/// Rendering engine.
pub mod render;
/// Shell variables.
pub mod variable;

pub use config::{FormatConfig, Padding};
pub use error::{Error, Result};
pub use eval::{EvalSubshellBlock, EvalSubshellStatement, Evaluable, Evaluation, Subshellable};
pub use id::NodeId;
pub use node::{
    Case, CaseOption, Command, Condition, Content, Decorate, Decoration, For, Function, If, IfState,
    Kind, Node, Script, Select, Statement, Subshell, Until, While,
};
pub use variable::Variable;

/// Render a script with the default formatting policy (two-space indent,
/// no padding).
///
/// This is the main entry point for tests and simple usage.
/// To apply a policy, use [`render::dump`] or [`Script::dump`].
pub fn dump(script: &Script) -> Result<String> {
    render::dump(script, &FormatConfig::default())
}
