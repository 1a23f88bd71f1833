//! Compound constructs: conditionals, loops, case, functions, subshells.

use regex_lite::Regex;

use crate::error::{Error, Result};
use crate::node::{
    Condition, Construct, Content, Kind, Node, Statement, body_wrapper, node_wrapper,
};

/// Where an if-chain is in its branch sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfState {
    /// Only the leading `if` branch exists.
    BuildingCondition,
    /// One or more `elif` branches have been appended.
    BuildingElseIfs,
    /// The `else` branch has been appended.
    TerminalElse,
    /// Sealed by [`If::close`].
    Closed,
}

/// `if [ cond ]; then ... [elif ...] [else ...] fi`
#[derive(Debug)]
pub struct If(Node);

body_wrapper!(If);

impl If {
    pub fn new(condition: impl Into<Condition>) -> Self {
        If(Node::new(Construct::If {
            condition: condition.into(),
            branches: Vec::new(),
            state: IfState::BuildingCondition,
        }))
    }

    pub fn with_content<I, C>(condition: impl Into<Condition>, lines: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let mut node = Self::new(condition);
        node.0.extend(lines);
        node
    }

    pub fn state(&self) -> IfState {
        match &self.0.construct {
            Construct::If { state, .. } => *state,
            _ => IfState::Closed,
        }
    }

    /// Append an `elif` branch.
    pub fn else_if<I, C>(&mut self, condition: impl Into<Condition>, lines: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let mut branch = Node::new(Construct::ElseIf(condition.into()));
        branch.extend(lines);
        self.push_branch(branch, IfState::BuildingElseIfs)?;
        Ok(self)
    }

    /// Append the terminal `else` branch. Only one is allowed.
    pub fn otherwise<I, C>(&mut self, lines: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let mut branch = Node::new(Construct::Else);
        branch.extend(lines);
        self.push_branch(branch, IfState::TerminalElse)?;
        Ok(self)
    }

    /// Seal the chain; later branch calls fail.
    pub fn close(&mut self) -> &mut Self {
        if let Construct::If { state, .. } = &mut self.0.construct {
            *state = IfState::Closed;
        }
        self
    }

    fn push_branch(&mut self, branch: Node, next: IfState) -> Result<()> {
        let Construct::If {
            branches, state, ..
        } = &mut self.0.construct
        else {
            return Err(Error::invalid_state(Kind::If, "not an if-chain"));
        };
        match *state {
            IfState::BuildingCondition | IfState::BuildingElseIfs => {
                branches.push(branch);
                *state = next;
                Ok(())
            }
            IfState::TerminalElse => Err(Error::invalid_state(
                branch.kind(),
                "if-chain already ends with an else branch",
            )),
            IfState::Closed => Err(Error::invalid_state(branch.kind(), "if-chain is closed")),
        }
    }
}

/// `while [ cond ]; do ... done`
#[derive(Debug)]
pub struct While(Node);

body_wrapper!(While);

impl While {
    pub fn new(condition: impl Into<Condition>) -> Self {
        While(Node::new(Construct::While(condition.into())))
    }

    pub fn with_content<I, C>(condition: impl Into<Condition>, lines: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let mut node = Self::new(condition);
        node.0.extend(lines);
        node
    }
}

/// `until [ cond ]; do ... done`
#[derive(Debug)]
pub struct Until(Node);

body_wrapper!(Until);

impl Until {
    pub fn new(condition: impl Into<Condition>) -> Self {
        Until(Node::new(Construct::Until(condition.into())))
    }

    pub fn with_content<I, C>(condition: impl Into<Condition>, lines: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let mut node = Self::new(condition);
        node.0.extend(lines);
        node
    }
}

/// `for var in items; do ... done`
///
/// Items are emitted verbatim so globs and `"$@"` keep their meaning.
#[derive(Debug)]
pub struct For(Node);

body_wrapper!(For);

impl For {
    pub fn new<I, S>(variable: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        For(Node::new(Construct::For {
            variable: variable.into(),
            items: items.into_iter().map(Into::into).collect(),
        }))
    }

    pub fn with_content<I, S, L, C>(variable: impl Into<String>, items: I, lines: L) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        L: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let mut node = Self::new(variable, items);
        node.0.extend(lines);
        node
    }
}

/// `select var in items; do ... done`
#[derive(Debug)]
pub struct Select(Node);

body_wrapper!(Select);

impl Select {
    pub fn new<I, S>(variable: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Select(Node::new(Construct::Select {
            variable: variable.into(),
            items: items.into_iter().map(Into::into).collect(),
        }))
    }

    pub fn with_content<I, S, L, C>(variable: impl Into<String>, items: I, lines: L) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        L: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let mut node = Self::new(variable, items);
        node.0.extend(lines);
        node
    }
}

/// `case subject in ... esac`
///
/// Options render in the order they were added; matching is left to the
/// shell. The body holds only [`CaseOption`]s, so there is no
/// `add_content`.
#[derive(Debug)]
pub struct Case(Node);

node_wrapper!(Case);

impl Case {
    pub fn new(subject: impl Into<String>) -> Self {
        Case(Node::new(Construct::Case(subject.into())))
    }

    pub fn with_options(subject: impl Into<String>, options: impl IntoIterator<Item = CaseOption>) -> Self {
        let mut node = Self::new(subject);
        node.0.extend(options);
        node
    }

    pub fn add_option(&mut self, option: CaseOption) -> &mut Self {
        self.0.content.push(option.into());
        self
    }

    /// Shorthand for `add_option(CaseOption::with_content(pattern, lines))`.
    pub fn option<I, C>(&mut self, pattern: impl Into<String>, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        self.add_option(CaseOption::with_content(pattern, lines))
    }

    /// Prune matching raw lines and statements inside every option.
    pub fn remove_content(&mut self, pattern: &Regex) -> usize {
        self.0.remove_content(pattern)
    }
}

/// One `pattern) ... ;;` arm of a [`Case`].
#[derive(Debug)]
pub struct CaseOption(Node);

body_wrapper!(CaseOption);

impl CaseOption {
    pub fn new(pattern: impl Into<String>) -> Self {
        CaseOption(Node::new(Construct::CaseOption(pattern.into())))
    }

    pub fn with_content<I, C>(pattern: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let mut node = Self::new(pattern);
        node.0.extend(lines);
        node
    }
}

/// `name() { ... }`
#[derive(Debug)]
pub struct Function(Node);

body_wrapper!(Function);

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Function(Node::new(Construct::Function(name.into())))
    }

    pub fn with_content<I, C>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let mut node = Self::new(name);
        node.0.extend(lines);
        node
    }

    pub fn name(&self) -> &str {
        match &self.0.construct {
            Construct::Function(name) => name,
            _ => "",
        }
    }

    /// A call site for this function. The statement refers to the function
    /// by name; the function's id is recorded but never emitted. Arguments
    /// are emitted verbatim so expansions like `"$@"` survive.
    pub fn call<I, S>(&self, args: I) -> Statement
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Statement::call(call_line(self.name(), args), self.id())
    }
}

/// `name arg...`
pub(crate) fn call_line<I, S>(name: &str, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut line = name.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.into());
    }
    line
}

/// `( ... )`
#[derive(Debug)]
pub struct Subshell(Node);

body_wrapper!(Subshell);

impl Subshell {
    pub fn new() -> Self {
        Subshell(Node::new(Construct::Subshell))
    }

    pub fn with_content<I, C>(lines: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let mut node = Self::new();
        node.0.extend(lines);
        node
    }

    /// Command substitution for a single command: `$(cmd)`.
    pub fn eval_command(command: &str) -> String {
        format!("$({command})")
    }
}

impl Default for Subshell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn if_chain_state_machine() {
        let mut chain = If::new("\"$x\" == \"a\"");
        assert_eq!(chain.state(), IfState::BuildingCondition);
        chain.else_if("\"$x\" == \"b\"", ["echo b"]).unwrap();
        assert_eq!(chain.state(), IfState::BuildingElseIfs);
        chain.else_if("\"$x\" == \"c\"", ["echo c"]).unwrap();
        chain.otherwise(["echo other"]).unwrap();
        assert_eq!(chain.state(), IfState::TerminalElse);
        assert_eq!(chain.as_node().branches().len(), 3);
    }

    #[test]
    fn second_else_fails_and_leaves_chain_intact() {
        let mut chain = If::new("-f x");
        chain.otherwise(["echo one"]).unwrap();
        let err = chain.otherwise(["echo two"]).unwrap_err();
        assert!(matches!(err, Error::InvalidState { kind: Kind::Else, .. }));
        assert_eq!(chain.as_node().branches().len(), 1);
    }

    #[test]
    fn elif_after_else_fails() {
        let mut chain = If::new("-f x");
        chain.otherwise(Vec::<Content>::new()).unwrap();
        let err = chain.else_if("-f y", ["echo y"]).unwrap_err();
        assert!(matches!(err, Error::InvalidState { kind: Kind::ElseIf, .. }));
    }

    #[test]
    fn closed_chain_rejects_branches() {
        let mut chain = If::with_content("-f x", ["echo x"]);
        chain.close();
        assert_eq!(chain.state(), IfState::Closed);
        assert!(chain.else_if("-f y", ["echo y"]).is_err());
        assert!(chain.otherwise(["echo z"]).is_err());
        assert!(chain.as_node().branches().is_empty());
    }

    #[test]
    fn function_call_references_by_name() {
        let f = Function::with_content("greet", ["echo \"hello $1\""]);
        let call = f.call(["\"$USER\"", "now"]);
        assert_eq!(call.text(), "greet \"$USER\" now");
        assert_eq!(call.callee(), Some(f.id()));
        let bare = f.call(Vec::<String>::new());
        assert_eq!(bare.text(), "greet");
    }

    #[test]
    fn case_options_keep_order() {
        let mut case = Case::new("\"$1\"");
        case.option("start", ["run"]).option("*", ["usage"]);
        let kinds: Vec<Kind> = case
            .as_node()
            .content()
            .iter()
            .map(|c| match c {
                Content::Node(n) => n.kind(),
                Content::Line(_) => Kind::RawLine,
            })
            .collect();
        assert_eq!(kinds, vec![Kind::CaseOption, Kind::CaseOption]);
    }

    #[test]
    fn case_body_rejects_loose_lines() {
        let mut node = Case::new("\"$1\"").into_node();
        let err = node
            .add_content(vec![Content::from(CaseOption::new("a")), Content::from("echo loose")])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState { kind: Kind::Case, .. }));
        assert!(node.content().is_empty());
        node.add_content([CaseOption::new("b")]).unwrap();
        assert_eq!(node.content().len(), 1);
    }

    #[test]
    fn subshell_eval_command() {
        assert_eq!(Subshell::eval_command("date +%s"), "$(date +%s)");
    }
}
