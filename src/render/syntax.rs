//! Keyword lookup: how each construct kind opens and closes.

use crate::node::leaf::command_line;
use crate::node::{Construct, Kind};

/// Lines a construct emits around its body.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Frame {
    /// A single command line (statement, command, raw line).
    Leaf(String),
    /// Body emitted at the construct's own depth, with no keywords.
    Transparent,
    /// Opening line, body one level deeper, optional closing line.
    Block {
        open: String,
        close: Option<&'static str>,
    },
    /// A case arm: `pattern)` ... `;;`.
    Arm(String),
}

/// Closing keyword per kind. Kinds absent here close implicitly: branches
/// are closed by the enclosing `fi`, leaves and the script root have none.
const CLOSERS: [(Kind, &str); 8] = [
    (Kind::If, "fi"),
    (Kind::While, "done"),
    (Kind::Until, "done"),
    (Kind::For, "done"),
    (Kind::Select, "done"),
    (Kind::Case, "esac"),
    (Kind::Function, "}"),
    (Kind::Subshell, ")"),
];

fn closer(kind: Kind) -> Option<&'static str> {
    CLOSERS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, close)| *close)
}

fn block(open: String, kind: Kind) -> Frame {
    Frame::Block {
        open,
        close: closer(kind),
    }
}

/// Resolve the frame for a construct.
pub(crate) fn frame(construct: &Construct, kind: Kind) -> Frame {
    match construct {
        Construct::RawLine(text) | Construct::Statement { text, .. } => Frame::Leaf(text.clone()),
        Construct::Command { program, args } => Frame::Leaf(command_line(program, args)),
        Construct::Script { .. } => Frame::Transparent,
        Construct::If { condition, .. } => block(format!("if {}; then", condition.render()), kind),
        Construct::ElseIf(condition) => block(format!("elif {}; then", condition.render()), kind),
        Construct::Else => block("else".to_string(), kind),
        Construct::While(condition) => block(format!("while {}; do", condition.render()), kind),
        Construct::Until(condition) => block(format!("until {}; do", condition.render()), kind),
        Construct::For { variable, items } => block(loop_header("for", variable, items), kind),
        Construct::Select { variable, items } => block(loop_header("select", variable, items), kind),
        Construct::Case(subject) => block(format!("case {subject} in"), kind),
        Construct::CaseOption(pattern) => Frame::Arm(format!("{pattern})")),
        Construct::Function(name) => block(format!("{name}() {{"), kind),
        Construct::Subshell => block("(".to_string(), kind),
    }
}

/// Whether `line` contains an unquoted `#` that starts a shell comment.
///
/// A `#` only opens a comment at the start of a word, so `$#` and `a#b`
/// do not count.
pub(crate) fn has_comment(line: &str) -> bool {
    let (mut sq, mut dq, mut esc) = (false, false, false);
    let mut prev: Option<char> = None;
    for c in line.chars() {
        if esc {
            esc = false;
        } else if c == '\\' && !sq {
            esc = true;
        } else if c == '\'' && !dq {
            sq = !sq;
        } else if c == '"' && !sq {
            dq = !dq;
        } else if c == '#'
            && !sq
            && !dq
            && prev.is_none_or(|p| p.is_whitespace() || matches!(p, ';' | '&' | '|' | '(' | ')'))
        {
            return true;
        }
        prev = Some(c);
    }
    false
}

fn loop_header(keyword: &str, variable: &str, items: &[String]) -> String {
    if items.is_empty() {
        format!("{keyword} {variable} in; do")
    } else {
        format!("{keyword} {variable} in {}; do", items.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Condition;

    #[test]
    fn every_block_kind_with_a_closer_is_listed_once() {
        for kind in Kind::ALL {
            let count = CLOSERS.iter().filter(|(k, _)| *k == kind).count();
            assert!(count <= 1, "{kind} listed twice");
        }
    }

    #[test]
    fn branches_have_no_closer() {
        assert_eq!(closer(Kind::ElseIf), None);
        assert_eq!(closer(Kind::Else), None);
        assert_eq!(closer(Kind::Script), None);
    }

    #[test]
    fn while_header() {
        let c = Construct::While(Condition::test("-f lock"));
        assert_eq!(
            frame(&c, Kind::While),
            Frame::Block {
                open: "while [ -f lock ]; do".into(),
                close: Some("done"),
            }
        );
    }

    #[test]
    fn for_header_with_and_without_items() {
        let c = Construct::For {
            variable: "f".into(),
            items: vec!["*.txt".into(), "\"$@\"".into()],
        };
        assert_eq!(
            frame(&c, Kind::For),
            Frame::Block {
                open: "for f in *.txt \"$@\"; do".into(),
                close: Some("done"),
            }
        );
        assert_eq!(loop_header("select", "opt", &[]), "select opt in; do");
    }

    #[test]
    fn function_and_subshell_frames() {
        let f = Construct::Function("main".into());
        assert_eq!(
            frame(&f, Kind::Function),
            Frame::Block {
                open: "main() {".into(),
                close: Some("}"),
            }
        );
        assert_eq!(
            frame(&Construct::Subshell, Kind::Subshell),
            Frame::Block {
                open: "(".into(),
                close: Some(")"),
            }
        );
    }

    #[test]
    fn comment_detection() {
        assert!(has_comment("# nothing to do"));
        assert!(has_comment("  # indented"));
        assert!(has_comment("echo a # note"));
        assert!(has_comment("true;# trailing"));
        assert!(!has_comment("echo \"$#\""));
        assert!(!has_comment("echo 'a # b'"));
        assert!(!has_comment("echo \"a # b\""));
        assert!(!has_comment("git log a#b"));
        assert!(!has_comment("echo \\#x"));
    }

    #[test]
    fn command_condition_is_verbatim() {
        let c = Construct::Until(Condition::command("ping -c1 host"));
        assert_eq!(
            frame(&c, Kind::Until),
            Frame::Block {
                open: "until ping -c1 host; do".into(),
                close: Some("done"),
            }
        );
    }
}
