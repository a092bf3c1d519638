//! The stack-driven grammar parser.
//!
//! A single left-to-right pass over the token stream. The parser keeps a
//! stack of [`NodeId`] cursors mirroring the current tree path, so every
//! insertion lands directly on its parent without re-searching the tree,
//! plus a pending-text accumulator that is flushed whenever a control
//! token (`[`, `|`, `]`) is encountered.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::token::{tokenize, Source, Token};
use crate::tree::{NodeId, NodeKind, Tree, DUMMY_TEXT};

/// Characters that may not appear in a top-level identifier.
const RESERVED_IN_IDENTIFIER: [char; 5] = ['{', '}', '<', '*', '^'];

/// Parse a grammar string into a syntax tree.
///
/// # Errors
///
/// Returns a syntax error carrying the offending source location if the
/// grammar is malformed.
pub fn parse(grammar: &str) -> Result<Tree> {
    Parser::new().run(tokenize(grammar, ""))
}

/// Read and parse a grammar from a single file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or a syntax error if
/// its contents are malformed.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Tree> {
    parse_files(&[path])
}

/// Read and parse a grammar spanning multiple files.
///
/// Files are tokenized individually, so locations in error messages name
/// the right file, then parsed as one combined stream. Each file must be
/// self-contained and syntactically complete; any error fails the whole
/// operation.
///
/// # Errors
///
/// Returns [`Error::Io`] if any file cannot be read, or a syntax error if
/// the combined grammar is malformed.
pub fn parse_files<P: AsRef<Path>>(paths: &[P]) -> Result<Tree> {
    let mut tokens = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        tokens.extend(tokenize(&contents, &path.to_string_lossy()));
    }

    Parser::new().run(tokens)
}

/// Parse a grammar and generate its last definition, discarding errors.
///
/// Convenience shortcut for one-off use; returns the empty string if the
/// grammar fails to parse or generate.
#[must_use]
pub fn quick(grammar: &str) -> String {
    parse(grammar)
        .and_then(|mut tree| tree.generate(""))
        .unwrap_or_default()
}

struct Parser {
    tree: Tree,
    /// Cursor stack mirroring the current tree path; the bottom entry is
    /// always a top-level tag while non-empty.
    stack: Vec<NodeId>,
    /// Pending text, space-joined, waiting for the next control token.
    collect: String,
    /// Some syntax elements are attributed to the token before the one
    /// that triggered the insertion.
    previous: Source,
    /// Per-parse counter for unique group labels.
    group_id: u32,
}

impl Parser {
    fn new() -> Self {
        Self {
            tree: Tree::new(),
            stack: Vec::new(),
            collect: String::new(),
            previous: Source::detached(),
            group_id: 0,
        }
    }

    fn run(mut self, tokens: Vec<Token>) -> Result<Tree> {
        if tokens.is_empty() {
            return Err(Error::EmptyInput);
        }

        for token in tokens {
            // tokenize() never emits these
            if token.text.is_empty() {
                return Err(Error::EmptyToken { at: token.source });
            }

            match token.text.as_str() {
                "[" => self.open_group(&token)?,
                "|" => self.alternate(&token)?,
                "]" => self.close_group(&token)?,
                _ => self.word(&token)?,
            }

            self.previous = token.source;
        }

        if self.stack.is_empty() {
            self.tree.reset();
            Ok(self.tree)
        } else {
            Err(Error::UnterminatedGroup { at: self.previous })
        }
    }

    fn top(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    fn top_is_group(&self) -> bool {
        self.top()
            .is_some_and(|id| self.tree.kind(id) == NodeKind::Group)
    }

    /// Flush the pending text as a `Text` node under `parent`.
    fn flush_text(&mut self, parent: NodeId, source: Source) -> NodeId {
        let text = std::mem::take(&mut self.collect);
        self.tree.attach(parent, NodeKind::Text, text, source)
    }

    fn open_group(&mut self, token: &Token) -> Result<()> {
        if self.collect.is_empty() && self.stack.is_empty() {
            return Err(Error::MissingIdentifier {
                at: token.source.clone(),
            });
        }

        if self.collect.is_empty() && self.stack.len() > 1 && self.top_is_group() {
            // Back-to-back groups: anchor a dummy so that any text following
            // the nested group attaches under it, not under the outer group
            // as a new branch.
            let parent = self.stack[self.stack.len() - 1];
            let dummy =
                self.tree
                    .attach(parent, NodeKind::Dummy, DUMMY_TEXT, token.source.clone());
            self.stack.push(dummy);
        } else if !self.collect.is_empty() {
            let node = if let Some(parent) = self.top() {
                self.flush_text(parent, self.previous.clone())
            } else {
                self.check_duplicate(&token.source)?;
                let name = std::mem::take(&mut self.collect);
                self.tree
                    .attach(Tree::ROOT, NodeKind::Tag, name, self.previous.clone())
            };
            self.stack.push(node);
        }

        self.group_id += 1;
        let parent = self.top().unwrap_or(Tree::ROOT);
        let group = self.tree.attach(
            parent,
            NodeKind::Group,
            format!("[{}", self.group_id),
            token.source.clone(),
        );
        self.stack.push(group);

        Ok(())
    }

    fn check_duplicate(&self, at: &Source) -> Result<()> {
        for &child in self.tree.children(Tree::ROOT) {
            let node = self.tree.node(child);

            if node.text == self.collect {
                return Err(Error::DuplicateIdentifier {
                    name: self.collect.clone(),
                    first: node.source.clone(),
                    second: at.clone(),
                });
            }
        }

        Ok(())
    }

    fn alternate(&mut self, token: &Token) -> Result<()> {
        let Some(top) = self.top() else {
            return Err(Error::StrayAlternationAtRoot {
                at: token.source.clone(),
            });
        };

        if self.collect.is_empty() && self.top_is_group() {
            return Err(Error::StrayAlternationInGroup {
                at: token.source.clone(),
            });
        }

        if !self.collect.is_empty() {
            self.flush_text(top, token.source.clone());
        }

        // Unwind to the nearest enclosing group, keeping it, ready to
        // collect the next branch. A non-empty stack always contains a
        // group at this point: the bottom tag is only ever pushed together
        // with its first group.
        while !self.stack.is_empty() && !self.top_is_group() {
            self.stack.pop();
        }

        Ok(())
    }

    fn close_group(&mut self, token: &Token) -> Result<()> {
        if self.collect.is_empty() {
            if self.stack.is_empty() {
                return Err(Error::StrayClose {
                    at: token.source.clone(),
                });
            }

            if self.top_is_group() {
                return Err(Error::EmptyGroup {
                    at: token.source.clone(),
                });
            }
        } else {
            let parent = self.top().unwrap_or(Tree::ROOT);
            self.flush_text(parent, self.previous.clone());
        }

        // Pop everything down to and including the most recently opened
        // group, closing exactly one nesting level.
        while let Some(top) = self.stack.pop() {
            if self.tree.kind(top) == NodeKind::Group {
                break;
            }
        }

        // Back at the top-level tag: the definition is complete.
        if self.stack.len() == 1 {
            self.stack.clear();
        }

        Ok(())
    }

    fn word(&mut self, token: &Token) -> Result<()> {
        if self.collect.is_empty() {
            if self.stack.is_empty() {
                for ch in RESERVED_IN_IDENTIFIER {
                    if token.text.contains(ch) {
                        return Err(Error::InvalidIdentifierChar {
                            ch,
                            at: token.source.clone(),
                        });
                    }
                }
            }

            self.collect = token.text.clone();
        } else if self.stack.is_empty() {
            return Err(Error::ExpectedGroup {
                at: token.source.clone(),
            });
        } else {
            self.collect.push(' ');
            self.collect.push_str(&token.text);
        }

        // Half-formed substitution markers can be rejected right here; a
        // complete marker always tokenizes as a single {...} token.
        let opens = token.text.starts_with('{');
        let closes = token.text.ends_with('}');

        if opens && !closes {
            return Err(Error::UnterminatedSubstitution {
                text: token.text.clone(),
                at: token.source.clone(),
            });
        }

        if !opens && closes {
            return Err(Error::StraySubstitutionClose {
                at: token.source.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn node_counts() {
        for (grammar, expected) in [
            ("a[b]", 3),
            ("a[[b]]", 5),
            ("a[[b]c]", 6),
            ("a[b|c|d]", 5),
            ("a[b[c]]", 5),
            ("a[[b][c]]", 7),
        ] {
            let tree = parse(grammar).unwrap();
            assert_eq!(tree.count(), expected, "wrong node count for {grammar}");
        }
    }

    #[test]
    fn accepts_the_documented_examples() {
        let grammars = [
            "identifier [ text ]",
            "greeting [ hi | hello there | good morning to thee ]",
            "abc [ [aaa | bbb] | ccc ]",
            "abc\n[\n  [a|b] c\n  | [a|b] c\n  | bcd\n]",
            "a [ b ]\nabc\n[\n  {a}\n  | ccc [ {a} | {a} ]\n  | {a}\n  | [ aaa ]\n  | {a} {a}\n]",
            "diary\n[\n  It was [Monday|Tuesday|Wednesday],\n  the [first|second] week of\n  [January|February|March].\n]",
            "weekday [ Monday | Tuesday | Wednesday ]\nordinal [ first|second ]\ndiary [ It was {weekday} , the {ordinal} week. ]",
            "lines   [ This is a line. {\\n} This is another line.]",
            "verdict [ I'm not angry, but I'm [very|_] disappointed. ]",
            "weekday [ [Mon|Tues|Wednes] << day, next week? ]  // not \"Tues day\"",
            "excuse  [ My [dog | cat] ate my homework. ]  // What a jerk!!",
            "recursive [ (ran!) {recursive} | stop ]",
            "promise [ I'll do it first thing tomorrow ([j/k, lol | maybe | for [real|sure] !]) ]",
            "\ta[b]",
            " \t a[b]",
            "a[b]//ignore",
            "a[[[[[[[[[[[[[[[[[[[[b]]]]]]]]]]]]]]]]]]]]",
            "where [ ^ here and ^ there ]",
            "abc [ abc^ ]",
            "headline [ {5-25} [Cute | Weird] Photos Of [Cats | Tractors] ]",
        ];

        for grammar in grammars {
            parse(grammar).unwrap_or_else(|err| panic!("{grammar:?} failed: {err}"));
        }
    }

    #[test]
    fn rejects_malformed_grammars() {
        let bad = [
            "[a|b]",
            "a[]",
            "]",
            "a[a]]",
            "a[",
            "a[a|b",
            "a[a|",
            "a[|a]",
            "a[a||a]",
            "|",
            "a|[a]",
            "a[a]|",
            "{a[a]",
            "a}[a]",
            "<a[b]",
            "a<[b]",
            "a b[c]",
            "a[{b]",
            "a[{a b}]",
            "a[{b",
            "a {b",
            "a[{b|c]",
            "a[b}]",
            "//a[b]",
            "*a[b]",
            "a*[b]",
            "a*b[c]",
            "a[b] a[c]",
            "a[b",
            "",
        ];

        for grammar in bad {
            assert!(
                parse(grammar).is_err(),
                "{grammar:?} should have been rejected"
            );
        }
    }

    #[test]
    fn error_variants_match_the_mistake() {
        assert!(matches!(
            parse("[a|b]"),
            Err(Error::MissingIdentifier { .. })
        ));
        assert!(matches!(parse("a[]"), Err(Error::EmptyGroup { .. })));
        assert!(matches!(parse("]"), Err(Error::StrayClose { .. })));
        assert!(matches!(
            parse("a[|a]"),
            Err(Error::StrayAlternationInGroup { .. })
        ));
        assert!(matches!(
            parse("|"),
            Err(Error::StrayAlternationAtRoot { .. })
        ));
        assert!(matches!(parse("a["), Err(Error::UnterminatedGroup { .. })));
        assert!(matches!(parse("a b[c]"), Err(Error::ExpectedGroup { .. })));
        assert!(matches!(
            parse("a[{b]"),
            Err(Error::UnterminatedSubstitution { .. })
        ));
        assert!(matches!(
            parse("a[b}]"),
            Err(Error::StraySubstitutionClose { .. })
        ));
        assert!(matches!(parse(""), Err(Error::EmptyInput)));
        assert!(matches!(
            parse("*a[b]"),
            Err(Error::InvalidIdentifierChar { ch: '*', .. })
        ));
    }

    #[test]
    fn duplicate_identifiers_report_both_locations() {
        let err = parse("a[b]\na[c]").unwrap_err();

        match err {
            Error::DuplicateIdentifier { name, first, second } => {
                assert_eq!(name, "a");
                assert_eq!(first.line(), 1);
                assert_eq!(second.line(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn errors_point_at_the_offending_line() {
        let err = parse("a\n[\n  b |\n  |\n]").unwrap_err();

        match err {
            Error::StrayAlternationInGroup { at } => assert_eq!(at.line(), 4),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn multiline_definitions_parse_like_single_line() {
        let one = parse("a[b|c|d]").unwrap();
        let many = parse("a\n[\n  b\n  | c\n  | d\n]").unwrap();
        assert_eq!(one.count(), many.count());
    }

    proptest! {
        /// Parsing arbitrary input never panics; it either builds a tree or
        /// reports a structured error.
        #[test]
        fn parse_total_on_arbitrary_input(input in "[a-z\\[\\]|{}<*^ \n]{0,64}") {
            let _ = parse(&input);
        }

        /// A flat alternation of plain words always parses, with one node
        /// per branch plus the tag and the group.
        #[test]
        fn flat_alternations_parse(words in prop::collection::vec("[a-z]{1,8}", 1..8)) {
            let grammar = format!("phrase [ {} ]", words.join(" | "));
            let tree = parse(&grammar).unwrap();
            prop_assert_eq!(tree.count(), words.len() + 2);
        }
    }
}
