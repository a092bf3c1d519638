//! Splitting raw grammar text into located tokens.
//!
//! The tokenizer assigns no meaning to what it produces; it only separates
//! the syntactic characters `[ ] | { }` from surrounding text, strips `//`
//! line comments and tags every token with its origin so the parser can
//! report useful locations.

use std::fmt;
use std::sync::Arc;

/// Where a token came from: a file tag and a 1-based line number.
///
/// Displays as `file:line`. Parsing a bare string leaves the file tag
/// empty, which displays as `:line`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    file: Arc<str>,
    line: u32,
}

impl Source {
    /// Create a location for `line` (1-based) of `file`.
    #[must_use]
    pub fn new(file: &str, line: u32) -> Self {
        Self {
            file: Arc::from(file),
            line,
        }
    }

    /// A location that points nowhere; used for the tree root and as the
    /// parser's initial "previous token" location.
    pub(crate) fn detached() -> Self {
        Self::new("", 0)
    }

    /// The file tag this location refers to.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// The 1-based line number.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One word of grammar input, plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) text: String,
    pub(crate) source: Source,
}

/// Split `input` into tokens, tagging each with `file` and its line number.
///
/// Processing is line by line: tabs are deleted, surrounding spaces are
/// trimmed, and separator spaces are inserted around the syntactic
/// characters so they come out as standalone tokens. `{` binds to the text
/// that follows it and `}` to the text before it, so an unspaced marker
/// like `{weekday}` survives as a single token. A `//` ends the line;
/// tokens collected earlier on that line are still emitted. Empty tokens
/// are never produced.
pub(crate) fn tokenize(input: &str, file: &str) -> Vec<Token> {
    let file: Arc<str> = Arc::from(file);
    let mut tokens = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let source = Source {
            file: Arc::clone(&file),
            line: index as u32 + 1,
        };

        let line = line.replace('\t', "");
        let mut line = line.trim().to_string();

        // Comment markers first, so "//" is never split by the other rules.
        for (from, to) in [
            ("//", " // "),
            ("[", " [ "),
            ("]", " ] "),
            ("|", " | "),
            ("{", " {"),
            ("}", "} "),
        ] {
            line = line.replace(from, to);
        }

        for word in line.split_whitespace() {
            if word == "//" {
                break;
            }

            tokens.push(Token {
                text: word.to_string(),
                source: source.clone(),
            });
        }
    }

    tokens
}
