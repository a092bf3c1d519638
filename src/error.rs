//! Error types for grammar parsing and phrase generation.

use thiserror::Error;

use crate::token::Source;

/// Result type alias for grammar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing a grammar or generating a phrase.
///
/// Syntax errors are detected during [`parse()`](crate::parse()) and carry the
/// source location (`file:line`) of the offending token. Generation errors
/// are detected during [`Tree::generate`](crate::Tree::generate) and are
/// fatal to that call only.
#[derive(Error, Debug)]
pub enum Error {
    /// The input contained no tokens at all
    #[error("empty input")]
    EmptyInput,

    /// The tokenizer emitted an empty token; this is an internal invariant
    /// violation, not a grammar mistake
    #[error("empty token at {at}")]
    EmptyToken {
        /// Location of the offending token
        at: Source,
    },

    /// A group was opened at the top level without a preceding identifier
    #[error("missing definition identifier at {at}")]
    MissingIdentifier {
        /// Location of the offending `[`
        at: Source,
    },

    /// The same top-level identifier was declared twice
    #[error("duplicate identifier \"{name}\" at {first} and {second}")]
    DuplicateIdentifier {
        /// The re-declared identifier
        name: String,
        /// Location of the original declaration
        first: Source,
        /// Location of the re-declaration
        second: Source,
    },

    /// A `|` appeared outside of any group
    #[error("stray | at root level at {at}")]
    StrayAlternationAtRoot {
        /// Location of the offending `|`
        at: Source,
    },

    /// A `|` appeared directly after `[` or another `|`
    #[error("stray | in group at {at}")]
    StrayAlternationInGroup {
        /// Location of the offending `|`
        at: Source,
    },

    /// A `]` appeared with no matching `[`
    #[error("stray ] at {at}")]
    StrayClose {
        /// Location of the offending `]`
        at: Source,
    },

    /// A group closed without any content (`[]`)
    #[error("empty group at {at}")]
    EmptyGroup {
        /// Location of the offending `]`
        at: Source,
    },

    /// A reserved character was used in a top-level identifier
    #[error("invalid character {ch} in identifier at {at}")]
    InvalidIdentifierChar {
        /// The reserved character
        ch: char,
        /// Location of the offending identifier token
        at: Source,
    },

    /// A top-level identifier was followed by more text instead of `[`
    #[error("expecting [ after identifier at {at}")]
    ExpectedGroup {
        /// Location of the unexpected token
        at: Source,
    },

    /// A substitution marker opened with `{` but never closed
    #[error("unterminated substitution \"{text}\" at {at}")]
    UnterminatedSubstitution {
        /// The half-formed token
        text: String,
        /// Location of the offending token
        at: Source,
    },

    /// A `}` appeared without a matching `{`
    #[error("stray }} (substitution missing {{ ?) at {at}")]
    StraySubstitutionClose {
        /// Location of the offending token
        at: Source,
    },

    /// The input ended while a group was still open
    #[error("unterminated [ at {at}")]
    UnterminatedGroup {
        /// Location of the last token seen
        at: Source,
    },

    /// I/O error while reading a grammar file
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generation was requested on a tree with no definitions
    #[error("empty tree")]
    EmptyTree,

    /// Generation was requested for an identifier that isn't defined
    #[error("no such definition: {name}")]
    UnknownIdentifier {
        /// The requested identifier
        name: String,
    },

    /// A top-level definition exists but has no body to compose from
    #[error("definition {name} has no body")]
    MissingBody {
        /// The requested identifier
        name: String,
    },

    /// An exclusive selection ran out of unused branches
    #[error("all options exhausted")]
    OptionsExhausted,

    /// Substitution expansion recursed past the depth limit; the grammar is
    /// almost certainly self-referential
    #[error("substitution expansion too deep (self-referential grammar?)")]
    ExpansionTooDeep,

    /// A generation error, annotated with the location of the text node
    /// whose expansion failed
    #[error("from {at}: {cause}")]
    Located {
        /// Location of the failing text node
        at: Source,
        /// The underlying error
        #[source]
        cause: Box<Error>,
    },

    /// A generation error inside a `{...}` identifier reference
    #[error("{cause} ({name})")]
    Reference {
        /// The referenced identifier, as written (including any `*` prefix)
        name: String,
        /// The underlying error
        #[source]
        cause: Box<Error>,
    },
}

impl Error {
    /// True for errors produced while parsing (syntax and I/O), false for
    /// errors produced during generation.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        !matches!(
            self,
            Self::EmptyTree
                | Self::UnknownIdentifier { .. }
                | Self::MissingBody { .. }
                | Self::OptionsExhausted
                | Self::ExpansionTooDeep
                | Self::Located { .. }
                | Self::Reference { .. }
        )
    }
}
