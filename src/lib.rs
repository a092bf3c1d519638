//! Gibber - a generative grammar engine for composing random phrases
//!
//! Gibber compiles a small bracketed grammar language into a syntax tree,
//! then generates random natural-language phrases by walking that tree with
//! weighted random choice and text substitution.
//!
//! # Quick Start
//!
//! ```rust
//! let mut tree = gibber::parse("greeting [ hello there | good [morning | evening] ]").unwrap();
//! let phrase = tree.generate("").unwrap();
//!
//! assert!(["hello there", "good morning", "good evening"].contains(&phrase.as_str()));
//! ```
//!
//! # Grammar Format
//!
//! A grammar holds one or more definitions: an identifier followed by a
//! `[ ]` group. Groups contain branches separated by `|`, one of which is
//! chosen at random per generation, and may nest. Whitespace is collapsed
//! and definitions may span any number of lines. `//` comments run to the
//! end of the line.
//!
//! ```text
//! diary
//! [
//!   It was [Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday],
//!   the [first|second|third|fourth] week of
//!   [January|February|March|April|May|June|July|August|September|October|November|December].
//! ]
//! ```
//!
//! Output is stitched together word by word with single spaces, then
//! tidied: punctuation (`. , : ; ! ?`) snugs up to the preceding word and
//! parentheses tighten inward, so the sample above can come out as
//! `It was Friday, the first week of March.`
//!
//! # Substitutions
//!
//! A `{name}` marker makes a detour to evaluate another definition and
//! splices in the result, which keeps larger grammars readable and lets a
//! definition be reused:
//!
//! ```text
//! weekday [ Monday | Tuesday | Wednesday | Thursday | Friday | Saturday | Sunday ]
//! ordinal [ first | second | third | fourth ]
//! diary   [ It was {weekday}, the {ordinal} week. My {ordinal} coffee today... ]
//! ```
//!
//! `{low-high}` inserts a uniformly random integer from the inclusive
//! range, `{\n}` inserts a newline, and substitutions nest freely:
//!
//! ```text
//! headline [ {5-25} [Cute | Weird] Photos Of [Cats | Tractors] You Haven't Seen ]
//! ```
//!
//! Prefixing a referenced identifier with `*` makes the reference
//! *exclusive*: each top-level branch of that definition is handed out at
//! most once until [`Tree::reset`] is called, and requesting more branches
//! than exist is an error:
//!
//! ```text
//! ingredient [ flour | sugar | salt | yeast ]
//! recipe     [ {1-6} tbsp {*ingredient} {\n} {1-6} tbsp {*ingredient} ]
//! ```
//!
//! The `*` prefix works the same way passed directly to
//! [`Tree::generate`]. Exclusivity marks persist across calls on the same
//! tree until explicitly cleared with [`Tree::reset`].
//!
//! # Special Tokens
//!
//! - `<<` forces concatenation without a space: `[Mon|Tues] << day` gives
//!   `Monday` or `Tuesday`.
//! - `_` explicitly produces nothing: `I'm [very | _] disappointed.`
//! - `^` uppercases the next character: `^ here and ^ there` gives
//!   `Here and There`.
//!
//! # Modules
//!
//! - [`error`] - the crate-wide [`Error`] enum and [`Result`] alias
//! - [`parse()`] / [`parse_file()`] / [`parse_files()`] - grammar to [`Tree`]
//! - [`Tree::generate`] - tree to random phrase
//! - [`Tree::format`] - diagnostic tree visualization

#![forbid(unsafe_code)]

pub mod error;
mod format;
mod generate;
mod parse;
mod token;
mod tree;

pub use error::{Error, Result};
pub use format::FormatOptions;
pub use parse::{parse, parse_file, parse_files, quick};
pub use token::Source;
pub use tree::Tree;
