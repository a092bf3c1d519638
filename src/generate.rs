//! Phrase generation: randomized tree traversal, substitution expansion
//! and output cleanup.
//!
//! Composition walks the tree depth-first. Every group picks one branch
//! with a uniform random draw at a random starting offset, scanning
//! circularly, which stays unbiased when exclusive selection has to skip
//! branches that were already used. Text fragments are expanded
//! ("inflated") before they are joined: `{...}` markers become newlines,
//! random numbers or the generated output of another definition.

use rand::Rng;

use crate::error::{Error, Result};
use crate::tree::{NodeId, NodeKind, Tree};

/// Substitution markers may reference definitions that reference further
/// definitions. A well-formed grammar bottoms out quickly; hitting this
/// limit means the grammar references itself and would never terminate.
const MAX_EXPANSION_DEPTH: usize = 128;

impl Tree {
    /// Generate a random phrase for the definition named `id`.
    ///
    /// An empty `id` selects the most recently declared definition. A
    /// leading `*` requests exclusive ("exhaust-once") branch selection
    /// for this call; branches consumed this way stay consumed across
    /// calls until [`reset`](Tree::reset).
    ///
    /// # Errors
    ///
    /// Fails if the tree has no definitions, `id` is not defined, its
    /// definition has no body, an exclusive selection has no unused
    /// branches left, or a nested `{...}` reference fails.
    pub fn generate(&mut self, id: &str) -> Result<String> {
        self.generate_with(&mut rand::thread_rng(), id)
    }

    /// Like [`generate`](Tree::generate), drawing randomness from `rng`.
    ///
    /// A seeded [`rand::rngs::StdRng`] makes output reproducible, which
    /// the test suite relies on.
    ///
    /// # Errors
    ///
    /// See [`generate`](Tree::generate).
    pub fn generate_with<R: Rng>(&mut self, rng: &mut R, id: &str) -> Result<String> {
        self.evaluate(rng, id, 0)
    }

    /// Shared entry point for public calls and nested `{...}` references.
    fn evaluate<R: Rng>(&mut self, rng: &mut R, id: &str, depth: usize) -> Result<String> {
        let top = self.children(Self::ROOT);

        let Some(&last) = top.last() else {
            return Err(Error::EmptyTree);
        };

        let (start, unique) = if id.is_empty() {
            // The tag node itself; its name is never emitted, so
            // composition falls through to its body.
            (last, false)
        } else {
            let (name, unique) = match id.strip_prefix('*') {
                Some(rest) => (rest, true),
                None => (id, false),
            };

            let tag = top
                .iter()
                .rev()
                .copied()
                .find(|&node| self.node(node).text == name)
                .ok_or_else(|| Error::UnknownIdentifier {
                    name: name.to_string(),
                })?;

            let body = self
                .children(tag)
                .first()
                .copied()
                .ok_or_else(|| Error::MissingBody {
                    name: name.to_string(),
                })?;

            (body, unique)
        };

        let phrase = self.compose(rng, start, unique, depth)?;

        Ok(normalize(phrase))
    }

    /// Recursively compose the text of `id`, joining parts with spaces.
    ///
    /// `unique` only applies to the first group selection encountered;
    /// deeper descent never inherits it.
    fn compose<R: Rng>(
        &mut self,
        rng: &mut R,
        id: NodeId,
        unique: bool,
        depth: usize,
    ) -> Result<String> {
        if depth > MAX_EXPANSION_DEPTH {
            return Err(Error::ExpansionTooDeep);
        }

        if self.kind(id) == NodeKind::Group {
            // Parser invariant: a group has at least one branch.
            let branches = self.children(id).to_vec();
            let offset = rng.gen_range(0..branches.len());

            for step in 0..branches.len() {
                let branch = branches[(offset + step) % branches.len()];

                if unique {
                    if self.is_used(branch) {
                        continue;
                    }

                    // Committed even if composing the branch fails later;
                    // there is no rollback.
                    self.mark_used(branch);
                }

                return self.compose(rng, branch, false, depth);
            }

            return Err(Error::OptionsExhausted);
        }

        let mut parts = Vec::new();

        // Only text nodes contribute text of their own; tags and dummies
        // are structural.
        if self.kind(id) == NodeKind::Text {
            let text = self.node(id).text.clone();
            let part = self.inflate(rng, &text, depth).map_err(|cause| Error::Located {
                at: self.node(id).source.clone(),
                cause: Box::new(cause),
            })?;
            parts.push(part);
        }

        for child in self.children(id).to_vec() {
            parts.push(self.compose(rng, child, false, depth)?);
        }

        Ok(parts.join(" "))
    }

    /// Expand every `{...}` span in `text`, left to right.
    ///
    /// Recognized forms, in precedence order: the literal newline escape
    /// `{\n}`; a numeric range `{low-high}` yielding a uniform random
    /// integer (an inverted range is treated as `{high-low}`); otherwise
    /// an identifier reference, evaluated through the normal generation
    /// entry point (`*` prefix requests exclusivity). Text outside spans,
    /// including stray unmatched braces, passes through untouched. An
    /// unterminated `{` span becomes the literal placeholder `(ERROR)`;
    /// the parser rejects those in any grammar it accepts, so this is a
    /// defensive fallback only.
    fn inflate<R: Rng>(&mut self, rng: &mut R, text: &str, depth: usize) -> Result<String> {
        let mut out = String::new();
        let mut rest = text;

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|i| open + i) else {
                out.push_str(&rest[..open]);
                out.push_str("(ERROR)");
                return Ok(out);
            };

            // With nested opens the innermost one wins; anything before it
            // is literal text.
            let open = rest[..close].rfind('{').unwrap_or(open);
            out.push_str(&rest[..open]);

            let content = &rest[open + 1..close];

            if content == "\\n" {
                out.push('\n');
            } else if let Some((low, high)) = numeric_range(content) {
                let (low, high) = (low.min(high), low.max(high));
                out.push_str(&rng.gen_range(low..=high).to_string());
            } else {
                let part =
                    self.evaluate(rng, content, depth + 1)
                        .map_err(|cause| Error::Reference {
                            name: content.to_string(),
                            cause: Box::new(cause),
                        })?;
                out.push_str(&part);
            }

            rest = &rest[close + 1..];
        }

        out.push_str(rest);

        Ok(out)
    }
}

/// Parse `content` as `low-high` with two decimal integers; either side
/// may be negative.
fn numeric_range(content: &str) -> Option<(i64, i64)> {
    // The separator cannot be the first character; that would be a sign.
    for (index, _) in content.match_indices('-').skip_while(|&(i, _)| i == 0) {
        if let (Ok(low), Ok(high)) = (content[..index].parse(), content[index + 1..].parse()) {
            return Some((low, high));
        }
    }

    None
}

/// Deterministic output cleanup, applied once per generated phrase.
///
/// Fixed order: `<<` concatenation markers go first (taking one adjacent
/// space on each side with them), then spaces around newlines, then `^`
/// uppercasing, then punctuation tightening and the `_` empty token.
fn normalize(mut s: String) -> String {
    for pattern in [" << ", " <<", "<< "] {
        s = s.replace(pattern, "");
    }

    for (from, to) in [(" \n ", "\n"), (" \n", "\n"), ("\n ", "\n")] {
        s = s.replace(from, to);
    }

    // ^ uppercases the character that follows it, across a single space.
    s = s.replace("^ ", "^");

    while let Some(position) = s.find('^') {
        match s[position + 1..].chars().next() {
            None => {
                // Trailing ^ with nothing to uppercase.
                s.truncate(position);
                break;
            }
            Some(c) => {
                let upper: String = c.to_uppercase().collect();
                s.replace_range(position..position + 1 + c.len_utf8(), &upper);
            }
        }
    }

    for (from, to) in [
        (" )", ")"),
        ("( ", "("),
        (" ,", ","),
        (" .", "."),
        (" ?", "?"),
        (" !", "!"),
        (" :", ":"),
        (" ;", ";"),
        (" _ ", " "),
        (" _", ""),
        ("_ ", ""),
    ] {
        s = s.replace(from, to);
    }

    s
}
