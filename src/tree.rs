//! The grammar syntax tree.
//!
//! Nodes live in a single arena owned by [`Tree`]; children are stored as
//! index lists and a [`NodeId`] is nothing but an index into the arena.
//! Since the structure is a strict tree there are no back edges, and arena
//! indices double as the stable node identities used by exclusive
//! ("exhaust-once") selection bookkeeping.

use std::collections::HashSet;

use crate::token::Source;

/// Dummy nodes carry the comment marker as their text. Tokenization strips
/// comments, so this sentinel can never collide with real input.
pub(crate) const DUMMY_TEXT: &str = "//";

/// Stable identity of a node within one [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

/// The five kinds of node a grammar tree is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// The single implicit root; owns the top-level definitions
    Root,
    /// A top-level definition; its text is the identifier name and is never
    /// emitted during generation
    Tag,
    /// A `[...]` alternation; children are the branches
    Group,
    /// A literal text fragment, possibly holding `{...}` markers
    Text,
    /// Zero-width anchor inserted between back-to-back groups so that
    /// trailing text has a parent other than the group itself
    Dummy,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) text: String,
    pub(crate) source: Source,
    pub(crate) children: Vec<NodeId>,
}

/// A parsed grammar.
///
/// Built once by [`parse()`](crate::parse()) and immutable afterwards, except
/// for the exclusivity bookkeeping mutated by
/// [`generate`](Tree::generate) and cleared by [`reset`](Tree::reset).
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    unique_used: HashSet<NodeId>,
}

impl Tree {
    pub(crate) const ROOT: NodeId = NodeId(0);

    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                text: String::new(),
                source: Source::detached(),
                children: Vec::new(),
            }],
            unique_used: HashSet::new(),
        }
    }

    /// Append a new node under `parent` and return its id.
    pub(crate) fn attach(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        text: impl Into<String>,
        source: Source,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            text: text.into(),
            source,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Total number of nodes, excluding the implicit root.
    ///
    /// Exposed for diagnostics and testing.
    #[must_use]
    pub fn count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Clear the list of branches consumed by exclusive (`*`) selection.
    ///
    /// Has no other side effects; after a reset an exhaust-once sequence
    /// starts over as on a freshly parsed tree.
    pub fn reset(&mut self) {
        self.unique_used.clear();
    }

    pub(crate) fn is_used(&self, id: NodeId) -> bool {
        self.unique_used.contains(&id)
    }

    pub(crate) fn mark_used(&mut self, id: NodeId) {
        self.unique_used.insert(id);
    }
}
