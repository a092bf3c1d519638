//! Human-readable rendering of a grammar tree.
//!
//! Purely diagnostic: the renderer consumes the finished tree shape and
//! never affects parsing or generation.

use serde::{Deserialize, Serialize};

use crate::tree::{NodeId, NodeKind, Tree};

/// Display flags for [`Tree::format`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Show the unique per-parse group labels (e.g. `[3`) instead of a
    /// bare `[`
    pub group_numbers: bool,
    /// Show each node's source location in a right-hand column
    pub sources: bool,
}

/// One rendered row: the indented node text and its source location.
struct Row {
    left: String,
    right: String,
}

impl Tree {
    /// Render the tree as indented text with box-drawing connectors.
    ///
    /// ```
    /// let tree = gibber::parse("greeting [ hi | good [morning|evening] ]").unwrap();
    /// println!("{}", tree.format(gibber::FormatOptions::default()));
    /// ```
    #[must_use]
    pub fn format(&self, options: FormatOptions) -> String {
        let mut rows = Vec::new();
        self.collect_rows(Self::ROOT, "", options, &mut rows);
        connect(rows, options).join("\n")
    }

    fn collect_rows(&self, id: NodeId, prefix: &str, options: FormatOptions, rows: &mut Vec<Row>) {
        for &child in self.children(id) {
            rows.push(Row {
                left: format!("{prefix}└─ {}", self.label(child, options)),
                right: self.node(child).source.to_string(),
            });
            self.collect_rows(child, &format!("{prefix}   "), options, rows);
        }
    }

    /// Text for a single node; distinct from [`Tree::format`], which
    /// renders the whole tree.
    fn label(&self, id: NodeId, options: FormatOptions) -> String {
        let node = self.node(id);

        match node.kind {
            NodeKind::Root => "(root)".to_string(),
            NodeKind::Tag | NodeKind::Text => node.text.clone(),
            NodeKind::Group if options.group_numbers => node.text.clone(),
            NodeKind::Group => "[".to_string(),
            NodeKind::Dummy => "*".to_string(),
        }
    }
}

/// Thread vertical connectors through the rendered rows.
///
/// Rows come in with every node prefixed by a bottom-left corner. Scanning
/// bottom-up, a corner in a column that already connects downward becomes a
/// tee, and spaces in connected columns become vertical bars. Any other
/// character is node text and breaks the column's connection.
fn connect(rows: Vec<Row>, options: FormatOptions) -> Vec<String> {
    let mut grid: Vec<Vec<char>> = rows.iter().map(|row| row.left.chars().collect()).collect();
    let max_width = grid.iter().map(Vec::len).max().unwrap_or(0);
    let mut connected = vec![false; max_width];

    for line in grid.iter_mut().rev() {
        for column in 0..max_width {
            let Some(c) = line.get_mut(column) else {
                connected[column] = false;
                continue;
            };

            match *c {
                '└' if connected[column] => *c = '├',
                '└' => connected[column] = true,
                ' ' if connected[column] => *c = '│',
                ' ' => {}
                _ => connected[column] = false,
            }
        }
    }

    grid.iter()
        .zip(&rows)
        .map(|(line, row)| {
            // Drop the root-level connector; top-level definitions start
            // flush left.
            let left: String = line.iter().skip(3).collect();

            if options.sources {
                format!("{left:<max_width$}{}", row.right)
            } else {
                left
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn renders_nested_groups_with_connectors() {
        let tree = parse("diary [ It was [first|second] week ]").unwrap();
        let expected = "\
diary
└─ [
   └─ It was
      ├─ [
      │  ├─ first
      │  └─ second
      └─ week";
        assert_eq!(tree.format(FormatOptions::default()), expected);
    }

    #[test]
    fn sibling_definitions_connect_vertically() {
        let tree = parse("a[x] b[y]").unwrap();
        let rendered = tree.format(FormatOptions::default());
        assert_eq!(rendered.lines().count(), 6);
        assert!(rendered.contains('├') || rendered.starts_with('a'));
        assert!(rendered.contains("b\n"));
    }

    #[test]
    fn group_numbers_only_when_requested() {
        let tree = parse("a[b]").unwrap();

        let numbered = tree.format(FormatOptions {
            group_numbers: true,
            ..FormatOptions::default()
        });
        assert_eq!(numbered.matches("[1").count(), 1);

        let plain = tree.format(FormatOptions::default());
        assert_eq!(plain.matches("[1").count(), 0);
    }

    #[test]
    fn sources_only_when_requested() {
        let tree = parse("a[b]").unwrap();

        let with_sources = tree.format(FormatOptions {
            sources: true,
            ..FormatOptions::default()
        });
        assert!(with_sources.contains(":1"));

        let plain = tree.format(FormatOptions::default());
        assert!(!plain.contains(":1"));
    }

    #[test]
    fn dummy_anchors_render_as_star() {
        let tree = parse("a[[b]c]").unwrap();
        assert!(tree.format(FormatOptions::default()).contains('*'));
    }

    #[test]
    fn rendering_does_not_disturb_generation() {
        let mut tree = parse("a[b]").unwrap();
        let _ = tree.format(FormatOptions::default());
        assert_eq!(tree.generate("").unwrap(), "b");
    }
}
