//! Explain renderings for the enumerator's diagnostic channel
//!
//! Produces deterministic, human-readable dumps of the memo structure and
//! of the index assignment carried by a tagged tree. Advisory only: the
//! planner's behavior does not depend on these.

use std::fmt;

use crate::matcher::MatchTree;

use super::memo::{MemoEntry, MemoStore};

/// Rendering of every memo entry, one line per id
#[derive(Debug, Clone)]
pub struct MemoExplain {
    lines: Vec<String>,
}

impl MemoExplain {
    /// Renders `store` against the tree it was built from
    pub fn from_store(store: &MemoStore, tree: &MatchTree) -> Self {
        let lines = store
            .iter()
            .map(|(id, entry)| match entry {
                MemoEntry::Predicate {
                    expr,
                    first,
                    not_first,
                } => {
                    let path = tree.node(*expr).path().unwrap_or("");
                    format!(
                        "Node #{}: predicate over '{}', first: {:?}, notFirst: {:?}",
                        id, path, first, not_first
                    )
                }
                MemoEntry::AndChoice { options } => {
                    format!("Node #{}: one of: {:?}", id, options)
                }
                MemoEntry::OrAll { subnodes } => {
                    format!("Node #{}: all of: {:?}", id, subnodes)
                }
            })
            .collect();
        Self { lines }
    }
}

impl fmt::Display for MemoExplain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== MEMO ===")?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Listing of the index assignment on a tagged tree's leaves
#[derive(Debug, Clone)]
pub struct AssignmentExplain {
    lines: Vec<String>,
}

impl AssignmentExplain {
    /// Collects every tagged leaf of `tree`, in node order
    pub fn from_tree(tree: &MatchTree) -> Self {
        let mut lines = Vec::new();
        for id in 0..tree.node_count() {
            let node = tree.node(id);
            if !node.kind().is_leaf() {
                continue;
            }
            if let Some(tag) = tree.index_tag(id) {
                lines.push(format!(
                    "'{}' -> index {} @ column {}",
                    node.path().unwrap_or(""),
                    tag.index,
                    tag.position
                ));
            }
        }
        Self { lines }
    }

    /// Number of tagged leaves
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if no leaf carries an index tag
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for AssignmentExplain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== INDEX ASSIGNMENT ===")?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{IndexTag, MatchTree};
    use serde_json::json;

    #[test]
    fn test_memo_explain_lines() {
        let mut tree = MatchTree::new();
        let a = tree.add_eq("a", json!(1));

        let mut store = MemoStore::new();
        let pred = store.insert(
            a,
            MemoEntry::Predicate {
                expr: a,
                first: vec![0],
                not_first: vec![1],
            },
        );
        store.insert(
            99,
            MemoEntry::AndChoice {
                options: vec![vec![pred]],
            },
        );

        let output = MemoExplain::from_store(&store, &tree).to_string();
        assert!(output.contains("=== MEMO ==="));
        assert!(output.contains("Node #0: predicate over 'a', first: [0], notFirst: [1]"));
        assert!(output.contains("Node #1: one of: [[0]]"));
    }

    #[test]
    fn test_assignment_explain_lists_tagged_leaves() {
        let mut tree = MatchTree::new();
        let a = tree.add_eq("a", json!(1));
        let b = tree.add_eq("b", json!(2));
        let root = tree.add_and(vec![a, b]);
        tree.set_root(root);
        tree.set_index_tag(a, IndexTag::new(0));
        tree.set_index_tag(b, IndexTag::at_position(0, 1));

        let explain = AssignmentExplain::from_tree(&tree);
        assert_eq!(explain.len(), 2);

        let output = explain.to_string();
        assert!(output.contains("'a' -> index 0 @ column 0"));
        assert!(output.contains("'b' -> index 0 @ column 1"));
    }

    #[test]
    fn test_assignment_explain_empty() {
        let mut tree = MatchTree::new();
        let a = tree.add_eq("a", json!(1));
        tree.set_root(a);

        let explain = AssignmentExplain::from_tree(&tree);
        assert!(explain.is_empty());
    }

    #[test]
    fn test_explain_deterministic() {
        let mut tree = MatchTree::new();
        let a = tree.add_eq("a", json!(1));
        tree.set_index_tag(a, IndexTag::new(2));

        let one = AssignmentExplain::from_tree(&tree).to_string();
        let two = AssignmentExplain::from_tree(&tree).to_string();
        assert_eq!(one, two);
    }
}
