//! Compound index completion
//!
//! Post-pass over a tagged tree: at each conjunction, every child tagged
//! with a compound index at the leading column tries to recruit untagged
//! sibling predicates for the index's remaining key columns. Columns must
//! be filled contiguously from the left; the first unfilled column stops
//! completion for that index.

use crate::index::{IndexCatalog, IndexId};
use crate::matcher::{IndexTag, MatchKind, MatchTree, NodeId};
use crate::observability::Logger;

use super::classify;
use super::memo::{MemoEntry, MemoStore};

/// Extends compound assignments across conjunction siblings
pub(crate) struct CompoundCompleter<'a> {
    catalog: &'a IndexCatalog,
    memo: &'a MemoStore,
}

impl<'a> CompoundCompleter<'a> {
    pub(crate) fn new(catalog: &'a IndexCatalog, memo: &'a MemoStore) -> Self {
        Self { catalog, memo }
    }

    /// Runs completion over the whole tagged tree
    pub(crate) fn run(&self, tree: &mut MatchTree, root: NodeId) {
        self.check_compound(tree, root, "");
    }

    fn check_compound(&self, tree: &mut MatchTree, node: NodeId, prefix: &str) {
        if matches!(tree.node(node).kind(), MatchKind::And) {
            self.complete_conjunction(tree, node, prefix);
        }

        // Array-scoped operators qualify their children's field paths.
        let child_prefix = if classify::array_uses_index_on_children(tree.node(node)) {
            match tree.node(node).path() {
                Some(path) if !path.is_empty() => format!("{}{}.", prefix, path),
                _ => prefix.to_string(),
            }
        } else {
            prefix.to_string()
        };

        let children = tree.children(node).to_vec();
        for child in children {
            self.check_compound(tree, child, &child_prefix);
        }
    }

    /// Local completion at one conjunction node
    fn complete_conjunction(&self, tree: &mut MatchTree, node: NodeId, prefix: &str) {
        // Partition the children indexable on their own field into those
        // already carrying a compound assignment and those untagged.
        // Non-leaf children are handled by the recursion.
        let mut assigned_compound: Vec<NodeId> = Vec::new();
        let mut unassigned: Vec<NodeId> = Vec::new();
        for &child in tree.children(node) {
            if !classify::can_use_index_on_own_field(tree.node(child)) {
                continue;
            }
            match tree.index_tag(child) {
                None => unassigned.push(child),
                Some(tag) if self.catalog.is_compound(tag.index) => {
                    assigned_compound.push(child);
                }
                Some(_) => {}
            }
        }

        if !assigned_compound.is_empty() {
            Logger::trace(
                "COMPOUND_CANDIDATES",
                &[
                    ("assigned", assigned_compound.len().to_string().as_str()),
                    ("unassigned", unassigned.len().to_string().as_str()),
                ],
            );
        }

        for child in assigned_compound {
            let index = match tree.index_tag(child) {
                Some(tag) => tag.index,
                None => continue,
            };

            // The downstream plan builder cannot consume a multikey index
            // as a compound assignment; leave the siblings untouched.
            if self.catalog.is_multikey(index) {
                Logger::trace(
                    "COMPOUND_SKIP_MULTIKEY",
                    &[("index", index.to_string().as_str())],
                );
                continue;
            }

            // Column 0 is already served by the tagged child.
            let key_pattern = self.catalog.key_pattern(index);
            let mut position = 0;
            for column in key_pattern.iter().skip(1) {
                position += 1;
                if !self.assign_column(tree, &unassigned, prefix, index, column, position) {
                    // Columns must be assigned contiguously; later ones
                    // are not attempted.
                    Logger::trace(
                        "COMPOUND_STOPPED",
                        &[
                            ("column", column.as_str()),
                            ("index", index.to_string().as_str()),
                        ],
                    );
                    break;
                }
            }
        }
    }

    /// Tags the first eligible unassigned sibling whose qualified path
    /// matches `column`. Returns true if a sibling was tagged.
    fn assign_column(
        &self,
        tree: &mut MatchTree,
        unassigned: &[NodeId],
        prefix: &str,
        index: IndexId,
        column: &str,
        position: usize,
    ) -> bool {
        for &candidate in unassigned {
            let path = tree.node(candidate).path().unwrap_or("");
            if format!("{}{}", prefix, path) != column {
                continue;
            }
            // An earlier compound pass may already have claimed it.
            if tree.has_index_tag(candidate) {
                continue;
            }
            let Some(memo_id) = self.memo.memo_id(candidate) else {
                continue;
            };
            let MemoEntry::Predicate {
                expr, not_first, ..
            } = self.memo.entry(memo_id)
            else {
                continue;
            };
            debug_assert_eq!(*expr, candidate);

            // The compound index must appear in the sibling's notFirst
            // candidates.
            if not_first.contains(&index) {
                Logger::trace(
                    "COMPOUND_EXTENDED",
                    &[
                        ("index", index.to_string().as_str()),
                        ("path", path),
                        ("position", position.to_string().as_str()),
                    ],
                );
                tree.set_index_tag(candidate, IndexTag::at_position(index, position));
                return true;
            }
        }
        false
    }
}
