//! Plan enumerator core
//!
//! The build pass (`prep_memo`) walks the relevance-tagged tree bottom-up
//! and memoizes each node's enumeration choices. The tagger (`tag_memo`)
//! follows the choice cursor through the memo and installs index tags on
//! the leaves. Compound completion then extends single-column compound
//! assignments with sibling predicates.
//!
//! The enumerator is single-threaded and non-suspending. It mutates the
//! tree's tag slots and nothing else; the catalog is never touched.

use crate::index::IndexCatalog;
use crate::matcher::{IndexTag, MatchKind, MatchTree, NodeId};
use crate::observability::Logger;

use super::classify;
use super::compound::CompoundCompleter;
use super::errors::{EnumeratorError, EnumeratorResult};
use super::explain::MemoExplain;
use super::memo::{MemoEntry, MemoId, MemoStore};

/// Enumerates index-assignment plans over a predicate tree.
///
/// Borrows the tree mutably and the catalog immutably for its whole life.
/// Not safe for concurrent use; plan different queries with distinct
/// instances.
pub struct PlanEnumerator<'a> {
    tree: &'a mut MatchTree,
    catalog: &'a IndexCatalog,
    memo: MemoStore,
    /// Current choice per memo id; choice 0 everywhere yields the first
    /// plan
    cursor: Vec<usize>,
    done: bool,
}

impl<'a> PlanEnumerator<'a> {
    /// Creates an enumerator over `tree` and `catalog`
    pub fn new(tree: &'a mut MatchTree, catalog: &'a IndexCatalog) -> Self {
        Self {
            tree,
            catalog,
            memo: MemoStore::new(),
            cursor: Vec::new(),
            done: false,
        }
    }

    /// Runs the build pass and prepares the first assignment.
    ///
    /// Consumes the tree's relevance tags into the memo, clears the tag
    /// slots, and, when the root is indexable, tags the stored tree and
    /// runs compound completion against it. Fails only on malformed input.
    pub fn init(&mut self) -> EnumeratorResult<()> {
        let root = self.tree.root().ok_or(EnumeratorError::EmptyTree)?;
        self.validate_relevance_tags()?;

        self.memo = MemoStore::new();
        self.cursor.clear();
        self.done = false;

        Logger::trace(
            "ENUM_INIT",
            &[("nodes", self.tree.node_count().to_string().as_str())],
        );

        self.done = !self.prep_memo(root);

        // Relevance tags have been consumed into the memo; clear every
        // slot so the tagger starts from a clean tree.
        self.tree.reset_tags();

        let dump = MemoExplain::from_store(&self.memo, self.tree).to_string();
        Logger::trace("MEMO_DUMP", &[("memo", dump.as_str())]);

        if self.done {
            Logger::trace("ENUM_NO_PLAN", &[]);
        } else {
            // The root was classified, or the build would have reported
            // non-indexable.
            let root_memo = self.memo.memo_id(root).expect("root has a memo entry");
            self.tag_memo(root_memo);
            CompoundCompleter::new(self.catalog, &self.memo).run(self.tree, root);
        }

        Ok(())
    }

    /// Yields the next tagged tree, or `None` once enumeration is
    /// exhausted. The first call returns a clone of the input tree with
    /// `IndexTag`s installed; the stored tree is reset for re-tagging.
    pub fn get_next(&mut self) -> Option<MatchTree> {
        if self.done || self.memo.is_empty() {
            return None;
        }

        let root_memo = self.tree.root().and_then(|root| self.memo.memo_id(root));
        let plan = self.tree.clone();
        self.tree.reset_tags();

        self.done = match root_memo {
            Some(id) => !self.advance(id),
            None => true,
        };
        Some(plan)
    }

    /// Borrows the memo structure built by [`init`](Self::init)
    pub fn memo(&self) -> &MemoStore {
        &self.memo
    }

    /// Every index id named by a relevance tag must be a catalog position.
    fn validate_relevance_tags(&self) -> EnumeratorResult<()> {
        for id in 0..self.tree.node_count() {
            let Some(tag) = self.tree.relevance_tag(id) else {
                continue;
            };
            for &index in tag.first.iter().chain(tag.not_first.iter()) {
                if self.catalog.get(index).is_none() {
                    return Err(EnumeratorError::UnknownIndex {
                        path: self.tree.node(id).path().unwrap_or("").to_string(),
                        index,
                    });
                }
            }
        }
        Ok(())
    }

    /// Allocates the memo entry and cursor slot for `node`
    fn new_memo(&mut self, node: NodeId, entry: MemoEntry) -> MemoId {
        let id = self.memo.insert(node, entry);
        debug_assert_eq!(id, self.cursor.len());
        self.cursor.push(0);
        id
    }

    /// Builds the memo entry for `node` and recursively for its
    /// descendants. Returns true iff the entry is indexable.
    fn prep_memo(&mut self, node: NodeId) -> bool {
        if classify::array_uses_index_on_children(self.tree.node(node)) {
            let children = self.tree.children(node).to_vec();
            let mut options = Vec::new();
            for child in children {
                if self.prep_memo(child) {
                    let child_memo = self
                        .memo
                        .memo_id(child)
                        .expect("indexable child has a memo entry");
                    options.push(vec![child_memo]);
                }
            }
            let indexable = !options.is_empty();
            self.new_memo(node, MemoEntry::AndChoice { options });
            indexable
        } else if classify::can_use_index_on_own_field(self.tree.node(node)) {
            let (first, not_first) = match self.tree.take_relevance_tag(node) {
                Some(tag) => (tag.first, tag.not_first),
                None => (Vec::new(), Vec::new()),
            };
            // A notFirst index needs a compound assignment driven by a
            // sibling, so only 'first' candidates qualify on their own.
            let indexable = !first.is_empty();
            self.new_memo(
                node,
                MemoEntry::Predicate {
                    expr: node,
                    first,
                    not_first,
                },
            );
            indexable
        } else if classify::is_logical(self.tree.node(node)) {
            let is_or = matches!(self.tree.node(node).kind(), MatchKind::Or);
            let children = self.tree.children(node).to_vec();
            if is_or {
                // An unindexed branch would force a collection scan that
                // dominates the whole disjunction. An empty disjunction
                // has nothing to index.
                let mut indexable = !children.is_empty();
                for &child in &children {
                    if !self.prep_memo(child) {
                        indexable = false;
                    }
                }
                let subnodes = children
                    .iter()
                    .filter_map(|&child| self.memo.memo_id(child))
                    .collect();
                self.new_memo(node, MemoEntry::OrAll { subnodes });
                indexable
            } else {
                // Size-1 subsets only: one index at a time. The exhaustive
                // form would enumerate subsets of every size up to the
                // child count.
                let mut options: Vec<Vec<MemoId>> = Vec::new();
                let mut geo_near_option = None;
                for &child in &children {
                    if !self.prep_memo(child) {
                        continue;
                    }
                    let child_memo = self
                        .memo
                        .memo_id(child)
                        .expect("indexable child has a memo entry");
                    options.push(vec![child_memo]);

                    if let MemoEntry::Predicate { expr, .. } = self.memo.entry(child_memo) {
                        if matches!(self.tree.node(*expr).kind(), MatchKind::GeoNear(_)) {
                            geo_near_option = Some(options.len() - 1);
                        }
                    }
                }

                // Geo-nearest is only answerable through its specialized
                // index; option 0 is what the first plan selects.
                if let Some(geo) = geo_near_option {
                    if geo != 0 {
                        options.swap(0, geo);
                    }
                }

                let indexable = !options.is_empty();
                self.new_memo(node, MemoEntry::AndChoice { options });
                indexable
            }
        } else {
            false
        }
    }

    /// Attaches index tags to every leaf reachable from memo `id` under
    /// the current cursor.
    fn tag_memo(&mut self, id: MemoId) {
        match self.memo.entry(id) {
            MemoEntry::Predicate { expr, first, .. } => {
                // There may be no indexes assignable here; the leaf stays
                // untagged.
                if !first.is_empty() {
                    let choice = self.cursor[id];
                    debug_assert!(choice < first.len());
                    let (leaf, index) = (*expr, first[choice]);
                    debug_assert!(!self.tree.has_index_tag(leaf));
                    self.tree.set_index_tag(leaf, IndexTag::new(index));
                }
            }
            MemoEntry::OrAll { subnodes } => {
                let subnodes = subnodes.clone();
                for sub in subnodes {
                    self.tag_memo(sub);
                }
            }
            MemoEntry::AndChoice { options } => {
                let choice = self.cursor[id];
                debug_assert!(choice < options.len());
                let option = options[choice].clone();
                for sub in option {
                    self.tag_memo(sub);
                }
            }
        }
    }

    /// Seam for multi-plan enumeration: advancing the choice at `id`
    /// would yield the next assignment. The current policy stops after
    /// the first plan.
    fn advance(&mut self, _id: MemoId) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;
    use crate::matcher::RelevanceTag;
    use serde_json::json;

    fn single_index_catalog() -> IndexCatalog {
        IndexCatalog::new(vec![IndexEntry::single("a")])
    }

    #[test]
    fn test_single_leaf_plan() {
        let catalog = single_index_catalog();
        let mut tree = MatchTree::new();
        let a = tree.add_eq("a", json!(1));
        tree.set_relevance_tag(a, RelevanceTag::first(vec![0]));
        tree.set_root(a);

        let mut enumerator = PlanEnumerator::new(&mut tree, &catalog);
        enumerator.init().unwrap();

        let plan = enumerator.get_next().expect("one plan");
        assert_eq!(plan.index_tag(a), Some(&IndexTag::new(0)));
        assert!(enumerator.get_next().is_none());
    }

    #[test]
    fn test_untagged_leaf_yields_no_plan() {
        let catalog = single_index_catalog();
        let mut tree = MatchTree::new();
        let a = tree.add_eq("a", json!(1));
        tree.set_root(a);

        let mut enumerator = PlanEnumerator::new(&mut tree, &catalog);
        enumerator.init().unwrap();
        assert!(enumerator.get_next().is_none());
    }

    #[test]
    fn test_original_tree_reset_after_get_next() {
        let catalog = single_index_catalog();
        let mut tree = MatchTree::new();
        let a = tree.add_eq("a", json!(1));
        tree.set_relevance_tag(a, RelevanceTag::first(vec![0]));
        tree.set_root(a);

        {
            let mut enumerator = PlanEnumerator::new(&mut tree, &catalog);
            enumerator.init().unwrap();
            let _plan = enumerator.get_next().expect("one plan");
        }

        // The stored tree was reset for re-tagging.
        assert!(tree.index_tag(a).is_none());
        assert!(tree.relevance_tag(a).is_none());
    }

    #[test]
    fn test_empty_tree_rejected() {
        let catalog = single_index_catalog();
        let mut tree = MatchTree::new();

        let mut enumerator = PlanEnumerator::new(&mut tree, &catalog);
        assert_eq!(enumerator.init(), Err(EnumeratorError::EmptyTree));
    }

    #[test]
    fn test_unknown_index_rejected() {
        let catalog = single_index_catalog();
        let mut tree = MatchTree::new();
        let a = tree.add_eq("a", json!(1));
        tree.set_relevance_tag(a, RelevanceTag::first(vec![7]));
        tree.set_root(a);

        let mut enumerator = PlanEnumerator::new(&mut tree, &catalog);
        let err = enumerator.init().unwrap_err();
        assert_eq!(err.code(), "NIMBUS_PLAN_UNKNOWN_INDEX");
    }

    #[test]
    fn test_get_next_before_init_is_empty() {
        let catalog = single_index_catalog();
        let mut tree = MatchTree::new();
        let a = tree.add_eq("a", json!(1));
        tree.set_root(a);

        let mut enumerator = PlanEnumerator::new(&mut tree, &catalog);
        assert!(enumerator.get_next().is_none());
    }
}
