//! Memo store: the enumeration DAG
//!
//! One memo entry per visited tree node, held in a dense arena keyed by
//! `MemoId`. Ids are assigned in post-order of the build traversal, so
//! cross-entry references always point at lower-numbered entries and the
//! structure is acyclic by construction. The node-to-id map is populated
//! during build and read-only afterwards.

use std::collections::HashMap;

use crate::index::IndexId;
use crate::matcher::NodeId;

/// Memo entry handle within a [`MemoStore`]
pub type MemoId = usize;

/// One node of the enumeration DAG
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoEntry {
    /// Leaf predicate with its candidate indexes.
    ///
    /// Indexable iff `first` is non-empty; `not_first` candidates only
    /// come into play through compound completion.
    Predicate {
        /// The leaf node this entry describes
        expr: NodeId,
        /// Indexes usable with this predicate as the leading column
        first: Vec<IndexId>,
        /// Indexes usable only as a non-leading column
        not_first: Vec<IndexId>,
    },
    /// Conjunction: exactly one option is taken per plan.
    ///
    /// Each option is an ordered list of child memo ids. Indexable iff at
    /// least one option exists.
    AndChoice {
        /// Alternative child selections
        options: Vec<Vec<MemoId>>,
    },
    /// Disjunction: every subnode is tagged regardless of choice.
    ///
    /// Indexable iff every child was indexable at build time.
    OrAll {
        /// Child memo ids, one per child, in child order
        subnodes: Vec<MemoId>,
    },
}

/// Dense arena of memo entries plus the node-to-id reverse map
#[derive(Debug, Default)]
pub struct MemoStore {
    entries: Vec<MemoEntry>,
    node_to_memo: HashMap<NodeId, MemoId>,
}

impl MemoStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entry` for `node`, returning the freshly assigned id.
    ///
    /// Ids are monotonically increasing; each node is inserted at most
    /// once.
    pub fn insert(&mut self, node: NodeId, entry: MemoEntry) -> MemoId {
        let id = self.entries.len();
        self.entries.push(entry);
        let previous = self.node_to_memo.insert(node, id);
        debug_assert!(previous.is_none(), "node memoized twice");
        id
    }

    /// Borrows the entry for `id`.
    pub fn entry(&self, id: MemoId) -> &MemoEntry {
        &self.entries[id]
    }

    /// Looks up the memo id assigned to `node`, if it was memoized.
    pub fn memo_id(&self, node: NodeId) -> Option<MemoId> {
        self.node_to_memo.get(&node).copied()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no node has been memoized
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in id order
    pub fn iter(&self) -> impl Iterator<Item = (MemoId, &MemoEntry)> {
        self.entries.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_contiguous() {
        let mut store = MemoStore::new();
        let a = store.insert(
            7,
            MemoEntry::Predicate {
                expr: 7,
                first: vec![0],
                not_first: vec![],
            },
        );
        let b = store.insert(9, MemoEntry::OrAll { subnodes: vec![a] });

        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_reverse_map() {
        let mut store = MemoStore::new();
        let id = store.insert(3, MemoEntry::AndChoice { options: vec![] });

        assert_eq!(store.memo_id(3), Some(id));
        assert_eq!(store.memo_id(4), None);
    }

    #[test]
    fn test_entry_lookup() {
        let mut store = MemoStore::new();
        let id = store.insert(
            0,
            MemoEntry::Predicate {
                expr: 0,
                first: vec![1, 2],
                not_first: vec![3],
            },
        );

        match store.entry(id) {
            MemoEntry::Predicate { expr, first, not_first } => {
                assert_eq!(*expr, 0);
                assert_eq!(first, &[1, 2]);
                assert_eq!(not_first, &[3]);
            }
            other => panic!("unexpected entry: {:?}", other),
        }
    }
}
