//! Leaf predicate annotations
//!
//! A leaf's tag slot holds either a relevance tag (enumerator input) or an
//! index tag (enumerator output), never both.

use crate::index::IndexId;

/// Input annotation: which indexes could serve this predicate.
///
/// `first` lists indexes where the predicate's field is the leading key
/// column; `not_first` lists indexes where it only appears as a later
/// column. The sets may overlap. Order is preserved by the enumerator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelevanceTag {
    /// Indexes usable with this predicate as the leading column
    pub first: Vec<IndexId>,
    /// Indexes usable with this predicate only as a non-leading column
    pub not_first: Vec<IndexId>,
}

impl RelevanceTag {
    /// Creates a relevance tag from both candidate sets
    pub fn new(first: Vec<IndexId>, not_first: Vec<IndexId>) -> Self {
        Self { first, not_first }
    }

    /// Creates a relevance tag with leading-column candidates only
    pub fn first(first: Vec<IndexId>) -> Self {
        Self {
            first,
            not_first: Vec::new(),
        }
    }
}

/// Output annotation: use index `index` at key column `position`.
///
/// Position 0 is the leading column. Positions greater than 0 are only
/// produced by compound completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexTag {
    /// Index id (position in the catalog)
    pub index: IndexId,
    /// 0-based column within the index key pattern
    pub position: usize,
}

impl IndexTag {
    /// Creates a leading-column tag
    pub fn new(index: IndexId) -> Self {
        Self { index, position: 0 }
    }

    /// Creates a tag at an explicit key column
    pub fn at_position(index: IndexId, position: usize) -> Self {
        Self { index, position }
    }
}

/// The single polymorphic tag slot stored on a tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSlot {
    /// Input annotation from the relevance tagger
    Relevance(RelevanceTag),
    /// Output annotation from the enumerator
    Index(IndexTag),
}
