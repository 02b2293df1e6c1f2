//! Catalog of available indexes
//!
//! Entries are positional: an index's id is its offset in the catalog.
//! The catalog never changes while a plan is being enumerated.

use serde::{Deserialize, Serialize};

/// Index id: position of the entry in the catalog
pub type IndexId = usize;

/// A single index definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Ordered field paths forming the composite key
    key_pattern: Vec<String>,
    /// Whether any key column stores array values
    multikey: bool,
}

impl IndexEntry {
    /// Creates a single-column index over `field`
    pub fn single(field: impl Into<String>) -> Self {
        Self {
            key_pattern: vec![field.into()],
            multikey: false,
        }
    }

    /// Creates a compound index over `fields`, in key order
    pub fn compound(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            key_pattern: fields.into_iter().map(Into::into).collect(),
            multikey: false,
        }
    }

    /// Marks the index as multikey (some column is array-valued)
    pub fn multikey(mut self) -> Self {
        self.multikey = true;
        self
    }

    /// Ordered key columns
    pub fn key_pattern(&self) -> &[String] {
        &self.key_pattern
    }

    /// Returns true if the key pattern has more than one column
    pub fn is_compound(&self) -> bool {
        self.key_pattern.len() > 1
    }

    /// Returns true if some key column stores array values
    pub fn is_multikey(&self) -> bool {
        self.multikey
    }
}

/// Ordered, read-only collection of index entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCatalog {
    entries: Vec<IndexEntry>,
}

impl IndexCatalog {
    /// Creates a catalog from entries, ids assigned by position
    pub fn new(entries: Vec<IndexEntry>) -> Self {
        Self { entries }
    }

    /// Appends an entry, returning its id
    pub fn push(&mut self, entry: IndexEntry) -> IndexId {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Borrows the entry for `id`, if `id` is in range
    pub fn get(&self, id: IndexId) -> Option<&IndexEntry> {
        self.entries.get(id)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `id` names a compound index.
    ///
    /// `id` must be a valid catalog position.
    pub fn is_compound(&self, id: IndexId) -> bool {
        self.entries[id].is_compound()
    }

    /// Returns true if `id` names a multikey index.
    ///
    /// `id` must be a valid catalog position.
    pub fn is_multikey(&self, id: IndexId) -> bool {
        self.entries[id].is_multikey()
    }

    /// Ordered key columns of `id`.
    ///
    /// `id` must be a valid catalog position.
    pub fn key_pattern(&self, id: IndexId) -> &[String] {
        self.entries[id].key_pattern()
    }
}
