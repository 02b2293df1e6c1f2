//! Match expression tree structures
//!
//! The tree is stored as an arena: `MatchTree` owns every node and hands
//! out dense `NodeId`s. Ids are stable across clones, so a memo built
//! against one tree addresses the same nodes in a clone of it.

use serde_json::Value;

use super::tags::{IndexTag, RelevanceTag, TagSlot};

/// Node handle within a [`MatchTree`]
pub type NodeId = usize;

/// Leaf comparison operations
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Equality: field = value
    Eq(Value),
    /// Greater than or equal: field >= value
    Gte(Value),
    /// Greater than: field > value
    Gt(Value),
    /// Less than or equal: field <= value
    Lte(Value),
    /// Less than: field < value
    Lt(Value),
}

impl FilterOp {
    /// Returns true if this is an equality operation
    pub fn is_equality(&self) -> bool {
        matches!(self, FilterOp::Eq(_))
    }

    /// Returns true if this is a range operation
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            FilterOp::Gte(_) | FilterOp::Gt(_) | FilterOp::Lte(_) | FilterOp::Lt(_)
        )
    }

    /// Returns the operation name for explain output
    pub fn op_name(&self) -> &'static str {
        match self {
            FilterOp::Eq(_) => "eq",
            FilterOp::Gte(_) => "gte",
            FilterOp::Gt(_) => "gt",
            FilterOp::Lte(_) => "lte",
            FilterOp::Lt(_) => "lt",
        }
    }
}

/// Match kind of a tree node
#[derive(Debug, Clone, PartialEq)]
pub enum MatchKind {
    /// Conjunction over children
    And,
    /// Disjunction over children
    Or,
    /// Array-scoped conjunction: children are evaluated against this
    /// node's field path prefix
    ElemMatch,
    /// Leaf comparison over this node's field
    Compare(FilterOp),
    /// Geo-nearest leaf; only a geospatial index can serve it
    GeoNear(Value),
}

impl MatchKind {
    /// Returns true for conjunction / disjunction nodes
    pub fn is_logical(&self) -> bool {
        matches!(self, MatchKind::And | MatchKind::Or)
    }

    /// Returns true for leaf predicates
    pub fn is_leaf(&self) -> bool {
        matches!(self, MatchKind::Compare(_) | MatchKind::GeoNear(_))
    }
}

/// A single node of the predicate tree
#[derive(Debug, Clone)]
pub struct MatchNode {
    kind: MatchKind,
    path: Option<String>,
    children: Vec<NodeId>,
    tag: Option<TagSlot>,
}

impl MatchNode {
    /// Match kind of this node
    pub fn kind(&self) -> &MatchKind {
        &self.kind
    }

    /// Dotted field path, if this node is bound to a field
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Child node ids, in query order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed predicate tree
#[derive(Debug, Clone, Default)]
pub struct MatchTree {
    nodes: Vec<MatchNode>,
    root: Option<NodeId>,
}

impl MatchTree {
    /// Creates an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    fn add_node(&mut self, kind: MatchKind, path: Option<String>, children: Vec<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(MatchNode {
            kind,
            path,
            children,
            tag: None,
        });
        id
    }

    /// Adds an equality leaf: `path = value`
    pub fn add_eq(&mut self, path: impl Into<String>, value: Value) -> NodeId {
        self.add_node(MatchKind::Compare(FilterOp::Eq(value)), Some(path.into()), Vec::new())
    }

    /// Adds a range leaf: `path >= value`
    pub fn add_gte(&mut self, path: impl Into<String>, value: Value) -> NodeId {
        self.add_node(MatchKind::Compare(FilterOp::Gte(value)), Some(path.into()), Vec::new())
    }

    /// Adds a range leaf: `path > value`
    pub fn add_gt(&mut self, path: impl Into<String>, value: Value) -> NodeId {
        self.add_node(MatchKind::Compare(FilterOp::Gt(value)), Some(path.into()), Vec::new())
    }

    /// Adds a range leaf: `path <= value`
    pub fn add_lte(&mut self, path: impl Into<String>, value: Value) -> NodeId {
        self.add_node(MatchKind::Compare(FilterOp::Lte(value)), Some(path.into()), Vec::new())
    }

    /// Adds a range leaf: `path < value`
    pub fn add_lt(&mut self, path: impl Into<String>, value: Value) -> NodeId {
        self.add_node(MatchKind::Compare(FilterOp::Lt(value)), Some(path.into()), Vec::new())
    }

    /// Adds a geo-nearest leaf over `path`
    pub fn add_geo_near(&mut self, path: impl Into<String>, query: Value) -> NodeId {
        self.add_node(MatchKind::GeoNear(query), Some(path.into()), Vec::new())
    }

    /// Adds a conjunction over `children`
    pub fn add_and(&mut self, children: Vec<NodeId>) -> NodeId {
        self.add_node(MatchKind::And, None, children)
    }

    /// Adds a disjunction over `children`
    pub fn add_or(&mut self, children: Vec<NodeId>) -> NodeId {
        self.add_node(MatchKind::Or, None, children)
    }

    /// Adds an array-scoped conjunction over `children`, evaluated against
    /// the array field at `path`
    pub fn add_elem_match(&mut self, path: impl Into<String>, children: Vec<NodeId>) -> NodeId {
        self.add_node(MatchKind::ElemMatch, Some(path.into()), children)
    }

    /// Marks `id` as the root of the tree
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Root node id, if one has been set
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Borrows a node by id
    pub fn node(&self, id: NodeId) -> &MatchNode {
        &self.nodes[id]
    }

    /// Number of nodes in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Child node ids of `id`, in query order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Installs a relevance tag on `id`, replacing any existing tag
    pub fn set_relevance_tag(&mut self, id: NodeId, tag: RelevanceTag) {
        self.nodes[id].tag = Some(TagSlot::Relevance(tag));
    }

    /// Borrows the relevance tag on `id`, if present
    pub fn relevance_tag(&self, id: NodeId) -> Option<&RelevanceTag> {
        match &self.nodes[id].tag {
            Some(TagSlot::Relevance(rt)) => Some(rt),
            _ => None,
        }
    }

    /// Consumes and returns the relevance tag on `id`, clearing the slot
    pub fn take_relevance_tag(&mut self, id: NodeId) -> Option<RelevanceTag> {
        match self.nodes[id].tag.take() {
            Some(TagSlot::Relevance(rt)) => Some(rt),
            other => {
                self.nodes[id].tag = other;
                None
            }
        }
    }

    /// Installs an index tag on `id`, replacing any existing tag
    pub fn set_index_tag(&mut self, id: NodeId, tag: IndexTag) {
        self.nodes[id].tag = Some(TagSlot::Index(tag));
    }

    /// Borrows the index tag on `id`, if present
    pub fn index_tag(&self, id: NodeId) -> Option<&IndexTag> {
        match &self.nodes[id].tag {
            Some(TagSlot::Index(it)) => Some(it),
            _ => None,
        }
    }

    /// Returns true if `id` carries an index tag
    pub fn has_index_tag(&self, id: NodeId) -> bool {
        self.index_tag(id).is_some()
    }

    /// Clears every tag slot in the tree
    pub fn reset_tags(&mut self) {
        for node in &mut self.nodes {
            node.tag = None;
        }
    }
}
