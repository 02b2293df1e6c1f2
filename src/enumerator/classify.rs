//! Node classification
//!
//! Pure predicates over tree nodes that drive the build dispatch: a node
//! is either indexable on its own field, an array-scoped operator whose
//! children are indexed under a path prefix, or a generic logical node.

use crate::matcher::{MatchKind, MatchNode};

/// Returns true if `node` is a leaf predicate that an index on its own
/// field could serve (comparison or geo-nearest, with a non-empty path).
pub(crate) fn can_use_index_on_own_field(node: &MatchNode) -> bool {
    node.kind().is_leaf() && node.path().is_some_and(|p| !p.is_empty())
}

/// Returns true if `node` scopes its children to an array field, so index
/// use inside it is relative to the node's path prefix.
pub(crate) fn array_uses_index_on_children(node: &MatchNode) -> bool {
    matches!(node.kind(), MatchKind::ElemMatch)
}

/// Returns true for generic conjunction / disjunction nodes.
pub(crate) fn is_logical(node: &MatchNode) -> bool {
    node.kind().is_logical()
}
