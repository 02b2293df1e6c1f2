//! Predicate tree input model for nimbus-planner
//!
//! A query's filter is a boolean tree over document fields: leaves compare
//! a dotted field path against a value, interior nodes are conjunctions,
//! disjunctions, or array-scoped operators. The tree is an arena; nodes
//! are addressed by `NodeId`, which is stable across clones.
//!
//! Each node carries a single tag slot. The relevance tagger fills it with
//! a [`RelevanceTag`] before enumeration; the enumerator replaces it with
//! an [`IndexTag`] on the trees it emits.

mod expr;
mod tags;

pub use expr::{FilterOp, MatchKind, MatchNode, MatchTree, NodeId};
pub use tags::{IndexTag, RelevanceTag, TagSlot};
