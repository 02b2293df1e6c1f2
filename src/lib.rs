//! nimbus-planner - index-aware query plan enumeration for NimbusDB
//!
//! Given a predicate tree whose leaves carry index relevance annotations
//! and a catalog of available indexes, the enumerator produces tagged
//! trees assigning leaf predicates to index key columns.

pub mod enumerator;
pub mod index;
pub mod matcher;
pub mod observability;
