//! Plan enumeration subsystem for nimbus-planner
//!
//! Given a predicate tree whose leaves carry relevance tags and a
//! read-only index catalog, the enumerator memoizes the tree into a DAG
//! of choices and emits tagged trees labelling each leaf with "use index
//! I at key column P".
//!
//! # Design Principles
//!
//! - Deterministic: same tree and catalog, same plan
//! - Synchronous: no I/O, no blocking, no background work
//! - Borrowing: the tree's tag slots are the only state mutated
//!
//! # Flow
//!
//! build (`init`) → memo store; memo + cursor → tagger; tagged tree →
//! compound completion; `get_next` hands out a tagged clone.

mod classify;
mod compound;
mod enumerator;
mod errors;
mod explain;
mod memo;

pub use enumerator::PlanEnumerator;
pub use errors::{EnumeratorError, EnumeratorResult};
pub use explain::{AssignmentExplain, MemoExplain};
pub use memo::{MemoEntry, MemoId, MemoStore};
