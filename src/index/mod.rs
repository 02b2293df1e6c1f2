//! Index catalog subsystem for nimbus-planner
//!
//! The planner consumes a read-only catalog describing the indexes
//! available on a collection. An index is identified by its position in
//! the catalog; its key pattern is the ordered list of field paths
//! forming the composite key.
//!
//! # Design Principles
//!
//! - Read-only: the catalog never changes while a plan is enumerated
//! - Positional: an index id is its offset in the catalog
//! - Declarative: entries describe shape (key pattern, multikey), not
//!   runtime index state

mod catalog;

pub use catalog::{IndexCatalog, IndexEntry, IndexId};
