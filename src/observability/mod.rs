//! Observability subsystem for nimbus-planner
//!
//! Structured trace logging for the plan enumerator's diagnostic channel.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on planning
//! 3. No async or background threads
//! 4. Deterministic output
//! 5. Advisory: silencing the channel never changes plan output

mod logger;

pub use logger::{Logger, Severity};
