//! Duplicate grouping.
//!
//! Consumes the scanner's output in full - a file seen last could belong
//! to any earlier group - and emits deterministic [`DuplicateGroup`]s.

pub mod grouper;

pub use grouper::{DuplicateGroup, Grouper};
