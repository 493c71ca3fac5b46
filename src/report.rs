//! Duplicate report output.
//!
//! The report stream is a stable contract for downstream parsing: one
//! `Dupe: "<path-a>" -> "<path-b>"` line per pair, absolute paths,
//! embedded double quotes escaped. Nothing else may be written to it;
//! progress and diagnostics belong on stderr.

use std::io::{self, Write};
use std::path::Path;

use crate::duplicates::DuplicateGroup;

/// Write every pair of every group to `out`.
pub fn write_pairs<W: Write>(out: &mut W, groups: &[DuplicateGroup]) -> io::Result<()> {
    for group in groups {
        for (a, b) in group.pairs() {
            writeln!(out, "Dupe: \"{}\" -> \"{}\"", escape_path(a), escape_path(b))?;
        }
    }
    Ok(())
}

/// Escape embedded double quotes so report lines stay parseable.
#[must_use]
pub fn escape_path(path: &Path) -> String {
    path.display().to_string().replace('"', "\\\"")
}
