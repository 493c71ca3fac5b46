//! Single-threaded directory walker with exclusion pruning.
//!
//! # Overview
//!
//! The [`Walker`] performs an iterative traversal of each root path (via
//! `walkdir`, so arbitrarily deep trees never exhaust the call stack) and
//! consults the exclude rules *before* descending: an excluded directory is
//! pruned, never listed, which keeps the scan from wasting I/O under `.git`
//! and friends.
//!
//! Symbolic links are not followed - a link is neither traversed as a
//! directory nor hashed as its target. Sockets, devices, and FIFOs are
//! skipped silently. Per-entry I/O failures (permission denied, vanished
//! file) are logged and skip that entry only.
//!
//! Directory entries are walked in file-name order, so traversal is
//! deterministic for identical trees.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::hasher::{self, Hash};
use super::{HashError, ScannedFile};
use crate::cache::Cache;
use crate::exclude::ExcludeList;

/// Digest implementation plugged into the cache on lookup misses.
pub type DigestFn = fn(&Path) -> Result<Hash, HashError>;

/// Walks root paths and resolves every surviving regular file to its
/// content digest through the cache.
#[derive(Debug)]
pub struct Walker {
    roots: Vec<PathBuf>,
    excludes: ExcludeList,
    digest_fn: DigestFn,
}

impl Walker {
    /// Create a walker over the given roots. Roots are expected to be
    /// canonical absolute paths, so every yielded identity is too.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, excludes: ExcludeList) -> Self {
        Self {
            roots,
            excludes,
            digest_fn: hasher::hash_file,
        }
    }

    /// Substitute the digest implementation.
    #[must_use]
    pub fn with_digest_fn(mut self, digest_fn: DigestFn) -> Self {
        self.digest_fn = digest_fn;
        self
    }

    /// Walk all roots, yielding scanned files lazily in traversal order.
    ///
    /// The cache is exclusively borrowed for the duration of the walk;
    /// grouping happens downstream once the iterator is exhausted.
    pub fn walk<'a>(&'a self, cache: &'a mut Cache) -> impl Iterator<Item = ScannedFile> + 'a {
        self.roots
            .iter()
            .flat_map(move |root| {
                WalkDir::new(root)
                    .follow_links(false)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_entry(move |entry| {
                        !self
                            .excludes
                            .is_excluded(entry.path(), entry.file_type().is_dir())
                    })
            })
            .filter_map(move |entry| self.process_entry(entry, cache))
    }

    fn process_entry(
        &self,
        entry: walkdir::Result<DirEntry>,
        cache: &mut Cache,
    ) -> Option<ScannedFile> {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map_or_else(|| PathBuf::from("<unknown>"), Path::to_path_buf);
                log::warn!("skipping unreadable entry {}: {}", path.display(), e);
                return None;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            return None;
        }
        if file_type.is_symlink() {
            log::trace!("skipping symlink: {}", entry.path().display());
            return None;
        }
        if !file_type.is_file() {
            // Sockets, devices, FIFOs
            log::trace!("skipping non-regular entry: {}", entry.path().display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("cannot stat {}: {}", entry.path().display(), e);
                return None;
            }
        };
        let modified = match metadata.modified() {
            Ok(modified) => modified,
            Err(e) => {
                log::warn!(
                    "no modification time for {}: {}",
                    entry.path().display(),
                    e
                );
                return None;
            }
        };

        let size = metadata.len();
        match cache.lookup_or_compute(entry.path(), size, modified, self.digest_fn) {
            Ok(digest) => Some(ScannedFile {
                path: entry.into_path(),
                size,
                digest,
            }),
            Err(e) => {
                log::warn!("cannot hash: {e}");
                None
            }
        }
    }
}
