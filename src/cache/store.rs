//! Persistent digest store with atomic save.
//!
//! The store is a JSON file: a schema version marker plus a map from
//! canonical absolute path to [`CacheEntry`]. Loading fails softly - an
//! absent, unreadable, corrupt, or version-incompatible store yields an
//! empty cache and a warning, never an aborted scan. Saving writes a
//! sibling temp file and renames it over the store, so an interrupted
//! save leaves the previous state intact.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CacheEntry;
use crate::scanner::{Hash, HashError};

/// Current on-disk schema version. A store carrying any other version is
/// treated as absent and triggers a full rescan.
pub const SCHEMA_VERSION: u32 = 1;

/// Default store file name, created in the working directory.
pub const DEFAULT_STORE_NAME: &str = ".dupecache";

/// Errors from cache persistence.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The store file could not be read.
    #[error("cannot read cache store {path}: {source}")]
    Read {
        /// Store path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The store file could not be written or renamed into place.
    #[error("cannot write cache store {path}: {source}")]
    Write {
        /// Store or temp path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The store content is not a well-formed cache file.
    #[error("malformed cache store: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The store carries an incompatible schema version.
    #[error("cache store has incompatible version {found} (expected {SCHEMA_VERSION})")]
    Version {
        /// Version found in the store file
        found: u32,
    },
}

/// Serialized shape of the store file.
#[derive(Deserialize)]
struct StoreFile {
    version: u32,
    entries: BTreeMap<PathBuf, CacheEntry>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    entries: &'a BTreeMap<PathBuf, CacheEntry>,
}

/// Lookup counters for one run.
#[derive(Debug, Default, Clone, Copy)]
pub struct CacheStats {
    /// Lookups answered from the cache without reading file content.
    pub hits: u64,
    /// Lookups that had to hash the file.
    pub misses: u64,
    /// Bytes of file content hashed (misses only).
    pub bytes_hashed: u64,
}

/// In-memory cache of file digests, keyed by canonical absolute path.
///
/// Exclusively owned by one run: loaded once at start, mutated as files
/// are scanned, written back once at the end. No locking is provided
/// against concurrent runs sharing a store path; the last writer wins.
#[derive(Debug)]
pub struct Cache {
    entries: BTreeMap<PathBuf, CacheEntry>,
    store_path: Option<PathBuf>,
    stats: CacheStats,
}

impl Cache {
    /// A cache that never persists and never remembers: every lookup
    /// computes a fresh digest.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            entries: BTreeMap::new(),
            store_path: None,
            stats: CacheStats::default(),
        }
    }

    /// Load the store at `path`, degrading to an empty cache on any failure.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let entries = match read_store(path) {
            Ok(Some(entries)) => {
                log::debug!("loaded {} cache entries from {}", entries.len(), path.display());
                entries
            }
            Ok(None) => {
                log::debug!("no cache store at {}", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                log::warn!("ignoring unusable cache store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self {
            entries,
            store_path: Some(path.to_path_buf()),
            stats: CacheStats::default(),
        }
    }

    /// Return the stored digest if the record for `path` matches the given
    /// stat values; otherwise compute a fresh digest via `digest_fn` and
    /// replace the record.
    ///
    /// This is the central optimization: repeated runs over an unchanged
    /// tree perform zero content reads.
    pub fn lookup_or_compute<F>(
        &mut self,
        path: &Path,
        size: u64,
        modified: SystemTime,
        digest_fn: F,
    ) -> Result<Hash, HashError>
    where
        F: FnOnce(&Path) -> Result<Hash, HashError>,
    {
        if self.store_path.is_some() {
            if let Some(entry) = self.entries.get(path) {
                if entry.is_current(size, modified) {
                    self.stats.hits += 1;
                    return Ok(entry.digest);
                }
            }
        }

        let digest = digest_fn(path)?;
        self.stats.misses += 1;
        self.stats.bytes_hashed += size;
        if self.store_path.is_some() {
            self.entries
                .insert(path.to_path_buf(), CacheEntry::new(size, modified, digest));
        }
        Ok(digest)
    }

    /// Persist the current records.
    ///
    /// Records whose path no longer names a regular file are dropped first:
    /// the cache only remembers what was last observed to exist. The write
    /// goes to a sibling temp file followed by a rename, so a crash during
    /// save never corrupts the previous store. No-op when disabled.
    pub fn save(&mut self) -> Result<(), CacheError> {
        let Some(store_path) = self.store_path.clone() else {
            return Ok(());
        };

        self.entries.retain(|path, _| {
            fs::symlink_metadata(path)
                .map(|m| m.is_file())
                .unwrap_or(false)
        });

        let json = serde_json::to_string(&StoreFileRef {
            version: SCHEMA_VERSION,
            entries: &self.entries,
        })?;

        let tmp_path = tmp_sibling(&store_path);
        fs::write(&tmp_path, json).map_err(|source| CacheError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&tmp_path, &store_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(CacheError::Write {
                path: store_path,
                source,
            });
        }

        log::debug!(
            "saved {} cache entries to {}",
            self.entries.len(),
            store_path.display()
        );
        Ok(())
    }

    /// Lookup counters accumulated so far in this run.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read and validate a store file. `Ok(None)` means the store is absent.
fn read_store(path: &Path) -> Result<Option<BTreeMap<PathBuf, CacheEntry>>, CacheError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CacheError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let store: StoreFile = serde_json::from_str(&content)?;
    if store.version != SCHEMA_VERSION {
        return Err(CacheError::Version {
            found: store.version,
        });
    }
    Ok(Some(store.entries))
}

/// `<store>.tmp` next to the store, so the final rename stays on one
/// filesystem.
fn tmp_sibling(store_path: &Path) -> PathBuf {
    let mut name = store_path
        .file_name()
        .map_or_else(|| OsString::from(DEFAULT_STORE_NAME), |n| n.to_os_string());
    name.push(".tmp");
    store_path.with_file_name(name)
}
