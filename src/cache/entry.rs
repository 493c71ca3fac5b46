//! Cache record definitions.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::scanner::hasher::{self, Hash};

/// What the cache knows about one file.
///
/// The identity (canonical absolute path) is the store key; the record
/// carries the stat values observed when the digest was computed. The
/// digest is trusted only while both still match the filesystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// File size in bytes at hashing time.
    pub size: u64,
    /// Last modification time at hashing time, platform-native precision.
    pub modified: SystemTime,
    /// BLAKE3 digest of the full content, stored as lowercase hex.
    #[serde(with = "hasher::serde_hex")]
    pub digest: Hash,
}

impl CacheEntry {
    /// Create a new record.
    #[must_use]
    pub fn new(size: u64, modified: SystemTime, digest: Hash) -> Self {
        Self {
            size,
            modified,
            digest,
        }
    }

    /// Whether the stored digest is still valid for these stat values.
    #[must_use]
    pub fn is_current(&self, size: u64, modified: SystemTime) -> bool {
        self.size == size && self.modified == modified
    }
}
