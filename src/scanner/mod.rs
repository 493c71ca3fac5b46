//! Directory traversal and file hashing.
//!
//! The scanner is divided into submodules:
//! - [`walker`]: single-threaded directory traversal with exclusion pruning
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//!
//! The walker consults the exclude rules before descending into any
//! directory and resolves every surviving regular file to a content digest
//! through the cache, yielding a stream of [`ScannedFile`] values for the
//! duplicate grouper to consume.

pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};

pub use hasher::{hash_file, hash_to_hex, hex_to_hash, Hash};
pub use walker::Walker;

/// A regular file that survived exclusion, with its content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Canonical absolute path; this is the cache identity.
    pub path: PathBuf,
    /// File size in bytes at scan time.
    pub size: u64,
    /// BLAKE3 digest of the full content.
    pub digest: Hash,
}

/// Errors that can occur while hashing a file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    pub(crate) fn from_io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}
