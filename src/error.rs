//! Exit codes and pre-scan configuration errors.

use std::path::PathBuf;

use crate::exclude::ExcludeError;

/// Exit codes for the dupecheck binary.
///
/// - 0: scan completed, with or without duplicates
/// - 1: unexpected fatal error
/// - 2: configuration error, reported before any scanning began
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Scan completed normally.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// Invalid configuration (bad exclude pattern, no usable root,
    /// unusable explicit cache path).
    ConfigError = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Errors that abort the run before scanning begins.
///
/// Everything else degrades: per-entry failures skip the entry, cache
/// failures fall back to hashing, and a failed save still reports the
/// duplicates already found.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// None of the requested roots could be resolved.
    #[error("no usable scan root among the {tried} requested")]
    NoUsableRoot {
        /// How many roots were requested
        tried: usize,
    },

    /// An explicitly requested cache store exists but cannot be opened.
    #[error("cache store {path} is not usable: {source}")]
    BadCachePath {
        /// The requested store path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An exclude rule failed to compile.
    #[error(transparent)]
    Exclude(#[from] ExcludeError),
}
