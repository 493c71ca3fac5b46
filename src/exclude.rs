//! Exclude rule matching.
//!
//! An [`ExcludeList`] evaluates a filesystem entry against directory-name,
//! directory-glob, path-glob, file-name, and file-glob rules with OR
//! semantics: any match excludes the entry. Directory rules apply to every
//! path segment, so an excluded directory removes its entire subtree when
//! the walker prunes on it.
//!
//! Glob patterns support `*`, `?`, and `[...]`. An empty pattern matches
//! nothing, never everything.

use std::ffi::OsStr;
use std::path::{Component, Path};

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use thiserror::Error;

/// A single exclusion predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExcludeRule {
    /// Exclude entries under directories with this exact name.
    DirName(String),
    /// Exclude entries under directories whose name matches this glob.
    DirGlob(String),
    /// Exclude entries whose full path matches this glob.
    PathGlob(String),
    /// Exclude files with this exact name.
    FileName(String),
    /// Exclude files whose name matches this glob.
    FileGlob(String),
}

/// Errors from building an exclude list.
#[derive(Debug, Error)]
pub enum ExcludeError {
    /// A glob pattern failed to compile.
    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern as given on the command line
        pattern: String,
        /// The underlying glob error
        #[source]
        source: globset::Error,
    },
}

/// Compiled set of exclude rules.
#[derive(Debug)]
pub struct ExcludeList {
    dir_names: Vec<String>,
    file_names: Vec<String>,
    dir_globs: GlobSet,
    path_globs: GlobSet,
    file_globs: GlobSet,
}

impl ExcludeList {
    /// Compile a rule set. Empty patterns are dropped (they match nothing);
    /// an invalid glob is a configuration error.
    pub fn new(rules: &[ExcludeRule]) -> Result<Self, ExcludeError> {
        let mut dir_names = Vec::new();
        let mut file_names = Vec::new();
        let mut dir_globs = GlobSetBuilder::new();
        let mut path_globs = GlobSetBuilder::new();
        let mut file_globs = GlobSetBuilder::new();

        for rule in rules {
            match rule {
                ExcludeRule::DirName(name) if !name.is_empty() => {
                    dir_names.push(name.clone());
                }
                ExcludeRule::FileName(name) if !name.is_empty() => {
                    file_names.push(name.clone());
                }
                ExcludeRule::DirGlob(pattern) if !pattern.is_empty() => {
                    dir_globs.add(compile_glob(pattern)?);
                }
                ExcludeRule::PathGlob(pattern) if !pattern.is_empty() => {
                    path_globs.add(compile_glob(pattern)?);
                }
                ExcludeRule::FileGlob(pattern) if !pattern.is_empty() => {
                    file_globs.add(compile_glob(pattern)?);
                }
                _ => log::debug!("ignoring empty exclude pattern"),
            }
        }

        Ok(Self {
            dir_names,
            file_names,
            dir_globs: build_set(dir_globs)?,
            path_globs: build_set(path_globs)?,
            file_globs: build_set(file_globs)?,
        })
    }

    /// The built-in rule set: `.git` and `.svn` directories.
    #[must_use]
    pub fn default_rules() -> Vec<ExcludeRule> {
        vec![
            ExcludeRule::DirName(".git".to_string()),
            ExcludeRule::DirName(".svn".to_string()),
        ]
    }

    /// Whether `path` matches any rule.
    ///
    /// File-level rules apply only when the entry is a regular file;
    /// directory rules are checked against every path segment, so the
    /// walker can prune an excluded directory before descending.
    #[must_use]
    pub fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        if !is_dir {
            if let Some(name) = path.file_name() {
                if self.file_names.iter().any(|f| name_matches(name, f)) {
                    return true;
                }
                if self.file_globs.is_match(Path::new(name)) {
                    return true;
                }
            }
        }

        if self.path_globs.is_match(path) {
            return true;
        }

        path.components().any(|component| match component {
            Component::Normal(segment) => {
                self.dir_names.iter().any(|d| name_matches(segment, d))
                    || self.dir_globs.is_match(Path::new(segment))
            }
            _ => false,
        })
    }
}

/// Compare a path segment against an exact rule name, case-insensitively
/// on Windows.
fn name_matches(segment: &OsStr, rule_name: &str) -> bool {
    match segment.to_str() {
        Some(s) if cfg!(windows) => s.eq_ignore_ascii_case(rule_name),
        Some(s) => s == rule_name,
        None => false,
    }
}

fn compile_glob(pattern: &str) -> Result<Glob, ExcludeError> {
    GlobBuilder::new(pattern)
        .case_insensitive(cfg!(windows))
        .build()
        .map_err(|source| ExcludeError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn build_set(builder: GlobSetBuilder) -> Result<GlobSet, ExcludeError> {
    builder.build().map_err(|source| ExcludeError::InvalidPattern {
        pattern: String::new(),
        source,
    })
}
