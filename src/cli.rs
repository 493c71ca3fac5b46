//! Command-line interface definitions.
//!
//! All CLI arguments are defined here using the clap derive API. Exclude
//! flags are repeatable and combine with OR semantics; the built-in
//! `.git`/`.svn` rules stay active unless `--no-default-exclude` is given.
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory
//! dupecheck
//!
//! # Scan two trees, progress on stderr, report on stdout
//! dupecheck -p ~/photos ~/backup | sort
//!
//! # Ignore generated artifacts, keep no cache
//! dupecheck --no-cache --x-dir-glob 'build*' --x-file-glob '*.tmp' ~/src
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::exclude::{ExcludeList, ExcludeRule};

/// Find byte-identical files under one or more directory trees.
///
/// Results go to stdout as stable `Dupe: "<a>" -> "<b>"` lines; progress
/// and diagnostics stay on stderr so the report remains pipeable. A cache
/// of file digests keyed on size and mtime makes repeated runs over an
/// unchanged tree skip all content reads.
#[derive(Debug, Parser)]
#[command(name = "dupecheck")]
#[command(author, version, about)]
pub struct Cli {
    /// Directories to scan for duplicates (default: current directory)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Cache store path (a directory is resolved to DIR/.dupecache)
    #[arg(long, value_name = "PATH", conflicts_with = "no_cache")]
    pub cache: Option<PathBuf>,

    /// Do not load or save a cache store
    #[arg(long)]
    pub no_cache: bool,

    /// Exclude entries under directories named NAME (repeatable)
    #[arg(short = 'x', long = "x-dir", value_name = "NAME")]
    pub x_dir: Vec<String>,

    /// Exclude entries under directories matching GLOB (repeatable)
    #[arg(long = "x-dir-glob", value_name = "GLOB")]
    pub x_dir_glob: Vec<String>,

    /// Exclude entries whose full path matches GLOB (repeatable)
    #[arg(long = "x-path-glob", value_name = "GLOB")]
    pub x_path_glob: Vec<String>,

    /// Exclude files named FILE (repeatable)
    #[arg(long = "x-file", value_name = "FILE")]
    pub x_file: Vec<String>,

    /// Exclude files whose name matches GLOB (repeatable)
    #[arg(long = "x-file-glob", value_name = "GLOB")]
    pub x_file_glob: Vec<String>,

    /// Do not add the built-in excludes (.git and .svn directories)
    #[arg(long)]
    pub no_default_exclude: bool,

    /// Show live progress on stderr
    #[arg(short, long)]
    pub progress: bool,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all diagnostics except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Collect the configured exclude rules, built-in rules included
    /// unless disabled.
    #[must_use]
    pub fn exclude_rules(&self) -> Vec<ExcludeRule> {
        let mut rules = if self.no_default_exclude {
            Vec::new()
        } else {
            ExcludeList::default_rules()
        };
        rules.extend(self.x_dir.iter().cloned().map(ExcludeRule::DirName));
        rules.extend(self.x_dir_glob.iter().cloned().map(ExcludeRule::DirGlob));
        rules.extend(self.x_path_glob.iter().cloned().map(ExcludeRule::PathGlob));
        rules.extend(self.x_file.iter().cloned().map(ExcludeRule::FileName));
        rules.extend(self.x_file_glob.iter().cloned().map(ExcludeRule::FileGlob));
        rules
    }
}
