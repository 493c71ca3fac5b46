//! dupecheck - duplicate file finder with a persistent hash cache.
//!
//! Scans one or more directory trees, hashes candidate files with BLAKE3
//! (consulting a cache keyed on size and mtime to skip unchanged files),
//! groups byte-identical files by digest, and reports each group as stable
//! `Dupe: "<a>" -> "<b>"` lines on stdout.

pub mod cache;
pub mod cli;
pub mod duplicates;
pub mod error;
pub mod exclude;
pub mod logging;
pub mod progress;
pub mod report;
pub mod scanner;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytesize::ByteSize;

use crate::cache::{Cache, DEFAULT_STORE_NAME};
use crate::cli::Cli;
use crate::duplicates::Grouper;
use crate::error::{ConfigError, ExitCode};
use crate::exclude::ExcludeList;
use crate::progress::Progress;
use crate::scanner::Walker;

/// Run one scan with the given CLI options.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let excludes = ExcludeList::new(&cli.exclude_rules()).map_err(ConfigError::from)?;
    let roots = resolve_roots(&cli.paths)?;
    let mut cache = open_cache(&cli)?;

    let walker = Walker::new(roots, excludes);
    let mut progress = Progress::new(cli.progress && !cli.quiet);
    let mut grouper = Grouper::new();
    for file in walker.walk(&mut cache) {
        progress.observe(&file.path, file.size);
        grouper.insert(file);
    }
    progress.finish();

    let stats = cache.stats();
    if let Err(e) = cache.save() {
        log::warn!("cache not saved: {e}");
    }

    let groups = grouper.into_groups();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::write_pairs(&mut out, &groups).context("writing duplicate report")?;
    out.flush().context("flushing duplicate report")?;

    log::info!(
        "scanned {} files, hashed {} ({} cache hits), {} duplicate groups",
        stats.hits + stats.misses,
        ByteSize(stats.bytes_hashed),
        stats.hits,
        groups.len()
    );
    Ok(ExitCode::Success)
}

/// Canonicalize the requested roots, defaulting to the current directory.
///
/// A root that cannot be resolved is skipped with a warning; having none
/// left is fatal, since nothing could be scanned at all.
fn resolve_roots(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ConfigError> {
    let requested: Vec<PathBuf> = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths.to_vec()
    };

    let mut roots = Vec::with_capacity(requested.len());
    for path in &requested {
        match fs::canonicalize(path) {
            Ok(root) => roots.push(root),
            Err(e) => log::warn!("ignoring unusable root {}: {}", path.display(), e),
        }
    }

    if roots.is_empty() {
        return Err(ConfigError::NoUsableRoot {
            tried: requested.len(),
        });
    }
    Ok(roots)
}

/// Resolve the cache store path and load it.
///
/// An explicitly requested store that exists but cannot be opened aborts
/// the run; the default store path always degrades to a fresh cache.
fn open_cache(cli: &Cli) -> Result<Cache, ConfigError> {
    if cli.no_cache {
        return Ok(Cache::disabled());
    }

    match &cli.cache {
        Some(path) => {
            let store = if path.is_dir() {
                path.join(DEFAULT_STORE_NAME)
            } else {
                path.clone()
            };
            if store.exists() {
                if let Err(source) = fs::File::open(&store) {
                    return Err(ConfigError::BadCachePath { path: store, source });
                }
            }
            Ok(Cache::load(&store))
        }
        None => Ok(Cache::load(Path::new(DEFAULT_STORE_NAME))),
    }
}
