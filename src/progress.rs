//! Live scan progress on stderr.
//!
//! A single spinner showing the running file count, bytes seen, and the
//! path currently being examined. indicatif draws to stderr, so the
//! duplicate report on stdout never picks up control sequences.

use std::path::Path;
use std::time::Duration;

use bytesize::ByteSize;
use indicatif::{ProgressBar, ProgressStyle};

/// Optional progress spinner for one scan.
pub struct Progress {
    bar: Option<ProgressBar>,
    bytes_seen: u64,
}

impl Progress {
    /// Create a progress reporter. When `enabled` is false all methods are
    /// no-ops, which keeps the call sites unconditional.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self {
                bar: None,
                bytes_seen: 0,
            };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {pos} files  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self {
            bar: Some(bar),
            bytes_seen: 0,
        }
    }

    /// Record one scanned file.
    pub fn observe(&mut self, path: &Path, size: u64) {
        self.bytes_seen += size;
        if let Some(bar) = &self.bar {
            bar.inc(1);
            bar.set_message(format!("{}  {}", ByteSize(self.bytes_seen), path.display()));
        }
    }

    /// Clear the spinner so nothing is left on the terminal.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
