//! Digest-keyed duplicate grouping.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::scanner::{Hash, ScannedFile};

/// Accumulates scanned files into digest buckets.
///
/// Grouping is two-pass by design: every entry must be seen before any
/// group is known complete, so groups are only emitted once the scan
/// iterator is exhausted.
#[derive(Debug, Default)]
pub struct Grouper {
    by_digest: BTreeMap<Hash, BTreeSet<PathBuf>>,
}

impl Grouper {
    /// Create an empty grouper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one scanned file. Re-inserting the same identity (e.g. from
    /// overlapping roots) is a no-op.
    pub fn insert(&mut self, file: ScannedFile) {
        self.by_digest.entry(file.digest).or_default().insert(file.path);
    }

    /// Finish grouping: every digest shared by two or more identities
    /// becomes a [`DuplicateGroup`].
    ///
    /// Paths within a group are lexicographically sorted and groups are
    /// ordered by their first path, so identical input always produces
    /// identical output - required for the shell-pipeline contract.
    #[must_use]
    pub fn into_groups(self) -> Vec<DuplicateGroup> {
        let mut groups: Vec<DuplicateGroup> = self
            .by_digest
            .into_iter()
            .filter(|(_, paths)| paths.len() >= 2)
            .map(|(digest, paths)| DuplicateGroup {
                digest,
                paths: paths.into_iter().collect(),
            })
            .collect();
        groups.sort_by(|a, b| a.paths[0].cmp(&b.paths[0]));
        groups
    }
}

/// Files sharing one content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// The shared content digest.
    pub digest: Hash,
    /// Member identities, lexicographically sorted. Always at least two.
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Consecutive pairs over the sorted members: an n-file group reports
    /// n-1 pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.paths.windows(2).map(|w| (w[0].as_path(), w[1].as_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanned(path: &str, digest: Hash) -> ScannedFile {
        ScannedFile {
            path: PathBuf::from(path),
            size: 1,
            digest,
        }
    }

    #[test]
    fn test_singletons_are_not_groups() {
        let mut grouper = Grouper::new();
        grouper.insert(scanned("/a", [1; 32]));
        grouper.insert(scanned("/b", [2; 32]));

        assert!(grouper.into_groups().is_empty());
    }

    #[test]
    fn test_groups_form_regardless_of_insertion_order() {
        let mut forward = Grouper::new();
        forward.insert(scanned("/a", [1; 32]));
        forward.insert(scanned("/b", [1; 32]));

        let mut reverse = Grouper::new();
        reverse.insert(scanned("/b", [1; 32]));
        reverse.insert(scanned("/a", [1; 32]));

        assert_eq!(forward.into_groups(), reverse.into_groups());
    }

    #[test]
    fn test_paths_sorted_within_group() {
        let mut grouper = Grouper::new();
        grouper.insert(scanned("/z", [5; 32]));
        grouper.insert(scanned("/m", [5; 32]));
        grouper.insert(scanned("/a", [5; 32]));

        let groups = grouper.into_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].paths,
            vec![PathBuf::from("/a"), PathBuf::from("/m"), PathBuf::from("/z")]
        );
    }

    #[test]
    fn test_groups_ordered_by_first_path() {
        let mut grouper = Grouper::new();
        grouper.insert(scanned("/x/1", [9; 32]));
        grouper.insert(scanned("/x/2", [9; 32]));
        grouper.insert(scanned("/a/1", [3; 32]));
        grouper.insert(scanned("/a/2", [3; 32]));

        let groups = grouper.into_groups();
        assert_eq!(groups[0].paths[0], PathBuf::from("/a/1"));
        assert_eq!(groups[1].paths[0], PathBuf::from("/x/1"));
    }

    #[test]
    fn test_duplicate_identity_dedupes() {
        let mut grouper = Grouper::new();
        grouper.insert(scanned("/a", [1; 32]));
        grouper.insert(scanned("/a", [1; 32]));

        assert!(grouper.into_groups().is_empty());
    }

    #[test]
    fn test_pairs_are_consecutive() {
        let group = DuplicateGroup {
            digest: [0; 32],
            paths: vec![PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")],
        };

        let pairs: Vec<(&Path, &Path)> = group.pairs().collect();
        assert_eq!(
            pairs,
            vec![
                (Path::new("/a"), Path::new("/b")),
                (Path::new("/b"), Path::new("/c")),
            ]
        );
    }
}
