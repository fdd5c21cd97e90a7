//! Directory and file counts for the tree listing footer

use std::fmt;

use crate::fs::EntryKind;

/// Counts of entries shown below the root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub count_dir: usize,
    pub count_file: usize,
}

impl TreeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one visited, non-root entry. Links and special files count as
    /// files.
    pub fn record(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::Directory => self.count_dir += 1,
            EntryKind::File | EntryKind::Link | EntryKind::Special => self.count_file += 1,
        }
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} directories, {} files",
            self.count_dir, self.count_file
        )
    }
}
