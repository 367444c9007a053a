//! Line-change statistics
//!
//! Per-file records and the per-area aggregate produced by one pass.
//! Everything here is built fresh on every refresh and never mutated
//! afterwards.

use std::fmt;

/// Classification of a changed file within one area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Added in this area (or untracked)
    New,
    /// Modified, or any state that is neither added nor deleted
    Mod,
    /// Deleted in this area
    Del,
}

impl FileStatus {
    /// Short label used in the details listing
    pub fn label(self) -> &'static str {
        match self {
            FileStatus::New => "New",
            FileStatus::Mod => "Mod",
            FileStatus::Del => "Del",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stats for a single changed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Repository-relative path
    pub path: String,
    /// Lines added
    pub lines_added: usize,
    /// Lines deleted
    pub lines_deleted: usize,
    /// Classification at the time of the pass
    pub status: FileStatus,
    /// Current total line count of the file content (0 if unresolvable)
    pub total_lines: usize,
}

impl FileChange {
    /// Added minus deleted; may be negative
    pub fn net_lines(&self) -> i64 {
        self.lines_added as i64 - self.lines_deleted as i64
    }

    /// Final path segment
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Added/deleted sums for one area (or both combined)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delta {
    pub added: usize,
    pub deleted: usize,
}

impl Delta {
    pub fn net(self) -> i64 {
        self.added as i64 - self.deleted as i64
    }

    fn sum(files: &[FileChange]) -> Self {
        Self {
            added: files.iter().map(|f| f.lines_added).sum(),
            deleted: files.iter().map(|f| f.lines_deleted).sum(),
        }
    }
}

/// Aggregate result of one pass over staged and unstaged changes
///
/// The sums are computed once from the file lists when the value is built,
/// so they always agree with the files they describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStats {
    staged: Delta,
    changes: Delta,
    staged_files: Vec<FileChange>,
    changes_files: Vec<FileChange>,
}

impl LineStats {
    /// Build the aggregate, sorting both file lists by net lines descending
    pub fn new(mut staged_files: Vec<FileChange>, mut changes_files: Vec<FileChange>) -> Self {
        sort_by_net(&mut staged_files);
        sort_by_net(&mut changes_files);

        Self {
            staged: Delta::sum(&staged_files),
            changes: Delta::sum(&changes_files),
            staged_files,
            changes_files,
        }
    }

    /// Index vs HEAD
    pub fn staged(&self) -> Delta {
        self.staged
    }

    /// Working tree vs index, untracked files included
    pub fn changes(&self) -> Delta {
        self.changes
    }

    /// Both areas summed
    pub fn total(&self) -> Delta {
        Delta {
            added: self.staged.added + self.changes.added,
            deleted: self.staged.deleted + self.changes.deleted,
        }
    }

    pub fn staged_files(&self) -> &[FileChange] {
        &self.staged_files
    }

    pub fn changes_files(&self) -> &[FileChange] {
        &self.changes_files
    }
}

/// Stable sort, largest net first
fn sort_by_net(files: &mut [FileChange]) {
    files.sort_by(|a, b| b.net_lines().cmp(&a.net_lines()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(path: &str, added: usize, deleted: usize) -> FileChange {
        FileChange {
            path: path.to_string(),
            lines_added: added,
            lines_deleted: deleted,
            status: FileStatus::Mod,
            total_lines: 0,
        }
    }

    #[test]
    fn test_net_lines() {
        assert_eq!(change("a", 15, 5).net_lines(), 10);
        assert_eq!(change("a", 2, 9).net_lines(), -7);
        assert_eq!(change("a", 0, 0).net_lines(), 0);
    }

    #[test]
    fn test_file_name_is_last_segment() {
        assert_eq!(change("src/git/mod.rs", 0, 0).file_name(), "mod.rs");
        assert_eq!(change("README.md", 0, 0).file_name(), "README.md");
    }

    #[test]
    fn test_sums_match_files() {
        let stats = LineStats::new(
            vec![change("a", 5, 3), change("b", 1, 0)],
            vec![change("c", 10, 2), change("d", 0, 4), change("e", 7, 7)],
        );

        assert_eq!(stats.staged(), Delta { added: 6, deleted: 3 });
        assert_eq!(stats.changes(), Delta { added: 17, deleted: 13 });
        assert_eq!(stats.total(), Delta { added: 23, deleted: 16 });
        assert_eq!(stats.total().net(), stats.staged().net() + stats.changes().net());

        let added: usize = stats.changes_files().iter().map(|f| f.lines_added).sum();
        assert_eq!(stats.changes().added, added);
    }

    #[test]
    fn test_sorted_descending_and_stable() {
        let stats = LineStats::new(
            Vec::new(),
            vec![
                change("first", 3, 1),
                change("big", 40, 0),
                change("second", 2, 0),
                change("neg", 0, 9),
                change("third", 5, 3),
            ],
        );

        let files = stats.changes_files();
        for pair in files.windows(2) {
            assert!(pair[0].net_lines() >= pair[1].net_lines());
        }

        let order: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(order, ["big", "first", "second", "third", "neg"]);
    }

    #[test]
    fn test_empty() {
        let stats = LineStats::new(Vec::new(), Vec::new());
        assert_eq!(stats.total(), Delta::default());
        assert!(stats.staged_files().is_empty());
    }
}
