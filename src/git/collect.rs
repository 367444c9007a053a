//! Diff collection
//!
//! Queries the repository for the numeric diff of both areas
//! (working tree vs index, index vs HEAD) and the status listing
//! that classifies every touched path.

use std::path::Path;

use git2::{Diff, DiffOptions, ErrorCode, Patch, Repository, Status, StatusOptions};

use crate::error::StatsError;

/// One line of numeric diff output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumstatEntry {
    /// Lines added
    pub added: usize,
    /// Lines deleted
    pub deleted: usize,
    /// Repository-relative path
    pub path: String,
}

/// One path of the status listing with its index and working-tree codes
///
/// Codes follow the porcelain letters: `A` added, `M` modified,
/// `D` deleted, `R` renamed, `T` type change, `U` conflicted,
/// `?` untracked, and a space for an unchanged slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Repository-relative path
    pub path: String,
    /// Index (staged) slot
    pub index: char,
    /// Working-tree (unstaged) slot
    pub worktree: char,
}

impl StatusEntry {
    pub fn is_untracked(&self) -> bool {
        self.index == '?' && self.worktree == '?'
    }
}

/// Raw git output for one pass
#[derive(Debug, Clone, Default)]
pub struct RawChanges {
    /// Working tree vs index
    pub unstaged: Vec<NumstatEntry>,
    /// Index vs HEAD (vs the empty tree when HEAD is unborn)
    pub staged: Vec<NumstatEntry>,
    /// Every touched path, untracked files included
    pub status: Vec<StatusEntry>,
}

impl RawChanges {
    /// Untracked paths, in listing order
    pub fn untracked(&self) -> impl Iterator<Item = &StatusEntry> {
        self.status.iter().filter(|entry| entry.is_untracked())
    }
}

/// Open the repository containing the workspace root
///
/// A missing root maps to [`StatsError::NoWorkspace`], a root outside any
/// working tree to [`StatsError::NotARepository`].
pub fn open_repository(root: Option<&Path>) -> Result<Repository, StatsError> {
    let root = root.filter(|p| p.is_dir()).ok_or(StatsError::NoWorkspace)?;

    let repo = match Repository::discover(root) {
        Ok(repo) => repo,
        Err(e) if e.code() == ErrorCode::NotFound => {
            return Err(StatsError::NotARepository(root.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    if repo.workdir().is_none() {
        return Err(StatsError::NotARepository(root.to_path_buf()));
    }

    Ok(repo)
}

/// Collect both numeric diffs and the status listing
pub fn collect(repo: &Repository) -> Result<RawChanges, StatsError> {
    let mut opts = DiffOptions::new();
    opts.context_lines(0);

    let unstaged_diff = repo.diff_index_to_workdir(None, Some(&mut opts))?;
    let unstaged = numstat(&unstaged_diff)?;

    // Unborn HEAD diffs the index against the empty tree
    let head_tree = repo.head().ok().and_then(|head| head.peel_to_tree().ok());
    let mut opts = DiffOptions::new();
    opts.context_lines(0);
    let staged_diff = repo.diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))?;
    let staged = numstat(&staged_diff)?;

    let status = status_listing(repo)?;

    tracing::debug!(
        event = "collect.completed",
        unstaged = unstaged.len(),
        staged = staged.len(),
        status = status.len(),
    );

    Ok(RawChanges {
        unstaged,
        staged,
        status,
    })
}

/// Per-file added/deleted counts; binary files are skipped
fn numstat(diff: &Diff<'_>) -> Result<Vec<NumstatEntry>, git2::Error> {
    let mut entries = Vec::new();

    for idx in 0..diff.deltas().len() {
        let Some(patch) = Patch::from_diff(diff, idx)? else {
            continue;
        };

        let delta = patch.delta();
        if delta.flags().is_binary() {
            continue;
        }

        let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path()) else {
            continue;
        };

        let (_, added, deleted) = patch.line_stats()?;
        entries.push(NumstatEntry {
            added,
            deleted,
            path: path.to_string_lossy().to_string(),
        });
    }

    Ok(entries)
}

fn status_listing(repo: &Repository) -> Result<Vec<StatusEntry>, git2::Error> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true);
    opts.recurse_untracked_dirs(true);
    opts.include_ignored(false);

    let statuses = repo.statuses(Some(&mut opts))?;

    let entries = statuses
        .iter()
        .filter_map(|entry| {
            let path = entry.path()?.to_string();
            let (index, worktree) = slot_codes(entry.status());
            Some(StatusEntry {
                path,
                index,
                worktree,
            })
        })
        .collect();

    Ok(entries)
}

/// Map git2 status bits to porcelain-style (index, worktree) codes
fn slot_codes(status: Status) -> (char, char) {
    if status.contains(Status::WT_NEW) && !status.intersects(index_bits()) {
        return ('?', '?');
    }
    if status.contains(Status::CONFLICTED) {
        return ('U', 'U');
    }

    let index = if status.contains(Status::INDEX_NEW) {
        'A'
    } else if status.contains(Status::INDEX_DELETED) {
        'D'
    } else if status.contains(Status::INDEX_RENAMED) {
        'R'
    } else if status.contains(Status::INDEX_TYPECHANGE) {
        'T'
    } else if status.contains(Status::INDEX_MODIFIED) {
        'M'
    } else {
        ' '
    };

    let worktree = if status.contains(Status::WT_NEW) {
        'A'
    } else if status.contains(Status::WT_DELETED) {
        'D'
    } else if status.contains(Status::WT_RENAMED) {
        'R'
    } else if status.contains(Status::WT_TYPECHANGE) {
        'T'
    } else if status.contains(Status::WT_MODIFIED) {
        'M'
    } else {
        ' '
    };

    (index, worktree)
}

fn index_bits() -> Status {
    Status::INDEX_NEW
        | Status::INDEX_MODIFIED
        | Status::INDEX_DELETED
        | Status::INDEX_RENAMED
        | Status::INDEX_TYPECHANGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testutil::TestRepo;

    fn lines(n: usize) -> String {
        (1..=n).map(|i| format!("line {i}\n")).collect()
    }

    fn status_of<'a>(raw: &'a RawChanges, path: &str) -> &'a StatusEntry {
        raw.status.iter().find(|e| e.path == path).unwrap()
    }

    #[test]
    fn test_no_workspace() {
        assert!(matches!(open_repository(None), Err(StatsError::NoWorkspace)));
        assert!(matches!(
            open_repository(Some(Path::new("/definitely/not/here"))),
            Err(StatsError::NoWorkspace)
        ));
    }

    #[test]
    fn test_not_a_repository() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = open_repository(Some(dir.path()));
        assert!(matches!(result, Err(StatsError::NotARepository(_))));
    }

    #[test]
    fn test_unstaged_and_staged_are_separate() {
        let repo = TestRepo::new();
        repo.write("a.txt", &lines(10));
        repo.write("b.txt", &lines(4));
        repo.stage("a.txt");
        repo.stage("b.txt");
        repo.commit("initial");

        // a.txt: staged +3
        repo.write("a.txt", &lines(13));
        repo.stage("a.txt");
        // b.txt: unstaged -2
        repo.write("b.txt", &lines(2));

        let raw = collect(&repo.repo).unwrap();

        assert_eq!(
            raw.staged,
            vec![NumstatEntry { added: 3, deleted: 0, path: "a.txt".into() }]
        );
        assert_eq!(
            raw.unstaged,
            vec![NumstatEntry { added: 0, deleted: 2, path: "b.txt".into() }]
        );
        assert_eq!(status_of(&raw, "a.txt").index, 'M');
        assert_eq!(status_of(&raw, "b.txt").worktree, 'M');
    }

    #[test]
    fn test_untracked_only_in_status() {
        let repo = TestRepo::new();
        repo.write("tracked.txt", "x\n");
        repo.stage("tracked.txt");
        repo.commit("initial");
        repo.write("nested/new.txt", &lines(5));

        let raw = collect(&repo.repo).unwrap();

        assert!(raw.unstaged.is_empty());
        assert!(raw.staged.is_empty());
        let untracked: Vec<&str> = raw.untracked().map(|e| e.path.as_str()).collect();
        assert_eq!(untracked, ["nested/new.txt"]);
    }

    #[test]
    fn test_staged_add_and_delete_codes() {
        let repo = TestRepo::new();
        repo.write("old.txt", &lines(3));
        repo.stage("old.txt");
        repo.commit("initial");

        repo.write("fresh.txt", &lines(2));
        repo.stage("fresh.txt");
        repo.remove("old.txt");
        repo.stage_removal("old.txt");

        let raw = collect(&repo.repo).unwrap();

        assert_eq!(status_of(&raw, "fresh.txt").index, 'A');
        assert_eq!(status_of(&raw, "old.txt").index, 'D');
        assert!(raw.staged.contains(&NumstatEntry { added: 0, deleted: 3, path: "old.txt".into() }));
        assert!(raw.staged.contains(&NumstatEntry { added: 2, deleted: 0, path: "fresh.txt".into() }));
    }

    #[test]
    fn test_unborn_head_stages_against_empty_tree() {
        let repo = TestRepo::new();
        repo.write("first.txt", &lines(7));
        repo.stage("first.txt");

        let raw = collect(&repo.repo).unwrap();

        assert_eq!(
            raw.staged,
            vec![NumstatEntry { added: 7, deleted: 0, path: "first.txt".into() }]
        );
    }

    #[test]
    fn test_slot_codes() {
        assert_eq!(slot_codes(Status::WT_NEW), ('?', '?'));
        assert_eq!(slot_codes(Status::INDEX_NEW | Status::WT_MODIFIED), ('A', 'M'));
        assert_eq!(slot_codes(Status::WT_DELETED), (' ', 'D'));
        assert_eq!(slot_codes(Status::INDEX_DELETED), ('D', ' '));
    }
}
