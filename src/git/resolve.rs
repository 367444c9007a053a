//! File resolution
//!
//! Classifies each changed path per area and resolves its current total
//! line count: from disk when the file exists, otherwise from HEAD, and
//! failing that from the newest commit in history that still had it.
//! Every failure here degrades to a count of 0.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Sort, Tree};

use super::collect::{NumstatEntry, RawChanges, StatusEntry};
use crate::error::StatsError;
use crate::stats::{FileChange, FileStatus};

/// Upper bound on commits scanned when looking for a deleted file
const MAX_HISTORY_COMMITS: usize = 10_000;

/// Which comparison a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// Index vs HEAD
    Staged,
    /// Working tree vs index
    Changes,
}

impl Area {
    /// The status slot that classifies files of this area
    fn slot(self, entry: &StatusEntry) -> char {
        match self {
            Area::Staged => entry.index,
            Area::Changes => entry.worktree,
        }
    }
}

/// Classify a path within an area
///
/// Defaults to [`FileStatus::Mod`]; `A` in the area's slot means new and
/// `D` means deleted. Untracked paths are always new.
pub fn classify(entry: Option<&StatusEntry>, area: Area) -> FileStatus {
    let Some(entry) = entry else {
        return FileStatus::Mod;
    };

    if entry.is_untracked() {
        return FileStatus::New;
    }

    match area.slot(entry) {
        'A' => FileStatus::New,
        'D' => FileStatus::Del,
        _ => FileStatus::Mod,
    }
}

/// Total line count: segments between `\n`, so a trailing newline
/// contributes one extra (empty) line and empty content counts as 1
pub fn count_lines(content: &[u8]) -> usize {
    String::from_utf8_lossy(content).split('\n').count()
}

/// Lines a numeric diff reports as added for wholly new content
pub fn count_added_lines(content: &[u8]) -> usize {
    String::from_utf8_lossy(content).lines().count()
}

/// Resolved per-area file records of one pass
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    pub staged: Vec<FileChange>,
    pub changes: Vec<FileChange>,
}

/// Per-pass resolver; caches HEAD's tree and the history walk
pub struct Resolver<'r> {
    repo: &'r Repository,
    workdir: PathBuf,
    head_tree: Option<Tree<'r>>,
    history: Option<Vec<Oid>>,
}

impl<'r> Resolver<'r> {
    pub fn new(repo: &'r Repository) -> Result<Self, StatsError> {
        let workdir = repo
            .workdir()
            .ok_or_else(|| StatsError::NotARepository(repo.path().to_path_buf()))?
            .to_path_buf();
        let head_tree = repo.head().ok().and_then(|head| head.peel_to_tree().ok());

        Ok(Self {
            repo,
            workdir,
            head_tree,
            history: None,
        })
    }

    /// Build file records for both areas, one file at a time
    pub fn resolve(&mut self, raw: &RawChanges) -> Resolved {
        let status: HashMap<&str, &StatusEntry> = raw
            .status
            .iter()
            .map(|entry| (entry.path.as_str(), entry))
            .collect();

        let staged = raw
            .staged
            .iter()
            .map(|entry| self.tracked_change(entry, status.get(entry.path.as_str()).copied(), Area::Staged))
            .collect();

        let mut changes: Vec<FileChange> = raw
            .unstaged
            .iter()
            .map(|entry| self.tracked_change(entry, status.get(entry.path.as_str()).copied(), Area::Changes))
            .collect();

        changes.extend(raw.untracked().map(|entry| self.untracked_change(&entry.path)));

        Resolved { staged, changes }
    }

    fn tracked_change(&mut self, entry: &NumstatEntry, status: Option<&StatusEntry>, area: Area) -> FileChange {
        FileChange {
            path: entry.path.clone(),
            lines_added: entry.added,
            lines_deleted: entry.deleted,
            status: classify(status, area),
            total_lines: self.total_lines(&entry.path),
        }
    }

    fn untracked_change(&self, path: &str) -> FileChange {
        let (lines_added, total_lines) = match fs::read(self.workdir.join(path)) {
            Ok(content) => (count_added_lines(&content), count_lines(&content)),
            Err(e) => {
                tracing::debug!(event = "resolve.untracked_unreadable", path, error = %e);
                (0, 0)
            }
        };

        FileChange {
            path: path.to_string(),
            lines_added,
            lines_deleted: 0,
            status: FileStatus::New,
            total_lines,
        }
    }

    /// Current total line count of a path, or 0 if nothing can be found
    pub fn total_lines(&mut self, path: &str) -> usize {
        let full = self.workdir.join(path);
        if full.exists() {
            return match fs::read(&full) {
                Ok(content) => count_lines(&content),
                Err(e) => {
                    tracing::debug!(event = "resolve.read_failed", path, error = %e);
                    0
                }
            };
        }

        if let Some(count) = self.head_tree.as_ref().and_then(|tree| tree_lines(self.repo, tree, path)) {
            return count;
        }

        match self.history_lines(path) {
            Some(count) => count,
            None => {
                tracing::debug!(event = "resolve.history_exhausted", path);
                0
            }
        }
    }

    /// Newest commit whose tree still contains the path
    fn history_lines(&mut self, path: &str) -> Option<usize> {
        let repo = self.repo;
        let history = self.history.get_or_insert_with(|| {
            walk_history(repo).unwrap_or_else(|e| {
                tracing::debug!(event = "resolve.history_walk_failed", error = %e);
                Vec::new()
            })
        });

        history.iter().find_map(|oid| {
            let tree = repo.find_commit(*oid).ok()?.tree().ok()?;
            tree_lines(repo, &tree, path)
        })
    }
}

fn walk_history(repo: &Repository) -> Result<Vec<Oid>, git2::Error> {
    let mut revwalk = repo.revwalk()?;
    revwalk.push_head()?;
    revwalk.set_sorting(Sort::TIME)?;
    revwalk.take(MAX_HISTORY_COMMITS).collect()
}

fn tree_lines(repo: &Repository, tree: &Tree<'_>, path: &str) -> Option<usize> {
    let entry = tree.get_path(Path::new(path)).ok()?;
    let object = entry.to_object(repo).ok()?;
    let blob = object.as_blob()?;
    Some(count_lines(blob.content()))
}
