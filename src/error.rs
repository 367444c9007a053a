//! Error types for a statistics pass

use std::path::PathBuf;
use thiserror::Error;

/// Why a statistics pass produced no [`LineStats`](crate::stats::LineStats)
#[derive(Debug, Error)]
pub enum StatsError {
    /// No workspace root was supplied or it does not exist
    #[error("no workspace folder")]
    NoWorkspace,

    /// The workspace root is not inside a git working tree
    #[error("{} is not a git repository", .0.display())]
    NotARepository(PathBuf),

    /// A git query failed part way through the pass
    #[error("git: {0}")]
    Git(#[from] git2::Error),

    /// Reading the working tree failed
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
