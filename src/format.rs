//! Status text and tooltip rendering
//!
//! The summary is compact enough for a status bar; the tooltip lists every
//! file per area. Net values always carry an explicit sign.

use crate::display::Display;
use crate::error::StatsError;
use crate::stats::{Delta, FileChange, LineStats};

/// Net with a forced `+` when not negative
pub fn signed(n: i64) -> String {
    if n >= 0 { format!("+{n}") } else { n.to_string() }
}

/// `{±net} (+{added}-{deleted})`
pub fn delta_line(delta: Delta) -> String {
    format!("{} (+{}-{})", signed(delta.net()), delta.added, delta.deleted)
}

/// Status bar summary
///
/// `Clean` when both areas net to zero. When exactly one area is nonzero
/// only that area is shown, without a label. Otherwise both areas are
/// labelled and a total follows.
pub fn summary(stats: &LineStats) -> String {
    let staged = stats.staged();
    let changes = stats.changes();
    let has_staged = staged.net() != 0;
    let has_changes = changes.net() != 0;

    if !has_staged && !has_changes {
        return "Clean".to_string();
    }

    if has_staged ^ has_changes {
        return delta_line(if has_staged { staged } else { changes });
    }

    let mut parts = vec![format!("Staged:{}", delta_line(staged))];
    if has_changes {
        parts.push(format!("Changes:{}", delta_line(changes)));
    }
    parts.push(format!("Total:{}", delta_line(stats.total())));
    parts.join(", ")
}

/// `  {±net} (+{added}-{deleted})={total} [{status}] {name}`
pub fn file_row(file: &FileChange) -> String {
    format!(
        "  {} (+{}-{})={} [{}] {}",
        signed(file.net_lines()),
        file.lines_added,
        file.lines_deleted,
        file.total_lines,
        file.status,
        file.file_name(),
    )
}

/// Multi-line details: staged block, changes block, total line
pub fn tooltip(stats: &LineStats) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Staged: {}", delta_line(stats.staged())));
    lines.extend(stats.staged_files().iter().map(file_row));

    lines.push(String::new());
    lines.push(format!("Changes: {}", delta_line(stats.changes())));
    lines.extend(stats.changes_files().iter().map(file_row));

    lines.push(String::new());
    lines.push(format!("Total: {}", delta_line(stats.total())));

    lines.join("\n")
}

/// Short status bar text for a pass that produced no stats
pub fn error_summary(error: &StatsError) -> &'static str {
    match error {
        StatsError::NoWorkspace => "Git: No workspace",
        StatsError::NotARepository(_) => "Git: No repo",
        StatsError::Git(_) | StatsError::Io(_) => "Git: Error",
    }
}

fn error_tooltip(error: &StatsError) -> String {
    match error {
        StatsError::NoWorkspace => "Open a folder to see git line stats".to_string(),
        StatsError::NotARepository(path) => format!("{} is not a git repository", path.display()),
        StatsError::Git(_) | StatsError::Io(_) => format!("Failed to compute git line stats: {error}"),
    }
}

/// Render the outcome of a pass into what the display sink shows
pub fn render(outcome: &Result<LineStats, StatsError>, icon: &str) -> Display {
    let (summary, tooltip) = match outcome {
        Ok(stats) => (summary(stats), tooltip(stats)),
        Err(e) => (error_summary(e).to_string(), error_tooltip(e)),
    };

    let text = if icon.is_empty() {
        summary
    } else {
        format!("{icon} {summary}")
    };

    Display { text, tooltip }
}
