//! Filesystem watcher
//!
//! Turns notify events under the working tree into refresh triggers.
//! Inside `.git` only the index, HEAD and refs matter; object writes,
//! lock files and logs are noise.

use std::path::{Component, Path};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::refresh::Trigger;

/// Keeps the underlying watcher alive
pub struct RepoWatcher {
    _watcher: RecommendedWatcher,
}

impl RepoWatcher {
    /// Watch `root` recursively, calling `on_trigger` from the notify thread
    pub fn start<F>(root: &Path, on_trigger: F) -> notify::Result<Self>
    where
        F: Fn(Trigger) + Send + 'static,
    {
        let watch_root = root.to_path_buf();
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| match result {
            Ok(event) => {
                if let Some(trigger) = classify_event(&event, &watch_root) {
                    tracing::trace!(event = "watch.trigger", %trigger, paths = ?event.paths);
                    on_trigger(trigger);
                }
            }
            Err(e) => tracing::warn!(event = "watch.error", error = %e),
        })?;

        watcher.watch(root, RecursiveMode::Recursive)?;
        tracing::info!(event = "watch.started", path = %root.display());

        Ok(Self { _watcher: watcher })
    }
}

/// Map a notify event to a trigger, or `None` if it is irrelevant
pub fn classify_event(event: &Event, root: &Path) -> Option<Trigger> {
    let trigger = match event.kind {
        EventKind::Create(_) => Trigger::FileCreated,
        EventKind::Modify(_) => Trigger::FileModified,
        EventKind::Remove(_) => Trigger::FileDeleted,
        _ => return None,
    };

    let mut relevant = false;
    for path in &event.paths {
        match PathClass::of(path, root) {
            PathClass::GitState => return Some(Trigger::GitStateChanged),
            PathClass::WorkTree => relevant = true,
            PathClass::Ignored => {}
        }
    }

    relevant.then_some(trigger)
}

#[derive(Debug, PartialEq, Eq)]
enum PathClass {
    WorkTree,
    GitState,
    Ignored,
}

impl PathClass {
    fn of(path: &Path, root: &Path) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let mut components = relative.components().filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        });

        let Some(first) = components.next() else {
            return PathClass::WorkTree;
        };
        if first != ".git" {
            return PathClass::WorkTree;
        }

        match components.next() {
            Some("index") | Some("HEAD") => PathClass::GitState,
            Some("refs") if !relative.to_string_lossy().ends_with(".lock") => PathClass::GitState,
            _ => PathClass::Ignored,
        }
    }
}
