//! Plain watch driver
//!
//! Prints a fresh display to stdout after every pass. Passes run on the
//! blocking pool so triggers keep arriving while one is in flight; those
//! queue a single follow-up pass.

use std::io::{self, BufRead};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{JoinError, JoinHandle};

use crate::display::{Display, DisplaySink, WriterSink};
use crate::pipeline::Workspace;
use crate::refresh::{Debounce, REFRESH_COMMAND, Trigger};
use crate::watch::RepoWatcher;

/// Watch `watch_root` and print every pass until stdin closes and no
/// watcher is left
pub fn run_plain(workspace: Workspace, watch_root: Option<&Path>, delay: Duration, details: bool) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;

    let (tx, rx) = mpsc::unbounded_channel();

    let _watcher = watch_root.and_then(|root| {
        let tx = tx.clone();
        RepoWatcher::start(root, move |trigger| {
            let _ = tx.send(trigger);
        })
        .map_err(|e| tracing::warn!(event = "runner.watch_failed", path = %root.display(), error = %e))
        .ok()
    });

    spawn_stdin_commands(tx);

    let mut sink = WriterSink::stdout(details);
    runtime.block_on(drive(workspace, rx, delay, &mut sink));
    Ok(())
}

/// Read refresh commands from stdin: an empty line, `refresh`, or the
/// full command identifier
fn spawn_stdin_commands(tx: UnboundedSender<Trigger>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };

            match line.trim() {
                "" | "refresh" | REFRESH_COMMAND => {
                    if tx.send(Trigger::ManualRefresh).is_err() {
                        break;
                    }
                }
                other => tracing::warn!(event = "runner.unknown_command", command = other),
            }
        }
    });
}

/// Event loop: one startup pass, then debounced passes per trigger
async fn drive<S: DisplaySink + ?Sized>(
    workspace: Workspace,
    mut triggers: UnboundedReceiver<Trigger>,
    delay: Duration,
    sink: &mut S,
) {
    let mut debounce = Debounce::new(delay);
    debounce.start_now();
    let mut in_flight = Some(spawn_pass(&workspace));
    let mut closed = false;

    loop {
        if closed && in_flight.is_none() && debounce.deadline().is_none() {
            break;
        }

        let deadline = debounce.deadline();

        tokio::select! {
            trigger = triggers.recv(), if !closed => match trigger {
                Some(trigger) => {
                    tracing::debug!(event = "runner.trigger", %trigger, phase = ?debounce.phase());
                    debounce.trigger(Instant::now());
                }
                None => closed = true,
            },
            () = sleep_until(deadline) => {
                if debounce.start_if_due(Instant::now()) {
                    in_flight = Some(spawn_pass(&workspace));
                }
            }
            joined = wait_pass(&mut in_flight) => {
                in_flight = None;
                match joined {
                    Ok(display) => sink.show(&display),
                    Err(e) => tracing::warn!(event = "runner.pass_panicked", error = %e),
                }
                debounce.finish(Instant::now());
            }
        }
    }
}

fn spawn_pass(workspace: &Workspace) -> JoinHandle<Display> {
    let workspace = workspace.clone();
    tokio::task::spawn_blocking(move || workspace.render_pass())
}

async fn wait_pass(in_flight: &mut Option<JoinHandle<Display>>) -> Result<Display, JoinError> {
    match in_flight {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testutil::TestRepo;

    impl DisplaySink for Vec<Display> {
        fn show(&mut self, display: &Display) {
            self.push(display.clone());
        }
    }

    #[tokio::test]
    async fn test_startup_pass_then_exit() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(tx);

        let mut shown: Vec<Display> = Vec::new();
        drive(Workspace::new(None, "*"), rx, Duration::from_millis(5), &mut shown).await;

        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].text, "* Git: No workspace");
    }

    #[tokio::test]
    async fn test_burst_collapses_into_one_pass() {
        let repo = TestRepo::new();
        repo.write("a.txt", "one\ntwo\n");
        let workspace = Workspace::new(Some(repo.path().to_path_buf()), "");

        let (tx, rx) = mpsc::unbounded_channel();
        for _ in 0..3 {
            tx.send(Trigger::FileModified).unwrap();
        }
        tx.send(Trigger::ManualRefresh).unwrap();
        drop(tx);

        let mut shown: Vec<Display> = Vec::new();
        drive(workspace, rx, Duration::from_millis(10), &mut shown).await;

        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0], shown[1]);
        assert_eq!(shown[1].text, "+2 (+2-0)");
    }
}
