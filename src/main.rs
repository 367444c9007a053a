//! linestat - git line-change statistics for a status bar
//!
//! Sums added and deleted lines for staged and unstaged changes, renders a
//! compact summary plus a per-file breakdown, and keeps both up to date as
//! the working tree changes.
//!
//! # Usage
//!
//! ```bash
//! linestat                  # Live status view for the current directory
//! linestat /path/to/repo    # Live status view for another workspace
//! linestat --once           # Print one summary and breakdown, then exit
//! linestat --plain          # Print a new summary after every change
//! ```

mod app;
mod config;
mod display;
mod error;
mod format;
mod git;
mod pipeline;
mod refresh;
mod runner;
mod stats;
mod ui;
mod watch;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use crate::config::Config;
use crate::display::{DisplaySink, WriterSink};
use crate::pipeline::Workspace;

/// Git line-change statistics for status bars
#[derive(Parser, Debug)]
#[command(name = "linestat")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Workspace folder (defaults to the current directory)
    path: Option<PathBuf>,

    /// Run one pass, print it, and exit
    #[arg(long)]
    once: bool,

    /// Print every pass to stdout instead of drawing a status view
    #[arg(long, conflicts_with = "once")]
    plain: bool,

    /// Print only the status text, not the per-file breakdown
    #[arg(long)]
    summary_only: bool,

    /// Quiet period after the last change before recomputing
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Token placed in front of the status text
    #[arg(long)]
    icon: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Append logs to this file (the status view logs nowhere otherwise)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let interactive = !args.once && !args.plain;
    init_logging(args.log_file.as_deref(), interactive)?;

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(ms) = args.debounce_ms {
        config.debounce_ms = ms;
    }
    if let Some(icon) = args.icon {
        config.icon = icon;
    }

    // Resolve the workspace root
    let root = args
        .path
        .or_else(|| std::env::current_dir().ok())
        .map(|p| p.canonicalize().unwrap_or(p));
    let workspace = Workspace::new(root.clone(), config.icon.clone());
    let watch_root = watch_root(root.as_deref());

    tracing::info!(
        event = "main.started",
        root = ?workspace.root(),
        watch_root = ?watch_root,
        debounce_ms = config.debounce_ms,
    );

    if args.once {
        WriterSink::stdout(!args.summary_only).show(&workspace.render_pass());
        return Ok(());
    }

    if args.plain {
        return runner::run_plain(workspace, watch_root.as_deref(), config.debounce(), !args.summary_only);
    }

    let show_details = config.show_details && !args.summary_only;
    let mut app = app::App::new(workspace, watch_root.as_deref(), config.debounce(), show_details);
    app.run()
}

/// Watch the repository's working tree when there is one, so `.git`
/// state changes are seen even from a subdirectory
fn watch_root(root: Option<&Path>) -> Option<PathBuf> {
    let root = root.filter(|p| p.is_dir())?;
    let workdir = git::open_repository(Some(root))
        .ok()
        .and_then(|repo| repo.workdir().map(Path::to_path_buf));
    Some(workdir.unwrap_or_else(|| root.to_path_buf()))
}

fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // Anything on stderr would tear the status view
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .without_time()
                .init();
        }
    }

    Ok(())
}
