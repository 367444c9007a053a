//! Terminal status view and event loop
//!
//! Holds the last committed display and drives refreshes: watcher
//! triggers and the refresh key feed the debounce, and due passes run
//! synchronously between frames.

use std::io;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
};

use crate::display::{Display, DisplaySink};
use crate::pipeline::Workspace;
use crate::refresh::{Debounce, Phase, Trigger};
use crate::ui::{Details, StatusBar, Styles, max_scroll};
use crate::watch::RepoWatcher;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Main application state
pub struct App {
    // Window dimensions
    height: u16,

    // What a pass runs against
    workspace: Workspace,

    // Refresh scheduling
    debounce: Debounce,
    triggers: Receiver<Trigger>,
    _watcher: Option<RepoWatcher>,

    // Last committed display
    display: Display,

    // View state
    show_details: bool,
    scroll: usize,

    styles: Styles,
}

impl App {
    /// Create a new App, watching `watch_root` when given
    pub fn new(workspace: Workspace, watch_root: Option<&Path>, delay: Duration, show_details: bool) -> Self {
        let (tx, rx) = mpsc::channel();

        let watcher = watch_root.and_then(|root| {
            RepoWatcher::start(root, move |trigger| {
                let _ = tx.send(trigger);
            })
            .map_err(|e| tracing::warn!(event = "app.watch_failed", path = %root.display(), error = %e))
            .ok()
        });

        Self {
            height: 0,
            workspace,
            debounce: Debounce::new(delay),
            triggers: rx,
            _watcher: watcher,
            display: Display::default(),
            show_details,
            scroll: 0,
            styles: Styles::new(),
        }
    }

    /// Run the application
    pub fn run(&mut self) -> Result<()> {
        // Startup pass, no debounce
        self.debounce.start_now();
        self.run_pass();

        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|frame| {
                self.height = frame.area().height;
                self.render(frame);
            })?;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                    }
                    Event::Resize(_, h) => {
                        self.height = h;
                        self.clamp_scroll();
                    }
                    _ => {}
                }
            }

            self.drain_triggers();

            if self.debounce.start_if_due(Instant::now()) {
                self.run_pass();
            }
        }
    }

    /// Feed every queued watcher trigger into the debounce
    fn drain_triggers(&mut self) {
        loop {
            match self.triggers.try_recv() {
                Ok(trigger) => {
                    tracing::debug!(event = "app.trigger", %trigger);
                    self.debounce.trigger(Instant::now());
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return,
            }
        }
    }

    /// Compute, commit the display, and close out the running phase
    fn run_pass(&mut self) {
        let display = self.workspace.render_pass();
        self.show(&display);
        self.debounce.finish(Instant::now());
    }

    /// Render the application
    fn render(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        if self.show_details {
            frame.render_widget(
                Details {
                    tooltip: &self.display.tooltip,
                    scroll: self.scroll,
                    styles: &self.styles,
                },
                chunks[0],
            );
        }

        frame.render_widget(
            StatusBar {
                text: &self.display.text,
                busy: self.debounce.phase() != Phase::Idle,
                show_details: self.show_details,
                styles: &self.styles,
            },
            chunks[1],
        );
    }

    /// Handle keyboard input. Returns true if app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => return true,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,

            (KeyCode::Char('r'), _) => {
                tracing::debug!(event = "app.trigger", trigger = %Trigger::ManualRefresh);
                self.debounce.trigger(Instant::now());
            }
            (KeyCode::Char('d'), _) => {
                self.show_details = !self.show_details;
            }
            (KeyCode::Char('j') | KeyCode::Down, _) => {
                self.scroll = self.scroll.saturating_add(1);
                self.clamp_scroll();
            }
            (KeyCode::Char('k') | KeyCode::Up, _) => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            (KeyCode::Char('g'), _) => {
                self.scroll = 0;
            }
            _ => {}
        }

        false
    }

    fn clamp_scroll(&mut self) {
        let panel_height = self.height.saturating_sub(1);
        self.scroll = self.scroll.min(max_scroll(&self.display.tooltip, panel_height));
    }
}

impl DisplaySink for App {
    fn show(&mut self, display: &Display) {
        self.display = display.clone();
        self.clamp_scroll();
    }
}
