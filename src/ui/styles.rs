//! UI styles
//!
//! Defines consistent styling for the status view.

use ratatui::style::{Modifier, Style};

/// Color palette
pub mod colors {
    use ratatui::style::Color;

    // Base colors
    pub const FG: Color = Color::White;
    pub const DIM: Color = Color::DarkGray;

    // Status bar
    pub const BAR_BG: Color = Color::Rgb(40, 44, 52);
    pub const BAR_FG: Color = Color::White;

    // Stats
    pub const STATS_ADDED: Color = Color::Green;
    pub const STATS_REMOVED: Color = Color::Red;
    pub const CLEAN: Color = Color::Cyan;
    pub const ERROR: Color = Color::Yellow;

    // Borders
    pub const BORDER: Color = Color::DarkGray;
    pub const BORDER_FOCUS: Color = Color::Cyan;
}

/// Collection of styles used throughout the UI
#[derive(Clone)]
pub struct Styles {
    // Status bar
    pub bar: Style,
    pub bar_hint: Style,
    pub bar_key: Style,
    pub bar_clean: Style,
    pub bar_error: Style,

    // Details panel
    pub border: Style,
    pub title: Style,
    pub section: Style,
    pub text: Style,

    // Stats
    pub stats_added: Style,
    pub stats_removed: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self::new()
    }
}

impl Styles {
    /// Create a new Styles instance with default values
    pub fn new() -> Self {
        Self {
            bar: Style::default().bg(colors::BAR_BG).fg(colors::BAR_FG),
            bar_hint: Style::default().bg(colors::BAR_BG).fg(colors::DIM),
            bar_key: Style::default()
                .bg(colors::BAR_BG)
                .fg(colors::BAR_FG)
                .add_modifier(Modifier::BOLD),
            bar_clean: Style::default().bg(colors::BAR_BG).fg(colors::CLEAN),
            bar_error: Style::default()
                .bg(colors::BAR_BG)
                .fg(colors::ERROR)
                .add_modifier(Modifier::BOLD),

            border: Style::default().fg(colors::BORDER),
            title: Style::default()
                .fg(colors::BORDER_FOCUS)
                .add_modifier(Modifier::BOLD),
            section: Style::default().fg(colors::FG).add_modifier(Modifier::BOLD),
            text: Style::default().fg(colors::FG),

            stats_added: Style::default().fg(colors::STATS_ADDED),
            stats_removed: Style::default().fg(colors::STATS_REMOVED),
        }
    }
}
