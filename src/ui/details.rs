//! Details panel
//!
//! Shows the tooltip text in a bordered panel, with sign-colored file rows.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use super::Styles;

/// Details panel widget
pub struct Details<'a> {
    /// Multi-line tooltip text
    pub tooltip: &'a str,
    /// First visible line
    pub scroll: usize,
    /// Styles
    pub styles: &'a Styles,
}

impl Details<'_> {
    fn line_style(&self, line: &str) -> Style {
        if line.starts_with("  +") {
            self.styles.stats_added
        } else if line.starts_with("  -") {
            self.styles.stats_removed
        } else if line.starts_with(' ') {
            self.styles.text
        } else {
            self.styles.section
        }
    }
}

impl Widget for Details<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.styles.border)
            .title(Span::styled(" Details ", self.styles.title));

        let inner = block.inner(area);
        block.render(area, buf);

        for (i, text) in self.tooltip.lines().skip(self.scroll).enumerate() {
            let y = inner.y + i as u16;
            if y >= inner.y + inner.height {
                break;
            }

            let line = Line::from(Span::styled(format!(" {}", text), self.line_style(text)));
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

/// Largest useful scroll offset for a tooltip in a panel of `height` rows
pub fn max_scroll(tooltip: &str, height: u16) -> usize {
    let inner = height.saturating_sub(2) as usize;
    tooltip.lines().count().saturating_sub(inner)
}
