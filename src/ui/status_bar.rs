//! Status bar rendering
//!
//! One line: the committed status text on the left, key hints on the right.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use super::Styles;

/// Status bar widget
pub struct StatusBar<'a> {
    /// Icon token plus summary
    pub text: &'a str,
    /// Whether a pass is scheduled or running
    pub busy: bool,
    /// Whether the details panel is visible
    pub show_details: bool,
    /// Styles
    pub styles: &'a Styles,
}

impl StatusBar<'_> {
    fn text_style(&self) -> Style {
        if self.text.contains("Git: ") {
            self.styles.bar_error
        } else if self.text.ends_with("Clean") {
            self.styles.bar_clean
        } else {
            self.styles.bar
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        // Clear the bar
        for x in area.x..area.x + area.width {
            buf[(x, area.y)].set_char(' ').set_style(self.styles.bar);
        }

        let mut spans = vec![
            Span::styled(" ", self.styles.bar),
            Span::styled(self.text, self.text_style()),
        ];
        if self.busy {
            spans.push(Span::styled(" …", self.styles.bar_hint));
        }

        let hints = [
            ("r", "refresh"),
            ("d", if self.show_details { "hide" } else { "details" }),
            ("q", "quit"),
        ];

        let mut right = Vec::new();
        for (i, (key, desc)) in hints.iter().enumerate() {
            if i > 0 {
                right.push(Span::styled(" │ ", self.styles.bar_hint));
            }
            right.push(Span::styled(*key, self.styles.bar_key));
            right.push(Span::styled(format!(" {}", desc), self.styles.bar_hint));
        }
        right.push(Span::styled(" ", self.styles.bar));

        let left_width: usize = spans.iter().map(|s| s.content.width()).sum();
        let right_width: usize = right.iter().map(|s| s.content.width()).sum();

        if left_width + right_width < area.width as usize {
            let padding = area.width as usize - left_width - right_width;
            spans.push(Span::styled(" ".repeat(padding), self.styles.bar));
            spans.extend(right);
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
