//! Display sink
//!
//! Whatever shows the status text and tooltip. Each driver writes to its
//! sink from exactly one place, once per completed pass.

use std::io::{self, Write};

/// Strings committed to the display after a pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Display {
    /// One line: icon token followed by the summary
    pub text: String,
    /// Multi-line details
    pub tooltip: String,
}

/// Receives each committed display
pub trait DisplaySink {
    fn show(&mut self, display: &Display);
}

/// Prints every display to a writer, separated by a blank line
pub struct WriterSink<W: Write> {
    out: W,
    details: bool,
}

impl WriterSink<io::Stdout> {
    pub fn stdout(details: bool) -> Self {
        Self::new(io::stdout(), details)
    }
}

impl<W: Write> WriterSink<W> {
    pub fn new(out: W, details: bool) -> Self {
        Self { out, details }
    }
}

impl<W: Write> DisplaySink for WriterSink<W> {
    fn show(&mut self, display: &Display) {
        let result = if self.details {
            writeln!(self.out, "{}\n{}\n", display.text, display.tooltip)
        } else {
            writeln!(self.out, "{}", display.text)
        };

        if let Err(e) = result.and_then(|_| self.out.flush()) {
            tracing::warn!(event = "display.write_failed", error = %e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_sink() {
        let display = Display {
            text: "* +1 (+1-0)".into(),
            tooltip: "Staged: +0 (+0-0)".into(),
        };

        let mut buf = Vec::new();
        WriterSink::new(&mut buf, false).show(&display);
        assert_eq!(String::from_utf8(buf).unwrap(), "* +1 (+1-0)\n");

        let mut buf = Vec::new();
        WriterSink::new(&mut buf, true).show(&display);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "* +1 (+1-0)\nStaged: +0 (+0-0)\n\n"
        );
    }
}
