// Terminal output for command results

use std::io::IsTerminal;

use colored::{Color, Colorize};

/// Kind of a one-line status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Done,
    Failed,
    Warning,
    Note,
}

impl Status {
    fn marker(self) -> &'static str {
        match self {
            Status::Done => "✓",
            Status::Failed => "✗",
            Status::Warning => "⚠",
            Status::Note => "ℹ",
        }
    }

    fn color(self) -> Color {
        match self {
            Status::Done => Color::Green,
            Status::Failed => Color::Red,
            Status::Warning => Color::Yellow,
            Status::Note => Color::Blue,
        }
    }

    // Outcomes stand out more than commentary.
    fn is_outcome(self) -> bool {
        matches!(self, Status::Done | Status::Failed)
    }
}

/// Renders status lines, coloured only when writing to a terminal
#[derive(Debug, Clone, Copy)]
pub struct OutputStyle {
    pub use_colors: bool,
}

impl OutputStyle {
    /// Style for stdout
    pub fn stdout() -> Self {
        Self {
            use_colors: std::io::stdout().is_terminal(),
        }
    }

    /// Style for stderr
    pub fn stderr() -> Self {
        Self {
            use_colors: std::io::stderr().is_terminal(),
        }
    }

    /// `msg` prefixed with the marker for `status`
    pub fn line(&self, status: Status, msg: &str) -> String {
        if !self.use_colors {
            return format!("{} {}", status.marker(), msg);
        }

        let marker = status.marker().color(status.color());
        let marker = if status.is_outcome() { marker.bold() } else { marker };
        format!("{} {}", marker, msg)
    }
}

/// Print a failure to stderr
pub fn print_error(msg: &str) {
    eprintln!("{}", OutputStyle::stderr().line(Status::Failed, msg));
}
