//! Console status output with ANSI color support.
//!
//! Rendered HTML goes to stdout, so every status line here goes to stderr.
//! Colors follow stderr's TTY status and respect `NO_COLOR`.

use crate::views::Notice;
use std::io::{self, IsTerminal};

/// ANSI style codes for terminal formatting.
#[derive(Debug, Clone, Copy)]
pub enum Style {
    Bold,
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Bold => "1",
            Style::Red => "31",
            Style::Green => "32",
            Style::Yellow => "33",
            Style::Blue => "34",
            Style::Cyan => "36",
        }
    }
}

const RESET: &str = "\x1b[0m";

#[derive(Debug)]
pub struct Console {
    colors_enabled: bool,
    quiet: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    /// Colors are disabled when `NO_COLOR` is set or stderr is not a terminal.
    pub fn new() -> Self {
        let colors_enabled = std::env::var("NO_COLOR").is_err() && io::stderr().is_terminal();

        Self {
            colors_enabled,
            quiet: false,
        }
    }

    pub fn with_colors(enabled: bool) -> Self {
        Self {
            colors_enabled: enabled,
            quiet: false,
        }
    }

    /// Suppresses everything except errors.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Applies ANSI styles to text if colors are enabled.
    pub fn style(&self, text: &str, styles: &[Style]) -> String {
        if !self.colors_enabled || styles.is_empty() {
            return text.to_string();
        }

        let codes: Vec<&str> = styles.iter().map(|s| s.code()).collect();
        format!("\x1b[{}m{}{}", codes.join(";"), text, RESET)
    }

    /// Creates a colored label like `[INFO]`.
    pub fn label(&self, label: &str, color: Style) -> String {
        let styled = self.style(label, &[color, Style::Bold]);
        format!("[{}]", styled)
    }

    fn emit(&self, label: &str, color: Style, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", self.label(label, color), message);
        }
    }

    pub fn info(&self, message: &str) {
        self.emit("INFO", Style::Blue, message);
    }

    pub fn success(&self, message: &str) {
        self.emit("OK", Style::Green, message);
    }

    pub fn warning(&self, message: &str) {
        self.emit("WARN", Style::Yellow, message);
    }

    /// Errors are printed even when quiet.
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", self.label("ERROR", Style::Red), message);
    }

    pub fn step(&self, message: &str) {
        self.emit("STEP", Style::Cyan, message);
    }

    /// Formats a count with styling.
    pub fn count(&self, n: usize) -> String {
        self.style(&n.to_string(), &[Style::Green, Style::Bold])
    }

    /// Reports the inline message a view rendered instead of content.
    pub fn notice(&self, notice: &Notice) {
        if notice.is_error() {
            self.error(&notice.text());
        } else {
            self.warning(&notice.text());
        }
    }
}
