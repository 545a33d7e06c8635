//! Diagnostic formatting for compiler errors
//!
//! Renders a `MoonError` the way the CLI shows it: a colored header, the
//! `file:line:column` pointer and, for syntax errors, the offending source
//! line with one line of context on each side and a caret under the column.

use super::{MoonError, SourceLocation};
use colored::Colorize;

/// Diagnostic information for displaying errors with context
pub struct Diagnostic {
    error: MoonError,
    source: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic from an error
    pub fn new(error: MoonError) -> Self {
        Self {
            error,
            source: None,
        }
    }

    /// Create a diagnostic with source code context
    pub fn with_source(error: MoonError, source: &str) -> Self {
        Self {
            error,
            source: Some(source.to_string()),
        }
    }

    /// Format the diagnostic with color and context
    pub fn format(&self) -> String {
        let mut output = String::new();

        let kind = self.error.kind().red().bold();
        match &self.error {
            MoonError::RenderError { node, message } => {
                let node = format!("[{}]", node).yellow();
                output.push_str(&format!("{}: {} {}", kind, node, message));
            }
            other => {
                output.push_str(&format!("{}: {}", kind, other.message()));
            }
        }
        output.push('\n');

        if let Some(location) = self.error.location() {
            output.push_str(&format!("  {} {}\n", "-->".blue().bold(), location));

            if let Some(ref source) = self.source {
                output.push_str(&self.format_source_context(source, location));
            }
        }

        output
    }

    fn format_source_context(&self, source: &str, location: &SourceLocation) -> String {
        let mut output = String::new();
        let lines: Vec<&str> = source.lines().collect();

        if location.line == 0 || location.line > lines.len() {
            return output;
        }

        let line_idx = location.line - 1;
        let gutter = (location.line + 1).to_string().len();

        let numbered = |number: usize, text: &str| {
            format!(
                "  {} {} {}\n",
                format!("{:>width$}", number, width = gutter).blue(),
                "|".blue(),
                text
            )
        };

        if line_idx > 0 {
            output.push_str(&numbered(line_idx, lines[line_idx - 1]));
        }

        output.push_str(&numbered(location.line, lines[line_idx]));

        // Gutter, separator and spaces line up the caret under the column
        let padding = " ".repeat(gutter + 5 + location.column.saturating_sub(1));
        output.push_str(&format!("{}{}\n", padding, "^".red().bold()));

        if line_idx + 1 < lines.len() {
            output.push_str(&numbered(location.line + 1, lines[line_idx + 1]));
        }

        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}
