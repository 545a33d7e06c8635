//! Error handling and diagnostics for moonlua
//!
//! Two families of failure exist: syntax errors raised while lexing and
//! parsing (always positioned), and render errors raised by the code
//! generator when it meets a node shape it cannot express in Lua.

use std::fmt;

use serde::Serialize;

pub mod diagnostic;

pub use diagnostic::Diagnostic;

/// Result type alias for moonlua operations
pub type MoonResult<T> = Result<T, MoonError>;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Optional filename
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize, filename: Option<String>) -> Self {
        Self {
            line,
            column,
            filename,
        }
    }

    /// Create a source location without a filename
    pub fn at(line: usize, column: usize) -> Self {
        Self::new(line, column, None)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref filename) = self.filename {
            write!(f, "{}:{}:{}", filename, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Main error type for moonlua
#[derive(Debug, Clone, PartialEq)]
pub enum MoonError {
    /// Lexical analysis error
    LexerError {
        message: String,
        location: SourceLocation,
    },
    /// Parsing error, including indentation that cannot be resolved
    ParseError {
        message: String,
        location: SourceLocation,
    },
    /// A node the generator cannot render
    RenderError {
        node: &'static str,
        message: String,
    },
    /// Internal compiler error (should not happen in normal operation)
    InternalError {
        message: String,
    },
}

impl MoonError {
    /// Create a new lexer error
    pub fn lexer_error(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::LexerError {
            message: message.into(),
            location,
        }
    }

    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::ParseError {
            message: message.into(),
            location,
        }
    }

    /// Create a new render error for the given node kind
    pub fn render_error(node: &'static str, message: impl Into<String>) -> Self {
        Self::RenderError {
            node,
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Get the error kind as a string
    pub fn kind(&self) -> &str {
        match self {
            Self::LexerError { .. } => "Lexer Error",
            Self::ParseError { .. } => "Parse Error",
            Self::RenderError { .. } => "Render Error",
            Self::InternalError { .. } => "Internal Error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        match self {
            Self::LexerError { message, .. }
            | Self::ParseError { message, .. }
            | Self::RenderError { message, .. }
            | Self::InternalError { message } => message,
        }
    }

    /// Get the source location if available
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::LexerError { location, .. } | Self::ParseError { location, .. } => Some(location),
            Self::RenderError { .. } | Self::InternalError { .. } => None,
        }
    }

    /// True for errors raised before an AST exists
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Self::LexerError { .. } | Self::ParseError { .. })
    }
}

impl fmt::Display for MoonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenderError { node, message } => {
                write!(f, "{}: {}: {}", self.kind(), node, message)
            }
            _ => {
                if let Some(location) = self.location() {
                    write!(f, "{}: {} at {}", self.kind(), self.message(), location)
                } else {
                    write!(f, "{}: {}", self.kind(), self.message())
                }
            }
        }
    }
}

impl std::error::Error for MoonError {}
