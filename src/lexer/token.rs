//! Token definitions for moonlua source
//!
//! Besides the usual operators and delimiters the lexer emits one
//! `Indent(width)` token at the start of every non-blank line. Those tokens
//! are the only place leading whitespace survives lexing; the parser feeds
//! them to its indent tracker to recover block structure.

use crate::error::SourceLocation;
use serde::Serialize;
use std::fmt;

/// A token in moonlua source
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    /// Create a new token
    pub fn new(token_type: TokenType, lexeme: String, location: SourceLocation) -> Self {
        Self {
            token_type,
            lexeme,
            location,
        }
    }
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Literals
    Number(NumberKind),
    String(StringToken),

    // Identifiers and keywords
    Identifier,
    Keyword(Keyword),

    // Arithmetic
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    Caret,      // ^
    Concat,     // ..

    // Comparison
    Equal,          // ==
    NotEqual,       // != or ~=
    Less,           // <
    LessEqual,      // <=
    Greater,        // >
    GreaterEqual,   // >=

    // Assignment
    Assign,         // =
    PlusAssign,     // +=
    MinusAssign,    // -=
    StarAssign,     // *=
    SlashAssign,    // /=
    PercentAssign,  // %=
    ConcatAssign,   // ..=

    // Functions
    Arrow,          // ->
    FatArrow,       // =>

    // Delimiters
    LeftParen,      // (
    RightParen,     // )
    LeftBrace,      // {
    RightBrace,     // }
    LeftBracket,    // [
    RightBracket,   // ]
    Comma,          // ,
    Dot,            // .
    Colon,          // :
    Backslash,      // \ (method access)
    At,             // @ (self reference)
    Bang,           // ! (call without arguments)
    Hash,           // # (length)

    // Layout
    /// Start of a line, carrying its leading-whitespace width
    Indent(usize),
    /// `-- text`, the text after the dashes kept verbatim
    Comment(String),
    Eof,
}

/// Keywords
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Keyword {
    If,
    ElseIf,
    Else,
    While,
    For,
    In,
    Return,
    Break,
    Continue,
    And,
    Or,
    Not,
    True,
    False,
    Nil,
}

impl Keyword {
    /// Get keyword from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "if" => Some(Self::If),
            "elseif" => Some(Self::ElseIf),
            "else" => Some(Self::Else),
            "while" => Some(Self::While),
            "for" => Some(Self::For),
            "in" => Some(Self::In),
            "return" => Some(Self::Return),
            "break" => Some(Self::Break),
            "continue" => Some(Self::Continue),
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "not" => Some(Self::Not),
            "true" => Some(Self::True),
            "false" => Some(Self::False),
            "nil" => Some(Self::Nil),
            _ => None,
        }
    }

    /// Get string representation of keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::If => "if",
            Self::ElseIf => "elseif",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::In => "in",
            Self::Return => "return",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::True => "true",
            Self::False => "false",
            Self::Nil => "nil",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of a number literal. The literal text itself is the
/// token lexeme and is never reformatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NumberKind {
    Integer,
    Float,
    Exponent,
}

/// A scanned string literal, split into raw text and interpolation sources
#[derive(Debug, Clone, PartialEq)]
pub struct StringToken {
    pub delimiter: char,
    pub parts: Vec<RawStringPart>,
}

/// One segment of a string literal as the scanner saw it
#[derive(Debug, Clone, PartialEq)]
pub enum RawStringPart {
    /// Literal characters, escapes left untouched
    Text(String),
    /// The source between `#{` and `}`, plus where it starts
    Interpolation {
        source: String,
        location: SourceLocation,
    },
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(kind) => write!(f, "{:?} literal", kind),
            Self::String(_) => write!(f, "string literal"),
            Self::Identifier => write!(f, "identifier"),
            Self::Keyword(kw) => write!(f, "keyword '{}'", kw),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Percent => write!(f, "%"),
            Self::Caret => write!(f, "^"),
            Self::Concat => write!(f, ".."),
            Self::Equal => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
            Self::Less => write!(f, "<"),
            Self::LessEqual => write!(f, "<="),
            Self::Greater => write!(f, ">"),
            Self::GreaterEqual => write!(f, ">="),
            Self::Assign => write!(f, "="),
            Self::PlusAssign => write!(f, "+="),
            Self::MinusAssign => write!(f, "-="),
            Self::StarAssign => write!(f, "*="),
            Self::SlashAssign => write!(f, "/="),
            Self::PercentAssign => write!(f, "%="),
            Self::ConcatAssign => write!(f, "..="),
            Self::Arrow => write!(f, "->"),
            Self::FatArrow => write!(f, "=>"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::LeftBracket => write!(f, "["),
            Self::RightBracket => write!(f, "]"),
            Self::Comma => write!(f, ","),
            Self::Dot => write!(f, "."),
            Self::Colon => write!(f, ":"),
            Self::Backslash => write!(f, "\\"),
            Self::At => write!(f, "@"),
            Self::Bang => write!(f, "!"),
            Self::Hash => write!(f, "#"),
            Self::Indent(width) => write!(f, "line start (indent {})", width),
            Self::Comment(_) => write!(f, "comment"),
            Self::Eof => write!(f, "end of file"),
        }
    }
}
