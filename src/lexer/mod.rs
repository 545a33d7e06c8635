//! Lexical analysis module
//!
//! This module handles tokenization of moonlua source code, including the
//! per-line indentation tokens the parser's block structure is built from.

pub mod token;
pub mod scanner;

pub use token::{Token, TokenType, Keyword, NumberKind, RawStringPart, StringToken};
pub use scanner::Lexer;
