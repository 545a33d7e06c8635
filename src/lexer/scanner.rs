//! Lexer/Scanner implementation for moonlua
//!
//! Converts source text into tokens. Layout is reduced to one
//! `Indent(width)` token per non-blank line; blank lines vanish entirely.

use super::token::{Keyword, NumberKind, RawStringPart, StringToken, Token, TokenType};
use crate::error::{MoonError, MoonResult, SourceLocation};

/// Lexer for moonlua source code
pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    column: usize,
    at_line_start: bool,
    filename: Option<String>,
}

impl Lexer {
    /// Create a new lexer
    pub fn new(source: &str, filename: Option<&str>) -> Self {
        Self {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            at_line_start: true,
            filename: filename.map(|s| s.to_string()),
        }
    }

    /// Create a lexer for a source fragment embedded at `location`, such
    /// as the body of a string interpolation. No `Indent` token is emitted
    /// for the fragment's first line.
    pub fn starting_at(source: &str, location: &SourceLocation) -> Self {
        Self {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: location.line,
            column: location.column,
            at_line_start: false,
            filename: location.filename.clone(),
        }
    }

    /// Tokenize the source code
    pub fn tokenize(&mut self) -> MoonResult<Vec<Token>> {
        while !self.is_at_end() {
            self.start = self.current;
            if self.at_line_start {
                self.scan_line_start();
            } else {
                self.scan_token()?;
            }
        }

        self.tokens.push(Token::new(
            TokenType::Eof,
            String::new(),
            self.current_location(),
        ));

        Ok(std::mem::take(&mut self.tokens))
    }

    /// Measure leading whitespace and emit an `Indent` token unless the
    /// line turns out to be blank.
    fn scan_line_start(&mut self) {
        self.at_line_start = false;

        let mut width = 0;
        while matches!(self.peek(), ' ' | '\t') {
            self.advance();
            width += 1;
        }

        let blank = self.is_at_end()
            || self.peek() == '\n'
            || (self.peek() == '\r' && self.peek_next() == '\n');
        if blank {
            return;
        }

        let lexeme: String = self.source[self.start..self.current].iter().collect();
        let location = self.current_location();
        self.tokens
            .push(Token::new(TokenType::Indent(width), lexeme, location));
    }

    /// Scan a single token
    fn scan_token(&mut self) -> MoonResult<()> {
        let c = self.advance();

        match c {
            ' ' | '\r' | '\t' => Ok(()),

            '\n' => {
                self.line += 1;
                self.column = 1;
                self.at_line_start = true;
                Ok(())
            }

            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            '[' => self.add_token(TokenType::LeftBracket),
            ']' => self.add_token(TokenType::RightBracket),
            ',' => self.add_token(TokenType::Comma),
            ':' => self.add_token(TokenType::Colon),
            '\\' => self.add_token(TokenType::Backslash),
            '@' => self.add_token(TokenType::At),
            '#' => self.add_token(TokenType::Hash),
            '^' => self.add_token(TokenType::Caret),

            '-' => {
                if self.match_char('-') {
                    self.scan_comment()
                } else if self.match_char('>') {
                    self.add_token(TokenType::Arrow)
                } else if self.match_char('=') {
                    self.add_token(TokenType::MinusAssign)
                } else {
                    self.add_token(TokenType::Minus)
                }
            }

            '+' => self.with_assign(TokenType::Plus, TokenType::PlusAssign),
            '*' => self.with_assign(TokenType::Star, TokenType::StarAssign),
            '/' => self.with_assign(TokenType::Slash, TokenType::SlashAssign),
            '%' => self.with_assign(TokenType::Percent, TokenType::PercentAssign),

            '.' => {
                if self.match_char('.') {
                    self.with_assign(TokenType::Concat, TokenType::ConcatAssign)
                } else {
                    self.add_token(TokenType::Dot)
                }
            }

            '=' => {
                if self.match_char('=') {
                    self.add_token(TokenType::Equal)
                } else if self.match_char('>') {
                    self.add_token(TokenType::FatArrow)
                } else {
                    self.add_token(TokenType::Assign)
                }
            }

            '!' => {
                if self.match_char('=') {
                    self.add_token(TokenType::NotEqual)
                } else {
                    self.add_token(TokenType::Bang)
                }
            }

            '~' => {
                if self.match_char('=') {
                    self.add_token(TokenType::NotEqual)
                } else {
                    Err(self.error("Unexpected character '~'. Did you mean '~='?"))
                }
            }

            '<' => self.with_assign(TokenType::Less, TokenType::LessEqual),
            '>' => self.with_assign(TokenType::Greater, TokenType::GreaterEqual),

            '"' | '\'' => self.scan_string(c),

            c if c.is_ascii_digit() => self.scan_number(c),

            c if c.is_alphabetic() || c == '_' => self.scan_identifier(),

            _ => Err(self.error(&format!("Unexpected character '{}'", c))),
        }
    }

    /// Emit `compound` if the next character is `=`, `plain` otherwise
    fn with_assign(&mut self, plain: TokenType, compound: TokenType) -> MoonResult<()> {
        if self.match_char('=') {
            self.add_token(compound)
        } else {
            self.add_token(plain)
        }
    }

    /// Scan the rest of a `--` comment
    fn scan_comment(&mut self) -> MoonResult<()> {
        let mut text = String::new();
        while self.peek() != '\n' && !self.is_at_end() {
            text.push(self.advance());
        }
        if text.ends_with('\r') {
            text.pop();
        }
        self.add_token(TokenType::Comment(text))
    }

    /// Scan a string literal. Escapes are copied through untouched; inside
    /// double quotes `#{...}` starts an interpolation whose source is kept
    /// for the parser.
    fn scan_string(&mut self, delimiter: char) -> MoonResult<()> {
        let mut parts = Vec::new();
        let mut text = String::new();

        loop {
            if self.is_at_end() || self.peek() == '\n' {
                return Err(self.error("Unterminated string"));
            }

            let c = self.peek();
            if c == delimiter {
                self.advance();
                break;
            }

            if c == '\\' {
                text.push(self.advance());
                if self.is_at_end() || self.peek() == '\n' {
                    return Err(self.error("Unterminated string"));
                }
                text.push(self.advance());
                continue;
            }

            if delimiter == '"' && c == '#' && self.peek_next() == '{' {
                self.advance();
                self.advance();
                if !text.is_empty() {
                    parts.push(RawStringPart::Text(std::mem::take(&mut text)));
                }
                parts.push(self.scan_interpolation()?);
                continue;
            }

            text.push(self.advance());
        }

        if !text.is_empty() {
            parts.push(RawStringPart::Text(text));
        }

        self.add_token(TokenType::String(StringToken { delimiter, parts }))
    }

    /// Collect the source of an interpolation up to its matching `}`
    fn scan_interpolation(&mut self) -> MoonResult<RawStringPart> {
        let location = self.current_location();
        let mut source = String::new();
        let mut depth = 1;

        loop {
            if self.is_at_end() || self.peek() == '\n' {
                return Err(self.error("Unterminated string interpolation"));
            }
            let c = self.advance();
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            source.push(c);
        }

        Ok(RawStringPart::Interpolation { source, location })
    }

    /// Scan a number literal and classify it without touching its text
    fn scan_number(&mut self, first: char) -> MoonResult<()> {
        let mut kind = NumberKind::Integer;

        let hex = first == '0' && matches!(self.peek(), 'x' | 'X');
        if hex && self.peek_next().is_ascii_hexdigit() {
            self.advance();
            while self.peek().is_ascii_hexdigit() {
                self.advance();
            }
        } else {
            while self.peek().is_ascii_digit() {
                self.advance();
            }

            if self.peek() == '.' && self.peek_next().is_ascii_digit() {
                self.advance();
                while self.peek().is_ascii_digit() {
                    self.advance();
                }
                kind = NumberKind::Float;
            }

            if matches!(self.peek(), 'e' | 'E') {
                let signed = matches!(self.peek_next(), '+' | '-');
                let digit_at = if signed { 2 } else { 1 };
                if self.peek_at(digit_at).is_ascii_digit() {
                    for _ in 0..digit_at {
                        self.advance();
                    }
                    while self.peek().is_ascii_digit() {
                        self.advance();
                    }
                    kind = NumberKind::Exponent;
                }
            }
        }

        if self.peek().is_alphanumeric() || self.peek() == '_' {
            let lexeme: String = self.source[self.start..=self.current].iter().collect();
            return Err(self.error(&format!("Malformed number literal '{}'", lexeme)));
        }

        self.add_token(TokenType::Number(kind))
    }

    /// Scan an identifier or keyword
    fn scan_identifier(&mut self) -> MoonResult<()> {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let lexeme: String = self.source[self.start..self.current].iter().collect();

        let token_type = if let Some(keyword) = Keyword::from_str(&lexeme) {
            TokenType::Keyword(keyword)
        } else {
            TokenType::Identifier
        };

        self.add_token(token_type)
    }

    fn add_token(&mut self, token_type: TokenType) -> MoonResult<()> {
        let lexeme: String = self.source[self.start..self.current].iter().collect();
        let location = SourceLocation::new(
            self.line,
            self.column - (self.current - self.start),
            self.filename.clone(),
        );
        self.tokens.push(Token::new(token_type, lexeme, location));
        Ok(())
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        self.column += 1;
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            false
        } else {
            self.current += 1;
            self.column += 1;
            true
        }
    }

    fn peek(&self) -> char {
        self.peek_at(0)
    }

    fn peek_next(&self) -> char {
        self.peek_at(1)
    }

    fn peek_at(&self, offset: usize) -> char {
        self.source
            .get(self.current + offset)
            .copied()
            .unwrap_or('\0')
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.filename.clone())
    }

    fn error(&self, message: &str) -> MoonError {
        MoonError::lexer_error(message, self.current_location())
    }
}
