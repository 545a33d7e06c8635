//! Parser implementation
//!
//! A single recursive-descent pass over the token stream. Every line starts
//! with an `Indent(width)` token; blocks are recovered by comparing that
//! width with the innermost width held by the [`IndentTracker`].
//!
//! Inside `()`, `[]` and `{}` line starts are skipped, so bracketed
//! expressions may span lines. A function body opened there is still an
//! indented block and temporarily restores line sensitivity.

use super::ast::*;
use super::indent::{IndentError, IndentTracker};
use crate::error::{MoonError, MoonResult, SourceLocation};
use crate::lexer::{Keyword, Lexer, RawStringPart, StringToken, Token, TokenType};
use crate::trace::{NoTrace, TraceSink};

/// Parser for moonlua tokens
pub struct Parser<'a> {
    tokens: Vec<Token>,
    current: usize,
    indents: IndentTracker,
    bracket_depth: usize,
    trace: Box<dyn TraceSink + 'a>,
}

impl<'a> Parser<'a> {
    /// Create a new parser from tokens
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.token_type), Some(TokenType::Eof)) {
            let location = tokens
                .last()
                .map(|t| t.location.clone())
                .unwrap_or_else(|| SourceLocation::at(1, 1));
            tokens.push(Token::new(TokenType::Eof, String::new(), location));
        }

        Self {
            tokens,
            current: 0,
            indents: IndentTracker::new(),
            bracket_depth: 0,
            trace: Box::new(NoTrace),
        }
    }

    /// Report block bookkeeping to `trace`
    pub fn with_trace(mut self, trace: impl TraceSink + 'a) -> Self {
        self.trace = Box::new(trace);
        self
    }

    /// Parse tokens into an AST. The program is a block at width 0.
    pub fn parse(&mut self) -> MoonResult<Ast> {
        self.indents.push(0).map_err(|e| self.indent_error(e))?;
        self.trace.event("indent", "open block at 0");

        let block = self.block()?;

        if !self.is_at_end() {
            return Err(self.unexpected());
        }
        let width = self.indents.pop().map_err(|e| self.indent_error(e))?;
        self.trace.event("indent", &format!("close block at {}", width));

        Ok(Ast { block })
    }

    /// Parse a standalone expression, as found inside `#{...}`
    pub fn parse_fragment(&mut self) -> MoonResult<Expr> {
        self.bracket_depth = 1;
        self.skip_breaks();
        let expr = self.expression()?;
        self.skip_breaks();

        if !self.is_at_end() {
            return Err(self.unexpected());
        }
        Ok(expr)
    }

    // ===== Blocks =====

    /// Statements at the innermost open width, up to the first line that
    /// dedents out of it
    fn block(&mut self) -> MoonResult<Block> {
        let width = self
            .indents
            .current()
            .ok_or_else(|| MoonError::internal_error("block parsed with no open indentation"))?;
        let mut statements = Vec::new();

        loop {
            let line_width = match self.peek().token_type {
                TokenType::Indent(w) => w,
                TokenType::Eof => break,
                _ => return Err(self.unexpected()),
            };

            if let TokenType::Comment(text) = &self.peek_next().token_type {
                // Comment lines never move block boundaries; one that sits
                // left of this block stays here only if code follows in it.
                let stays = line_width >= width
                    || self.next_line_width().map_or(false, |next| next >= width);
                if !stays {
                    break;
                }
                let text = text.clone();
                self.advance();
                self.advance();
                statements.push(Stmt::Comment { text });
                continue;
            }

            if line_width > width {
                return Err(self.error_here("unexpected indentation"));
            }

            if line_width < width {
                let closed = self
                    .indents
                    .resolve_dedent(line_width)
                    .map_err(|e| self.indent_error(e))?;
                self.trace.event(
                    "indent",
                    &format!("line at {} closes {} block(s)", line_width, closed),
                );
                break;
            }

            self.advance();
            statements.push(self.statement()?);
            self.end_of_line()?;
        }

        Ok(Block::new(statements))
    }

    /// The body following a block header on the next, deeper line
    fn open_block(&mut self, construct: &str) -> MoonResult<Block> {
        self.skip_comment();
        if !self.at_line_end() {
            return Err(self.error_here(&format!(
                "expected end of line after '{}' header, found {}",
                construct,
                self.peek().token_type
            )));
        }

        let header_width = self.indents.current().unwrap_or(0);
        match self.next_line_width() {
            Some(width) if width > header_width => self.nested_block(width),
            _ => Err(self.error_here(&format!(
                "expected an indented block after '{}'",
                construct
            ))),
        }
    }

    fn nested_block(&mut self, width: usize) -> MoonResult<Block> {
        let pushed = if self.bracket_depth > 0 {
            self.indents.push_in_brackets(width)
        } else {
            self.indents.push(width)
        };
        pushed.map_err(|e| self.indent_error(e))?;
        self.trace.event(
            "indent",
            &format!("open block at {} (depth {})", width, self.indents.depth()),
        );

        let saved_depth = std::mem::replace(&mut self.bracket_depth, 0);
        let body = self.block();
        self.bracket_depth = saved_depth;
        let body = body?;

        let closed = self.indents.pop().map_err(|e| self.indent_error(e))?;
        self.trace.event("indent", &format!("close block at {}", closed));
        Ok(body)
    }

    /// Width of the first upcoming line that holds code
    fn next_line_width(&self) -> Option<usize> {
        let mut index = self.current;
        while let Some(token) = self.tokens.get(index) {
            match token.token_type {
                TokenType::Indent(width) => {
                    let comment_only = matches!(
                        self.tokens.get(index + 1).map(|t| &t.token_type),
                        Some(TokenType::Comment(_))
                    );
                    if !comment_only {
                        return Some(width);
                    }
                }
                TokenType::Comment(_) => {}
                _ => return None,
            }
            index += 1;
        }
        None
    }

    /// Width of the line the parser is currently on
    fn line_width(&self) -> usize {
        self.tokens[..self.current]
            .iter()
            .rev()
            .find_map(|token| match token.token_type {
                TokenType::Indent(width) => Some(width),
                _ => None,
            })
            .unwrap_or(0)
    }

    fn end_of_line(&mut self) -> MoonResult<()> {
        self.skip_comment();
        if self.at_line_end() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn at_line_end(&self) -> bool {
        matches!(
            self.peek().token_type,
            TokenType::Indent(_) | TokenType::Eof | TokenType::Comment(_)
        )
    }

    fn skip_comment(&mut self) {
        if let TokenType::Comment(_) = self.peek().token_type {
            self.advance();
        }
    }

    /// Skip line starts and comments while inside brackets. Returns whether
    /// anything was skipped.
    fn skip_breaks(&mut self) -> bool {
        if self.bracket_depth == 0 {
            return false;
        }
        let mut skipped = false;
        while matches!(
            self.peek().token_type,
            TokenType::Indent(_) | TokenType::Comment(_)
        ) {
            self.advance();
            skipped = true;
        }
        skipped
    }

    // ===== Statements =====

    fn statement(&mut self) -> MoonResult<Stmt> {
        if self.match_keyword(Keyword::If) {
            self.if_statement()
        } else if self.match_keyword(Keyword::While) {
            self.while_statement()
        } else if self.match_keyword(Keyword::For) {
            self.for_statement()
        } else if self.match_keyword(Keyword::Return) {
            self.return_statement()
        } else if self.match_keyword(Keyword::Break) {
            Ok(Stmt::FlowControl {
                kind: FlowControl::Break,
            })
        } else if self.match_keyword(Keyword::Continue) {
            Ok(Stmt::FlowControl {
                kind: FlowControl::Continue,
            })
        } else {
            self.assignment_or_expression()
        }
    }

    fn if_statement(&mut self) -> MoonResult<Stmt> {
        let condition = self.expression()?;
        let mut body = self.open_block("if")?;

        let mut else_ifs: Vec<ElseIf> = Vec::new();
        let mut else_body = None;

        loop {
            let is_else_if = self.continues_with(Keyword::ElseIf);
            if !is_else_if && !self.continues_with(Keyword::Else) {
                break;
            }

            // Comments between a clause and the next one stay with the first
            let comments = self.comment_lines();
            match else_ifs.last_mut() {
                Some(clause) => clause.body.statements.extend(comments),
                None => body.statements.extend(comments),
            }

            self.advance();
            self.advance();
            if is_else_if {
                let condition = self.expression()?;
                let body = self.open_block("elseif")?;
                else_ifs.push(ElseIf { condition, body });
            } else {
                else_body = Some(self.open_block("else")?);
                break;
            }
        }

        Ok(Stmt::If {
            condition,
            body,
            else_ifs,
            else_body,
        })
    }

    /// Whether the next code line sits at the current width and opens with
    /// `keyword`. Comment-only lines in between are looked through.
    fn continues_with(&self, keyword: Keyword) -> bool {
        let mut index = self.current;
        loop {
            let line_start = self.tokens.get(index).map(|t| &t.token_type);
            let first = self.tokens.get(index + 1).map(|t| &t.token_type);
            match (line_start, first) {
                (Some(TokenType::Indent(_)), Some(TokenType::Comment(_))) => index += 2,
                (Some(TokenType::Indent(width)), Some(TokenType::Keyword(k))) => {
                    return Some(*width) == self.indents.current() && *k == keyword;
                }
                _ => return false,
            }
        }
    }

    /// Consume consecutive comment-only lines
    fn comment_lines(&mut self) -> Vec<Stmt> {
        let mut comments = Vec::new();
        while let (TokenType::Indent(_), TokenType::Comment(text)) =
            (&self.peek().token_type, &self.peek_next().token_type)
        {
            let text = text.clone();
            self.advance();
            self.advance();
            comments.push(Stmt::Comment { text });
        }
        comments
    }

    fn while_statement(&mut self) -> MoonResult<Stmt> {
        let condition = self.expression()?;
        let body = self.open_block("while")?;
        Ok(Stmt::While { condition, body })
    }

    fn for_statement(&mut self) -> MoonResult<Stmt> {
        let name = self.consume_identifier("Expected loop variable after 'for'")?;

        if self.match_token(TokenType::Assign) {
            let start = self.expression()?;
            self.consume(TokenType::Comma, "Expected ',' after for start value")?;
            let end = self.expression()?;
            let step = if self.match_token(TokenType::Comma) {
                Some(self.expression()?)
            } else {
                None
            };
            let body = self.open_block("for")?;

            return Ok(Stmt::NumericFor {
                index: name,
                start,
                end,
                step,
                body,
            });
        }

        let mut names = vec![name];
        while self.match_token(TokenType::Comma) {
            names.push(self.consume_identifier("Expected loop variable after ','")?);
        }
        self.consume_keyword(Keyword::In, "Expected '=' or 'in' after for variables")?;
        let source = self.expression_list()?;
        let body = self.open_block("for")?;

        Ok(Stmt::ForEach {
            names,
            source,
            body,
        })
    }

    fn return_statement(&mut self) -> MoonResult<Stmt> {
        let values = if self.at_line_end() {
            ExprList::empty()
        } else {
            self.expression_list()?
        };
        Ok(Stmt::Return { values })
    }

    fn assignment_or_expression(&mut self) -> MoonResult<Stmt> {
        let first = self.expression()?;

        if self.check(TokenType::Comma) || self.check(TokenType::Assign) {
            let mut lhs = vec![first];
            while self.match_token(TokenType::Comma) {
                lhs.push(self.expression()?);
            }

            let location = self.peek().location.clone();
            self.consume(TokenType::Assign, "Expected '=' after assignment targets")?;

            let targets = lhs
                .into_iter()
                .map(|expr| Self::assign_target(expr, &location))
                .collect::<MoonResult<Vec<_>>>()?;
            let values = self.expression_list()?;

            return Ok(Stmt::Assignment { targets, values });
        }

        if let Some(operator) = self.compound_operator() {
            let location = self.advance().location.clone();
            let target = Self::assign_target(first.clone(), &location)?;

            let value = match self.expression()? {
                chain @ Expr::Binary(_) => Expr::Parens {
                    expr: Box::new(chain),
                },
                other => other,
            };
            let updated = Expr::Binary(BinaryChain {
                head: Box::new(first),
                rest: vec![(operator, value)],
            });

            return Ok(Stmt::Assignment {
                targets: vec![target],
                values: ExprList::new(vec![updated]),
            });
        }

        Ok(Stmt::Expression { expr: first })
    }

    fn assign_target(expr: Expr, location: &SourceLocation) -> MoonResult<AssignTarget> {
        match expr {
            Expr::Ref { name } => Ok(AssignTarget::Name { name }),
            Expr::SelfRef { name } if !name.is_empty() => Ok(AssignTarget::SelfField { name }),
            Expr::Chain(chain) => match chain.ops.last() {
                Some(ChainOp::Dot { .. }) | Some(ChainOp::Index { .. }) => {
                    Ok(AssignTarget::Chain(chain))
                }
                _ => Err(MoonError::parse_error(
                    "Cannot assign to the result of a call",
                    location.clone(),
                )),
            },
            other => Err(MoonError::parse_error(
                format!("Cannot assign to {}", other.kind()),
                location.clone(),
            )),
        }
    }

    fn compound_operator(&self) -> Option<BinaryOp> {
        match self.peek().token_type {
            TokenType::PlusAssign => Some(BinaryOp::Add),
            TokenType::MinusAssign => Some(BinaryOp::Subtract),
            TokenType::StarAssign => Some(BinaryOp::Multiply),
            TokenType::SlashAssign => Some(BinaryOp::Divide),
            TokenType::PercentAssign => Some(BinaryOp::Modulo),
            TokenType::ConcatAssign => Some(BinaryOp::Concat),
            _ => None,
        }
    }

    // ===== Expressions =====

    fn expression_list(&mut self) -> MoonResult<ExprList> {
        let mut exprs = vec![self.expression()?];
        while self.match_token(TokenType::Comma) {
            self.skip_breaks();
            exprs.push(self.expression()?);
        }
        Ok(ExprList::new(exprs))
    }

    /// `head (op value)*` with operators kept in the order written. Inside
    /// brackets a line starting with `-` begins a new negated value rather
    /// than continuing the chain.
    fn expression(&mut self) -> MoonResult<Expr> {
        let head = self.unary()?;
        let mut rest = Vec::new();

        loop {
            let checkpoint = self.current;
            let new_line = self.skip_breaks();
            let operator = match self.binary_operator() {
                Some(BinaryOp::Subtract) if new_line => None,
                operator => operator,
            };
            let Some(operator) = operator else {
                self.current = checkpoint;
                break;
            };
            self.advance();
            self.skip_breaks();
            rest.push((operator, self.unary()?));
        }

        if rest.is_empty() {
            Ok(head)
        } else {
            Ok(Expr::Binary(BinaryChain {
                head: Box::new(head),
                rest,
            }))
        }
    }

    fn binary_operator(&self) -> Option<BinaryOp> {
        match &self.peek().token_type {
            TokenType::Plus => Some(BinaryOp::Add),
            TokenType::Minus => Some(BinaryOp::Subtract),
            TokenType::Star => Some(BinaryOp::Multiply),
            TokenType::Slash => Some(BinaryOp::Divide),
            TokenType::Percent => Some(BinaryOp::Modulo),
            TokenType::Caret => Some(BinaryOp::Power),
            TokenType::Concat => Some(BinaryOp::Concat),
            TokenType::Equal => Some(BinaryOp::Equal),
            TokenType::NotEqual => Some(BinaryOp::NotEqual),
            TokenType::Less => Some(BinaryOp::Less),
            TokenType::LessEqual => Some(BinaryOp::LessEqual),
            TokenType::Greater => Some(BinaryOp::Greater),
            TokenType::GreaterEqual => Some(BinaryOp::GreaterEqual),
            TokenType::Keyword(Keyword::And) => Some(BinaryOp::And),
            TokenType::Keyword(Keyword::Or) => Some(BinaryOp::Or),
            _ => None,
        }
    }

    fn unary(&mut self) -> MoonResult<Expr> {
        let operator = if self.match_keyword(Keyword::Not) {
            UnaryOp::Not
        } else if self.match_token(TokenType::Minus) {
            UnaryOp::Negate
        } else if self.match_token(TokenType::Hash) {
            UnaryOp::Length
        } else {
            return self.postfix();
        };

        let operand = Box::new(self.unary()?);
        Ok(Expr::Unary { operator, operand })
    }

    /// A primary expression followed by call, field, method and index
    /// operations
    fn postfix(&mut self) -> MoonResult<Expr> {
        let target = self.primary()?;
        let mut ops = Vec::new();

        loop {
            if self.match_token(TokenType::LeftParen) {
                let args = self.call_arguments()?;
                ops.push(ChainOp::Call { args });
            } else if self.match_token(TokenType::Bang) {
                ops.push(ChainOp::Call {
                    args: ExprList::empty(),
                });
            } else if self.match_token(TokenType::Dot) {
                let field = self.consume_identifier("Expected field name after '.'")?;
                ops.push(ChainOp::Dot { field });
            } else if self.match_token(TokenType::Backslash) {
                let field = self.consume_identifier("Expected method name after '\\'")?;
                if !self.check(TokenType::LeftParen) && !self.check(TokenType::Bang) {
                    return Err(self.error_here(&format!("Method '{}' must be called", field)));
                }
                ops.push(ChainOp::Method { field });
            } else if self.match_token(TokenType::LeftBracket) {
                self.bracket_depth += 1;
                self.skip_breaks();
                let index = self.expression()?;
                self.skip_breaks();
                self.consume(TokenType::RightBracket, "Expected ']' after index")?;
                self.bracket_depth -= 1;
                ops.push(ChainOp::Index { index });
            } else {
                break;
            }
        }

        if ops.is_empty() {
            Ok(target)
        } else {
            Ok(Expr::Chain(Chain {
                target: Box::new(target),
                ops,
            }))
        }
    }

    fn call_arguments(&mut self) -> MoonResult<ExprList> {
        self.bracket_depth += 1;
        self.skip_breaks();

        let mut args = Vec::new();
        if !self.check(TokenType::RightParen) {
            loop {
                args.push(self.expression()?);
                self.skip_breaks();
                if !self.match_token(TokenType::Comma) {
                    break;
                }
                self.skip_breaks();
            }
        }

        self.consume(TokenType::RightParen, "Expected ')' after arguments")?;
        self.bracket_depth -= 1;
        Ok(ExprList::new(args))
    }

    fn primary(&mut self) -> MoonResult<Expr> {
        let token = self.peek().clone();

        match token.token_type {
            TokenType::Number(kind) => {
                self.advance();
                Ok(Expr::Number(Number {
                    kind,
                    text: token.lexeme,
                }))
            }
            TokenType::String(string) => {
                self.advance();
                self.string_literal(string)
            }
            TokenType::Keyword(Keyword::True | Keyword::False | Keyword::Nil) => {
                self.advance();
                Ok(Expr::Primitive {
                    value: token.lexeme,
                })
            }
            TokenType::Identifier => {
                self.advance();
                Ok(Expr::Ref { name: token.lexeme })
            }
            TokenType::At => {
                self.advance();
                let name = if self.check(TokenType::Identifier) {
                    self.advance().lexeme.clone()
                } else {
                    String::new()
                };
                Ok(Expr::SelfRef { name })
            }
            TokenType::LeftParen if self.is_function_header() => self.function_expression(),
            TokenType::LeftParen => {
                self.advance();
                self.bracket_depth += 1;
                self.skip_breaks();
                let expr = self.expression()?;
                self.skip_breaks();
                self.consume(TokenType::RightParen, "Expected ')' after expression")?;
                self.bracket_depth -= 1;
                Ok(Expr::Parens {
                    expr: Box::new(expr),
                })
            }
            TokenType::Arrow | TokenType::FatArrow => self.function_expression(),
            TokenType::LeftBrace => self.table(),
            other => Err(self.error_here(&format!("Expected expression, found {}", other))),
        }
    }

    fn string_literal(&mut self, string: StringToken) -> MoonResult<Expr> {
        let parts = string
            .parts
            .into_iter()
            .map(|part| match part {
                RawStringPart::Text(text) => Ok(StringPart::Text { text }),
                RawStringPart::Interpolation { source, location } => {
                    let tokens = Lexer::starting_at(&source, &location).tokenize()?;
                    let expr = Parser::new(tokens).parse_fragment()?;
                    Ok(StringPart::Interpolation {
                        expr: Box::new(expr),
                    })
                }
            })
            .collect::<MoonResult<Vec<_>>>()?;

        Ok(Expr::String(StringLiteral {
            delimiter: string.delimiter,
            parts,
        }))
    }

    /// Whether the `(` at the cursor opens a parameter list, i.e. its
    /// matching `)` is followed by `->` or `=>`
    fn is_function_header(&self) -> bool {
        let mut depth = 0usize;
        for (index, token) in self.tokens.iter().enumerate().skip(self.current) {
            match token.token_type {
                TokenType::LeftParen => depth += 1,
                TokenType::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return matches!(
                            self.tokens.get(index + 1).map(|t| &t.token_type),
                            Some(TokenType::Arrow | TokenType::FatArrow)
                        );
                    }
                }
                TokenType::Eof => return false,
                _ => {}
            }
        }
        false
    }

    fn function_expression(&mut self) -> MoonResult<Expr> {
        let mut params = Vec::new();

        if self.match_token(TokenType::LeftParen) {
            self.bracket_depth += 1;
            self.skip_breaks();
            if !self.check(TokenType::RightParen) {
                loop {
                    let name = self.consume_identifier("Expected parameter name")?;
                    let default = if self.match_token(TokenType::Assign) {
                        Some(self.expression()?)
                    } else {
                        None
                    };
                    params.push(Param { name, default });

                    self.skip_breaks();
                    if !self.match_token(TokenType::Comma) {
                        break;
                    }
                    self.skip_breaks();
                }
            }
            self.consume(TokenType::RightParen, "Expected ')' after parameters")?;
            self.bracket_depth -= 1;
        }

        let is_method = if self.match_token(TokenType::FatArrow) {
            true
        } else {
            self.consume(TokenType::Arrow, "Expected '->' or '=>' after parameters")?;
            false
        };

        let body = self.function_body()?;

        Ok(Expr::Function(FunctionExpr {
            is_method,
            params,
            body,
        }))
    }

    /// An indented block on the following lines, nothing at all, or an
    /// inline expression that becomes the returned value
    fn function_body(&mut self) -> MoonResult<Block> {
        let closes_brackets = matches!(
            self.peek().token_type,
            TokenType::RightParen
                | TokenType::RightBrace
                | TokenType::RightBracket
                | TokenType::Comma
        );
        if closes_brackets {
            return Ok(Block::default());
        }

        if !self.at_line_end() {
            let value = self.expression()?;
            return Ok(Block::new(vec![Stmt::Return {
                values: ExprList::new(vec![value]),
            }]));
        }

        self.skip_comment();
        let header_width = if self.bracket_depth == 0 {
            self.indents.current().unwrap_or(0)
        } else {
            self.line_width()
        };
        match self.next_line_width() {
            Some(width) if width > header_width => self.nested_block(width),
            _ => Ok(Block::default()),
        }
    }

    fn table(&mut self) -> MoonResult<Expr> {
        self.consume(TokenType::LeftBrace, "Expected '{'")?;
        self.bracket_depth += 1;

        let mut entries = Vec::new();
        let mut separated = true;

        loop {
            if self.skip_breaks() {
                separated = true;
            }
            if self.check(TokenType::RightBrace) {
                break;
            }
            if !separated {
                return Err(self.error_here("Expected ',' or a new line between table entries"));
            }

            entries.push(self.table_entry()?);

            separated = self.skip_breaks();
            if self.match_token(TokenType::Comma) {
                separated = true;
            }
        }

        self.consume(TokenType::RightBrace, "Expected '}' after table entries")?;
        self.bracket_depth -= 1;

        Ok(Expr::Table(Table { entries }))
    }

    fn table_entry(&mut self) -> MoonResult<TableEntry> {
        if self.match_token(TokenType::LeftBracket) {
            self.skip_breaks();
            let key = self.expression()?;
            self.skip_breaks();
            self.consume(TokenType::RightBracket, "Expected ']' after table key")?;
            self.consume(TokenType::Colon, "Expected ':' after table key")?;
            self.skip_breaks();
            let value = self.expression()?;
            return Ok(TableEntry {
                key: Some(TableKey::Expr { expr: key }),
                value,
            });
        }

        let keyed = matches!(self.peek_next().token_type, TokenType::Colon);

        if keyed && self.check(TokenType::Identifier) {
            let name = self.advance().lexeme.clone();
            self.advance();
            self.skip_breaks();
            let value = self.expression()?;
            return Ok(TableEntry {
                key: Some(TableKey::Name { name }),
                value,
            });
        }

        if keyed && matches!(self.peek().token_type, TokenType::String(_)) {
            let key = self.primary()?;
            self.advance();
            self.skip_breaks();
            let value = self.expression()?;
            return Ok(TableEntry {
                key: Some(TableKey::Expr { expr: key }),
                value,
            });
        }

        let value = self.expression()?;
        Ok(TableEntry { key: None, value })
    }

    // ===== Helper Methods =====

    fn match_token(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, token_type: TokenType) -> bool {
        if self.is_at_end() {
            false
        } else {
            std::mem::discriminant(&self.peek().token_type) == std::mem::discriminant(&token_type)
        }
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        if self.is_at_end() {
            false
        } else {
            matches!(&self.peek().token_type, TokenType::Keyword(k) if k == &keyword)
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_next(&self) -> &Token {
        let index = (self.current + 1).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> MoonResult<&Token> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(self.error_here(message))
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword, message: &str) -> MoonResult<&Token> {
        if self.check_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.error_here(message))
        }
    }

    fn consume_identifier(&mut self, message: &str) -> MoonResult<String> {
        if self.check(TokenType::Identifier) {
            Ok(self.advance().lexeme.clone())
        } else {
            Err(self.error_here(message))
        }
    }

    fn error_here(&self, message: &str) -> MoonError {
        MoonError::parse_error(message, self.peek().location.clone())
    }

    fn unexpected(&self) -> MoonError {
        let token = self.peek();
        let message = match token.token_type {
            TokenType::Eof | TokenType::Indent(_) => format!("Unexpected {}", token.token_type),
            _ => format!("Unexpected {} '{}'", token.token_type, token.lexeme),
        };
        MoonError::parse_error(message, token.location.clone())
    }

    fn indent_error(&self, error: IndentError) -> MoonError {
        MoonError::parse_error(error.to_string(), self.peek().location.clone())
    }
}
