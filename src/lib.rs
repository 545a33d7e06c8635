//! # moonlua
//!
//! A source-to-source translator from an indentation-sensitive,
//! MoonScript-flavoured language to plain Lua.
//!
//! ## Architecture
//!
//! The pipeline runs in three passes over owned data:
//! - `lexer`: Tokenization, one `Indent` token at the start of every line
//! - `parser`: Recursive descent into a closed AST, blocks recovered from
//!   indentation by an explicit indent tracker
//! - `codegen`: Lua emission, indentation derived from tree nesting only
//! - `trace`: Optional sink for parser bookkeeping events
//! - `error`: Error handling and diagnostics

pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod trace;

// Re-export commonly used types
pub use codegen::{Generator, RenderOptions};
pub use error::{Diagnostic, MoonError, MoonResult, SourceLocation};
pub use lexer::{Lexer, Token, TokenType};
pub use parser::{Ast, Parser};

/// Version of the translator
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options for a full source to Lua translation
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Attached to the location of every syntax error
    pub filename: Option<String>,
    pub render: RenderOptions,
}

impl CompileOptions {
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }
}

/// Lex and parse `source` into an AST
pub fn parse(source: &str, filename: Option<&str>) -> MoonResult<Ast> {
    let tokens = Lexer::new(source, filename).tokenize()?;
    Parser::new(tokens).parse()
}

/// Translate `source` to Lua with the default two-space indentation
pub fn compile(source: &str, filename: Option<&str>) -> MoonResult<String> {
    let options = CompileOptions {
        filename: filename.map(str::to_string),
        ..CompileOptions::default()
    };
    compile_with(source, &options)
}

/// Translate `source` to Lua
///
/// Syntax errors abort before any output is produced; a node the generator
/// cannot express aborts the whole translation with a `RenderError`.
pub fn compile_with(source: &str, options: &CompileOptions) -> MoonResult<String> {
    let ast = parse(source, options.filename.as_deref())?;
    Generator::new(options.render.clone()).generate(&ast)
}
