//! moonlua CLI
//!
//! Translates one source file and prints the Lua to stdout.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;

use moonlua::codegen::{Generator, RenderOptions};
use moonlua::trace::StderrTrace;
use moonlua::{Diagnostic, Lexer, MoonError, Parser, Token, VERSION};

#[derive(ClapParser)]
#[command(name = "moonlua")]
#[command(version = VERSION)]
#[command(about = "Translate indentation-based moonlua source to Lua", long_about = None)]
struct Cli {
    /// Source file to translate
    input: PathBuf,

    /// Print the parsed AST as JSON instead of Lua
    #[arg(long)]
    json: bool,

    /// Show tokenization output (lexer only)
    #[arg(short, long)]
    tokens: bool,

    /// Report indentation bookkeeping on stderr while parsing
    #[arg(long)]
    trace: bool,

    /// Spaces per nesting level in the generated Lua
    #[arg(long, default_value_t = 2, conflicts_with = "tabs")]
    indent_width: usize,

    /// Indent the generated Lua with tabs
    #[arg(long)]
    tabs: bool,
}

fn main() {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read file '{}': {}", cli.input.display(), e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &source) {
        eprintln!("{}", Diagnostic::with_source(e, &source).format());
        process::exit(1);
    }
}

fn run(cli: &Cli, source: &str) -> Result<(), MoonError> {
    let filename = cli.input.to_string_lossy().into_owned();
    let tokens = Lexer::new(source, Some(filename.as_str())).tokenize()?;

    if cli.tokens {
        show_tokens(&filename, &tokens);
        return Ok(());
    }

    let mut parser = Parser::new(tokens);
    if cli.trace {
        parser = parser.with_trace(StderrTrace);
    }
    let ast = parser.parse()?;

    if cli.json {
        let json = serde_json::to_string_pretty(&ast)
            .map_err(|e| MoonError::internal_error(format!("failed to serialize AST: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    let options = if cli.tabs {
        RenderOptions::tabs()
    } else {
        RenderOptions::spaces(cli.indent_width)
    };
    let lua = Generator::new(options).generate(&ast)?;
    print!("{}", lua);

    Ok(())
}

/// Show tokens from lexing a file
fn show_tokens(filename: &str, tokens: &[Token]) {
    println!("Tokens for '{}':", filename);
    println!("{}", "=".repeat(60));

    for (i, token) in tokens.iter().enumerate() {
        println!(
            "{:4}: {:20} | {:?}",
            i,
            format!("{:?}", token.token_type),
            token.lexeme
        );
    }

    println!("{}", "=".repeat(60));
    println!("Total tokens: {}", tokens.len());
}
