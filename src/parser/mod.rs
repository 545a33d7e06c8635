//! Parser module
//!
//! This module handles parsing tokens into an Abstract Syntax Tree (AST).

pub mod ast;
pub mod indent;
pub mod parser;

pub use ast::{Ast, Block, Expr, Stmt};
pub use indent::{IndentError, IndentTracker};
pub use parser::Parser;
