//! Lua code generation
//!
//! Turns a parsed [`Ast`](crate::parser::Ast) into Lua source text.

pub mod lua;
pub mod state;

pub use lua::Generator;
pub use state::{RenderOptions, RenderState};
