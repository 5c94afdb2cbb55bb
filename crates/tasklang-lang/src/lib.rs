//! # tasklang-lang
//!
//! TaskLang parser and compiler.
//! Parses TaskLang source code into an AST, validates each statement's
//! operands, then generates a Python Selenium automation script.

pub mod ast;
pub mod checker;
pub mod compiler;
pub mod lexer;
pub mod parser;

pub use checker::Checker;
pub use compiler::Compiler;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
