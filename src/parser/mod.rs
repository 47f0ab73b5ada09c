//! C source code front end
//!
//! This module transforms C source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → [`token::TokenArray`])
//! - [`parse`]: Parsing (tokens → AST), split across `declarations`,
//!   `statements` and `expressions`
//! - [`ast`]: AST node definitions
//! - [`arena`]: the allocation registry every AST node lives in
//! - [`printer`]: indented text dump of a parsed module
//!
//! # Supported C Subset
//!
//! - Types: `int`, `char`, and one-dimensional arrays of either
//! - Statements: declarations, blocks, `if`/`else`, `while`, `break`, `return`
//! - Expressions: assignment, bitwise `|` and `&`, comparison, arithmetic,
//!   unary `- + ! ~`, subscripts and calls
//! - `void`, `for`, `continue` and the compound operators are recognised by
//!   the lexer but rejected by the parser
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one function per precedence
//! tier. No external parser generator dependencies.

pub mod arena;
pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod printer;
mod statements;
pub mod token;

pub use arena::Arena;
pub use lexer::{tokenize, Lexer, Tokenized};
pub use parse::{parse, ParseError, ParseResult, Parser};
