//! # Introduction
//!
//! minicc is the front end of a small compiler for a subset of C: it turns
//! source text into tokens and tokens into an arena-allocated AST, reporting
//! every lexical and syntax error it finds instead of stopping at the first.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → TokenArray → Parser → AstModule (in an Arena)
//!              ↘                  ↙
//!                  Diagnostics
//! ```
//!
//! 1. [`parser::lexer`] scans bytes into a [`parser::token::TokenArray`].
//! 2. [`parser::parse`] builds an [`parser::ast::AstModule`] inside a
//!    caller-owned [`parser::Arena`], resynchronizing after each error.
//! 3. [`diagnostics`] renders problems with file, line and a caret, and
//!    counts them.
//! 4. [`parser::printer`] dumps the finished tree.
//!
//! ```
//! use minicc::diagnostics::Diagnostics;
//! use minicc::parser::{parse, tokenize, Arena};
//!
//! let source = "int main() { return 1 + 2; }";
//! let mut diagnostics = Diagnostics::capture();
//! let lexed = tokenize(source, "main.c", &mut diagnostics);
//! let arena = Arena::new();
//! let parsed = parse(&lexed.tokens, source, "main.c", &arena, &mut diagnostics);
//!
//! assert!(!lexed.had_error && !parsed.had_error);
//! assert_eq!(parsed.module.functions[0].name, "main");
//! ```

pub mod diagnostics;
pub mod parser;
