//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, cursor helpers, recovery, and the main parse
//! entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: functions, parameters, types and variable declarations
//! - `statements`: blocks, `if`, `while`, `break`, `return`, expression statements
//! - `expressions`: precedence climbing from assignment down to primaries
//!
//! # Error recovery
//!
//! A production that hits an unexpected token reports it to the
//! [`Diagnostics`] sink right away and returns `Err`. The error travels up
//! with `?` until a block or the module loop catches it and calls
//! [`Parser::synchronize`], which skips to a plausible statement boundary.
//! Parsing therefore always runs to end of input and always yields a module.
//!
//! Statements, assignments and unary operators recurse. Each of them goes
//! through [`Parser::nested`], which fails with a diagnostic once
//! [`MAX_NESTING_DEPTH`] levels are open, so deeply nested input is
//! rejected like any other syntax error instead of exhausting the stack.
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::diagnostics::{line_containing, Diagnostic, Diagnostics};
use crate::parser::arena::Arena;
use crate::parser::ast::*;
use crate::parser::token::{Token, TokenArray, TokenKind};
use bumpalo::collections::Vec as BumpVec;
use thiserror::Error;
use tracing::{debug, trace};

/// A syntax error, already reported to the diagnostics sink when created
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

pub(crate) type PResult<T> = Result<T, ParseError>;

/// Deepest statement/expression nesting the parser accepts
pub const MAX_NESTING_DEPTH: usize = 200;

/// Outcome of a parse session
#[derive(Debug)]
pub struct ParseResult<'a> {
    /// Every function that parsed, in source order
    pub module: AstModule<'a>,
    /// Sticky: set by the first syntax error
    pub had_error: bool,
}

/// Recursive descent parser for the C subset
///
/// `'src` is the lifetime of the token array, source text and diagnostics
/// sink; `'a` is the lifetime of the arena the AST is built in.
pub struct Parser<'src, 'a> {
    pub(crate) tokens: &'src [Token],
    pub(crate) source: &'src [u8],
    pub(crate) filename: &'src str,
    pub(crate) position: usize,
    pub(crate) had_error: bool,
    /// Open `nested` productions
    depth: usize,
    arena: &'a Arena,
    diagnostics: &'src mut Diagnostics,
}

/// Parse a token array in one call.
pub fn parse<'a, S: AsRef<[u8]> + ?Sized>(
    tokens: &TokenArray,
    source: &S,
    filename: &str,
    arena: &'a Arena,
    diagnostics: &mut Diagnostics,
) -> ParseResult<'a> {
    Parser::new(tokens, source.as_ref(), filename, arena, diagnostics).parse()
}

impl<'src, 'a> Parser<'src, 'a> {
    pub fn new(
        tokens: &'src TokenArray,
        source: &'src [u8],
        filename: &'src str,
        arena: &'a Arena,
        diagnostics: &'src mut Diagnostics,
    ) -> Self {
        Self {
            tokens: tokens.as_slice(),
            source,
            filename,
            position: 0,
            had_error: false,
            depth: 0,
            arena,
            diagnostics,
        }
    }

    /// Parse the entire program (a sequence of function definitions)
    pub fn parse(mut self) -> ParseResult<'a> {
        let mut functions = self.list();

        while !self.is_at_end() {
            let start = self.position;
            match self.parse_function() {
                Ok(function) => self.push(&mut functions, function),
                Err(_) => self.synchronize(start),
            }
        }

        let module = AstModule {
            functions: functions.into_bump_slice(),
        };
        debug!(
            file = self.filename,
            functions = module.functions.len(),
            arena_bytes = self.arena.allocated_bytes(),
            had_error = self.had_error,
            "parsed"
        );

        ParseResult {
            module,
            had_error: self.had_error,
        }
    }

    /// Skip tokens until the previous token was `;` or the next one can start
    /// a statement.
    ///
    /// `start` is the cursor position where the failed production began. If
    /// the production consumed nothing, one token is skipped first so the
    /// caller's loop always moves forward.
    pub(crate) fn synchronize(&mut self, start: usize) {
        let from = self.position;

        if self.position == start {
            self.advance();
        }

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon || self.peek().kind.starts_statement()
            {
                break;
            }
            self.advance();
        }

        trace!(from, to = self.position, "synchronized");
    }

    /// Run `production` one nesting level deeper. At the limit nothing is
    /// consumed and "`what` nested too deeply" is reported instead.
    pub(crate) fn nested<T>(
        &mut self,
        what: &str,
        production: fn(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            let token = self.peek();
            return Err(self.error_at(token, format!("{what} nested too deeply")));
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Whether the next token has `kind`; always false at end of input
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Consume the next token and return it; stays put at end of input.
    pub(crate) fn advance(&mut self) -> &'src Token {
        let token = self.peek();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// The next token; past the end this is the trailing `Eof`.
    pub(crate) fn peek(&self) -> &'src Token {
        let tokens = self.tokens;
        &tokens[self.position.min(tokens.len().saturating_sub(1))]
    }

    /// The last consumed token, or the first token if nothing was consumed
    pub(crate) fn previous(&self) -> &'src Token {
        if self.position == 0 {
            return self.peek();
        }
        let tokens = self.tokens;
        &tokens[(self.position - 1).min(tokens.len().saturating_sub(1))]
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    /// Consume a token of `kind`, or report `message` against the next token.
    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> PResult<&'src Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_expected(message))
        }
    }

    /// Like [`expect`](Self::expect), for places where parsing goes on
    /// regardless; the error is still recorded.
    pub(crate) fn expect_lenient(&mut self, kind: TokenKind, message: &str) {
        let _ = self.expect(kind, message);
    }

    /// Report `message` against the next token, naming what was found.
    pub(crate) fn error_expected(&mut self, message: &str) -> ParseError {
        let found = self.peek();
        self.error_at(found, format!("{message}, found {}", found.kind))
    }

    /// Report an error located at `token`.
    pub(crate) fn error_at(&mut self, token: &Token, message: impl Into<String>) -> ParseError {
        self.had_error = true;
        let message = message.into();
        let diagnostic = Diagnostic::error(self.filename, message.clone())
            .at(token.location)
            .with_source_line(&line_containing(self.source, token.span.start));
        self.diagnostics.report(diagnostic);

        ParseError {
            message,
            location: token.location,
        }
    }

    // ===== Arena helpers =====

    /// Move a value into the arena; running out of memory ends the process.
    pub(crate) fn alloc<T>(&mut self, value: T) -> &'a T {
        let arena = self.arena;
        match arena.try_alloc(value) {
            Ok(value) => value,
            Err(_) => self.out_of_memory(),
        }
    }

    fn out_of_memory(&mut self) -> ! {
        self.diagnostics.fatal(self.filename, "out of memory")
    }

    pub(crate) fn node(&mut self, kind: NodeKind<'a>, location: SourceLocation) -> &'a Node<'a> {
        self.alloc(Node::new(kind, location))
    }

    /// An empty arena-backed list, frozen with `into_bump_slice` when done
    pub(crate) fn list<T>(&self) -> BumpVec<'a, T> {
        let arena = self.arena;
        arena.vec()
    }

    /// Append to an arena list, growing it through the fallible path.
    pub(crate) fn push<T>(&mut self, list: &mut BumpVec<'a, T>, item: T) {
        if list.try_reserve(1).is_err() {
            self.out_of_memory();
        }
        list.push(item);
    }

    /// Copy a token's text into the arena.
    pub(crate) fn copy_lexeme(&mut self, token: &Token) -> &'a str {
        let arena = self.arena;
        match arena.try_alloc_str(&token.lexeme(self.source)) {
            Ok(name) => name,
            Err(_) => self.out_of_memory(),
        }
    }
}
