//! Statement parsing implementation
//!
//! This module handles parsing of all statement types:
//!
//! - Variable declarations: `int x = 42;`
//! - Control flow: `if`, `while`
//! - Jump statements: `return`, `break`
//! - Compound statements: `{ ... }`
//! - Expression statements: function calls, assignments
//!
//! # Grammar
//!
//! ```text
//! statement ::= block | if_stmt | while_stmt | break_stmt | return_stmt
//!             | var_decl | expr_stmt
//! block     ::= "{" statement* "}"
//! if_stmt   ::= "if" "(" expression ")" statement [ "else" statement ]
//! while_stmt ::= "while" "(" expression ")" statement
//! break_stmt ::= "break" ";"
//! return_stmt ::= "return" expression ";"
//! expr_stmt ::= expression ";"
//! ```
//!
//! An `else` binds to the nearest `if` still waiting for one. A bare `else`
//! is a syntax error.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::parse::{PResult, Parser};
use crate::parser::token::{Token, TokenKind};

impl<'src, 'a> Parser<'src, 'a> {
    /// Parse a braced block. Statements that fail are skipped with
    /// [`synchronize`](Parser::synchronize); a missing `}` is reported but
    /// the block is still returned.
    pub(crate) fn parse_block(&mut self) -> PResult<&'a Node<'a>> {
        let lbrace = self.expect(TokenKind::LBrace, "expected '{'")?;
        let mut statements = self.list();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let start = self.position;
            match self.parse_statement() {
                Ok(statement) => self.push(&mut statements, statement),
                Err(_) => self.synchronize(start),
            }
        }

        self.expect_lenient(TokenKind::RBrace, "expected '}'");

        Ok(self.node(
            NodeKind::Block {
                statements: statements.into_bump_slice(),
            },
            lbrace.location,
        ))
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> PResult<&'a Node<'a>> {
        self.nested("statement", Self::parse_statement_kind)
    }

    fn parse_statement_kind(&mut self) -> PResult<&'a Node<'a>> {
        let token = self.peek();

        match token.kind {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::KwIf => {
                self.advance();
                self.parse_if_statement(token)
            }
            TokenKind::KwElse => {
                self.advance();
                Err(self.error_at(token, "unexpected 'else'"))
            }
            TokenKind::KwWhile => {
                self.advance();
                self.parse_while_statement(token)
            }
            TokenKind::KwBreak => {
                self.advance();
                self.expect(TokenKind::Semicolon, "expected ';' after 'break'")?;
                Ok(self.node(NodeKind::Break, token.location))
            }
            TokenKind::KwReturn => {
                self.advance();
                self.parse_return_statement(token)
            }
            TokenKind::KwInt | TokenKind::KwChar => self.parse_var_decl(),
            _ => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semicolon, "expected ';' after expression")?;
                Ok(self.node(NodeKind::ExprStmt { expr }, token.location))
            }
        }
    }

    /// Parse return statement.
    ///
    /// The value is mandatory: `return;` reports "expected expression".
    fn parse_return_statement(&mut self, keyword: &Token) -> PResult<&'a Node<'a>> {
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "expected ';' after return value")?;
        Ok(self.node(NodeKind::Return { expr: Some(expr) }, keyword.location))
    }

    /// Parse if statement
    fn parse_if_statement(&mut self, keyword: &Token) -> PResult<&'a Node<'a>> {
        self.expect(TokenKind::LParen, "expected '(' after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "expected ')' after condition")?;

        let then_branch = self.parse_statement()?;
        let else_branch = if self.match_token(TokenKind::KwElse) {
            Some(self.parse_statement()?)
        } else {
            None
        };

        Ok(self.node(
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            },
            keyword.location,
        ))
    }

    /// Parse while loop
    fn parse_while_statement(&mut self, keyword: &Token) -> PResult<&'a Node<'a>> {
        self.expect(TokenKind::LParen, "expected '(' after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "expected ')' after condition")?;
        let body = self.parse_statement()?;

        Ok(self.node(NodeKind::While { condition, body }, keyword.location))
    }
}
