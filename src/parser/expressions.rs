//! Expression parsing implementation
//!
//! This module handles parsing of expressions using one function per
//! precedence tier for binary operators and recursive descent for the
//! remaining forms.
//!
//! # Supported Expressions
//!
//! - Literals: integers and characters (character literals become integers)
//! - Identifiers
//! - Binary operators: assignment, bitwise `|` `&`, comparison, arithmetic
//! - Unary operators: `-`, `+`, `!`, `~`
//! - Postfix: `[]` and `()`
//! - Brace initializer lists (declarations only)
//!
//! # Precedence
//!
//! From loosest to tightest. Every binary tier is left-associative except
//! assignment, which recurses into itself for its right operand.
//!
//! ```text
//! assignment     ::= bitwise_or [ "=" assignment ]
//! bitwise_or     ::= bitwise_and ( "|" bitwise_and )*
//! bitwise_and    ::= equality ( "&" equality )*
//! equality       ::= relational ( ( "==" | "!=" ) relational )*
//! relational     ::= additive ( ( "<" | "<=" | ">" | ">=" ) additive )*
//! additive       ::= multiplicative ( ( "+" | "-" ) multiplicative )*
//! multiplicative ::= unary ( ( "*" | "/" | "%" ) unary )*
//! unary          ::= ( "-" | "+" | "!" | "~" ) unary | postfix
//! postfix        ::= primary ( "[" expression "]" | "(" [ args ] ")" )*
//! primary        ::= NUMBER | CHAR | identifier | "(" expression ")"
//! ```
//!
//! A primary that cannot be parsed is reported and replaced by the literal
//! `0`. Assignment and unary levels count towards the nesting limit, which
//! is the one way the tiers fail on their own.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::parse::{PResult, Parser};
use crate::parser::token::{Token, TokenKind};

/// Operator table for one left-associative tier
type OperatorTable = &'static [(TokenKind, BinaryOp)];

/// The next-tighter tier a left-associative tier is built from
type Operand<'src, 'a> = fn(&mut Parser<'src, 'a>) -> PResult<&'a Node<'a>>;

const BITWISE_OR: OperatorTable = &[(TokenKind::Pipe, BinaryOp::BitOr)];
const BITWISE_AND: OperatorTable = &[(TokenKind::Amp, BinaryOp::BitAnd)];
const EQUALITY: OperatorTable = &[
    (TokenKind::EqEq, BinaryOp::Eq),
    (TokenKind::NotEq, BinaryOp::Ne),
];
const RELATIONAL: OperatorTable = &[
    (TokenKind::Lt, BinaryOp::Lt),
    (TokenKind::Le, BinaryOp::Le),
    (TokenKind::Gt, BinaryOp::Gt),
    (TokenKind::Ge, BinaryOp::Ge),
];
const ADDITIVE: OperatorTable = &[
    (TokenKind::Plus, BinaryOp::Add),
    (TokenKind::Minus, BinaryOp::Sub),
];
const MULTIPLICATIVE: OperatorTable = &[
    (TokenKind::Star, BinaryOp::Mul),
    (TokenKind::Slash, BinaryOp::Div),
    (TokenKind::Percent, BinaryOp::Mod),
];

impl<'src, 'a> Parser<'src, 'a> {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> PResult<&'a Node<'a>> {
        self.parse_assignment()
    }

    /// Parse assignment (right-associative)
    fn parse_assignment(&mut self) -> PResult<&'a Node<'a>> {
        self.nested("expression", Self::parse_assignment_tier)
    }

    fn parse_assignment_tier(&mut self) -> PResult<&'a Node<'a>> {
        let left = self.parse_bitwise_or()?;

        if self.match_token(TokenKind::Eq) {
            let op = self.previous();
            let right = self.parse_assignment()?;
            return Ok(self.binary(BinaryOp::Assign, op, left, right));
        }

        Ok(left)
    }

    fn parse_bitwise_or(&mut self) -> PResult<&'a Node<'a>> {
        self.parse_left_associative(Self::parse_bitwise_and, BITWISE_OR)
    }

    fn parse_bitwise_and(&mut self) -> PResult<&'a Node<'a>> {
        self.parse_left_associative(Self::parse_equality, BITWISE_AND)
    }

    fn parse_equality(&mut self) -> PResult<&'a Node<'a>> {
        self.parse_left_associative(Self::parse_relational, EQUALITY)
    }

    fn parse_relational(&mut self) -> PResult<&'a Node<'a>> {
        self.parse_left_associative(Self::parse_additive, RELATIONAL)
    }

    fn parse_additive(&mut self) -> PResult<&'a Node<'a>> {
        self.parse_left_associative(Self::parse_multiplicative, ADDITIVE)
    }

    fn parse_multiplicative(&mut self) -> PResult<&'a Node<'a>> {
        self.parse_left_associative(Self::parse_unary, MULTIPLICATIVE)
    }

    /// `operand ( op operand )*`, folding to the left
    fn parse_left_associative(
        &mut self,
        operand: Operand<'src, 'a>,
        operators: OperatorTable,
    ) -> PResult<&'a Node<'a>> {
        let mut expr = operand(self)?;

        while let Some((op, token)) = self.match_operator(operators) {
            let right = operand(self)?;
            expr = self.binary(op, token, expr, right);
        }

        Ok(expr)
    }

    fn match_operator(&mut self, operators: OperatorTable) -> Option<(BinaryOp, &'src Token)> {
        let &(_, op) = operators.iter().find(|(kind, _)| self.check(*kind))?;
        Some((op, self.advance()))
    }

    /// Parse unary expression
    fn parse_unary(&mut self) -> PResult<&'a Node<'a>> {
        self.nested("expression", Self::parse_unary_tier)
    }

    fn parse_unary_tier(&mut self) -> PResult<&'a Node<'a>> {
        let token = self.peek();
        let op = match token.kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            _ => return self.parse_postfix(),
        };
        self.advance();

        let operand = self.parse_unary()?;
        Ok(self.node(NodeKind::Unary { op, operand }, token.location))
    }

    /// Parse postfix expression: subscripts and calls
    fn parse_postfix(&mut self) -> PResult<&'a Node<'a>> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.match_token(TokenKind::LBracket) {
                let bracket = self.previous();
                let index = self.parse_expression()?;
                self.expect(TokenKind::RBracket, "expected ']' after index")?;
                expr = self.node(NodeKind::Subscript { base: expr, index }, bracket.location);
            } else if self.match_token(TokenKind::LParen) {
                let paren = self.previous();
                let args = self.parse_arguments()?;
                self.expect(TokenKind::RParen, "expected ')' after arguments")?;
                expr = self.node(NodeKind::Call { callee: expr, args }, paren.location);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse call arguments; the cursor is just past `(`.
    fn parse_arguments(&mut self) -> PResult<&'a [&'a Node<'a>]> {
        let mut args = self.list();

        if !self.check(TokenKind::RParen) {
            loop {
                let arg = self.parse_expression()?;
                self.push(&mut args, arg);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        Ok(args.into_bump_slice())
    }

    /// Parse primary expression
    fn parse_primary(&mut self) -> PResult<&'a Node<'a>> {
        let token = self.peek();

        match token.kind {
            TokenKind::Number => {
                self.advance();
                Ok(self.node(NodeKind::IntLiteral(token.int_value()), token.location))
            }
            TokenKind::CharLiteral => {
                self.advance();
                // Plain `char` is signed.
                let value = token.char_value().map_or(0, |c| i32::from(c as i8));
                Ok(self.node(NodeKind::IntLiteral(value), token.location))
            }
            TokenKind::Identifier => {
                self.advance();
                let name = self.copy_lexeme(token);
                Ok(self.node(NodeKind::Identifier(name), token.location))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_lenient(TokenKind::RParen, "expected ')'");
                Ok(expr)
            }
            TokenKind::StringLiteral => {
                self.advance();
                self.error_at(token, "string literals are currently not supported");
                Ok(self.node(NodeKind::IntLiteral(0), token.location))
            }
            _ => {
                self.error_expected("expected expression");
                if !self.is_at_end() {
                    self.advance();
                }
                let location = self.previous().location;
                Ok(self.node(NodeKind::IntLiteral(0), location))
            }
        }
    }

    /// Parse a declaration initializer: a brace list or a single expression
    pub(crate) fn parse_initializer(&mut self) -> PResult<&'a Node<'a>> {
        if !self.check(TokenKind::LBrace) {
            return self.parse_expression();
        }
        let lbrace = self.advance();
        let mut elements = self.list();

        if !self.check(TokenKind::RBrace) {
            loop {
                let element = self.parse_expression()?;
                self.push(&mut elements, element);
                // A trailing comma before `}` is allowed.
                if !self.match_token(TokenKind::Comma) || self.check(TokenKind::RBrace) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RBrace, "expected '}' in initializer list")?;

        Ok(self.node(
            NodeKind::InitList {
                elements: elements.into_bump_slice(),
            },
            lbrace.location,
        ))
    }

    fn binary(
        &mut self,
        op: BinaryOp,
        token: &Token,
        left: &'a Node<'a>,
        right: &'a Node<'a>,
    ) -> &'a Node<'a> {
        self.node(NodeKind::Binary { op, left, right }, token.location)
    }
}
