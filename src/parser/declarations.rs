//! Declaration parsing implementation
//!
//! This module handles the declaration forms of the language:
//!
//! - Function definitions: `type name(params) { ... }`
//! - Parameters: comma-separated `type name` pairs
//! - Type specifiers: `int` and `char`
//! - Variable declarations with an optional array suffix and initializer
//!
//! # Grammar
//!
//! ```text
//! function    ::= type identifier "(" [ params ] ")" block
//! params      ::= type identifier ( "," type identifier )*
//! type        ::= "int" | "char"
//! var_decl    ::= type identifier [ "[" NUMBER "]" ] [ "=" initializer ] ";"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::parse::{PResult, Parser};
use crate::parser::token::TokenKind;

impl<'src, 'a> Parser<'src, 'a> {
    /// Parse a function definition
    pub(crate) fn parse_function(&mut self) -> PResult<&'a AstFunction<'a>> {
        let return_type = self.parse_type()?.into();
        let name_token = self.expect(TokenKind::Identifier, "expected function name")?;
        self.expect(TokenKind::LParen, "expected '(' after function name")?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RParen, "expected ')' after parameters")?;
        let body = self.parse_block()?;

        let function = AstFunction {
            name: self.copy_lexeme(name_token),
            return_type,
            params,
            body,
            location: name_token.location,
        };
        Ok(self.alloc(function))
    }

    /// Parse the parameter list; the cursor is just past `(`.
    fn parse_params(&mut self) -> PResult<&'a [Param<'a>]> {
        let mut params = self.list();

        if !self.check(TokenKind::RParen) {
            loop {
                let location = self.current_location();
                let param_type = self.parse_type()?.into();
                let name_token = self.expect(TokenKind::Identifier, "expected parameter name")?;
                let name = self.copy_lexeme(name_token);
                self.push(
                    &mut params,
                    Param {
                        param_type,
                        name,
                        location,
                    },
                );

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        Ok(params.into_bump_slice())
    }

    /// Parse a type specifier
    pub(crate) fn parse_type(&mut self) -> PResult<ScalarType> {
        if self.match_token(TokenKind::KwInt) {
            Ok(ScalarType::Int)
        } else if self.match_token(TokenKind::KwChar) {
            Ok(ScalarType::Char)
        } else {
            Err(self.error_expected("expected type specifier"))
        }
    }

    /// Parse a local variable declaration, starting at its type keyword
    pub(crate) fn parse_var_decl(&mut self) -> PResult<&'a Node<'a>> {
        let location = self.current_location();
        let scalar = self.parse_type()?;
        let name_token = self.expect(TokenKind::Identifier, "expected identifier")?;
        let var_type = self.parse_array_suffix(scalar)?;

        let initializer = if self.match_token(TokenKind::Eq) {
            Some(self.parse_initializer()?)
        } else {
            None
        };

        self.expect(TokenKind::Semicolon, "expected ';' after declaration")?;

        let name = self.copy_lexeme(name_token);
        Ok(self.node(
            NodeKind::VarDecl {
                var_type,
                name,
                initializer,
            },
            location,
        ))
    }

    /// Parse an optional `[N]` suffix.
    ///
    /// A missing size aborts the declaration (after trying to step over the
    /// `]`); a missing `]` after a good size is reported and tolerated.
    fn parse_array_suffix(&mut self, element: ScalarType) -> PResult<AstType> {
        if !self.match_token(TokenKind::LBracket) {
            return Ok(element.into());
        }

        let size_token = match self.expect(TokenKind::Number, "expected array size") {
            Ok(token) => token,
            Err(err) => {
                self.expect_lenient(TokenKind::RBracket, "expected ']' after array size");
                return Err(err);
            }
        };
        self.expect_lenient(TokenKind::RBracket, "expected ']' after array size");

        Ok(AstType::Array {
            element,
            size: u32::try_from(size_token.int_value()).unwrap_or_default(),
        })
    }
}
