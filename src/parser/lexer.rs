//! Lexer (tokenizer) for source text
//!
//! Converts a raw source buffer into a [`TokenArray`] consumed by the parser.
//! The scanner never stops early: a malformed literal or a stray character is
//! reported through [`Diagnostics`], a best-effort token is produced, and
//! scanning carries on until end of input. The only trace an error leaves on
//! the result is the sticky `had_error` flag.

use super::ast::SourceLocation;
use super::token::{Span, Token, TokenArray, TokenKind, TokenValue, PUNCTUATORS};
use crate::diagnostics::{line_containing, Diagnostic, Diagnostics};
use thiserror::Error;
use tracing::{debug, trace};

/// Lexical problems; the `Display` text is the diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("invalid suffix on integer constant")]
    InvalidSuffix,
    #[error("integer constant is too large")]
    IntegerTooLarge,
    #[error("unknown escape sequence '\\{0}'")]
    UnknownEscape(char),
    #[error("unterminated character literal")]
    UnterminatedChar,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("unexpected character with code 0x{0:02X}")]
    UnexpectedByte(u8),
}

/// Result of a tokenization run
#[derive(Debug)]
pub struct Tokenized {
    pub tokens: TokenArray,
    pub had_error: bool,
}

/// Single-pass scanner over the source bytes
///
/// The input need not be UTF-8: only ASCII bytes form tokens, anything else
/// is reported and skipped one byte at a time.
pub struct Lexer<'src> {
    bytes: &'src [u8],
    filename: &'src str,
    diagnostics: &'src mut Diagnostics,
    position: usize,
    line: usize,
    /// Byte offset where the current line begins; columns are measured from here
    line_start: usize,
    tokens: Vec<Token>,
    had_error: bool,
}

/// Tokenize `source` in one call.
pub fn tokenize<S: AsRef<[u8]> + ?Sized>(
    source: &S,
    filename: &str,
    diagnostics: &mut Diagnostics,
) -> Tokenized {
    Lexer::new(source, filename, diagnostics).tokenize()
}

impl<'src> Lexer<'src> {
    /// Create a new lexer over a source buffer.
    pub fn new<S: AsRef<[u8]> + ?Sized>(
        source: &'src S,
        filename: &'src str,
        diagnostics: &'src mut Diagnostics,
    ) -> Self {
        Self {
            bytes: source.as_ref(),
            filename,
            diagnostics,
            position: 0,
            line: 1,
            line_start: 0,
            tokens: Vec::new(),
            had_error: false,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(mut self) -> Tokenized {
        loop {
            self.skip_whitespace_and_comments();

            if self.is_at_end() {
                break;
            }

            let token = self.next_token();
            self.tokens.push(token);
        }

        let eof = Token::new(
            TokenKind::Eof,
            Span::new(self.position, 0),
            self.current_location(),
        );
        let tokens = TokenArray::finish(std::mem::take(&mut self.tokens), eof);
        debug!(
            file = self.filename,
            tokens = tokens.len(),
            had_error = self.had_error,
            "tokenized"
        );

        Tokenized {
            tokens,
            had_error: self.had_error,
        }
    }

    /// Get next token; the cursor is on a non-whitespace byte.
    fn next_token(&mut self) -> Token {
        match self.peek() {
            Some(b'0'..=b'9') => self.number_literal(),
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => self.identifier_or_keyword(),
            Some(b'\'') => self.char_literal(),
            Some(b'"') => self.string_literal(),
            _ => self.punctuator(),
        }
    }

    /// Parse numeric literal (decimal integers only)
    fn number_literal(&mut self) -> Token {
        let start = self.position;
        let location = self.current_location();

        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.advance();
        }
        let digits_end = self.position;

        if matches!(self.peek(), Some(c) if c.is_ascii_alphabetic() || c == b'.') {
            let at = self.position;
            let at_location = self.current_location();
            self.error(at, at_location, LexError::InvalidSuffix);
            while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'.') {
                self.advance();
            }
        }

        let value = self.bytes[start..digits_end]
            .iter()
            .try_fold(0i32, |acc, digit| {
                acc.checked_mul(10)?.checked_add(i32::from(digit - b'0'))
            });
        let value = match value {
            Some(value) => value,
            None => {
                self.error(start, location, LexError::IntegerTooLarge);
                0
            }
        };

        Token::new(TokenKind::Number, self.span_from(start), location)
            .with_value(TokenValue::Int(value))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self) -> Token {
        let start = self.position;
        let location = self.current_location();

        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
            self.advance();
        }

        // Identifier bytes are ASCII, so the slice is always valid UTF-8.
        let kind = std::str::from_utf8(&self.bytes[start..self.position])
            .map_or(TokenKind::Identifier, TokenKind::from_word);
        Token::new(kind, self.span_from(start), location)
    }

    /// Parse character literal
    fn char_literal(&mut self) -> Token {
        let start = self.position;
        let location = self.current_location();
        self.advance(); // opening quote

        let value = match self.peek() {
            Some(b'\\') => {
                let backslash = self.position;
                let backslash_location = self.current_location();
                self.advance();
                match self.advance() {
                    Some(b'n') => b'\n',
                    Some(b't') => b'\t',
                    Some(b'r') => b'\r',
                    Some(b'0') => 0,
                    Some(b'\\') => b'\\',
                    Some(b'\'') => b'\'',
                    Some(other) => {
                        self.error(
                            backslash,
                            backslash_location,
                            LexError::UnknownEscape(char::from(other)),
                        );
                        other
                    }
                    None => 0,
                }
            }
            Some(_) => self.advance().unwrap_or(0),
            None => 0,
        };

        if self.peek() == Some(b'\'') {
            self.advance();
        } else {
            self.error(start, location, LexError::UnterminatedChar);
        }

        Token::new(TokenKind::CharLiteral, self.span_from(start), location)
            .with_value(TokenValue::Char(value))
    }

    /// Parse string literal, resolving escapes into an owned buffer
    fn string_literal(&mut self) -> Token {
        let start = self.position;
        let location = self.current_location();
        self.advance(); // opening quote

        let mut buffer = Vec::new();
        let mut terminated = false;

        loop {
            match self.peek() {
                None | Some(b'\n') => break,
                Some(b'"') => {
                    self.advance();
                    terminated = true;
                    break;
                }
                Some(b'\\') => {
                    self.advance();
                    let Some(escaped) = self.advance() else {
                        break;
                    };
                    buffer.push(match escaped {
                        b'n' => b'\n',
                        b't' => b'\t',
                        b'r' => b'\r',
                        b'0' => 0,
                        // `\\`, `\"` and anything else stand for themselves
                        other => other,
                    });
                }
                Some(c) => {
                    self.advance();
                    buffer.push(c);
                }
            }
        }

        if !terminated {
            self.error(start, location, LexError::UnterminatedString);
        }

        let content = String::from_utf8(buffer)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
        Token::new(TokenKind::StringLiteral, self.span_from(start), location)
            .with_value(TokenValue::Str(content))
    }

    /// Match the punctuator table, or consume one byte as an unknown token
    fn punctuator(&mut self) -> Token {
        let start = self.position;
        let location = self.current_location();
        let bytes = self.bytes;
        let rest = &bytes[start..];

        for (text, kind) in PUNCTUATORS {
            if rest.starts_with(text.as_bytes()) {
                self.position += text.len();
                return Token::new(*kind, Span::new(start, text.len()), location);
            }
        }

        let c = rest[0];
        let err = match c {
            b'@' | b'$' | b'`' => LexError::InvalidCharacter(char::from(c)),
            c if c.is_ascii_graphic() => LexError::UnexpectedCharacter(char::from(c)),
            c => LexError::UnexpectedByte(c),
        };
        self.error(start, location, err);
        self.advance();

        Token::new(TokenKind::Unknown, Span::new(start, 1), location)
    }

    /// Skip whitespace and `/* */` comments. `//` is not a comment here and
    /// lexes as two slashes.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    self.advance();
                }
                Some(b'/') if self.peek_ahead(1) == Some(b'*') => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    /// Skip multi-line comment (/* ... */).
    ///
    /// An unterminated comment runs to end of input without a diagnostic.
    fn skip_block_comment(&mut self) {
        let start_line = self.line;
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some(b'*') && self.peek_ahead(1) == Some(b'/') {
                self.advance(); // skip '*'
                self.advance(); // skip '/'
                return;
            }
            self.advance();
        }

        trace!(line = start_line, "block comment runs to end of input");
    }

    fn error(&mut self, offset: usize, location: SourceLocation, err: LexError) {
        self.had_error = true;
        let diagnostic = Diagnostic::error(self.filename, err.to_string())
            .at(location)
            .with_source_line(&line_containing(self.bytes, offset));
        self.diagnostics.report(diagnostic);
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.position - start)
    }

    /// Peek at current byte without consuming
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    /// Peek ahead n bytes
    fn peek_ahead(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.position + n).copied()
    }

    /// Advance to next byte, keeping the line bookkeeping current
    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.position += 1;

        if byte == b'\n' {
            self.line += 1;
            self.line_start = self.position;
        }

        Some(byte)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.bytes.len()
    }

    /// Get current source location (1-based column)
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.position - self.line_start + 1)
    }
}
