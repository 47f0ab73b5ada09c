//! Token model shared by the lexer and the parser
//!
//! A [`Token`] records its kind, where its lexeme sits in the source buffer,
//! the line/column it starts at, and the literal value decoded by the lexer.
//! Keyword and punctuator spellings live in the tables below; the lexer
//! consults them, the printer and the diagnostics use them for display.

use super::ast::SourceLocation;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::ops::Deref;
use std::sync::OnceLock;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals and names
    Number,
    CharLiteral,
    StringLiteral,
    Identifier,

    // Keywords
    KwInt,
    KwChar,
    KwVoid,
    KwIf,
    KwElse,
    KwWhile,
    KwFor,
    KwBreak,
    KwContinue,
    KwReturn,

    // Multi-character operators
    EqEq,       // ==
    NotEq,      // !=
    Le,         // <=
    Ge,         // >=
    AndAnd,     // &&
    OrOr,       // ||
    LtLt,       // <<
    GtGt,       // >>
    PlusPlus,   // ++
    MinusMinus, // --
    PlusEq,     // +=
    MinusEq,    // -=
    StarEq,     // *=
    SlashEq,    // /=
    PercentEq,  // %=
    Arrow,      // ->

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semicolon, // ;
    Comma,     // ,
    Dot,       // .
    Question,  // ?
    Colon,     // :

    // Single-character operators
    Eq,      // =
    Lt,      // <
    Gt,      // >
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %
    Amp,     // &
    Pipe,    // |
    Caret,   // ^
    Bang,    // !
    Tilde,   // ~

    /// A byte no rule accepts; always one byte long
    Unknown,
    /// End of input; always the last token of a [`TokenArray`]
    Eof,
}

/// Punctuators in match priority order: every entry must come before any
/// shorter entry that is a prefix of it.
pub const PUNCTUATORS: &[(&str, TokenKind)] = &[
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
    ("<<", TokenKind::LtLt),
    (">>", TokenKind::GtGt),
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
    ("+=", TokenKind::PlusEq),
    ("-=", TokenKind::MinusEq),
    ("*=", TokenKind::StarEq),
    ("/=", TokenKind::SlashEq),
    ("%=", TokenKind::PercentEq),
    ("->", TokenKind::Arrow),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    (".", TokenKind::Dot),
    ("?", TokenKind::Question),
    (":", TokenKind::Colon),
    ("=", TokenKind::Eq),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("&", TokenKind::Amp),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
    ("!", TokenKind::Bang),
    ("~", TokenKind::Tilde),
];

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("int", TokenKind::KwInt),
    ("char", TokenKind::KwChar),
    ("void", TokenKind::KwVoid),
    ("if", TokenKind::KwIf),
    ("else", TokenKind::KwElse),
    ("while", TokenKind::KwWhile),
    ("for", TokenKind::KwFor),
    ("break", TokenKind::KwBreak),
    ("continue", TokenKind::KwContinue),
    ("return", TokenKind::KwReturn),
];

fn keyword_table() -> &'static FxHashMap<&'static str, TokenKind> {
    static TABLE: OnceLock<FxHashMap<&'static str, TokenKind>> = OnceLock::new();
    TABLE.get_or_init(|| KEYWORDS.iter().copied().collect())
}

impl TokenKind {
    /// Classify an identifier-shaped word as a keyword or a plain identifier.
    pub fn from_word(word: &str) -> TokenKind {
        keyword_table()
            .get(word)
            .copied()
            .unwrap_or(TokenKind::Identifier)
    }

    /// Source spelling of a punctuator kind
    pub fn punctuator(self) -> Option<&'static str> {
        PUNCTUATORS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(text, _)| *text)
    }

    /// Source spelling of a keyword kind
    pub fn keyword(self) -> Option<&'static str> {
        KEYWORDS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(text, _)| *text)
    }

    /// Kind name printed by the token dump, e.g. `NUMBER`, `KW_int`,
    /// `LESS_EQUAL`.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Number => "NUMBER",
            TokenKind::CharLiteral => "CHAR_LITERAL",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::KwInt => "KW_int",
            TokenKind::KwChar => "KW_char",
            TokenKind::KwVoid => "KW_void",
            TokenKind::KwIf => "KW_if",
            TokenKind::KwElse => "KW_else",
            TokenKind::KwWhile => "KW_while",
            TokenKind::KwFor => "KW_for",
            TokenKind::KwBreak => "KW_break",
            TokenKind::KwContinue => "KW_continue",
            TokenKind::KwReturn => "KW_return",
            TokenKind::EqEq => "EQUAL",
            TokenKind::NotEq => "NOT_EQUAL",
            TokenKind::Le => "LESS_EQUAL",
            TokenKind::Ge => "GREATER_EQUAL",
            TokenKind::AndAnd => "LOGICAL_AND",
            TokenKind::OrOr => "LOGICAL_OR",
            TokenKind::LtLt => "SHIFT_LEFT",
            TokenKind::GtGt => "SHIFT_RIGHT",
            TokenKind::PlusPlus => "INCREMENT",
            TokenKind::MinusMinus => "DECREMENT",
            TokenKind::PlusEq => "PLUS_ASSIGN",
            TokenKind::MinusEq => "MINUS_ASSIGN",
            TokenKind::StarEq => "STAR_ASSIGN",
            TokenKind::SlashEq => "DIV_ASSIGN",
            TokenKind::PercentEq => "MOD_ASSIGN",
            TokenKind::Arrow => "ARROW",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Question => "QUESTION",
            TokenKind::Colon => "COLON",
            TokenKind::Eq => "ASSIGN",
            TokenKind::Lt => "LESS",
            TokenKind::Gt => "GREATER",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "DIV",
            TokenKind::Percent => "MOD",
            TokenKind::Amp => "AMPERSAND",
            TokenKind::Pipe => "PIPE",
            TokenKind::Caret => "CARET",
            TokenKind::Bang => "EXCLAIM",
            TokenKind::Tilde => "TILDE",
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::Eof => "EOF",
        }
    }

    /// Whether a token of this kind can begin a statement or declaration;
    /// parser synchronization stops in front of these.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            TokenKind::KwInt
                | TokenKind::KwChar
                | TokenKind::KwReturn
                | TokenKind::KwIf
                | TokenKind::KwWhile
                | TokenKind::KwBreak
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.punctuator().or_else(|| self.keyword()) {
            return write!(f, "'{text}'");
        }
        match self {
            TokenKind::Number => write!(f, "integer constant"),
            TokenKind::CharLiteral => write!(f, "character literal"),
            TokenKind::StringLiteral => write!(f, "string literal"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Unknown => write!(f, "unknown token"),
            TokenKind::Eof => write!(f, "end of file"),
            _ => write!(f, "{self:?}"),
        }
    }
}

/// Byte range of a lexeme in the source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Literal value decoded by the lexer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenValue {
    #[default]
    None,
    Int(i32),
    Char(u8),
    /// String literal content with escapes resolved
    Str(String),
}

/// A single lexed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub location: SourceLocation,
    pub value: TokenValue,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, location: SourceLocation) -> Self {
        Self {
            kind,
            span,
            location,
            value: TokenValue::None,
        }
    }

    pub fn with_value(mut self, value: TokenValue) -> Self {
        self.value = value;
        self
    }

    /// The source text this token was recovered from.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD; identifiers
    /// and keywords are ASCII and always borrow.
    pub fn lexeme<'s, S: AsRef<[u8]> + ?Sized>(&self, source: &'s S) -> Cow<'s, str> {
        let bytes = source
            .as_ref()
            .get(self.span.start..self.span.end())
            .unwrap_or_default();
        String::from_utf8_lossy(bytes)
    }

    /// Integer value of a number token, 0 for anything else
    pub fn int_value(&self) -> i32 {
        match self.value {
            TokenValue::Int(n) => n,
            _ => 0,
        }
    }

    /// Byte value of a character literal token
    pub fn char_value(&self) -> Option<u8> {
        match self.value {
            TokenValue::Char(c) => Some(c),
            _ => None,
        }
    }

    /// Decoded content of a string literal token
    pub fn string_value(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Ordered token sequence; the last element is always the single
/// [`TokenKind::Eof`] token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenArray {
    tokens: Vec<Token>,
}

impl TokenArray {
    /// Seal a token list by appending the end-of-input token.
    pub(crate) fn finish(mut tokens: Vec<Token>, eof: Token) -> Self {
        debug_assert_eq!(eof.kind, TokenKind::Eof);
        tokens.push(eof);
        Self { tokens }
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Token kinds in order, including the trailing `Eof`
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    /// Render the array the way `--dump-tokens` prints it.
    pub fn dump(&self, source: &[u8]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "tokens ({}):", self.tokens.len());
        for (i, token) in self.tokens.iter().enumerate() {
            let _ = write!(out, "[{i:3}] Token{{{}", token.kind.name());
            if matches!(
                token.kind,
                TokenKind::Identifier
                    | TokenKind::Number
                    | TokenKind::StringLiteral
                    | TokenKind::CharLiteral
            ) {
                let _ = write!(out, ", \"{}\"", token.lexeme(source));
            }
            let _ = writeln!(
                out,
                ", line={}, col={}}}",
                token.location.line, token.location.column
            );
        }
        out
    }
}

impl Deref for TokenArray {
    type Target = [Token];

    fn deref(&self) -> &[Token] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenKind::from_word("while"), TokenKind::KwWhile);
        assert_eq!(TokenKind::from_word("return"), TokenKind::KwReturn);
        assert_eq!(TokenKind::from_word("whilst"), TokenKind::Identifier);
        assert_eq!(TokenKind::from_word("Int"), TokenKind::Identifier);
    }

    #[test]
    fn test_punctuator_priority() {
        // A longer spelling must be tried before any of its prefixes.
        for (i, (long, _)) in PUNCTUATORS.iter().enumerate() {
            for (short, _) in &PUNCTUATORS[..i] {
                assert!(
                    !long.starts_with(short) || long == short,
                    "{long:?} is shadowed by earlier {short:?}"
                );
            }
        }
    }

    #[test]
    fn test_display_and_names() {
        assert_eq!(TokenKind::Semicolon.to_string(), "';'");
        assert_eq!(TokenKind::KwElse.to_string(), "'else'");
        assert_eq!(TokenKind::Eof.to_string(), "end of file");
        assert_eq!(TokenKind::KwInt.name(), "KW_int");
        assert_eq!(TokenKind::LParen.name(), "LPAREN");
        assert_eq!(TokenKind::Number.name(), "NUMBER");
        assert_eq!(TokenKind::EqEq.name(), "EQUAL");
        assert_eq!(TokenKind::Eq.name(), "ASSIGN");
        assert_eq!(TokenKind::Le.name(), "LESS_EQUAL");
        assert_eq!(TokenKind::Bang.name(), "EXCLAIM");
        assert_eq!(TokenKind::Amp.name(), "AMPERSAND");
    }

    #[test]
    fn test_dump_format() {
        let source = "x <= 1;";
        let tokens = TokenArray::finish(
            vec![
                Token::new(TokenKind::Identifier, Span::new(0, 1), SourceLocation::new(1, 1)),
                Token::new(TokenKind::Le, Span::new(2, 2), SourceLocation::new(1, 3)),
            ],
            Token::new(TokenKind::Eof, Span::new(7, 0), SourceLocation::new(1, 8)),
        );
        assert_eq!(
            tokens.dump(source.as_bytes()),
            "tokens (3):\n\
             [  0] Token{IDENTIFIER, \"x\", line=1, col=1}\n\
             [  1] Token{LESS_EQUAL, line=1, col=3}\n\
             [  2] Token{EOF, line=1, col=8}\n"
        );
    }

    #[test]
    fn test_lexeme_slices_source() {
        let source = "int count;";
        let token = Token::new(
            TokenKind::Identifier,
            Span::new(4, 5),
            SourceLocation::new(1, 5),
        );
        assert_eq!(token.lexeme(source), "count");
        assert_eq!(token.int_value(), 0);
    }
}
