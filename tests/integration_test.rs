// Integration tests for the lexer and parser

use minicc::diagnostics::Diagnostics;
use minicc::parser::ast::*;
use minicc::parser::token::TokenKind;
use minicc::parser::{parse, tokenize, Arena, ParseResult};
use pretty_assertions::assert_eq;

/// Lex and parse `source`, then hand the results to `check`.
fn with_parsed(source: &str, check: impl FnOnce(bool, &ParseResult<'_>, &Diagnostics)) {
    let mut diagnostics = Diagnostics::capture();
    let lexed = tokenize(source, "test.c", &mut diagnostics);
    let arena = Arena::new();
    let parsed = parse(&lexed.tokens, source, "test.c", &arena, &mut diagnostics);
    check(lexed.had_error, &parsed, &diagnostics);
}

#[test]
fn test_end_to_end_main() {
    let source = r#"
int main() {
  int x = 1 + 2 * 3;
  return x;
}
"#;

    let mut diagnostics = Diagnostics::capture();
    let lexed = tokenize(source, "main.c", &mut diagnostics);
    assert!(!lexed.had_error);
    assert_eq!(
        lexed.tokens.kinds(),
        vec![
            TokenKind::KwInt,
            TokenKind::Identifier,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::KwInt,
            TokenKind::Identifier,
            TokenKind::Eq,
            TokenKind::Number,
            TokenKind::Plus,
            TokenKind::Number,
            TokenKind::Star,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::KwReturn,
            TokenKind::Identifier,
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );

    let arena = Arena::new();
    let parsed = parse(&lexed.tokens, source, "main.c", &arena, &mut diagnostics);
    assert!(!parsed.had_error);
    assert!(diagnostics.diagnostics().is_empty());

    let main = parsed.module.function("main").expect("main is parsed");
    assert_eq!(main.return_type, AstType::Int);
    let statements = main.statements();
    assert_eq!(statements.len(), 2);

    match statements[0].kind {
        NodeKind::VarDecl {
            var_type: AstType::Int,
            name: "x",
            initializer: Some(init),
        } => match init.kind {
            NodeKind::Binary {
                op: BinaryOp::Add,
                left,
                right,
            } => {
                assert_eq!(left.kind, NodeKind::IntLiteral(1));
                match right.kind {
                    NodeKind::Binary {
                        op: BinaryOp::Mul,
                        left,
                        right,
                    } => {
                        assert_eq!(left.kind, NodeKind::IntLiteral(2));
                        assert_eq!(right.kind, NodeKind::IntLiteral(3));
                    }
                    _ => panic!("Expected multiplication on the right"),
                }
            }
            _ => panic!("Expected addition initializer"),
        },
        _ => panic!("Expected declaration of x"),
    }

    match statements[1].kind {
        NodeKind::Return { expr: Some(expr) } => {
            assert_eq!(expr.kind, NodeKind::Identifier("x"));
        }
        _ => panic!("Expected return statement"),
    }

    assert_eq!(
        parsed.module.to_string(),
        "module
  fn main : int
    block {
      var int x =
        binary +
          int 1
          binary *
            int 2
            int 3
      return
        id x
    }
"
    );
}

#[test]
fn test_functions_in_source_order() {
    let source = r#"
int first(int a) { return a; }
char second(char c, int n) { return c; }
int main() { return first(1) + second('x', 2); }
"#;

    with_parsed(source, |lex_error, parsed, _| {
        assert!(!lex_error);
        assert!(!parsed.had_error);
        let names: Vec<&str> = parsed.module.functions.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["first", "second", "main"]);
        assert_eq!(parsed.module.functions[1].return_type, AstType::Char);
    });
}

#[test]
fn test_recovery_keeps_other_functions() {
    let source = r#"
int broken() {
  int x = 1
  return x;
}

int fine() {
  return 2;
}

int main() {
  return fine();
}
"#;

    with_parsed(source, |_, parsed, diagnostics| {
        assert!(parsed.had_error);
        assert_eq!(diagnostics.error_count(), 1);
        let names: Vec<&str> = parsed.module.functions.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["broken", "fine", "main"]);

        let diagnostic = &diagnostics.diagnostics()[0];
        assert_eq!(diagnostic.message, "expected ';' after declaration, found 'return'");
        assert_eq!(diagnostic.location, Some(SourceLocation::new(4, 3)));
        assert_eq!(
            diagnostic.to_string(),
            "[test.c:4] [E] expected ';' after declaration, found 'return'\n\
             \x20   return x;\n\
             \x20   ^\n"
        );
    });
}

#[test]
fn test_broken_function_header_is_skipped() {
    let source = r#"
int oops( { return 1; }
int main() { return 0; }
"#;

    with_parsed(source, |_, parsed, diagnostics| {
        assert!(parsed.had_error);
        assert!(diagnostics.error_count() >= 1);
        assert!(parsed.module.function("main").is_some());
        assert!(parsed.module.function("oops").is_none());
    });
}

#[test]
fn test_lex_error_is_contained() {
    let source = "int main() {\n  int y = 1abc;\n  return y;\n}\n";

    let mut diagnostics = Diagnostics::capture();
    let lexed = tokenize(source, "test.c", &mut diagnostics);
    assert!(lexed.had_error);
    assert_eq!(diagnostics.error_count(), 1);

    let ret = lexed
        .tokens
        .iter()
        .find(|t| t.kind == TokenKind::KwReturn)
        .expect("return token");
    assert_eq!(ret.location, SourceLocation::new(3, 3));

    // The token stream is still well-formed enough to parse.
    let arena = Arena::new();
    let parsed = parse(&lexed.tokens, source, "test.c", &arena, &mut diagnostics);
    assert!(!parsed.had_error);
    assert_eq!(parsed.module.functions[0].statements().len(), 2);
}

#[test]
fn test_while_with_subscripts_and_calls() {
    let source = r#"
int sum(int n) {
  int values[4] = {1, 2, 3, 4};
  int i = 0;
  int total = 0;
  while (i < n) {
    total = total + values[i];
    if (total > 100) break;
    i = i + 1;
  }
  return total;
}
"#;

    with_parsed(source, |lex_error, parsed, diagnostics| {
        assert!(!lex_error);
        assert!(!parsed.had_error, "{:?}", diagnostics.messages());
        let body = parsed.module.functions[0].statements();
        assert_eq!(body.len(), 5);
        match body[3].kind {
            NodeKind::While { condition, body } => {
                assert!(matches!(
                    condition.kind,
                    NodeKind::Binary {
                        op: BinaryOp::Lt,
                        ..
                    }
                ));
                assert!(matches!(body.kind, NodeKind::Block { statements } if statements.len() == 3));
            }
            _ => panic!("Expected while loop"),
        }
    });
}

#[test]
fn test_escapes_reach_the_ast() {
    let source = "int main() { char t = '\\t'; return t; }";

    with_parsed(source, |_, parsed, _| {
        match parsed.module.functions[0].statements()[0].kind {
            NodeKind::VarDecl {
                var_type: AstType::Char,
                initializer: Some(init),
                ..
            } => assert_eq!(init.kind, NodeKind::IntLiteral(9)),
            _ => panic!("Expected char declaration"),
        }
    });
}

#[test]
fn test_reserved_words_are_rejected_by_parser() {
    let source = "void f() { }\nint main() { for; return 0; }";

    with_parsed(source, |lex_error, parsed, diagnostics| {
        assert!(!lex_error);
        assert!(parsed.had_error);
        assert_eq!(
            diagnostics.messages()[0],
            "expected type specifier, found 'void'"
        );
        assert!(parsed.module.function("main").is_some());
    });
}

#[test]
fn test_latin1_bytes_are_lexed_not_rejected() {
    let commented: &[u8] = b"int main() { /* caf\xe9 */ return 0; }";
    let mut diagnostics = Diagnostics::capture();
    let lexed = tokenize(commented, "latin1.c", &mut diagnostics);
    assert!(!lexed.had_error);
    let arena = Arena::new();
    let parsed = parse(&lexed.tokens, commented, "latin1.c", &arena, &mut diagnostics);
    assert!(!parsed.had_error);
    assert!(parsed.module.function("main").is_some());

    let stray: &[u8] = b"int main() {\n  return \xe9 0;\n}\n";
    let mut diagnostics = Diagnostics::capture();
    let lexed = tokenize(stray, "latin1.c", &mut diagnostics);
    assert!(lexed.had_error);
    assert_eq!(
        diagnostics.diagnostics()[0].to_string(),
        "[latin1.c:2] [E] unexpected character with code 0xE9\n\
         \x20   return \u{FFFD} 0;\n\
         \x20          ^\n"
    );
}

#[test]
fn test_double_slash_is_not_a_comment() {
    let source = "int main() { int x = 4 //2;\n; return x; }";

    with_parsed(source, |lex_error, parsed, diagnostics| {
        assert!(!lex_error);
        assert!(parsed.had_error);
        assert_eq!(diagnostics.messages()[0], "expected expression, found '/'");
    });
}
