//! Tests for the scanner as seen through the public API: token kinds,
//! semantic values, positions and checkpointing.

use sqlfront_core::lexer::{Keyword, LexError, Position, Scanner, Span, TokenKind};

fn kinds(input: &str) -> Vec<TokenKind> {
    Scanner::new(input)
        .tokenize()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn keywords_ignore_case() {
    for spelling in ["recursive", "RECURSIVE", "Recursive", "rEcUrSiVe"] {
        assert_eq!(
            kinds(spelling),
            vec![TokenKind::Keyword(Keyword::Recursive), TokenKind::Eof]
        );
    }
}

#[test]
fn non_keywords_are_identifiers() {
    assert_eq!(
        kinds("limit offset users"),
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Eof
        ]
    );
}

#[test]
fn string_with_doubled_quote() {
    let tokens = Scanner::new("'O''Brien'").tokenize();
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value(), "O'Brien");
}

#[test]
fn quoted_identifier_with_doubled_quote() {
    let tokens = Scanner::new(r#""a""b""#).tokenize();
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value(), "a\"b");
}

#[test]
fn quoted_keyword_is_identifier() {
    let tokens = Scanner::new(r#""select" [from]"#).tokenize();
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value(), "select");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value(), "from");
}

#[test]
fn hex_number_is_one_token() {
    let tokens = Scanner::new("0x1F").tokenize();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].raw, "0x1F");
    assert_eq!(tokens[0].span, Span::new(0, 4));
}

#[test]
fn exponent_number_is_one_token() {
    let tokens = Scanner::new("1.5e-3").tokenize();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].raw, "1.5e-3");
}

#[test]
fn bare_dot_is_lexical_error() {
    assert_eq!(kinds(". "), vec![TokenKind::Error(LexError::BareDot)]);
    assert_eq!(kinds("a.(b)")[..2], [TokenKind::Identifier, TokenKind::Error(LexError::BareDot)]);
}

#[test]
fn leading_dot_number() {
    let tokens = Scanner::new(".25").tokenize();
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].raw, ".25");
}

#[test]
fn not_equal_spellings() {
    assert_eq!(
        kinds("a != b <> c"),
        vec![
            TokenKind::Identifier,
            TokenKind::NotEq,
            TokenKind::Identifier,
            TokenKind::NotEq,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn error_value_is_message() {
    let tokens = Scanner::new("/* never closed").tokenize();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Error(LexError::UnterminatedComment));
    assert_eq!(tokens[0].value(), "unterminated block comment");
}

#[test]
fn lines_and_columns_are_one_based() {
    let mut scanner = Scanner::new("SELECT\n\t x\r\n  FROM");
    scanner.advance();
    assert_eq!(scanner.position(), Position::new(1, 1, 0));
    scanner.advance();
    assert_eq!(scanner.position(), Position::new(2, 3, 9));
    scanner.advance();
    assert_eq!(scanner.position(), Position::new(3, 3, 14));
}

#[test]
fn restore_after_terminal_token() {
    let mut scanner = Scanner::new("a 'open");
    scanner.advance();
    let saved = scanner.checkpoint();
    scanner.advance();
    assert!(matches!(scanner.current_token().kind, TokenKind::Error(_)));
    scanner.restore(saved);
    assert_eq!(scanner.current_token().kind, TokenKind::Identifier);
    scanner.advance();
    assert_eq!(
        scanner.current_token().kind,
        TokenKind::Error(LexError::UnterminatedString)
    );
}

#[test]
fn tokenize_continues_from_current_token() {
    let mut scanner = Scanner::new("a b c");
    scanner.advance();
    scanner.advance();
    let raws: Vec<&str> = scanner.tokenize().iter().map(|t| t.raw).collect();
    assert_eq!(raws, vec!["b", "c", ""]);
}
