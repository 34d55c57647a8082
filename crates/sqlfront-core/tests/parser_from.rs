//! Tests for FROM clauses: named tables, derived tables, parenthesized
//! table references and every join spelling.

mod common;
use common::*;

use sqlfront_core::ast::{Id, JoinKind, TableRef};
use sqlfront_core::lexer::Keyword;
use sqlfront_core::parser::ParseErrorKind;
use sqlfront_core::TokenKind;

fn from_clause(sql: &str) -> Vec<TableRef> {
    parse_select(sql).from
}

// ===================================================================
// Named tables
// ===================================================================

#[test]
fn plain_table() {
    assert_eq!(from_clause("SELECT * FROM t"), vec![TableRef::table("t")]);
}

#[test]
fn table_aliases() {
    assert_eq!(
        from_clause("SELECT * FROM users u, orders AS o"),
        vec![
            TableRef::aliased("users", "u"),
            TableRef::aliased("orders", "o")
        ]
    );
    round_trip("SELECT * FROM users u, orders AS o");
}

#[test]
fn schema_qualified_table() {
    let from = from_clause("SELECT * FROM sales.orders AS o");
    assert_eq!(
        from[0],
        TableRef::Relation {
            path: vec![Id::new("sales"), Id::new("orders")],
            alias: Some(Id::new("o")),
        }
    );
    round_trip("SELECT * FROM sales.orders AS o");
}

#[test]
fn quoted_keyword_table_name() {
    let from = from_clause(r#"SELECT * FROM "order" o"#);
    assert_eq!(from[0], TableRef::aliased("order", "o"));
    assert_eq!(
        parse(r#"SELECT * FROM "order" o"#).to_string(),
        r#"SELECT * FROM "order" AS o"#
    );
}

// ===================================================================
// Derived tables
// ===================================================================

#[test]
fn subquery_with_alias() {
    let from = from_clause("SELECT * FROM (SELECT 1 AS a) x");
    let TableRef::Subquery {
        alias,
        column_aliases,
        ..
    } = &from[0]
    else {
        panic!("Expected derived table");
    };
    assert_eq!(alias, "x");
    assert!(column_aliases.is_empty());
    round_trip("SELECT * FROM (SELECT 1 AS a) x");
}

#[test]
fn subquery_with_column_aliases() {
    let from = from_clause("SELECT * FROM (SELECT 1, 2) AS sub (x, y)");
    let TableRef::Subquery { column_aliases, .. } = &from[0] else {
        panic!("Expected derived table");
    };
    assert_eq!(column_aliases, &vec![Id::new("x"), Id::new("y")]);
    round_trip("SELECT * FROM (SELECT 1, 2) AS sub (x, y)");
}

#[test]
fn doubly_parenthesized_subquery() {
    assert!(matches!(
        from_clause("SELECT * FROM ((SELECT 1)) AS x")[0],
        TableRef::Subquery { .. }
    ));
}

#[test]
fn subquery_requires_alias() {
    let err = parse_err("SELECT * FROM (SELECT 1)");
    assert_eq!(
        err.expected,
        vec![TokenKind::Keyword(Keyword::As), TokenKind::Identifier]
    );
    assert_eq!(
        err.to_string(),
        "unexpected `end of input` at (1,25), expected AS | identifier"
    );
}

// ===================================================================
// Joins
// ===================================================================

#[test]
fn every_join_spelling() {
    let cases = [
        ("CROSS JOIN", JoinKind::Cross),
        ("JOIN", JoinKind::Join),
        ("INNER JOIN", JoinKind::Inner),
        ("LEFT JOIN", JoinKind::Left),
        ("LEFT OUTER JOIN", JoinKind::LeftOuter),
        ("RIGHT JOIN", JoinKind::Right),
        ("RIGHT OUTER JOIN", JoinKind::RightOuter),
        ("FULL JOIN", JoinKind::Full),
        ("FULL OUTER JOIN", JoinKind::FullOuter),
        ("NATURAL JOIN", JoinKind::Natural),
        ("NATURAL INNER JOIN", JoinKind::NaturalInner),
        ("NATURAL LEFT JOIN", JoinKind::NaturalLeft),
        ("NATURAL LEFT OUTER JOIN", JoinKind::NaturalLeftOuter),
        ("NATURAL RIGHT JOIN", JoinKind::NaturalRight),
        ("NATURAL RIGHT OUTER JOIN", JoinKind::NaturalRightOuter),
        ("NATURAL FULL JOIN", JoinKind::NaturalFull),
        ("NATURAL FULL OUTER JOIN", JoinKind::NaturalFullOuter),
    ];
    for (spelling, expected) in cases {
        let sql = if expected.requires_on() {
            format!("SELECT * FROM a {spelling} b ON a.id = b.id")
        } else {
            format!("SELECT * FROM a {spelling} b")
        };
        let from = from_clause(&sql);
        let TableRef::Join { kind, on, .. } = &from[0] else {
            panic!("Expected join for: {sql}");
        };
        assert_eq!(*kind, expected, "for: {sql}");
        assert_eq!(on.is_some(), expected.requires_on(), "for: {sql}");
        assert_eq!(parse(&sql).to_string(), sql);
    }
}

#[test]
fn joins_are_left_associative() {
    let from = from_clause("SELECT * FROM a JOIN b ON x = 1 LEFT JOIN c ON y = 2");
    let TableRef::Join { kind, left, .. } = &from[0] else {
        panic!("Expected join");
    };
    assert_eq!(*kind, JoinKind::Left);
    assert!(matches!(
        left.as_ref(),
        TableRef::Join {
            kind: JoinKind::Join,
            ..
        }
    ));
    round_trip("SELECT * FROM a JOIN b ON x = 1 LEFT JOIN c ON y = 2");
}

#[test]
fn parenthesized_join_on_the_right() {
    let from = from_clause("SELECT * FROM a JOIN (b JOIN c ON x = 1) ON y = 2");
    let TableRef::Join { right, .. } = &from[0] else {
        panic!("Expected join");
    };
    assert!(matches!(right.as_ref(), TableRef::Join { .. }));
    round_trip("SELECT * FROM a JOIN (b JOIN c ON x = 1) ON y = 2");
}

#[test]
fn parenthesized_table_ref_leaves_no_node() {
    assert_eq!(
        from_clause("SELECT * FROM (a JOIN b ON x = 1)"),
        from_clause("SELECT * FROM a JOIN b ON x = 1")
    );
    assert_eq!(from_clause("SELECT * FROM ((t))"), vec![TableRef::table("t")]);
}

#[test]
fn join_with_derived_table() {
    let sql = "SELECT * FROM a JOIN (SELECT id FROM b) AS bb ON a.id = bb.id";
    let from = from_clause(sql);
    let TableRef::Join { right, .. } = &from[0] else {
        panic!("Expected join");
    };
    assert!(matches!(right.as_ref(), TableRef::Subquery { alias, .. } if alias == "bb"));
    round_trip(sql);
}

#[test]
fn join_without_on_fails() {
    let err = parse_err("SELECT * FROM a JOIN b");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(err.expected, vec![TokenKind::Keyword(Keyword::On)]);
}

#[test]
fn on_after_cross_or_natural_join_fails() {
    let err = parse_err("SELECT * FROM a CROSS JOIN b ON x = 1");
    assert_eq!(err.kind, ParseErrorKind::ClauseNotAllowed);
    assert_eq!(err.to_string(), "ON is not allowed after CROSS JOIN at (1,30)");

    let err = parse_err("SELECT * FROM a NATURAL LEFT JOIN b ON x = 1");
    assert_eq!(err.kind, ParseErrorKind::ClauseNotAllowed);
}

#[test]
fn incomplete_join_operators() {
    let join = TokenKind::Keyword(Keyword::Join);
    assert_eq!(
        parse_err("SELECT * FROM a LEFT b").expected,
        vec![TokenKind::Keyword(Keyword::Outer), join]
    );
    assert_eq!(
        parse_err("SELECT * FROM a LEFT OUTER b").expected,
        vec![join]
    );
    assert_eq!(parse_err("SELECT * FROM a INNER b").expected, vec![join]);
    assert_eq!(parse_err("SELECT * FROM a CROSS b").expected, vec![join]);
    assert_eq!(
        parse_err("SELECT * FROM a NATURAL b").expected,
        [
            Keyword::Join,
            Keyword::Inner,
            Keyword::Left,
            Keyword::Right,
            Keyword::Full
        ]
        .map(TokenKind::Keyword)
        .to_vec()
    );
}

#[test]
fn comma_inside_parenthesized_table_ref_fails() {
    let err = parse_err("SELECT * FROM (a, b)");
    assert_eq!(err.expected, vec![TokenKind::RightParen]);
    assert_eq!(err.to_string(), "unexpected `,` at (1,17), expected )");
}
