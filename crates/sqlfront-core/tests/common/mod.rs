#![allow(dead_code)]

use sqlfront_core::ast::{Expr, QueryExpressionBody, QueryPrimary, SelectStatement};
use sqlfront_core::{ParseError, Parser};

pub fn parse(sql: &str) -> SelectStatement {
    Parser::new(sql)
        .parse()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    Parser::new(sql)
        .parse()
        .expect_err(&format!("Expected parse error for: {sql}"))
}

/// Parses a statement whose body is a single SELECT block.
pub fn parse_select(sql: &str) -> QueryPrimary {
    match parse(sql).body {
        QueryExpressionBody::Primary(select) => *select,
        other => panic!("Expected a single SELECT block, got {other:?}"),
    }
}

/// Parses `SELECT * FROM t WHERE <cond>` and returns the condition.
pub fn parse_where(cond: &str) -> Expr {
    parse_select(&format!("SELECT * FROM t WHERE {cond}"))
        .where_clause
        .unwrap_or_else(|| panic!("Missing WHERE for: {cond}"))
}

/// Parses `SELECT <expr>` and returns the single projection.
pub fn parse_projection(expr: &str) -> Expr {
    let mut select = parse_select(&format!("SELECT {expr}"));
    assert_eq!(select.projections.len(), 1, "for: {expr}");
    select.projections.remove(0).expr
}

/// Verifies that rendering is a fixed point and that the rendered SQL
/// parses back to the same tree.
pub fn round_trip(sql: &str) {
    let ast1 = parse(sql);
    let rendered1 = ast1.to_string();
    let ast2 = parse(&rendered1);
    let rendered2 = ast2.to_string();
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
    assert_eq!(ast1, ast2, "Re-parsed tree differs for: {sql}");
}
