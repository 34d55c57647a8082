//! SQL Parser
//!
//! A hand-written recursive descent parser with one method per grammar
//! rule. Parenthesized constructs that may hold a subquery are parsed
//! speculatively: the scanner is checkpointed, the subquery is tried first,
//! and on failure the scanner is rewound and the other reading is tried.

mod error;
mod expression;
#[allow(clippy::module_inception)]
mod parser;
mod table_ref;

pub use error::{ParseError, ParseErrorKind};
pub use parser::Parser;

use crate::ast::{Expr, SelectStatement};
use crate::config::ParserConfig;
use crate::lexer::Scanner;

/// Parses a SELECT statement from `scanner`, leaving it on the first token
/// after the statement. An unprimed scanner is advanced onto its first
/// token.
///
/// # Errors
///
/// Returns a `ParseError` if no SELECT statement starts at the current token.
pub fn parse_select_statement(scanner: &mut Scanner<'_>) -> Result<SelectStatement, ParseError> {
    let mut parser = Parser::from_scanner(scanner.clone(), ParserConfig::default());
    let result = parser.parse_select_statement();
    *scanner = parser.into_scanner();
    result
}

/// Parses a search condition from `scanner`, leaving it on the first token
/// after the condition.
///
/// # Errors
///
/// Returns a `ParseError` if no search condition starts at the current token.
pub fn parse_search_condition(scanner: &mut Scanner<'_>) -> Result<Expr, ParseError> {
    let mut parser = Parser::from_scanner(scanner.clone(), ParserConfig::default());
    let result = parser.parse_search_condition();
    *scanner = parser.into_scanner();
    result
}
