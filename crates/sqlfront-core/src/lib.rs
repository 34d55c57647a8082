//! # sqlfront-core
//!
//! A hand-written front end for SQL SELECT statements.
//!
//! This crate provides:
//! - A pull-based [`Scanner`] whose state can be checkpointed and restored
//! - A recursive descent [`Parser`] that backtracks over parenthesized
//!   constructs that may or may not hold a subquery
//! - An owned AST whose nodes render back to SQL through `Display`
//!
//! ## Parsing
//!
//! ```rust
//! use sqlfront_core::ast::{QueryExpressionBody, TableRef};
//! use sqlfront_core::Parser;
//!
//! let stmt = Parser::new("SELECT a FROM (SELECT 1 AS a) x WHERE a > 0")
//!     .parse()
//!     .unwrap();
//!
//! let QueryExpressionBody::Primary(select) = &stmt.body else {
//!     unreachable!()
//! };
//! assert!(matches!(&select.from[0], TableRef::Subquery { alias, .. } if alias == "x"));
//! assert_eq!(
//!     stmt.to_string(),
//!     "SELECT a FROM (SELECT 1 AS a) AS x WHERE a > 0"
//! );
//! ```
//!
//! ## Diagnostics
//!
//! Errors carry the offending lexeme, its line and column, and the tokens the
//! parser would have accepted:
//!
//! ```rust
//! use sqlfront_core::Parser;
//!
//! let err = Parser::new("SELECT * FROM a JOIN b WHERE x").parse().unwrap_err();
//! assert_eq!(err.to_string(), "unexpected `WHERE` at (1,24), expected ON");
//! ```
//!
//! ## Driving the scanner directly
//!
//! ```rust
//! use sqlfront_core::{parse_select_statement, Scanner, TokenKind};
//!
//! let mut scanner = Scanner::new("SELECT 1; SELECT 2");
//! scanner.advance();
//! parse_select_statement(&mut scanner).unwrap();
//! assert_eq!(scanner.current_token().kind, TokenKind::Semicolon);
//! ```

pub mod ast;
pub mod config;
pub mod lexer;
pub mod parser;

pub use ast::{Expr, SelectStatement};
pub use config::ParserConfig;
pub use lexer::{Scanner, Token, TokenKind};
pub use parser::{parse_search_condition, parse_select_statement, ParseError, Parser};
