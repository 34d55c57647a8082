//! SQL scanner.
//!
//! The scanner is pull-based: [`Scanner::advance`] produces one token at a
//! time and [`Scanner::current_token`] peeks at it. Its whole state is a
//! [`ScannerState`] value, so backtracking is a copy and an assignment.

mod scanner;
mod span;
mod token;

pub use scanner::{Scanner, ScannerState};
pub use span::{Position, Span};
pub use token::{Keyword, LexError, Token, TokenKind};
