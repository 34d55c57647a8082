//! Parser error types.

use crate::lexer::{Position, Token, TokenKind};

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The scanner produced an error token.
    Lexical,
    /// A token did not fit the grammar.
    UnexpectedToken,
    /// A clause appeared where the grammar forbids it, such as `ON` after
    /// a CROSS or NATURAL join.
    ClauseNotAllowed,
    /// Nesting exceeded [`crate::ParserConfig::max_depth`].
    NestingTooDeep,
}

/// A parse error.
///
/// The message names the offending lexeme, its 1-based line and column,
/// and what the parser would have accepted instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// The full diagnostic text.
    pub message: String,
    /// Where the offending token starts.
    pub position: Position,
    /// The offending lexeme.
    pub found: String,
    /// Token kinds that would have been accepted, in the order the grammar
    /// tries them.
    pub expected: Vec<TokenKind>,
}

impl ParseError {
    /// Creates an "unexpected token" error. Error tokens turn into lexical
    /// errors instead, with the scanner's message in place of "unexpected".
    #[must_use]
    pub fn unexpected(found: &Token<'_>, expected: &[TokenKind]) -> Self {
        let (kind, what) = match found.kind {
            TokenKind::Error(err) => (ParseErrorKind::Lexical, err.to_string()),
            _ => (ParseErrorKind::UnexpectedToken, "unexpected".to_owned()),
        };
        let mut message = format!("{what} `{}` at {}", found.lexeme(), found.position());
        if !expected.is_empty() {
            message.push_str(", expected ");
            for (i, item) in expected.iter().enumerate() {
                if i > 0 {
                    message.push_str(" | ");
                }
                message.push_str(item.describe());
            }
        }
        Self {
            kind,
            message,
            position: found.position(),
            found: found.lexeme().to_owned(),
            expected: expected.to_vec(),
        }
    }

    /// Creates an error for a clause the grammar forbids at this point.
    #[must_use]
    pub fn not_allowed(found: &Token<'_>, what: &str) -> Self {
        Self {
            kind: ParseErrorKind::ClauseNotAllowed,
            message: format!("{what} at {}", found.position()),
            position: found.position(),
            found: found.lexeme().to_owned(),
            expected: Vec::new(),
        }
    }

    /// Creates a nesting depth error.
    #[must_use]
    pub fn too_deep(found: &Token<'_>, max_depth: usize) -> Self {
        Self {
            kind: ParseErrorKind::NestingTooDeep,
            message: format!(
                "nesting deeper than {max_depth} levels at {}",
                found.position()
            ),
            position: found.position(),
            found: found.lexeme().to_owned(),
            expected: Vec::new(),
        }
    }

    /// Returns true if the scanner produced the error.
    #[must_use]
    pub const fn is_lexical(&self) -> bool {
        matches!(self.kind, ParseErrorKind::Lexical)
    }
}
