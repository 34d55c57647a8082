//! Token types for the SQL scanner.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use super::{Position, Span};

macro_rules! keywords {
    ($($variant:ident => $text:literal,)*) => {
        /// Reserved words of the dialect.
        ///
        /// Every keyword is reserved: a bare word that spells one of these
        /// (in any letter case) is never an identifier.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            /// All keywords in alphabetical order.
            pub const VARIANTS: &'static [Self] = &[$(Self::$variant,)*];

            /// Returns the canonical upper-case spelling.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }
    };
}

keywords! {
    All => "ALL",
    And => "AND",
    Any => "ANY",
    As => "AS",
    Asc => "ASC",
    Avg => "AVG",
    Between => "BETWEEN",
    By => "BY",
    Case => "CASE",
    Cast => "CAST",
    Collate => "COLLATE",
    Convert => "CONVERT",
    Count => "COUNT",
    Cross => "CROSS",
    Default => "DEFAULT",
    Delete => "DELETE",
    Desc => "DESC",
    Distinct => "DISTINCT",
    Else => "ELSE",
    End => "END",
    Escape => "ESCAPE",
    Except => "EXCEPT",
    Exists => "EXISTS",
    False => "FALSE",
    From => "FROM",
    Full => "FULL",
    Group => "GROUP",
    Grouping => "GROUPING",
    Having => "HAVING",
    In => "IN",
    Inner => "INNER",
    Insert => "INSERT",
    Intersect => "INTERSECT",
    Interval => "INTERVAL",
    Into => "INTO",
    Is => "IS",
    Join => "JOIN",
    Left => "LEFT",
    Like => "LIKE",
    Match => "MATCH",
    Max => "MAX",
    Min => "MIN",
    Natural => "NATURAL",
    Not => "NOT",
    Null => "NULL",
    Nullif => "NULLIF",
    On => "ON",
    Or => "OR",
    Order => "ORDER",
    Outer => "OUTER",
    Over => "OVER",
    Overlaps => "OVERLAPS",
    Partial => "PARTIAL",
    Rank => "RANK",
    Recursive => "RECURSIVE",
    Right => "RIGHT",
    Select => "SELECT",
    Set => "SET",
    Some => "SOME",
    Sum => "SUM",
    Then => "THEN",
    To => "TO",
    True => "TRUE",
    Union => "UNION",
    Unique => "UNIQUE",
    Unknown => "UNKNOWN",
    Update => "UPDATE",
    Values => "VALUES",
    When => "WHEN",
    Where => "WHERE",
    With => "WITH",
}

static KEYWORDS: LazyLock<HashMap<&'static str, Keyword>> = LazyLock::new(|| {
    Keyword::VARIANTS
        .iter()
        .map(|kw| (kw.as_str(), *kw))
        .collect()
});

impl Keyword {
    /// Looks up a keyword, ignoring letter case.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        KEYWORDS.get(s.to_ascii_uppercase().as_str()).copied()
    }

    /// Returns true for the reserved words that may name a function call,
    /// as in `COUNT(*)` or `NULLIF(a, b)`.
    #[must_use]
    pub const fn is_function_name(&self) -> bool {
        matches!(
            self,
            Self::Avg
                | Self::Count
                | Self::Grouping
                | Self::Max
                | Self::Min
                | Self::Nullif
                | Self::Rank
                | Self::Sum
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A malformed lexeme.
///
/// Lexical errors never abort scanning on their own: they are delivered as
/// [`TokenKind::Error`] tokens and the scanner stays on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated quoted identifier")]
    UnterminatedQuotedIdentifier,
    #[error("unterminated bracketed identifier")]
    UnterminatedBracketIdentifier,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("malformed exponent in numeric literal")]
    MalformedExponent,
    #[error("hexadecimal literal without digits")]
    HexWithoutDigits,
    #[error("invalid character after hexadecimal literal")]
    InvalidHexLiteral,
    #[error("unexpected '.'")]
    BareDot,
    #[error("expected '!='")]
    LoneBang,
    #[error("expected '||'")]
    LonePipe,
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
}

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Operators
    /// `^`
    Caret,
    /// `%`
    Percent,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `=`
    Eq,
    /// `<>` or `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `||`
    Concat,

    // Punctuation
    Dot,
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    /// `?` placeholder
    Question,

    // Literals
    /// Quoted string, `'it''s'`
    String,
    /// Integer, decimal or hexadecimal number, kept as source text.
    Number,
    /// Bare or quoted (`"..."`, `[...]`) identifier.
    Identifier,
    Keyword(Keyword),

    // Sentinels
    /// A malformed lexeme.
    Error(LexError),
    /// Held by a scanner that has not been advanced yet.
    Start,
    Eof,
}

impl TokenKind {
    /// Describes the kind for diagnostics.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Caret => "^",
            Self::Percent => "%",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Concat => "||",
            Self::Dot => ".",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Question => "?",
            Self::String => "string",
            Self::Number => "number",
            Self::Identifier => "identifier",
            Self::Keyword(kw) => kw.as_str(),
            Self::Error(_) => "invalid token",
            Self::Start => "start of input",
            Self::Eof => "end of input",
        }
    }

    /// Returns true if a scanner stays on this token forever.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Eof | Self::Error(_))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token with its source text and location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// The exact source slice, quotes included.
    pub raw: &'a str,
    pub span: Span,
    /// 1-based line of the first character.
    pub line: u32,
    /// 1-based column of the first character.
    pub column: u32,
}

impl<'a> Token<'a> {
    #[must_use]
    pub const fn new(kind: TokenKind, raw: &'a str, span: Span, line: u32, column: u32) -> Self {
        Self {
            kind,
            raw,
            span,
            line,
            column,
        }
    }

    /// Returns where the token starts.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.line, self.column, self.span.start)
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// Returns the semantic value of the token.
    ///
    /// Strings and quoted identifiers lose their delimiters and doubled
    /// delimiters collapse to one. Error tokens yield the error message.
    /// Everything else is the raw text.
    #[must_use]
    pub fn value(&self) -> Cow<'a, str> {
        match self.kind {
            TokenKind::String => unquote(self.raw, "''", "'"),
            TokenKind::Identifier if self.raw.starts_with('"') => unquote(self.raw, "\"\"", "\""),
            TokenKind::Identifier if self.raw.starts_with('[') => unquote(self.raw, "]]", "]"),
            TokenKind::Error(err) => Cow::Owned(err.to_string()),
            _ => Cow::Borrowed(self.raw),
        }
    }

    /// Returns the text shown for this token in diagnostics.
    #[must_use]
    pub fn lexeme(&self) -> &'a str {
        match self.kind {
            TokenKind::Eof => "end of input",
            TokenKind::Start => "start of input",
            _ => self.raw,
        }
    }
}

fn unquote<'a>(raw: &'a str, doubled: &str, single: &str) -> Cow<'a, str> {
    let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
    if inner.contains(doubled) {
        Cow::Owned(inner.replace(doubled, single))
    } else {
        Cow::Borrowed(inner)
    }
}
